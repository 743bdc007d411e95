//! Group-room membership tracking.

use std::collections::HashSet;

use palaver_proto::GroupId;

/// Tracks which group rooms the local session participates in.
///
/// Membership is optimistic: a group is recorded before the server
/// confirms the join, and evicted only if the transport reports the
/// command failed. The transport does not persist room membership across
/// reconnects, so after every transition back to connected the caller
/// re-issues a join for each entry in [`MembershipTracker::resync`].
#[derive(Debug, Clone, Default)]
pub struct MembershipTracker {
    joined: HashSet<GroupId>,
}

impl MembershipTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a join.
    ///
    /// Returns `true` if the group was not already joined, meaning a
    /// `join_group` command must be emitted. Joining a group twice is a
    /// no-op.
    pub fn join(&mut self, group_id: GroupId) -> bool {
        self.joined.insert(group_id)
    }

    /// Record a leave.
    ///
    /// Returns `true` if the group was joined, meaning a `leave_group`
    /// command must be emitted. Leaving a group twice is a no-op.
    pub fn leave(&mut self, group_id: GroupId) -> bool {
        self.joined.remove(&group_id)
    }

    /// Drop a group whose join command failed at the transport.
    pub fn evict(&mut self, group_id: GroupId) {
        self.joined.remove(&group_id);
    }

    /// Groups to re-join after a reconnect, in unspecified order.
    pub fn resync(&self) -> Vec<GroupId> {
        self.joined.iter().copied().collect()
    }

    /// Whether `group_id` is currently tracked as joined.
    pub fn contains(&self, group_id: GroupId) -> bool {
        self.joined.contains(&group_id)
    }

    /// Number of joined groups.
    pub fn len(&self) -> usize {
        self.joined.len()
    }

    /// Whether no group is joined.
    pub fn is_empty(&self) -> bool {
        self.joined.is_empty()
    }

    /// Forget all memberships (logout).
    pub fn clear(&mut self) {
        self.joined.clear();
    }
}
