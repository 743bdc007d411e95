//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: UI state machine
//! - [`Bridge`]: translation to the engine
//! - [`Driver`]: platform-specific I/O
//!
//! All events — user intents, socket events and fetch completions — are
//! processed on this one logical loop, in the order they are taken off
//! the driver, which is what gives the engine its in-order delivery
//! guarantee.

use palaver_proto::Session;
use thiserror::Error;

use crate::{App, AppAction, AppEvent, Bridge, Driver, FetchRequest};

/// Fatal runtime failures.
///
/// Everything recoverable is routed back through the engine as an event
/// and degrades to a surfaced warning; only these terminate the
/// synchronization loop.
#[derive(Debug, Error)]
pub enum RuntimeError<E>
where
    E: std::error::Error + 'static,
{
    /// No valid session; the loop never starts and the caller should
    /// route back to login.
    #[error("authentication required")]
    AuthRequired,

    /// The driver reported an unrecoverable I/O failure.
    #[error("driver error: {0}")]
    Driver(#[source] E),
}

/// Generic runtime that orchestrates App, Bridge, and Driver.
pub struct Runtime<D: Driver> {
    driver: D,
    app: App,
    bridge: Bridge,
}

impl<D: Driver> Runtime<D> {
    /// Create a new runtime with the given driver and session.
    pub fn new(driver: D, session: Session) -> Self {
        Self { driver, app: App::new(), bridge: Bridge::new(session) }
    }

    /// Run the main event loop.
    ///
    /// This is the core orchestration loop that:
    /// 1. Polls for user intents from the driver
    /// 2. Receives socket events when connected
    /// 3. Processes actions and events between App and Bridge
    /// 4. Executes outgoing commands and history fetches
    ///
    /// # Errors
    ///
    /// [`RuntimeError::AuthRequired`] if the session has no usable
    /// credential; [`RuntimeError::Driver`] if the driver encounters an
    /// I/O error.
    pub async fn run(mut self) -> Result<(), RuntimeError<D::Error>> {
        self.bridge
            .client()
            .ensure_authenticated()
            .map_err(|_| RuntimeError::AuthRequired)?;

        self.render()?;
        self.driver.connect().await.map_err(RuntimeError::Driver)?;

        loop {
            let should_quit = self.process_cycle().await?;
            if should_quit {
                break;
            }
        }

        self.driver.stop();
        Ok(())
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    async fn process_cycle(&mut self) -> Result<bool, RuntimeError<D::Error>> {
        if let Some(action) = self.driver.poll_action().await.map_err(RuntimeError::Driver)?
            && self.process_actions(vec![action]).await?
        {
            return Ok(true);
        }

        if self.driver.is_connected()
            && let Some(event) = self.driver.recv_socket_event().await
        {
            let events = self.bridge.handle_socket_event(event);
            self.run_effects().await?;
            if self.process_app_events(events).await? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    async fn process_actions(
        &mut self,
        initial_actions: Vec<AppAction>,
    ) -> Result<bool, RuntimeError<D::Error>> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.render()?,
                    AppAction::Quit => return Ok(true),
                    AppAction::Connect => {
                        self.driver.connect().await.map_err(RuntimeError::Driver)?;
                    },

                    // Engine operations go through the bridge
                    AppAction::SelectConversation { .. }
                    | AppAction::SendMessage { .. }
                    | AppAction::LeaveGroup { .. }
                    | AppAction::Logout => {
                        let events = self.bridge.process_app_action(action);
                        self.run_effects().await?;
                        for event in events {
                            let new_actions = self.app.handle(event);
                            pending_actions.extend(new_actions);
                        }
                    },
                }
            }
        }

        Ok(false)
    }

    /// Process events from Bridge back to App.
    async fn process_app_events(
        &mut self,
        events: Vec<AppEvent>,
    ) -> Result<bool, RuntimeError<D::Error>> {
        for event in events {
            let actions = self.app.handle(event);
            if self.process_actions(actions).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Drain the bridge's work queues: outgoing commands and history
    /// fetches.
    ///
    /// Commands are serialized through the single connection; a failed
    /// send is routed back into the engine, which decides what state to
    /// roll back. Fetch completions are fed back tagged with the key
    /// they were issued for, so a result that resolves after a
    /// conversation switch is discarded by the engine's stale guard.
    async fn run_effects(&mut self) -> Result<(), RuntimeError<D::Error>> {
        loop {
            let outgoing = self.bridge.take_outgoing();
            let fetches = self.bridge.take_fetch_requests();
            if outgoing.is_empty() && fetches.is_empty() {
                break;
            }

            for command in outgoing {
                if let Err(e) = self.driver.send_command(command.clone()).await {
                    let events = self.bridge.handle_command_failed(command, e.to_string());
                    self.apply_app_events_sync(events);
                }
            }

            for request in fetches {
                let events = match request {
                    FetchRequest::Conversations => match self.driver.fetch_conversations().await {
                        Ok(conversations) => self.bridge.handle_conversations_loaded(conversations),
                        Err(e) => self.bridge.handle_conversations_failed(e.to_string()),
                    },
                    FetchRequest::History(key) => match self.driver.fetch_messages(key).await {
                        Ok(messages) => self.bridge.handle_history_loaded(key, messages),
                        Err(e) => self.bridge.handle_history_failed(key, e.to_string()),
                    },
                };
                self.apply_app_events_sync(events);
            }
        }

        if self.bridge.take_disconnect_request() {
            self.driver.stop();
        }

        Ok(())
    }

    /// Apply app events in a sync context (effect completions only).
    fn apply_app_events_sync(&mut self, events: Vec<AppEvent>) {
        for event in events {
            for action in self.app.handle(event) {
                match action {
                    AppAction::Render => {
                        if let Err(e) = self.render() {
                            tracing::warn!("failed to render: {e:?}");
                        }
                    },
                    other => {
                        // Effect completions never produce intents.
                        tracing::warn!("unexpected action in sync context: {other:?}");
                    },
                }
            }
        }
    }

    fn render(&mut self) -> Result<(), RuntimeError<D::Error>> {
        self.driver
            .render(&self.app, self.bridge.client())
            .map_err(RuntimeError::Driver)
    }

    /// Get a reference to the App.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a reference to the Bridge.
    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }
}
