//! WebSocket transport for the push channel.
//!
//! Provides [`ConnectedSocket`] which handles WebSocket I/O for event
//! transport. This is a thin layer that frames outbound
//! [`ClientCommand`]s and decodes inbound envelopes — protocol logic
//! remains in the sans-IO [`crate::Client`].

use futures_util::{SinkExt, StreamExt};
use palaver_proto::{ClientCommand, ProtocolError, ServerEvent, Session};
use thiserror::Error;
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{client::IntoClientRequest, http::HeaderValue, protocol::Message as WsMessage},
};

use crate::event::SocketEvent;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No usable session credential; no dial was attempted.
    #[error("authentication required")]
    AuthRequired,

    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Stream error.
    #[error("stream error: {0}")]
    Stream(String),
}

/// Handle to a connected push channel.
///
/// Provides channels for event transport. Commands are sent and events
/// received via the channels; an internal task handles the WebSocket
/// I/O. The socket is a scoped resource: dropping the handle or calling
/// [`ConnectedSocket::stop`] tears the connection down.
pub struct ConnectedSocket {
    /// Commands to the server.
    pub to_server: mpsc::Sender<ClientCommand>,
    /// Lifecycle signals and decoded events from the server.
    pub from_server: mpsc::Receiver<SocketEvent>,
    /// Abort handle to stop the connection task.
    abort_handle: tokio::task::AbortHandle,
}

impl ConnectedSocket {
    /// Stop the connection.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

impl Drop for ConnectedSocket {
    fn drop(&mut self) {
        self.abort_handle.abort();
    }
}

/// Connect the push channel for an authenticated session.
///
/// The session credential is presented as a cookie on the upgrade
/// request. One connection per session; callers own the handle for the
/// session lifetime and stop it on logout.
///
/// # Errors
///
/// [`TransportError::AuthRequired`] if the session has no usable
/// credential (no dial is attempted), otherwise connection errors.
pub async fn connect(url: &str, session: &Session) -> Result<ConnectedSocket, TransportError> {
    if !session.is_valid() {
        return Err(TransportError::AuthRequired);
    }

    let mut request = url
        .into_client_request()
        .map_err(|e| TransportError::Connection(format!("invalid url: {e}")))?;

    let cookie = HeaderValue::from_str(&format!("session={}", session.token))
        .map_err(|e| TransportError::Connection(format!("invalid session credential: {e}")))?;
    request.headers_mut().insert("Cookie", cookie);

    let (stream, _response) = connect_async(request)
        .await
        .map_err(|e| TransportError::Connection(format!("connect failed: {e}")))?;

    let (to_server_tx, to_server_rx) = mpsc::channel::<ClientCommand>(32);
    let (from_server_tx, from_server_rx) = mpsc::channel::<SocketEvent>(32);

    // Spawn connection handler
    let handle = tokio::spawn(run_socket(stream, to_server_rx, from_server_tx));

    Ok(ConnectedSocket {
        to_server: to_server_tx,
        from_server: from_server_rx,
        abort_handle: handle.abort_handle(),
    })
}

/// Run the connection, bridging between channels and the WebSocket.
async fn run_socket(
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    mut to_server: mpsc::Receiver<ClientCommand>,
    from_server: mpsc::Sender<SocketEvent>,
) {
    let (mut sink, mut source) = stream.split();

    if from_server.send(SocketEvent::Connected).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            command = to_server.recv() => {
                let Some(command) = command else { break };
                match command.encode() {
                    Ok(text) => {
                        if let Err(e) = sink.send(WsMessage::Text(text.into())).await {
                            tracing::error!("socket send failed: {e}");
                            break;
                        }
                    },
                    Err(e) => tracing::error!("command encode failed: {e}"),
                }
            },
            frame = source.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        if !forward_event(text.as_str(), &from_server).await {
                            return;
                        }
                    },
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    Some(Ok(_)) => {
                        // Ping/pong and binary frames are transport noise.
                    },
                    Some(Err(e)) => {
                        tracing::error!("socket read failed: {e}");
                        break;
                    },
                }
            },
        }
    }

    let _ = from_server.send(SocketEvent::Closed).await;
}

/// Decode one text frame and forward it.
///
/// Unknown event names are dropped with a warning: new server-side event
/// types must never crash the inbound pipeline. Returns `false` when the
/// receiver side is gone.
async fn forward_event(raw: &str, from_server: &mpsc::Sender<SocketEvent>) -> bool {
    match ServerEvent::decode(raw) {
        Ok(event) => from_server.send(SocketEvent::Event(event)).await.is_ok(),
        Err(ProtocolError::UnknownEvent { name }) => {
            tracing::warn!(%name, "dropping unknown server event");
            true
        },
        Err(e) => {
            tracing::warn!("dropping undecodable server event: {e}");
            true
        },
    }
}
