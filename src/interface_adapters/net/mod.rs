// Network adapters: the host's WebSocket server and the client's dialer.

pub mod client;
pub mod host;

pub use client::{ClientConnection, ClientTransport};
pub use host::{HostTransport, world_update_serializer, ws_handler};

use std::fmt;

/// Transport lifecycle failures. Callers decide whether to retry or fall back to the lobby.
#[derive(Debug)]
pub enum NetError {
    Bind(std::io::Error),
    Connect(tokio_tungstenite::tungstenite::Error),
    ConnectTimeout,
    InvalidHostId(String),
    Ws(axum::Error),
    Serialization(serde_json::Error),
    InputClosed,
    WorldUpdatesClosed,
    Disconnected,
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetError::Bind(e) => write!(f, "failed to bind host listener: {e}"),
            NetError::Connect(e) => write!(f, "failed to connect to host: {e}"),
            NetError::ConnectTimeout => write!(f, "timed out connecting to host"),
            NetError::InvalidHostId(id) => write!(f, "invalid host id '{id}'"),
            NetError::Ws(e) => write!(f, "websocket error: {e}"),
            NetError::Serialization(e) => write!(f, "failed to encode message: {e}"),
            NetError::InputClosed => write!(f, "session input channel closed"),
            NetError::WorldUpdatesClosed => write!(f, "world update channel closed"),
            NetError::Disconnected => write!(f, "connection closed"),
        }
    }
}

impl std::error::Error for NetError {}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}
