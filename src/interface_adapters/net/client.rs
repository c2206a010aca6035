use crate::interface_adapters::net::NetError;
use crate::interface_adapters::protocol::{self, InputPacket, WireMessage};
use crate::interface_adapters::utils::rng::peer_identity;
use crate::use_cases::WorldUpdate;

use futures::SinkExt;
use futures_util::StreamExt;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::{Instrument, debug, info, info_span, warn};

/// Outgoing frames queued between the game loop and the socket writer.
const OUTGOING_CAPACITY: usize = 64;

/// Joining side of a session, before it is connected.
#[derive(Debug, Clone)]
pub struct ClientTransport {
    identity: String,
}

impl ClientTransport {
    /// Allocates a fresh identity for this peer.
    pub fn open() -> Self {
        let identity = peer_identity();
        debug!(%identity, "client identity allocated");
        Self { identity }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Dials `ws://<host_id>/ws`. Gives up with `ConnectTimeout` after `connect_timeout`;
    /// dropping the returned future abandons the attempt.
    pub async fn connect(
        self,
        host_id: &str,
        connect_timeout: Duration,
    ) -> Result<ClientConnection, NetError> {
        let host_id = host_id.trim();
        if host_id.is_empty() || host_id.contains(['/', ' ']) {
            return Err(NetError::InvalidHostId(host_id.to_string()));
        }
        let url = format!("ws://{host_id}/ws");

        let dial = tokio_tungstenite::connect_async(url.as_str());
        let (socket, _response) = match tokio::time::timeout(connect_timeout, dial).await {
            Ok(result) => result.map_err(NetError::Connect)?,
            Err(_) => return Err(NetError::ConnectTimeout),
        };
        info!(%url, identity = %self.identity, "connected to host");

        let (mut sink, mut stream) = socket.split();
        let (updates_tx, updates_rx) = watch::channel::<Option<WorldUpdate>>(None);
        let (outgoing_tx, mut outgoing_rx) = mpsc::channel::<String>(OUTGOING_CAPACITY);
        let span = info_span!("host_link", identity = %self.identity);

        let reader = tokio::spawn(
            async move {
                while let Some(frame) = stream.next().await {
                    let text = match frame {
                        Ok(Message::Text(text)) => text,
                        Ok(Message::Close(_)) => break,
                        Ok(Message::Binary(_)) => {
                            debug!("ignoring binary frame from host");
                            continue;
                        }
                        Ok(_) => continue,
                        Err(e) => {
                            warn!(error = %e, "host read failed");
                            break;
                        }
                    };

                    match protocol::decode(text.as_str()) {
                        // Last write wins; the watch only keeps the newest snapshot.
                        Ok(WireMessage::State(packet)) => {
                            updates_tx.send_replace(Some(WorldUpdate::from(packet)));
                        }
                        Ok(WireMessage::Input(_) | WireMessage::Unknown) => {
                            debug!("ignoring non-state message from host");
                        }
                        Err(e) => debug!(error = %e, "undecodable frame from host"),
                    }
                }
                info!("host link closed");
            }
            .instrument(span.clone()),
        );

        let writer = tokio::spawn(
            async move {
                while let Some(text) = outgoing_rx.recv().await {
                    if let Err(e) = sink.send(Message::Text(text.into())).await {
                        warn!(error = %e, "host write failed");
                        return;
                    }
                }
                let _ = sink.send(Message::Close(None)).await;
                let _ = sink.close().await;
            }
            .instrument(span),
        );

        Ok(ClientConnection {
            identity: self.identity,
            updates_rx,
            outgoing_tx,
            reader,
            writer,
        })
    }
}

/// A live link to the host: snapshots in, inputs out.
pub struct ClientConnection {
    identity: String,
    updates_rx: watch::Receiver<Option<WorldUpdate>>,
    outgoing_tx: mpsc::Sender<String>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl ClientConnection {
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Watch over the newest STATE received. Errors on `changed()` once the host is gone.
    pub fn updates(&self) -> watch::Receiver<Option<WorldUpdate>> {
        self.updates_rx.clone()
    }

    pub fn latest(&self) -> Option<WorldUpdate> {
        self.updates_rx.borrow().clone()
    }

    pub fn is_connected(&self) -> bool {
        !self.reader.is_finished() && !self.writer.is_finished()
    }

    /// Queues an INPUT for the host. A full queue drops the packet; the next tick
    /// sends a fresher one anyway.
    pub fn send_input<I, S>(&self, keys: I) -> Result<(), NetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let msg = WireMessage::Input(InputPacket {
            player_id: self.identity.clone(),
            keys: keys.into_iter().map(Into::into).collect(),
        });
        let text = protocol::encode(&msg).map_err(NetError::Serialization)?;
        match self.outgoing_tx.try_send(text) {
            Ok(()) | Err(mpsc::error::TrySendError::Full(_)) => Ok(()),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(NetError::Disconnected),
        }
    }

    /// Flushes queued input, closes the socket and stops both tasks.
    pub async fn close(self) {
        drop(self.outgoing_tx);
        if let Err(e) = self.writer.await {
            debug!(error = %e, "writer task ended abnormally");
        }
        self.reader.abort();
        info!(identity = %self.identity, "client closed");
    }
}
