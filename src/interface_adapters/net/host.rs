use crate::interface_adapters::net::NetError;
use crate::interface_adapters::protocol::{self, InputPacket, StatePacket, WireMessage};
use crate::interface_adapters::state::{AppState, PeerSlot, PeerSlots};
use crate::interface_adapters::utils::rng::conn_id;
use crate::use_cases::{GameEvent, HOST_PLAYER_ID, WorldUpdate};

use axum::{
    Error, Router,
    extract::{
        State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use futures::SinkExt;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{Instrument, Span, debug, error, info, info_span, warn};

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const MAX_INVALID_JSON: u32 = 10;

/// Sizing for the host's fan-out.
#[derive(Debug, Clone, Copy)]
pub struct HostOptions {
    /// Peers allowed at once besides the host itself.
    pub max_peers: usize,
    /// Capacity of the serialized snapshot broadcast.
    pub broadcast_capacity: usize,
}

/// Accepting side of a session: a WebSocket server whose bound address is the session id.
pub struct HostTransport {
    identity: String,
    closing_tx: watch::Sender<bool>,
    server: JoinHandle<std::io::Result<()>>,
    serializer: JoinHandle<()>,
}

impl HostTransport {
    /// Binds `bind_addr` and starts serving `/ws`. Snapshots read from `world_rx` are
    /// serialized once and fanned out to every peer.
    pub async fn open(
        bind_addr: &str,
        input_tx: mpsc::Sender<GameEvent>,
        world_rx: broadcast::Receiver<WorldUpdate>,
        options: HostOptions,
    ) -> Result<Self, NetError> {
        let listener = tokio::net::TcpListener::bind(bind_addr)
            .await
            .map_err(NetError::Bind)?;
        let address = listener.local_addr().map_err(NetError::Bind)?;

        let (world_bytes_tx, _world_bytes_rx) =
            broadcast::channel::<Utf8Bytes>(options.broadcast_capacity);
        let (world_latest_tx, _world_latest_rx) = watch::channel(Utf8Bytes::from(""));
        let (closing_tx, closing_rx) = watch::channel(false);

        let serializer = tokio::spawn(world_update_serializer(
            world_rx,
            world_bytes_tx.clone(),
            world_latest_tx.clone(),
        ));

        let state = Arc::new(AppState {
            input_tx,
            world_bytes_tx,
            world_latest_tx,
            closing_rx: closing_rx.clone(),
            peers: Arc::new(PeerSlots::new(options.max_peers)),
        });
        let app = Router::new()
            .route("/ws", get(ws_handler))
            .with_state(state);

        info!(%address, "host listening");
        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(wait_closing(closing_rx))
                .await
                .inspect_err(|e| error!(error = %e, "host server error"))
        });

        Ok(Self {
            identity: address.to_string(),
            closing_tx,
            server,
            serializer,
        })
    }

    /// Session id to hand to the other player out-of-band.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Closes every peer socket and stops the listener.
    pub async fn close(self) {
        let _ = self.closing_tx.send(true);
        match self.server.await {
            Ok(Ok(())) => info!(identity = %self.identity, "host closed"),
            Ok(Err(e)) => warn!(error = %e, "host server exited with error"),
            Err(e) => warn!(error = %e, "host server task failed"),
        }
        self.serializer.abort();
    }
}

async fn wait_closing(mut closing_rx: watch::Receiver<bool>) {
    loop {
        if *closing_rx.borrow_and_update() {
            return;
        }
        if closing_rx.changed().await.is_err() {
            return;
        }
    }
}

pub async fn world_update_serializer(
    mut world_rx: broadcast::Receiver<WorldUpdate>,
    world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    world_latest_tx: watch::Sender<Utf8Bytes>,
) {
    // Serialize each snapshot once and broadcast the shared bytes.
    loop {
        match world_rx.recv().await {
            Ok(update) => {
                let msg = WireMessage::State(StatePacket::from(&update));
                let txt = match protocol::encode(&msg) {
                    Ok(txt) => txt,
                    Err(e) => {
                        error!(error = ?e, "failed to serialize world update");
                        continue;
                    }
                };

                let bytes = Utf8Bytes::from(txt);
                let _ = world_latest_tx.send(bytes.clone());
                let _ = world_bytes_tx.send(bytes);
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(
                    missed = n,
                    "world serializer lagged; skipping to latest update"
                );
            }
            Err(broadcast::error::RecvError::Closed) => {
                warn!("world updates channel closed; serializer exiting");
                break;
            }
        }
    }
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let Some(slot) = state.peers.try_claim() else {
        warn!(peers = state.peers.in_use(), "session full; rejecting peer");
        return (StatusCode::SERVICE_UNAVAILABLE, "session full").into_response();
    };

    ws.on_upgrade(move |socket| {
        // Separate connection id for correlating logs before a player_id exists.
        let span = info_span!("conn", conn_id = conn_id(), player_id = tracing::field::Empty);
        handle_socket(socket, state, slot).instrument(span)
    })
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>, _slot: PeerSlot) {
    info!("peer connected");
    let mut ctx = PeerCtx::new(&state);
    if let Err(e) = run_peer_loop(&mut socket, &mut ctx).await {
        warn!(error = %e, "peer loop exited with error");
    }
}

enum LoopControl {
    Continue,
    Disconnect,
}

struct PeerCtx {
    // Bound by the first valid INPUT; later packets must carry the same id.
    player_id: Option<String>,
    input_tx: mpsc::Sender<GameEvent>,
    world_bytes_rx: broadcast::Receiver<Utf8Bytes>,
    world_latest_rx: watch::Receiver<Utf8Bytes>,
    closing_rx: watch::Receiver<bool>,

    lag_recovery_count: u64,
    msgs_in: u64,
    msgs_out: u64,
    bytes_in: u64,
    bytes_out: u64,
    invalid_json: u32,

    last_input_full_log: Instant,
    last_world_lag_log: Instant,
    last_invalid_input_log: Instant,

    close_frame: Option<CloseFrame>,
}

impl PeerCtx {
    fn new(state: &AppState) -> Self {
        // Subscribe before any await so no snapshot is missed.
        let now = Instant::now() - LOG_THROTTLE;
        Self {
            player_id: None,
            input_tx: state.input_tx.clone(),
            world_bytes_rx: state.world_bytes_tx.subscribe(),
            world_latest_rx: state.world_latest_tx.subscribe(),
            closing_rx: state.closing_rx.clone(),
            lag_recovery_count: 0,
            msgs_in: 0,
            msgs_out: 0,
            bytes_in: 0,
            bytes_out: 0,
            invalid_json: 0,
            last_input_full_log: now,
            last_world_lag_log: now,
            last_invalid_input_log: now,
            close_frame: None,
        }
    }
}

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

async fn run_peer_loop(socket: &mut WebSocket, ctx: &mut PeerCtx) -> Result<(), NetError> {
    let mut fatal: Option<NetError> = None;

    loop {
        let disconnect: bool = tokio::select! {
            incoming = socket.recv() => {
                match handle_incoming_ws(incoming, ctx) {
                    Ok(LoopControl::Continue) => false,
                    Ok(LoopControl::Disconnect) => true,
                    Err(e) => {
                        fatal = Some(e);
                        true
                    }
                }
            }

            world_msg = ctx.world_bytes_rx.recv() => {
                match world_msg {
                    Ok(bytes) => matches!(
                        forward_world_bytes(bytes, socket, ctx).await,
                        LoopControl::Disconnect
                    ),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        if should_log(&mut ctx.last_world_lag_log) {
                            warn!(missed = n, "world updates lagged; sending snapshot");
                        }

                        // Resync with the latest snapshot; STATE is last-write-wins.
                        let latest = ctx.world_latest_rx.borrow().clone();
                        if latest.is_empty() {
                            false
                        } else {
                            ctx.lag_recovery_count += 1;
                            matches!(
                                forward_world_bytes(latest, socket, ctx).await,
                                LoopControl::Disconnect
                            )
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        fatal = Some(NetError::WorldUpdatesClosed);
                        true
                    }
                }
            }

            _ = ctx.closing_rx.changed() => {
                ctx.close_frame = Some(CloseFrame {
                    code: close_code::AWAY,
                    reason: "host closing".into(),
                });
                true
            }
        };

        if disconnect {
            if let Some(frame) = ctx.close_frame.take() {
                let _ = socket.send(Message::Close(Some(frame))).await;
            }
            if let Err(err) = socket.close().await.map_err(NetError::Ws) {
                debug!(error = %err, "socket close error");
            }
            break;
        }
    }

    if let Err(e) = disconnect_cleanup(ctx).await {
        warn!(error = %e, "error during disconnect cleanup");
        if fatal.is_none() {
            fatal = Some(e);
        }
    }

    match fatal {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn handle_incoming_ws(
    incoming: Option<Result<Message, Error>>,
    ctx: &mut PeerCtx,
) -> Result<LoopControl, NetError> {
    match incoming {
        Some(Ok(msg)) => match msg {
            Message::Text(text) => {
                ctx.msgs_in += 1;
                ctx.bytes_in += text.len() as u64;

                match protocol::decode(text.as_str()) {
                    Ok(WireMessage::Input(packet)) => process_input(packet, ctx),
                    Ok(WireMessage::State(_)) => {
                        if should_log(&mut ctx.last_invalid_input_log) {
                            warn!("peer sent STATE; only the host is authoritative");
                        }
                        Ok(LoopControl::Continue)
                    }
                    Ok(WireMessage::Unknown) => {
                        debug!("ignoring message with unknown type");
                        Ok(LoopControl::Continue)
                    }
                    Err(parse_err) => {
                        ctx.invalid_json += 1;
                        if should_log(&mut ctx.last_invalid_input_log) {
                            warn!(
                                bytes = text.len(),
                                error = %parse_err,
                                "failed to parse peer message"
                            );
                        }

                        if ctx.invalid_json > MAX_INVALID_JSON {
                            ctx.close_frame = Some(CloseFrame {
                                code: close_code::POLICY,
                                reason: "too many invalid messages".into(),
                            });
                            return Ok(LoopControl::Disconnect);
                        }

                        Ok(LoopControl::Continue)
                    }
                }
            }
            Message::Binary(_) => {
                ctx.close_frame = Some(CloseFrame {
                    code: close_code::UNSUPPORTED,
                    reason: "binary messages not supported".into(),
                });
                Ok(LoopControl::Disconnect)
            }
            Message::Ping(_) | Message::Pong(_) => Ok(LoopControl::Continue),
            Message::Close(_) => Ok(LoopControl::Disconnect),
        },
        Some(Err(e)) => {
            warn!(error = %e, "websocket recv error");
            Ok(LoopControl::Disconnect)
        }
        None => {
            info!("websocket closed");
            Ok(LoopControl::Disconnect)
        }
    }
}

fn process_input(mut packet: InputPacket, ctx: &mut PeerCtx) -> Result<LoopControl, NetError> {
    packet.player_id = packet.player_id.trim().to_string();
    if packet.player_id.is_empty() || packet.player_id == HOST_PLAYER_ID {
        if should_log(&mut ctx.last_invalid_input_log) {
            warn!(
                player_id = %packet.player_id,
                "input with missing or reserved player id dropped"
            );
        }
        return Ok(LoopControl::Continue);
    }

    match &ctx.player_id {
        None => {
            Span::current().record("player_id", packet.player_id.as_str());
            info!(player_id = %packet.player_id, "peer bound to player");
            ctx.player_id = Some(packet.player_id.clone());
        }
        Some(bound) if *bound != packet.player_id => {
            if should_log(&mut ctx.last_invalid_input_log) {
                warn!(claimed = %packet.player_id, "input for another player dropped");
            }
            return Ok(LoopControl::Continue);
        }
        Some(_) => {}
    }

    match ctx.input_tx.try_send(GameEvent::from(packet)) {
        Ok(()) => Ok(LoopControl::Continue),
        Err(mpsc::error::TrySendError::Full(_evt)) => {
            if should_log(&mut ctx.last_input_full_log) {
                warn!("input channel full; dropping input");
            }
            Ok(LoopControl::Continue)
        }
        Err(mpsc::error::TrySendError::Closed(_evt)) => Err(NetError::InputClosed),
    }
}

async fn forward_world_bytes(
    world_msg: Utf8Bytes,
    socket: &mut WebSocket,
    ctx: &mut PeerCtx,
) -> LoopControl {
    let bytes_len = world_msg.len();
    match socket
        .send(Message::Text(world_msg))
        .await
        .map_err(NetError::Ws)
    {
        Ok(()) => {
            ctx.msgs_out += 1;
            ctx.bytes_out += bytes_len as u64;
            LoopControl::Continue
        }
        Err(err) => {
            warn!(error = %err, "failed to send world update");
            LoopControl::Disconnect
        }
    }
}

async fn disconnect_cleanup(ctx: &PeerCtx) -> Result<(), NetError> {
    if let Some(player_id) = &ctx.player_id {
        ctx.input_tx
            .send(GameEvent::Leave {
                player_id: player_id.clone(),
            })
            .await
            .map_err(|_| NetError::InputClosed)?;
    }

    debug!(
        msgs_in = ctx.msgs_in,
        msgs_out = ctx.msgs_out,
        bytes_in = ctx.bytes_in,
        bytes_out = ctx.bytes_out,
        invalid_json = ctx.invalid_json,
        lag_recovery_count = ctx.lag_recovery_count,
        "connection stats"
    );
    info!("peer disconnected");
    Ok(())
}
