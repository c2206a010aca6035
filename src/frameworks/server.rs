// Framework bootstrap: tracing, the world task and the transport for each session role.

use crate::domain::KeySet;
use crate::domain::tuning::player::PLAYER_COLORS;
use crate::frameworks::config;
use crate::interface_adapters::net::host::HostOptions;
use crate::interface_adapters::net::{ClientConnection, ClientTransport, HostTransport, NetError};
use crate::use_cases::flavor::CatalogThemes;
use crate::use_cases::game::world_task;
use crate::use_cases::{
    ClientView, GameEvent, HOST_PLAYER_ID, Role, Session, SessionSettings, SessionState,
    WorldUpdate,
};

use std::{io::Result, sync::Arc, time::Duration};
use tokio::sync::{Notify, broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// A running session: the world task plus, when hosting, the transport serving peers.
pub struct SessionRuntime {
    transport: Option<HostTransport>,
    input_tx: mpsc::Sender<GameEvent>,
    world_tx: broadcast::Sender<WorldUpdate>,
    state_rx: watch::Receiver<SessionState>,
    shutdown: Arc<Notify>,
    world: JoinHandle<()>,
}

impl SessionRuntime {
    /// Single player; nothing is exposed on the network.
    pub async fn start_local(settings: SessionSettings, tick_interval: Duration) -> Result<Self> {
        let runtime = Self::spawn_world(settings, tick_interval);
        runtime.start_run().await?;
        Ok(runtime)
    }

    /// Hosts a session on `bind_addr`; the bound address becomes the session id.
    pub async fn start_host(
        bind_addr: &str,
        settings: SessionSettings,
        tick_interval: Duration,
    ) -> std::result::Result<Self, NetError> {
        let mut runtime = Self::spawn_world(settings, tick_interval);
        let options = HostOptions {
            max_peers: config::MAX_PEERS,
            broadcast_capacity: config::WORLD_BROADCAST_CAPACITY,
        };
        let transport = match HostTransport::open(
            bind_addr,
            runtime.input_tx.clone(),
            runtime.world_tx.subscribe(),
            options,
        )
        .await
        {
            Ok(transport) => transport,
            Err(e) => {
                runtime.shutdown().await;
                return Err(e);
            }
        };
        info!(session_id = %transport.identity(), "hosting session");
        runtime.transport = Some(transport);
        runtime
            .start_run()
            .await
            .map_err(|_| NetError::InputClosed)?;
        Ok(runtime)
    }

    fn spawn_world(settings: SessionSettings, tick_interval: Duration) -> Self {
        // input_tx/rx: host and peer inputs funnel into the single world task.
        let (input_tx, input_rx) = mpsc::channel::<GameEvent>(config::INPUT_CHANNEL_CAPACITY);
        // world_tx: snapshots leave the world task here.
        let (world_tx, _world_rx) =
            broadcast::channel::<WorldUpdate>(config::WORLD_BROADCAST_CAPACITY);
        let (state_tx, state_rx) = watch::channel(SessionState::Lobby);
        let shutdown = Arc::new(Notify::new());

        let mut session = Session::new(settings, Box::new(CatalogThemes));
        session.add_player(HOST_PLAYER_ID, PLAYER_COLORS[0]);

        let world = tokio::spawn(world_task(
            session,
            input_rx,
            world_tx.clone(),
            state_tx,
            tick_interval,
            shutdown.clone(),
        ));

        Self {
            transport: None,
            input_tx,
            world_tx,
            state_rx,
            shutdown,
            world,
        }
    }

    async fn start_run(&self) -> Result<()> {
        self.input_tx
            .send(GameEvent::StartRun)
            .await
            .map_err(|_| std::io::Error::other("world task stopped before the run started"))
    }

    /// Session id for peers; `None` for local sessions.
    pub fn identity(&self) -> Option<&str> {
        self.transport.as_ref().map(HostTransport::identity)
    }

    /// Queue for the local player's inputs and session commands.
    pub fn input(&self) -> mpsc::Sender<GameEvent> {
        self.input_tx.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorldUpdate> {
        self.world_tx.subscribe()
    }

    pub fn session_state(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }

    /// Closes the transport first so peers see a clean close, then stops the world task.
    pub async fn shutdown(self) {
        if let Some(transport) = self.transport {
            transport.close().await;
        }
        self.shutdown.notify_one();
        if let Err(e) = self.world.await {
            warn!(error = %e, "world task ended abnormally");
        }
    }
}

fn session_settings() -> SessionSettings {
    SessionSettings {
        loading_delay: config::loading_delay(),
        final_floor: config::final_floor(),
        seed: config::dungeon_seed(),
        ..SessionSettings::default()
    }
}

async fn run_until_interrupted(runtime: SessionRuntime) -> Result<()> {
    let mut state_rx = runtime.session_state();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            res = &mut ctrl_c => {
                res?;
                info!("interrupted; shutting down");
                break;
            }
            changed = state_rx.changed() => {
                if changed.is_err() {
                    warn!("world task stopped");
                    break;
                }
                let state = *state_rx.borrow_and_update();
                if state.is_finished() {
                    info!(?state, "run finished");
                }
            }
        }
    }

    runtime.shutdown().await;
    Ok(())
}

/// Mirrors the host's snapshots and streams the held keys back every tick.
pub async fn run_client(
    host_id: &str,
    connect_timeout: Duration,
    tick_interval: Duration,
) -> std::result::Result<(), NetError> {
    let conn = ClientTransport::open()
        .connect(host_id, connect_timeout)
        .await
        .inspect_err(|e| warn!(%host_id, error = %e, "could not join session"))?;

    let mut view = ClientView::new(conn.identity());
    let result = client_loop(&conn, &mut view, tick_interval).await;
    if let Err(e) = &result {
        view.reset();
        warn!(status = %e, "connection lost; back to lobby");
    }
    conn.close().await;
    result
}

async fn client_loop(
    conn: &ClientConnection,
    view: &mut ClientView,
    tick_interval: Duration,
) -> std::result::Result<(), NetError> {
    // Headless: no keys are ever held. A presentation layer would fill this per frame.
    let held = KeySet::new();
    let mut updates = conn.updates();
    let mut interval = tokio::time::interval(tick_interval);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("interrupted; leaving session");
                return Ok(());
            }
            _ = interval.tick() => conn.send_input(&held)?,
            changed = updates.changed() => {
                if changed.is_err() {
                    return Err(NetError::Disconnected);
                }
                let Some(update) = updates.borrow_and_update().clone() else {
                    continue;
                };
                let (floor, room) = (update.floor, update.room_index);
                let change = view.apply(update);
                if change.started {
                    info!(floor, room, "joined running session");
                } else if change.floor_changed {
                    info!(floor, "descended");
                } else if change.room_changed {
                    info!(room, "entered room");
                }
            }
        }
    }
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let role = config::session_role().map_err(std::io::Error::other)?;
    let tick_interval = config::tick_interval();
    info!(?role, tick_ms = tick_interval.as_millis(), "starting");

    match role {
        Role::None => {
            let runtime = SessionRuntime::start_local(session_settings(), tick_interval).await?;
            run_until_interrupted(runtime).await
        }
        Role::Host => {
            let address = config::host_bind_addr();
            let runtime = SessionRuntime::start_host(&address, session_settings(), tick_interval)
                .await
                .inspect_err(|e| tracing::error!(%address, error = %e, "failed to host"))
                .map_err(std::io::Error::other)?;
            run_until_interrupted(runtime).await
        }
        Role::Client => {
            let host_id = config::host_id().map_err(std::io::Error::other)?;
            run_client(&host_id, config::connect_timeout(), tick_interval)
                .await
                .map_err(std::io::Error::other)
        }
    }
}
