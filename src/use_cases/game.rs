use super::session::Session;
use super::types::{GameEvent, SessionState, WorldUpdate};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, broadcast, mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info};

/// Fixed-step loop that owns the session. Events queued since the last tick are applied
/// before the step; snapshots leave through `world_tx` while the session is playing.
pub async fn world_task(
    mut session: Session,
    mut input_rx: mpsc::Receiver<GameEvent>,
    world_tx: broadcast::Sender<WorldUpdate>,
    session_state_tx: watch::Sender<SessionState>,
    tick_interval: Duration,
    shutdown: Arc<Notify>,
) {
    let started = Instant::now();
    let mut tick: u64 = 0;
    let mut interval = tokio::time::interval(tick_interval);

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                info!(tick, "world task stopping");
                break;
            }
            _ = interval.tick() => {}
        }

        let now = started.elapsed();
        while let Ok(ev) = input_rx.try_recv() {
            session.handle(ev, now);
        }

        let events = session.tick(now);
        if !events.is_empty() {
            debug!(tick, ?events, "tick events");
        }

        let state = session.state();
        session_state_tx.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            let previous = *current;
            info!(from = ?previous, to = ?state, "session state changed");
            *current = state;
            true
        });

        tick += 1;
        if let Some(update) = session.snapshot(tick) {
            // No subscribers is fine; the host may be alone.
            let _ = world_tx.send(update);
        }
    }
}
