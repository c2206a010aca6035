use crate::use_cases::GameEvent;
use axum::extract::ws::Utf8Bytes;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{broadcast, mpsc, watch};

/// Shared state handed to every host-side socket.
#[derive(Clone)]
pub struct AppState {
    // Inputs flowing from peers into the world task.
    pub input_tx: mpsc::Sender<GameEvent>,
    // Serialized snapshots, shared across all peers.
    pub world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    // Latest serialized snapshot for lag recovery.
    pub world_latest_tx: watch::Sender<Utf8Bytes>,
    // Flips to true when the host transport is closing.
    pub closing_rx: watch::Receiver<bool>,
    pub peers: Arc<PeerSlots>,
}

/// Counts connected peers against a fixed cap.
#[derive(Debug)]
pub struct PeerSlots {
    max: usize,
    used: AtomicUsize,
}

impl PeerSlots {
    pub fn new(max: usize) -> Self {
        Self {
            max,
            used: AtomicUsize::new(0),
        }
    }

    /// Claims a slot; the slot frees itself when the guard drops.
    pub fn try_claim(self: &Arc<Self>) -> Option<PeerSlot> {
        self.used
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                (used < self.max).then_some(used + 1)
            })
            .ok()
            .map(|_| PeerSlot(self.clone()))
    }

    pub fn in_use(&self) -> usize {
        self.used.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct PeerSlot(Arc<PeerSlots>);

impl Drop for PeerSlot {
    fn drop(&mut self) {
        self.0.used.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_slots_run_out_then_claims_fail_until_one_is_released() {
        let slots = Arc::new(PeerSlots::new(1));
        let first = slots.try_claim();
        assert!(first.is_some());
        assert!(slots.try_claim().is_none());
        drop(first);
        assert_eq!(slots.in_use(), 0);
        assert!(slots.try_claim().is_some());
    }
}
