use super::types::{SessionState, WorldUpdate};
use crate::domain::{PlayerEntity, PlayerStats};

/// What changed when a snapshot was mirrored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewChange {
    /// First snapshot of this connection.
    pub started: bool,
    pub room_changed: bool,
    pub floor_changed: bool,
}

/// Client-side mirror of the host's world. Holds the newest snapshot only.
#[derive(Debug, Clone)]
pub struct ClientView {
    my_id: String,
    state: SessionState,
    world: Option<WorldUpdate>,
}

impl ClientView {
    pub fn new(my_id: impl Into<String>) -> Self {
        Self {
            my_id: my_id.into(),
            state: SessionState::Lobby,
            world: None,
        }
    }

    /// Replaces the mirrored world wholesale. Older ticks than the one held are
    /// dropped so a reordered snapshot never rolls the view back.
    pub fn apply(&mut self, update: WorldUpdate) -> ViewChange {
        let mut change = ViewChange::default();
        match &self.world {
            Some(held) if is_stale(held, &update) => return change,
            Some(held) => {
                change.room_changed = held.room_index != update.room_index;
                change.floor_changed = held.floor != update.floor;
            }
            None => change.started = true,
        }
        if self.state == SessionState::Lobby {
            self.state = SessionState::Playing;
        }
        self.world = Some(update);
        change
    }

    /// Back to the pre-game view, e.g. after the host link drops.
    pub fn reset(&mut self) {
        self.state = SessionState::Lobby;
        self.world = None;
    }

    pub fn my_id(&self) -> &str {
        &self.my_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn world(&self) -> Option<&WorldUpdate> {
        self.world.as_ref()
    }

    pub fn room_index(&self) -> Option<usize> {
        self.world.as_ref().map(|w| w.room_index)
    }

    pub fn my_player(&self) -> Option<&PlayerEntity> {
        self.world.as_ref()?.player(&self.my_id)
    }

    pub fn my_stats(&self) -> Option<&PlayerStats> {
        self.my_player().map(|p| &p.stats)
    }
}

// Ticks restart with a new host, and a new floor always wins.
fn is_stale(held: &WorldUpdate, update: &WorldUpdate) -> bool {
    update.tick != 0 && update.tick < held.tick && update.floor == held.floor
}
