// Use-case level inputs/outputs for the session loop.

use crate::domain::{Entity, Item, KeySet, PlayerEntity, PlayerId, Projectile};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub enum GameEvent {
    /// Latest held keys for a player. An unseen id joins the session.
    Input { player_id: PlayerId, keys: KeySet },
    Leave { player_id: PlayerId },
    TogglePause,
    /// Begin a fresh run from floor 1.
    StartRun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Lobby,
    Loading,
    Playing,
    Paused,
    GameOver,
    Victory,
}

impl SessionState {
    pub fn is_finished(self) -> bool {
        matches!(self, SessionState::GameOver | SessionState::Victory)
    }
}

/// Which side of a co-op session this process plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    /// Single player; the simulation runs locally with no transport.
    #[default]
    None,
    Host,
    Client,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown session role '{}'", self.0)
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "local" => Ok(Role::None),
            "host" => Ok(Role::Host),
            "client" => Ok(Role::Client),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Immutable view of the active room, produced once per tick while playing.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldUpdate {
    pub tick: u64,
    pub floor: u32,
    pub floor_name: String,
    pub room_index: usize,
    pub players: Vec<PlayerEntity>,
    pub enemies: Vec<Entity>,
    pub projectiles: Vec<Projectile>,
    pub items: Vec<Item>,
    pub doors_open: bool,
}

impl WorldUpdate {
    pub fn player(&self, id: &str) -> Option<&PlayerEntity> {
        self.players.iter().find(|p| p.id == id)
    }
}
