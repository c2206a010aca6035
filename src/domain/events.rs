// Outcomes of a simulation tick that the session controller reacts to.

use super::state::{EntityId, PlayerId};

#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    /// The active room just lost its last hostile.
    RoomCleared { room_index: usize },
    /// The party walked through a door.
    RoomChanged { from: usize, to: usize },
    ItemClaimed {
        player_id: PlayerId,
        item_id: EntityId,
        name: String,
    },
    PlayerDied { player_id: PlayerId },
    /// Someone stepped on the trapdoor; the whole session moves down a floor.
    FloorAdvanceRequested,
    /// Every connected player is dead.
    Defeat,
}
