// Door traversal between cleared rooms.

use crate::domain::geometry::Vector2;
use crate::domain::state::{Direction, Door, PlayerEntity, Room};
use crate::domain::tuning::arena::{HEIGHT, INTERACT_RADIUS, TILE_SIZE, WIDTH};

/// Distance from the wall at which the party reappears in the next room.
const ENTRY_INSET: f32 = TILE_SIZE * 2.5;

/// Center of the doorway on the given wall.
pub fn anchor(direction: Direction) -> Vector2 {
    match direction {
        Direction::Up => Vector2::new(WIDTH / 2.0, TILE_SIZE),
        Direction::Down => Vector2::new(WIDTH / 2.0, HEIGHT - TILE_SIZE),
        Direction::Left => Vector2::new(TILE_SIZE, HEIGHT / 2.0),
        Direction::Right => Vector2::new(WIDTH - TILE_SIZE, HEIGHT / 2.0),
    }
}

/// First door (in room order) that a living player is standing in. Closed rooms never yield one.
pub fn find_traversal(room: &Room, players: &[PlayerEntity]) -> Option<Door> {
    if !room.cleared {
        return None;
    }

    room.doors.iter().copied().find(|door| {
        let at = anchor(door.direction);
        players
            .iter()
            .any(|p| !p.is_dead && p.pos.distance(at) < INTERACT_RADIUS)
    })
}

/// Moves every player onto the entry line opposite the door they left by.
/// Only the axis crossing the wall changes; velocities are zeroed.
pub fn teleport_party(players: &mut [PlayerEntity], direction: Direction) {
    for p in players.iter_mut() {
        p.vel = Vector2::ZERO;
        match direction {
            Direction::Up => p.pos.y = HEIGHT - ENTRY_INSET,
            Direction::Down => p.pos.y = ENTRY_INSET,
            Direction::Left => p.pos.x = WIDTH - ENTRY_INSET,
            Direction::Right => p.pos.x = ENTRY_INSET,
        }
    }
}
