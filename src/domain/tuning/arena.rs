// Playfield geometry shared by the generator and every simulation stage.
use crate::domain::geometry::Vector2;

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 600.0;
pub const TILE_SIZE: f32 = 40.0;

/// Reach used for doors, items and the trapdoor.
pub const INTERACT_RADIUS: f32 = 30.0;

pub const CENTER: Vector2 = Vector2::new(WIDTH / 2.0, HEIGHT / 2.0);

/// Projectiles beyond the wall tiles are discarded.
pub fn in_bounds(pos: Vector2) -> bool {
    pos.x >= TILE_SIZE
        && pos.x <= WIDTH - TILE_SIZE
        && pos.y >= TILE_SIZE
        && pos.y <= HEIGHT - TILE_SIZE
}

/// Clamps a position to the floor area, `margin` pixels away from every edge.
pub fn clamp_inside(pos: Vector2, margin: f32) -> Vector2 {
    pos.clamp(
        Vector2::new(margin, margin),
        Vector2::new(WIDTH - margin, HEIGHT - margin),
    )
}
