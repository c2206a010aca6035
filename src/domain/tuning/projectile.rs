/// Gameplay tuning for projectiles in flight.

#[derive(Debug, Clone, Copy)]
pub struct ProjectileTuning {
    /// Velocity multiplier applied every tick (weaker than player friction).
    pub friction: f32,

    /// Share of a tear's velocity transferred to the enemy it hits.
    pub enemy_impulse: f32,

    /// Share of an enemy shot's velocity transferred to the player it hits.
    pub player_knockback: f32,

    /// Launch speed of enemy shots.
    pub enemy_shot_speed: f32,

    /// Collision radius of enemy shots.
    pub enemy_shot_size: f32,

    /// Travel distance before an enemy shot fizzles.
    pub enemy_shot_range: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            friction: 0.99,
            enemy_impulse: 0.3,
            player_knockback: 0.5,
            enemy_shot_speed: 4.0,
            enemy_shot_size: 6.0,
            enemy_shot_range: 400.0,
        }
    }
}

pub const ENEMY_TEAR_COLOR: &str = "#e74c3c";
