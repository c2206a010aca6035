/// Gameplay tuning for player characters and their tears.
///
/// Keep this separate from runtime/server configuration (tick rates, buffer sizes, etc.).

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// Velocity multiplier applied every tick.
    pub friction: f32,

    /// Share of the `speed` stat added to velocity per tick of held movement.
    pub acceleration: f32,

    /// Minimum distance kept from the playfield edge.
    pub wall_margin: f32,

    /// Collision radius used for enemy hits.
    pub radius: f32,

    /// Lower bound on the delay between shots, in milliseconds.
    pub min_fire_delay_ms: u64,

    /// Milliseconds of delay contributed by each point of `fire_rate`.
    pub fire_delay_per_rate_ms: f32,

    /// Base tear speed before the `shot_speed` stat is added.
    pub base_shot_speed: f32,

    /// Share of the shooter's velocity inherited by a new tear.
    pub shot_inheritance: f32,

    /// Tear radius before damage scaling.
    pub base_shot_size: f32,

    /// Extra tear radius per point of damage.
    pub shot_size_per_damage: f32,

    /// Pixels of travel per point of `range`.
    pub range_scale: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            friction: 0.85,
            acceleration: 0.5,
            wall_margin: super::arena::TILE_SIZE + 15.0,
            radius: 10.0,
            min_fire_delay_ms: 200,
            fire_delay_per_rate_ms: 60.0,
            base_shot_speed: 8.0,
            shot_inheritance: 0.3,
            base_shot_size: 5.0,
            shot_size_per_damage: 0.5,
            range_scale: 30.0,
        }
    }
}

/// Display colors handed out to players in join order.
pub const PLAYER_COLORS: [&str; 4] = ["#fce4d6", "#a9dfbf", "#aed6f1", "#f9e79f"];

pub const TEAR_COLOR: &str = "#3498db";
