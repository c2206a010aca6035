/// Gameplay tuning for enemy movement, contact damage and ranged attacks.

#[derive(Debug, Clone, Copy)]
pub struct EnemyTuning {
    /// Velocity multiplier applied every tick.
    pub friction: f32,

    /// Chase acceleration for flies.
    pub fly_acceleration: f32,

    /// Chase acceleration for every other kind.
    pub chase_acceleration: f32,

    /// Extra reach beyond the enemy radius for contact damage.
    pub contact_reach: f32,

    /// Per-tick chance that an enemy in contact lands a hit.
    pub contact_chance: f64,

    /// Knockback multiplier on the enemy-to-player offset after contact.
    pub contact_knockback: f32,

    /// Chance that a dying enemy leaves a coin behind.
    pub coin_drop_chance: f64,

    /// Ticks between pooter shots.
    pub pooter_fire_interval: u32,

    /// Ticks between boss volleys.
    pub boss_fire_interval: u32,

    /// Angle between the shots of a boss volley, in radians.
    pub boss_spread: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            friction: 0.9,
            fly_acceleration: 0.1,
            chase_acceleration: 0.15,
            contact_reach: 15.0,
            contact_chance: 0.05,
            contact_knockback: 3.0,
            coin_drop_chance: 0.3,
            pooter_fire_interval: 90,
            boss_fire_interval: 60,
            boss_spread: 0.25,
        }
    }
}
