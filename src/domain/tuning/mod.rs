// Gameplay tuning, kept apart from runtime/server configuration.

pub mod arena;
pub mod enemy;
pub mod player;
pub mod projectile;

pub use enemy::EnemyTuning;
pub use player::PlayerTuning;
pub use projectile::ProjectileTuning;

/// Every tuning table the simulation consults during a tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub projectile: ProjectileTuning,
    pub enemy: EnemyTuning,
}
