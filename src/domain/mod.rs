// Domain layer: dungeon data model, generation and the per-tick rules.

pub mod dungeon;
pub mod events;
pub mod geometry;
pub mod state;
pub mod systems;
pub mod tuning;

pub use events::TickEvent;
pub use geometry::Vector2;
pub use state::{
    Direction, Door, Entity, EntityId, EntityKind, Floor, GridPos, Item, ItemKind, PlayerEntity,
    PlayerId, PlayerStats, Projectile, ProjectileOwner, Room, RoomType, StatModifiers,
};
pub use systems::input::{KeySet, key_set};
pub use tuning::Tuning;

/// Random source threaded through generation and simulation.
pub type GameRng = rand_chacha::ChaCha8Rng;
