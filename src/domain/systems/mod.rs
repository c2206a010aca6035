// Per-stage simulation systems. Each one mutates the active room or the party and
// reports what happened as `TickEvent`s.

pub mod doors;
pub mod enemies;
pub mod input;
pub mod movement;
pub mod pickups;
pub mod projectiles;
pub mod shooting;
