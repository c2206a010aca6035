// Enemy roster and per-floor scaling for room population.

use crate::domain::geometry::Vector2;
use crate::domain::state::{Entity, EntityId, EntityKind};
use crate::domain::tuning::arena::{CENTER, HEIGHT, WIDTH};
use rand::Rng;

/// Distance kept from the walls when scattering spawns.
const SPAWN_INSET: f32 = 100.0;

struct EnemyBaseline {
    kind: EntityKind,
    // Upper bound of this entry on the cumulative roll.
    threshold: f32,
    hp: f32,
    hp_per_floor: f32,
    size: f32,
    color: &'static str,
}

static ROSTER: [EnemyBaseline; 5] = [
    EnemyBaseline {
        kind: EntityKind::Fly,
        threshold: 0.3,
        hp: 6.0,
        hp_per_floor: 1.0,
        size: 12.0,
        color: "#7f8c8d",
    },
    EnemyBaseline {
        kind: EntityKind::Spider,
        threshold: 0.5,
        hp: 8.0,
        hp_per_floor: 1.0,
        size: 14.0,
        color: "#2c3e50",
    },
    EnemyBaseline {
        kind: EntityKind::Gaper,
        threshold: 0.7,
        hp: 12.0,
        hp_per_floor: 2.0,
        size: 18.0,
        color: "#d35400",
    },
    EnemyBaseline {
        kind: EntityKind::Clotty,
        threshold: 0.85,
        hp: 15.0,
        hp_per_floor: 2.0,
        size: 20.0,
        color: "#c0392b",
    },
    EnemyBaseline {
        kind: EntityKind::Pooter,
        threshold: 1.0,
        hp: 10.0,
        hp_per_floor: 1.0,
        size: 16.0,
        color: "#8e44ad",
    },
];

pub const BOSS_COLOR: &str = "#8e44ad";
pub const TRAPDOOR_SIZE: f32 = 30.0;

/// How many enemies a NORMAL room on `floor` receives for a given roll in [0, 1).
pub fn enemy_count(floor: u32, roll: f32) -> usize {
    1 + (roll * 2.0 + floor as f32 * 0.4).floor() as usize
}

fn baseline_for(roll: f32) -> &'static EnemyBaseline {
    ROSTER
        .iter()
        .find(|b| roll < b.threshold)
        .unwrap_or(&ROSTER[ROSTER.len() - 1])
}

/// Maps a roll in [0, 1) onto the weighted roster.
pub fn roll_kind(roll: f32) -> EntityKind {
    baseline_for(roll).kind
}

pub fn spawn_enemy<R: Rng + ?Sized>(rng: &mut R, id: EntityId, floor: u32) -> Entity {
    let baseline = baseline_for(rng.random::<f32>());
    let hp = baseline.hp + baseline.hp_per_floor * floor as f32;
    let pos = Vector2::new(
        SPAWN_INSET + rng.random::<f32>() * (WIDTH - 2.0 * SPAWN_INSET),
        SPAWN_INSET + rng.random::<f32>() * (HEIGHT - 2.0 * SPAWN_INSET),
    );

    Entity {
        id,
        kind: baseline.kind,
        pos,
        vel: Vector2::ZERO,
        size: baseline.size,
        hp,
        max_hp: hp,
        damage: 1.0,
        color: baseline.color.to_string(),
        state_timer: 0,
    }
}

pub fn spawn_boss(id: EntityId, floor: u32) -> Entity {
    let hp = 60.0 + floor as f32 * 15.0;
    Entity {
        id,
        kind: EntityKind::Boss,
        pos: CENTER,
        vel: Vector2::ZERO,
        size: 45.0,
        hp,
        max_hp: hp,
        damage: 2.0,
        color: BOSS_COLOR.to_string(),
        state_timer: 0,
    }
}

pub fn spawn_trapdoor(id: EntityId) -> Entity {
    Entity {
        id,
        kind: EntityKind::Trapdoor,
        pos: CENTER,
        vel: Vector2::ZERO,
        size: TRAPDOOR_SIZE,
        hp: 0.0,
        max_hp: 0.0,
        damage: 0.0,
        color: "black".to_string(),
        state_timer: 0,
    }
}
