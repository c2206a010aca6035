// Item templates for treasure rooms, shops and enemy drops.

use crate::domain::geometry::Vector2;
use crate::domain::state::{EntityId, Item, ItemKind, StatModifiers};
use rand::Rng;
use rand::seq::IndexedRandom;

pub const HEART_PRICE: i32 = 3;
pub const PASSIVE_PRICE: i32 = 15;

struct PassiveTemplate {
    name: &'static str,
    description: &'static str,
    modifiers: StatModifiers,
}

static PASSIVE_POOL: [PassiveTemplate; 6] = [
    PassiveTemplate {
        name: "Spoon Bender",
        description: "Homing shots",
        modifiers: StatModifiers {
            range: 5.0,
            shot_speed: -0.5,
            ..NO_MODIFIERS
        },
    },
    PassiveTemplate {
        name: "Magic Mushroom",
        description: "All stats up!",
        modifiers: StatModifiers {
            damage: 1.0,
            speed: 0.3,
            hp: 2,
            range: 2.0,
            ..NO_MODIFIERS
        },
    },
    PassiveTemplate {
        name: "Pentagram",
        description: "Dmg up",
        modifiers: StatModifiers {
            damage: 1.5,
            ..NO_MODIFIERS
        },
    },
    PassiveTemplate {
        name: "Breakfast",
        description: "Hp up",
        modifiers: StatModifiers {
            hp: 2,
            ..NO_MODIFIERS
        },
    },
    PassiveTemplate {
        name: "Belt",
        description: "Speed up",
        modifiers: StatModifiers {
            speed: 0.3,
            ..NO_MODIFIERS
        },
    },
    PassiveTemplate {
        name: "Wire Coat Hanger",
        description: "Tears up",
        modifiers: StatModifiers {
            fire_rate: -1.0,
            ..NO_MODIFIERS
        },
    },
];

const NO_MODIFIERS: StatModifiers = StatModifiers {
    speed: 0.0,
    damage: 0.0,
    fire_rate: 0.0,
    range: 0.0,
    shot_speed: 0.0,
    hp: 0,
    coins: 0,
};

/// Draws a passive from the pool. `cost` is `None` for treasure-room loot.
pub fn random_passive<R: Rng + ?Sized>(
    rng: &mut R,
    id: EntityId,
    pos: Vector2,
    cost: Option<i32>,
) -> Item {
    // The pool is a non-empty const array.
    let template = PASSIVE_POOL.choose(rng).unwrap_or(&PASSIVE_POOL[0]);
    Item {
        id,
        name: template.name.to_string(),
        description: template.description.to_string(),
        kind: ItemKind::Passive,
        modifiers: Some(template.modifiers),
        cost,
        pos,
    }
}

pub fn heart(id: EntityId, pos: Vector2, cost: Option<i32>) -> Item {
    Item {
        id,
        name: "Heart".to_string(),
        description: "Heal 1 Heart".to_string(),
        kind: ItemKind::Pickup,
        modifiers: Some(StatModifiers {
            hp: 2,
            ..NO_MODIFIERS
        }),
        cost,
        pos,
    }
}

pub fn penny(id: EntityId, pos: Vector2) -> Item {
    Item {
        id,
        name: "Penny".to_string(),
        description: "+1 Coin".to_string(),
        kind: ItemKind::Pickup,
        modifiers: Some(StatModifiers {
            coins: 1,
            ..NO_MODIFIERS
        }),
        cost: None,
        pos,
    }
}

/// One shop slot: a heart with probability 0.7, otherwise an expensive passive.
pub fn shop_item<R: Rng + ?Sized>(rng: &mut R, id: EntityId, pos: Vector2) -> Item {
    if rng.random::<f32>() > 0.3 {
        heart(id, pos, Some(HEART_PRICE))
    } else {
        random_passive(rng, id, pos, Some(PASSIVE_PRICE))
    }
}
