// Key-set interpretation for movement intent and shot direction.

use crate::domain::geometry::Vector2;
use crate::domain::state::Direction;
use std::collections::HashSet;

/// Currently held keys, lowercased.
pub type KeySet = HashSet<String>;

// Latin and Cyrillic layouts share physical keys.
const UP_KEYS: [&str; 2] = ["w", "ц"];
const DOWN_KEYS: [&str; 2] = ["s", "ы"];
const LEFT_KEYS: [&str; 2] = ["a", "ф"];
const RIGHT_KEYS: [&str; 2] = ["d", "в"];

// Shot priority follows this order; the first held arrow wins.
const SHOT_KEYS: [(&str, Direction); 4] = [
    ("arrowup", Direction::Up),
    ("arrowdown", Direction::Down),
    ("arrowleft", Direction::Left),
    ("arrowright", Direction::Right),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedInput {
    /// Unit-length (or zero) movement intent.
    pub movement: Vector2,
    pub shot: Option<Direction>,
}

/// Builds a normalized key set from raw key names.
pub fn key_set<I, S>(keys: I) -> KeySet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keys.into_iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

pub fn resolve(keys: &KeySet) -> ResolvedInput {
    let held = |set: &[&str]| set.iter().any(|k| keys.contains(*k));

    let mut movement = Vector2::ZERO;
    if held(&UP_KEYS) {
        movement.y -= 1.0;
    }
    if held(&DOWN_KEYS) {
        movement.y += 1.0;
    }
    if held(&LEFT_KEYS) {
        movement.x -= 1.0;
    }
    if held(&RIGHT_KEYS) {
        movement.x += 1.0;
    }

    let shot = SHOT_KEYS
        .iter()
        .find(|(key, _)| keys.contains(*key))
        .map(|(_, dir)| *dir);

    ResolvedInput {
        movement: movement.normalized(),
        shot,
    }
}
