use crate::domain::state::{
    Direction, EntityId, PlayerEntity, PlayerId, Projectile, ProjectileOwner, take_entity_id,
};
use crate::domain::tuning::PlayerTuning;
use crate::domain::tuning::player::TEAR_COLOR;
use std::collections::HashMap;
use std::time::Duration;

/// Last shot time per player, measured on the session clock.
pub type ShotCooldowns = HashMap<PlayerId, Duration>;

pub fn fire_delay(p: &PlayerEntity, cfg: &PlayerTuning) -> Duration {
    let rate_ms = (p.stats.fire_rate * cfg.fire_delay_per_rate_ms).max(0.0) as u64;
    Duration::from_millis(rate_ms.max(cfg.min_fire_delay_ms))
}

/// Spawns a tear if `shot` is held and the player's cooldown has elapsed.
pub fn try_fire(
    p: &PlayerEntity,
    shot: Option<Direction>,
    now: Duration,
    cooldowns: &mut ShotCooldowns,
    next_id: &mut EntityId,
    cfg: &PlayerTuning,
) -> Option<Projectile> {
    let direction = shot?;
    if let Some(last) = cooldowns.get(&p.id) {
        if now.saturating_sub(*last) <= fire_delay(p, cfg) {
            return None;
        }
    }

    cooldowns.insert(p.id.clone(), now);
    let id = take_entity_id(next_id);

    let speed = cfg.base_shot_speed + p.stats.shot_speed;
    Some(Projectile {
        id,
        owner: ProjectileOwner::Player,
        pos: p.pos,
        vel: direction.unit() * speed + p.vel * cfg.shot_inheritance,
        size: cfg.base_shot_size + p.stats.damage * cfg.shot_size_per_damage,
        damage: p.stats.damage,
        color: TEAR_COLOR.to_string(),
        range: p.stats.range * cfg.range_scale,
        distance_traveled: 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::Vector2;
    use crate::domain::state::PlayerStats;

    fn shooter() -> PlayerEntity {
        PlayerEntity::new("p1", Vector2::new(400.0, 300.0), PlayerStats::default(), "#fff")
    }

    #[test]
    fn when_fire_rate_is_low_then_delay_is_floored() {
        let cfg = PlayerTuning::default();
        let mut p = shooter();
        p.stats.fire_rate = 1.0;
        assert_eq!(fire_delay(&p, &cfg), Duration::from_millis(200));
        p.stats.fire_rate = 5.0;
        assert_eq!(fire_delay(&p, &cfg), Duration::from_millis(300));
    }

    #[test]
    fn when_shooting_then_tear_derives_from_stats() {
        let cfg = PlayerTuning::default();
        let p = shooter();
        let mut cooldowns = ShotCooldowns::new();
        let mut next_id = 10;
        let now = Duration::from_secs(1);
        let tear = try_fire(&p, Some(Direction::Up), now, &mut cooldowns, &mut next_id, &cfg)
            .expect("first shot should fire");
        assert_eq!(tear.id, 10);
        assert_eq!(next_id, 11);
        assert_eq!(tear.vel, Vector2::new(0.0, -9.0));
        assert_eq!(tear.size, 7.0);
        assert_eq!(tear.range, 450.0);
        assert_eq!(tear.owner, ProjectileOwner::Player);
    }

    #[test]
    fn when_cooldown_has_not_elapsed_then_no_tear_spawns() {
        let cfg = PlayerTuning::default();
        let p = shooter();
        let mut cooldowns = ShotCooldowns::new();
        let mut next_id = 1;
        let left = Some(Direction::Left);
        let t0 = Duration::from_secs(5);
        assert!(try_fire(&p, left, t0, &mut cooldowns, &mut next_id, &cfg).is_some());
        let early = t0 + Duration::from_millis(250);
        assert!(try_fire(&p, left, early, &mut cooldowns, &mut next_id, &cfg).is_none());
        let later = t0 + Duration::from_millis(301);
        assert!(try_fire(&p, left, later, &mut cooldowns, &mut next_id, &cfg).is_some());
    }

    #[test]
    fn when_cooldowns_are_tracked_then_players_do_not_share_them() {
        let cfg = PlayerTuning::default();
        let a = shooter();
        let mut b = shooter();
        b.id = "p2".to_string();
        let mut cooldowns = ShotCooldowns::new();
        let mut next_id = 1;
        let (up, now) = (Some(Direction::Up), Duration::from_secs(1));
        assert!(try_fire(&a, up, now, &mut cooldowns, &mut next_id, &cfg).is_some());
        assert!(try_fire(&b, up, now, &mut cooldowns, &mut next_id, &cfg).is_some());
    }
}
