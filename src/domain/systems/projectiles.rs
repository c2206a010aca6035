use crate::domain::events::TickEvent;
use crate::domain::state::{Entity, PlayerEntity, Projectile, ProjectileOwner};
use crate::domain::tuning::arena;
use crate::domain::tuning::{PlayerTuning, ProjectileTuning};
use tracing::debug;

/// Advances every projectile in the room and resolves hits.
///
/// A shot damages every target it overlaps on the tick it connects: tears hit
/// enemies, enemy shots hit living players. Either way the projectile is consumed.
pub fn tick_projectiles(
    projectiles: &mut Vec<Projectile>,
    enemies: &mut [Entity],
    players: &mut [PlayerEntity],
    cfg: &ProjectileTuning,
    player_cfg: &PlayerTuning,
) -> Vec<TickEvent> {
    let mut events = Vec::new();

    projectiles.retain_mut(|p| {
        p.pos += p.vel;
        p.distance_traveled += p.vel.length();
        p.vel *= cfg.friction;

        if !arena::in_bounds(p.pos) || p.distance_traveled > p.range {
            return false;
        }

        let hit = match p.owner {
            ProjectileOwner::Player => hit_enemies(p, enemies, cfg),
            ProjectileOwner::Enemy => hit_player(p, players, cfg, player_cfg, &mut events),
        };
        !hit
    });

    events
}

fn hit_enemies(p: &Projectile, enemies: &mut [Entity], cfg: &ProjectileTuning) -> bool {
    let mut hit = false;
    for e in enemies.iter_mut() {
        // The trapdoor is scenery, not a target. Enemies killed earlier this tick
        // still absorb tears until the enemy pass removes them.
        if e.kind.is_trapdoor() {
            continue;
        }
        if p.pos.distance(e.pos) < e.size + p.size {
            e.hp -= p.damage;
            e.vel += p.vel * cfg.enemy_impulse;
            hit = true;
            debug!(enemy_id = e.id, projectile_id = p.id, enemy_hp = e.hp, "enemy hit");
        }
    }
    hit
}

fn hit_player(
    p: &Projectile,
    players: &mut [PlayerEntity],
    cfg: &ProjectileTuning,
    player_cfg: &PlayerTuning,
    events: &mut Vec<TickEvent>,
) -> bool {
    let mut hit = false;
    for victim in players.iter_mut().filter(|pl| !pl.is_dead) {
        if p.pos.distance(victim.pos) >= player_cfg.radius + p.size {
            continue;
        }
        hit = true;
        victim.vel += p.vel * cfg.player_knockback;
        if victim.hurt(1) {
            events.push(TickEvent::PlayerDied {
                player_id: victim.id.clone(),
            });
        }
        debug!(
            player_id = %victim.id,
            projectile_id = p.id,
            player_hp = victim.stats.current_hp,
            "player hit"
        );
    }
    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::Vector2;
    use crate::domain::state::{EntityKind, PlayerStats};

    fn tear(pos: Vector2, vel: Vector2, range: f32) -> Projectile {
        Projectile {
            id: 1,
            owner: ProjectileOwner::Player,
            pos,
            vel,
            size: 7.0,
            damage: 4.0,
            color: "#3498db".to_string(),
            range,
            distance_traveled: 0.0,
        }
    }

    fn enemy(pos: Vector2, hp: f32) -> Entity {
        Entity {
            id: 5,
            kind: EntityKind::Gaper,
            pos,
            vel: Vector2::ZERO,
            size: 18.0,
            hp,
            max_hp: hp,
            damage: 1.0,
            color: "#d35400".to_string(),
            state_timer: 0,
        }
    }

    #[test]
    fn when_tear_flies_vertically_then_it_is_gone_within_range_over_speed_ticks() {
        let cfg = ProjectileTuning::default();
        let player_cfg = PlayerTuning::default();
        let mut projectiles = vec![tear(arena::CENTER, Vector2::new(0.0, -8.0), 450.0)];
        let limit = (450.0f32 / 8.0).ceil() as usize;

        let mut removed_at = None;
        for tick in 1..=limit {
            tick_projectiles(&mut projectiles, &mut [], &mut [], &cfg, &player_cfg);
            if projectiles.is_empty() {
                removed_at = Some(tick);
                break;
            }
        }
        assert!(removed_at.is_some());
    }

    #[test]
    fn when_range_is_short_then_tear_expires_before_the_wall() {
        let cfg = ProjectileTuning::default();
        let player_cfg = PlayerTuning::default();
        let mut projectiles = vec![tear(arena::CENTER, Vector2::new(8.0, 0.0), 40.0)];

        for _ in 0..4 {
            tick_projectiles(&mut projectiles, &mut [], &mut [], &cfg, &player_cfg);
        }
        // About 31.5px travelled after four ticks.
        assert_eq!(projectiles.len(), 1);
        for _ in 0..2 {
            tick_projectiles(&mut projectiles, &mut [], &mut [], &cfg, &player_cfg);
        }
        assert!(projectiles.is_empty());
    }

    #[test]
    fn when_tear_overlaps_enemy_then_enemy_takes_damage_and_impulse() {
        let cfg = ProjectileTuning::default();
        let player_cfg = PlayerTuning::default();
        let mut enemies = vec![enemy(Vector2::new(410.0, 300.0), 10.0)];
        let mut projectiles = vec![tear(arena::CENTER, Vector2::new(5.0, 0.0), 450.0)];

        tick_projectiles(&mut projectiles, &mut enemies, &mut [], &cfg, &player_cfg);

        assert!(projectiles.is_empty());
        assert_eq!(enemies[0].hp, 6.0);
        assert!(enemies[0].vel.x > 0.0);
    }

    #[test]
    fn when_tear_overlaps_trapdoor_then_it_passes_through() {
        let cfg = ProjectileTuning::default();
        let player_cfg = PlayerTuning::default();
        let mut trapdoor = enemy(arena::CENTER, 0.0);
        trapdoor.kind = EntityKind::Trapdoor;
        let mut enemies = vec![trapdoor];
        let mut projectiles = vec![tear(arena::CENTER, Vector2::new(1.0, 0.0), 450.0)];

        tick_projectiles(&mut projectiles, &mut enemies, &mut [], &cfg, &player_cfg);

        assert_eq!(projectiles.len(), 1);
    }

    #[test]
    fn when_enemy_shot_hits_player_then_exactly_one_hp_is_lost() {
        let cfg = ProjectileTuning::default();
        let player_cfg = PlayerTuning::default();
        let mut players = vec![PlayerEntity::new(
            "p1",
            Vector2::new(404.0, 300.0),
            PlayerStats::default(),
            "#fff",
        )];
        let mut shot = tear(arena::CENTER, Vector2::new(4.0, 0.0), 400.0);
        shot.owner = ProjectileOwner::Enemy;
        shot.damage = 5.0;
        let mut projectiles = vec![shot];

        let events =
            tick_projectiles(&mut projectiles, &mut [], &mut players, &cfg, &player_cfg);

        assert!(projectiles.is_empty());
        assert_eq!(players[0].stats.current_hp, 5);
        assert!(players[0].vel.x > 0.0);
        assert!(events.is_empty());
    }

    #[test]
    fn when_last_hp_is_lost_then_player_is_marked_dead() {
        let cfg = ProjectileTuning::default();
        let player_cfg = PlayerTuning::default();
        let mut stats = PlayerStats::default();
        stats.current_hp = 1;
        let mut players = vec![PlayerEntity::new("p1", arena::CENTER, stats, "#fff")];
        let mut shot = tear(arena::CENTER, Vector2::new(1.0, 0.0), 400.0);
        shot.owner = ProjectileOwner::Enemy;
        let mut projectiles = vec![shot];

        let events =
            tick_projectiles(&mut projectiles, &mut [], &mut players, &cfg, &player_cfg);

        assert!(players[0].is_dead);
        assert_eq!(players[0].stats.current_hp, 0);
        assert_eq!(
            events,
            vec![TickEvent::PlayerDied {
                player_id: "p1".to_string()
            }]
        );
    }

    #[test]
    fn when_enemy_shot_overlaps_two_players_then_both_lose_one_hp() {
        let cfg = ProjectileTuning::default();
        let player_cfg = PlayerTuning::default();
        let spot = Vector2::new(404.0, 300.0);
        let mut players = vec![
            PlayerEntity::new("p1", spot, PlayerStats::default(), "#fff"),
            PlayerEntity::new("p2", spot, PlayerStats::default(), "#fff"),
        ];
        let mut shot = tear(arena::CENTER, Vector2::new(4.0, 0.0), 400.0);
        shot.owner = ProjectileOwner::Enemy;
        let mut projectiles = vec![shot];

        tick_projectiles(&mut projectiles, &mut [], &mut players, &cfg, &player_cfg);

        assert!(projectiles.is_empty());
        assert_eq!(players[0].stats.current_hp, 5);
        assert_eq!(players[1].stats.current_hp, 5);
    }

    #[test]
    fn when_enemy_shot_overlaps_a_dead_player_then_only_the_living_are_hurt() {
        let cfg = ProjectileTuning::default();
        let player_cfg = PlayerTuning::default();
        let spot = Vector2::new(404.0, 300.0);
        let mut ghost = PlayerEntity::new("p1", spot, PlayerStats::default(), "#fff");
        ghost.hurt(6);
        let mut players = vec![
            ghost,
            PlayerEntity::new("p2", spot, PlayerStats::default(), "#fff"),
        ];
        let mut shot = tear(arena::CENTER, Vector2::new(4.0, 0.0), 400.0);
        shot.owner = ProjectileOwner::Enemy;
        let mut projectiles = vec![shot];

        tick_projectiles(&mut projectiles, &mut [], &mut players, &cfg, &player_cfg);

        assert_eq!(players[0].stats.current_hp, 0);
        assert_eq!(players[1].stats.current_hp, 5);
    }

    #[test]
    fn when_tear_overlaps_two_enemies_then_both_take_damage() {
        let cfg = ProjectileTuning::default();
        let player_cfg = PlayerTuning::default();
        let mut enemies = vec![
            enemy(Vector2::new(410.0, 300.0), 10.0),
            enemy(Vector2::new(410.0, 305.0), 10.0),
        ];
        let mut projectiles = vec![tear(arena::CENTER, Vector2::new(5.0, 0.0), 450.0)];

        tick_projectiles(&mut projectiles, &mut enemies, &mut [], &cfg, &player_cfg);

        assert!(projectiles.is_empty());
        assert_eq!(enemies[0].hp, 6.0);
        assert_eq!(enemies[1].hp, 6.0);
    }

    #[test]
    fn when_enemy_died_earlier_in_the_tick_then_it_still_absorbs_a_tear() {
        let cfg = ProjectileTuning::default();
        let player_cfg = PlayerTuning::default();
        let mut enemies = vec![enemy(Vector2::new(410.0, 300.0), 0.0)];
        let mut projectiles = vec![tear(arena::CENTER, Vector2::new(5.0, 0.0), 450.0)];

        tick_projectiles(&mut projectiles, &mut enemies, &mut [], &cfg, &player_cfg);

        assert!(projectiles.is_empty());
        assert_eq!(enemies[0].hp, -4.0);
    }
}
