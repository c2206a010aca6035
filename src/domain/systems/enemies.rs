use crate::domain::dungeon::items::penny;
use crate::domain::dungeon::population::spawn_trapdoor;
use crate::domain::events::TickEvent;
use crate::domain::geometry::Vector2;
use crate::domain::state::{
    Entity, EntityId, EntityKind, PlayerEntity, Projectile, ProjectileOwner, Room, RoomType,
    take_entity_id,
};
use crate::domain::tuning::arena;
use crate::domain::tuning::projectile::ENEMY_TEAR_COLOR;
use crate::domain::tuning::{EnemyTuning, ProjectileTuning};
use rand::Rng;
use tracing::debug;

/// Removes dead enemies, runs the trapdoor check, and drives chase, contact damage
/// and ranged attacks for the survivors.
pub fn tick_enemies<R: Rng + ?Sized>(
    room: &mut Room,
    players: &mut [PlayerEntity],
    next_id: &mut EntityId,
    rng: &mut R,
    cfg: &EnemyTuning,
    projectile_cfg: &ProjectileTuning,
) -> Vec<TickEvent> {
    let mut events = Vec::new();
    let mut trapdoor_touched = false;

    // Walk backwards so removals do not disturb the indices still to visit.
    let mut i = room.enemies.len();
    while i > 0 {
        i -= 1;

        if room.enemies[i].kind.is_trapdoor() {
            let pos = room.enemies[i].pos;
            // Any player counts, including the fallen.
            trapdoor_touched |= players
                .iter()
                .any(|p| p.pos.distance(pos) < arena::INTERACT_RADIUS);
            continue;
        }

        if room.enemies[i].hp <= 0.0 {
            let dead = room.enemies.remove(i);
            debug!(enemy_id = dead.id, kind = ?dead.kind, "enemy died");
            if rng.random_bool(cfg.coin_drop_chance) {
                room.items.push(penny(take_entity_id(next_id), dead.pos));
            }
            continue;
        }

        let e = &mut room.enemies[i];
        if let Some(target) = nearest_living(players, e.pos) {
            let victim = &mut players[target];
            let angle = e.pos.angle_to(victim.pos);
            let accel = match e.kind {
                EntityKind::Fly => cfg.fly_acceleration,
                _ => cfg.chase_acceleration,
            };
            e.vel += Vector2::from_angle(angle) * accel;

            if e.pos.distance(victim.pos) < e.size + cfg.contact_reach
                && rng.random_bool(cfg.contact_chance)
            {
                victim.vel += (victim.pos - e.pos) * cfg.contact_knockback;
                if victim.hurt(1) {
                    events.push(TickEvent::PlayerDied {
                        player_id: victim.id.clone(),
                    });
                }
                debug!(enemy_id = e.id, player_id = %victim.id, "contact damage");
            }

            ranged_attack(e, angle, next_id, &mut room.projectiles, cfg, projectile_cfg);
        }

        e.pos += e.vel;
        e.vel *= cfg.friction;
        e.pos = arena::clamp_inside(e.pos, arena::TILE_SIZE + e.size);
    }

    if trapdoor_touched {
        events.push(TickEvent::FloorAdvanceRequested);
    }
    events
}

/// Marks the room cleared once its last hostile is gone; boss rooms grow a trapdoor.
pub fn resolve_room_clear(
    room: &mut Room,
    room_index: usize,
    next_id: &mut EntityId,
) -> Option<TickEvent> {
    if room.cleared || room.hostile_count() > 0 {
        return None;
    }

    room.cleared = true;
    if room.kind == RoomType::Boss {
        room.enemies.push(spawn_trapdoor(take_entity_id(next_id)));
    }
    Some(TickEvent::RoomCleared { room_index })
}

fn nearest_living(players: &[PlayerEntity], from: Vector2) -> Option<usize> {
    players
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.is_dead)
        .min_by(|(_, a), (_, b)| a.pos.distance(from).total_cmp(&b.pos.distance(from)))
        .map(|(i, _)| i)
}

fn ranged_attack(
    e: &mut Entity,
    angle: f32,
    next_id: &mut EntityId,
    projectiles: &mut Vec<Projectile>,
    cfg: &EnemyTuning,
    projectile_cfg: &ProjectileTuning,
) {
    let (interval, spread): (u32, &[f32]) = match e.kind {
        EntityKind::Pooter => (cfg.pooter_fire_interval, &[0.0]),
        EntityKind::Boss => (cfg.boss_fire_interval, &[-1.0, 0.0, 1.0]),
        _ => return,
    };

    e.state_timer += 1;
    if e.state_timer < interval {
        return;
    }
    e.state_timer = 0;

    for offset in spread {
        let heading = angle + offset * cfg.boss_spread;
        projectiles.push(Projectile {
            id: take_entity_id(next_id),
            owner: ProjectileOwner::Enemy,
            pos: e.pos,
            vel: Vector2::from_angle(heading) * projectile_cfg.enemy_shot_speed,
            size: projectile_cfg.enemy_shot_size,
            damage: e.damage,
            color: ENEMY_TEAR_COLOR.to_string(),
            range: projectile_cfg.enemy_shot_range,
            distance_traveled: 0.0,
        });
    }
}
