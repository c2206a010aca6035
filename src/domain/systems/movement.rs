use crate::domain::geometry::Vector2;
use crate::domain::state::PlayerEntity;
use crate::domain::tuning::PlayerTuning;
use crate::domain::tuning::arena;

/// Integrates one tick of player motion: accelerate, apply friction, move, clamp to the walls.
pub fn tick_player(p: &mut PlayerEntity, intent: Vector2, cfg: &PlayerTuning) {
    if !intent.is_zero() {
        p.vel += intent.normalized() * (p.stats.speed * cfg.acceleration);
    }

    p.vel *= cfg.friction;
    p.pos += p.vel;

    if !p.pos.is_finite() {
        // Recover from corrupted state rather than propagating NaN.
        p.pos = arena::CENTER;
        p.vel = Vector2::ZERO;
    }
    p.pos = arena::clamp_inside(p.pos, cfg.wall_margin);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::PlayerStats;

    fn player_at(pos: Vector2) -> PlayerEntity {
        PlayerEntity::new("p1", pos, PlayerStats::default(), "#fff")
    }

    #[test]
    fn when_moving_right_then_velocity_and_position_follow_speed_and_friction() {
        let cfg = PlayerTuning::default();
        let mut p = player_at(arena::CENTER);
        tick_player(&mut p, Vector2::new(1.0, 0.0), &cfg);
        // 1.0 speed * 0.5 accel, then * 0.85 friction.
        assert!((p.vel.x - 0.425).abs() < 1e-6);
        assert!((p.pos.x - (arena::CENTER.x + 0.425)).abs() < 1e-4);
    }

    #[test]
    fn when_idle_then_velocity_decays() {
        let cfg = PlayerTuning::default();
        let mut p = player_at(arena::CENTER);
        p.vel = Vector2::new(10.0, 0.0);
        tick_player(&mut p, Vector2::ZERO, &cfg);
        assert!((p.vel.x - 8.5).abs() < 1e-5);
    }

    #[test]
    fn when_pushed_past_the_wall_then_position_is_clamped_to_margin() {
        let cfg = PlayerTuning::default();
        let mut p = player_at(Vector2::new(60.0, 60.0));
        p.vel = Vector2::new(-200.0, -200.0);
        tick_player(&mut p, Vector2::ZERO, &cfg);
        assert_eq!(p.pos, Vector2::new(cfg.wall_margin, cfg.wall_margin));
    }
}
