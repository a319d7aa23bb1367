//! Movement state machine - STATIC / WALK / FLY
//!
//! Runs once per tick per entity, after think has written the entity's input
//! levels. Every state refreshes the entity's `CollisionResult` first; the
//! one exception is a STATIC entity with zero velocity, which skips the
//! geometry scan entirely.

use std::f32::consts::{FRAC_PI_2, TAU};

use crate::level::{Linedef, MoveType};
use crate::sim::collision;
use crate::sim::entity::{Entity, TIMER_IDLE};
use crate::util::time::TIME_SCALE;

/// Terminal fall velocity
pub const TERMINAL_VELOCITY: f32 = -3.2;
/// Upward velocity held while the jump timer runs
pub const JUMP_VELOCITY: f32 = 3.2;
/// Hard cap on jump ascent time (seconds)
pub const JUMP_TIME_MAX: f32 = 0.30;
/// Vertical velocity lost per 60 Hz-baseline tick while falling
pub const GRAVITY_STEP: f32 = 0.16;
/// `smooth_in` approach rate (input units per second)
pub const SMOOTH_RATE: f32 = 5.0;
/// Speed factor while walking against the facing direction
pub const BACK_SPEED_FACTOR: f32 = 0.75;
/// Bob phase advanced per unit of grounded horizontal movement
pub const BOB_RATE: f32 = 0.25;
/// Airborne bob easing rate toward the reference angle (per second)
pub const BOB_AIR_EASE: f32 = 10.0;
/// Eye-blink cosmetic period (seconds)
pub const BLINK_PERIOD: f32 = 3.0;

/// Move `current` toward `target` by a fixed `5 * dt` step, without
/// overshooting and clamped to [-1, 1]. Shared by walking horizontal input
/// and floating velocity.
pub fn smooth_in(current: f32, target: f32, dt: f32) -> f32 {
    let step = SMOOTH_RATE * dt;
    let mut next = if current < target {
        (current + step).min(target)
    } else {
        (current - step).max(target)
    };
    // Accumulated f32 steps can stop a hair short of the target; snap the
    // tail so saturation lands on the exact input level
    if (target - next).abs() < 1e-6 {
        next = target;
    }
    next.clamp(-1.0, 1.0)
}

/// Advance one entity by one tick
pub fn advance(ent: &mut Entity, linedefs: &[Linedef], dt: f32) {
    match ent.template.move_type {
        MoveType::Static => advance_static(ent, linedefs, dt),
        MoveType::Walk => advance_walk(ent, linedefs, dt),
        MoveType::Fly => advance_fly(ent, linedefs, dt),
    }
}

fn refresh_collision(ent: &mut Entity, linedefs: &[Linedef]) {
    ent.collision = collision::check(
        ent.x,
        ent.y,
        ent.vel_x,
        ent.vel_y,
        ent.template.half_width,
        ent.template.half_height,
        linedefs,
    );
}

fn advance_static(ent: &mut Entity, linedefs: &[Linedef], dt: f32) {
    if ent.vel_x == 0.0 && ent.vel_y == 0.0 {
        return;
    }
    refresh_collision(ent, linedefs);
    ent.x += ent.vel_x * dt * TIME_SCALE;
    ent.y += ent.vel_y * dt * TIME_SCALE;
}

fn advance_walk(ent: &mut Entity, linedefs: &[Linedef], dt: f32) {
    refresh_collision(ent, linedefs);
    let col = ent.collision;
    let template = ent.template.clone();

    // Jump state. The reset latch only re-arms on a release edge while
    // touching a boundary, so holding the input cannot re-trigger a jump
    // without an intervening release-or-land.
    if ent.input_y > 0.0 {
        if !col.above && ent.jump_timer < 0.0 && col.below && ent.jump_reset {
            ent.jump_timer = 0.0;
            ent.jump_reset = false;
        }
    } else {
        ent.jump_timer = TIMER_IDLE;
        if col.below || col.above {
            ent.jump_reset = true;
        }
    }
    if col.above {
        ent.jump_timer = TIMER_IDLE;
    }

    if ent.jump_timer >= 0.0 {
        ent.jump_timer += dt;
        if ent.jump_timer >= JUMP_TIME_MAX {
            // Forced idle: gravity resumes even with the input still held
            ent.jump_timer = TIMER_IDLE;
        } else {
            ent.vel_y = JUMP_VELOCITY;
        }
    }

    // Gravity toward the terminal value while not jumping
    if ent.jump_timer < 0.0 {
        if col.below {
            ent.vel_y = 0.0;
        } else if ent.vel_y > TERMINAL_VELOCITY {
            ent.vel_y -= GRAVITY_STEP * dt * TIME_SCALE;
            if ent.vel_y < TERMINAL_VELOCITY {
                ent.vel_y = TERMINAL_VELOCITY;
            }
        } else {
            ent.vel_y = TERMINAL_VELOCITY;
        }
    }

    // Horizontal: smoothed input, forward/backward asymmetry, wall blocking
    ent.walk_input = smooth_in(ent.walk_input, ent.input_x, dt);
    let forward = ent.walk_input != 0.0 && (ent.walk_input > 0.0) == ent.aim.right();
    let factor = if forward { 1.0 } else { BACK_SPEED_FACTOR };
    ent.vel_x = ent.walk_input * factor * template.speed;
    if col.left && ent.vel_x < 0.0 {
        ent.vel_x = 0.0;
    }
    if col.right && ent.vel_x > 0.0 {
        ent.vel_x = 0.0;
    }

    ent.x += ent.vel_x * dt * TIME_SCALE;
    if col.below && ent.jump_timer < 0.0 {
        // Grounded: snap onto the supporting floor's line instead of
        // integrating, which keeps sloped ground exact
        ent.y = col.floor_gradient * ent.x + col.floor_shift + template.half_height;
    } else {
        ent.y += ent.vel_y * dt * TIME_SCALE;
    }

    // Bobbing phase for leg animation
    ent.bob_timer_prev = ent.bob_timer;
    if col.below {
        ent.bob_timer =
            (ent.bob_timer + ent.vel_x.abs() * BOB_RATE * dt * TIME_SCALE).rem_euclid(TAU);
    } else {
        ent.bob_timer += (FRAC_PI_2 - ent.bob_timer) * (BOB_AIR_EASE * dt).min(1.0);
    }

    // Renderer-facing cosmetics
    if ent.slide_timer > 0.0 {
        ent.slide_timer = (ent.slide_timer - dt).max(0.0);
    }
    ent.blink_timer = (ent.blink_timer + dt) % BLINK_PERIOD;
}

fn advance_fly(ent: &mut Entity, linedefs: &[Linedef], dt: f32) {
    refresh_collision(ent, linedefs);
    let speed = ent.template.speed;

    ent.vel_x = smooth_in(ent.vel_x, ent.input_x, dt);
    ent.vel_y = smooth_in(ent.vel_y, ent.input_y, dt);
    ent.x += ent.vel_x * dt * TIME_SCALE * speed;
    ent.y += ent.vel_y * dt * TIME_SCALE * speed;

    ent.bob_timer_prev = ent.bob_timer;
    ent.bob_timer += dt;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{EntityTemplate, LinedefStyle};
    use crate::sim::collision::CollisionResult;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    const DT: f32 = 1.0 / 60.0;

    fn walker() -> Entity {
        let template: EntityTemplate = serde_json::from_str(
            r#"{ "name": "grunt", "half_width": 2.0, "half_height": 2.0,
                 "move_type": "walk", "speed": 1.0 }"#,
        )
        .unwrap();
        Entity::new(Arc::new(template), 0)
    }

    fn statue() -> Entity {
        let template: EntityTemplate = serde_json::from_str(
            r#"{ "name": "statue", "half_width": 2.0, "half_height": 2.0 }"#,
        )
        .unwrap();
        Entity::new(Arc::new(template), 0)
    }

    fn flat_floor() -> Vec<Linedef> {
        vec![Linedef::new(-100.0, 0.0, 100.0, 0.0, LinedefStyle::Floor)]
    }

    fn ground(ent: &mut Entity) {
        ent.y = ent.template.half_height;
    }

    #[test]
    fn smooth_in_steps_and_clamps() {
        assert_relative_eq!(smooth_in(0.0, 1.0, DT), 5.0 * DT);
        assert_relative_eq!(smooth_in(0.99, 1.0, DT), 1.0);
        assert_relative_eq!(smooth_in(0.0, -1.0, DT), -5.0 * DT);
        assert_relative_eq!(smooth_in(0.5, 0.5, DT), 0.5);
    }

    #[test]
    fn smooth_in_reaches_full_input_in_twelve_ticks() {
        let mut v = 0.0;
        for _ in 0..12 {
            v = smooth_in(v, 1.0, DT);
        }
        assert_eq!(v, 1.0);
    }

    #[test]
    fn static_zero_velocity_skips_collision_and_stays_put() {
        let mut ent = statue();
        ent.x = 5.0;
        ent.y = 5.0;
        // Sentinel: a refresh against empty geometry would clear this flag
        ent.collision = CollisionResult {
            below: true,
            ..CollisionResult::default()
        };
        advance(&mut ent, &[], DT);
        assert_eq!((ent.x, ent.y), (5.0, 5.0));
        assert!(ent.collision.below, "collision must not be recomputed");
    }

    #[test]
    fn static_with_velocity_integrates_at_the_baseline_rate() {
        let mut ent = statue();
        ent.vel_x = 2.0;
        advance(&mut ent, &[], DT);
        assert_relative_eq!(ent.x, 2.0 * DT * TIME_SCALE);
        assert!(!ent.collision.below);
    }

    #[test]
    fn grounded_walk_moves_by_smoothed_input() {
        let lines = flat_floor();
        let mut ent = walker();
        ground(&mut ent);
        ent.input_x = 1.0;

        advance(&mut ent, &lines, DT);
        // One smoothing step, forward factor 1.0, dt * 60 = 1
        assert_relative_eq!(ent.x, 5.0 * DT, epsilon = 1e-6);
        assert_relative_eq!(ent.y, ent.template.half_height, epsilon = 1e-6);

        for _ in 0..11 {
            advance(&mut ent, &lines, DT);
        }
        assert_eq!(ent.walk_input, 1.0);

        // Constant displacement once the input is saturated
        let before = ent.x;
        advance(&mut ent, &lines, DT);
        assert_relative_eq!(ent.x - before, 1.0 * DT * TIME_SCALE, epsilon = 1e-6);
    }

    #[test]
    fn walking_backward_is_slower() {
        let lines = flat_floor();
        let mut ent = walker();
        ground(&mut ent);
        ent.input_x = -1.0; // facing right by default
        for _ in 0..20 {
            advance(&mut ent, &lines, DT);
        }
        assert_relative_eq!(ent.vel_x, -BACK_SPEED_FACTOR, epsilon = 1e-6);
    }

    #[test]
    fn jump_timer_increases_until_the_cap_then_gravity_resumes() {
        let lines = flat_floor();
        let mut ent = walker();
        ground(&mut ent);
        ent.input_y = 1.0;

        advance(&mut ent, &lines, DT);
        assert_relative_eq!(ent.jump_timer, DT, epsilon = 1e-6);
        assert_relative_eq!(ent.vel_y, JUMP_VELOCITY);
        assert!(!ent.jump_reset);

        let mut last = ent.jump_timer;
        let mut ticks = 1;
        while ent.jump_timer >= 0.0 {
            advance(&mut ent, &lines, DT);
            ticks += 1;
            if ent.jump_timer >= 0.0 {
                assert!(ent.jump_timer > last, "timer must strictly increase");
                last = ent.jump_timer;
            }
            assert!(ticks < 60, "jump must end within the cap");
        }
        // 0.30s at 60 Hz, give or take one tick of f32 accumulation
        assert!((17..=19).contains(&ticks), "jump lasted {ticks} ticks");

        // Input still held: gravity pulls the velocity back down
        let v = ent.vel_y;
        advance(&mut ent, &lines, DT);
        assert!(ent.vel_y < v);
    }

    #[test]
    fn held_input_cannot_retrigger_a_jump_after_landing() {
        let lines = flat_floor();
        let mut ent = walker();
        ground(&mut ent);
        ent.input_y = 1.0;

        // Full jump, then fall back to the floor with the input still held
        for _ in 0..240 {
            advance(&mut ent, &lines, DT);
        }
        assert!(ent.collision.below);
        assert_eq!(ent.jump_timer, TIMER_IDLE);
        assert!(!ent.jump_reset);

        // Release re-arms on the ground, the next press jumps again
        ent.input_y = 0.0;
        advance(&mut ent, &lines, DT);
        assert!(ent.jump_reset);
        ent.input_y = 1.0;
        advance(&mut ent, &lines, DT);
        assert!(ent.jump_timer >= 0.0);
    }

    #[test]
    fn falling_velocity_snaps_to_terminal() {
        let mut ent = walker();
        ent.y = 500.0;
        for _ in 0..120 {
            advance(&mut ent, &[], DT);
        }
        assert_eq!(ent.vel_y, TERMINAL_VELOCITY);
    }

    #[test]
    fn grounded_entity_follows_a_slope_exactly() {
        // y = 0.5x + 0
        let lines = vec![Linedef::new(-100.0, -50.0, 100.0, 50.0, LinedefStyle::Floor)];
        let mut ent = walker();
        ent.x = 0.0;
        ent.y = ent.template.half_height - 0.5;
        ent.vel_y = -0.1;
        ent.input_x = 1.0;

        advance(&mut ent, &lines, DT);
        assert!(ent.collision.below);
        assert_relative_eq!(
            ent.y,
            0.5 * ent.x + ent.template.half_height,
            epsilon = 1e-6
        );
    }

    #[test]
    fn wall_flag_zeroes_blocked_side_only() {
        // Wall right of the entity
        let lines = vec![
            Linedef::new(-100.0, 0.0, 100.0, 0.0, LinedefStyle::Floor),
            Linedef::new(4.0, 0.0, 4.0, 20.0, LinedefStyle::Floor),
        ];
        let mut ent = walker();
        ground(&mut ent);
        ent.x = 2.5;
        ent.walk_input = 1.0;
        ent.input_x = 1.0;
        ent.vel_x = 1.0;

        advance(&mut ent, &lines, DT);
        assert!(ent.collision.right);
        assert_eq!(ent.vel_x, 0.0);
        assert_relative_eq!(ent.x, 2.5);
    }

    #[test]
    fn flyer_smooths_velocity_on_both_axes() {
        let template: EntityTemplate = serde_json::from_str(
            r#"{ "name": "ghost", "half_width": 2.0, "half_height": 2.0,
                 "move_type": "fly", "speed": 2.0 }"#,
        )
        .unwrap();
        let mut ent = Entity::new(Arc::new(template), 0);
        ent.input_x = 1.0;
        ent.input_y = -1.0;

        advance(&mut ent, &[], DT);
        assert_relative_eq!(ent.vel_x, 5.0 * DT, epsilon = 1e-6);
        assert_relative_eq!(ent.vel_y, -5.0 * DT, epsilon = 1e-6);
        assert_relative_eq!(ent.x, ent.vel_x * DT * TIME_SCALE * 2.0, epsilon = 1e-6);
        assert_relative_eq!(ent.bob_timer, DT, epsilon = 1e-6);
    }
}
