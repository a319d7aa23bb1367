//! Think dispatcher - per-entity behavior selection
//!
//! Runs before the weapon and movement updates each tick and writes the
//! inputs those machines consume: input levels, aim, the fire flag, and for
//! missiles the velocity itself.

use crate::level::ThinkMode;
use crate::sim::entity::{Aim, EntityId};
use crate::sim::{InputSnapshot, SimEvent, Simulation};

/// Cursor distance at which aiming follows the arctangent alone (pixels)
pub const AIM_SNAP_DIST: f32 = 200.0;
/// Steep-angle target blended in at close cursor range (degrees)
pub const AIM_STEEP_DEG: f32 = 90.0;
/// Missile flight speed multiplier
pub const MISSILE_SPEED: f32 = 6.0;
/// Missile lifespan unless the template's lifetime stat overrides (seconds)
pub const MISSILE_LIFETIME_DEFAULT: f32 = 2.0;
/// Item pickup radius (units)
pub const PICKUP_RADIUS: f32 = 32.0;

/// Dispatch one entity's think routine for this tick
pub fn run(
    sim: &mut Simulation,
    id: EntityId,
    input: &InputSnapshot,
    dt: f32,
    events: &mut Vec<SimEvent>,
) {
    let Some(ent) = sim.entity(id) else { return };
    match ent.template.think {
        ThinkMode::None => {}
        ThinkMode::User => think_user(sim, id, input),
        ThinkMode::Missile => think_missile(sim, id, dt, events),
        ThinkMode::Item => think_item(sim, id, events),
    }
}

/// Interpret raw input state into facing, aim, movement levels, and fire
fn think_user(sim: &mut Simulation, id: EntityId, input: &InputSnapshot) {
    let dx = input.cursor_x - input.screen_w * 0.5;
    let dy = input.screen_h * 0.5 - input.cursor_y; // screen y grows downward

    let direct = dy.atan2(dx).to_degrees();
    let dist = (dx * dx + dy * dy).sqrt();
    // Close to the entity the aim leans toward straight up/down, which makes
    // short-range aiming snappier; far away the arctangent wins outright
    let t = (dist / AIM_SNAP_DIST).min(1.0);
    let steep = if dy >= 0.0 { AIM_STEEP_DEG } else { -AIM_STEEP_DEG };
    let angle = steep + (direct - steep) * t;

    let input_x = (input.right as i32 - input.left as i32) as f32;
    let input_y = (input.up as i32 - input.down as i32) as f32;

    let scroll_target = match sim.entity(id) {
        Some(ent) if input.scroll != 0 => Some(next_armed_slot(
            ent.weapon_slot,
            input.scroll.signum(),
            &ent.slots,
        )),
        Some(_) => None,
        None => return,
    };

    if let Some(ent) = sim.entity_mut(id) {
        ent.aim = Aim::Angle(angle);
        ent.input_x = input_x;
        ent.input_y = input_y;
        ent.wants_fire = input.fire;
    }

    if let Some(target) = scroll_target {
        sim.switch_slot(id, target);
    }
}

/// Next slot in `dir` with ammo; slot 0 is always eligible even when empty
fn next_armed_slot(current: i32, dir: i32, slots: &[crate::sim::WeaponSlotState]) -> i32 {
    let n = slots.len() as i32;
    if n == 0 {
        return current;
    }
    let mut candidate = current;
    for _ in 0..n {
        candidate = (candidate + dir).rem_euclid(n);
        if candidate == 0 || slots[candidate as usize].ammo > 0 {
            return candidate;
        }
    }
    current
}

/// Fly along the aim angle and expire after the configured lifespan
fn think_missile(sim: &mut Simulation, id: EntityId, dt: f32, events: &mut Vec<SimEvent>) {
    let expired = {
        let Some(ent) = sim.entity_mut(id) else { return };
        // Gun attachments ride their owner; their missile think is skipped
        if ent.follow_owner {
            return;
        }

        let speed = MISSILE_SPEED * ent.template.think_speed;
        let rad = ent.aim.degrees().to_radians();
        ent.vel_x = rad.cos() * speed;
        ent.vel_y = rad.sin() * speed;

        let lifetime_ms = ent.template.stats.lifetime_ms;
        let lifespan = if lifetime_ms > 0 {
            lifetime_ms as f32 / 1000.0
        } else {
            MISSILE_LIFETIME_DEFAULT
        };
        ent.life_timer += dt;
        ent.life_frac = (ent.life_timer / lifespan).min(1.0);
        ent.life_timer >= lifespan
    };

    if expired {
        sim.deactivate(id, events);
    }
}

/// Wait for the player; on proximity hand over all stored ammo and die
fn think_item(sim: &mut Simulation, id: EntityId, events: &mut Vec<SimEvent>) {
    let player_id = sim.player();
    if id == player_id {
        return;
    }

    let Some((ix, iy, ammo)) = sim
        .entity(id)
        .map(|e| (e.x, e.y, e.slots.iter().map(|s| s.ammo).collect::<Vec<_>>()))
    else {
        return;
    };
    let Some((px, py)) = sim.entity(player_id).map(|p| (p.x, p.y)) else {
        return;
    };

    let dx = px - ix;
    let dy = py - iy;
    if dx * dx + dy * dy > PICKUP_RADIUS * PICKUP_RADIUS {
        return;
    }

    // Transfer every slot's stored ammo; remember the first slot the player
    // had empty that this pickup filled
    let mut newly_armed = None;
    if let Some(player) = sim.entity_mut(player_id) {
        for (i, give) in ammo.iter().enumerate() {
            if *give == 0 {
                continue;
            }
            if let Some(slot) = player.slots.get_mut(i) {
                if slot.ammo == 0 && newly_armed.is_none() {
                    newly_armed = Some(i as i32);
                }
                slot.ammo += give;
            }
        }
    }

    if let Some(slot) = newly_armed {
        sim.switch_slot(player_id, slot);
    }

    sim.deactivate(id, events);
}
