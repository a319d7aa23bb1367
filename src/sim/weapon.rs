//! Weapon state machine - ammo, reload, and fire gating
//!
//! Runs once per tick for every armed entity, between think and movement.
//! Firing materializes projectiles through the pools; a pool that cannot
//! yield a slot turns the fire attempt into a no-op without touching ammo.

use rand::Rng;
use tracing::warn;

use crate::level::WeaponSlotDefinition;
use crate::sim::entity::{Aim, EntityId, TIMER_IDLE};
use crate::sim::{SimEvent, Simulation};

/// Muzzle flash duration (seconds)
pub const MUZZLE_TIME: f32 = 0.05;
/// Weapon kick duration (seconds)
pub const KICK_TIME: f32 = 0.10;
/// Attack delay factor applied to slot 0 without the akimbo flag
pub const SLOT0_DELAY_FACTOR: f32 = 1.2;
/// Muzzle distance beyond the owner's horizontal half-extent
pub const MUZZLE_OFFSET: f32 = 4.0;
/// Aim spread between multishot projectiles (degrees)
pub const SPREAD_STEP_DEG: f32 = 3.0;
/// Seeded jitter applied to multishot spread (degrees)
pub const SPREAD_JITTER_DEG: f32 = 1.0;

/// Advance one armed entity's weapon state by one tick
pub fn update(sim: &mut Simulation, id: EntityId, dt: f32, events: &mut Vec<SimEvent>) {
    let Some(ent) = sim.entity(id) else { return };
    let Ok(slot_idx) = usize::try_from(ent.weapon_slot) else {
        return;
    };
    let Some(def) = sim.level.weapon_slots.get(slot_idx).cloned() else {
        warn!(?id, slot = slot_idx, "Armed entity references unknown weapon slot");
        return;
    };
    if ent.slots.get(slot_idx).is_none() {
        warn!(?id, slot = slot_idx, "Weapon slot state missing");
        return;
    }

    let template = ent.template.clone();
    let wants_fire = ent.wants_fire;
    let akimbo = ent.slots[slot_idx].akimbo;
    let effective_delay = if slot_idx == 0 && !akimbo {
        template.attack_delay * SLOT0_DELAY_FACTOR
    } else {
        template.attack_delay
    };

    // Cosmetic timers, attack clock, reload clock
    let (ammo, reload_idle, attack_elapsed) = {
        let Some(ent) = sim.entity_mut(id) else { return };
        ent.kick_timer = (ent.kick_timer - dt).max(0.0);
        ent.muzzle_timer = (ent.muzzle_timer - dt).max(0.0);
        ent.attack_timer += dt;

        let slot = &mut ent.slots[slot_idx];
        if slot.reload_timer >= 0.0 {
            slot.reload_timer += dt;
            if slot.reload_timer >= def.reload_duration {
                slot.reload_timer = TIMER_IDLE;
                slot.ammo = def.magazine;
            }
        }
        (slot.ammo, slot.reload_timer < 0.0, ent.attack_timer)
    };

    if reload_idle && ammo > 0 && wants_fire && attack_elapsed > effective_delay {
        fire(sim, id, slot_idx, &def, events);
    }
}

/// Materialize the shot: acquire projectile(s), place them at the muzzle,
/// spend ammo, start cosmetic timers and possibly a reload
fn fire(
    sim: &mut Simulation,
    id: EntityId,
    slot_idx: usize,
    def: &WeaponSlotDefinition,
    events: &mut Vec<SimEvent>,
) {
    let Some(ent) = sim.entity(id) else { return };
    let (x, y, aim, half_w, multishot) = (
        ent.x,
        ent.y,
        ent.aim,
        ent.template.half_width,
        ent.template.stats.multishot.max(1),
    );

    let aim_deg = aim.degrees();
    let muzzle = half_w + MUZZLE_OFFSET;
    let rad = aim_deg.to_radians();
    let spawn_x = x + rad.cos() * muzzle;
    let spawn_y = y + rad.sin() * muzzle;

    let mut fired = 0;
    for shot in 0..multishot {
        let Some((pool, slot)) = sim.pools.acquire(&def.primary) else {
            break;
        };
        let projectile_id = EntityId::Pooled { pool, slot };

        // Extra multishot projectiles fan out around the aim with a little
        // seeded jitter
        let shot_deg = if shot == 0 {
            aim_deg
        } else {
            let ring = ((shot + 1) / 2) as f32;
            let side = if shot % 2 == 1 { 1.0 } else { -1.0 };
            let jitter = sim.rng.gen_range(-SPREAD_JITTER_DEG..SPREAD_JITTER_DEG);
            aim_deg + side * (SPREAD_STEP_DEG * ring + jitter)
        };

        let Some(projectile) = sim.entity_mut(projectile_id) else {
            break;
        };
        projectile.reset();
        projectile.x = spawn_x;
        projectile.y = spawn_y;
        projectile.aim = Aim::Angle(shot_deg);
        projectile.owner = Some(id);

        events.push(SimEvent::EntitySpawned {
            entity: projectile_id,
        });
        fired += 1;
    }

    if fired == 0 {
        // Pool exhausted before the first projectile: nothing fires
        return;
    }

    events.push(SimEvent::WeaponFired {
        entity: id,
        projectile: def.primary.clone(),
    });

    let Some(ent) = sim.entity_mut(id) else { return };
    ent.attack_timer = 0.0;
    ent.muzzle_timer = MUZZLE_TIME;
    ent.kick_timer = KICK_TIME;

    let slot = &mut ent.slots[slot_idx];
    slot.ammo = slot.ammo.saturating_sub(1);
    if slot.ammo == 0 && def.reload_duration > 0.0 {
        slot.reload_timer = 0.0;
    }
}
