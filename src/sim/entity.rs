//! Entity instances - the mutable per-actor state

use std::sync::Arc;

use crate::level::EntityTemplate;
use crate::sim::collision::CollisionResult;

/// Idle sentinel for the jump and reload timers
pub const TIMER_IDLE: f32 = -1.0;

/// Stable handle to an entity in one of the simulation's three banks.
///
/// Pool slots are never destroyed individually, only toggled, so a handle
/// stays valid (pointing at whatever currently occupies the slot) for the
/// whole level. Cross-references such as a projectile's firer or a gun
/// attachment's wielder are stored as handles, never as owning pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityId {
    /// Level-resident entity (player, placed items, scenery actors)
    Resident(usize),
    /// Transient spawn (gun attachments and other one-off actors)
    Transient(usize),
    /// Pooled projectile slot
    Pooled { pool: usize, slot: usize },
}

/// Facing/aim state. The full aim angle is only meaningful for aim-capable
/// think modes; everything else carries just the facing boolean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aim {
    /// true = facing right
    Facing(bool),
    /// Aim angle in degrees, 0 = right, positive = up, range (-180, 180]
    Angle(f32),
}

impl Aim {
    pub fn right(&self) -> bool {
        match *self {
            Aim::Facing(right) => right,
            Aim::Angle(deg) => deg.abs() < 90.0,
        }
    }

    /// Aim angle in degrees, falling back to dead-ahead for facing-only aim
    pub fn degrees(&self) -> f32 {
        match *self {
            Aim::Facing(true) => 0.0,
            Aim::Facing(false) => 180.0,
            Aim::Angle(deg) => deg,
        }
    }
}

impl Default for Aim {
    fn default() -> Self {
        Aim::Facing(true)
    }
}

/// Per-weapon-slot mutable state; the array lines up with the level's
/// `WeaponSlotDefinition` table
#[derive(Debug, Clone, Default)]
pub struct WeaponSlotState {
    pub ammo: u32,
    /// Seconds into the current reload; negative = not reloading
    pub reload_timer: f32,
    pub akimbo: bool,
    /// Gun attachment rendered for this slot
    pub gun: Option<EntityId>,
}

impl WeaponSlotState {
    pub fn new() -> Self {
        Self {
            ammo: 0,
            reload_timer: TIMER_IDLE,
            akimbo: false,
            gun: None,
        }
    }
}

/// One live actor
#[derive(Debug, Clone)]
pub struct Entity {
    /// Shared archetype definition; set at creation, never reassigned
    pub template: Arc<EntityTemplate>,

    /// The entity that spawned this one (a projectile's firer, an
    /// attachment's wielder)
    pub owner: Option<EntityId>,
    /// Rigidly copy the owner's transform at the start of each update
    pub follow_owner: bool,

    pub x: f32,
    pub y: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    pub aim: Aim,

    pub active: bool,
    pub spawned: bool,
    pub visible: bool,

    /// Recomputed every tick by the movement state machine
    pub collision: CollisionResult,

    // Inputs, written by think and consumed by movement/weapon
    pub input_x: f32,
    pub input_y: f32,
    pub wants_fire: bool,
    /// Smoothed horizontal walking input
    pub walk_input: f32,

    // Timers (simulation seconds)
    pub jump_timer: f32,
    pub jump_reset: bool,
    pub slide_timer: f32,
    pub blink_timer: f32,
    pub attack_timer: f32,
    pub life_timer: f32,
    pub muzzle_timer: f32,
    pub kick_timer: f32,

    /// Leg-animation phase, wrapped to [0, 2π) while grounded
    pub bob_timer: f32,
    pub bob_timer_prev: f32,

    /// Lifetime completion fraction driving expand/fade fx
    pub life_frac: f32,

    pub slots: Vec<WeaponSlotState>,
    /// Active weapon slot index; -1 = unarmed
    pub weapon_slot: i32,
}

impl Entity {
    pub fn new(template: Arc<EntityTemplate>, slot_count: usize) -> Self {
        Self {
            template,
            owner: None,
            follow_owner: false,
            x: 0.0,
            y: 0.0,
            vel_x: 0.0,
            vel_y: 0.0,
            aim: Aim::default(),
            active: false,
            spawned: false,
            visible: false,
            collision: CollisionResult::default(),
            input_x: 0.0,
            input_y: 0.0,
            wants_fire: false,
            walk_input: 0.0,
            jump_timer: TIMER_IDLE,
            jump_reset: true,
            slide_timer: 0.0,
            blink_timer: 0.0,
            attack_timer: 0.0,
            life_timer: 0.0,
            muzzle_timer: 0.0,
            kick_timer: 0.0,
            bob_timer: 0.0,
            bob_timer_prev: 0.0,
            life_frac: 0.0,
            slots: (0..slot_count).map(|_| WeaponSlotState::new()).collect(),
            weapon_slot: -1,
        }
    }

    /// Full reset of motion state and timers, applied by callers when a
    /// pooled slot is re-acquired (release itself does not reset)
    pub fn reset(&mut self) {
        self.owner = None;
        self.follow_owner = false;
        self.vel_x = 0.0;
        self.vel_y = 0.0;
        self.aim = Aim::default();
        self.collision = CollisionResult::default();
        self.input_x = 0.0;
        self.input_y = 0.0;
        self.wants_fire = false;
        self.walk_input = 0.0;
        self.jump_timer = TIMER_IDLE;
        self.jump_reset = true;
        self.slide_timer = 0.0;
        self.attack_timer = 0.0;
        self.life_timer = 0.0;
        self.muzzle_timer = 0.0;
        self.kick_timer = 0.0;
        self.bob_timer = 0.0;
        self.bob_timer_prev = 0.0;
        self.life_frac = 0.0;
    }

    /// Current weapon slot state, when armed with a valid index
    pub fn active_slot(&self) -> Option<&WeaponSlotState> {
        usize::try_from(self.weapon_slot)
            .ok()
            .and_then(|i| self.slots.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::template::EntityTemplate;

    fn template() -> Arc<EntityTemplate> {
        Arc::new(
            serde_json::from_str(r#"{ "name": "t", "half_width": 1.0, "half_height": 1.0 }"#)
                .unwrap(),
        )
    }

    #[test]
    fn facing_is_derived_from_aim_angle() {
        assert!(Aim::Angle(45.0).right());
        assert!(Aim::Angle(-89.0).right());
        assert!(!Aim::Angle(120.0).right());
        assert!(!Aim::Facing(false).right());
    }

    #[test]
    fn reset_idles_timers_but_keeps_armament() {
        let mut e = Entity::new(template(), 2);
        e.weapon_slot = 1;
        e.slots[1].ammo = 7;
        e.jump_timer = 0.1;
        e.life_timer = 1.5;
        e.vel_x = 3.0;
        e.reset();
        assert_eq!(e.jump_timer, TIMER_IDLE);
        assert_eq!(e.life_timer, 0.0);
        assert_eq!(e.vel_x, 0.0);
        assert_eq!(e.weapon_slot, 1);
        assert_eq!(e.slots[1].ammo, 7);
    }
}
