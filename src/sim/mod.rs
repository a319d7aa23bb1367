//! Simulation context and the authoritative tick loop
//!
//! One `Simulation` owns everything a level needs to run: the immutable
//! level tables, the three entity banks (level residents, transient spawns,
//! projectile pools), the player handle, the camera, and a seeded RNG. There
//! are no process-wide singletons, so independent simulations can run side
//! by side (the tests do exactly that).

pub mod collision;
pub mod entity;
pub mod movement;
pub mod pool;
pub mod think;
pub mod weapon;

pub use collision::CollisionResult;
pub use entity::{Aim, Entity, EntityId, WeaponSlotState, TIMER_IDLE};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::config::SimConfig;
use crate::level::{AttackMode, LevelData, LevelError, ThinkMode};
use crate::sim::pool::{Pool, PoolSet, TransientBank, TRANSIENT_CAPACITY};
use crate::util::time::tick_delta;

/// Camera approach rate toward the player (per second)
pub const CAMERA_EASE: f32 = 8.0;

/// Per-tick snapshot of raw input state, taken by the window layer
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    /// Cursor position in screen coordinates (y grows downward)
    pub cursor_x: f32,
    pub cursor_y: f32,
    pub screen_w: f32,
    pub screen_h: f32,

    // Held movement keys
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,

    /// Primary mouse button
    pub fire: bool,
    /// Wheel delta since last tick; sign selects cycle direction
    pub scroll: i32,
}

/// Discrete simulation events the fx layer subscribes to
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    WeaponFired { entity: EntityId, projectile: String },
    EntitySpawned { entity: EntityId },
    EntityDeactivated { entity: EntityId },
}

/// One running level simulation
pub struct Simulation {
    pub(crate) config: SimConfig,
    pub(crate) level: LevelData,
    pub(crate) residents: Vec<Entity>,
    pub(crate) transients: TransientBank,
    pub(crate) pools: PoolSet,
    pub(crate) rng: ChaCha8Rng,
    player: EntityId,
    camera_x: f32,
    camera_y: f32,
    tick: u64,
}

impl Simulation {
    /// Build a simulation from ingested level data. The tables are assumed
    /// valid; the only hard requirement is a resolvable player spawn.
    pub fn new(level: LevelData, config: SimConfig) -> Result<Self, LevelError> {
        let player_spawn = level.player.clone().ok_or(LevelError::NoPlayerSpawn)?;
        let player_template = level
            .templates
            .get(&player_spawn.template)
            .ok_or_else(|| LevelError::MissingTemplate(player_spawn.template.clone()))?;

        let slot_count = level.weapon_slots.len();
        let pools = PoolSet::build(&level.templates, slot_count);

        let mut sim = Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            residents: Vec::new(),
            transients: TransientBank::new(TRANSIENT_CAPACITY),
            pools,
            player: EntityId::Resident(0),
            camera_x: player_spawn.x,
            camera_y: player_spawn.y,
            tick: 0,
            level,
        };

        // The player is always resident index 0
        let mut player = Entity::new(player_template, slot_count);
        player.x = player_spawn.x;
        player.y = player_spawn.y;
        player.active = true;
        player.spawned = true;
        player.visible = true;
        for (i, ammo) in player_spawn.ammo.iter().enumerate() {
            if let Some(slot) = player.slots.get_mut(i) {
                slot.ammo = *ammo;
            }
        }
        sim.residents.push(player);
        if slot_count > 0 {
            sim.arm(EntityId::Resident(0));
        }

        let spawns = sim.level.spawns.clone();
        for spawn in &spawns {
            let Some(template) = sim.level.templates.get(&spawn.template) else {
                // An entity without a resolvable template would be inert
                // anyway; skip it and keep loading
                warn!(template = %spawn.template, "Skipping spawn with missing template");
                continue;
            };
            let mut ent = Entity::new(template.clone(), slot_count);
            ent.x = spawn.x;
            ent.y = spawn.y;
            ent.active = true;
            ent.spawned = true;
            ent.visible = true;
            for (i, ammo) in spawn.ammo.iter().enumerate() {
                if let Some(slot) = ent.slots.get_mut(i) {
                    slot.ammo = *ammo;
                }
            }
            let id = EntityId::Resident(sim.residents.len());
            sim.residents.push(ent);
            if slot_count > 0 && template.attack == AttackMode::Shoot {
                sim.arm(id);
            }
        }

        info!(
            residents = sim.residents.len(),
            pools = sim.pools.len(),
            linedefs = sim.level.linedefs.len(),
            weapon_slots = slot_count,
            "Simulation ready"
        );

        Ok(sim)
    }

    /// Run one fixed simulation tick: Think, then Weapon, then Movement
    /// (collision inside), then post-movement bookkeeping, for every active
    /// entity in bank order, followed by camera follow.
    pub fn tick(&mut self, input: &InputSnapshot) -> Vec<SimEvent> {
        self.tick += 1;
        let dt = tick_delta(self.config.tick_rate);
        let mut events = Vec::new();

        for id in self.entity_ids() {
            self.update_entity(id, input, dt, &mut events);
        }

        if let Some((px, py)) = self.entity(self.player).map(|p| (p.x, p.y)) {
            let ease = (CAMERA_EASE * dt).min(1.0);
            self.camera_x += (px - self.camera_x) * ease;
            self.camera_y += (py - self.camera_y) * ease;
        }

        events
    }

    fn update_entity(
        &mut self,
        id: EntityId,
        input: &InputSnapshot,
        dt: f32,
        events: &mut Vec<SimEvent>,
    ) {
        let Some(ent) = self.entity(id) else { return };
        if !ent.active || !ent.spawned {
            return;
        }

        // Rigid attachments copy their owner's transform at the start of
        // their own update; dependents tolerate one tick of lag instead of
        // requiring a particular iteration order
        if ent.follow_owner {
            if let Some(owner_id) = ent.owner {
                if let Some((x, y, aim)) = self.entity(owner_id).map(|o| (o.x, o.y, o.aim)) {
                    if let Some(ent) = self.entity_mut(id) {
                        ent.x = x;
                        ent.y = y;
                        ent.aim = aim;
                    }
                }
            }
        }

        think::run(self, id, input, dt, events);

        // Think may have deactivated the entity (missile expiry, item pickup)
        let Some(ent) = self.entity(id) else { return };
        if !ent.active {
            return;
        }

        if ent.weapon_slot >= 0 {
            weapon::update(self, id, dt, events);
        }

        self.advance_movement(id, dt);

        // A blow-mode missile dies on any contact, using this tick's result
        let Some(ent) = self.entity(id) else { return };
        if ent.template.attack == AttackMode::Blow
            && ent.template.think == ThinkMode::Missile
            && !ent.follow_owner
            && ent.collision.any()
        {
            self.deactivate(id, events);
        }
    }

    fn advance_movement(&mut self, id: EntityId, dt: f32) {
        let Self {
            level,
            residents,
            transients,
            pools,
            ..
        } = self;
        let ent = match id {
            EntityId::Resident(i) => residents.get_mut(i),
            EntityId::Transient(i) => transients.get_mut(i),
            EntityId::Pooled { pool, slot } => {
                pools.pool_mut(pool).and_then(|p| p.get_mut(slot))
            }
        };
        if let Some(ent) = ent {
            movement::advance(ent, &level.linedefs, dt);
        }
    }

    /// Stable iteration order: level residents, then transients, then pool
    /// slots
    fn entity_ids(&self) -> Vec<EntityId> {
        let mut ids = Vec::with_capacity(self.residents.len() + self.transients.len());
        ids.extend((0..self.residents.len()).map(EntityId::Resident));
        ids.extend((0..self.transients.len()).map(EntityId::Transient));
        for pool in 0..self.pools.len() {
            let capacity = self.pools.pool(pool).map(Pool::capacity).unwrap_or(0);
            ids.extend((0..capacity).map(|slot| EntityId::Pooled { pool, slot }));
        }
        ids
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        match id {
            EntityId::Resident(i) => self.residents.get(i),
            EntityId::Transient(i) => self.transients.get(i),
            EntityId::Pooled { pool, slot } => {
                self.pools.pool(pool).and_then(|p| p.get(slot))
            }
        }
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        match id {
            EntityId::Resident(i) => self.residents.get_mut(i),
            EntityId::Transient(i) => self.transients.get_mut(i),
            EntityId::Pooled { pool, slot } => {
                self.pools.pool_mut(pool).and_then(|p| p.get_mut(slot))
            }
        }
    }

    /// Spawn a one-off entity from the transient bank
    pub fn spawn_transient(
        &mut self,
        template_name: &str,
        x: f32,
        y: f32,
        events: &mut Vec<SimEvent>,
    ) -> Option<EntityId> {
        let Some(template) = self.level.templates.get(template_name) else {
            warn!(template = template_name, "Transient spawn with missing template");
            return None;
        };
        let slot_count = self.level.weapon_slots.len();
        let mut ent = Entity::new(template, slot_count);
        ent.x = x;
        ent.y = y;
        ent.active = true;
        ent.spawned = true;
        ent.visible = true;
        let index = self.transients.spawn(ent)?;
        let id = EntityId::Transient(index);
        events.push(SimEvent::EntitySpawned { entity: id });
        Some(id)
    }

    /// Deactivate an entity; pooled slots return to their pool
    pub fn deactivate(&mut self, id: EntityId, events: &mut Vec<SimEvent>) {
        match id {
            EntityId::Pooled { pool, slot } => {
                if let Some(p) = self.pools.pool_mut(pool) {
                    p.release(slot);
                } else {
                    warn!(pool, slot, "Deactivation of unknown pool");
                    return;
                }
            }
            _ => {
                let Some(ent) = self.entity_mut(id) else {
                    warn!(?id, "Deactivation of unknown entity");
                    return;
                };
                ent.active = false;
                ent.visible = false;
            }
        }
        events.push(SimEvent::EntityDeactivated { entity: id });
    }

    /// Switch an armed entity's active weapon slot. Disables every other
    /// slot's gun attachment and enables the new slot's.
    pub fn switch_slot(&mut self, id: EntityId, slot: i32) {
        let slot_count = self.level.weapon_slots.len() as i32;
        if slot < 0 || slot >= slot_count {
            warn!(?id, slot, "Switch to out-of-range weapon slot");
            return;
        }
        let Some(ent) = self.entity_mut(id) else {
            warn!(?id, "Slot switch on unknown entity");
            return;
        };
        ent.weapon_slot = slot;
        let guns: Vec<(usize, EntityId)> = ent
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.gun.map(|g| (i, g)))
            .collect();
        for (i, gun_id) in guns {
            if let Some(gun) = self.entity_mut(gun_id) {
                let enabled = i as i32 == slot;
                gun.active = enabled;
                gun.visible = enabled;
            }
        }
    }

    /// Set the stored ammo of one of an entity's weapon slots
    pub fn load_slot(&mut self, id: EntityId, slot: usize, ammo: u32) {
        let Some(ent) = self.entity_mut(id) else {
            warn!(?id, "Ammo load on unknown entity");
            return;
        };
        match ent.slots.get_mut(slot) {
            Some(s) => s.ammo = ammo,
            None => warn!(?id, slot, "Ammo load on out-of-range weapon slot"),
        }
    }

    /// Arm an entity: activate slot 0 and spawn its gun attachments
    fn arm(&mut self, id: EntityId) {
        let Some(ent) = self.entity(id) else { return };
        let gun_template = ent.template.gun_entity.clone();
        let (x, y) = (ent.x, ent.y);
        let slot_count = self.level.weapon_slots.len();

        if let Some(ent) = self.entity_mut(id) {
            ent.weapon_slot = 0;
        }

        if let Some(gun_template) = gun_template {
            let mut discard = Vec::new();
            for i in 0..slot_count {
                let Some(gun_id) = self.spawn_transient(&gun_template, x, y, &mut discard)
                else {
                    break;
                };
                if let Some(gun) = self.entity_mut(gun_id) {
                    gun.owner = Some(id);
                    gun.follow_owner = true;
                    let enabled = i == 0;
                    gun.active = enabled;
                    gun.visible = enabled;
                }
                if let Some(ent) = self.entity_mut(id) {
                    if let Some(slot) = ent.slots.get_mut(i) {
                        slot.gun = Some(gun_id);
                    }
                }
            }
        }
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn camera(&self) -> (f32, f32) {
        (self.camera_x, self.camera_y)
    }

    pub fn level(&self) -> &LevelData {
        &self.level
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}
