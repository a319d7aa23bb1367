//! Fixed-capacity entity pools and the transient spawn bank
//!
//! Pools are built once at level start, one per pooled projectile archetype,
//! with every slot fully constructed up front. Slots are only ever toggled
//! active/inactive; the whole pool drops at level teardown. Running out of
//! slots is a deliberate hard cap: the acquire logs and yields nothing, and
//! the caller treats the action as a no-op.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::level::{EntityTemplate, PoolCategory, TemplateTable};
use crate::sim::entity::Entity;

/// Hard cap on transient (non-pooled) spawns per level
pub const TRANSIENT_CAPACITY: usize = 64;

/// One pool: a fixed-length array of pre-spawned entities sharing a template
#[derive(Debug)]
pub struct Pool {
    pub template: Arc<EntityTemplate>,
    slots: Vec<Entity>,
}

impl Pool {
    pub fn new(template: Arc<EntityTemplate>, capacity: usize, slot_count: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| {
                let mut e = Entity::new(template.clone(), slot_count);
                // Fully spawned but inert and hidden until acquired
                e.spawned = true;
                e
            })
            .collect();
        Self { template, slots }
    }

    /// First inactive slot, marked live. Does not reset the slot's state;
    /// the caller applies `Entity::reset` before use.
    pub fn acquire(&mut self) -> Option<usize> {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if !slot.active {
                slot.active = true;
                slot.visible = true;
                return Some(i);
            }
        }
        warn!(
            template = %self.template.name,
            capacity = self.slots.len(),
            "Projectile pool exhausted"
        );
        None
    }

    /// Mark a slot inactive and hidden, leaving its state for the next
    /// acquire to reset
    pub fn release(&mut self, slot: usize) {
        match self.slots.get_mut(slot) {
            Some(e) => {
                e.active = false;
                e.visible = false;
            }
            None => warn!(
                template = %self.template.name,
                slot,
                "Release of out-of-range pool slot"
            ),
        }
    }

    pub fn get(&self, slot: usize) -> Option<&Entity> {
        self.slots.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Entity> {
        self.slots.get_mut(slot)
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|e| e.active).count()
    }
}

/// All pools for one level, keyed by projectile template name
#[derive(Debug, Default)]
pub struct PoolSet {
    pools: Vec<Pool>,
    by_template: HashMap<String, usize>,
}

impl PoolSet {
    /// Instantiate a pool for every template tagged with a pooled category
    pub fn build(templates: &TemplateTable, slot_count: usize) -> Self {
        let mut pools = Vec::new();
        let mut by_template = HashMap::new();

        for template in templates.iter() {
            if template.pool == PoolCategory::NotPooled {
                continue;
            }
            let capacity = template.pool.capacity();
            info!(
                template = %template.name,
                category = ?template.pool,
                capacity,
                "Building projectile pool"
            );
            by_template.insert(template.name.clone(), pools.len());
            pools.push(Pool::new(template.clone(), capacity, slot_count));
        }

        Self { pools, by_template }
    }

    /// Acquire a slot from the pool backing `template_name`
    pub fn acquire(&mut self, template_name: &str) -> Option<(usize, usize)> {
        let Some(&pool) = self.by_template.get(template_name) else {
            warn!(template = template_name, "No pool for template");
            return None;
        };
        let slot = self.pools[pool].acquire()?;
        Some((pool, slot))
    }

    pub fn pool(&self, index: usize) -> Option<&Pool> {
        self.pools.get(index)
    }

    pub fn pool_mut(&mut self, index: usize) -> Option<&mut Pool> {
        self.pools.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

/// Fixed-capacity bank for non-pooled spawns (gun attachments and other
/// one-offs). Slots are never recycled within a level: once the bank fills,
/// no further transient entities can spawn until the level reloads. This
/// asymmetry with the pools is preserved engine behavior.
#[derive(Debug)]
pub struct TransientBank {
    entities: Vec<Entity>,
    capacity: usize,
}

impl TransientBank {
    pub fn new(capacity: usize) -> Self {
        Self {
            entities: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a transient entity, yielding its stable index
    pub fn spawn(&mut self, entity: Entity) -> Option<usize> {
        if self.entities.len() >= self.capacity {
            warn!(capacity = self.capacity, "Transient entity bank exhausted");
            return None;
        }
        self.entities.push(entity);
        Some(self.entities.len() - 1)
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Entity> {
        self.entities.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for TransientBank {
    fn default() -> Self {
        Self::new(TRANSIENT_CAPACITY)
    }
}
