//! Level data consumed by the simulation
//!
//! Everything here is produced by the level-ingestion component (script
//! parsing, out of scope) and is immutable once a simulation is constructed.

pub mod geometry;
pub mod template;
pub mod weapons;

pub use geometry::{Linedef, LinedefStyle};
pub use template::{
    AttackMode, EntityTemplate, LightParams, MoveType, PoolCategory, Stats, ThinkMode,
};
pub use weapons::WeaponSlotDefinition;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Template lookup table, shared by name.
///
/// Definition order is preserved: iteration (and therefore pool construction
/// and serialization) walks the templates in the order the ingestion layer
/// defined them, so identical level data always yields identical pool
/// indices and byte-stable round-trips. A repeated name replaces the earlier
/// definition in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<EntityTemplate>", into = "Vec<EntityTemplate>")]
pub struct TemplateTable {
    entries: Vec<Arc<EntityTemplate>>,
    by_name: HashMap<String, usize>,
}

impl TemplateTable {
    pub fn new(templates: impl IntoIterator<Item = EntityTemplate>) -> Self {
        let mut entries: Vec<Arc<EntityTemplate>> = Vec::new();
        let mut by_name = HashMap::new();
        for template in templates {
            let template = Arc::new(template);
            match by_name.entry(template.name.clone()) {
                Entry::Occupied(slot) => entries[*slot.get()] = template,
                Entry::Vacant(slot) => {
                    slot.insert(entries.len());
                    entries.push(template);
                }
            }
        }
        Self { entries, by_name }
    }

    pub fn get(&self, name: &str) -> Option<Arc<EntityTemplate>> {
        self.by_name.get(name).map(|&i| self.entries[i].clone())
    }

    /// Templates in definition order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<EntityTemplate>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<EntityTemplate>> for TemplateTable {
    fn from(templates: Vec<EntityTemplate>) -> Self {
        Self::new(templates)
    }
}

impl From<TemplateTable> for Vec<EntityTemplate> {
    fn from(table: TemplateTable) -> Self {
        table.entries.iter().map(|t| (**t).clone()).collect()
    }
}

/// Placement of one level-resident entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpawn {
    pub template: String,
    pub x: f32,
    pub y: f32,
    /// Per-slot ammo loadout (items carry the ammo they grant here)
    #[serde(default)]
    pub ammo: Vec<u32>,
}

/// Everything the simulation needs from level ingestion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelData {
    #[serde(default)]
    pub linedefs: Vec<Linedef>,
    #[serde(default)]
    pub templates: TemplateTable,
    #[serde(default)]
    pub weapon_slots: Vec<WeaponSlotDefinition>,
    #[serde(default)]
    pub spawns: Vec<EntitySpawn>,
    /// The designated player entity
    pub player: Option<EntitySpawn>,
}

/// Level construction errors
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("Level data has no player spawn")]
    NoPlayerSpawn,

    #[error("Template not found: {0}")]
    MissingTemplate(String),
}
