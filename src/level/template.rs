//! Entity templates - the shared, immutable archetype definitions
//!
//! Templates are populated by the level-ingestion layer before simulation
//! starts and shared by reference (`Arc`) between every instance; an entity's
//! template is set at creation and never reassigned.

use serde::{Deserialize, Serialize};

/// Physics behavior tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveType {
    /// No gravity, no input; position only follows any externally set velocity
    Static,
    /// Gravity-affected bipedal movement with jumping
    Walk,
    /// Free floating, both axes input-driven
    Fly,
}

impl Default for MoveType {
    fn default() -> Self {
        Self::Static
    }
}

/// AI/control behavior tag selecting the update routine run each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThinkMode {
    None,
    /// Interprets raw input state (the player)
    User,
    /// Flies along its aim angle and expires
    Missile,
    /// Waits to be picked up by the player
    Item,
}

impl Default for ThinkMode {
    fn default() -> Self {
        Self::None
    }
}

/// Attack behavior tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackMode {
    None,
    /// Fires the active weapon slot
    Shoot,
    /// Self-destructs on any collision contact
    Blow,
}

impl Default for AttackMode {
    fn default() -> Self {
        Self::None
    }
}

/// Pool archetype tag; templates default to not pooled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolCategory {
    NotPooled,
    Laser,
    Flame,
    Rocket,
    GuidedRocket,
}

impl Default for PoolCategory {
    fn default() -> Self {
        Self::NotPooled
    }
}

impl PoolCategory {
    /// Fixed slot count for each pooled archetype
    pub fn capacity(self) -> usize {
        match self {
            Self::NotPooled => 0,
            Self::Laser | Self::Flame => 128,
            Self::Rocket => 64,
            Self::GuidedRocket => 32,
        }
    }
}

/// Per-template integer stat table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    /// Damage per hit
    pub damage: i32,
    /// Projectiles spawned per trigger pull (0/1 = single shot)
    pub multishot: i32,
    /// Missile lifespan override in milliseconds (0 = engine default)
    pub lifetime_ms: i32,
    /// Expand-over-lifetime fx toggle
    pub expand: i32,
    /// Fade-over-lifetime fx toggle
    pub fade: i32,
}

/// Light emission parameters, consumed by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightParams {
    pub radius: f32,
    pub flashlight: bool,
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            radius: 0.0,
            flashlight: false,
        }
    }
}

/// Shared, immutable definition of an entity archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTemplate {
    pub name: String,

    /// Bounding half-extents
    pub half_width: f32,
    pub half_height: f32,

    #[serde(default)]
    pub move_type: MoveType,
    /// Movement speed multiplier
    #[serde(default = "one")]
    pub speed: f32,

    #[serde(default)]
    pub think: ThinkMode,
    /// Think-mode speed modifier (missile flight speed scale)
    #[serde(default = "one")]
    pub think_speed: f32,

    #[serde(default)]
    pub attack: AttackMode,
    /// Seconds between shots before the slot-0 asymmetry factor
    #[serde(default)]
    pub attack_delay: f32,

    #[serde(default)]
    pub stats: Stats,

    #[serde(default)]
    pub light: Option<LightParams>,

    /// Template name of the gun attachment spawned alongside an armed owner
    #[serde(default)]
    pub gun_entity: Option<String>,

    #[serde(default)]
    pub pool: PoolCategory,
}

fn one() -> f32 {
    1.0
}
