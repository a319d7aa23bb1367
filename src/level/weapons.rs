//! Level-global weapon slot table

use serde::{Deserialize, Serialize};

/// Definition of one weapon slot, indexed by slot number across the level.
/// Every armed entity's per-slot state array lines up with this table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSlotDefinition {
    /// Projectile template fired by the primary trigger
    pub primary: String,
    /// Alternate projectile template (data-only for now)
    #[serde(default)]
    pub secondary: Option<String>,
    /// Seconds a reload takes; 0 disables reloading for this slot
    #[serde(default)]
    pub reload_duration: f32,
    /// Ammo restored when a reload completes
    #[serde(default)]
    pub magazine: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_definition_defaults() {
        let def: WeaponSlotDefinition =
            serde_json::from_str(r#"{ "primary": "laser" }"#).unwrap();
        assert_eq!(def.reload_duration, 0.0);
        assert_eq!(def.magazine, 0);
        assert!(def.secondary.is_none());
    }
}
