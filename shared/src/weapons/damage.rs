//! Damage calculation
//!
//! Per-weapon body and headshot damage come straight from the data table.

use serde::{Deserialize, Serialize};

use super::WeaponConfig;

/// Where a bullet landed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitZone {
    Head,
    #[default]
    Body,
}

impl HitZone {
    /// Map a bone name from a hit result to a zone
    pub fn from_bone_name(bone: &str) -> Self {
        if bone.eq_ignore_ascii_case("head") {
            HitZone::Head
        } else {
            HitZone::Body
        }
    }
}

/// Damage dealt by one bullet from this weapon
pub fn calculate_damage(config: &WeaponConfig, hit_zone: HitZone) -> f32 {
    match hit_zone {
        HitZone::Head => config.headshot_damage,
        HitZone::Body => config.damage,
    }
}

/// Result of a damage calculation
#[derive(Clone, Debug, PartialEq)]
pub struct DamageResult {
    pub damage: f32,
    pub hit_zone: HitZone,
    pub is_headshot: bool,
    pub is_kill: bool,
}

impl DamageResult {
    pub fn new(config: &WeaponConfig, hit_zone: HitZone, victim_health: f32) -> Self {
        let damage = calculate_damage(config, hit_zone);
        Self {
            damage,
            hit_zone,
            is_headshot: hit_zone == HitZone::Head,
            is_kill: damage >= victim_health,
        }
    }
}
