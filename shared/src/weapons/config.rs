//! Immutable per-weapon configuration
//!
//! Built once from a data table row when a weapon is created and never mutated
//! afterwards.

use serde::{Deserialize, Serialize};

use super::curve::SlideCurve;
use super::table::{WeaponTableProvider, WeaponTableRow};
use super::{AmmoType, ConfigError, WeaponType};

/// Asset references for collaborators (UI, audio, rendering).
///
/// Carried as opaque paths; nothing in this crate loads them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponPresentation {
    pub mesh: Option<String>,
    pub anim_blueprint: Option<String>,
    pub inventory_icon: Option<String>,
    pub ammo_icon: Option<String>,
    pub pickup_sound: Option<String>,
    pub equip_sound: Option<String>,
    pub fire_sound: Option<String>,
    pub muzzle_flash: Option<String>,
    pub material: Option<String>,
    pub material_index: Option<u32>,
    /// Bone hidden on spawn (e.g. a suppressor the mesh ships with)
    pub bone_to_hide: Option<String>,
    pub crosshair_middle: Option<String>,
    pub crosshair_left: Option<String>,
    pub crosshair_right: Option<String>,
    pub crosshair_up: Option<String>,
    pub crosshair_bottom: Option<String>,
}

/// Tunable weapon parameters
#[derive(Clone, Debug, PartialEq)]
pub struct WeaponConfig {
    pub weapon_type: WeaponType,
    pub ammo_type: AmmoType,
    /// Rounds loaded at creation
    pub initial_ammo: u32,
    pub magazine_capacity: u32,
    pub item_name: String,
    pub clip_name: String,
    pub reload_montage_section: String,
    pub is_automatic: bool,
    /// Seconds between automatic shots
    pub auto_fire_rate: f32,
    pub damage: f32,
    pub headshot_damage: f32,
    pub slide_move_duration: f32,
    pub slide_displacement_max: f32,
    pub recoil_rotation_max: f32,
    pub slide_curve: SlideCurve,
    pub fall_duration: f32,
    pub presentation: WeaponPresentation,
}

impl WeaponConfig {
    /// Look up the row for `weapon_type` and build a validated config
    pub fn from_provider(
        provider: &dyn WeaponTableProvider,
        weapon_type: WeaponType,
    ) -> Result<Self, ConfigError> {
        let row = provider
            .find_row(weapon_type)
            .ok_or(ConfigError::MissingRow(weapon_type))?;
        Self::from_row(weapon_type, row)
    }

    pub fn from_row(weapon_type: WeaponType, row: &WeaponTableRow) -> Result<Self, ConfigError> {
        let config = Self {
            weapon_type,
            ammo_type: row.ammo_type,
            initial_ammo: row.weapon_ammo,
            magazine_capacity: row.magazine_capacity,
            item_name: row.item_name.clone(),
            clip_name: row.clip_name.clone(),
            reload_montage_section: row.reload_montage_section.clone(),
            is_automatic: row.is_automatic,
            auto_fire_rate: row.auto_fire_rate,
            damage: row.damage,
            headshot_damage: row.headshot_damage,
            slide_move_duration: row.slide_move_duration,
            slide_displacement_max: row.slide_displacement_max,
            recoil_rotation_max: row.recoil_rotation_max,
            slide_curve: row.slide_curve.clone(),
            fall_duration: row.fall_duration,
            presentation: row.presentation.clone(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants a [`WeaponState`](super::WeaponState) relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weapon = self.weapon_type;
        if self.magazine_capacity == 0 {
            return Err(ConfigError::ZeroCapacity(weapon));
        }
        if self.initial_ammo > self.magazine_capacity {
            return Err(ConfigError::AmmoExceedsCapacity {
                weapon,
                ammo: self.initial_ammo,
                capacity: self.magazine_capacity,
            });
        }
        check_duration(weapon, "slide_move_duration", self.slide_move_duration)?;
        check_duration(weapon, "fall_duration", self.fall_duration)?;
        self.slide_curve.validate()
    }

    pub fn is_slide_movable(&self) -> bool {
        self.weapon_type.is_slide_movable()
    }
}

fn check_duration(weapon: WeaponType, field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDuration { weapon, field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weapons::table::{tests::TEST_TABLE, WeaponTable};

    fn pistol_row() -> WeaponTableRow {
        let table = WeaponTable::from_ron_str(TEST_TABLE).unwrap();
        table.find_row(WeaponType::Pistol).unwrap().clone()
    }

    #[test]
    fn test_config_from_table() {
        let table = WeaponTable::from_ron_str(TEST_TABLE).unwrap();
        let config = WeaponConfig::from_provider(&table, WeaponType::Pistol).unwrap();

        assert_eq!(config.magazine_capacity, 15);
        assert_eq!(config.initial_ammo, 15);
        assert!(config.is_slide_movable());
        assert!(!config.is_automatic);
        assert_eq!(config.headshot_damage, 30.0);
    }

    #[test]
    fn test_missing_row_is_an_error() {
        let table = WeaponTable::from_ron_str(TEST_TABLE).unwrap();
        let err = WeaponConfig::from_provider(&table, WeaponType::SubmachineGun).unwrap_err();
        assert_eq!(err, ConfigError::MissingRow(WeaponType::SubmachineGun));
    }

    #[test]
    fn test_ammo_over_capacity_rejected() {
        let mut row = pistol_row();
        row.weapon_ammo = 16;
        let err = WeaponConfig::from_row(WeaponType::Pistol, &row).unwrap_err();
        assert!(matches!(err, ConfigError::AmmoExceedsCapacity { ammo: 16, capacity: 15, .. }));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut row = pistol_row();
        row.magazine_capacity = 0;
        row.weapon_ammo = 0;
        let err = WeaponConfig::from_row(WeaponType::Pistol, &row).unwrap_err();
        assert_eq!(err, ConfigError::ZeroCapacity(WeaponType::Pistol));
    }

    #[test]
    fn test_bad_durations_rejected() {
        let mut row = pistol_row();
        row.slide_move_duration = 0.0;
        assert!(matches!(
            WeaponConfig::from_row(WeaponType::Pistol, &row),
            Err(ConfigError::InvalidDuration { field: "slide_move_duration", .. })
        ));

        let mut row = pistol_row();
        row.fall_duration = f32::INFINITY;
        assert!(matches!(
            WeaponConfig::from_row(WeaponType::Pistol, &row),
            Err(ConfigError::InvalidDuration { field: "fall_duration", .. })
        ));
    }

    #[test]
    fn test_unordered_curve_rejected() {
        let text = TEST_TABLE.replace("(0.05, 1.0), (0.15, 0.0)", "(0.15, 1.0), (0.05, 0.0)");
        let table = WeaponTable::from_ron_str(&text).unwrap();
        assert!(matches!(
            WeaponConfig::from_provider(&table, WeaponType::Pistol),
            Err(ConfigError::InvalidCurve(_))
        ));
    }
}
