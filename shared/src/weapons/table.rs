//! Designer weapon data table
//!
//! One row per weapon type, stored as RON. The rest of the crate only sees the
//! table through [`WeaponTableProvider`], so hosts and tests can swap the source.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::config::WeaponPresentation;
use super::curve::SlideCurve;
use super::{AmmoType, ConfigError, WeaponType};

/// Current table format version
pub const TABLE_VERSION: u32 = 1;

/// Seconds a thrown weapon stays in the falling state when a row does not say
pub const DEFAULT_FALL_DURATION: f32 = 0.7;

/// Default slide travel time for rows that never move a slide
pub const DEFAULT_SLIDE_MOVE_DURATION: f32 = 0.1;

fn default_fall_duration() -> f32 {
    DEFAULT_FALL_DURATION
}

fn default_slide_move_duration() -> f32 {
    DEFAULT_SLIDE_MOVE_DURATION
}

/// A single designer-authored row
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponTableRow {
    pub ammo_type: AmmoType,
    /// Rounds loaded when the weapon is created
    pub weapon_ammo: u32,
    pub magazine_capacity: u32,
    pub item_name: String,
    /// Bone name of the magazine, used by the reload animation
    pub clip_name: String,
    pub reload_montage_section: String,
    /// Seconds between shots while the trigger is held
    pub auto_fire_rate: f32,
    pub is_automatic: bool,
    pub damage: f32,
    pub headshot_damage: f32,
    #[serde(default = "default_slide_move_duration")]
    pub slide_move_duration: f32,
    #[serde(default)]
    pub slide_displacement_max: f32,
    #[serde(default)]
    pub recoil_rotation_max: f32,
    #[serde(default)]
    pub slide_curve: SlideCurve,
    #[serde(default = "default_fall_duration")]
    pub fall_duration: f32,
    #[serde(default)]
    pub presentation: WeaponPresentation,
}

/// Source of weapon rows
pub trait WeaponTableProvider {
    fn find_row(&self, weapon_type: WeaponType) -> Option<&WeaponTableRow>;
}

/// The whole data table as loaded from disk
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaponTable {
    pub version: u32,
    /// Row name -> row
    pub rows: HashMap<String, WeaponTableRow>,
}

impl WeaponTable {
    /// Parse a table from RON text
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let table: WeaponTable =
            ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;

        if table.version != TABLE_VERSION {
            return Err(ConfigError::UnsupportedVersion(table.version));
        }

        Ok(table)
    }

    /// Read and parse a table file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_ron_str(&text)
    }

    pub fn insert(&mut self, weapon_type: WeaponType, row: WeaponTableRow) {
        self.rows.insert(weapon_type.row_name().to_string(), row);
    }
}

impl WeaponTableProvider for WeaponTable {
    fn find_row(&self, weapon_type: WeaponType) -> Option<&WeaponTableRow> {
        self.rows.get(weapon_type.row_name())
    }
}
