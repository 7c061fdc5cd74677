//! Weapon system - types, data table, configuration and runtime state
//!
//! Weapon parameters come from a designer-authored data table, are frozen into a
//! [`WeaponConfig`] once per weapon, and drive a small [`WeaponState`] machine
//! (ammo, pistol slide recoil, throw/fall).

pub mod config;
pub mod curve;
pub mod damage;
pub mod state;
pub mod table;
pub mod throw;

use serde::{Deserialize, Serialize};

pub use config::{WeaponConfig, WeaponPresentation};
pub use curve::SlideCurve;
pub use damage::{DamageResult, HitZone};
pub use state::{FireResult, ItemState, WeaponState, WeaponTick};
pub use table::{WeaponTable, WeaponTableProvider, WeaponTableRow};

/// Available weapon types
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum WeaponType {
    SubmachineGun,
    AssaultRifle,
    #[default]
    Pistol,
}

/// Ammo a weapon consumes from pickups
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum AmmoType {
    NineMm,
    AssaultRifle,
}

impl WeaponType {
    pub const ALL: [WeaponType; 3] = [
        WeaponType::SubmachineGun,
        WeaponType::AssaultRifle,
        WeaponType::Pistol,
    ];

    /// Name of this weapon's row in the data table
    pub fn row_name(&self) -> &'static str {
        match self {
            WeaponType::SubmachineGun => "SubmachineGun",
            WeaponType::AssaultRifle => "AssaultRifle",
            WeaponType::Pistol => "Pistol",
        }
    }

    /// Only pistols animate a slide after firing
    pub fn is_slide_movable(&self) -> bool {
        matches!(self, WeaponType::Pistol)
    }
}

impl std::fmt::Display for WeaponType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.row_name())
    }
}

/// Errors raised while turning designer data into a [`WeaponConfig`]
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The data table file could not be read.
    Io(String),
    /// The data table text is not valid RON for a [`WeaponTable`].
    Parse(String),
    /// The data table declares a format version this crate does not read.
    UnsupportedVersion(u32),
    /// No row exists for the requested weapon type.
    MissingRow(WeaponType),
    /// Magazine capacity of zero.
    ZeroCapacity(WeaponType),
    /// Initial ammo is larger than the magazine.
    AmmoExceedsCapacity { weapon: WeaponType, ammo: u32, capacity: u32 },
    /// A duration is zero, negative or not finite.
    InvalidDuration { weapon: WeaponType, field: &'static str, value: f32 },
    /// The slide curve is empty, has non-finite keys, or key times do not increase.
    InvalidCurve(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Failed to read weapon table: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Failed to parse weapon table: {}", msg),
            ConfigError::UnsupportedVersion(v) => {
                write!(f, "Unsupported weapon table version {} (expected {})", v, table::TABLE_VERSION)
            }
            ConfigError::MissingRow(weapon) => write!(f, "No weapon table row for {}", weapon),
            ConfigError::ZeroCapacity(weapon) => write!(f, "{} has a magazine capacity of 0", weapon),
            ConfigError::AmmoExceedsCapacity { weapon, ammo, capacity } => write!(
                f,
                "{} starts with {} rounds but the magazine holds {}",
                weapon, ammo, capacity
            ),
            ConfigError::InvalidDuration { weapon, field, value } => {
                write!(f, "{} has an invalid {}: {}", weapon, field, value)
            }
            ConfigError::InvalidCurve(msg) => write!(f, "Invalid slide curve: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised by malformed calls against a [`WeaponState`]
#[derive(Debug, Clone, PartialEq)]
pub enum WeaponError {
    /// Ammo delta is negative or larger than the whole magazine.
    InvalidDelta { delta: i32, capacity: u32 },
    /// Adding the delta would overfill the magazine.
    Overflow { ammo: u32, delta: u32, capacity: u32 },
    /// Equip was called without a holder.
    MissingHolder,
    /// Throw offset outside of [`throw::MIN_THROW_OFFSET_DEGREES`, `throw::MAX_THROW_OFFSET_DEGREES`].
    ThrowAngleOutOfRange(f32),
}

impl std::fmt::Display for WeaponError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeaponError::InvalidDelta { delta, capacity } => {
                write!(f, "Ammo delta {} is outside 0..={}", delta, capacity)
            }
            WeaponError::Overflow { ammo, delta, capacity } => write!(
                f,
                "Adding {} rounds to {} would exceed magazine capacity {}",
                delta, ammo, capacity
            ),
            WeaponError::MissingHolder => write!(f, "Weapon equipped without a holder"),
            WeaponError::ThrowAngleOutOfRange(angle) => write!(
                f,
                "Throw offset {} is outside {}..={} degrees",
                angle,
                throw::MIN_THROW_OFFSET_DEGREES,
                throw::MAX_THROW_OFFSET_DEGREES
            ),
        }
    }
}

impl std::error::Error for WeaponError {}
