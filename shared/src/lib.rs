//! Shared weapon logic for QShooter
//!
//! Data-table driven weapon configuration, the ammo/slide/throw state machine,
//! and the Bevy plugin that drives it from a host loop.

pub mod systems;
pub mod timer;
pub mod weapons;

pub use systems::*;
pub use timer::TaskTimer;
pub use weapons::{
    AmmoType, ConfigError, DamageResult, FireResult, HitZone, ItemState, WeaponConfig, WeaponError, WeaponState,
    WeaponTable, WeaponTableProvider, WeaponTableRow, WeaponTick, WeaponType,
};
