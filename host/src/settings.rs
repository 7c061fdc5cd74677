//! Host settings read from the environment

use std::path::PathBuf;
use std::time::Duration;

use bevy::prelude::*;

/// Env var pointing at the weapon data table
pub const WEAPON_TABLE_ENV: &str = "QSHOOTER_WEAPON_TABLE";

/// Env var overriding the frame rate of the host loop
pub const TICK_HZ_ENV: &str = "QSHOOTER_TICK_HZ";

/// Bundled table, relative to this crate so the host runs from any directory
pub const DEFAULT_WEAPON_TABLE: &str = "assets/weapons.ron";

pub const DEFAULT_TICK_HZ: f64 = 60.0;

#[derive(Resource, Debug, Clone)]
pub struct HostSettings {
    pub weapon_table: PathBuf,
    pub tick_hz: f64,
    /// Problems found while reading the environment, logged once logging is up
    pub notes: Vec<String>,
}

impl HostSettings {
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(WEAPON_TABLE_ENV).ok(),
            std::env::var(TICK_HZ_ENV).ok(),
        )
    }

    fn from_vars(table: Option<String>, tick_hz: Option<String>) -> Self {
        let mut notes = Vec::new();

        let weapon_table = table.map(PathBuf::from).unwrap_or_else(default_weapon_table);

        let tick_hz = match tick_hz {
            None => DEFAULT_TICK_HZ,
            Some(raw) => match raw.parse::<f64>() {
                Ok(hz) if hz.is_finite() && hz > 0.0 => hz,
                _ => {
                    notes.push(format!(
                        "{}={:?} is not a positive number, using {} Hz",
                        TICK_HZ_ENV, raw, DEFAULT_TICK_HZ
                    ));
                    DEFAULT_TICK_HZ
                }
            },
        };

        Self {
            weapon_table,
            tick_hz,
            notes,
        }
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_hz)
    }
}

pub fn default_weapon_table() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_WEAPON_TABLE)
}

/// Startup: report the effective settings
pub fn log_settings(settings: Res<HostSettings>) {
    for note in &settings.notes {
        warn!("{}", note);
    }
    info!(
        "Weapon table: {:?}, tick rate: {} Hz",
        settings.weapon_table, settings.tick_hz
    );
}
