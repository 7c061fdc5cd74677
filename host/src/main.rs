//! QShooter host - headless Bevy app that drives weapons frame by frame
//!
//! Loads the designer weapon table and runs the range drill.

mod drill;
mod settings;

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use qshooter_shared::{WeaponPlugin, WeaponSystems};

use settings::HostSettings;

fn main() -> AppExit {
    let settings = HostSettings::from_env();

    let mut app = App::new();

    // Headless plugins (no rendering), one frame per tick
    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(settings.tick_duration())));
    app.add_plugins(bevy::log::LogPlugin::default());

    app.add_plugins(WeaponPlugin);
    app.insert_resource(settings);

    app.add_systems(
        Startup,
        (settings::log_settings, drill::load_weapon_table, drill::setup_drill).chain(),
    );

    // Drill writes requests before the weapon systems consume them, and reads
    // their notifications afterwards.
    app.add_systems(
        Update,
        (
            drill::run_drill.before(WeaponSystems),
            drill::log_weapon_events.after(WeaponSystems),
        ),
    );

    app.run()
}
