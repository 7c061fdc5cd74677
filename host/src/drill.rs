//! Range drill - scripted exercise of every weapon in the table
//!
//! Each weapon is equipped to a drill holder, emptied at its fire rate,
//! reloaded, then thrown. The app exits once every thrown weapon has landed.

use bevy::prelude::*;
use rand::Rng;

use qshooter_shared::{
    spawn_weapon,
    weapons::throw::{MAX_THROW_OFFSET_DEGREES, MIN_THROW_OFFSET_DEGREES},
    AddAmmoRequest, AmmoChanged, DamageDealt, EquipRequest, FallFinished, FireRequest, HitRequest,
    ThrowRequest, Weapon, WeaponEquipped, WeaponRequestFailed, WeaponTable, WeaponTableResource,
    WeaponThrown, WeaponType,
};

use crate::settings::HostSettings;

/// Marker for the character that holds drill weapons
#[derive(Component)]
pub struct DrillHolder;

/// Marker for the target every drill shot lands on
#[derive(Component)]
pub struct DrillTarget;

const TARGET_HEALTH: f32 = 100.0;
/// Every Nth shot lands on the head
const HEADSHOT_EVERY: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrillStep {
    Firing,
    Reloading,
    Throwing,
    Falling,
    Done,
}

#[derive(Debug)]
pub struct DrillLane {
    pub weapon: Entity,
    pub step: DrillStep,
    /// Seconds until the next shot
    pub cooldown: f32,
    pub shots: u32,
}

#[derive(Resource, Debug, Default)]
pub struct Drill {
    pub target: Option<Entity>,
    pub lanes: Vec<DrillLane>,
}

impl Drill {
    pub fn is_finished(&self) -> bool {
        self.lanes.iter().all(|lane| lane.step == DrillStep::Done)
    }
}

/// Startup: read the designer table
pub fn load_weapon_table(
    mut commands: Commands,
    settings: Res<HostSettings>,
    mut exit: MessageWriter<AppExit>,
) {
    match WeaponTable::load(&settings.weapon_table) {
        Ok(table) => {
            info!("Loaded {} weapon rows", table.rows.len());
            commands.insert_resource(WeaponTableResource(table));
        }
        Err(e) => {
            error!("{}", e);
            exit.write(AppExit::error());
        }
    }
}

/// Startup: spawn the holder and one weapon per type, then equip them
pub fn setup_drill(
    mut commands: Commands,
    table: Option<Res<WeaponTableResource>>,
    mut equip: MessageWriter<EquipRequest>,
    mut exit: MessageWriter<AppExit>,
) {
    let Some(table) = table else {
        return;
    };

    let holder = commands.spawn((DrillHolder, Name::new("Drill Holder"))).id();
    let target = commands.spawn((DrillTarget, Name::new("Drill Target"))).id();
    let mut drill = Drill {
        target: Some(target),
        ..default()
    };

    for (i, weapon_type) in WeaponType::ALL.iter().copied().enumerate() {
        let transform = Transform::from_xyz(i as f32 * 2.0, 1.0, 0.0)
            .with_rotation(Quat::from_rotation_y(i as f32 * 0.5));

        match spawn_weapon(&mut commands, &table.0, weapon_type, transform) {
            Ok(weapon) => {
                equip.write(EquipRequest {
                    weapon,
                    holder: Some(holder),
                });
                drill.lanes.push(DrillLane {
                    weapon,
                    step: DrillStep::Firing,
                    cooldown: 0.0,
                    shots: 0,
                });
            }
            Err(e) => {
                error!("Cannot create {}: {}", weapon_type, e);
                exit.write(AppExit::error());
                return;
            }
        }
    }

    commands.insert_resource(drill);
}

/// Advance every lane by one frame
pub fn run_drill(
    time: Res<Time>,
    drill: Option<ResMut<Drill>>,
    weapons: Query<(&Weapon, &Transform)>,
    mut falls: MessageReader<FallFinished>,
    mut fire: MessageWriter<FireRequest>,
    mut hits: MessageWriter<HitRequest>,
    mut reload: MessageWriter<AddAmmoRequest>,
    mut throw: MessageWriter<ThrowRequest>,
    mut exit: MessageWriter<AppExit>,
) {
    let Some(mut drill) = drill else {
        return;
    };
    let target = drill.target;
    let dt = time.delta_secs();
    let landed: Vec<Entity> = falls.read().map(|f| f.weapon).collect();
    let mut rng = rand::thread_rng();

    for lane in drill.lanes.iter_mut() {
        let Ok((weapon, transform)) = weapons.get(lane.weapon) else {
            warn!("Drill weapon {:?} disappeared", lane.weapon);
            lane.step = DrillStep::Done;
            continue;
        };

        match lane.step {
            DrillStep::Firing => {
                if !weapon.has_ammo() {
                    info!(
                        "{} emptied after {} shots",
                        weapon.config().weapon_type,
                        lane.shots
                    );
                    reload.write(AddAmmoRequest {
                        weapon: lane.weapon,
                        amount: weapon.ammo_needed() as i32,
                    });
                    lane.step = DrillStep::Reloading;
                    continue;
                }

                lane.cooldown -= dt;
                if lane.cooldown <= 0.0 {
                    fire.write(FireRequest { weapon: lane.weapon });
                    lane.shots += 1;
                    if let Some(victim) = target {
                        let bone = if lane.shots % HEADSHOT_EVERY == 0 { "head" } else { "spine_02" };
                        hits.write(HitRequest {
                            weapon: lane.weapon,
                            victim,
                            bone: bone.to_string(),
                            victim_health: TARGET_HEALTH,
                        });
                    }
                    lane.cooldown = weapon.config().auto_fire_rate;
                }
            }
            DrillStep::Reloading => {
                if weapon.is_clip_full() {
                    lane.step = DrillStep::Throwing;
                }
            }
            DrillStep::Throwing => {
                let offset = rng.gen_range(MIN_THROW_OFFSET_DEGREES..=MAX_THROW_OFFSET_DEGREES);
                throw.write(ThrowRequest {
                    weapon: lane.weapon,
                    orientation: transform.rotation,
                    offset_degrees: offset,
                });
                lane.step = DrillStep::Falling;
            }
            DrillStep::Falling => {
                if landed.contains(&lane.weapon) {
                    lane.step = DrillStep::Done;
                }
            }
            DrillStep::Done => {}
        }
    }

    if drill.is_finished() {
        info!("Range drill complete");
        exit.write(AppExit::Success);
    }
}

/// Log what the weapons report
pub fn log_weapon_events(
    mut equipped: MessageReader<WeaponEquipped>,
    mut ammo: MessageReader<AmmoChanged>,
    mut thrown: MessageReader<WeaponThrown>,
    mut falls: MessageReader<FallFinished>,
    mut damage: MessageReader<DamageDealt>,
    mut failures: MessageReader<WeaponRequestFailed>,
) {
    for msg in equipped.read() {
        info!(
            "{:?} equipped by {:?} (sound: {:?})",
            msg.weapon, msg.holder, msg.equip_sound
        );
    }
    for msg in ammo.read() {
        debug!("{:?} ammo {}/{}", msg.weapon, msg.ammo, msg.capacity);
    }
    for msg in thrown.read() {
        info!("{:?} thrown with impulse {:?}", msg.weapon, msg.impulse);
    }
    for msg in falls.read() {
        info!("{:?} landed", msg.weapon);
    }
    for msg in damage.read() {
        debug!(
            "{:?} hit {:?} in the {:?} for {}",
            msg.weapon, msg.victim, msg.result.hit_zone, msg.result.damage
        );
    }
    for msg in failures.read() {
        error!("{:?} request failed: {}", msg.weapon, msg.error);
    }
}
