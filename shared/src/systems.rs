//! Bevy integration for weapons
//!
//! Hosts drive weapons by writing request messages; [`WeaponPlugin`] applies
//! them to each weapon's [`WeaponState`], ticks slide and fall timers from
//! frame time and reports what changed through output messages for UI, audio
//! and physics collaborators.
//!
//! A weapon's timers live inside its component, so despawning the entity
//! cancels anything still pending.

use bevy::prelude::*;

use crate::weapons::{
    ConfigError, DamageResult, FireResult, HitZone, WeaponConfig, WeaponError, WeaponState,
    WeaponTable, WeaponTableProvider, WeaponType,
};

/// A weapon entity's runtime state
#[derive(Component, Debug, Deref, DerefMut)]
pub struct Weapon(pub WeaponState);

/// Bone the renderer hides on the weapon mesh (e.g. a suppressor the mesh ships with)
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct HiddenBone(pub String);

/// The designer data table, loaded once by the host
#[derive(Resource, Debug, Clone, Deref)]
pub struct WeaponTableResource(pub WeaponTable);

// --- Requests (host -> weapon) ---

#[derive(Message, Debug, Clone)]
pub struct EquipRequest {
    pub weapon: Entity,
    pub holder: Option<Entity>,
}

#[derive(Message, Debug, Clone)]
pub struct FireRequest {
    pub weapon: Entity,
}

#[derive(Message, Debug, Clone)]
pub struct AddAmmoRequest {
    pub weapon: Entity,
    pub amount: i32,
}

#[derive(Message, Debug, Clone)]
pub struct ThrowRequest {
    pub weapon: Entity,
    /// Current world orientation of the weapon mesh
    pub orientation: Quat,
    /// Swing about the up axis, in degrees
    pub offset_degrees: f32,
}

/// A bullet from `weapon` hit a character on `bone`
#[derive(Message, Debug, Clone)]
pub struct HitRequest {
    pub weapon: Entity,
    pub victim: Entity,
    pub bone: String,
    pub victim_health: f32,
}

// --- Notifications (weapon -> collaborators) ---

#[derive(Message, Debug, Clone, PartialEq)]
pub struct WeaponEquipped {
    pub weapon: Entity,
    pub holder: Entity,
    pub equip_sound: Option<String>,
}

#[derive(Message, Debug, Clone, PartialEq)]
pub struct WeaponFired {
    pub weapon: Entity,
    pub fire_sound: Option<String>,
    pub muzzle_flash: Option<String>,
}

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct AmmoChanged {
    pub weapon: Entity,
    pub ammo: u32,
    pub capacity: u32,
}

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct SlideDisplacementChanged {
    pub weapon: Entity,
    pub displacement: f32,
    pub recoil_rotation: f32,
}

/// Apply `impulse` to the weapon's physics body
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct WeaponThrown {
    pub weapon: Entity,
    pub impulse: Vec3,
}

/// Damage for a confirmed hit, for health and hit-marker collaborators
#[derive(Message, Debug, Clone, PartialEq)]
pub struct DamageDealt {
    pub weapon: Entity,
    pub victim: Entity,
    pub result: DamageResult,
}

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct FallFinished {
    pub weapon: Entity,
}

/// A request was malformed (bad ammo delta, missing holder, bad throw angle)
#[derive(Message, Debug, Clone, PartialEq)]
pub struct WeaponRequestFailed {
    pub weapon: Entity,
    pub error: WeaponError,
}

/// All weapon request handling and ticking
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeaponSystems;

pub struct WeaponPlugin;

impl Plugin for WeaponPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<EquipRequest>()
            .add_message::<FireRequest>()
            .add_message::<AddAmmoRequest>()
            .add_message::<ThrowRequest>()
            .add_message::<HitRequest>();

        app.add_message::<WeaponEquipped>()
            .add_message::<WeaponFired>()
            .add_message::<AmmoChanged>()
            .add_message::<SlideDisplacementChanged>()
            .add_message::<WeaponThrown>()
            .add_message::<DamageDealt>()
            .add_message::<FallFinished>()
            .add_message::<WeaponRequestFailed>();

        app.add_systems(
            Update,
            (
                handle_equip_requests,
                handle_fire_requests,
                handle_hit_requests,
                handle_add_ammo_requests,
                handle_throw_requests,
                tick_weapons,
            )
                .chain()
                .in_set(WeaponSystems),
        );
    }
}

/// Build a weapon's config from the table and spawn it
pub fn spawn_weapon(
    commands: &mut Commands,
    provider: &dyn WeaponTableProvider,
    weapon_type: WeaponType,
    transform: Transform,
) -> Result<Entity, ConfigError> {
    let config = WeaponConfig::from_provider(provider, weapon_type)?;
    let name = Name::new(config.item_name.clone());
    let hidden_bone = config.presentation.bone_to_hide.clone();

    let mut entity = commands.spawn((Weapon(WeaponState::new(config)?), name, transform));
    if let Some(bone) = hidden_bone {
        entity.insert(HiddenBone(bone));
    }
    let entity = entity.id();

    info!("Spawned {} weapon {:?}", weapon_type, entity);
    Ok(entity)
}

fn report_failure(
    failures: &mut MessageWriter<WeaponRequestFailed>,
    weapon: Entity,
    error: WeaponError,
) {
    warn!("Weapon {:?} rejected request: {}", weapon, error);
    failures.write(WeaponRequestFailed { weapon, error });
}

pub fn handle_equip_requests(
    mut requests: MessageReader<EquipRequest>,
    mut weapons: Query<&mut Weapon>,
    mut equipped: MessageWriter<WeaponEquipped>,
    mut failures: MessageWriter<WeaponRequestFailed>,
) {
    for request in requests.read() {
        let Ok(mut weapon) = weapons.get_mut(request.weapon) else {
            warn!("Equip request for unknown weapon {:?}", request.weapon);
            continue;
        };

        match weapon.set_to_equipped(request.holder) {
            Ok(()) => {
                if let Some(holder) = weapon.holder() {
                    equipped.write(WeaponEquipped {
                        weapon: request.weapon,
                        holder,
                        equip_sound: weapon.config().presentation.equip_sound.clone(),
                    });
                }
            }
            Err(e) => report_failure(&mut failures, request.weapon, e),
        }
    }
}

pub fn handle_fire_requests(
    mut requests: MessageReader<FireRequest>,
    mut weapons: Query<&mut Weapon>,
    mut fired: MessageWriter<WeaponFired>,
    mut ammo_changed: MessageWriter<AmmoChanged>,
) {
    for request in requests.read() {
        let Ok(mut weapon) = weapons.get_mut(request.weapon) else {
            warn!("Fire request for unknown weapon {:?}", request.weapon);
            continue;
        };

        match weapon.fire() {
            FireResult::Fired => {
                let presentation = &weapon.config().presentation;
                fired.write(WeaponFired {
                    weapon: request.weapon,
                    fire_sound: presentation.fire_sound.clone(),
                    muzzle_flash: presentation.muzzle_flash.clone(),
                });
                ammo_changed.write(AmmoChanged {
                    weapon: request.weapon,
                    ammo: weapon.ammo(),
                    capacity: weapon.magazine_capacity(),
                });
            }
            FireResult::NoAmmo => {
                debug!("Weapon {:?} is empty", request.weapon);
            }
        }
    }
}

pub fn handle_hit_requests(
    mut requests: MessageReader<HitRequest>,
    weapons: Query<&Weapon>,
    mut dealt: MessageWriter<DamageDealt>,
) {
    for request in requests.read() {
        let Ok(weapon) = weapons.get(request.weapon) else {
            warn!("Hit request for unknown weapon {:?}", request.weapon);
            continue;
        };

        let zone = HitZone::from_bone_name(&request.bone);
        let result = DamageResult::new(weapon.config(), zone, request.victim_health);
        if result.is_kill {
            info!("{:?} killed {:?} ({:?})", request.weapon, request.victim, zone);
        }
        dealt.write(DamageDealt {
            weapon: request.weapon,
            victim: request.victim,
            result,
        });
    }
}

pub fn handle_add_ammo_requests(
    mut requests: MessageReader<AddAmmoRequest>,
    mut weapons: Query<&mut Weapon>,
    mut ammo_changed: MessageWriter<AmmoChanged>,
    mut failures: MessageWriter<WeaponRequestFailed>,
) {
    for request in requests.read() {
        let Ok(mut weapon) = weapons.get_mut(request.weapon) else {
            warn!("Ammo request for unknown weapon {:?}", request.weapon);
            continue;
        };

        match weapon.add_ammo(request.amount) {
            Ok(ammo) => {
                ammo_changed.write(AmmoChanged {
                    weapon: request.weapon,
                    ammo,
                    capacity: weapon.magazine_capacity(),
                });
            }
            Err(e) => report_failure(&mut failures, request.weapon, e),
        }
    }
}

pub fn handle_throw_requests(
    mut requests: MessageReader<ThrowRequest>,
    mut weapons: Query<&mut Weapon>,
    mut thrown: MessageWriter<WeaponThrown>,
    mut failures: MessageWriter<WeaponRequestFailed>,
) {
    for request in requests.read() {
        let Ok(mut weapon) = weapons.get_mut(request.weapon) else {
            warn!("Throw request for unknown weapon {:?}", request.weapon);
            continue;
        };

        match weapon.throw_weapon(request.orientation, request.offset_degrees) {
            Ok(impulse) => {
                thrown.write(WeaponThrown {
                    weapon: request.weapon,
                    impulse,
                });
            }
            Err(e) => report_failure(&mut failures, request.weapon, e),
        }
    }
}

/// Per-frame update: slide recoil and fall timers
pub fn tick_weapons(
    time: Res<Time>,
    mut weapons: Query<(Entity, &mut Weapon)>,
    mut slide_changed: MessageWriter<SlideDisplacementChanged>,
    mut fall_finished: MessageWriter<FallFinished>,
) {
    let dt = time.delta_secs();

    for (entity, mut weapon) in weapons.iter_mut() {
        let tick = weapon.advance_time(dt);

        if tick.slide_changed {
            slide_changed.write(SlideDisplacementChanged {
                weapon: entity,
                displacement: weapon.slide_displacement(),
                recoil_rotation: weapon.recoil_rotation(),
            });
        }
        if tick.fall_finished {
            fall_finished.write(FallFinished { weapon: entity });
        }
    }
}
