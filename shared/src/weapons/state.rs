//! Runtime weapon state machine
//!
//! Owns the mutable half of a weapon: ammo, pistol slide recoil and the
//! thrown/falling state. Everything is driven by explicit calls from the host
//! loop: `fire`, `add_ammo`, `throw_weapon`, `set_to_equipped` and a per-frame
//! `advance_time`.

use bevy::prelude::*;

use super::config::WeaponConfig;
use super::throw::throw_impulse;
use super::{ConfigError, WeaponError};
use crate::timer::TaskTimer;

/// Outcome of pulling the trigger
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireResult {
    Fired,
    /// Empty magazine. Not an error; nothing changed.
    NoAmmo,
}

/// Where the weapon is in its pickup lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ItemState {
    /// Lying in the world, can be picked up
    #[default]
    ToPickUp,
    Equipped,
    /// Thrown and still airborne
    Falling,
}

/// What happened during one `advance_time` call
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WeaponTick {
    /// Slide displacement or recoil rotation changed this tick
    pub slide_changed: bool,
    /// The slide finished its travel this tick
    pub slide_finished: bool,
    /// The fall timer expired this tick
    pub fall_finished: bool,
}

#[derive(Clone, Debug)]
pub struct WeaponState {
    config: WeaponConfig,
    ammo: u32,
    slide_moving: bool,
    slide_timer: TaskTimer,
    slide_displacement: f32,
    recoil_rotation: f32,
    falling: bool,
    fall_timer: TaskTimer,
    item_state: ItemState,
    holder: Option<Entity>,
}

impl WeaponState {
    /// Create the runtime state for a weapon.
    ///
    /// The config is re-validated here, so a config edited after
    /// [`WeaponConfig::from_row`] cannot start a weapon above capacity.
    pub fn new(config: WeaponConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let ammo = config.initial_ammo;
        Ok(Self {
            config,
            ammo,
            slide_moving: false,
            slide_timer: TaskTimer::default(),
            slide_displacement: 0.0,
            recoil_rotation: 0.0,
            falling: false,
            fall_timer: TaskTimer::default(),
            item_state: ItemState::ToPickUp,
            holder: None,
        })
    }

    /// Fire one round
    pub fn fire(&mut self) -> FireResult {
        if self.ammo == 0 {
            return FireResult::NoAmmo;
        }

        self.ammo -= 1;
        if self.config.is_slide_movable() {
            self.slide_moving = true;
            self.slide_timer.schedule(self.config.slide_move_duration);
        }
        FireResult::Fired
    }

    /// Load `delta` rounds. Returns the new ammo count.
    ///
    /// The magazine is never overfilled: a delta outside `0..=capacity` or one
    /// that would push past capacity is rejected and nothing changes.
    pub fn add_ammo(&mut self, delta: i32) -> Result<u32, WeaponError> {
        let capacity = self.config.magazine_capacity;
        let delta = u32::try_from(delta)
            .ok()
            .filter(|d| *d <= capacity)
            .ok_or(WeaponError::InvalidDelta { delta, capacity })?;

        self.ammo = self
            .ammo
            .checked_add(delta)
            .filter(|ammo| *ammo <= capacity)
            .ok_or(WeaponError::Overflow {
                ammo: self.ammo,
                delta,
                capacity,
            })?;
        Ok(self.ammo)
    }

    /// Advance slide and fall timers by `dt` seconds
    pub fn advance_time(&mut self, dt: f32) -> WeaponTick {
        let mut tick = WeaponTick::default();
        if !dt.is_finite() || dt < 0.0 {
            warn!("Ignoring invalid weapon time step {}", dt);
            return tick;
        }

        if self.slide_moving {
            if self.slide_timer.tick(dt) {
                self.finish_slide();
                tick.slide_finished = true;
            } else {
                self.update_slide_displacement();
            }
            tick.slide_changed = true;
        }

        if self.fall_timer.tick(dt) {
            self.on_fall_timer_expire();
            tick.fall_finished = true;
        }

        tick
    }

    pub fn is_clip_full(&self) -> bool {
        self.ammo == self.config.magazine_capacity
    }

    pub fn has_ammo(&self) -> bool {
        self.ammo > 0
    }

    /// Rounds a reload may add without overfilling
    pub fn ammo_needed(&self) -> u32 {
        self.config.magazine_capacity - self.ammo
    }

    /// Toss the weapon away from its current orientation.
    ///
    /// Returns the impulse to hand to the physics body. The weapon stays in
    /// the falling state until its fall timer expires.
    pub fn throw_weapon(&mut self, orientation: Quat, offset_degrees: f32) -> Result<Vec3, WeaponError> {
        let impulse = throw_impulse(orientation, offset_degrees)?;

        self.falling = true;
        self.item_state = ItemState::Falling;
        self.holder = None;
        self.fall_timer.schedule(self.config.fall_duration);

        Ok(impulse)
    }

    /// Land a thrown weapon. Does nothing unless the weapon is falling.
    pub fn on_fall_timer_expire(&mut self) {
        if !self.falling {
            return;
        }
        self.falling = false;
        self.fall_timer.cancel();
        self.item_state = ItemState::ToPickUp;
    }

    /// Hand the weapon to `holder`
    pub fn set_to_equipped(&mut self, holder: Option<Entity>) -> Result<(), WeaponError> {
        let holder = holder.ok_or(WeaponError::MissingHolder)?;

        self.holder = Some(holder);
        self.item_state = ItemState::Equipped;
        self.falling = false;
        self.fall_timer.cancel();
        Ok(())
    }

    fn update_slide_displacement(&mut self) {
        let curve_value = self.config.slide_curve.sample(self.slide_timer.elapsed());
        self.slide_displacement = curve_value * self.config.slide_displacement_max;
        self.recoil_rotation = curve_value * self.config.recoil_rotation_max;
    }

    fn finish_slide(&mut self) {
        debug!("Finished moving {} slide", self.config.weapon_type);
        self.slide_moving = false;
        self.slide_displacement = 0.0;
        self.recoil_rotation = 0.0;
    }

    pub fn config(&self) -> &WeaponConfig {
        &self.config
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn magazine_capacity(&self) -> u32 {
        self.config.magazine_capacity
    }

    pub fn is_slide_moving(&self) -> bool {
        self.slide_moving
    }

    /// Seconds since the last shot started the slide (0 when idle)
    pub fn slide_elapsed(&self) -> f32 {
        self.slide_timer.elapsed()
    }

    pub fn slide_displacement(&self) -> f32 {
        self.slide_displacement
    }

    pub fn recoil_rotation(&self) -> f32 {
        self.recoil_rotation
    }

    pub fn is_falling(&self) -> bool {
        self.falling
    }

    pub fn item_state(&self) -> ItemState {
        self.item_state
    }

    pub fn holder(&self) -> Option<Entity> {
        self.holder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weapons::table::{tests::TEST_TABLE, WeaponTable, WeaponTableProvider};
    use crate::weapons::WeaponType;

    fn weapon(weapon_type: WeaponType) -> WeaponState {
        let table = WeaponTable::from_ron_str(TEST_TABLE).unwrap();
        WeaponState::new(WeaponConfig::from_provider(&table, weapon_type).unwrap()).unwrap()
    }

    fn pistol() -> WeaponState {
        weapon(WeaponType::Pistol)
    }

    fn empty_pistol() -> WeaponState {
        let mut pistol = pistol();
        while pistol.fire() == FireResult::Fired {}
        pistol
    }

    #[test]
    fn test_pistol_fire_then_slide_returns() {
        let mut pistol = pistol();
        assert_eq!(pistol.ammo(), 15);

        assert_eq!(pistol.fire(), FireResult::Fired);
        assert_eq!(pistol.ammo(), 14);
        assert!(pistol.is_slide_moving());

        let tick = pistol.advance_time(pistol.config().slide_move_duration);
        assert!(tick.slide_finished);
        assert!(!pistol.is_slide_moving());
        assert_eq!(pistol.slide_displacement(), 0.0);
        assert_eq!(pistol.recoil_rotation(), 0.0);
    }

    #[test]
    fn test_fire_empty_is_noop() {
        let mut pistol = empty_pistol();
        pistol.advance_time(1.0);
        let before = (pistol.ammo(), pistol.is_slide_moving(), pistol.slide_displacement());

        assert_eq!(pistol.fire(), FireResult::NoAmmo);
        assert_eq!(pistol.ammo(), 0);
        assert_eq!(
            (pistol.ammo(), pistol.is_slide_moving(), pistol.slide_displacement()),
            before
        );
    }

    #[test]
    fn test_n_shots_consume_n_rounds() {
        for n in 0..=15 {
            let mut pistol = pistol();
            for _ in 0..n {
                assert_eq!(pistol.fire(), FireResult::Fired);
            }
            assert_eq!(pistol.ammo(), 15 - n);
        }
    }

    #[test]
    fn test_add_ammo_never_overfills() {
        for start_shots in 0..=15 {
            for delta in 0..=15 {
                let mut pistol = pistol();
                for _ in 0..start_shots {
                    pistol.fire();
                }
                let before = pistol.ammo();

                match pistol.add_ammo(delta) {
                    Ok(ammo) => assert_eq!(ammo, before + delta as u32),
                    Err(WeaponError::Overflow { .. }) => assert_eq!(pistol.ammo(), before),
                    Err(e) => panic!("unexpected error {e}"),
                }
                assert!(pistol.ammo() <= pistol.magazine_capacity());
            }
        }
    }

    #[test]
    fn test_add_ammo_rejects_bad_delta() {
        let mut pistol = empty_pistol();
        assert_eq!(
            pistol.add_ammo(-1),
            Err(WeaponError::InvalidDelta { delta: -1, capacity: 15 })
        );
        assert_eq!(
            pistol.add_ammo(16),
            Err(WeaponError::InvalidDelta { delta: 16, capacity: 15 })
        );
        assert_eq!(pistol.ammo(), 0);
    }

    #[test]
    fn test_add_ammo_overflow() {
        let mut pistol = pistol();
        pistol.fire();
        assert_eq!(pistol.ammo_needed(), 1);

        assert_eq!(
            pistol.add_ammo(2),
            Err(WeaponError::Overflow { ammo: 14, delta: 2, capacity: 15 })
        );
        assert_eq!(pistol.add_ammo(1), Ok(15));
        assert!(pistol.is_clip_full());
    }

    #[test]
    fn test_has_ammo() {
        let mut pistol = pistol();
        assert!(pistol.has_ammo());
        assert!(pistol.is_clip_full());

        let mut pistol = empty_pistol();
        assert!(!pistol.has_ammo());
        assert!(!pistol.is_clip_full());
        pistol.add_ammo(3).unwrap();
        assert!(pistol.has_ammo());
    }

    #[test]
    fn test_slide_follows_curve() {
        let mut pistol = pistol();
        pistol.fire();

        // Curve peaks at 1.0 after 0.05s
        let tick = pistol.advance_time(0.05);
        assert!(tick.slide_changed);
        assert!(!tick.slide_finished);
        assert!((pistol.slide_displacement() - 4.0).abs() < 1e-4);
        assert!((pistol.recoil_rotation() - 20.0).abs() < 1e-3);

        // Halfway back down
        pistol.advance_time(0.05);
        assert!((pistol.slide_displacement() - 2.0).abs() < 1e-3);
        assert!(pistol.is_slide_moving());
    }

    #[test]
    fn test_small_steps_end_slide() {
        let mut pistol = pistol();
        pistol.fire();

        let mut total = 0.0;
        while total < pistol.config().slide_move_duration + 0.01 {
            pistol.advance_time(0.016);
            total += 0.016;
        }
        assert!(!pistol.is_slide_moving());
        assert_eq!(pistol.slide_displacement(), 0.0);
        assert_eq!(pistol.slide_elapsed(), 0.0);
    }

    #[test]
    fn test_refire_restarts_slide() {
        let mut pistol = pistol();
        pistol.fire();
        pistol.advance_time(0.1);
        pistol.fire();

        assert_eq!(pistol.slide_elapsed(), 0.0);
        pistol.advance_time(0.1);
        assert!(pistol.is_slide_moving());
    }

    #[test]
    fn test_rifle_has_no_slide() {
        let mut rifle = weapon(WeaponType::AssaultRifle);
        assert_eq!(rifle.ammo(), 20);

        assert_eq!(rifle.fire(), FireResult::Fired);
        assert!(!rifle.is_slide_moving());
        let tick = rifle.advance_time(0.05);
        assert!(!tick.slide_changed);
        assert_eq!(rifle.slide_displacement(), 0.0);
    }

    #[test]
    fn test_throw_and_fall() {
        let mut pistol = pistol();
        let holder = World::new().spawn_empty().id();
        pistol.set_to_equipped(Some(holder)).unwrap();

        let impulse = pistol.throw_weapon(Quat::IDENTITY, 15.0).unwrap();
        assert!(impulse.length() > 0.0);
        assert!(pistol.is_falling());
        assert_eq!(pistol.item_state(), ItemState::Falling);
        assert_eq!(pistol.holder(), None);

        let fall = pistol.config().fall_duration;
        assert!(!pistol.advance_time(fall * 0.5).fall_finished);
        assert!(pistol.is_falling());

        assert!(pistol.advance_time(fall).fall_finished);
        assert!(!pistol.is_falling());
        assert_eq!(pistol.item_state(), ItemState::ToPickUp);

        // Fires only once
        assert!(!pistol.advance_time(fall).fall_finished);
    }

    #[test]
    fn test_bad_throw_changes_nothing() {
        let mut pistol = pistol();
        assert!(pistol.throw_weapon(Quat::IDENTITY, 45.0).is_err());
        assert!(!pistol.is_falling());
        assert_eq!(pistol.item_state(), ItemState::ToPickUp);
    }

    #[test]
    fn test_fall_timer_expire_directly() {
        let mut pistol = pistol();
        pistol.throw_weapon(Quat::IDENTITY, 10.0).unwrap();
        pistol.on_fall_timer_expire();

        assert!(!pistol.is_falling());
        assert!(!pistol.advance_time(10.0).fall_finished);
    }

    #[test]
    fn test_equip_requires_holder() {
        let mut pistol = pistol();
        assert_eq!(pistol.set_to_equipped(None), Err(WeaponError::MissingHolder));
        assert_eq!(pistol.item_state(), ItemState::ToPickUp);

        let holder = World::new().spawn_empty().id();
        pistol.set_to_equipped(Some(holder)).unwrap();
        assert_eq!(pistol.item_state(), ItemState::Equipped);
        assert_eq!(pistol.holder(), Some(holder));
    }

    #[test]
    fn test_invalid_time_step_ignored() {
        let mut pistol = pistol();
        pistol.fire();
        assert_eq!(pistol.advance_time(-1.0), WeaponTick::default());
        assert_eq!(pistol.advance_time(f32::NAN), WeaponTick::default());
        assert!(pistol.is_slide_moving());
    }

    #[test]
    fn test_add_ammo_at_u32_limit_overflows() {
        let table = WeaponTable::from_ron_str(TEST_TABLE).unwrap();
        let mut row = table.find_row(WeaponType::AssaultRifle).unwrap().clone();
        row.magazine_capacity = u32::MAX;
        row.weapon_ammo = u32::MAX;
        let config = WeaponConfig::from_row(WeaponType::AssaultRifle, &row).unwrap();
        let mut rifle = WeaponState::new(config).unwrap();

        assert_eq!(
            rifle.add_ammo(1),
            Err(WeaponError::Overflow { ammo: u32::MAX, delta: 1, capacity: u32::MAX })
        );
        assert_eq!(rifle.ammo(), u32::MAX);
        assert_eq!(rifle.ammo_needed(), 0);
    }

    #[test]
    fn test_edited_config_rejected() {
        let table = WeaponTable::from_ron_str(TEST_TABLE).unwrap();
        let valid = WeaponConfig::from_provider(&table, WeaponType::Pistol).unwrap();

        let mut config = valid.clone();
        config.initial_ammo = 20;
        assert!(matches!(
            WeaponState::new(config),
            Err(ConfigError::AmmoExceedsCapacity { ammo: 20, capacity: 15, .. })
        ));

        let mut config = valid.clone();
        config.magazine_capacity = 0;
        assert!(matches!(WeaponState::new(config), Err(ConfigError::ZeroCapacity(_))));

        let mut config = valid;
        config.slide_move_duration = 0.0;
        assert!(matches!(
            WeaponState::new(config),
            Err(ConfigError::InvalidDuration { field: "slide_move_duration", .. })
        ));
    }

    #[test]
    fn test_fall_expire_ignored_while_equipped() {
        let mut pistol = pistol();
        let holder = World::new().spawn_empty().id();
        pistol.set_to_equipped(Some(holder)).unwrap();

        pistol.on_fall_timer_expire();
        assert_eq!(pistol.item_state(), ItemState::Equipped);
        assert_eq!(pistol.holder(), Some(holder));
    }
}
