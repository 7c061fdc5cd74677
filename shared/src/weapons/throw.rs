//! Throw impulse for dropped weapons
//!
//! The weapon is tossed sideways along its yaw-only right vector, swung a few
//! degrees about the up axis so repeated drops don't stack in a line.

use bevy::prelude::*;

use super::WeaponError;

/// Impulse magnitude applied to a thrown weapon's physics body
pub const THROW_IMPULSE_MAGNITUDE: f32 = 20_000.0;

/// Smallest accepted swing about the up axis (degrees)
pub const MIN_THROW_OFFSET_DEGREES: f32 = 10.0;

/// Largest accepted swing about the up axis (degrees)
pub const MAX_THROW_OFFSET_DEGREES: f32 = 30.0;

/// Drop pitch and roll, keeping only the heading
pub fn flatten_to_yaw(orientation: Quat) -> Quat {
    let (yaw, _, _) = orientation.to_euler(EulerRot::YXZ);
    Quat::from_rotation_y(yaw)
}

/// Compute the throw impulse for a weapon with the given orientation.
///
/// `offset_degrees` is supplied by the caller (usually random) and must lie in
/// `[MIN_THROW_OFFSET_DEGREES, MAX_THROW_OFFSET_DEGREES]`.
pub fn throw_impulse(orientation: Quat, offset_degrees: f32) -> Result<Vec3, WeaponError> {
    if !(MIN_THROW_OFFSET_DEGREES..=MAX_THROW_OFFSET_DEGREES).contains(&offset_degrees) {
        return Err(WeaponError::ThrowAngleOutOfRange(offset_degrees));
    }

    let flat = flatten_to_yaw(orientation);
    let right = flat * Vec3::X;
    let swing = Quat::from_axis_angle(Vec3::Y, offset_degrees.to_radians());
    let direction = (swing * right).normalize_or_zero();

    Ok(direction * THROW_IMPULSE_MAGNITUDE)
}
