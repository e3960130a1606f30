//! # Camera rotator angles
//!
//! Conversion between `rotSkyPos`, the orientation of the field of view on the sky, and
//! `rotTelPos`, the angle of the camera rotator relative to the telescope mount. The two
//! differ by the parallactic angle of the pointing:
//!
//! ```text
//! rotSkyPos = (rotTelPos − pa + π) mod 2π
//! rotTelPos = (rotSkyPos + pa)     mod 2π
//! ```
//!
//! This is the convention of the survey camera rotator and downstream consumers rely on
//! its exact sign and offset. Both results are in `[0, 2π)`.
use crate::{
    constants::{Radian, DPI},
    coordinates::reduce_angle,
    horizon::alt_az_pa_single,
    skyframe_errors::SkyframeError,
    spherical_ops::BasicSphericalOps,
    values::{require_scalar, validate_broadcast, validate_coupled, Values},
};

pub(crate) fn rot_sky_from_pa(rot_tel: Radian, pa: Radian) -> Radian {
    reduce_angle(rot_tel - pa + std::f64::consts::PI, DPI)
}

pub(crate) fn rot_tel_from_pa(rot_sky: Radian, pa: Radian) -> Radian {
    reduce_angle(rot_sky + pa, DPI)
}

/// Shared shape checks and per-element evaluation of both directions.
#[allow(clippy::too_many_arguments)]
fn rotator_angles<O: BasicSphericalOps>(
    method: &'static str,
    angle_name: &'static str,
    ops: &O,
    ra: &Values,
    dec: &Values,
    longitude: &Values,
    latitude: &Values,
    mjd: &Values,
    angle: &Values,
    convert: fn(Radian, Radian) -> Radian,
) -> Result<Values, SkyframeError> {
    let longitude = require_scalar(method, "longitude", longitude)?;
    let latitude = require_scalar(method, "latitude", latitude)?;
    let m = validate_coupled(method, &[("ra", ra), ("dec", dec)])?;
    validate_broadcast(method, ("ra", m), ("mjd", mjd))?;
    validate_broadcast(method, ("ra", m), (angle_name, angle))?;

    Ok(m.build(|i| {
        let (_alt, _az, pa) =
            alt_az_pa_single(ops, ra.at(i), dec.at(i), longitude, latitude, mjd.at(i));
        convert(angle.at(i), pa)
    }))
}

/// `rotSkyPos` of a pointing from its `rotTelPos`.
///
/// Arguments
/// -----------------
/// * `ops`: spherical-astronomy primitives.
/// * `ra`, `dec`: pointing in radians.
/// * `longitude`, `latitude`: site in radians (scalars).
/// * `mjd`: Universal Time (UT1) as MJD.
/// * `rot_tel`: `rotTelPos` in radians, scalar or matching `ra`.
///
/// Return
/// ----------
/// * `rotSkyPos` in radians in `[0, 2π)`.
pub fn rot_sky_from_rot_tel<O: BasicSphericalOps>(
    ops: &O,
    ra: &Values,
    dec: &Values,
    longitude: &Values,
    latitude: &Values,
    mjd: &Values,
    rot_tel: &Values,
) -> Result<Values, SkyframeError> {
    rotator_angles(
        "rot_sky_from_rot_tel",
        "rot_tel",
        ops,
        ra,
        dec,
        longitude,
        latitude,
        mjd,
        rot_tel,
        rot_sky_from_pa,
    )
}

/// `rotTelPos` of a pointing from its `rotSkyPos`; the inverse of [`rot_sky_from_rot_tel`]
/// up to a half turn.
pub fn rot_tel_from_rot_sky<O: BasicSphericalOps>(
    ops: &O,
    ra: &Values,
    dec: &Values,
    longitude: &Values,
    latitude: &Values,
    mjd: &Values,
    rot_sky: &Values,
) -> Result<Values, SkyframeError> {
    rotator_angles(
        "rot_tel_from_rot_sky",
        "rot_sky",
        ops,
        ra,
        dec,
        longitude,
        latitude,
        mjd,
        rot_sky,
        rot_tel_from_pa,
    )
}

/// Degree form of [`rot_sky_from_rot_tel`].
pub fn rot_sky_from_rot_tel_deg<O: BasicSphericalOps>(
    ops: &O,
    ra: &Values,
    dec: &Values,
    longitude: &Values,
    latitude: &Values,
    mjd: &Values,
    rot_tel: &Values,
) -> Result<Values, SkyframeError> {
    rot_sky_from_rot_tel(
        ops,
        &ra.to_radians(),
        &dec.to_radians(),
        &longitude.to_radians(),
        &latitude.to_radians(),
        mjd,
        &rot_tel.to_radians(),
    )
    .map(|v| v.to_degrees())
}

/// Degree form of [`rot_tel_from_rot_sky`].
pub fn rot_tel_from_rot_sky_deg<O: BasicSphericalOps>(
    ops: &O,
    ra: &Values,
    dec: &Values,
    longitude: &Values,
    latitude: &Values,
    mjd: &Values,
    rot_sky: &Values,
) -> Result<Values, SkyframeError> {
    rot_tel_from_rot_sky(
        ops,
        &ra.to_radians(),
        &dec.to_radians(),
        &longitude.to_radians(),
        &latitude.to_radians(),
        mjd,
        &rot_sky.to_radians(),
    )
    .map(|v| v.to_degrees())
}
