//! # Equatorial ↔ horizon coordinates
//!
//! Conversion between right ascension/declination and altitude/azimuth for an observer at
//! a single site, with the parallactic angle of each target.
//!
//! The hour angle is built from the local apparent sidereal time of [`crate::sidereal`]:
//!
//! ```text
//! ha = 15° × LAST − ra
//! ```
//!
//! and the spherical triangle is solved by [`BasicSphericalOps::altaz`]. The inverse uses
//! the spherical law of cosines; the east/west ambiguity of `arccos` is lifted by the sign
//! of `sin(az)` (targets east of the meridian have a negative hour angle).
//!
//! ## Shapes
//!
//! `longitude` and `latitude` must be scalars. The two target coordinates are coupled
//! (both scalars or sequences of the same length) and `mjd` is either a scalar or a
//! sequence matching them.
use crate::{
    constants::{Radian, DPI},
    coordinates::reduce_angle,
    sidereal::lmst_last_single,
    skyframe_errors::SkyframeError,
    spherical_ops::BasicSphericalOps,
    values::{require_scalar, validate_broadcast, validate_coupled, Values},
};

/// Altitude, azimuth and parallactic angle of a single target.
pub(crate) fn alt_az_pa_single<O: BasicSphericalOps>(
    ops: &O,
    ra: Radian,
    dec: Radian,
    longitude: Radian,
    latitude: Radian,
    mjd: f64,
) -> (Radian, Radian, Radian) {
    let (_, last) = lmst_last_single(ops, mjd, longitude);
    let ha = (last * 15.0).to_radians() - ra;
    let (az, alt, pa) = ops.altaz(ha, dec, latitude);
    (alt, az, pa)
}

/// Convert equatorial coordinates into horizon coordinates.
///
/// Arguments
/// -----------------
/// * `ops`: spherical-astronomy primitives.
/// * `ra`, `dec`: target coordinates in radians.
/// * `longitude`: east longitude of the site in radians (scalar).
/// * `latitude`: latitude of the site in radians (scalar).
/// * `mjd`: Universal Time (UT1) as MJD.
///
/// Return
/// ----------
/// * `(alt, az, pa)` in radians: altitude, azimuth from North through East in `[0, 2π)`,
///   and parallactic angle.
///
/// Errors
/// ----------
/// * [`SkyframeError::ScalarRequired`] if the site coordinates are sequences.
/// * [`SkyframeError::LengthMismatch`] / [`SkyframeError::ArityMismatch`] if `ra`, `dec`
///   and `mjd` do not agree.
pub fn equatorial_to_horizon<O: BasicSphericalOps>(
    ops: &O,
    ra: &Values,
    dec: &Values,
    longitude: &Values,
    latitude: &Values,
    mjd: &Values,
) -> Result<(Values, Values, Values), SkyframeError> {
    const METHOD: &str = "equatorial_to_horizon";
    let longitude = require_scalar(METHOD, "longitude", longitude)?;
    let latitude = require_scalar(METHOD, "latitude", latitude)?;
    let m = validate_coupled(METHOD, &[("ra", ra), ("dec", dec)])?;
    validate_broadcast(METHOD, ("ra", m), ("mjd", mjd))?;

    Ok(m.build3(|i| alt_az_pa_single(ops, ra.at(i), dec.at(i), longitude, latitude, mjd.at(i))))
}

/// Degree form of [`equatorial_to_horizon`]: every angle in and out is in degrees.
pub fn equatorial_to_horizon_deg<O: BasicSphericalOps>(
    ops: &O,
    ra: &Values,
    dec: &Values,
    longitude: &Values,
    latitude: &Values,
    mjd: &Values,
) -> Result<(Values, Values, Values), SkyframeError> {
    let (alt, az, pa) = equatorial_to_horizon(
        ops,
        &ra.to_radians(),
        &dec.to_radians(),
        &longitude.to_radians(),
        &latitude.to_radians(),
        mjd,
    )?;
    Ok((alt.to_degrees(), az.to_degrees(), pa.to_degrees()))
}

pub(crate) fn ra_dec_single<O: BasicSphericalOps>(
    ops: &O,
    alt: Radian,
    az: Radian,
    longitude: Radian,
    latitude: Radian,
    mjd: f64,
) -> (Radian, Radian) {
    let (_, last) = lmst_last_single(ops, mjd, longitude);
    let (sin_alt, cos_alt) = alt.sin_cos();
    let (sin_lat, cos_lat) = latitude.sin_cos();

    let dec = (sin_lat * sin_alt + cos_lat * cos_alt * az.cos()).asin();

    // clamped: the ratio leaves [-1, 1] by rounding on the meridian
    let ratio = (sin_alt - dec.sin() * sin_lat) / (dec.cos() * cos_lat);
    let ha0 = ratio.clamp(-1.0, 1.0).acos();
    let ha = if az.sin() >= 0.0 { -ha0 } else { ha0 };

    let ra = reduce_angle((last * 15.0).to_radians() - ha, DPI);
    (ra, dec)
}

/// Convert horizon coordinates into equatorial coordinates.
///
/// Arguments
/// -----------------
/// * `ops`: spherical-astronomy primitives.
/// * `alt`, `az`: altitude and azimuth (North through East) in radians.
/// * `longitude`, `latitude`: site coordinates in radians (scalars).
/// * `mjd`: Universal Time (UT1) as MJD.
///
/// Return
/// ----------
/// * `(ra, dec)` in radians, `ra` in `[0, 2π)`.
pub fn horizon_to_equatorial<O: BasicSphericalOps>(
    ops: &O,
    alt: &Values,
    az: &Values,
    longitude: &Values,
    latitude: &Values,
    mjd: &Values,
) -> Result<(Values, Values), SkyframeError> {
    const METHOD: &str = "horizon_to_equatorial";
    let longitude = require_scalar(METHOD, "longitude", longitude)?;
    let latitude = require_scalar(METHOD, "latitude", latitude)?;
    let m = validate_coupled(METHOD, &[("alt", alt), ("az", az)])?;
    validate_broadcast(METHOD, ("az", m), ("mjd", mjd))?;

    Ok(m.build2(|i| ra_dec_single(ops, alt.at(i), az.at(i), longitude, latitude, mjd.at(i))))
}

/// Degree form of [`horizon_to_equatorial`].
pub fn horizon_to_equatorial_deg<O: BasicSphericalOps>(
    ops: &O,
    alt: &Values,
    az: &Values,
    longitude: &Values,
    latitude: &Values,
    mjd: &Values,
) -> Result<(Values, Values), SkyframeError> {
    let (ra, dec) = horizon_to_equatorial(
        ops,
        &alt.to_radians(),
        &az.to_radians(),
        &longitude.to_radians(),
        &latitude.to_radians(),
        mjd,
    )?;
    Ok((ra.to_degrees(), dec.to_degrees()))
}
