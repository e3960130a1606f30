//! # Sidereal time
//!
//! Greenwich and local, mean and apparent sidereal times from a UT1 Modified Julian Date.
//!
//! ```text
//! GMST = gmsta(floor(mjd), mjd − floor(mjd))
//! GAST = GMST + equation of the equinoxes(mjd)
//! LMST = GMST + longitude / 15°      LAST = GAST + longitude / 15°
//! ```
//!
//! Every result is in hours, reduced into `[0, 24)`. The longitude is positive east of the
//! prime meridian and normalized into `(-180°, 180°]` before being turned into an hour
//! offset.
//!
//! ## Shapes
//!
//! `mjd` may be a scalar or a sequence. `longitude` may be a scalar, broadcast onto every
//! epoch, or a sequence of the same length as `mjd`. A sequence of longitudes with a
//! single epoch is rejected.
use crate::{
    constants::{Degree, Hour, Radian, DPI},
    coordinates::reduce_angle,
    skyframe_errors::SkyframeError,
    spherical_ops::BasicSphericalOps,
    values::{validate_broadcast, Values},
};

fn hours_from_radians(angle: Radian) -> Hour {
    reduce_angle(angle * 24.0 / DPI, 24.0)
}

/// Longitude normalized into `(-180°, 180°]`, as an hour offset.
fn longitude_hours(longitude: Radian) -> Hour {
    let deg = longitude.to_degrees().rem_euclid(360.0);
    let deg = if deg > 180.0 { deg - 360.0 } else { deg };
    deg / 15.0
}

/// GMST and GAST in hours for a single UT1 MJD.
pub(crate) fn gmst_gast_single<O: BasicSphericalOps>(ops: &O, mjd: f64) -> (Hour, Hour) {
    let date = mjd.floor();
    let ut1 = mjd - date;
    let gmst = ops.gmsta(date, ut1);
    let gast = gmst + ops.eqeqx(mjd);
    (hours_from_radians(gmst), hours_from_radians(gast))
}

/// LMST and LAST in hours for a single UT1 MJD and east longitude in radians.
pub(crate) fn lmst_last_single<O: BasicSphericalOps>(
    ops: &O,
    mjd: f64,
    longitude: Radian,
) -> (Hour, Hour) {
    let (gmst, gast) = gmst_gast_single(ops, mjd);
    let hrs = longitude_hours(longitude);
    (reduce_angle(gmst + hrs, 24.0), reduce_angle(gast + hrs, 24.0))
}

/// Greenwich mean and apparent sidereal times.
///
/// Arguments
/// -----------------
/// * `ops`: spherical-astronomy primitives.
/// * `mjd`: Universal Time (UT1) as MJD, scalar or sequence.
///
/// Return
/// ----------
/// * `(gmst, gast)` in hours in `[0, 24)`, with the arity of `mjd`.
pub fn gmst_gast<O: BasicSphericalOps>(ops: &O, mjd: &Values) -> (Values, Values) {
    mjd.multiplicity()
        .build2(|i| gmst_gast_single(ops, mjd.at(i)))
}

/// Local mean and apparent sidereal times.
///
/// Arguments
/// -----------------
/// * `ops`: spherical-astronomy primitives.
/// * `mjd`: Universal Time (UT1) as MJD, scalar or sequence.
/// * `longitude`: east longitude of the observer in radians, scalar or sequence matching
///   `mjd`.
///
/// Return
/// ----------
/// * `(lmst, last)` in hours in `[0, 24)`, with the arity of `mjd`.
///
/// Errors
/// ----------
/// * [`SkyframeError::LengthMismatch`] if both are sequences of different lengths.
/// * [`SkyframeError::ArityMismatch`] if `longitude` is a sequence and `mjd` a scalar.
pub fn lmst_last<O: BasicSphericalOps>(
    ops: &O,
    mjd: &Values,
    longitude: &Values,
) -> Result<(Values, Values), SkyframeError> {
    let m = mjd.multiplicity();
    validate_broadcast("lmst_last", ("mjd", m), ("longitude", longitude))?;

    Ok(m.build2(|i| lmst_last_single(ops, mjd.at(i), longitude.at(i))))
}

/// Degree form of [`lmst_last`]: `longitude` in degrees.
pub fn lmst_last_deg<O: BasicSphericalOps>(
    ops: &O,
    mjd: &Values,
    longitude: &Values,
) -> Result<(Values, Values), SkyframeError> {
    lmst_last(ops, mjd, &longitude.to_radians())
}

/// Hour offset of an east longitude given in degrees, as applied by [`lmst_last`].
pub fn longitude_hour_offset_deg(longitude: Degree) -> Hour {
    longitude_hours(longitude.to_radians())
}
