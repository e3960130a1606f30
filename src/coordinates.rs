//! # Coordinate utilities
//!
//! General-purpose conversions shared by the transforms and offered to callers:
//!
//! - equatorial (FK5 J2000) ↔ galactic (IAU 1958) coordinates,
//! - spherical ↔ Cartesian unit vectors,
//! - the axis-angle rotation matrix carrying one unit vector onto another,
//! - the haversine angular distance,
//! - radians/degrees/arcseconds conversions,
//! - the half-open angle reduction used by every periodic output of the crate.
//!
//! Functions taking a [`BasicSphericalOps`] implementation accept scalars or sequences
//! through [`Values`] and validate their shapes like every other transform.
use nalgebra::{Matrix3, Rotation3, Unit, Vector3};

use crate::{
    constants::{ArcSec, Degree, Radian},
    skyframe_errors::SkyframeError,
    spherical_ops::BasicSphericalOps,
    values::{validate_coupled, Values},
};

/// Tolerance on the norm of the vectors given to [`rotation_matrix_from_vectors`].
const UNIT_NORM_TOLERANCE: f64 = 0.01;

/// Reduce `value` into the half-open interval `[0, period)`.
///
/// `rem_euclid` may round a tiny negative input up to exactly `period`; that case is
/// folded back to zero so the upper bound is never reached.
pub fn reduce_angle(value: f64, period: f64) -> f64 {
    let reduced = value.rem_euclid(period);
    if reduced >= period {
        0.0
    } else {
        reduced
    }
}

/// Convert equatorial coordinates (FK5 J2000) into galactic coordinates.
///
/// Arguments
/// -----------------
/// * `ops`: spherical-astronomy primitives.
/// * `ra`, `dec`: right ascension and declination in radians, coupled.
///
/// Return
/// ----------
/// * `(l, b)` in radians, `l` in `[0, 2π)` and `b` in `[-π/2, π/2]`.
pub fn galactic_from_equatorial<O: BasicSphericalOps>(
    ops: &O,
    ra: &Values,
    dec: &Values,
) -> Result<(Values, Values), SkyframeError> {
    let m = validate_coupled("galactic_from_equatorial", &[("ra", ra), ("dec", dec)])?;
    Ok(m.build2(|i| ops.eqgal(ra.at(i), dec.at(i))))
}

/// Degree form of [`galactic_from_equatorial`].
pub fn galactic_from_equatorial_deg<O: BasicSphericalOps>(
    ops: &O,
    ra: &Values,
    dec: &Values,
) -> Result<(Values, Values), SkyframeError> {
    let (l, b) = galactic_from_equatorial(ops, &ra.to_radians(), &dec.to_radians())?;
    Ok((l.to_degrees(), b.to_degrees()))
}

/// Convert galactic coordinates (IAU 1958) into equatorial coordinates (FK5 J2000).
///
/// Return
/// ----------
/// * `(ra, dec)` in radians, `ra` in `[0, 2π)`.
pub fn equatorial_from_galactic<O: BasicSphericalOps>(
    ops: &O,
    g_long: &Values,
    g_lat: &Values,
) -> Result<(Values, Values), SkyframeError> {
    let m = validate_coupled(
        "equatorial_from_galactic",
        &[("g_long", g_long), ("g_lat", g_lat)],
    )?;
    Ok(m.build2(|i| ops.galeq(g_long.at(i), g_lat.at(i))))
}

/// Degree form of [`equatorial_from_galactic`].
pub fn equatorial_from_galactic_deg<O: BasicSphericalOps>(
    ops: &O,
    g_long: &Values,
    g_lat: &Values,
) -> Result<(Values, Values), SkyframeError> {
    let (ra, dec) = equatorial_from_galactic(ops, &g_long.to_radians(), &g_lat.to_radians())?;
    Ok((ra.to_degrees(), dec.to_degrees()))
}

/// Equation of the equinoxes in radians for TT Modified Julian Dates.
pub fn equation_of_equinoxes<O: BasicSphericalOps>(ops: &O, mjd_tt: &Values) -> Values {
    mjd_tt.map(|d| ops.eqeqx(d))
}

/// Unit vector pointing at `(longitude, latitude)` (radians).
pub fn cartesian_from_spherical(longitude: Radian, latitude: Radian) -> Vector3<f64> {
    let (sin_lat, cos_lat) = latitude.sin_cos();
    let (sin_lon, cos_lon) = longitude.sin_cos();
    Vector3::new(cos_lon * cos_lat, sin_lon * cos_lat, sin_lat)
}

/// Batch form of [`cartesian_from_spherical`] over coupled longitudes and latitudes.
pub fn cartesian_from_spherical_batch(
    longitude: &Values,
    latitude: &Values,
) -> Result<Vec<Vector3<f64>>, SkyframeError> {
    let m = validate_coupled(
        "cartesian_from_spherical",
        &[("longitude", longitude), ("latitude", latitude)],
    )?;
    Ok((0..m.len())
        .map(|i| cartesian_from_spherical(longitude.at(i), latitude.at(i)))
        .collect())
}

/// Longitude and latitude (radians) of a non-null Cartesian vector.
///
/// The vector need not be normalized. Longitude is in `(-π, π]`.
pub fn spherical_from_cartesian(xyz: &Vector3<f64>) -> (Radian, Radian) {
    let longitude = xyz.y.atan2(xyz.x);
    let latitude = (xyz.z / xyz.norm()).asin();
    (longitude, latitude)
}

/// Rotation matrix taking the unit vector `v1` onto the unit vector `v2`, about the axis
/// `v1 × v2`.
///
/// Errors
/// ----------
/// * [`SkyframeError::NotUnitVector`] if the norm of either vector differs from one by
///   more than 0.01.
pub fn rotation_matrix_from_vectors(
    v1: &Vector3<f64>,
    v2: &Vector3<f64>,
) -> Result<Matrix3<f64>, SkyframeError> {
    if (v1.norm() - 1.0).abs() > UNIT_NORM_TOLERANCE {
        return Err(SkyframeError::NotUnitVector("v1"));
    }
    if (v2.norm() - 1.0).abs() > UNIT_NORM_TOLERANCE {
        return Err(SkyframeError::NotUnitVector("v2"));
    }

    let angle = v1.dot(v2).clamp(-1.0, 1.0).acos();

    let axis = match Unit::try_new(v1.cross(v2), f64::EPSILON) {
        Some(axis) => axis,
        None if angle < std::f64::consts::FRAC_PI_2 => return Ok(Matrix3::identity()),
        // antiparallel: any axis orthogonal to v1 will do
        None => {
            let helper = if v1.x.abs() < 0.9 {
                Vector3::x()
            } else {
                Vector3::y()
            };
            Unit::new_normalize(v1.cross(&helper))
        }
    };

    Ok(Rotation3::from_axis_angle(&axis, angle).into())
}

/// Angular distance between two points on the sphere (radians), by the haversine formula.
pub fn haversine(long1: Radian, lat1: Radian, long2: Radian, lat2: Radian) -> Radian {
    let t1 = (lat2 / 2.0 - lat1 / 2.0).sin().powi(2);
    let t2 = lat1.cos() * lat2.cos() * (long2 / 2.0 - long1 / 2.0).sin().powi(2);
    2.0 * (t1 + t2).sqrt().asin()
}

pub fn arcsec_from_radians(value: Radian) -> ArcSec {
    3600.0 * value.to_degrees()
}

pub fn radians_from_arcsec(value: ArcSec) -> Radian {
    (value / 3600.0).to_radians()
}

pub fn arcsec_from_degrees(value: Degree) -> ArcSec {
    3600.0 * value
}

pub fn degrees_from_arcsec(value: ArcSec) -> Degree {
    value / 3600.0
}
