//! # Native longitude and latitude
//!
//! The native frame is the equatorial frame rotated so that its pole sits on the telescope
//! pointing: the native latitude of the pointing itself is +90°. The rotation is the
//! product of two Euler rotations (Calabretta & Greisen 2002, §2.3), first about Z by the
//! pointing right ascension, then about X by the pointing colatitude.
//!
//! Directions are carried as unit vectors with the convention
//! `v = (−cos δ sin α, cos δ cos α, sin δ)`.
//!
//! ## Longitude recovery
//!
//! The longitude is recovered as `arccos(v_y / cos lat)`, which loses the sign of the
//! sine. The candidate is flipped to `2π − lon` whenever the sine or cosine it implies
//! disagrees in sign with the Cartesian components, components within `1e-9` of zero
//! being sign-ambiguous. A ratio pushed out of `[-1, 1]` by rounding gives `0` or `π`
//! according to its sign.
use nalgebra::{Matrix3, Vector3};

use crate::{
    constants::{Radian, DPI},
    skyframe_errors::SkyframeError,
    values::{require_scalar, validate_coupled, Values},
};

const SIGN_TOLERANCE: f64 = 1.0e-9;

fn unit_vector(lon: Radian, lat: Radian) -> Vector3<f64> {
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();
    Vector3::new(-cos_lat * sin_lon, cos_lat * cos_lon, sin_lat)
}

fn rot_x(alpha: Radian) -> Matrix3<f64> {
    let (sa, ca) = alpha.sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, ca, sa, 0.0, -sa, ca)
}

fn rot_z(beta: Radian) -> Matrix3<f64> {
    let (sb, cb) = beta.sin_cos();
    Matrix3::new(cb, -sb, 0.0, sb, cb, 0.0, 0.0, 0.0, 1.0)
}

/// Rotation from equatorial to native unit vectors for a pointing.
pub(crate) fn equatorial_to_native(ra_pointing: Radian, dec_pointing: Radian) -> Matrix3<f64> {
    rot_x(dec_pointing - 0.5 * std::f64::consts::PI) * rot_z(-ra_pointing)
}

/// Rotation from native to equatorial unit vectors for a pointing.
pub(crate) fn native_to_equatorial(ra_pointing: Radian, dec_pointing: Radian) -> Matrix3<f64> {
    rot_z(ra_pointing) * rot_x(0.5 * std::f64::consts::PI - dec_pointing)
}

/// `-1`, `0` or `1`; NaN is propagated.
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        // 0 for zero, NaN for NaN
        x * 0.0
    }
}

/// Longitude and latitude of a rotated unit vector, with the quadrant rule of the module.
pub(crate) fn lon_lat_from_vector(v: &Vector3<f64>) -> (Radian, Radian) {
    let lat = v.z.atan2(v.x.hypot(v.y));

    let y = v.y / lat.cos();
    let raw = y.acos();
    let angle = if raw.is_nan() {
        if sign(y) < 0.0 {
            std::f64::consts::PI
        } else {
            0.0
        }
    } else {
        raw
    };

    let x = -angle.sin();
    let flip = (x.abs() > SIGN_TOLERANCE && sign(x) != sign(v.x))
        || (y.abs() > SIGN_TOLERANCE && sign(y) != sign(v.y));

    let lon = if angle.is_nan() {
        0.0
    } else if flip {
        DPI - angle
    } else {
        angle
    };

    (lon, lat)
}

fn check_shapes(
    method: &'static str,
    names: (&'static str, &'static str),
    first: &Values,
    second: &Values,
    ra_pointing: &Values,
    dec_pointing: &Values,
) -> Result<(crate::values::Multiplicity, Radian, Radian), SkyframeError> {
    let ra_p = require_scalar(method, "ra_pointing", ra_pointing)?;
    let dec_p = require_scalar(method, "dec_pointing", dec_pointing)?;
    let m = validate_coupled(method, &[(names.0, first), (names.1, second)])?;
    Ok((m, ra_p, dec_p))
}

/// Native longitude and latitude of equatorial positions.
///
/// Arguments
/// -----------------
/// * `ra`, `dec`: positions in radians, scalar or coupled sequences.
/// * `ra_pointing`, `dec_pointing`: telescope pointing in radians (scalars, one pointing
///   per call).
///
/// Return
/// ----------
/// * `(lon, lat)` in radians, `lon` in `[0, 2π]`.
pub fn native_lon_lat_from_ra_dec(
    ra: &Values,
    dec: &Values,
    ra_pointing: &Values,
    dec_pointing: &Values,
) -> Result<(Values, Values), SkyframeError> {
    let (m, ra_p, dec_p) = check_shapes(
        "native_lon_lat_from_ra_dec",
        ("ra", "dec"),
        ra,
        dec,
        ra_pointing,
        dec_pointing,
    )?;
    let rot = equatorial_to_native(ra_p, dec_p);

    Ok(m.build2(|i| lon_lat_from_vector(&(rot * unit_vector(ra.at(i), dec.at(i))))))
}

/// Degree form of [`native_lon_lat_from_ra_dec`].
pub fn native_lon_lat_from_ra_dec_deg(
    ra: &Values,
    dec: &Values,
    ra_pointing: &Values,
    dec_pointing: &Values,
) -> Result<(Values, Values), SkyframeError> {
    let (lon, lat) = native_lon_lat_from_ra_dec(
        &ra.to_radians(),
        &dec.to_radians(),
        &ra_pointing.to_radians(),
        &dec_pointing.to_radians(),
    )?;
    Ok((lon.to_degrees(), lat.to_degrees()))
}

/// Equatorial positions of native longitudes and latitudes; the inverse of
/// [`native_lon_lat_from_ra_dec`].
pub fn ra_dec_from_native_lon_lat(
    lon: &Values,
    lat: &Values,
    ra_pointing: &Values,
    dec_pointing: &Values,
) -> Result<(Values, Values), SkyframeError> {
    let (m, ra_p, dec_p) = check_shapes(
        "ra_dec_from_native_lon_lat",
        ("lon", "lat"),
        lon,
        lat,
        ra_pointing,
        dec_pointing,
    )?;
    let rot = native_to_equatorial(ra_p, dec_p);

    Ok(m.build2(|i| lon_lat_from_vector(&(rot * unit_vector(lon.at(i), lat.at(i))))))
}

/// Degree form of [`ra_dec_from_native_lon_lat`].
pub fn ra_dec_from_native_lon_lat_deg(
    lon: &Values,
    lat: &Values,
    ra_pointing: &Values,
    dec_pointing: &Values,
) -> Result<(Values, Values), SkyframeError> {
    let (ra, dec) = ra_dec_from_native_lon_lat(
        &lon.to_radians(),
        &lat.to_radians(),
        &ra_pointing.to_radians(),
        &dec_pointing.to_radians(),
    )?;
    Ok((ra.to_degrees(), dec.to_degrees()))
}

#[cfg(test)]
mod test_native_frame {
    use super::*;
    use crate::coordinates::haversine;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_rotations_are_inverse() {
        let fwd = equatorial_to_native(1.3, -0.4);
        let inv = native_to_equatorial(1.3, -0.4);
        assert_relative_eq!(fwd * inv, Matrix3::identity(), epsilon = 1e-15);
    }

    #[test]
    fn test_pointing_is_native_pole() {
        let (_lon, lat) = native_lon_lat_from_ra_dec(
            &Values::from(1.3),
            &Values::from(-0.4),
            &Values::from(1.3),
            &Values::from(-0.4),
        )
        .unwrap();
        assert_relative_eq!(lat.at(0), FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_pole_pointing_is_identity() {
        // With the pointing on the celestial pole the native frame is the equatorial frame
        let (lon, lat) = native_lon_lat_from_ra_dec(
            &Values::from(vec![0.5, 2.0, 4.0]),
            &Values::from(vec![0.1, -0.3, 0.7]),
            &Values::from(0.0),
            &Values::from(FRAC_PI_2),
        )
        .unwrap();
        assert_relative_eq!(lon.at(0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(lon.at(1), 2.0, epsilon = 1e-12);
        assert_relative_eq!(lon.at(2), 4.0, epsilon = 1e-12);
        assert_relative_eq!(lat.at(2), 0.7, epsilon = 1e-12);
    }

    #[test]
    fn test_lon_lat_from_vector_quadrants() {
        for lon in [0.3, 1.8, 3.5, 5.9] {
            let v = unit_vector(lon, 0.2);
            let (l, b) = lon_lat_from_vector(&v);
            assert_relative_eq!(l, lon, epsilon = 1e-12);
            assert_relative_eq!(b, 0.2, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_lon_lat_from_vector_out_of_domain() {
        // v_y / cos(lat) slightly above one or below minus one
        let (lon, _) = lon_lat_from_vector(&Vector3::new(0.0, 1.0 + 1e-15, 0.0));
        assert_eq!(lon, 0.0);
        let (lon, _) = lon_lat_from_vector(&Vector3::new(0.0, -1.0 - 1e-15, 0.0));
        assert_eq!(lon, PI);
    }

    #[test]
    fn test_round_trip_with_poles() {
        let ra = Values::from(vec![0.0, 1.0, 2.5, 4.0, 6.0, 3.0]);
        let dec = Values::from(vec![0.2, -0.5, FRAC_PI_2, -FRAC_PI_2, 1.2, -1.4]);

        for (ra_p, dec_p) in [(0.7, -0.3), (3.0, FRAC_PI_2), (5.0, -FRAC_PI_2), (0.0, 0.0)] {
            let (lon, lat) = native_lon_lat_from_ra_dec(
                &ra,
                &dec,
                &Values::from(ra_p),
                &Values::from(dec_p),
            )
            .unwrap();
            let (ra2, dec2) =
                ra_dec_from_native_lon_lat(&lon, &lat, &Values::from(ra_p), &Values::from(dec_p))
                    .unwrap();

            for i in 0..ra.len() {
                let dist = haversine(ra.at(i), dec.at(i), ra2.at(i), dec2.at(i));
                assert!(dist < 1e-7, "pointing ({ra_p}, {dec_p}), index {i}: {dist}");
                assert_relative_eq!(dec2.at(i), dec.at(i), epsilon = 1e-7);
            }
        }
    }

    #[test]
    fn test_deg_and_shapes() {
        let (lon, lat) = native_lon_lat_from_ra_dec_deg(
            &Values::from(10.0),
            &Values::from(-30.0),
            &Values::from(10.0),
            &Values::from(-30.0),
        )
        .unwrap();
        assert_relative_eq!(lat.at(0), 90.0, epsilon = 1e-9);
        assert!(lon.at(0).is_finite());

        let (ra, dec) = ra_dec_from_native_lon_lat_deg(
            &Values::from(0.0),
            &Values::from(90.0),
            &Values::from(10.0),
            &Values::from(-30.0),
        )
        .unwrap();
        assert_relative_eq!(ra.at(0), 10.0, epsilon = 1e-9);
        assert_relative_eq!(dec.at(0), -30.0, epsilon = 1e-9);

        let err = native_lon_lat_from_ra_dec(
            &Values::from(0.1),
            &Values::from(0.1),
            &Values::from(vec![0.1, 0.2]),
            &Values::from(0.1),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SkyframeError::ScalarRequired {
                method: "native_lon_lat_from_ra_dec",
                param: "ra_pointing"
            }
        );
    }
}
