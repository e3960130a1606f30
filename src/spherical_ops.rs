//! # Basic spherical-astronomy primitives
//!
//! Every transform of the crate is written against the [`BasicSphericalOps`] trait, which
//! gathers the handful of classical positional-astronomy routines they need:
//!
//! | Routine | Purpose |
//! |---|---|
//! | [`BasicSphericalOps::gmsta`] | Greenwich mean sidereal time (IAU 1982) from a split UT1 date |
//! | [`BasicSphericalOps::eqeqx`] | Equation of the equinoxes (IAU 1994) |
//! | [`BasicSphericalOps::altaz`] | Hour angle/declination → azimuth, altitude, parallactic angle |
//! | [`BasicSphericalOps::ds2tp`], [`BasicSphericalOps::dtp2s`] | Gnomonic projection, inverse |
//! | [`BasicSphericalOps::eqgal`] / [`BasicSphericalOps::galeq`] | FK5 J2000 ↔ IAU 1958 galactic |
//!
//! [`PalOps`] is the default implementation. Callers pass the implementation explicitly
//! (`ops: &O`), so a different astrometry library can be plugged in without touching the
//! transforms.
//!
//! All angles are radians.
use nalgebra::{Matrix3, Vector3};

use crate::{
    constants::{Radian, DPI, RADTSEC, T2000},
    earth_orientation,
    skyframe_errors::SkyframeError,
};

/// The capability set consumed by the sidereal, horizon, galactic and pupil transforms.
pub trait BasicSphericalOps {
    /// Greenwich mean sidereal time in radians, in `[0, 2π)`.
    ///
    /// The UT1 date is split in two parts (`date + ut`) to preserve precision, e.g.
    /// `(mjd.floor(), mjd.fract())` or `(mjd, 0.0)`.
    fn gmsta(&self, date: f64, ut: f64) -> Radian;

    /// Equation of the equinoxes in radians for a Modified Julian Date.
    fn eqeqx(&self, date: f64) -> Radian;

    /// Hour angle / declination at latitude `phi` to `(azimuth, altitude, parallactic angle)`.
    ///
    /// Azimuth is measured from North through East in `[0, 2π)`.
    fn altaz(&self, ha: Radian, dec: Radian, phi: Radian) -> (Radian, Radian, Radian);

    /// Gnomonic projection of `(ra, dec)` on the plane tangent at `(raz, decz)`.
    ///
    /// Errors
    /// ----------
    /// * [`SkyframeError::ProjectionFailed`] with the status of the projection:
    ///   `1` the star is too far from the axis, `2` the antistar is on the tangent plane,
    ///   `3` the antistar is too far from the axis.
    fn ds2tp(
        &self,
        ra: Radian,
        dec: Radian,
        raz: Radian,
        decz: Radian,
    ) -> Result<(f64, f64), SkyframeError>;

    /// Inverse gnomonic projection of the tangent-plane point `(xi, eta)`.
    fn dtp2s(&self, xi: f64, eta: f64, raz: Radian, decz: Radian) -> (Radian, Radian);

    /// FK5 J2000 equatorial to IAU 1958 galactic `(l, b)`.
    fn eqgal(&self, ra: Radian, dec: Radian) -> (Radian, Radian);

    /// IAU 1958 galactic to FK5 J2000 equatorial `(ra, dec)`.
    fn galeq(&self, l: Radian, b: Radian) -> (Radian, Radian);
}

/// Default implementation of [`BasicSphericalOps`], following the classical
/// positional-astronomy library algorithms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PalOps;

/// Projection status threshold on the denominator of the gnomonic projection.
const TINY: f64 = 1e-6;

/// Normalize an angle into `[0, 2π)`.
pub(crate) fn dranrm(angle: Radian) -> Radian {
    let w = angle % DPI;
    if w < 0.0 {
        w + DPI
    } else {
        w
    }
}

/// Normalize an angle into `[-π, π)`.
pub(crate) fn drange(angle: Radian) -> Radian {
    let pi = std::f64::consts::PI;
    let mut w = angle % DPI;
    if w.abs() >= pi {
        w -= DPI.copysign(angle);
    }
    w
}

fn direction_cosines(a: Radian, b: Radian) -> Vector3<f64> {
    let cosb = b.cos();
    Vector3::new(a.cos() * cosb, a.sin() * cosb, b.sin())
}

fn spherical_angles(v: &Vector3<f64>) -> (Radian, Radian) {
    let r = v.x.hypot(v.y);
    let a = if r == 0.0 { 0.0 } else { v.y.atan2(v.x) };
    let b = if v.z == 0.0 { 0.0 } else { v.z.atan2(r) };
    (a, b)
}

/// Rotation from FK5 J2000 equatorial direction cosines to IAU 1958 galactic ones.
fn equatorial_to_galactic_matrix() -> Matrix3<f64> {
    Matrix3::new(
        -0.054875539726,
        -0.873437108010,
        -0.483834985808,
        0.494109453312,
        -0.444829589425,
        0.746982251810,
        -0.867666135858,
        -0.198076386122,
        0.455983795705,
    )
}

impl BasicSphericalOps for PalOps {
    fn gmsta(&self, date: f64, ut: f64) -> Radian {
        let (d1, d2) = if date < ut { (date, ut) } else { (ut, date) };

        // Julian centuries since J2000 at 0h UT1
        let t = (d1 + (d2 - T2000)) / 36525.0;

        dranrm(
            RADTSEC
                * (24110.54841
                    + (8640184.812866 + (0.093104 - 6.2e-6 * t) * t) * t
                    + 86400.0 * ((d1 % 1.0) + (d2 % 1.0))),
        )
    }

    fn eqeqx(&self, date: f64) -> Radian {
        earth_orientation::eqeqx(date)
    }

    fn altaz(&self, ha: Radian, dec: Radian, phi: Radian) -> (Radian, Radian, Radian) {
        let (sh, ch) = ha.sin_cos();
        let (sd, cd) = dec.sin_cos();
        let (sp, cp) = phi.sin_cos();

        let chcd = ch * cd;
        let sdcp = sd * cp;
        let x = -chcd * sp + sdcp;
        let y = -sh * cd;
        let z = chcd * cp + sd * sp;
        let rsq = x * x + y * y;
        let r = rsq.sqrt();

        let a = if rsq == 0.0 { 0.0 } else { y.atan2(x) };
        let az = if a < 0.0 { a + DPI } else { a };
        let el = z.atan2(r);

        let c = cd * sp - ch * sdcp;
        let s = sh * cp;
        let pa = if c * c + s * s > 0.0 {
            s.atan2(c)
        } else {
            std::f64::consts::PI - ha
        };

        (az, el, pa)
    }

    fn ds2tp(
        &self,
        ra: Radian,
        dec: Radian,
        raz: Radian,
        decz: Radian,
    ) -> Result<(f64, f64), SkyframeError> {
        let (sdecz, cdecz) = decz.sin_cos();
        let (sdec, cdec) = dec.sin_cos();
        let radif = ra - raz;
        let (sradif, cradif) = radif.sin_cos();

        let denom = sdec * sdecz + cdec * cdecz * cradif;

        let (status, denom) = if denom > TINY {
            (0, denom)
        } else if denom >= 0.0 {
            (1, TINY)
        } else if denom > -TINY {
            (2, -TINY)
        } else {
            (3, denom)
        };

        if status != 0 {
            return Err(SkyframeError::ProjectionFailed(status));
        }

        let xi = cdec * sradif / denom;
        let eta = (sdec * cdecz - cdec * sdecz * cradif) / denom;
        Ok((xi, eta))
    }

    fn dtp2s(&self, xi: f64, eta: f64, raz: Radian, decz: Radian) -> (Radian, Radian) {
        let (sdecz, cdecz) = decz.sin_cos();
        let denom = cdecz - eta * sdecz;

        let ra = dranrm(xi.atan2(denom) + raz);
        let dec = (sdecz + eta * cdecz).atan2(xi.hypot(denom));
        (ra, dec)
    }

    fn eqgal(&self, ra: Radian, dec: Radian) -> (Radian, Radian) {
        let v = equatorial_to_galactic_matrix() * direction_cosines(ra, dec);
        let (l, b) = spherical_angles(&v);
        (dranrm(l), drange(b))
    }

    fn galeq(&self, l: Radian, b: Radian) -> (Radian, Radian) {
        let v = equatorial_to_galactic_matrix().transpose() * direction_cosines(l, b);
        let (ra, dec) = spherical_angles(&v);
        (dranrm(ra), drange(dec))
    }
}
