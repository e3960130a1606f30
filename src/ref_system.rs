//! # Celestial reference systems
//!
//! Mean and true equatorial reference systems tied to an epoch, and the rotation matrices
//! between them. These rotations back the [`crate::observed_frame::PrecessionNutationFrame`]
//! which moves ICRS-like mean J2000 positions onto the true equator of the observing date.
//!
//! Every matrix returned here acts on Cartesian unit vectors: `x₂ = R · x₁`.
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::{
    constants::{Radian, T2000},
    earth_orientation::{prec, rnut80},
};

/// Epoch attached to a reference system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefEpoch {
    J2000,
    /// Arbitrary epoch, as a Modified Julian Date in TT.
    Epoch(f64),
}

impl RefEpoch {
    pub fn date(&self) -> f64 {
        match *self {
            RefEpoch::J2000 => T2000,
            RefEpoch::Epoch(d) => d,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefSystem {
    // Equatorial mean: mean equator and equinox of the epoch (precession only)
    Equm(RefEpoch),
    // Equatorial true: true equator and equinox of the epoch (precession and nutation)
    Equt(RefEpoch),
}

impl RefSystem {
    pub fn epoch(&self) -> RefEpoch {
        match *self {
            RefSystem::Equm(e) => e,
            RefSystem::Equt(e) => e,
        }
    }
}

/// Coordinate axis of an elementary rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Elementary rotation of angle `alpha` (radians) about one coordinate axis.
///
/// The returned matrix is orthonormal and rotates vectors in a fixed frame, following the
/// right-hand rule.
pub fn rotmt(alpha: Radian, axis: Axis) -> Matrix3<f64> {
    let axis = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Rotation from `ref_sys` to the mean equator and equinox of J2000.
fn to_mean_j2000(ref_sys: &RefSystem) -> Matrix3<f64> {
    let date = ref_sys.epoch().date();

    let to_j2000 = match ref_sys.epoch() {
        RefEpoch::J2000 => Matrix3::identity(),
        RefEpoch::Epoch(_) => prec(date).transpose(),
    };

    match ref_sys {
        RefSystem::Equm(_) => to_j2000,
        RefSystem::Equt(_) => to_j2000 * rnut80(date).transpose(),
    }
}

/// Compute the rotation matrix between two celestial reference systems.
///
/// The path always goes through the mean equator and equinox of J2000: the source is
/// brought back to it (inverse nutation, then precession) and the result is
/// carried forward to the target system.
///
/// Arguments
/// ---------
/// * `ref_sys1`: source reference system.
/// * `ref_sys2`: target reference system.
///
/// Returns
/// --------
/// * The orthonormal matrix `R` such that `x₂ = R · x₁`.
///
/// # See also
/// * [`prec`] – IAU 1976 precession matrix
/// * [`rnut80`] – IAU 1980 nutation matrix
pub fn rotpn(ref_sys1: &RefSystem, ref_sys2: &RefSystem) -> Matrix3<f64> {
    if ref_sys1 == ref_sys2 {
        return Matrix3::identity();
    }

    to_mean_j2000(ref_sys2).transpose() * to_mean_j2000(ref_sys1)
}
