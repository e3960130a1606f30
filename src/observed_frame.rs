//! # Observed-frame service
//!
//! The pupil projection works on *observed* (apparent) coordinates: catalog positions
//! corrected for precession, nutation, aberration and refraction. Those corrections are not
//! computed by the transforms themselves; they go through the [`ObservedFrameService`]
//! trait, a per-element mapping `(ra, dec) ↔ (ra_obs, dec_obs)` for one observation.
//!
//! Two implementations are provided:
//!
//! * [`IdentityObservedFrame`] returns its input unchanged, for pure focal-plane geometry.
//! * [`PrecessionNutationFrame`] rotates from the mean equator and equinox of the catalog
//!   epoch to the true equator and equinox of the observation date (IAU 1976 precession,
//!   IAU 1980 nutation). It carries no refraction model.
//!
//! Implementations must be deterministic and `icrs_from_observed` must invert
//! `observed_from_icrs` to well below a milliarcsecond.
use nalgebra::Matrix3;

use crate::{
    constants::{JulianYear, Radian, DPI, JULIAN_YEAR_DAYS, T2000},
    coordinates::{cartesian_from_spherical, reduce_angle, spherical_from_cartesian},
    geometry::Site,
    ref_system::{rotpn, RefEpoch, RefSystem},
    time_scales::ModifiedJulianDate,
};

/// Epoch of the mean equinox used when the caller gives none.
pub const DEFAULT_EPOCH: JulianYear = 2000.0;

/// Everything an observed-frame service may read about the observation.
#[derive(Debug, Clone, Copy)]
pub struct ObservationContext<'a> {
    pub site: &'a Site,
    pub mjd: &'a ModifiedJulianDate,
    /// Epoch of the mean equinox of the catalog coordinates
    pub epoch: JulianYear,
    pub include_refraction: bool,
}

pub trait ObservedFrameService {
    /// Catalog coordinates to observed coordinates, radians.
    fn observed_from_icrs(
        &self,
        ra: Radian,
        dec: Radian,
        ctx: &ObservationContext<'_>,
    ) -> (Radian, Radian);

    /// Observed coordinates back to catalog coordinates, radians.
    fn icrs_from_observed(
        &self,
        ra: Radian,
        dec: Radian,
        ctx: &ObservationContext<'_>,
    ) -> (Radian, Radian);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityObservedFrame;

impl ObservedFrameService for IdentityObservedFrame {
    fn observed_from_icrs(
        &self,
        ra: Radian,
        dec: Radian,
        _ctx: &ObservationContext<'_>,
    ) -> (Radian, Radian) {
        (ra, dec)
    }

    fn icrs_from_observed(
        &self,
        ra: Radian,
        dec: Radian,
        _ctx: &ObservationContext<'_>,
    ) -> (Radian, Radian) {
        (ra, dec)
    }
}

/// Mean equator of the catalog epoch to true equator of the observation date.
///
/// `include_refraction` is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrecessionNutationFrame;

impl PrecessionNutationFrame {
    /// Rotation matrix from the catalog frame to the observed frame of `ctx`.
    pub fn matrix(&self, ctx: &ObservationContext<'_>) -> Matrix3<f64> {
        let catalog = if ctx.epoch == DEFAULT_EPOCH {
            RefEpoch::J2000
        } else {
            RefEpoch::Epoch(T2000 + (ctx.epoch - DEFAULT_EPOCH) * JULIAN_YEAR_DAYS)
        };
        rotpn(
            &RefSystem::Equm(catalog),
            &RefSystem::Equt(RefEpoch::Epoch(ctx.mjd.tt())),
        )
    }
}

fn rotate(matrix: &Matrix3<f64>, ra: Radian, dec: Radian) -> (Radian, Radian) {
    let (ra, dec) = spherical_from_cartesian(&(matrix * cartesian_from_spherical(ra, dec)));
    (reduce_angle(ra, DPI), dec)
}

impl ObservedFrameService for PrecessionNutationFrame {
    fn observed_from_icrs(
        &self,
        ra: Radian,
        dec: Radian,
        ctx: &ObservationContext<'_>,
    ) -> (Radian, Radian) {
        rotate(&self.matrix(ctx), ra, dec)
    }

    fn icrs_from_observed(
        &self,
        ra: Radian,
        dec: Radian,
        ctx: &ObservationContext<'_>,
    ) -> (Radian, Radian) {
        rotate(&self.matrix(ctx).transpose(), ra, dec)
    }
}
