//! # Pupil projection
//!
//! Projection of sky positions onto the flat focal plane ("pupil" coordinates) and back.
//!
//! ```text
//! (ra, dec) ──observed_from_icrs──► (ra_obs, dec_obs) ──ds2tp about the observed pointing──►
//!   (ξ, η) ──x = −ξ──► rotate by rotSkyPos ──► (x_pupil, y_pupil)
//! ```
//!
//! The sign flip on `x` makes West negative when North is up, the focal-plane convention of
//! the survey camera. The inverse runs the same chain backwards: rotation by `−rotSkyPos`,
//! sign flip, inverse gnomonic projection, then `icrs_from_observed`.
//!
//! Pupil coordinates are always radians, also for the `_deg` wrappers. A target that
//! cannot be projected (too far from the pointing, behind the tangent plane) yields `NaN`
//! for both pupil coordinates of that element only.
use tracing::debug;

use crate::{
    constants::{JulianYear, Radian},
    geometry::{ObservingGeometry, ResolvedGeometry},
    observed_frame::{ObservationContext, ObservedFrameService},
    skyframe_errors::SkyframeError,
    spherical_ops::BasicSphericalOps,
    values::{validate_coupled, Values},
};

fn observation_context<'a>(
    geometry: &ResolvedGeometry<'a>,
    epoch: JulianYear,
) -> ObservationContext<'a> {
    ObservationContext {
        site: geometry.site,
        mjd: geometry.mjd,
        epoch,
        include_refraction: true,
    }
}

/// Rotate a focal-plane point by `theta` (counter-clockwise).
fn rotate(x: f64, y: f64, theta: Radian) -> (f64, f64) {
    let (sin_t, cos_t) = theta.sin_cos();
    (x * cos_t - y * sin_t, x * sin_t + y * cos_t)
}

/// Pupil coordinates of catalog positions.
///
/// Arguments
/// -----------------
/// * `ops`: spherical-astronomy primitives (gnomonic projection).
/// * `frame`: catalog ↔ observed coordinate service.
/// * `ra`, `dec`: catalog coordinates in radians, coupled.
/// * `geometry`: the observation; pointing, `rotSkyPos` and time are required.
/// * `epoch`: Julian epoch of the mean equinox of `ra`/`dec`, usually
///   [`crate::observed_frame::DEFAULT_EPOCH`].
///
/// Return
/// ----------
/// * `(x, y)` pupil coordinates in radians, `NaN` for targets that cannot be projected.
///
/// Errors
/// ----------
/// * [`SkyframeError::LengthMismatch`] / [`SkyframeError::ArityMismatch`] if `ra` and
///   `dec` do not agree.
/// * [`SkyframeError::MissingMetadata`] if the geometry lacks a required field.
pub fn pupil_coords_from_ra_dec<O, F>(
    ops: &O,
    frame: &F,
    ra: &Values,
    dec: &Values,
    geometry: &ObservingGeometry,
    epoch: JulianYear,
) -> Result<(Values, Values), SkyframeError>
where
    O: BasicSphericalOps,
    F: ObservedFrameService,
{
    let method = "pupil_coords_from_ra_dec";
    let m = validate_coupled(method, &[("ra", ra), ("dec", dec)])?;
    let geometry = geometry.resolve(method)?;
    let ctx = observation_context(&geometry, epoch);

    let (ra_pointing, dec_pointing) =
        frame.observed_from_icrs(geometry.pointing_ra, geometry.pointing_dec, &ctx);

    Ok(m.build2(|i| {
        let (ra_obs, dec_obs) = frame.observed_from_icrs(ra.at(i), dec.at(i), &ctx);
        match ops.ds2tp(ra_obs, dec_obs, ra_pointing, dec_pointing) {
            Ok((xi, eta)) => rotate(-xi, eta, geometry.rot_sky_pos),
            Err(err) => {
                debug!(index = i, ra = ra.at(i), dec = dec.at(i), %err, "target not projected");
                (f64::NAN, f64::NAN)
            }
        }
    }))
}

/// [`pupil_coords_from_ra_dec`] with `ra`/`dec` in degrees. Pupil coordinates stay in
/// radians.
pub fn pupil_coords_from_ra_dec_deg<O, F>(
    ops: &O,
    frame: &F,
    ra: &Values,
    dec: &Values,
    geometry: &ObservingGeometry,
    epoch: JulianYear,
) -> Result<(Values, Values), SkyframeError>
where
    O: BasicSphericalOps,
    F: ObservedFrameService,
{
    pupil_coords_from_ra_dec(
        ops,
        frame,
        &ra.to_radians(),
        &dec.to_radians(),
        geometry,
        epoch,
    )
}

/// Catalog coordinates of pupil positions, inverse of [`pupil_coords_from_ra_dec`].
///
/// Arguments
/// -----------------
/// * `x`, `y`: pupil coordinates in radians, coupled.
/// * the other arguments as in [`pupil_coords_from_ra_dec`].
///
/// Return
/// ----------
/// * `(ra, dec)` catalog coordinates in radians.
pub fn ra_dec_from_pupil_coords<O, F>(
    ops: &O,
    frame: &F,
    x: &Values,
    y: &Values,
    geometry: &ObservingGeometry,
    epoch: JulianYear,
) -> Result<(Values, Values), SkyframeError>
where
    O: BasicSphericalOps,
    F: ObservedFrameService,
{
    let method = "ra_dec_from_pupil_coords";
    let m = validate_coupled(method, &[("x", x), ("y", y)])?;
    let geometry = geometry.resolve(method)?;
    let ctx = observation_context(&geometry, epoch);

    let (ra_pointing, dec_pointing) =
        frame.observed_from_icrs(geometry.pointing_ra, geometry.pointing_dec, &ctx);

    Ok(m.build2(|i| {
        let (x_g, y_g) = rotate(x.at(i), y.at(i), -geometry.rot_sky_pos);
        let (ra_obs, dec_obs) = ops.dtp2s(-x_g, y_g, ra_pointing, dec_pointing);
        frame.icrs_from_observed(ra_obs, dec_obs, &ctx)
    }))
}

/// [`ra_dec_from_pupil_coords`] returning degrees. Pupil coordinates are radians.
pub fn ra_dec_from_pupil_coords_deg<O, F>(
    ops: &O,
    frame: &F,
    x: &Values,
    y: &Values,
    geometry: &ObservingGeometry,
    epoch: JulianYear,
) -> Result<(Values, Values), SkyframeError>
where
    O: BasicSphericalOps,
    F: ObservedFrameService,
{
    let (ra, dec) = ra_dec_from_pupil_coords(ops, frame, x, y, geometry, epoch)?;
    Ok((ra.to_degrees(), dec.to_degrees()))
}
