//! # Site and observing geometry
//!
//! [`Site`] is the observatory location, [`ObservingGeometry`] the metadata of one
//! observation read by the pupil projection: site, pointing, `rotSkyPos` and time. The
//! transforms only read these values.
//!
//! [`TelescopeState`] derives a self-consistent set of pointing angles (RA/Dec, Alt/Az,
//! `rotSkyPos`, `rotTelPos`) from either a sky or a horizon pointing and either rotator
//! angle, and turns it into an [`ObservingGeometry`].
use crate::{
    constants::{Degree, Meter, Radian},
    horizon::{alt_az_pa_single, ra_dec_single},
    rotator::{rot_sky_from_pa, rot_tel_from_pa},
    skyframe_errors::SkyframeError,
    spherical_ops::BasicSphericalOps,
    time_scales::ModifiedJulianDate,
};

/// An observatory location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    /// East longitude in radians
    pub longitude: Radian,
    /// Geodetic latitude in radians
    pub latitude: Radian,
    /// Height above the ellipsoid in meters
    pub height: Meter,
}

impl Site {
    pub fn new(longitude: Radian, latitude: Radian, height: Meter) -> Self {
        Site {
            longitude,
            latitude,
            height,
        }
    }

    pub fn from_degrees(longitude: Degree, latitude: Degree, height: Meter) -> Self {
        Site::new(longitude.to_radians(), latitude.to_radians(), height)
    }

    /// The LSST site on Cerro Pachón.
    pub fn lsst() -> Self {
        Site::from_degrees(-70.7494, -30.2444, 2650.0)
    }
}

impl Default for Site {
    fn default() -> Self {
        Site::lsst()
    }
}

/// Metadata of a single observation.
///
/// Every field but the site is optional; operations needing a missing field fail with
/// [`SkyframeError::MissingMetadata`].
#[derive(Debug, Clone, PartialEq)]
pub struct ObservingGeometry {
    pub site: Site,
    pub pointing_ra: Option<Radian>,
    pub pointing_dec: Option<Radian>,
    pub rot_sky_pos: Option<Radian>,
    pub mjd: Option<ModifiedJulianDate>,
}

/// The fields of an [`ObservingGeometry`] needed by a projection, all present.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedGeometry<'a> {
    pub site: &'a Site,
    pub pointing_ra: Radian,
    pub pointing_dec: Radian,
    pub rot_sky_pos: Radian,
    pub mjd: &'a ModifiedJulianDate,
}

impl ObservingGeometry {
    pub fn new(site: Site) -> Self {
        ObservingGeometry {
            site,
            pointing_ra: None,
            pointing_dec: None,
            rot_sky_pos: None,
            mjd: None,
        }
    }

    pub fn with_pointing(mut self, ra: Radian, dec: Radian) -> Self {
        self.pointing_ra = Some(ra);
        self.pointing_dec = Some(dec);
        self
    }

    pub fn with_pointing_deg(self, ra: Degree, dec: Degree) -> Self {
        self.with_pointing(ra.to_radians(), dec.to_radians())
    }

    pub fn with_rot_sky_pos(mut self, rot_sky_pos: Radian) -> Self {
        self.rot_sky_pos = Some(rot_sky_pos);
        self
    }

    pub fn with_rot_sky_pos_deg(self, rot_sky_pos: Degree) -> Self {
        self.with_rot_sky_pos(rot_sky_pos.to_radians())
    }

    pub fn with_mjd(mut self, mjd: ModifiedJulianDate) -> Self {
        self.mjd = Some(mjd);
        self
    }

    /// Check that the pointing, `rotSkyPos` and time are all present.
    ///
    /// Errors
    /// ----------
    /// * [`SkyframeError::MissingMetadata`] naming the first missing field among
    ///   `pointing_ra`, `pointing_dec`, `rot_sky_pos` and `mjd`.
    pub fn resolve(&self, method: &'static str) -> Result<ResolvedGeometry<'_>, SkyframeError> {
        let missing = |field| SkyframeError::MissingMetadata { method, field };

        Ok(ResolvedGeometry {
            site: &self.site,
            pointing_ra: self.pointing_ra.ok_or_else(|| missing("pointing_ra"))?,
            pointing_dec: self.pointing_dec.ok_or_else(|| missing("pointing_dec"))?,
            rot_sky_pos: self.rot_sky_pos.ok_or_else(|| missing("rot_sky_pos"))?,
            mjd: self.mjd.as_ref().ok_or_else(|| missing("mjd"))?,
        })
    }
}

/// A consistent set of pointing angles at a given time, all in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelescopeState {
    pub ra: Radian,
    pub dec: Radian,
    pub alt: Radian,
    pub az: Radian,
    pub rot_sky_pos: Radian,
    pub rot_tel_pos: Radian,
}

impl TelescopeState {
    /// From a sky pointing and the rotator angle relative to the mount.
    pub fn from_ra_dec_rot_tel<O: BasicSphericalOps>(
        ops: &O,
        site: &Site,
        mjd: &ModifiedJulianDate,
        ra: Radian,
        dec: Radian,
        rot_tel_pos: Radian,
    ) -> Self {
        let (alt, az, pa) =
            alt_az_pa_single(ops, ra, dec, site.longitude, site.latitude, mjd.ut1());
        TelescopeState {
            ra,
            dec,
            alt,
            az,
            rot_sky_pos: rot_sky_from_pa(rot_tel_pos, pa),
            rot_tel_pos,
        }
    }

    /// From a sky pointing and the field orientation on the sky.
    pub fn from_ra_dec_rot_sky<O: BasicSphericalOps>(
        ops: &O,
        site: &Site,
        mjd: &ModifiedJulianDate,
        ra: Radian,
        dec: Radian,
        rot_sky_pos: Radian,
    ) -> Self {
        let (alt, az, pa) =
            alt_az_pa_single(ops, ra, dec, site.longitude, site.latitude, mjd.ut1());
        TelescopeState {
            ra,
            dec,
            alt,
            az,
            rot_sky_pos,
            rot_tel_pos: rot_tel_from_pa(rot_sky_pos, pa),
        }
    }

    /// From a horizon pointing and the rotator angle relative to the mount.
    pub fn from_alt_az_rot_tel<O: BasicSphericalOps>(
        ops: &O,
        site: &Site,
        mjd: &ModifiedJulianDate,
        alt: Radian,
        az: Radian,
        rot_tel_pos: Radian,
    ) -> Self {
        let (ra, dec) = ra_dec_single(ops, alt, az, site.longitude, site.latitude, mjd.ut1());
        let state = Self::from_ra_dec_rot_tel(ops, site, mjd, ra, dec, rot_tel_pos);
        TelescopeState { alt, az, ..state }
    }

    /// From a horizon pointing and the field orientation on the sky.
    pub fn from_alt_az_rot_sky<O: BasicSphericalOps>(
        ops: &O,
        site: &Site,
        mjd: &ModifiedJulianDate,
        alt: Radian,
        az: Radian,
        rot_sky_pos: Radian,
    ) -> Self {
        let (ra, dec) = ra_dec_single(ops, alt, az, site.longitude, site.latitude, mjd.ut1());
        let state = Self::from_ra_dec_rot_sky(ops, site, mjd, ra, dec, rot_sky_pos);
        TelescopeState { alt, az, ..state }
    }

    /// The observing geometry of this state.
    pub fn geometry(&self, site: Site, mjd: ModifiedJulianDate) -> ObservingGeometry {
        ObservingGeometry::new(site)
            .with_pointing(self.ra, self.dec)
            .with_rot_sky_pos(self.rot_sky_pos)
            .with_mjd(mjd)
    }
}
