//! # Skyframe
//!
//! Coordinate and time transformations for pointing a wide-field survey telescope and
//! projecting sky positions onto its focal plane.
//!
//! ## Layers
//!
//! * [`time_scales`]: UTC, TAI, UT1, TT and TDB from a built-in leap-second table and
//!   caller-provided Earth-orientation tables, with [`time_scales::ModifiedJulianDate`]
//!   bundling all of them for one instant.
//! * [`sidereal`]: Greenwich and local, mean and apparent sidereal time.
//! * [`horizon`] and [`rotator`]: equatorial ↔ horizon coordinates, parallactic angle and the
//!   camera rotator angles `rotSkyPos` / `rotTelPos`.
//! * [`native_frame`]: longitude/latitude in a frame whose north pole is the pointing.
//! * [`pupil`]: gnomonic projection onto the focal plane and back, through an
//!   [`observed_frame::ObservedFrameService`].
//! * [`coordinates`]: galactic, Cartesian, haversine and unit helpers.
//!
//! Every angle parameter is a [`values::Values`], a scalar or a sequence; outputs have the
//! arity of the inputs. Plain functions work in radians, their `_deg` counterparts in
//! degrees.
//!
//! ## Example
//!
//! ```rust
//! use skyframe::geometry::{ObservingGeometry, Site};
//! use skyframe::observed_frame::{PrecessionNutationFrame, DEFAULT_EPOCH};
//! use skyframe::pupil::pupil_coords_from_ra_dec_deg;
//! use skyframe::spherical_ops::PalOps;
//! use skyframe::time_scales::{ModifiedJulianDate, TimeScales};
//! use skyframe::values::Values;
//!
//! let scales = TimeScales::without_eop();
//! let geometry = ObservingGeometry::new(Site::lsst())
//!     .with_pointing_deg(25.0, -30.0)
//!     .with_rot_sky_pos_deg(12.0)
//!     .with_mjd(ModifiedJulianDate::from_tai(59850.2, &scales));
//!
//! let (x, y) = pupil_coords_from_ra_dec_deg(
//!     &PalOps,
//!     &PrecessionNutationFrame,
//!     &Values::from([25.1, 24.9]),
//!     &Values::from([-30.2, -29.8]),
//!     &geometry,
//!     DEFAULT_EPOCH,
//! )?;
//! assert_eq!(x.len(), 2);
//! assert_eq!(y.len(), 2);
//! # Ok::<(), skyframe::skyframe_errors::SkyframeError>(())
//! ```
pub mod constants;
pub mod coordinates;
pub mod earth_orientation;
pub mod geometry;
pub mod horizon;
pub mod native_frame;
pub mod observed_frame;
pub mod pupil;
pub mod ref_system;
pub mod rotator;
pub mod sidereal;
pub mod skyframe_errors;
pub mod spherical_ops;
pub mod time;
pub mod time_scales;
pub mod values;
