//! # Constants and type definitions for Skyframe
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **angle/time
//! type aliases** used throughout the `skyframe` library.
//!
//! ## Overview
//!
//! - Time-scale constants (seconds per day, J2000 epoch, TT−TAI offset)
//! - Unit conversions (degrees ↔ radians, arcseconds ↔ radians, seconds of time ↔ radians)
//! - Type aliases making the unit of every public angle explicit
//!
//! Internal computation is always carried out in radians. Degrees and arcseconds only
//! appear at the public boundary, through the `_deg` wrappers and the helpers of
//! [`crate::coordinates`].

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Day length expressed as a fraction of one second (1 / 86400)
pub const DAYS_PER_SECOND: f64 = 1.0 / SECONDS_PER_DAY;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Days in a Julian year
pub const JULIAN_YEAR_DAYS: f64 = 365.25;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Seconds of time → radians
pub const RADTSEC: f64 = DPI / SECONDS_PER_DAY;

/// TT − TAI in seconds (fixed by definition)
pub const TT_MINUS_TAI: f64 = 32.184;

/// TT − TAI expressed in days, rounded the way the time-scale engine applies it
pub const TT_MINUS_TAI_DAYS: f64 = 0.00037250;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Time in hours (sidereal time)
pub type Hour = f64;
/// Time interval in seconds
pub type Second = f64;
/// Distance in meters
pub type Meter = f64;

/// Modified Julian Date (days)
pub type MJD = f64;

/// Epoch of a mean equinox, in Julian years (e.g. `2000.0`)
pub type JulianYear = f64;
