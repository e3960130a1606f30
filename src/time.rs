//! # Calendar dates and Julian day numbers
//!
//! Thin helpers around [`hifitime`] used at the boundary of the time-scale engine:
//! calendar strings are parsed into UTC Modified Julian Dates, and MJDs can be turned back
//! into [`hifitime::Epoch`] values for display or interoperability.
//!
//! The leap-second bookkeeping itself is not delegated to `hifitime`: it lives in
//! [`crate::time_scales`], which owns the tables the rest of the crate relies on.
use hifitime::Epoch;
use std::str::FromStr;

use crate::{constants::MJD, skyframe_errors::SkyframeError};

/// Transformation from a calendar date in the format `YYYY-MM-DDTHH:MM:SS` (UTC) to a
/// Modified Julian Date in UTC.
///
/// Argument
/// --------
/// * `date`: an ISO 8601 calendar string, optionally with fractional seconds
///
/// Return
/// ------
/// * the UTC Modified Julian Date, or [`SkyframeError::InvalidDate`] if the string
///   cannot be parsed
pub fn iso_utc_to_mjd(date: &str) -> Result<MJD, SkyframeError> {
    Epoch::from_str(date)
        .map(|epoch| epoch.to_mjd_utc_days())
        .map_err(|err| SkyframeError::InvalidDate(format!("{date}: {err}")))
}

/// Build a [`hifitime::Epoch`] from a TAI Modified Julian Date.
pub fn epoch_from_mjd_tai(tai: MJD) -> Epoch {
    Epoch::from_mjd_tai(tai)
}
