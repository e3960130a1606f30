//! # Time scales
//!
//! Conversions of a Modified Julian Date between the five time scales used by the
//! pipeline: UTC, TAI, UT1, TT and TDB.
//!
//! ## Overview
//!
//! ```text
//!          leap-second table           UT1−UTC table
//!   TAI ◄──────────────────────► UTC ◄──────────────► UT1
//!    │
//!    │ +32.184 s
//!    ▼
//!    TT ──── periodic correction ───► TDB
//! ```
//!
//! - TAI−UTC comes from the built-in [`LeapSecondTable`].
//! - UT1−UTC and TT(BIPM)−TAI come from [`EopTable`]s supplied by the caller.
//! - The inverse directions (`utc_from_tai`, `utc_from_ut1`) have no closed form since the
//!   tables are indexed by UTC; they are solved by interpolating a local grid of forward
//!   evaluations.
//!
//! ## Out-of-range queries
//!
//! A query outside a table never fails. The documented fallback is returned inside a
//! [`Diagnosed`] value together with a [`TimeWarning`] describing the query and the table
//! domain, and the warning is logged through `tracing` at `warn` level.
//!
//! ## Sharing
//!
//! [`TimeScales`] is immutable after construction and can be shared between threads
//! (for instance behind an `Arc`).
use std::fmt;

use smallvec::SmallVec;

use crate::{
    constants::{Second, DAYS_PER_SECOND, MJD, T2000, TT_MINUS_TAI, TT_MINUS_TAI_DAYS},
    values::Values,
};

pub mod eop_table;
pub mod leap_seconds;
pub mod mjd;

pub use eop_table::EopTable;
pub use leap_seconds::{LeapSecondTable, LeapStep};
pub use mjd::ModifiedJulianDate;

/// Grid spacing (days) used to invert TAI−UTC.
const LEAP_GRID_STEP: f64 = 1.0e-6;
/// Half-width (days) and spacing of the grid used to invert UT1−UTC.
const UT1_GRID_SPAN: f64 = 1.0;
const UT1_GRID_STEP: f64 = 0.25;

/// Non-fatal diagnostic raised when a time-scale query falls outside a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeWarning {
    /// UT1−UTC requested outside the UT1−UTC table; 0 s was used.
    /// `domain` is `None` when no table was configured.
    Ut1MinusUtcOutOfRange {
        utc: MJD,
        domain: Option<(MJD, MJD)>,
    },
    /// TT−TAI requested outside the TT−TAI table; the nearest edge was used
    /// (32.184 s exactly below the table).
    TtMinusTaiOutOfRange {
        utc: MJD,
        domain: Option<(MJD, MJD)>,
    },
    /// TAI−UTC requested before the first leap-second step; 0 s was used.
    LeapSecondsOutOfRange { utc: MJD, first: MJD },
}

impl fmt::Display for TimeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeWarning::Ut1MinusUtcOutOfRange { utc, domain } => match domain {
                Some((lo, hi)) => write!(
                    f,
                    "UTC = {utc} is outside of the UT1-UTC table ({lo} <= utc <= {hi}), \
                     using UT1-UTC = 0"
                ),
                None => write!(f, "no UT1-UTC table for UTC = {utc}, using UT1-UTC = 0"),
            },
            TimeWarning::TtMinusTaiOutOfRange { utc, domain } => match domain {
                Some((lo, hi)) => write!(
                    f,
                    "UTC = {utc} is outside of the TT-TAI table ({lo} <= utc <= {hi}), \
                     using the nearest edge"
                ),
                None => write!(f, "no TT-TAI table for UTC = {utc}, using TT-TAI = 32.184 s"),
            },
            TimeWarning::LeapSecondsOutOfRange { utc, first } => write!(
                f,
                "UTC = {utc} precedes the leap-second table (starting at {first}), \
                 using TAI-UTC = 0"
            ),
        }
    }
}

pub type Warnings = SmallVec<[TimeWarning; 2]>;

/// A value together with the warnings raised while computing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosed<T> {
    pub value: T,
    pub warnings: Warnings,
}

impl<T> Diagnosed<T> {
    pub fn clean(value: T) -> Self {
        Diagnosed {
            value,
            warnings: SmallVec::new(),
        }
    }

    /// Attach a warning and log it.
    pub(crate) fn warned(value: T, warning: TimeWarning) -> Self {
        tracing::warn!("{warning}");
        let mut warnings = SmallVec::new();
        warnings.push(warning);
        Diagnosed { value, warnings }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Diagnosed<U> {
        Diagnosed {
            value: f(self.value),
            warnings: self.warnings,
        }
    }

    /// Chain a computation, accumulating the warnings of both steps.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Diagnosed<U>) -> Diagnosed<U> {
        let mut next = f(self.value);
        let mut warnings = self.warnings;
        warnings.append(&mut next.warnings);
        Diagnosed {
            value: next.value,
            warnings,
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Apply a scalar time conversion to every element of `values`, keeping the arity and
/// collecting the warnings in element order.
pub fn convert_values(values: &Values, f: impl Fn(MJD) -> Diagnosed<f64>) -> Diagnosed<Values> {
    let mut warnings = Warnings::new();
    let converted = values.map(|x| {
        let mut d = f(x);
        warnings.append(&mut d.warnings);
        d.value
    });
    Diagnosed {
        value: converted,
        warnings,
    }
}

/// The time-scale engine: the leap-second table plus optional Earth-orientation tables.
#[derive(Debug, Clone)]
pub struct TimeScales {
    leap_seconds: &'static LeapSecondTable,
    ut1_minus_utc: Option<EopTable>,
    tt_minus_tai: Option<EopTable>,
}

impl Default for TimeScales {
    fn default() -> Self {
        TimeScales::without_eop()
    }
}

impl TimeScales {
    /// Engine with both Earth-orientation tables.
    ///
    /// Arguments
    /// -----------------
    /// * `ut1_minus_utc`: UT1−UTC in seconds, indexed by UTC MJD.
    /// * `tt_minus_tai`: TT(BIPM)−TAI minus 32.184 s in microseconds, indexed by UTC MJD.
    pub fn new(ut1_minus_utc: EopTable, tt_minus_tai: EopTable) -> Self {
        TimeScales {
            leap_seconds: LeapSecondTable::builtin(),
            ut1_minus_utc: Some(ut1_minus_utc),
            tt_minus_tai: Some(tt_minus_tai),
        }
    }

    /// Engine with the leap-second table only: every UT1−UTC and TT−TAI query falls back
    /// and warns.
    pub fn without_eop() -> Self {
        TimeScales {
            leap_seconds: LeapSecondTable::builtin(),
            ut1_minus_utc: None,
            tt_minus_tai: None,
        }
    }

    pub fn with_ut1_minus_utc(mut self, table: EopTable) -> Self {
        self.ut1_minus_utc = Some(table);
        self
    }

    pub fn with_tt_minus_tai(mut self, table: EopTable) -> Self {
        self.tt_minus_tai = Some(table);
        self
    }

    pub fn leap_seconds(&self) -> &LeapSecondTable {
        self.leap_seconds
    }

    pub fn ut1_minus_utc(&self) -> Option<&EopTable> {
        self.ut1_minus_utc.as_ref()
    }

    pub fn tt_minus_tai(&self) -> Option<&EopTable> {
        self.tt_minus_tai.as_ref()
    }

    /// TAI−UTC in seconds at a UTC MJD.
    pub fn dat(&self, utc: MJD) -> Diagnosed<Second> {
        match self.leap_seconds.offset_at(utc) {
            Some(dt) => Diagnosed::clean(dt),
            None => Diagnosed::warned(
                0.0,
                TimeWarning::LeapSecondsOutOfRange {
                    utc,
                    first: self.leap_seconds.first_date(),
                },
            ),
        }
    }

    /// `tai = utc + ΔAT(utc) / 86400`.
    pub fn tai_from_utc(&self, utc: MJD) -> Diagnosed<MJD> {
        self.dat(utc).map(|dt| utc + dt * DAYS_PER_SECOND)
    }

    /// Inverse of [`TimeScales::tai_from_utc`].
    ///
    /// The leap-second table is indexed by UTC, so a grid of UTC values bracketing
    /// `tai − ΔAT(tai)` is pushed through the forward map and interpolated against TAI.
    /// Each step start enters the grid twice, with the offsets just before and at the
    /// step, so no interpolation segment straddles a discontinuity.
    ///
    /// Inside the gap opened by a positive step the result is the step start. Across the
    /// negative steps of 1961-08-01 and 1968-02-01 a short TAI interval has two UTC
    /// preimages; the later one, on the new step, is returned.
    ///
    /// The warning, if any, is raised for the UTC that was found.
    pub fn utc_from_tai(&self, tai: MJD) -> Diagnosed<MJD> {
        // ΔAT(tai) can differ from ΔAT(utc) by one step across a boundary
        let dat = self.leap_seconds.offset_at(tai).unwrap_or(0.0);
        let span = ((dat.abs() + 1.0) * DAYS_PER_SECOND).max(10.0 * LEAP_GRID_STEP);

        let utc = invert_offset(
            tai,
            span,
            LEAP_GRID_STEP,
            self.leap_seconds.knots_between(tai - span, tai + span),
            |utc| self.leap_seconds.offset_at(utc).unwrap_or(0.0),
        );
        self.dat(utc).map(|_| utc)
    }

    /// UT1−UTC in seconds at a UTC MJD; 0 outside the table.
    pub fn dut1_from_utc(&self, utc: MJD) -> Diagnosed<Second> {
        let table = self.ut1_minus_utc.as_ref();
        match table.and_then(|t| t.interpolate(utc)) {
            Some(dut) => Diagnosed::clean(dut),
            None => Diagnosed::warned(
                0.0,
                TimeWarning::Ut1MinusUtcOutOfRange {
                    utc,
                    domain: table.map(EopTable::domain),
                },
            ),
        }
    }

    fn dut1_quiet(&self, utc: MJD) -> Second {
        self.ut1_minus_utc
            .as_ref()
            .and_then(|t| t.interpolate(utc))
            .unwrap_or(0.0)
    }

    /// `ut1 = utc + (UT1−UTC)(utc) / 86400`.
    pub fn ut1_from_utc(&self, utc: MJD) -> Diagnosed<MJD> {
        self.dut1_from_utc(utc).map(|dut| utc + dut * DAYS_PER_SECOND)
    }

    /// Inverse of [`TimeScales::ut1_from_utc`], by interpolation over a ±1 day grid.
    ///
    /// A warning is raised when the UT1−UTC table does not cover the UT1 date itself.
    pub fn utc_from_ut1(&self, ut1: MJD) -> Diagnosed<MJD> {
        let knots: Vec<(MJD, Second)> = self
            .ut1_minus_utc
            .as_ref()
            .map(|t| {
                t.knots_between(ut1 - UT1_GRID_SPAN, ut1 + UT1_GRID_SPAN)
                    .map(|k| (k, self.dut1_quiet(k)))
                    .collect()
            })
            .unwrap_or_default();

        let utc = invert_offset(ut1, UT1_GRID_SPAN, UT1_GRID_STEP, knots, |utc| {
            self.dut1_quiet(utc)
        });
        self.dut1_from_utc(utc).map(|_| utc)
    }

    /// TT−TAI in seconds at a UTC MJD.
    ///
    /// Below the table 32.184 s exactly is returned, above it 32.184 s plus the last
    /// tabulated deviation; both cases raise a warning.
    pub fn dtt_from_utc(&self, utc: MJD) -> Diagnosed<Second> {
        let Some(table) = self.tt_minus_tai.as_ref() else {
            return Diagnosed::warned(
                TT_MINUS_TAI,
                TimeWarning::TtMinusTaiOutOfRange { utc, domain: None },
            );
        };

        let (first, last) = table.domain();
        let warning = TimeWarning::TtMinusTaiOutOfRange {
            utc,
            domain: Some((first, last)),
        };

        match table.interpolate(utc) {
            Some(dev) => Diagnosed::clean(TT_MINUS_TAI + dev * 1.0e-6),
            None if utc < first => Diagnosed::warned(TT_MINUS_TAI, warning),
            None => Diagnosed::warned(TT_MINUS_TAI + table.last_value() * 1.0e-6, warning),
        }
    }

    pub fn tt_from_tai(&self, tai: MJD) -> MJD {
        tt_from_tai(tai)
    }

    pub fn tdb_from_tt(&self, tt: MJD) -> MJD {
        tdb_from_tt(tt)
    }
}

/// `tt = tai + 0.00037250` days (32.184 s rounded to the day fraction used throughout).
pub fn tt_from_tai(tai: MJD) -> MJD {
    tai + TT_MINUS_TAI_DAYS
}

/// TDB from TT with the two-term periodic correction
///
/// ```text
/// g   = 357.53° + 0.9856003° × (tt − 51544.5)
/// tdb = tt + (0.001658 sin g + 0.000014 sin 2g) / 86400
/// ```
///
/// `tt − 51544.5` is used unrounded; rounding the Julian Date to 0.01 day first would
/// move the result by at most ~1e-7 s.
pub fn tdb_from_tt(tt: MJD) -> MJD {
    let g = (357.53 + 0.9856003 * (tt - T2000)).to_radians();
    tt + (0.001658 * g.sin() + 0.000014 * (2.0 * g).sin()) * DAYS_PER_SECOND
}

/// Solve `u + offset(u) / 86400 = target` for `u`.
///
/// The forward map is sampled at offsets `δ` from the target on a grid of half-width
/// `span`. Every knot `(u, offset just before u)` adds two nodes, the left limit and the
/// value at `u`, so each pair of neighbouring nodes lies on one linear piece of the
/// forward map. Working with `δ` rather than `u` keeps the interpolation free of the
/// cancellation a ~5e4 day magnitude would cause.
fn invert_offset(
    target: MJD,
    span: f64,
    step: f64,
    knots: impl IntoIterator<Item = (MJD, Second)>,
    offset: impl Fn(MJD) -> Second,
) -> MJD {
    let mut nodes: Vec<(f64, f64)> = Vec::new();
    for (knot, before) in knots {
        let d = knot - target;
        nodes.push((d, d + before * DAYS_PER_SECOND));
        nodes.push((d, d + offset(knot) * DAYS_PER_SECOND));
    }

    let n = (2.0 * span / step).ceil() as usize;
    nodes.extend((0..=n).map(|k| {
        let d = -span + k as f64 * step;
        (d, d + offset(target + d) * DAYS_PER_SECOND)
    }));

    // stable: a knot's left limit stays ahead of its right value
    nodes.sort_by(|a, b| a.0.total_cmp(&b.0));
    nodes.dedup();

    target + delta_at_zero(&nodes)
}

/// Offset `δ` at which the residual of `(δ, residual)` nodes sorted by `δ` reaches zero.
///
/// The last segment where the residual rises through zero wins. A residual that drops
/// at a knot is a discontinuity, not a root. Without any rising crossing the result is
/// clamped to the first node (all residuals positive) or the last one.
fn delta_at_zero(nodes: &[(f64, f64)]) -> f64 {
    let crossing = nodes
        .windows(2)
        .rev()
        .find(|w| w[0].1 < 0.0 && w[1].1 >= 0.0);

    match crossing {
        Some(&[(y0, x0), (y1, x1)]) => y0 + (0.0 - x0) * (y1 - y0) / (x1 - x0),
        _ => match (nodes.first(), nodes.last()) {
            (Some(&(d, r)), _) if r >= 0.0 => d,
            (_, Some(&(d, _))) => d,
            _ => 0.0,
        },
    }
}
