//! Built-in TAI−UTC history.
//!
//! From 1960 to 1971 UTC was steered with frequency offsets, so TAI−UTC drifted linearly
//! between steps: `ΔAT = base + (MJD_UTC − ref) × rate`. Since 1972 the offset is an integer
//! number of seconds changed only by leap seconds.
use once_cell::sync::Lazy;

use crate::constants::{Second, MJD};

/// One step of the TAI−UTC history, valid from `start` until the next step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeapStep {
    /// First UTC MJD at which the step applies
    pub start: MJD,
    /// TAI−UTC at `drift_reference`, in seconds
    pub base: Second,
    pub drift_reference: MJD,
    /// Drift in seconds per day
    pub drift_rate: f64,
}

impl LeapStep {
    const fn drifting(start: MJD, base: Second, drift_reference: MJD, drift_rate: f64) -> Self {
        LeapStep {
            start,
            base,
            drift_reference,
            drift_rate,
        }
    }

    const fn integer(start: MJD, base: Second) -> Self {
        LeapStep {
            start,
            base,
            drift_reference: 0.0,
            drift_rate: 0.0,
        }
    }

    /// TAI−UTC in seconds under this step's law, whether or not `utc` is inside the step.
    pub fn offset_at(&self, utc: MJD) -> Second {
        self.base + (utc - self.drift_reference) * self.drift_rate
    }
}

/// The table of TAI−UTC steps, sorted by start date.
#[derive(Debug, Clone, PartialEq)]
pub struct LeapSecondTable {
    steps: Vec<LeapStep>,
}

static BUILTIN: Lazy<LeapSecondTable> = Lazy::new(|| LeapSecondTable {
    steps: vec![
        LeapStep::drifting(36934.0, 1.4178180, 37300.0, 0.001296),
        LeapStep::drifting(37300.0, 1.4228180, 37300.0, 0.001296),
        LeapStep::drifting(37512.0, 1.3728180, 37300.0, 0.001296),
        LeapStep::drifting(37665.0, 1.8458580, 37665.0, 0.0011232),
        LeapStep::drifting(38334.0, 1.9458580, 37665.0, 0.0011232),
        LeapStep::drifting(38395.0, 3.2401300, 38761.0, 0.001296),
        LeapStep::drifting(38486.0, 3.3401300, 38761.0, 0.001296),
        LeapStep::drifting(38639.0, 3.4401300, 38761.0, 0.001296),
        LeapStep::drifting(38761.0, 3.5401300, 38761.0, 0.001296),
        LeapStep::drifting(38820.0, 3.6401300, 38761.0, 0.001296),
        LeapStep::drifting(38942.0, 3.7401300, 38761.0, 0.001296),
        LeapStep::drifting(39004.0, 3.8401300, 38761.0, 0.001296),
        LeapStep::drifting(39126.0, 4.3131700, 39126.0, 0.002592),
        LeapStep::drifting(39887.0, 4.2131700, 39126.0, 0.002592),
        LeapStep::integer(41317.0, 10.0),
        LeapStep::integer(41499.0, 11.0),
        LeapStep::integer(41683.0, 12.0),
        LeapStep::integer(42048.0, 13.0),
        LeapStep::integer(42413.0, 14.0),
        LeapStep::integer(42778.0, 15.0),
        LeapStep::integer(43144.0, 16.0),
        LeapStep::integer(43509.0, 17.0),
        LeapStep::integer(43874.0, 18.0),
        LeapStep::integer(44239.0, 19.0),
        LeapStep::integer(44786.0, 20.0),
        LeapStep::integer(45151.0, 21.0),
        LeapStep::integer(45516.0, 22.0),
        LeapStep::integer(46247.0, 23.0),
        LeapStep::integer(47161.0, 24.0),
        LeapStep::integer(47892.0, 25.0),
        LeapStep::integer(48257.0, 26.0),
        LeapStep::integer(48804.0, 27.0),
        LeapStep::integer(49169.0, 28.0),
        LeapStep::integer(49534.0, 29.0),
        LeapStep::integer(50083.0, 30.0),
        LeapStep::integer(50630.0, 31.0),
        LeapStep::integer(51179.0, 32.0),
        LeapStep::integer(53736.0, 33.0),
        LeapStep::integer(54832.0, 34.0),
        LeapStep::integer(56109.0, 35.0),
        LeapStep::integer(57204.0, 36.0),
        LeapStep::integer(57754.0, 37.0),
    ],
});

impl LeapSecondTable {
    /// The IERS history of TAI−UTC since 1960-01-01, initialised on first use.
    pub fn builtin() -> &'static LeapSecondTable {
        &BUILTIN
    }

    pub fn steps(&self) -> &[LeapStep] {
        &self.steps
    }

    /// UTC MJD of the first step (1960-01-01 for the built-in table).
    pub fn first_date(&self) -> MJD {
        self.steps.first().map_or(f64::INFINITY, |s| s.start)
    }

    /// TAI−UTC in seconds at a UTC MJD, or `None` before the first step.
    pub fn offset_at(&self, utc: MJD) -> Option<Second> {
        let idx = self.steps.partition_point(|s| s.start <= utc);
        idx.checked_sub(1).map(|i| self.steps[i].offset_at(utc))
    }

    /// Step start dates strictly inside `(low, high)`, each paired with the TAI−UTC that
    /// held just before it (0 before the first step).
    pub fn knots_between(
        &self,
        low: MJD,
        high: MJD,
    ) -> impl Iterator<Item = (MJD, Second)> + '_ {
        self.steps
            .iter()
            .enumerate()
            .filter(move |(_, s)| s.start > low && s.start < high)
            .map(move |(i, s)| {
                let before = i
                    .checked_sub(1)
                    .map_or(0.0, |prev| self.steps[prev].offset_at(s.start));
                (s.start, before)
            })
    }
}
