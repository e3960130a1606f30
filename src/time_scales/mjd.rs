//! An observation instant expressed in every time scale at once.
use std::cmp::Ordering;

use hifitime::Epoch;

use super::{Diagnosed, TimeScales, Warnings};
use crate::{
    constants::{Second, DAYS_PER_SECOND, MJD},
    skyframe_errors::SkyframeError,
    time::{epoch_from_mjd_tai, iso_utc_to_mjd},
};

/// A Modified Julian Date built from TAI or UTC, with UT1, TT and TDB derived once at
/// construction.
///
/// The value is immutable. Two dates are equal when their TAI values are equal, and they
/// are ordered by TAI.
///
/// The warnings raised while deriving the other scales (out-of-table UT1−UTC or TT−TAI,
/// date before the leap-second table) are kept in [`ModifiedJulianDate::warnings`].
#[derive(Debug, Clone)]
pub struct ModifiedJulianDate {
    tai: MJD,
    utc: MJD,
    ut1: MJD,
    dut1: Second,
    tt: MJD,
    dtt: Second,
    tdb: MJD,
    warnings: Warnings,
}

impl ModifiedJulianDate {
    /// Build a date from exactly one of TAI or UTC.
    ///
    /// Errors
    /// ----------
    /// * [`SkyframeError::UnspecifiedTimeScale`] when neither is given.
    /// * [`SkyframeError::AmbiguousTimeScale`] when both are given.
    pub fn new(
        tai: Option<MJD>,
        utc: Option<MJD>,
        scales: &TimeScales,
    ) -> Result<Self, SkyframeError> {
        match (tai, utc) {
            (Some(tai), None) => Ok(Self::from_tai(tai, scales)),
            (None, Some(utc)) => Ok(Self::from_utc(utc, scales)),
            (None, None) => Err(SkyframeError::UnspecifiedTimeScale),
            (Some(_), Some(_)) => Err(SkyframeError::AmbiguousTimeScale),
        }
    }

    pub fn from_tai(tai: MJD, scales: &TimeScales) -> Self {
        let utc = scales.utc_from_tai(tai);
        Self::derive(tai, utc, scales)
    }

    pub fn from_utc(utc: MJD, scales: &TimeScales) -> Self {
        let tai = scales.tai_from_utc(utc);
        let Diagnosed { value, warnings } = tai;
        Self::derive(value, Diagnosed { value: utc, warnings }, scales)
    }

    /// Build a date from a UTC calendar string such as `2022-03-15T04:30:00`.
    pub fn from_iso_utc(date: &str, scales: &TimeScales) -> Result<Self, SkyframeError> {
        Ok(Self::from_utc(iso_utc_to_mjd(date)?, scales))
    }

    fn derive(tai: MJD, utc: Diagnosed<MJD>, scales: &TimeScales) -> Self {
        let Diagnosed {
            value: utc,
            mut warnings,
        } = utc;

        let mut dut1 = scales.dut1_from_utc(utc);
        warnings.append(&mut dut1.warnings);
        let mut dtt = scales.dtt_from_utc(utc);
        warnings.append(&mut dtt.warnings);

        let ut1 = utc + dut1.value * DAYS_PER_SECOND;
        let tt = scales.tt_from_tai(tai);

        ModifiedJulianDate {
            tai,
            utc,
            ut1,
            dut1: dut1.value,
            tt,
            dtt: dtt.value,
            tdb: scales.tdb_from_tt(tt),
            warnings,
        }
    }

    /// International Atomic Time
    pub fn tai(&self) -> MJD {
        self.tai
    }

    /// Coordinated Universal Time
    pub fn utc(&self) -> MJD {
        self.utc
    }

    /// Universal Time
    pub fn ut1(&self) -> MJD {
        self.ut1
    }

    /// UT1−UTC in seconds
    pub fn dut1(&self) -> Second {
        self.dut1
    }

    /// Terrestrial Time
    pub fn tt(&self) -> MJD {
        self.tt
    }

    /// TT−TAI in seconds
    pub fn dtt(&self) -> Second {
        self.dtt
    }

    /// Barycentric Dynamical Time
    pub fn tdb(&self) -> MJD {
        self.tdb
    }

    pub fn warnings(&self) -> &[super::TimeWarning] {
        &self.warnings
    }

    pub fn to_epoch(&self) -> Epoch {
        epoch_from_mjd_tai(self.tai)
    }
}

impl PartialEq for ModifiedJulianDate {
    fn eq(&self, other: &Self) -> bool {
        self.tai == other.tai
    }
}

impl PartialOrd for ModifiedJulianDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.tai.partial_cmp(&other.tai)
    }
}

#[cfg(test)]
mod test_mjd {
    use super::*;
    use crate::time_scales::{EopTable, TimeWarning};
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn scales() -> TimeScales {
        let ut1 = EopTable::from_samples(&[(43000.0, 0.4), (50000.0, -0.3), (53000.0, 0.6)])
            .unwrap();
        let tt = EopTable::from_samples(&[(42589.0, 0.0), (57019.0, 27.697)]).unwrap();
        TimeScales::new(ut1, tt)
    }

    #[test]
    fn test_constructor_arity() {
        let ts = scales();
        assert_eq!(
            ModifiedJulianDate::new(None, None, &ts).unwrap_err(),
            SkyframeError::UnspecifiedTimeScale
        );
        assert_eq!(
            ModifiedJulianDate::new(Some(50000.0), Some(50000.0), &ts).unwrap_err(),
            SkyframeError::AmbiguousTimeScale
        );
        let mjd = ModifiedJulianDate::new(Some(50000.0), None, &ts).unwrap();
        assert_eq!(mjd.tai(), 50000.0);
    }

    #[test]
    fn test_eq() {
        let ts = scales();
        let mjd1 = ModifiedJulianDate::from_tai(43000.0, &ts);
        let mjd2 = ModifiedJulianDate::from_tai(43000.0, &ts);
        assert_eq!(mjd1, mjd2);
        let mjd3 = ModifiedJulianDate::from_tai(43000.01, &ts);
        assert_ne!(mjd1, mjd3);
        assert!(mjd1 < mjd3);
    }

    #[test]
    fn test_tt() {
        let ts = scales();
        let mut rng = StdRng::seed_from_u64(115);
        for _ in 0..200 {
            let tai = rng.random::<f64>() * 7000.0 + 50000.0;
            let mjd = ModifiedJulianDate::from_tai(tai, &ts);
            assert_relative_eq!(mjd.tt(), tai + 32.184 / 86400.0, epsilon = 1e-11);
        }
    }

    #[test]
    fn test_tdb() {
        let ts = scales();
        let mut rng = StdRng::seed_from_u64(117);
        for _ in 0..200 {
            let tai = rng.random::<f64>() * 10000.0 + 46000.0;
            let mjd = ModifiedJulianDate::from_tai(tai, &ts);
            let g = (357.53 + 0.9856003 * (tai - 51544.5).round()).to_radians();
            let tdb_test =
                mjd.tt() + (0.001658 * g.sin() + 0.000014 * (2.0 * g).sin()) / 86400.0;
            // microseconds
            let dt = (tdb_test - mjd.tdb()).abs() * 8.64e10;
            assert!(dt < 50.0);
        }
    }

    #[test]
    fn test_dut1_consistency() {
        let ts = scales();
        let mut rng = StdRng::seed_from_u64(117);
        for _ in 0..200 {
            let utc = rng.random::<f64>() * 10000.0 + 43000.0;
            let mjd = ModifiedJulianDate::from_utc(utc, &ts);
            let dt = (mjd.ut1() - mjd.utc()) * 86400.0;
            assert_relative_eq!(dt, mjd.dut1(), epsilon = 1e-5);
            assert!(mjd.dut1().abs() < 0.9);
        }
    }

    #[test]
    fn test_utc_tai_agree() {
        let ts = scales();
        let from_utc = ModifiedJulianDate::from_utc(55000.5, &ts);
        assert_eq!(from_utc.utc(), 55000.5);
        assert_relative_eq!(from_utc.tai(), 55000.5 + 34.0 / 86400.0, epsilon = 1e-11);

        let from_tai = ModifiedJulianDate::from_tai(from_utc.tai(), &ts);
        assert!(((from_tai.utc() - 55000.5) * 86400.0).abs() < 5e-6);
    }

    #[test]
    fn test_warnings_far_future() {
        let ts = scales();
        let mjd = ModifiedJulianDate::from_utc(1_000_000.0, &ts);
        assert_eq!(mjd.dut1(), 0.0);
        assert_eq!(mjd.ut1(), 1_000_000.0);
        assert!(mjd
            .warnings()
            .iter()
            .any(|w| matches!(w, TimeWarning::Ut1MinusUtcOutOfRange { .. })));
        assert!(mjd
            .warnings()
            .iter()
            .any(|w| matches!(w, TimeWarning::TtMinusTaiOutOfRange { .. })));
    }

    #[test]
    fn test_from_iso_utc() {
        let ts = scales();
        let mjd = ModifiedJulianDate::from_iso_utc("2009-06-01T00:00:00", &ts).unwrap();
        assert_eq!(mjd.utc(), 54983.0);
        assert!((mjd.to_epoch().to_mjd_tai_days() - mjd.tai()).abs() < 1e-9);

        assert!(ModifiedJulianDate::from_iso_utc("yesterday", &ts).is_err());
    }
}
