//! Sorted `(mjd_utc, value)` lookup tables queried by linear interpolation.
//!
//! Two Earth-orientation quantities are tabulated this way: UT1−UTC in seconds and the
//! TT(BIPM)−TAI deviation from 32.184 s in microseconds. The tables are built once, before
//! any transform, from in-memory samples or from a two-column CSV file:
//!
//! ```text
//! mjd,value
//! 57000.0,-0.3587
//! 57001.0,-0.3593
//! ```
use std::io::Read;

use camino::Utf8Path;
use serde::Deserialize;

use crate::{constants::MJD, skyframe_errors::SkyframeError};

#[derive(Debug, Clone, Copy, Deserialize)]
struct EopRecord {
    mjd: f64,
    value: f64,
}

/// A non-empty table of samples with strictly increasing MJDs.
#[derive(Debug, Clone, PartialEq)]
pub struct EopTable {
    mjd: Vec<MJD>,
    value: Vec<f64>,
}

impl EopTable {
    /// Build a table from `(mjd_utc, value)` samples.
    ///
    /// Errors
    /// ----------
    /// * [`SkyframeError::MalformedTable`] if the samples are empty, not finite or not
    ///   strictly increasing in MJD.
    pub fn from_samples(samples: &[(MJD, f64)]) -> Result<Self, SkyframeError> {
        if samples.is_empty() {
            return Err(SkyframeError::MalformedTable(
                "the table has no samples".to_string(),
            ));
        }

        if let Some((mjd, value)) = samples
            .iter()
            .find(|(mjd, value)| !mjd.is_finite() || !value.is_finite())
        {
            return Err(SkyframeError::MalformedTable(format!(
                "non finite sample ({mjd}, {value})"
            )));
        }

        if let Some(pair) = samples.windows(2).find(|pair| pair[1].0 <= pair[0].0) {
            return Err(SkyframeError::MalformedTable(format!(
                "mjd {} follows {}, samples must be strictly increasing",
                pair[1].0, pair[0].0
            )));
        }

        let (mjd, value) = samples.iter().copied().unzip();
        Ok(EopTable { mjd, value })
    }

    /// Read a table from CSV data with a `mjd,value` header.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, SkyframeError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let samples = csv_reader
            .deserialize::<EopRecord>()
            .map(|record| record.map(|r| (r.mjd, r.value)))
            .collect::<Result<Vec<_>, csv::Error>>()?;
        Self::from_samples(&samples)
    }

    /// Read a table from a CSV file with a `mjd,value` header.
    pub fn from_csv_path(path: &Utf8Path) -> Result<Self, SkyframeError> {
        let file = std::fs::File::open(path.as_std_path())?;
        Self::from_csv_reader(file)
    }

    /// First and last tabulated MJD.
    pub fn domain(&self) -> (MJD, MJD) {
        // non-empty by construction
        (self.mjd[0], self.mjd[self.mjd.len() - 1])
    }

    pub fn len(&self) -> usize {
        self.mjd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mjd.is_empty()
    }

    pub fn first_value(&self) -> f64 {
        self.value[0]
    }

    pub fn last_value(&self) -> f64 {
        self.value[self.value.len() - 1]
    }

    /// Linear interpolation at `mjd`, or `None` outside the tabulated domain.
    pub fn interpolate(&self, mjd: MJD) -> Option<f64> {
        let (first, last) = self.domain();
        if !(first..=last).contains(&mjd) {
            return None;
        }

        // index of the first sample strictly after mjd
        let upper = self.mjd.partition_point(|&m| m <= mjd);
        if upper == self.mjd.len() {
            return Some(self.last_value());
        }

        let (m0, m1) = (self.mjd[upper - 1], self.mjd[upper]);
        let (v0, v1) = (self.value[upper - 1], self.value[upper]);
        Some(v0 + (mjd - m0) * (v1 - v0) / (m1 - m0))
    }

    /// Tabulated MJDs lying strictly inside `(low, high)`.
    pub fn knots_between(&self, low: MJD, high: MJD) -> impl Iterator<Item = MJD> + '_ {
        self.mjd
            .iter()
            .copied()
            .filter(move |&m| m > low && m < high)
    }
}

#[cfg(test)]
mod test_eop_table {
    use super::*;
    use approx::assert_relative_eq;

    fn table() -> EopTable {
        EopTable::from_samples(&[(57000.0, 0.1), (57010.0, -0.4), (57020.0, 0.2)]).unwrap()
    }

    #[test]
    fn test_interpolate() {
        let t = table();
        assert_eq!(t.interpolate(57000.0), Some(0.1));
        assert_eq!(t.interpolate(57020.0), Some(0.2));
        assert_relative_eq!(t.interpolate(57005.0).unwrap(), -0.15, epsilon = 1e-15);
        assert_relative_eq!(t.interpolate(57015.0).unwrap(), -0.1, epsilon = 1e-15);
        assert_eq!(t.interpolate(56999.9), None);
        assert_eq!(t.interpolate(57020.1), None);
        assert_eq!(t.domain(), (57000.0, 57020.0));
    }

    #[test]
    fn test_knots_between() {
        let knots: Vec<_> = table().knots_between(57000.0, 57030.0).collect();
        assert_eq!(knots, vec![57010.0, 57020.0]);
    }

    #[test]
    fn test_malformed_tables() {
        assert!(matches!(
            EopTable::from_samples(&[]),
            Err(SkyframeError::MalformedTable(_))
        ));
        assert!(matches!(
            EopTable::from_samples(&[(1.0, 0.0), (1.0, 0.5)]),
            Err(SkyframeError::MalformedTable(_))
        ));
        assert!(matches!(
            EopTable::from_samples(&[(1.0, f64::NAN)]),
            Err(SkyframeError::MalformedTable(_))
        ));
    }

    #[test]
    fn test_from_csv_reader() {
        let data = "mjd,value\n57000.0,0.1\n57010.0,-0.4\n57020.0,0.2\n";
        let t = EopTable::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(t, table());

        let bad = "mjd,value\n57000.0,abc\n";
        assert!(matches!(
            EopTable::from_csv_reader(bad.as_bytes()),
            Err(SkyframeError::CsvError(_))
        ));
    }

    #[test]
    fn test_from_missing_path() {
        let err = EopTable::from_csv_path(Utf8Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, SkyframeError::IoError(_)));
    }
}
