#![allow(dead_code)]

use camino::Utf8Path;
use rand::{rngs::StdRng, Rng};
use skyframe::{
    constants::DPI,
    coordinates::haversine,
    time_scales::{EopTable, TimeScales},
    values::Values,
};

/// Time scales backed by a short UT1−UTC table from `tests/data` and a synthetic TT−TAI
/// deviation table.
pub fn test_scales() -> TimeScales {
    let ut1 = EopTable::from_csv_path(Utf8Path::new("tests/data/ut1_minus_utc.csv"))
        .expect("UT1-UTC test table");
    let tt = EopTable::from_samples(&[(42589.0, 0.0), (50000.0, 20.0), (60000.0, 27.7)])
        .expect("TT-TAI test table");
    TimeScales::new(ut1, tt)
}

/// Uniform random angles in `[0, 2π)` and declinations uniform on the sphere.
pub fn random_sky(rng: &mut StdRng, n: usize) -> (Values, Values) {
    let ra: Vec<f64> = (0..n).map(|_| rng.random::<f64>() * DPI).collect();
    let dec: Vec<f64> = (0..n)
        .map(|_| (rng.random::<f64>() * 2.0 - 1.0).asin())
        .collect();
    (Values::from(ra), Values::from(dec))
}

/// Largest angular separation between two coupled sets of positions, radians.
pub fn max_separation(ra1: &Values, dec1: &Values, ra2: &Values, dec2: &Values) -> f64 {
    (0..ra1.len())
        .map(|i| haversine(ra1.at(i), dec1.at(i), ra2.at(i), dec2.at(i)))
        .fold(0.0, f64::max)
}
