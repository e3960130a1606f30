mod common;

use approx::assert_relative_eq;
use rand::{rngs::StdRng, SeedableRng};
use skyframe::{
    constants::DPI,
    coordinates::{
        cartesian_from_spherical, galactic_from_equatorial_deg, haversine,
        equatorial_from_galactic_deg, rotation_matrix_from_vectors,
    },
    geometry::{Site, TelescopeState},
    horizon::{equatorial_to_horizon, equatorial_to_horizon_deg, horizon_to_equatorial},
    native_frame::{
        native_lon_lat_from_ra_dec, native_lon_lat_from_ra_dec_deg, ra_dec_from_native_lon_lat,
    },
    rotator::{rot_sky_from_rot_tel, rot_tel_from_rot_sky},
    sidereal::{gmst_gast, lmst_last, lmst_last_deg},
    skyframe_errors::SkyframeError,
    spherical_ops::PalOps,
    time_scales::ModifiedJulianDate,
    values::Values,
};

use crate::common::{max_separation, random_sky, test_scales};

#[test]
fn test_sidereal_ranges() {
    let mjd = Values::from((0..50).map(|i| 59000.0 + 13.37 * i as f64).collect::<Vec<_>>());
    let (gmst, gast) = gmst_gast(&PalOps, &mjd);
    let (lmst, last) = lmst_last_deg(&PalOps, &mjd, &Values::from(-70.7494)).unwrap();

    for values in [&gmst, &gast, &lmst, &last] {
        assert!(values.iter().all(|h| (0.0..24.0).contains(h)));
    }
}

#[test]
fn test_longitude_broadcast_is_one_directional() {
    let err = lmst_last(&PalOps, &Values::from(59000.0), &Values::from([0.1, 0.2])).unwrap_err();
    assert_eq!(
        err,
        SkyframeError::ArityMismatch {
            method: "lmst_last",
            sequence: "longitude",
            scalar: "mjd"
        }
    );

    let err = lmst_last(
        &PalOps,
        &Values::from([59000.0, 59001.0, 59002.0]),
        &Values::from([0.1, 0.2]),
    )
    .unwrap_err();
    assert!(matches!(err, SkyframeError::LengthMismatch { .. }));
}

#[test]
fn test_zenith() {
    let site = Site::lsst();
    let mjd = 59582.25;
    let (_, last) = lmst_last(&PalOps, &Values::from(mjd), &Values::from(site.longitude)).unwrap();
    let ra_zenith = (last.at(0) * 15.0).to_radians();

    let (alt, _, _) = equatorial_to_horizon(
        &PalOps,
        &Values::from(ra_zenith),
        &Values::from(site.latitude),
        &Values::from(site.longitude),
        &Values::from(site.latitude),
        &Values::from(mjd),
    )
    .unwrap();
    assert_relative_eq!(alt.at(0), std::f64::consts::FRAC_PI_2, epsilon = 1e-7);
}

#[test]
fn test_horizon_batch_matches_single() {
    let mut rng = StdRng::seed_from_u64(42_u64);
    let (ra, dec) = random_sky(&mut rng, 20);
    let site = Site::lsst();
    let (long, lat) = (Values::from(site.longitude), Values::from(site.latitude));
    let mjd = Values::from(59582.1);

    let (alt, az, pa) = equatorial_to_horizon(&PalOps, &ra, &dec, &long, &lat, &mjd).unwrap();
    assert!(az.iter().all(|a| (0.0..DPI).contains(a)));

    for i in 0..ra.len() {
        let (a, z, p) = equatorial_to_horizon(
            &PalOps,
            &Values::from(ra.at(i)),
            &Values::from(dec.at(i)),
            &long,
            &lat,
            &mjd,
        )
        .unwrap();
        assert_eq!(a.at(0), alt.at(i));
        assert_eq!(z.at(0), az.at(i));
        assert_eq!(p.at(0), pa.at(i));
    }

    let (ra_back, dec_back) = horizon_to_equatorial(&PalOps, &alt, &az, &long, &lat, &mjd).unwrap();
    assert!(max_separation(&ra, &dec, &ra_back, &dec_back) < 1e-7);
}

#[test]
fn test_horizon_site_must_be_scalar() {
    let err = equatorial_to_horizon_deg(
        &PalOps,
        &Values::from(10.0),
        &Values::from(-20.0),
        &Values::from([-70.0, -71.0]),
        &Values::from(-30.0),
        &Values::from(59000.0),
    )
    .unwrap_err();
    assert_eq!(
        err,
        SkyframeError::ScalarRequired {
            method: "equatorial_to_horizon",
            param: "longitude"
        }
    );
}

#[test]
fn test_horizon_rejects_mismatched_lengths() {
    let err = equatorial_to_horizon(
        &PalOps,
        &Values::from([0.1, 0.2, 0.3]),
        &Values::from([-0.1, -0.2]),
        &Values::from(-1.2),
        &Values::from(-0.5),
        &Values::from(59000.0),
    )
    .unwrap_err();
    assert_eq!(
        err,
        SkyframeError::LengthMismatch {
            method: "equatorial_to_horizon",
            first: "ra",
            first_len: 3,
            second: "dec",
            second_len: 2
        }
    );
}

#[test]
fn test_rotator_round_trip() {
    let site = Site::lsst();
    let (long, lat) = (Values::from(site.longitude), Values::from(site.latitude));
    let ra = Values::from([0.3, 1.9, 4.4]);
    let dec = Values::from([-0.9, -0.2, 0.1]);
    let mjd = Values::from(59582.4);
    let rot_tel = Values::from([0.1, 3.0, 5.9]);

    let rot_sky = rot_sky_from_rot_tel(&PalOps, &ra, &dec, &long, &lat, &mjd, &rot_tel).unwrap();
    assert!(rot_sky.iter().all(|r| (0.0..DPI).contains(r)));
    let back = rot_tel_from_rot_sky(&PalOps, &ra, &dec, &long, &lat, &mjd, &rot_sky).unwrap();
    for i in 0..3 {
        let diff = (back.at(i) - rot_tel.at(i)).abs();
        assert!(diff < 1e-12 || (DPI - diff) < 1e-12);
    }
}

#[test]
fn test_telescope_state_from_mjd() {
    let ts = test_scales();
    let mjd = ModifiedJulianDate::from_utc(59582.1, &ts);
    let site = Site::lsst();
    let state = TelescopeState::from_ra_dec_rot_tel(&PalOps, &site, &mjd, 1.2, -0.5, 0.3);

    let rot_sky = rot_sky_from_rot_tel(
        &PalOps,
        &Values::from(1.2),
        &Values::from(-0.5),
        &Values::from(site.longitude),
        &Values::from(site.latitude),
        &Values::from(mjd.ut1()),
        &Values::from(0.3),
    )
    .unwrap();
    assert_eq!(state.rot_sky_pos, rot_sky.at(0));
}

#[test]
fn test_native_frame_round_trip_with_poles() {
    let mut rng = StdRng::seed_from_u64(7_u64);
    let (mut ra, mut dec) = random_sky(&mut rng, 100);
    if let (Values::Sequence(r), Values::Sequence(d)) = (&mut ra, &mut dec) {
        r.extend([0.0, 1.0, 2.0]);
        d.extend([std::f64::consts::FRAC_PI_2, -std::f64::consts::FRAC_PI_2, 0.0]);
    }

    for (ra_p, dec_p) in [(0.5, -0.4), (3.0, 1.2), (5.5, std::f64::consts::FRAC_PI_2)] {
        let (ra_p, dec_p) = (Values::from(ra_p), Values::from(dec_p));
        let (lon, lat) = native_lon_lat_from_ra_dec(&ra, &dec, &ra_p, &dec_p).unwrap();
        assert!(lon.iter().all(|l| (0.0..=DPI).contains(l)));
        let (ra_back, dec_back) = ra_dec_from_native_lon_lat(&lon, &lat, &ra_p, &dec_p).unwrap();
        assert!(max_separation(&ra, &dec, &ra_back, &dec_back) < 1e-7);
    }
}

#[test]
fn test_native_frame_pointing_is_pole() {
    let (_, lat) = native_lon_lat_from_ra_dec_deg(
        &Values::from(33.0),
        &Values::from(-12.0),
        &Values::from(33.0),
        &Values::from(-12.0),
    )
    .unwrap();
    assert_relative_eq!(lat.at(0), 90.0, epsilon = 1e-9);
}

#[test]
fn test_galactic_round_trip() {
    let ra = Values::from([10.0, 200.0]);
    let dec = Values::from([-5.0, 60.0]);
    let (l, b) = galactic_from_equatorial_deg(&PalOps, &ra, &dec).unwrap();
    let (ra, dec) = equatorial_from_galactic_deg(&PalOps, &l, &b).unwrap();
    assert_relative_eq!(ra.at(0), 10.0, epsilon = 1e-9);
    assert_relative_eq!(ra.at(1), 200.0, epsilon = 1e-9);
    assert_relative_eq!(dec.at(0), -5.0, epsilon = 1e-9);
    assert_relative_eq!(dec.at(1), 60.0, epsilon = 1e-9);
}

#[test]
fn test_haversine_and_rotation_matrix() {
    assert_relative_eq!(haversine(0.0, 0.0, 0.0, 0.5), 0.5, epsilon = 1e-15);
    assert_relative_eq!(
        haversine(0.0, 0.0, 0.0, std::f64::consts::FRAC_PI_2),
        std::f64::consts::FRAC_PI_2,
        epsilon = 1e-12
    );
    assert_relative_eq!(
        haversine(0.0, 0.0, std::f64::consts::PI, 0.0),
        std::f64::consts::PI,
        epsilon = 1e-12
    );

    let v1 = cartesian_from_spherical(0.2, 0.1);
    let v2 = cartesian_from_spherical(1.4, -0.7);
    let m = rotation_matrix_from_vectors(&v1, &v2).unwrap();
    assert_relative_eq!(m * v1, v2, epsilon = 1e-12);

    assert_eq!(
        rotation_matrix_from_vectors(&(v1 * 2.0), &v2).unwrap_err(),
        SkyframeError::NotUnitVector("v1")
    );
}
