use chrono::{DateTime, Utc};
use std::f64::consts::PI;

use super::epoch::parse_epoch;
use super::error::EphemerisError;

// WGS-84 constants
const WGS84_A_KM: f64 = 6378.137;
const WGS84_F: f64 = 1.0 / 298.257_223_563;
const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

const ARCSEC_TO_RAD: f64 = PI / (180.0 * 3600.0);
const MAX_ITERATIONS: usize = 10;
const CONVERGENCE_RAD: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticPosition {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

/// Convert a J2000 inertial position (km) observed at `epoch` into geodetic
/// coordinates on the WGS-84 ellipsoid.
pub fn convert(position: [f64; 3], epoch: &str) -> Result<GeodeticPosition, EphemerisError> {
    if position.iter().any(|c| !c.is_finite()) {
        return Err(EphemerisError::NonFinite("position"));
    }
    let instant = parse_epoch(epoch)?;
    Ok(ecef_to_geodetic(eci_to_ecef(position, instant)))
}

/// Precess from J2000 to the mean equator of date, then spin by Greenwich
/// mean sidereal time. Nutation and polar motion are not modelled.
pub fn eci_to_ecef(pos_eci: [f64; 3], instant: DateTime<Utc>) -> [f64; 3] {
    let years = sgp4::julian_years_since_j2000(&instant.naive_utc());
    let mean_of_date = mat_vec(&precession_matrix(years / 100.0), pos_eci);
    let gmst = sgp4::iau_epoch_to_sidereal_time(years);
    rotate_z(mean_of_date, gmst)
}

/// IAU-1976 precession matrix, `centuries` Julian centuries after J2000.
pub fn precession_matrix(centuries: f64) -> [[f64; 3]; 3] {
    let t = centuries;
    let zeta = (2306.2181 * t + 0.30188 * t * t + 0.017998 * t * t * t) * ARCSEC_TO_RAD;
    let z = (2306.2181 * t + 1.09468 * t * t + 0.018203 * t * t * t) * ARCSEC_TO_RAD;
    let theta = (2004.3109 * t - 0.42665 * t * t - 0.041833 * t * t * t) * ARCSEC_TO_RAD;

    let (sin_zeta, cos_zeta) = zeta.sin_cos();
    let (sin_z, cos_z) = z.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();

    [
        [
            cos_zeta * cos_theta * cos_z - sin_zeta * sin_z,
            -sin_zeta * cos_theta * cos_z - cos_zeta * sin_z,
            -sin_theta * cos_z,
        ],
        [
            cos_zeta * cos_theta * sin_z + sin_zeta * cos_z,
            -sin_zeta * cos_theta * sin_z + cos_zeta * cos_z,
            -sin_theta * sin_z,
        ],
        [cos_zeta * sin_theta, -sin_zeta * sin_theta, cos_theta],
    ]
}

/// Rotate about +Z into a frame turned by `angle` radians.
pub fn rotate_z(v: [f64; 3], angle: f64) -> [f64; 3] {
    let (sin_a, cos_a) = angle.sin_cos();
    [
        v[0] * cos_a + v[1] * sin_a,
        -v[0] * sin_a + v[1] * cos_a,
        v[2],
    ]
}

/// Earth-fixed Cartesian (km) to geodetic latitude/longitude/height.
///
/// Fixed-point iteration on the geodetic latitude; the height uses the form
/// that stays well conditioned near the poles.
pub fn ecef_to_geodetic(ecef: [f64; 3]) -> GeodeticPosition {
    let [x, y, z] = ecef;
    let p = x.hypot(y);
    let longitude = y.atan2(x);

    let mut latitude = z.atan2(p * (1.0 - WGS84_E2));
    for _ in 0..MAX_ITERATIONS {
        let sin_lat = latitude.sin();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        let next = (z + WGS84_E2 * n * sin_lat).atan2(p);
        let converged = (next - latitude).abs() < CONVERGENCE_RAD;
        latitude = next;
        if converged {
            break;
        }
    }

    let (sin_lat, cos_lat) = latitude.sin_cos();
    let altitude =
        p * cos_lat + z * sin_lat - WGS84_A_KM * (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();

    GeodeticPosition {
        latitude_deg: latitude.to_degrees(),
        longitude_deg: longitude.to_degrees(),
        altitude_km: altitude,
    }
}

fn mat_vec(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn geodetic_to_ecef(lat_deg: f64, lon_deg: f64, alt_km: f64) -> [f64; 3] {
        let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
        let (sin_lon, cos_lon) = lon_deg.to_radians().sin_cos();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        [
            (n + alt_km) * cos_lat * cos_lon,
            (n + alt_km) * cos_lat * sin_lon,
            (n * (1.0 - WGS84_E2) + alt_km) * sin_lat,
        ]
    }

    fn norm(v: [f64; 3]) -> f64 {
        (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
    }

    fn wrap_deg(angle: f64) -> f64 {
        (angle + 180.0).rem_euclid(360.0) - 180.0
    }

    #[test]
    fn test_equator_on_ellipsoid() {
        let geo = ecef_to_geodetic([WGS84_A_KM, 0.0, 0.0]);
        assert!(geo.latitude_deg.abs() < 1e-12);
        assert!(geo.longitude_deg.abs() < 1e-12);
        assert!(geo.altitude_km.abs() < 1e-9);
    }

    #[test]
    fn test_pole_on_ellipsoid() {
        let b = WGS84_A_KM * (1.0 - WGS84_F);
        let geo = ecef_to_geodetic([0.0, 0.0, b]);
        assert!((geo.latitude_deg - 90.0).abs() < 1e-9);
        assert!(geo.altitude_km.abs() < 1e-9);

        let geo = ecef_to_geodetic([0.0, 0.0, -(b + 400.0)]);
        assert!((geo.latitude_deg + 90.0).abs() < 1e-9);
        assert!((geo.altitude_km - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_geodetic_round_trip() {
        let cases = [
            (0.0, 0.0, 0.0),
            (29.5593, -95.09, 0.01),
            (-33.8688, 151.2093, 0.058),
            (51.6, 12.0, 420.0),
            (-51.6, -179.5, 410.0),
            (89.9, 45.0, 35786.0),
        ];
        for (lat, lon, alt) in cases {
            let geo = ecef_to_geodetic(geodetic_to_ecef(lat, lon, alt));
            assert!((geo.latitude_deg - lat).abs() < 1e-9, "lat {lat}");
            assert!((geo.longitude_deg - lon).abs() < 1e-9, "lon {lon}");
            assert!((geo.altitude_km - alt).abs() < 1e-6, "alt {alt}");
        }
    }

    #[test]
    fn test_flattening_is_applied() {
        let ecef = geodetic_to_ecef(45.0, 0.0, 0.0);
        let geocentric = ecef[2].atan2(ecef[0]).to_degrees();
        let geo = ecef_to_geodetic(ecef);
        assert!((geo.latitude_deg - 45.0).abs() < 1e-9);
        // Geocentric and geodetic latitude differ by about 0.19 deg at 45 deg.
        assert!((geo.latitude_deg - geocentric - 0.192).abs() < 0.001);
    }

    #[test]
    fn test_precession_is_identity_at_j2000() {
        let m = precession_matrix(0.0);
        for (i, row) in m.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((value - expected).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn test_precession_tilts_pole_by_theta() {
        let centuries = 0.24;
        let pole = mat_vec(&precession_matrix(centuries), [0.0, 0.0, 1.0]);
        let tilt = pole[2].acos();
        let theta = (2004.3109 * centuries - 0.42665 * centuries * centuries
            - 0.041833 * centuries * centuries * centuries)
            * ARCSEC_TO_RAD;
        assert!((tilt - theta).abs() < 1e-12);
        assert!((norm(pole) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_sidereal_rotation_at_j2000() {
        // GMST at 2000-01-01 12:00 UT is 280.46 deg, so the inertial X axis
        // sits at 79.54 deg east.
        let geo = convert([WGS84_A_KM + 400.0, 0.0, 0.0], "2000-001T12:00:00.000Z").unwrap();
        assert!((geo.longitude_deg - (360.0 - 280.460_618)).abs() < 1e-3);
        assert!(geo.latitude_deg.abs() < 1e-6);
        assert!((geo.altitude_km - 400.0).abs() < 1e-6);
    }

    #[test]
    fn test_earth_rotates_eastward() {
        let position = [6778.0, 0.0, 0.0];
        let before = convert(position, "2024-100T06:00:00.000Z").unwrap();
        let after = convert(position, "2024-100T07:00:00.000Z").unwrap();
        // One solar hour is 15.041 deg of sidereal rotation; a fixed inertial
        // point drifts westward over the ground.
        let drift = wrap_deg(after.longitude_deg - before.longitude_deg);
        assert!((drift + 15.041).abs() < 1e-3, "drift {drift}");
        assert!((before.altitude_km - after.altitude_km).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_preserves_radius() {
        let instant = parse_epoch("2024-001T00:00:00.000Z").unwrap();
        let eci = [1000.0, 0.0, 7000.0];
        let ecef = eci_to_ecef(eci, instant);
        assert!((norm(ecef) - norm(eci)).abs() < 1e-9);
    }

    #[test]
    fn test_iss_like_state() {
        let geo = convert([1000.0, 0.0, 7000.0], "2024-001T00:00:00.000Z").unwrap();
        assert!(geo.latitude_deg > 80.0 && geo.latitude_deg < 90.0);
        assert!(geo.altitude_km > 700.0 && geo.altitude_km < 800.0);
    }

    #[test]
    fn test_convert_rejects_bad_input() {
        assert_eq!(
            convert([f64::NAN, 0.0, 0.0], "2024-001T00:00:00.000Z").unwrap_err(),
            EphemerisError::NonFinite("position")
        );
        assert!(matches!(
            convert([7000.0, 0.0, 0.0], "not an epoch"),
            Err(EphemerisError::InvalidEpoch { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_convert_stays_in_range(
            x in -50_000.0f64..50_000.0,
            y in -50_000.0f64..50_000.0,
            z in -50_000.0f64..50_000.0,
            year in 2000i32..2040,
            day in 1u32..=365,
            hour in 0u32..24,
            minute in 0u32..60,
            second in 0u32..60,
        ) {
            let epoch = format!("{year:04}-{day:03}T{hour:02}:{minute:02}:{second:02}.000Z");
            let geo = convert([x, y, z], &epoch).unwrap();
            prop_assert!((-90.0..=90.0).contains(&geo.latitude_deg));
            prop_assert!((-180.0..=180.0).contains(&geo.longitude_deg));
            prop_assert!(geo.altitude_km.is_finite());
        }
    }
}
