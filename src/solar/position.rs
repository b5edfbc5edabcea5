//! Sun position from the Grena (2012) algorithm no. 3.
//!
//! Accurate to about 0.01° between 2010 and 2110 and still well within a
//! tenth of a degree for a few decades outside that window, which is far
//! below the resolution that matters for a one-minute irradiance series.
//!
//! Reference: Grena, R. (2012). Five new algorithms for the computation of
//! sun position from 2010 to 2110. Solar Energy, 86(5), 1323-1337.

#![allow(clippy::unreadable_literal)]

use std::f64::consts::PI;

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::Serialize;

/// Default ΔT (TT − UT1) in seconds.
pub const DEFAULT_DELTA_T: f64 = 67.0;

/// Sun geometry at one instant, all angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarPosition {
    /// Geometric (topocentric) zenith angle.
    pub zenith: f64,
    /// Zenith angle corrected for atmospheric refraction.
    pub apparent_zenith: f64,
    /// Azimuth, clockwise from north, in `[0, 360)`.
    pub azimuth: f64,
}

impl SolarPosition {
    /// Refraction-corrected elevation above the horizon.
    pub fn apparent_elevation(&self) -> f64 {
        90.0 - self.apparent_zenith
    }

    /// Returns `true` when the sun is at or above the horizon.
    pub fn is_up(&self) -> bool {
        self.apparent_zenith <= 90.0
    }
}

/// Atmospheric state used for the refraction correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atmosphere {
    /// Surface pressure (hPa).
    pub pressure_hpa: f64,
    /// Air temperature (°C).
    pub temperature_c: f64,
}

impl Default for Atmosphere {
    fn default() -> Self {
        Self {
            pressure_hpa: 1013.25,
            temperature_c: 12.0,
        }
    }
}

/// Computes the sun position for an observer at `latitude`/`longitude`.
///
/// # Arguments
///
/// * `time` - Instant of interest (UTC)
/// * `latitude` - Observer latitude in degrees, north positive
/// * `longitude` - Observer longitude in degrees, east positive
/// * `delta_t` - ΔT in seconds
/// * `atmosphere` - Pressure and temperature for the refraction term
pub fn grena3(
    time: &DateTime<Utc>,
    latitude: f64,
    longitude: f64,
    delta_t: f64,
    atmosphere: Atmosphere,
) -> SolarPosition {
    let t = days_since_j2000(time);
    let t_e = t + 1.1574e-5 * delta_t;
    let omega_at_e = 0.0172019715 * t_e;

    // Apparent ecliptic longitude of the sun
    let lambda = -1.388803
        + 1.720279216e-2 * t_e
        + 3.3366e-2 * (omega_at_e - 0.06172).sin()
        + 3.53e-4 * (2.0 * omega_at_e - 0.1163).sin();

    let epsilon = 4.089567e-1 - 6.19e-9 * t_e;

    let s_lambda = lambda.sin();
    let c_lambda = lambda.cos();
    let s_epsilon = epsilon.sin();
    let c_epsilon = (1.0 - s_epsilon * s_epsilon).sqrt();

    let mut alpha = (s_lambda * c_epsilon).atan2(c_lambda);
    if alpha < 0.0 {
        alpha += 2.0 * PI;
    }
    let delta = (s_lambda * s_epsilon).asin();

    // Hour angle wrapped to [-PI, PI)
    let mut h = 1.7528311 + 6.300388099 * t + longitude.to_radians() - alpha;
    h = ((h + PI) % (2.0 * PI)) - PI;
    if h < -PI {
        h += 2.0 * PI;
    }

    let s_phi = latitude.to_radians().sin();
    let c_phi = (1.0 - s_phi * s_phi).sqrt();
    let s_delta = delta.sin();
    let c_delta = (1.0 - s_delta * s_delta).sqrt();
    let s_h = h.sin();
    let c_h = h.cos();

    // Topocentric elevation, including parallax
    let s_epsilon0 = s_phi * s_delta + c_phi * c_delta * c_h;
    let e_p = s_epsilon0.asin() - 4.26e-5 * (1.0 - s_epsilon0 * s_epsilon0).sqrt();
    let gamma = s_h.atan2(c_h * s_phi - s_delta * c_phi / c_delta);

    let refraction = if e_p > 0.0 {
        (0.08422 * (atmosphere.pressure_hpa / 1000.0))
            / ((273.0 + atmosphere.temperature_c) * (e_p + 0.003138 / (e_p + 0.08919)).tan())
    } else {
        0.0
    };

    let zenith = (PI / 2.0 - e_p).to_degrees();
    let apparent_zenith = (PI / 2.0 - e_p - refraction).to_degrees();
    let azimuth = (gamma + PI).to_degrees().rem_euclid(360.0);

    SolarPosition {
        zenith,
        apparent_zenith,
        azimuth,
    }
}

/// Days since 2000-01-01 12:00 UT, following Grena's calendar arithmetic.
fn days_since_j2000(time: &DateTime<Utc>) -> f64 {
    let mut month = time.month() as i32;
    let mut year = time.year();
    let day = time.day() as i32;
    let hour = f64::from(time.hour())
        + f64::from(time.minute()) / 60.0
        + f64::from(time.second()) / 3600.0;

    if month <= 2 {
        month += 12;
        year -= 1;
    }

    f64::from((365.25 * f64::from(year - 2000)) as i32)
        + f64::from((30.6001 * f64::from(month + 1)) as i32)
        - f64::from((0.01 * f64::from(year)) as i32)
        + f64::from(day)
        + 0.0416667 * hour
        - 21958.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .map(|naive| naive.and_utc())
            .expect("valid test timestamp")
    }

    #[test]
    fn midsummer_noon_zenith_matches_declination() {
        // 55°N on 28 June: declination ≈ 23.27°, so noon zenith ≈ 31.7°
        let start = utc(2020, 6, 28, 0, 0);
        let (best_minute, best) = (0..1440)
            .map(|m| {
                let t = start + TimeDelta::minutes(m);
                (m, grena3(&t, 55.0, 10.0, DEFAULT_DELTA_T, Atmosphere::default()))
            })
            .min_by(|a, b| a.1.zenith.total_cmp(&b.1.zenith))
            .expect("non-empty day");

        assert!(
            (best.zenith - 31.73).abs() < 0.2,
            "noon zenith {}",
            best.zenith
        );
        // Solar noon at 10°E in late June is about 11:23 UTC
        assert!(
            (675..=690).contains(&best_minute),
            "solar noon at minute {best_minute}"
        );
        // Sun is due south at solar noon
        assert!((best.azimuth - 180.0).abs() < 1.0);
    }

    #[test]
    fn refraction_raises_the_sun() {
        let t = utc(2020, 6, 28, 4, 0);
        let pos = grena3(&t, 55.0, 10.0, DEFAULT_DELTA_T, Atmosphere::default());
        assert!(pos.is_up());
        assert!(pos.apparent_zenith < pos.zenith);
        assert!(pos.zenith - pos.apparent_zenith < 1.0);
    }

    #[test]
    fn no_refraction_below_horizon() {
        let t = utc(2020, 6, 28, 23, 0);
        let pos = grena3(&t, 55.0, 10.0, DEFAULT_DELTA_T, Atmosphere::default());
        assert!(!pos.is_up());
        assert_eq!(pos.zenith, pos.apparent_zenith);
    }

    #[test]
    fn morning_sun_is_in_the_east() {
        let t = utc(2021, 3, 20, 7, 0);
        let pos = grena3(&t, 0.0, 0.0, DEFAULT_DELTA_T, Atmosphere::default());
        assert!(pos.azimuth > 45.0 && pos.azimuth < 135.0, "{}", pos.azimuth);
        assert!(pos.apparent_elevation() > 0.0);
    }

    #[test]
    fn equinox_noon_at_equator_is_near_overhead() {
        let t = utc(2021, 3, 20, 12, 7);
        let pos = grena3(&t, 0.0, 0.0, DEFAULT_DELTA_T, Atmosphere::default());
        assert!(pos.zenith < 2.0, "{}", pos.zenith);
    }

    #[test]
    fn azimuth_always_in_range() {
        let start = utc(2020, 12, 21, 0, 0);
        for m in (0..1440).step_by(7) {
            let t = start + TimeDelta::minutes(m);
            let pos = grena3(&t, -33.9, 151.2, DEFAULT_DELTA_T, Atmosphere::default());
            assert!((0.0..360.0).contains(&pos.azimuth));
            assert!((0.0..=180.0).contains(&pos.zenith));
        }
    }
}
