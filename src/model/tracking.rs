//! Horizontal single-axis tracker with backtracking.

use serde::Serialize;
use tracing::warn;

/// Fixed geometry of a tracker row, independent of time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerGeometry {
    /// Compass direction of the rotation axis (degrees clockwise from north).
    pub axis_azimuth: f64,
    /// Mechanical rotation limit in either direction (degrees).
    pub max_angle: f64,
    /// Ground coverage ratio, row width / pitch.
    pub gcr: f64,
    /// Rotate away from the ideal angle to avoid row-to-row shading.
    pub backtrack: bool,
}

impl TrackerGeometry {
    pub fn new(axis_azimuth: f64, max_angle: f64, gcr: f64, backtrack: bool) -> Self {
        if max_angle == 0.0 {
            warn!("tracker max_angle is 0; rows stay flat all day");
        }
        Self {
            axis_azimuth,
            max_angle,
            gcr,
            backtrack,
        }
    }

    /// Orientation for one sun position.
    ///
    /// # Arguments
    ///
    /// * `apparent_zenith` - Refraction-corrected solar zenith (degrees)
    /// * `solar_azimuth` - Solar azimuth, clockwise from north (degrees)
    pub fn orient(&self, apparent_zenith: f64, solar_azimuth: f64) -> TrackerState {
        single_axis(apparent_zenith, solar_azimuth, self)
    }
}

/// Tracker orientation at one instant (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackerState {
    /// Signed rotation; positive tilts the front face toward axis azimuth + 90°.
    pub tracker_theta: f64,
    pub surface_tilt: f64,
    pub surface_azimuth: f64,
    /// Angle of incidence of the beam on the front face.
    pub aoi: f64,
}

impl TrackerState {
    /// Flat stow state used while the sun is down.
    pub fn stowed(axis_azimuth: f64) -> Self {
        let (surface_tilt, surface_azimuth) = surface_orientation(0.0, axis_azimuth);
        Self {
            tracker_theta: 0.0,
            surface_tilt,
            surface_azimuth,
            aoi: 90.0,
        }
    }
}

/// Computes tracker rotation for a horizontal axis.
///
/// The ideal angle points the surface normal at the sun's projection onto
/// the plane perpendicular to the axis. With backtracking, the rotation is
/// reduced just enough that neighbouring rows no longer shade each other,
/// then the result is clamped to `±max_angle`.
pub fn single_axis(
    apparent_zenith: f64,
    solar_azimuth: f64,
    geometry: &TrackerGeometry,
) -> TrackerState {
    if apparent_zenith > 90.0 {
        return TrackerState::stowed(geometry.axis_azimuth);
    }

    let zen = apparent_zenith.to_radians();
    let az = solar_azimuth.to_radians();
    let axis_az = geometry.axis_azimuth.to_radians();

    // Sun vector: x east, y north, z up
    let x = zen.sin() * az.sin();
    let y = zen.sin() * az.cos();
    let z = zen.cos();

    // Rotate into tracker coordinates; x' is perpendicular to the axis
    let xp = x * axis_az.cos() - y * axis_az.sin();
    let ideal = xp.atan2(z).to_degrees();

    let mut theta = ideal;
    if geometry.backtrack && geometry.gcr > 0.0 {
        let temp = ((1.0 / geometry.gcr) * ideal.to_radians().cos()).abs();
        if temp < 1.0 {
            theta = ideal - ideal.signum() * temp.acos().to_degrees();
        }
    }
    let theta = theta.clamp(-geometry.max_angle, geometry.max_angle);

    let (surface_tilt, surface_azimuth) = surface_orientation(theta, geometry.axis_azimuth);
    let aoi = aoi(surface_tilt, surface_azimuth, apparent_zenith, solar_azimuth);

    TrackerState {
        tracker_theta: theta,
        surface_tilt,
        surface_azimuth,
        aoi,
    }
}

/// Surface tilt and azimuth of a horizontal-axis tracker at rotation `theta`.
pub fn surface_orientation(theta: f64, axis_azimuth: f64) -> (f64, f64) {
    let tilt = theta.abs();
    let offset = if theta < 0.0 { -90.0 } else { 90.0 };
    (tilt, (axis_azimuth + offset).rem_euclid(360.0))
}

/// Cosine of the angle between the surface normal and the sun vector.
pub fn aoi_projection(
    surface_tilt: f64,
    surface_azimuth: f64,
    solar_zenith: f64,
    solar_azimuth: f64,
) -> f64 {
    let (st, sz) = (surface_tilt.to_radians(), solar_zenith.to_radians());
    let projection = st.cos() * sz.cos()
        + st.sin() * sz.sin() * (solar_azimuth - surface_azimuth).to_radians().cos();
    projection.clamp(-1.0, 1.0)
}

/// Angle of incidence in degrees, `[0, 180]`.
pub fn aoi(surface_tilt: f64, surface_azimuth: f64, solar_zenith: f64, solar_azimuth: f64) -> f64 {
    aoi_projection(surface_tilt, surface_azimuth, solar_zenith, solar_azimuth)
        .acos()
        .to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ns_tracker(backtrack: bool) -> TrackerGeometry {
        TrackerGeometry::new(0.0, 55.0, 0.3973, backtrack)
    }

    #[test]
    fn overhead_sun_is_flat() {
        let s = ns_tracker(true).orient(0.0, 90.0);
        assert_abs_diff_eq!(s.tracker_theta, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s.aoi, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn follows_sun_without_backtracking() {
        // Sun 30° east of zenith: ideal rotation is 30° toward the east
        let s = ns_tracker(false).orient(30.0, 90.0);
        assert_abs_diff_eq!(s.tracker_theta, 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s.surface_tilt, 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s.surface_azimuth, 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s.aoi, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn afternoon_rotation_is_negative_and_faces_west() {
        let s = ns_tracker(false).orient(40.0, 270.0);
        assert!(s.tracker_theta < 0.0);
        assert_abs_diff_eq!(s.surface_azimuth, 270.0, epsilon = 1e-9);
    }

    #[test]
    fn clamps_at_max_angle() {
        let s = ns_tracker(false).orient(80.0, 90.0);
        assert_abs_diff_eq!(s.tracker_theta, 55.0, epsilon = 1e-9);
        assert!(s.aoi > 0.0);
    }

    #[test]
    fn backtracking_reduces_rotation_at_low_sun() {
        let free = ns_tracker(false).orient(75.0, 90.0);
        let back = ns_tracker(true).orient(75.0, 90.0);
        assert!(back.tracker_theta < free.tracker_theta);
        assert!(back.tracker_theta > 0.0);
        // |1/gcr · cos(75°)| < 1, so the correction acos(0.651) ≈ 49.4° applies
        assert_abs_diff_eq!(back.tracker_theta, 75.0 - 49.38, epsilon = 0.1);
    }

    #[test]
    fn backtracking_inactive_at_high_sun() {
        let free = ns_tracker(false).orient(30.0, 100.0);
        let back = ns_tracker(true).orient(30.0, 100.0);
        assert_abs_diff_eq!(free.tracker_theta, back.tracker_theta, epsilon = 1e-12);
    }

    #[test]
    fn stows_flat_at_night() {
        let s = ns_tracker(true).orient(100.0, 10.0);
        assert_eq!(s.tracker_theta, 0.0);
        assert_eq!(s.surface_tilt, 0.0);
        assert_eq!(s.aoi, 90.0);
        assert_abs_diff_eq!(s.surface_azimuth, 90.0);
    }

    #[test]
    fn tilt_never_exceeds_max_angle() {
        let tracker = TrackerGeometry::new(15.0, 45.0, 0.6, true);
        for zen in (0..=90).step_by(3) {
            for az in (0..360).step_by(11) {
                let s = tracker.orient(f64::from(zen), f64::from(az));
                assert!(s.surface_tilt <= 45.0 + 1e-9);
                assert!((0.0..360.0).contains(&s.surface_azimuth));
            }
        }
    }

    #[test]
    fn rotated_axis_shifts_surface_azimuth() {
        let (tilt, az) = surface_orientation(-20.0, 350.0);
        assert_eq!(tilt, 20.0);
        assert_abs_diff_eq!(az, 260.0);
        let (_, az) = surface_orientation(20.0, 350.0);
        assert_abs_diff_eq!(az, 80.0);
    }

    #[test]
    fn aoi_of_horizontal_surface_is_zenith() {
        assert_abs_diff_eq!(aoi(0.0, 180.0, 37.0, 123.0), 37.0, epsilon = 1e-9);
    }
}
