//! Beam shading geometry between rows.

use super::tracking::aoi;

/// Solar zenith above which the ground is treated as fully shaded.
pub const MAX_GROUND_ZENITH: f64 = 87.0;

/// Tangent of the sun's zenith projected onto the plane perpendicular to the rows.
pub fn solar_projection_tangent(solar_zenith: f64, solar_azimuth: f64, surface_azimuth: f64) -> f64 {
    (solar_azimuth - surface_azimuth).to_radians().cos() * solar_zenith.to_radians().tan()
}

/// Fraction of the ground between rows that receives direct beam.
pub fn unshaded_ground_fraction(
    surface_tilt: f64,
    surface_azimuth: f64,
    solar_zenith: f64,
    solar_azimuth: f64,
    gcr: f64,
) -> f64 {
    if solar_zenith > MAX_GROUND_ZENITH {
        return 0.0;
    }
    let tan_phi = solar_projection_tangent(solar_zenith, solar_azimuth, surface_azimuth);
    let (sin_t, cos_t) = surface_tilt.to_radians().sin_cos();
    1.0 - (gcr * (cos_t + sin_t * tan_phi).abs()).min(1.0)
}

/// Fraction of the row slant height shaded by the row in front.
///
/// `1` when the sun is behind the plane, `0` when the shadow is too short
/// to reach the next row.
pub fn shaded_fraction(
    solar_zenith: f64,
    solar_azimuth: f64,
    surface_tilt: f64,
    surface_azimuth: f64,
    gcr: f64,
) -> f64 {
    let tan_phi = solar_projection_tangent(solar_zenith, solar_azimuth, surface_azimuth);
    let (sin_t, cos_t) = surface_tilt.to_radians().sin_cos();
    // Shadow length behind a row as a fraction of the pitch
    let x = gcr * (sin_t * tan_phi + cos_t);
    if x <= 1.0 {
        0.0
    } else if aoi(surface_tilt, surface_azimuth, solar_zenith, solar_azimuth) >= 90.0 {
        1.0
    } else {
        1.0 - 1.0 / x
    }
}
