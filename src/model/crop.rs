//! Irradiance reaching crops on the ground between rows.
//!
//! Beam light reaches the unshaded strip of ground and diffuse light arrives
//! through the gaps between rows. Light reflected off the ground and back
//! down from the underside of the modules is not counted.

use super::shading::unshaded_ground_fraction;
use super::view_factors::vf_ground_sky_2d_integ;

/// Rows considered on each side when integrating the ground's sky view.
pub const CROP_MAX_ROWS: usize = 10;

/// Array and sampling parameters for the crop estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropModel {
    pub gcr: f64,
    pub height: f64,
    pub pitch: f64,
    pub max_rows: usize,
    pub npoints: usize,
}

/// Ground-level light for one timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropEstimate {
    /// Fraction of the interrow ground in direct sun.
    pub unshaded_fraction: f64,
    /// Sky view factor averaged over the interrow ground.
    pub vf_ground_sky: f64,
    /// Irradiance on the ground (W/m²).
    pub irradiance: f64,
}

impl CropModel {
    pub fn new(gcr: f64, height: f64, pitch: f64, npoints: usize) -> Self {
        Self {
            gcr,
            height,
            pitch,
            max_rows: CROP_MAX_ROWS,
            npoints,
        }
    }

    /// Estimates ground-level irradiance under the given row orientation.
    ///
    /// # Arguments
    ///
    /// * `surface_tilt`, `surface_azimuth` - Row orientation (degrees)
    /// * `apparent_zenith`, `solar_azimuth` - Sun position (degrees)
    /// * `dni`, `dhi` - Beam normal and diffuse horizontal irradiance (W/m²)
    pub fn estimate(
        &self,
        surface_tilt: f64,
        surface_azimuth: f64,
        apparent_zenith: f64,
        solar_azimuth: f64,
        dni: f64,
        dhi: f64,
    ) -> CropEstimate {
        let vf_ground_sky = vf_ground_sky_2d_integ(
            surface_tilt,
            self.gcr,
            self.height,
            self.pitch,
            self.max_rows,
            self.npoints,
        );
        let unshaded_fraction = unshaded_ground_fraction(
            surface_tilt,
            surface_azimuth,
            apparent_zenith,
            solar_azimuth,
            self.gcr,
        );
        let cos_zenith = apparent_zenith.to_radians().cos().max(0.0);
        let irradiance = unshaded_fraction * dni * cos_zenith + vf_ground_sky * dhi;

        CropEstimate {
            unshaded_fraction,
            vf_ground_sky,
            irradiance: irradiance.max(0.0),
        }
    }
}
