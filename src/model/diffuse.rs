//! Sky diffuse transposition models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::tracking::aoi_projection;

/// Lower bound on cos(zenith) in the Hay-Davies beam ratio, about 89°.
const MIN_COS_ZENITH: f64 = 0.01745;

/// Which sky diffuse model feeds the row-to-row view factors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkyDiffuseModel {
    /// Uniform sky dome.
    Isotropic,
    /// Isotropic dome plus a circumsolar disc weighted by the anisotropy index.
    #[default]
    Haydavies,
}

impl fmt::Display for SkyDiffuseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Isotropic => write!(f, "isotropic"),
            Self::Haydavies => write!(f, "haydavies"),
        }
    }
}

impl FromStr for SkyDiffuseModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "isotropic" => Ok(Self::Isotropic),
            "haydavies" => Ok(Self::Haydavies),
            other => Err(format!("unknown sky diffuse model \"{other}\"")),
        }
    }
}

/// Hay-Davies diffuse on a tilted plane, split into its two parts (W/m²).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HayDavies {
    pub isotropic: f64,
    pub circumsolar: f64,
}

impl HayDavies {
    pub fn total(&self) -> f64 {
        self.isotropic + self.circumsolar
    }
}

/// Isotropic sky diffuse on a plane tilted by `surface_tilt` degrees.
pub fn isotropic(surface_tilt: f64, dhi: f64) -> f64 {
    dhi * (1.0 + surface_tilt.to_radians().cos()) * 0.5
}

/// Hay & Davies (1980) sky diffuse.
///
/// # Arguments
///
/// * `surface_tilt`, `surface_azimuth` - Plane orientation (degrees)
/// * `dhi`, `dni` - Horizontal diffuse and normal beam irradiance (W/m²)
/// * `dni_extra` - Extraterrestrial normal irradiance (W/m²)
/// * `solar_zenith`, `solar_azimuth` - Sun position (degrees)
#[allow(clippy::too_many_arguments)]
pub fn haydavies(
    surface_tilt: f64,
    surface_azimuth: f64,
    dhi: f64,
    dni: f64,
    dni_extra: f64,
    solar_zenith: f64,
    solar_azimuth: f64,
) -> HayDavies {
    let cos_tt = aoi_projection(surface_tilt, surface_azimuth, solar_zenith, solar_azimuth).max(0.0);
    let cos_solar_zenith = solar_zenith.to_radians().cos();
    let rb = cos_tt / cos_solar_zenith.max(MIN_COS_ZENITH);

    let anisotropy_index = if dni_extra > 0.0 { dni / dni_extra } else { 0.0 };

    let circumsolar = (dhi * anisotropy_index * rb).max(0.0);
    let isotropic = (dhi * (1.0 - anisotropy_index) * (1.0 + surface_tilt.to_radians().cos()) * 0.5).max(0.0);

    HayDavies {
        isotropic,
        circumsolar,
    }
}
