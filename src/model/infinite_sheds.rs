//! Front and rear plane-of-array irradiance for rows of bifacial modules.
//!
//! Rows are modelled as infinitely long and evenly spaced, so every row sees
//! the same sky, ground and neighbours and the problem reduces to 2D view
//! factors in the plane perpendicular to the row axis.

use serde::Serialize;
use tracing::debug;

use super::diffuse::{SkyDiffuseModel, haydavies};
use super::shading::{shaded_fraction, unshaded_ground_fraction};
use super::tracking::aoi_projection;
use super::view_factors::{
    max_rows_for, vf_ground_sky_2d_integ, vf_row_ground_2d_integ, vf_row_sky_2d_integ,
};

/// GHI below which the diffuse fraction is taken as zero (W/m²).
const MIN_GHI_FOR_DIFFUSE_FRACTION: f64 = 1e-4;

/// Everything an [`IrradianceModel`] needs for one timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BifacialInput {
    /// Front-face tilt from horizontal (degrees).
    pub surface_tilt: f64,
    /// Front-face azimuth, clockwise from north (degrees).
    pub surface_azimuth: f64,
    /// Apparent solar zenith (degrees).
    pub solar_zenith: f64,
    pub solar_azimuth: f64,
    pub gcr: f64,
    /// Height of the row centre above ground (m).
    pub height: f64,
    /// Row spacing (m).
    pub pitch: f64,
    pub ghi: f64,
    pub dhi: f64,
    pub dni: f64,
    /// Ground reflectance, 0..=1.
    pub albedo: f64,
    /// Extraterrestrial normal irradiance (W/m²).
    pub dni_extra: f64,
    /// Rear-side response relative to the front.
    pub bifaciality: f64,
}

/// Irradiance components on one face of a row (W/m²).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SideIrradiance {
    pub poa_global: f64,
    pub poa_direct: f64,
    pub poa_diffuse: f64,
    pub poa_sky_diffuse: f64,
    pub poa_ground_diffuse: f64,
}

/// Plane-of-array irradiance on both faces (W/m²).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BifacialIrradiance {
    /// Front plus bifaciality-weighted rear.
    pub poa_global: f64,
    pub poa_front: f64,
    pub poa_back: f64,
    pub front: SideIrradiance,
    pub back: SideIrradiance,
}

/// Transposes horizontal irradiance onto both faces of a row.
pub trait IrradianceModel {
    fn irradiance(&self, input: &BifacialInput) -> BifacialIrradiance;
}

/// Infinite-sheds bifacial model.
#[derive(Debug, Clone, PartialEq)]
pub struct InfiniteSheds {
    pub sky_diffuse: SkyDiffuseModel,
    /// Trapezoid points for the ground-to-sky view factor.
    pub npoints: usize,
    /// Relative rear-side loss from racking and other obstructions.
    pub shade_factor: f64,
    /// Relative rear-side gain from light passing between cells.
    pub transmission_factor: f64,
    /// Incidence angle modifier applied to the unshaded beam.
    pub iam: f64,
}

impl Default for InfiniteSheds {
    fn default() -> Self {
        Self {
            sky_diffuse: SkyDiffuseModel::Haydavies,
            npoints: 100,
            shade_factor: -0.02,
            transmission_factor: 0.0,
            iam: 1.0,
        }
    }
}

impl InfiniteSheds {
    /// Irradiance on a single face with the given orientation.
    fn side(&self, input: &BifacialInput, surface_tilt: f64, surface_azimuth: f64) -> SideIrradiance {
        let (mut dhi, mut dni) = (input.dhi, input.dni);

        if self.sky_diffuse == SkyDiffuseModel::Haydavies {
            // Move circumsolar light from the diffuse to the beam component
            let horizontal = haydavies(
                0.0,
                180.0,
                input.dhi,
                input.dni,
                input.dni_extra,
                input.solar_zenith,
                input.solar_azimuth,
            );
            let normal = haydavies(
                input.solar_zenith,
                input.solar_azimuth,
                input.dhi,
                input.dni,
                input.dni_extra,
                input.solar_zenith,
                input.solar_azimuth,
            );
            dhi -= horizontal.circumsolar;
            dni += normal.circumsolar;
        }

        let max_rows = max_rows_for(input.height, input.pitch);
        let f_gnd_beam = unshaded_ground_fraction(
            surface_tilt,
            surface_azimuth,
            input.solar_zenith,
            input.solar_azimuth,
            input.gcr,
        );
        let vf_gnd_sky = vf_ground_sky_2d_integ(
            surface_tilt,
            input.gcr,
            input.height,
            input.pitch,
            max_rows,
            self.npoints,
        );
        let f_x = shaded_fraction(
            input.solar_zenith,
            input.solar_azimuth,
            surface_tilt,
            surface_azimuth,
            input.gcr,
        );

        let poa_sky_diffuse = dhi * vf_row_sky_2d_integ(surface_tilt, input.gcr, 0.0, 1.0);

        let diffuse_fraction = if input.ghi < MIN_GHI_FOR_DIFFUSE_FRACTION {
            0.0
        } else {
            (dhi / input.ghi).clamp(0.0, 1.0)
        };
        let ground_diffuse = input.ghi
            * input.albedo
            * ((1.0 - diffuse_fraction) * f_gnd_beam + diffuse_fraction * vf_gnd_sky);
        let poa_ground_diffuse =
            ground_diffuse * vf_row_ground_2d_integ(surface_tilt, input.gcr, 0.0, 1.0);

        let cos_aoi = aoi_projection(
            surface_tilt,
            surface_azimuth,
            input.solar_zenith,
            input.solar_azimuth,
        );
        let poa_beam = (dni * cos_aoi).max(0.0);
        let poa_direct = poa_beam * (1.0 - f_x) * self.iam;

        let poa_diffuse = poa_sky_diffuse + poa_ground_diffuse;
        SideIrradiance {
            poa_global: poa_direct + poa_diffuse,
            poa_direct,
            poa_diffuse,
            poa_sky_diffuse,
            poa_ground_diffuse,
        }
    }
}

impl IrradianceModel for InfiniteSheds {
    fn irradiance(&self, input: &BifacialInput) -> BifacialIrradiance {
        let front = self.side(input, input.surface_tilt, input.surface_azimuth);

        // Rear face is the front flipped over
        let back_tilt = 180.0 - input.surface_tilt;
        let back_azimuth = (input.surface_azimuth + 180.0).rem_euclid(360.0);
        let back = self.side(input, back_tilt, back_azimuth);

        let effects = (1.0 + self.shade_factor) * (1.0 + self.transmission_factor);
        let poa_global = front.poa_global + back.poa_global * input.bifaciality * effects;

        debug!(
            tilt = input.surface_tilt,
            front = front.poa_global,
            back = back.poa_global,
            "infinite sheds"
        );

        BifacialIrradiance {
            poa_global,
            poa_front: front.poa_global,
            poa_back: back.poa_global,
            front,
            back,
        }
    }
}
