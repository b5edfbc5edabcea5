//! Core simulation records: per-step samples and the complete run.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::grid::TimeGrid;
use super::summary::DailySummary;
use crate::config::SiteConfig;

/// Complete record of one simulation timestep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    /// Timestep index, 0..1440.
    pub timestep: usize,
    /// UTC instant.
    pub timestamp: DateTime<Utc>,
    /// Refraction-corrected solar zenith (degrees).
    pub apparent_zenith: f64,
    /// Solar azimuth, clockwise from north (degrees).
    pub azimuth: f64,
    /// Clear-sky global horizontal irradiance (W/m²).
    pub ghi: f64,
    /// Clear-sky diffuse horizontal irradiance (W/m²).
    pub dhi: f64,
    /// Clear-sky direct normal irradiance (W/m²).
    pub dni: f64,
    /// Extraterrestrial normal irradiance (W/m²).
    pub dni_extra: f64,
    /// Signed tracker rotation (degrees).
    pub tracker_theta: f64,
    pub surface_tilt: f64,
    pub surface_azimuth: f64,
    /// Front-face plane-of-array irradiance (W/m²).
    pub poa_front: f64,
    /// Rear-face plane-of-array irradiance (W/m²).
    pub poa_back: f64,
    /// Effective irradiance for power conversion (W/m²).
    pub poa_global: f64,
    /// Cell temperature (°C).
    pub temp_cell: f64,
    /// DC array output (W, >= 0).
    pub power_dc_w: f64,
    /// Irradiance on the ground between rows (W/m²).
    pub crop_irradiance: f64,
}

impl Sample {
    pub fn power_dc_kw(&self) -> f64 {
        self.power_dc_w / 1000.0
    }

    /// Named numeric fields, in output order.
    pub fn quantities(&self) -> [(&'static str, f64); 15] {
        [
            ("apparent_zenith", self.apparent_zenith),
            ("azimuth", self.azimuth),
            ("ghi", self.ghi),
            ("dhi", self.dhi),
            ("dni", self.dni),
            ("dni_extra", self.dni_extra),
            ("tracker_theta", self.tracker_theta),
            ("surface_tilt", self.surface_tilt),
            ("surface_azimuth", self.surface_azimuth),
            ("poa_front", self.poa_front),
            ("poa_back", self.poa_back),
            ("poa_global", self.poa_global),
            ("temp_cell", self.temp_cell),
            ("power_dc", self.power_dc_w),
            ("crop_irradiance", self.crop_irradiance),
        ]
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | zen={:>6.2}° az={:>6.2}° | ghi={:>6.1} dni={:>6.1} dhi={:>5.1} W/m² | \
             tilt={:>5.1}° | poa={:>6.1} (front={:.1} back={:.1}) | \
             cell={:>5.1}°C | P={:>8.2} kW | crop={:>6.1} W/m²",
            self.timestamp.format("%H:%M"),
            self.apparent_zenith,
            self.azimuth,
            self.ghi,
            self.dni,
            self.dhi,
            self.surface_tilt,
            self.poa_global,
            self.poa_front,
            self.poa_back,
            self.temp_cell,
            self.power_dc_kw(),
            self.crop_irradiance,
        )
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    /// Configuration the run was computed from.
    pub config: SiteConfig,
    pub grid: TimeGrid,
    /// Ground coverage ratio used throughout the run.
    pub gcr: f64,
    /// One record per grid step.
    pub samples: Vec<Sample>,
    pub summary: DailySummary,
}

impl Simulation {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// DC power series in kW.
    pub fn power_kw(&self) -> Vec<f64> {
        self.samples.iter().map(Sample::power_dc_kw).collect()
    }

    /// Above-panel GHI series (W/m²).
    pub fn ghi(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.ghi).collect()
    }

    /// Crop-level irradiance series (W/m²).
    pub fn crop_irradiance(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.crop_irradiance).collect()
    }

    /// Samples on the hour, for compact console output.
    pub fn hourly(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter().step_by(60)
    }
}
