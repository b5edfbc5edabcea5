//! API response and query types.
//!
//! Series field names follow CSV schema v1 for consistency across export
//! formats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SiteConfig;
use crate::sim::summary::DailySummary;
use crate::sim::types::{Sample, Simulation};

/// Configuration, derived geometry and daily summary of the served run.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub config: SiteConfig,
    /// Ground coverage ratio.
    pub gcr: f64,
    pub summary: DailySummary,
    /// Number of samples available from `/series`.
    pub sample_count: usize,
}

/// One sample using CSV schema v1 field names.
#[derive(Debug, Serialize)]
pub struct SeriesRecord {
    pub timestep: usize,
    pub timestamp: DateTime<Utc>,
    pub apparent_zenith: f64,
    pub azimuth: f64,
    pub ghi: f64,
    pub dhi: f64,
    pub dni: f64,
    pub dni_extra: f64,
    pub tracker_theta: f64,
    pub surface_tilt: f64,
    pub surface_azimuth: f64,
    pub poa_front: f64,
    pub poa_back: f64,
    pub poa_global: f64,
    pub temp_cell: f64,
    /// DC power (kW).
    pub power_dc_kw: f64,
    pub crop_irradiance: f64,
}

impl From<&Sample> for SeriesRecord {
    fn from(s: &Sample) -> Self {
        Self {
            timestep: s.timestep,
            timestamp: s.timestamp,
            apparent_zenith: s.apparent_zenith,
            azimuth: s.azimuth,
            ghi: s.ghi,
            dhi: s.dhi,
            dni: s.dni,
            dni_extra: s.dni_extra,
            tracker_theta: s.tracker_theta,
            surface_tilt: s.surface_tilt,
            surface_azimuth: s.surface_azimuth,
            poa_front: s.poa_front,
            poa_back: s.poa_back,
            poa_global: s.poa_global,
            temp_cell: s.temp_cell,
            power_dc_kw: s.power_dc_kw(),
            crop_irradiance: s.crop_irradiance,
        }
    }
}

/// One plotted line: `(hour of day, value)` points.
#[derive(Debug, Serialize)]
pub struct ChartSeries {
    pub label: String,
    pub unit: String,
    pub points: Vec<[f64; 2]>,
}

impl ChartSeries {
    fn new(label: &str, unit: &str, sim: &Simulation, value: impl Fn(&Sample) -> f64) -> Self {
        Self {
            label: label.to_string(),
            unit: unit.to_string(),
            points: sim
                .samples
                .iter()
                .map(|s| [sim.grid.hour_of_day(s.timestep), value(s)])
                .collect(),
        }
    }
}

/// The two dashboard charts.
#[derive(Debug, Serialize)]
pub struct ChartsResponse {
    /// DC power (kW).
    pub power: ChartSeries,
    /// Above-panel GHI and crop-level irradiance (W/m²).
    pub irradiance: [ChartSeries; 2],
}

impl From<&Simulation> for ChartsResponse {
    fn from(sim: &Simulation) -> Self {
        Self {
            power: ChartSeries::new("DC Power", "kW", sim, Sample::power_dc_kw),
            irradiance: [
                ChartSeries::new("Above-panel GHI", "W/m²", sim, |s| s.ghi),
                ChartSeries::new("Crop-level Irradiance", "W/m²", sim, |s| s.crop_irradiance),
            ],
        }
    }
}

/// Optional range query parameters for the series endpoint.
#[derive(Debug, Deserialize)]
pub struct SeriesQuery {
    /// Start timestep (inclusive).
    pub from: Option<usize>,
    /// End timestep (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn series_record_reports_kilowatts() {
        let sample = Sample {
            timestep: 600,
            timestamp: Utc
                .with_ymd_and_hms(2020, 6, 28, 10, 0, 0)
                .single()
                .unwrap_or_default(),
            apparent_zenith: 34.0,
            azimuth: 160.0,
            ghi: 820.0,
            dhi: 105.0,
            dni: 860.0,
            dni_extra: 1321.0,
            tracker_theta: 10.0,
            surface_tilt: 10.0,
            surface_azimuth: 90.0,
            poa_front: 860.0,
            poa_back: 85.0,
            poa_global: 918.3,
            temp_cell: 46.8,
            power_dc_w: 840_000.0,
            crop_irradiance: 590.0,
        };
        let record = SeriesRecord::from(&sample);
        assert_eq!(record.timestep, 600);
        assert_eq!(record.power_dc_kw, 840.0);
        assert_eq!(record.crop_irradiance, 590.0);
        assert_eq!(record.timestamp, sample.timestamp);
    }
}
