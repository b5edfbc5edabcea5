//! Post-hoc daily summary computed from simulation samples.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::grid::DT_HOURS;
use super::types::Sample;

/// Aggregate figures for one simulated day.
///
/// Computed post-hoc from the sample vector so that reported totals always
/// match the series they summarise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    /// DC energy yield (kWh).
    pub energy_kwh: f64,
    /// Highest DC power (kW).
    pub peak_power_kw: f64,
    /// When the peak occurred; `None` if the array never produced.
    pub peak_time: Option<DateTime<Utc>>,
    /// Array nameplate (kWp).
    pub pdc0_kw: f64,
    /// Energy per installed kWp (kWh/kWp).
    pub specific_yield_kwh_per_kwp: f64,
    /// Above-panel horizontal insolation (kWh/m²).
    pub ghi_insolation_kwh_m2: f64,
    /// Ground-level insolation between rows (kWh/m²).
    pub crop_insolation_kwh_m2: f64,
    /// Crop insolation over above-panel insolation.
    pub crop_light_ratio: f64,
    /// Steps with the sun above the horizon.
    pub sunshine_minutes: usize,
}

impl DailySummary {
    /// Computes the summary from a complete sample vector.
    ///
    /// # Arguments
    ///
    /// * `samples` - One record per minute
    /// * `pdc0_w` - Array nameplate in watts
    pub fn from_samples(samples: &[Sample], pdc0_w: f64) -> Self {
        let mut energy_wh = 0.0_f64;
        let mut ghi_wh = 0.0_f64;
        let mut crop_wh = 0.0_f64;
        let mut peak: Option<&Sample> = None;
        let mut sunshine = 0_usize;

        for s in samples {
            energy_wh += s.power_dc_w * DT_HOURS;
            ghi_wh += s.ghi * DT_HOURS;
            crop_wh += s.crop_irradiance * DT_HOURS;

            if s.power_dc_w > 0.0 && peak.is_none_or(|p| s.power_dc_w > p.power_dc_w) {
                peak = Some(s);
            }
            if s.apparent_zenith < 90.0 {
                sunshine += 1;
            }
        }

        let energy_kwh = energy_wh / 1000.0;
        let pdc0_kw = pdc0_w / 1000.0;
        let ghi_insolation = ghi_wh / 1000.0;
        let crop_insolation = crop_wh / 1000.0;

        Self {
            energy_kwh,
            peak_power_kw: peak.map_or(0.0, Sample::power_dc_kw),
            peak_time: peak.map(|p| p.timestamp),
            pdc0_kw,
            specific_yield_kwh_per_kwp: if pdc0_kw > 0.0 {
                energy_kwh / pdc0_kw
            } else {
                0.0
            },
            ghi_insolation_kwh_m2: ghi_insolation,
            crop_insolation_kwh_m2: crop_insolation,
            crop_light_ratio: if ghi_insolation > 0.0 {
                crop_insolation / ghi_insolation
            } else {
                0.0
            },
            sunshine_minutes: sunshine,
        }
    }
}

impl fmt::Display for DailySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Daily Summary ---")?;
        writeln!(f, "DC energy:             {:.1} kWh", self.energy_kwh)?;
        match self.peak_time {
            Some(t) => writeln!(
                f,
                "Peak DC power:         {:.1} kW at {} UTC",
                self.peak_power_kw,
                t.format("%H:%M")
            )?,
            None => writeln!(f, "Peak DC power:         0.0 kW")?,
        }
        writeln!(
            f,
            "Specific yield:        {:.2} kWh/kWp ({:.1} kWp installed)",
            self.specific_yield_kwh_per_kwp, self.pdc0_kw
        )?;
        writeln!(f, "GHI insolation:        {:.2} kWh/m²", self.ghi_insolation_kwh_m2)?;
        writeln!(f, "Crop insolation:       {:.2} kWh/m²", self.crop_insolation_kwh_m2)?;
        writeln!(f, "Crop light ratio:      {:.1}%", self.crop_light_ratio * 100.0)?;
        write!(
            f,
            "Sun above horizon:     {}h {:02}m",
            self.sunshine_minutes / 60,
            self.sunshine_minutes % 60
        )
    }
}
