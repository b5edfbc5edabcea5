//! Clear-sky irradiance: Ineichen/Perez model, Kasten-Young air mass and
//! Spencer extraterrestrial radiation.

use serde::{Deserialize, Serialize};

/// Solar constant used by the Spencer series (W/m²).
pub const SOLAR_CONSTANT: f64 = 1366.1;

/// Horizontal-plane clear-sky irradiance (W/m²).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ClearSky {
    /// Global horizontal irradiance.
    pub ghi: f64,
    /// Diffuse horizontal irradiance.
    pub dhi: f64,
    /// Direct normal irradiance.
    pub dni: f64,
}

/// Atmospheric turbidity for the Ineichen model.
///
/// Either a single value for the whole year or twelve monthly values that
/// are interpolated linearly between mid-month anchors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkeTurbidity {
    /// One value applied every day.
    Constant(f64),
    /// January..December values.
    Monthly([f64; 12]),
}

impl Default for LinkeTurbidity {
    fn default() -> Self {
        Self::Constant(3.0)
    }
}

const DAYS_IN_MONTH: [f64; 12] = [
    31.0, 28.0, 31.0, 30.0, 31.0, 30.0, 31.0, 31.0, 30.0, 31.0, 30.0, 31.0,
];

impl LinkeTurbidity {
    /// Turbidity for a 1-based day of year.
    pub fn at(&self, day_of_year: u32) -> f64 {
        match self {
            Self::Constant(tl) => *tl,
            Self::Monthly(values) => {
                let mut mids = [0.0_f64; 12];
                let mut start = 0.0;
                for (i, days) in DAYS_IN_MONTH.iter().enumerate() {
                    mids[i] = start + days / 2.0;
                    start += days;
                }
                let doy = (f64::from(day_of_year) - 0.5).clamp(0.0, 365.0);

                // Anchor pairs wrap December -> January across the year end
                let (i0, i1, x0, x1) = if doy < mids[0] {
                    (11, 0, mids[11] - 365.0, mids[0])
                } else if doy >= mids[11] {
                    (11, 0, mids[11], mids[0] + 365.0)
                } else {
                    let i = mids.iter().rposition(|&m| m <= doy).unwrap_or(0);
                    (i, i + 1, mids[i], mids[i + 1])
                };
                let w = (doy - x0) / (x1 - x0);
                values[i0] + w * (values[i1] - values[i0])
            }
        }
    }
}

/// Extraterrestrial normal irradiance for a 1-based day of year (Spencer 1971).
pub fn extra_radiation(day_of_year: u32) -> f64 {
    let b = 2.0 * std::f64::consts::PI * f64::from(day_of_year.saturating_sub(1)) / 365.0;
    let r_over_r0_sq = 1.00011
        + 0.034221 * b.cos()
        + 0.00128 * b.sin()
        + 0.000719 * (2.0 * b).cos()
        + 0.000077 * (2.0 * b).sin();
    SOLAR_CONSTANT * r_over_r0_sq
}

/// Standard-atmosphere surface pressure (Pa) for an altitude in metres.
pub fn alt2pres(altitude: f64) -> f64 {
    100.0 * ((44331.514 - altitude) / 11880.516).powf(1.0 / 0.1902632)
}

/// Kasten & Young (1989) relative air mass; `None` with the sun below the horizon.
pub fn relative_airmass(apparent_zenith: f64) -> Option<f64> {
    if apparent_zenith > 90.0 {
        return None;
    }
    let am = 1.0
        / (apparent_zenith.to_radians().cos()
            + 0.50572 * (6.07995 + (90.0 - apparent_zenith)).powf(-1.6364));
    Some(am)
}

/// Pressure-corrected air mass.
pub fn absolute_airmass(relative: f64, pressure_pa: f64) -> f64 {
    relative * pressure_pa / 101_325.0
}

/// Ineichen/Perez clear-sky irradiance.
///
/// # Arguments
///
/// * `apparent_zenith` - Refraction-corrected zenith (degrees)
/// * `airmass_absolute` - Pressure-corrected air mass, `None` at night
/// * `linke_turbidity` - Linke turbidity factor
/// * `altitude` - Site altitude (m)
/// * `dni_extra` - Extraterrestrial normal irradiance (W/m²)
pub fn ineichen(
    apparent_zenith: f64,
    airmass_absolute: Option<f64>,
    linke_turbidity: f64,
    altitude: f64,
    dni_extra: f64,
) -> ClearSky {
    let cos_zenith = apparent_zenith.to_radians().cos().max(0.0);
    let Some(am) = airmass_absolute else {
        return ClearSky::default();
    };
    if cos_zenith <= 0.0 {
        return ClearSky::default();
    }

    let tl = linke_turbidity;
    let fh1 = (-altitude / 8000.0).exp();
    let fh2 = (-altitude / 1250.0).exp();
    let cg1 = 5.09e-5 * altitude + 0.868;
    let cg2 = 3.92e-5 * altitude + 0.0387;

    let ghi = cg1 * dni_extra * cos_zenith * (-cg2 * am * (fh1 + fh2 * (tl - 1.0))).exp().max(0.0);

    let b = 0.664 + 0.163 / fh1;
    let bnci = dni_extra * (b * (-0.09 * am * (tl - 1.0)).exp()).max(0.0);

    // Empirical correction keeping DNI consistent with GHI at low sun
    let bnci_2 = (1.0 - (0.1 - 0.2 * (-tl).exp()) / (0.1 + 0.882 / fh1)) / cos_zenith;
    let bnci_2 = ghi * bnci_2.clamp(0.0, 1e20);

    let dni = bnci.min(bnci_2);
    let dhi = ghi - dni * cos_zenith;

    ClearSky {
        ghi: ghi.max(0.0),
        dhi: dhi.max(0.0),
        dni: dni.max(0.0),
    }
}
