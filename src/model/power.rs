//! Cell temperature and DC power.

/// Faiman heat-loss coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaimanParams {
    /// Constant heat transfer (W/m²K).
    pub u0: f64,
    /// Wind-dependent heat transfer (W·s/m³K).
    pub u1: f64,
}

impl Default for FaimanParams {
    fn default() -> Self {
        Self { u0: 25.0, u1: 6.84 }
    }
}

/// Faiman (2008) cell temperature in °C.
pub fn faiman(poa_global: f64, temp_air: f64, wind_speed: f64, params: FaimanParams) -> f64 {
    temp_air + poa_global / (params.u0 + params.u1 * wind_speed)
}

/// PVWatts DC power in watts, never negative.
///
/// # Arguments
///
/// * `effective_irradiance` - Irradiance converted to power (W/m²)
/// * `temp_cell` - Cell temperature (°C)
/// * `pdc0` - Array nameplate at 1000 W/m² and 25 °C (W)
/// * `gamma_pdc` - Power temperature coefficient (1/°C)
pub fn pvwatts_dc(effective_irradiance: f64, temp_cell: f64, pdc0: f64, gamma_pdc: f64) -> f64 {
    let p = effective_irradiance * 0.001 * pdc0 * (1.0 + gamma_pdc * (temp_cell - 25.0));
    p.max(0.0)
}

/// Thermal and electrical conversion for one array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerModel {
    /// Nameplate DC rating of the whole array (W).
    pub pdc0: f64,
    pub gamma_pdc: f64,
    pub temp_air: f64,
    pub wind_speed: f64,
    pub faiman: FaimanParams,
}

/// Cell temperature and power for one timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerOutput {
    pub temp_cell: f64,
    pub power_dc_w: f64,
}

impl PowerModel {
    pub fn convert(&self, poa_global: f64) -> PowerOutput {
        let temp_cell = faiman(poa_global, self.temp_air, self.wind_speed, self.faiman);
        PowerOutput {
            temp_cell,
            power_dc_w: pvwatts_dc(poa_global, temp_cell, self.pdc0, self.gamma_pdc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn model() -> PowerModel {
        PowerModel {
            pdc0: 1512.0 * 660.0,
            gamma_pdc: -0.004,
            temp_air: 18.0,
            wind_speed: 1.0,
            faiman: FaimanParams::default(),
        }
    }

    #[test]
    fn faiman_heats_with_irradiance() {
        assert_eq!(faiman(0.0, 18.0, 1.0, FaimanParams::default()), 18.0);
        // 1000 / (25 + 6.84) ≈ 31.4 K above ambient
        assert_relative_eq!(
            faiman(1000.0, 18.0, 1.0, FaimanParams::default()),
            18.0 + 1000.0 / 31.84,
            epsilon = 1e-9
        );
        assert!(faiman(800.0, 18.0, 5.0, FaimanParams::default()) < faiman(800.0, 18.0, 1.0, FaimanParams::default()));
    }

    #[test]
    fn stc_gives_nameplate() {
        assert_relative_eq!(pvwatts_dc(1000.0, 25.0, 5000.0, -0.004), 5000.0);
    }

    #[test]
    fn hot_cells_lose_power() {
        let p = pvwatts_dc(1000.0, 50.0, 5000.0, -0.004);
        assert_relative_eq!(p, 5000.0 * 0.9, epsilon = 1e-9);
    }

    #[test]
    fn dark_is_zero() {
        let out = model().convert(0.0);
        assert_eq!(out.power_dc_w, 0.0);
        assert_eq!(out.temp_cell, 18.0);
    }

    #[test]
    fn power_clamped_non_negative() {
        // Absurd temperature drives the derate below zero
        assert_eq!(pvwatts_dc(500.0, 400.0, 5000.0, -0.004), 0.0);
    }

    #[test]
    fn doubling_pdc0_doubles_power() {
        let single = model();
        let double = PowerModel {
            pdc0: single.pdc0 * 2.0,
            ..single
        };
        for poa in [0.0, 120.0, 640.5, 1010.0] {
            assert_eq!(double.convert(poa).power_dc_w, 2.0 * single.convert(poa).power_dc_w);
        }
    }
}
