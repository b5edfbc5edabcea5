//! Parameter state and simulation reruns for the TUI.

use chrono::TimeDelta;
use tracing::debug;

use crate::config::SiteConfig;
use crate::sim::engine::simulate;
use crate::sim::types::Simulation;

/// An editable parameter shown in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    Date,
    Latitude,
    Longitude,
    Height,
    Pitch,
    RowWidth,
    AxisAzimuth,
    MaxAngle,
    Backtrack,
    Albedo,
    Bifaciality,
    TempAir,
    WindSpeed,
    Modules,
    ModuleRating,
    GammaPdc,
}

/// Sidebar order.
pub const PARAMS: [Param; 16] = [
    Param::Date,
    Param::Latitude,
    Param::Longitude,
    Param::Height,
    Param::Pitch,
    Param::RowWidth,
    Param::AxisAzimuth,
    Param::MaxAngle,
    Param::Backtrack,
    Param::Albedo,
    Param::Bifaciality,
    Param::TempAir,
    Param::WindSpeed,
    Param::Modules,
    Param::ModuleRating,
    Param::GammaPdc,
];

impl Param {
    pub fn label(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Latitude => "Latitude (°)",
            Self::Longitude => "Longitude (°)",
            Self::Height => "Height (m)",
            Self::Pitch => "Pitch (m)",
            Self::RowWidth => "Row width (m)",
            Self::AxisAzimuth => "Axis az. (°)",
            Self::MaxAngle => "Max angle (°)",
            Self::Backtrack => "Backtrack",
            Self::Albedo => "Albedo",
            Self::Bifaciality => "Bifaciality",
            Self::TempAir => "Air temp (°C)",
            Self::WindSpeed => "Wind (m/s)",
            Self::Modules => "Modules",
            Self::ModuleRating => "Module (W)",
            Self::GammaPdc => "Gamma (1/°C)",
        }
    }

    /// Current value formatted for display.
    pub fn display(self, cfg: &SiteConfig) -> String {
        match self {
            Self::Date => cfg.site.date.format("%Y-%m-%d").to_string(),
            Self::Latitude => format!("{:.1}", cfg.site.latitude),
            Self::Longitude => format!("{:.1}", cfg.site.longitude),
            Self::Height => format!("{:.1}", cfg.array.height),
            Self::Pitch => format!("{:.1}", cfg.array.pitch),
            Self::RowWidth => format!("{:.2}", cfg.array.row_width),
            Self::AxisAzimuth => format!("{:.0}", cfg.array.axis_azimuth),
            Self::MaxAngle => format!("{:.0}", cfg.array.max_angle),
            Self::Backtrack => (if cfg.array.backtrack { "on" } else { "off" }).to_string(),
            Self::Albedo => format!("{:.2}", cfg.environment.albedo),
            Self::Bifaciality => format!("{:.2}", cfg.module.bifaciality),
            Self::TempAir => format!("{:.0}", cfg.environment.temp_air),
            Self::WindSpeed => format!("{:.1}", cfg.environment.wind_speed),
            Self::Modules => cfg.module.n_modules.to_string(),
            Self::ModuleRating => format!("{:.0}", cfg.module.pdc0_per_module),
            Self::GammaPdc => format!("{:.4}", cfg.module.gamma_pdc),
        }
    }

    /// Moves the value one step up (`up = true`) or down, staying inside
    /// the range that passes validation.
    pub fn adjust(self, cfg: &mut SiteConfig, up: bool) {
        let sign = if up { 1.0 } else { -1.0 };
        match self {
            Self::Date => {
                let days = if up { 1 } else { -1 };
                if let Some(date) = cfg.site.date.checked_add_signed(TimeDelta::days(days)) {
                    cfg.site.date = date;
                }
            }
            Self::Latitude => {
                cfg.site.latitude = (cfg.site.latitude + sign).clamp(-89.0, 89.0);
            }
            Self::Longitude => {
                cfg.site.longitude = (cfg.site.longitude + sign).clamp(-180.0, 180.0);
            }
            Self::Height => {
                cfg.array.height = (cfg.array.height + 0.1 * sign).clamp(0.5, 10.0);
            }
            Self::Pitch => {
                // Keep gcr <= 1
                let min = cfg.array.row_width.max(1.0);
                cfg.array.pitch = (cfg.array.pitch + 0.5 * sign).clamp(min, min.max(50.0));
            }
            Self::RowWidth => {
                let max = cfg.array.pitch.max(0.5);
                cfg.array.row_width = (cfg.array.row_width + 0.1 * sign).clamp(0.5, max);
            }
            Self::AxisAzimuth => {
                let azimuth = (cfg.array.axis_azimuth + 5.0 * sign).rem_euclid(360.0);
                // rem_euclid can round up to exactly 360
                cfg.array.axis_azimuth = if azimuth >= 360.0 { 0.0 } else { azimuth };
            }
            Self::MaxAngle => {
                cfg.array.max_angle = (cfg.array.max_angle + 5.0 * sign).clamp(0.0, 90.0);
            }
            Self::Backtrack => cfg.array.backtrack = !cfg.array.backtrack,
            Self::Albedo => {
                cfg.environment.albedo = (cfg.environment.albedo + 0.05 * sign).clamp(0.0, 1.0);
            }
            Self::Bifaciality => {
                cfg.module.bifaciality = (cfg.module.bifaciality + 0.05 * sign).clamp(0.0, 1.0);
            }
            Self::TempAir => {
                cfg.environment.temp_air = (cfg.environment.temp_air + sign).clamp(-40.0, 50.0);
            }
            Self::WindSpeed => {
                cfg.environment.wind_speed =
                    (cfg.environment.wind_speed + 0.5 * sign).clamp(0.0, 30.0);
            }
            Self::Modules => {
                cfg.module.n_modules = if up {
                    cfg.module.n_modules.saturating_add(100)
                } else {
                    cfg.module.n_modules.saturating_sub(100).max(1)
                };
            }
            Self::ModuleRating => {
                cfg.module.pdc0_per_module = (cfg.module.pdc0_per_module + 10.0 * sign).max(1.0);
            }
            Self::GammaPdc => {
                cfg.module.gamma_pdc = (cfg.module.gamma_pdc + 0.0005 * sign).clamp(-0.02, 0.02);
            }
        }
    }
}

/// TUI application state.
pub struct App {
    /// Parameters currently being edited.
    pub config: SiteConfig,
    /// Parameters restored by [`App::reset`].
    initial: SiteConfig,
    /// Name of the active preset.
    pub preset_name: String,
    /// Index into [`PARAMS`] of the highlighted parameter.
    pub selected: usize,
    /// Result of the last run, if it succeeded.
    pub simulation: Option<Simulation>,
    /// Error message from the last run, if it failed.
    pub error: Option<String>,
    /// Whether the user has requested quit.
    pub quit: bool,
}

impl App {
    /// Creates a new app from a preset name, falling back to the baseline.
    pub fn new(preset: &str) -> Self {
        let (config, name) = match SiteConfig::from_preset(preset) {
            Ok(cfg) => (cfg, preset),
            Err(_) => (SiteConfig::baseline(), "baseline"),
        };
        Self::with_config(config, name)
    }

    /// Creates a new app from an explicit configuration.
    pub fn with_config(config: SiteConfig, name: &str) -> Self {
        let mut app = Self {
            initial: config.clone(),
            config,
            preset_name: name.to_string(),
            selected: 0,
            simulation: None,
            error: None,
            quit: false,
        };
        app.rerun();
        app
    }

    /// Runs the pipeline for the current parameters.
    pub fn rerun(&mut self) {
        match simulate(&self.config) {
            Ok(sim) => {
                debug!(energy_kwh = sim.summary.energy_kwh, "tui rerun");
                self.simulation = Some(sim);
                self.error = None;
            }
            Err(e) => {
                self.simulation = None;
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn selected_param(&self) -> Param {
        PARAMS[self.selected]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % PARAMS.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + PARAMS.len() - 1) % PARAMS.len();
    }

    /// Adjusts the highlighted parameter and reruns.
    pub fn adjust(&mut self, up: bool) {
        self.selected_param().adjust(&mut self.config, up);
        self.rerun();
    }

    /// Switches to a different preset, discarding edits.
    pub fn switch_preset(&mut self, name: &str) {
        let Ok(config) = SiteConfig::from_preset(name) else {
            return;
        };
        self.initial = config.clone();
        self.config = config;
        self.preset_name = name.to_string();
        self.rerun();
    }

    /// Restores the parameters the active preset or file started with.
    pub fn reset(&mut self) {
        self.config = self.initial.clone();
        self.rerun();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_runs_on_creation() {
        let app = App::new("baseline");
        assert!(app.error.is_none());
        assert_eq!(app.simulation.as_ref().map(Simulation::len), Some(1440));
    }

    #[test]
    fn unknown_preset_falls_back_to_baseline() {
        let app = App::new("nope");
        assert_eq!(app.preset_name, "baseline");
        assert_eq!(app.config, SiteConfig::baseline());
    }

    #[test]
    fn selection_wraps() {
        let mut app = App::new("baseline");
        app.select_prev();
        assert_eq!(app.selected, PARAMS.len() - 1);
        app.select_next();
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn adjust_reruns_with_new_value() {
        let mut app = App::new("baseline");
        app.selected = PARAMS
            .iter()
            .position(|p| *p == Param::Modules)
            .unwrap_or_default();
        let before = app.simulation.as_ref().map(|s| s.summary.energy_kwh);
        app.adjust(true);
        assert_eq!(app.config.module.n_modules, 1612);
        let after = app.simulation.as_ref().map(|s| s.summary.energy_kwh);
        assert!(after > before);
    }

    #[test]
    fn adjust_keeps_config_valid() {
        let mut cfg = SiteConfig::baseline();
        for p in PARAMS {
            for _ in 0..200 {
                p.adjust(&mut cfg, true);
            }
            assert!(cfg.validate().is_empty(), "{p:?} up: {:?}", cfg.validate());
            for _ in 0..400 {
                p.adjust(&mut cfg, false);
            }
            assert!(cfg.validate().is_empty(), "{p:?} down: {:?}", cfg.validate());
        }
        assert_eq!(cfg.site.longitude, -180.0);
        assert!((0.0..360.0).contains(&cfg.array.axis_azimuth));
        assert_eq!(cfg.module.pdc0_per_module, 1.0);
        assert_eq!(cfg.module.gamma_pdc, -0.02);
    }

    #[test]
    fn reset_restores_custom_start() {
        let mut cfg = SiteConfig::baseline();
        cfg.array.height = 4.0;
        let mut app = App::with_config(cfg.clone(), "custom");
        app.selected = PARAMS
            .iter()
            .position(|p| *p == Param::Height)
            .unwrap_or_default();
        app.adjust(false);
        assert_ne!(app.config, cfg);
        app.reset();
        assert_eq!(app.config, cfg);
    }

    #[test]
    fn date_steps_by_day() {
        let mut cfg = SiteConfig::baseline();
        Param::Date.adjust(&mut cfg, true);
        assert_eq!(Param::Date.display(&cfg), "2020-06-29");
    }

    #[test]
    fn axis_azimuth_wraps_around_north() {
        let mut cfg = SiteConfig::baseline();
        Param::AxisAzimuth.adjust(&mut cfg, false);
        assert_eq!(Param::AxisAzimuth.display(&cfg), "355");
        Param::AxisAzimuth.adjust(&mut cfg, true);
        assert_eq!(cfg.array.axis_azimuth, 0.0);
        for _ in 0..72 {
            Param::AxisAzimuth.adjust(&mut cfg, true);
            assert!((0.0..360.0).contains(&cfg.array.axis_azimuth));
        }
        assert_eq!(cfg.array.axis_azimuth, 0.0);
    }

    #[test]
    fn module_parameters_reach_the_run() {
        let mut app = App::new("baseline");
        let before = app.simulation.as_ref().map(|s| s.summary.pdc0_kw);
        app.selected = PARAMS
            .iter()
            .position(|p| *p == Param::ModuleRating)
            .unwrap_or_default();
        app.adjust(true);
        assert_eq!(app.config.module.pdc0_per_module, 670.0);
        let after = app.simulation.as_ref().map(|s| s.summary.pdc0_kw);
        assert!(after > before);

        Param::GammaPdc.adjust(&mut app.config, false);
        assert_eq!(Param::GammaPdc.display(&app.config), "-0.0045");
        Param::Longitude.adjust(&mut app.config, true);
        assert_eq!(app.config.site.longitude, 11.0);
    }

    #[test]
    fn every_site_input_has_a_sidebar_entry() {
        for p in [
            Param::Longitude,
            Param::AxisAzimuth,
            Param::ModuleRating,
            Param::GammaPdc,
        ] {
            assert!(PARAMS.contains(&p), "{p:?} missing from sidebar");
        }
    }

    #[test]
    fn reset_discards_edits() {
        let mut app = App::new("winter");
        app.selected = 1;
        app.adjust(true);
        assert_ne!(app.config, SiteConfig::winter());
        app.reset();
        assert_eq!(app.config, SiteConfig::winter());
        assert_eq!(app.preset_name, "winter");
    }
}
