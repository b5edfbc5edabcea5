//! TOML-based site configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::diffuse::SkyDiffuseModel;
use crate::solar::{LinkeTurbidity, Location};

/// Top-level site configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`SiteConfig::from_toml_file`] or use
/// [`SiteConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Location and simulated date.
    #[serde(default)]
    pub site: SiteSection,
    /// Tracker row geometry.
    #[serde(default)]
    pub array: ArraySection,
    /// Ground and weather conditions.
    #[serde(default)]
    pub environment: EnvironmentSection,
    /// Module electrical and bifacial parameters.
    #[serde(default)]
    pub module: ModuleSection,
    /// Model selection and numerical settings.
    #[serde(default)]
    pub model: ModelSection,
}

/// Location and simulated date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Degrees north, in [-90, 90].
    pub latitude: f64,
    /// Degrees east, in [-180, 180].
    pub longitude: f64,
    /// Metres above sea level.
    pub altitude: f64,
    /// UTC calendar day to simulate, `"YYYY-MM-DD"`.
    pub date: NaiveDate,
}

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 6, 28).unwrap_or_default()
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            latitude: 55.0,
            longitude: 10.0,
            altitude: 0.0,
            date: reference_date(),
        }
    }
}

/// Tracker row geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArraySection {
    /// Height of the rotation axis above ground (m).
    pub height: f64,
    /// Distance between row axes (m).
    pub pitch: f64,
    /// Collector width across the row (m).
    pub row_width: f64,
    /// Axis direction, clockwise from north (degrees, [0, 360)).
    pub axis_azimuth: f64,
    /// Rotation limit either side of flat (degrees, [0, 90]).
    pub max_angle: f64,
    /// Enable backtracking.
    pub backtrack: bool,
}

impl Default for ArraySection {
    fn default() -> Self {
        Self {
            height: 2.6,
            pitch: 12.0,
            row_width: 2.0 * 2.384,
            axis_azimuth: 0.0,
            max_angle: 55.0,
            backtrack: true,
        }
    }
}

/// Ground and weather conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentSection {
    /// Ground reflectance (0.0–1.0).
    pub albedo: f64,
    /// Ambient air temperature (°C).
    pub temp_air: f64,
    /// Wind speed at module height (m/s).
    pub wind_speed: f64,
    /// Constant or 12 monthly values.
    pub linke_turbidity: LinkeTurbidity,
}

impl Default for EnvironmentSection {
    fn default() -> Self {
        Self {
            albedo: 0.2,
            temp_air: 18.0,
            wind_speed: 1.0,
            linke_turbidity: LinkeTurbidity::default(),
        }
    }
}

/// Module electrical and bifacial parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModuleSection {
    /// Rear-to-front response ratio (0.0–1.0).
    pub bifaciality: f64,
    /// Number of modules in the array.
    pub n_modules: u32,
    /// Nameplate rating per module (W).
    pub pdc0_per_module: f64,
    /// Power temperature coefficient (1/°C).
    pub gamma_pdc: f64,
    /// Relative rear-side loss from racking.
    pub shade_factor: f64,
    /// Relative rear-side gain from light passing between cells.
    pub transmission_factor: f64,
}

impl Default for ModuleSection {
    fn default() -> Self {
        Self {
            bifaciality: 0.7,
            n_modules: 1512,
            pdc0_per_module: 660.0,
            gamma_pdc: -0.004,
            shade_factor: -0.02,
            transmission_factor: 0.0,
        }
    }
}

/// Model selection and numerical settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelSection {
    /// `"isotropic"` or `"haydavies"`.
    pub sky_diffuse: SkyDiffuseModel,
    /// Trapezoid points for ground view-factor integration (>= 2).
    pub npoints: usize,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            sky_diffuse: SkyDiffuseModel::Haydavies,
            npoints: 100,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"array.pitch"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

fn positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

fn within(x: f64, lo: f64, hi: f64) -> bool {
    (lo..=hi).contains(&x)
}

impl SiteConfig {
    /// Returns the reference installation: 55°N 10°E on 28 June 2020.
    pub fn baseline() -> Self {
        Self {
            site: SiteSection::default(),
            array: ArraySection::default(),
            environment: EnvironmentSection::default(),
            module: ModuleSection::default(),
            model: ModelSection::default(),
        }
    }

    /// Returns the dense-rows preset: tighter pitch on a lower tracker.
    pub fn dense_rows() -> Self {
        Self {
            array: ArraySection {
                height: 2.0,
                pitch: 8.0,
                ..ArraySection::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the winter preset: the baseline site on the December solstice.
    pub fn winter() -> Self {
        Self {
            site: SiteSection {
                date: NaiveDate::from_ymd_opt(2020, 12, 21).unwrap_or_default(),
                ..SiteSection::default()
            },
            environment: EnvironmentSection {
                temp_air: 2.0,
                albedo: 0.3,
                ..EnvironmentSection::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "dense_rows", "winter"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "dense_rows" => Ok(Self::dense_rows()),
            "winter" => Ok(Self::winter()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("site", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Ground coverage ratio, row width over pitch.
    pub fn gcr(&self) -> f64 {
        self.array.row_width / self.array.pitch
    }

    /// Array nameplate DC rating (W).
    pub fn pdc0(&self) -> f64 {
        self.module.pdc0_per_module * f64::from(self.module.n_modules)
    }

    pub fn location(&self) -> Location {
        Location {
            latitude: self.site.latitude,
            longitude: self.site.longitude,
            altitude: self.site.altitude,
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.site;
        if !within(s.latitude, -90.0, 90.0) {
            errors.push(ConfigError::new("site.latitude", "must be in [-90, 90]"));
        }
        if !within(s.longitude, -180.0, 180.0) {
            errors.push(ConfigError::new("site.longitude", "must be in [-180, 180]"));
        }
        if !within(s.altitude, -500.0, 9000.0) {
            errors.push(ConfigError::new("site.altitude", "must be in [-500, 9000] m"));
        }

        let a = &self.array;
        if !positive(a.height) {
            errors.push(ConfigError::new("array.height", "must be > 0"));
        }
        if !positive(a.pitch) {
            errors.push(ConfigError::new("array.pitch", "must be > 0"));
        }
        if !positive(a.row_width) {
            errors.push(ConfigError::new("array.row_width", "must be > 0"));
        }
        if positive(a.pitch) && positive(a.row_width) && self.gcr() > 1.0 {
            errors.push(ConfigError::new(
                "array.row_width",
                format!(
                    "must be <= array.pitch (ground coverage ratio {:.3} > 1)",
                    self.gcr()
                ),
            ));
        }
        if !(0.0..360.0).contains(&a.axis_azimuth) {
            errors.push(ConfigError::new("array.axis_azimuth", "must be in [0, 360)"));
        }
        if !within(a.max_angle, 0.0, 90.0) {
            errors.push(ConfigError::new("array.max_angle", "must be in [0, 90]"));
        }

        let e = &self.environment;
        if !within(e.albedo, 0.0, 1.0) {
            errors.push(ConfigError::new("environment.albedo", "must be in [0.0, 1.0]"));
        }
        if !e.temp_air.is_finite() {
            errors.push(ConfigError::new("environment.temp_air", "must be finite"));
        }
        if !(e.wind_speed.is_finite() && e.wind_speed >= 0.0) {
            errors.push(ConfigError::new("environment.wind_speed", "must be >= 0"));
        }
        let turbidity_ok = match &e.linke_turbidity {
            LinkeTurbidity::Constant(tl) => positive(*tl),
            LinkeTurbidity::Monthly(values) => values.iter().all(|tl| positive(*tl)),
        };
        if !turbidity_ok {
            errors.push(ConfigError::new(
                "environment.linke_turbidity",
                "all values must be > 0",
            ));
        }

        let m = &self.module;
        if !within(m.bifaciality, 0.0, 1.0) {
            errors.push(ConfigError::new("module.bifaciality", "must be in [0.0, 1.0]"));
        }
        if m.n_modules == 0 {
            errors.push(ConfigError::new("module.n_modules", "must be > 0"));
        }
        if !positive(m.pdc0_per_module) {
            errors.push(ConfigError::new("module.pdc0_per_module", "must be > 0"));
        }
        if !m.gamma_pdc.is_finite() {
            errors.push(ConfigError::new("module.gamma_pdc", "must be finite"));
        }
        if !within(m.shade_factor, -1.0, 0.0) {
            errors.push(ConfigError::new("module.shade_factor", "must be in [-1.0, 0.0]"));
        }
        if !within(m.transmission_factor, 0.0, 1.0) {
            errors.push(ConfigError::new(
                "module.transmission_factor",
                "must be in [0.0, 1.0]",
            ));
        }

        if self.model.npoints < 2 {
            errors.push(ConfigError::new("model.npoints", "must be >= 2"));
        }

        errors
    }
}
