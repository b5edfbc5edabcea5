//! Simulation pipeline: sky, tracker, bifacial irradiance, power and crop light.

use tracing::{debug, info};

use crate::config::SiteConfig;
use crate::error::{Result, SimError};
use crate::model::crop::CropModel;
use crate::model::infinite_sheds::{BifacialInput, InfiniteSheds, IrradianceModel};
use crate::model::power::{FaimanParams, PowerModel};
use crate::model::tracking::TrackerGeometry;
use crate::solar::{ClearSkyProvider, SkySample, SolarProvider};

use super::grid::TimeGrid;
use super::summary::DailySummary;
use super::types::{Sample, Simulation};

/// One-day simulation pipeline.
///
/// Generic over the solar provider and the irradiance model for static
/// dispatch. Holds no per-run state, so one pipeline can be reused for any
/// number of configurations.
#[derive(Debug, Clone)]
pub struct Pipeline<P: SolarProvider, M: IrradianceModel> {
    provider: P,
    model: M,
}

impl<P: SolarProvider, M: IrradianceModel> Pipeline<P, M> {
    /// Creates a pipeline from explicit collaborators.
    pub fn new(provider: P, model: M) -> Self {
        Self { provider, model }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Runs the whole day for `config`.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfig` listing every validation failure, or
    /// `SimError::NonFinite` for the first NaN/infinite value produced. No
    /// partial results are returned.
    pub fn run(&self, config: &SiteConfig) -> Result<Simulation> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(SimError::InvalidConfig(errors));
        }

        let grid = TimeGrid::for_date(config.site.date);
        let gcr = config.gcr();
        info!(
            date = %config.site.date,
            latitude = config.site.latitude,
            longitude = config.site.longitude,
            gcr,
            "starting simulation"
        );

        let sky = self.provider.sky(&config.location(), &grid);
        debug!(steps = sky.len(), "sky computed");

        let stages = Stages::new(config);
        let mut samples = Vec::with_capacity(grid.len());
        for (t, s) in sky.iter().enumerate() {
            let sample = stages.step(&self.model, t, s);
            if let Some((quantity, _)) = sample.quantities().into_iter().find(|(_, v)| !v.is_finite()) {
                return Err(SimError::NonFinite {
                    timestep: t,
                    quantity,
                });
            }
            samples.push(sample);
        }

        let summary = DailySummary::from_samples(&samples, config.pdc0());
        info!(
            energy_kwh = summary.energy_kwh,
            peak_kw = summary.peak_power_kw,
            crop_light_ratio = summary.crop_light_ratio,
            "simulation finished"
        );

        Ok(Simulation {
            config: config.clone(),
            grid,
            gcr,
            samples,
            summary,
        })
    }
}

impl Pipeline<ClearSkyProvider, InfiniteSheds> {
    /// Builds the default clear-sky provider and infinite-sheds model for `config`.
    pub fn from_config(config: &SiteConfig) -> Self {
        let provider = ClearSkyProvider::new(config.environment.linke_turbidity.clone());
        let model = InfiniteSheds {
            sky_diffuse: config.model.sky_diffuse,
            npoints: config.model.npoints,
            shade_factor: config.module.shade_factor,
            transmission_factor: config.module.transmission_factor,
            ..InfiniteSheds::default()
        };
        Self::new(provider, model)
    }
}

/// Runs `config` through the default pipeline.
///
/// # Errors
///
/// See [`Pipeline::run`].
pub fn simulate(config: &SiteConfig) -> Result<Simulation> {
    Pipeline::from_config(config).run(config)
}

/// Per-run models derived once from the configuration.
struct Stages {
    tracker: TrackerGeometry,
    power: PowerModel,
    crop: CropModel,
    height: f64,
    pitch: f64,
    albedo: f64,
    bifaciality: f64,
}

impl Stages {
    fn new(config: &SiteConfig) -> Self {
        let gcr = config.gcr();
        let a = &config.array;
        Self {
            tracker: TrackerGeometry::new(a.axis_azimuth, a.max_angle, gcr, a.backtrack),
            power: PowerModel {
                pdc0: config.pdc0(),
                gamma_pdc: config.module.gamma_pdc,
                temp_air: config.environment.temp_air,
                wind_speed: config.environment.wind_speed,
                faiman: FaimanParams::default(),
            },
            crop: CropModel::new(gcr, a.height, a.pitch, config.model.npoints),
            height: a.height,
            pitch: a.pitch,
            albedo: config.environment.albedo,
            bifaciality: config.module.bifaciality,
        }
    }

    /// Tracker, irradiance, power and crop light for one timestep.
    fn step<M: IrradianceModel>(&self, model: &M, t: usize, sky: &SkySample) -> Sample {
        let pos = &sky.position;
        let cs = &sky.clear_sky;

        let state = self.tracker.orient(pos.apparent_zenith, pos.azimuth);

        let irradiance = model.irradiance(&BifacialInput {
            surface_tilt: state.surface_tilt,
            surface_azimuth: state.surface_azimuth,
            solar_zenith: pos.apparent_zenith,
            solar_azimuth: pos.azimuth,
            gcr: self.tracker.gcr,
            height: self.height,
            pitch: self.pitch,
            ghi: cs.ghi,
            dhi: cs.dhi,
            dni: cs.dni,
            albedo: self.albedo,
            dni_extra: sky.dni_extra,
            bifaciality: self.bifaciality,
        });

        let power = self.power.convert(irradiance.poa_global);
        let crop = self.crop.estimate(
            state.surface_tilt,
            state.surface_azimuth,
            pos.apparent_zenith,
            pos.azimuth,
            cs.dni,
            cs.dhi,
        );

        Sample {
            timestep: t,
            timestamp: sky.time,
            apparent_zenith: pos.apparent_zenith,
            azimuth: pos.azimuth,
            ghi: cs.ghi,
            dhi: cs.dhi,
            dni: cs.dni,
            dni_extra: sky.dni_extra,
            tracker_theta: state.tracker_theta,
            surface_tilt: state.surface_tilt,
            surface_azimuth: state.surface_azimuth,
            poa_front: irradiance.poa_front,
            poa_back: irradiance.poa_back,
            poa_global: irradiance.poa_global,
            temp_cell: power.temp_cell,
            power_dc_w: power.power_dc_w,
            crop_irradiance: crop.irradiance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::infinite_sheds::BifacialIrradiance;

    /// Model that returns a fixed value, for exercising the pipeline seams.
    struct Constant(f64);

    impl IrradianceModel for Constant {
        fn irradiance(&self, _input: &BifacialInput) -> BifacialIrradiance {
            BifacialIrradiance {
                poa_global: self.0,
                poa_front: self.0,
                ..BifacialIrradiance::default()
            }
        }
    }

    #[test]
    fn baseline_runs_full_day() {
        let sim = simulate(&SiteConfig::baseline());
        assert!(sim.is_ok(), "{:?}", sim.err());
        let sim = sim.ok();
        assert_eq!(sim.as_ref().map(Simulation::len), Some(1440));
    }

    #[test]
    fn invalid_config_rejected_before_running() {
        let mut cfg = SiteConfig::baseline();
        cfg.array.pitch = -1.0;
        match simulate(&cfg) {
            Err(SimError::InvalidConfig(errors)) => {
                assert!(errors.iter().any(|e| e.field == "array.pitch"));
            }
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn custom_model_plugs_in() {
        let cfg = SiteConfig::baseline();
        let pipeline = Pipeline::new(ClearSkyProvider::default(), Constant(1000.0));
        let sim = pipeline.run(&cfg).ok();
        let powers = sim.map(|s| s.power_kw()).unwrap_or_default();
        assert_eq!(powers.len(), 1440);
        // Same irradiance every minute, so the same power every minute
        assert!(powers.windows(2).all(|w| w[0] == w[1]));
        assert!(powers[0] > 0.0);
    }

    #[test]
    fn non_finite_output_aborts() {
        let cfg = SiteConfig::baseline();
        let pipeline = Pipeline::new(ClearSkyProvider::default(), Constant(f64::NAN));
        assert_eq!(
            pipeline.run(&cfg).err(),
            Some(SimError::NonFinite {
                timestep: 0,
                quantity: "poa_front",
            })
        );
    }

    #[test]
    fn from_config_uses_model_settings() {
        let mut cfg = SiteConfig::baseline();
        cfg.model.npoints = 20;
        cfg.module.shade_factor = -0.05;
        let pipeline = Pipeline::from_config(&cfg);
        assert_eq!(pipeline.model().npoints, 20);
        assert_eq!(pipeline.model().shade_factor, -0.05);
    }
}
