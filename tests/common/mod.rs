//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use agrivolt_sim::config::SiteConfig;
use agrivolt_sim::sim::{Sample, Simulation, simulate};

/// Reference scenario: 55°N 10°E on 2020-06-28.
pub fn baseline_config() -> SiteConfig {
    SiteConfig::baseline()
}

/// Runs `config` through the default pipeline, failing the test on error.
pub fn run(config: &SiteConfig) -> Simulation {
    simulate(config).expect("simulation should succeed")
}

/// Timestep with the smallest apparent zenith.
pub fn solar_noon_step(sim: &Simulation) -> usize {
    sim.samples
        .iter()
        .min_by(|a, b| a.apparent_zenith.total_cmp(&b.apparent_zenith))
        .map(|s| s.timestep)
        .expect("simulation should have samples")
}

/// Samples within `half_width` minutes of solar noon.
pub fn around_noon(sim: &Simulation, half_width: usize) -> &[Sample] {
    let noon = solar_noon_step(sim);
    let lo = noon.saturating_sub(half_width);
    let hi = (noon + half_width + 1).min(sim.len());
    &sim.samples[lo..hi]
}

/// Energy-weighted mean timestep of the power profile.
pub fn power_centroid(sim: &Simulation) -> f64 {
    let total: f64 = sim.samples.iter().map(|s| s.power_dc_w).sum();
    let moment: f64 = sim
        .samples
        .iter()
        .map(|s| s.timestep as f64 * s.power_dc_w)
        .sum();
    moment / total
}

/// Checks the invariants every run must satisfy, with a context label for messages.
pub fn assert_physical_invariants(sim: &Simulation, label: &str) {
    let max_angle = sim.config.array.max_angle;
    for s in &sim.samples {
        for (name, v) in s.quantities() {
            assert!(v.is_finite(), "{label}: {name} not finite at t={}", s.timestep);
        }
        assert!(s.ghi >= 0.0, "{label}: ghi < 0 at t={}", s.timestep);
        assert!(s.dhi >= 0.0, "{label}: dhi < 0 at t={}", s.timestep);
        assert!(s.dni >= 0.0, "{label}: dni < 0 at t={}", s.timestep);
        assert!(s.poa_global >= 0.0, "{label}: poa_global < 0 at t={}", s.timestep);
        assert!(s.power_dc_w >= 0.0, "{label}: power < 0 at t={}", s.timestep);
        assert!(
            s.crop_irradiance >= 0.0,
            "{label}: crop irradiance < 0 at t={}",
            s.timestep
        );
        assert!(
            s.surface_tilt <= max_angle + 1e-9,
            "{label}: tilt {} exceeds max_angle {max_angle} at t={}",
            s.surface_tilt,
            s.timestep
        );
        assert!(
            s.crop_irradiance <= s.ghi + 1e-6,
            "{label}: crop {} above ghi {} at t={}",
            s.crop_irradiance,
            s.ghi,
            s.timestep
        );
        if s.apparent_zenith > 90.0 {
            assert_eq!(s.poa_global, 0.0, "{label}: night poa at t={}", s.timestep);
            assert_eq!(s.power_dc_w, 0.0, "{label}: night power at t={}", s.timestep);
        }
    }
}
