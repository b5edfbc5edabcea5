//! Solar physics: sun position, clear-sky irradiance and extraterrestrial radiation.
//!
//! The pipeline only talks to [`SolarProvider`]; [`ClearSkyProvider`] is the
//! built-in implementation.

pub mod clearsky;
pub mod position;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

pub use clearsky::{ClearSky, LinkeTurbidity};
pub use position::{Atmosphere, SolarPosition};

use crate::sim::grid::TimeGrid;

/// Geographic observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Degrees north.
    pub latitude: f64,
    /// Degrees east.
    pub longitude: f64,
    /// Metres above sea level.
    pub altitude: f64,
}

/// Everything the downstream models need to know about the sky at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkySample {
    pub time: DateTime<Utc>,
    pub position: SolarPosition,
    pub clear_sky: ClearSky,
    /// Extraterrestrial normal irradiance (W/m²).
    pub dni_extra: f64,
}

/// Source of sun geometry and irradiance for a series of instants.
///
/// Every method returns one value per input instant, in order.
pub trait SolarProvider {
    /// Sun position for each instant.
    fn solar_position(&self, location: &Location, times: &[DateTime<Utc>]) -> Vec<SolarPosition>;

    /// Clear-sky horizontal irradiance for each instant.
    ///
    /// `positions` must be the output of [`solar_position`](Self::solar_position)
    /// for the same `times`.
    fn clear_sky(
        &self,
        location: &Location,
        times: &[DateTime<Utc>],
        positions: &[SolarPosition],
    ) -> Vec<ClearSky>;

    /// Extraterrestrial normal irradiance for each instant.
    fn extra_radiation(&self, times: &[DateTime<Utc>]) -> Vec<f64>;

    /// Runs all three queries over a time grid and zips the results.
    fn sky(&self, location: &Location, grid: &TimeGrid) -> Vec<SkySample> {
        let times = grid.timestamps();
        let positions = self.solar_position(location, &times);
        let clear_sky = self.clear_sky(location, &times, &positions);
        let dni_extra = self.extra_radiation(&times);

        times
            .into_iter()
            .zip(positions)
            .zip(clear_sky)
            .zip(dni_extra)
            .map(|(((time, position), clear_sky), dni_extra)| SkySample {
                time,
                position,
                clear_sky,
                dni_extra,
            })
            .collect()
    }
}

/// Grena3 sun position with an Ineichen clear sky.
#[derive(Debug, Clone, PartialEq)]
pub struct ClearSkyProvider {
    pub linke_turbidity: LinkeTurbidity,
    /// ΔT in seconds.
    pub delta_t: f64,
    pub atmosphere: Atmosphere,
}

impl Default for ClearSkyProvider {
    fn default() -> Self {
        Self {
            linke_turbidity: LinkeTurbidity::default(),
            delta_t: position::DEFAULT_DELTA_T,
            atmosphere: Atmosphere::default(),
        }
    }
}

impl ClearSkyProvider {
    pub fn new(linke_turbidity: LinkeTurbidity) -> Self {
        Self {
            linke_turbidity,
            ..Self::default()
        }
    }
}

impl SolarProvider for ClearSkyProvider {
    fn solar_position(&self, location: &Location, times: &[DateTime<Utc>]) -> Vec<SolarPosition> {
        times
            .iter()
            .map(|t| {
                position::grena3(
                    t,
                    location.latitude,
                    location.longitude,
                    self.delta_t,
                    Atmosphere {
                        pressure_hpa: clearsky::alt2pres(location.altitude) / 100.0,
                        ..self.atmosphere
                    },
                )
            })
            .collect()
    }

    fn clear_sky(
        &self,
        location: &Location,
        times: &[DateTime<Utc>],
        positions: &[SolarPosition],
    ) -> Vec<ClearSky> {
        let pressure = clearsky::alt2pres(location.altitude);
        times
            .iter()
            .zip(positions)
            .map(|(t, pos)| {
                let doy = t.ordinal();
                let airmass = clearsky::relative_airmass(pos.apparent_zenith)
                    .map(|am| clearsky::absolute_airmass(am, pressure));
                clearsky::ineichen(
                    pos.apparent_zenith,
                    airmass,
                    self.linke_turbidity.at(doy),
                    location.altitude,
                    clearsky::extra_radiation(doy),
                )
            })
            .collect()
    }

    fn extra_radiation(&self, times: &[DateTime<Utc>]) -> Vec<f64> {
        times
            .iter()
            .map(|t| clearsky::extra_radiation(t.ordinal()))
            .collect()
    }
}
