//! Agrivoltaic single-axis tracker simulator.
//!
//! Computes, for one day at one-minute resolution, the DC power of a bifacial
//! tracker array and the irradiance left for crops on the ground beneath it.

pub mod config;
pub mod error;
/// CSV export.
pub mod io;
/// Tracker, irradiance, power and crop-light models.
pub mod model;
/// Time grid, pipeline and daily summary.
pub mod sim;
/// Sun position and clear-sky irradiance.
pub mod solar;

#[cfg(feature = "api")]
pub mod api;
#[cfg(feature = "tui")]
pub mod tui;
