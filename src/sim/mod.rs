/// Simulation pipeline.
pub mod engine;
/// One-day, one-minute time grid.
pub mod grid;
pub mod summary;
pub mod types;

pub use engine::{Pipeline, simulate};
pub use types::{Sample, Simulation};
