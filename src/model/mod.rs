//! Array physics: tracking, shading, view factors, irradiance transposition,
//! power conversion and crop-level light.

pub mod crop;
pub mod diffuse;
pub mod infinite_sheds;
pub mod power;
pub mod shading;
pub mod tracking;
pub mod view_factors;

pub use infinite_sheds::{BifacialInput, BifacialIrradiance, InfiniteSheds, IrradianceModel};
