//! Color constants and auto-scaling helpers for the TUI.

use ratatui::style::Color;

/// DC power line color.
pub const POWER_COLOR: Color = Color::Yellow;
/// Above-panel GHI line color.
pub const GHI_COLOR: Color = Color::Cyan;
/// Crop-level irradiance line color.
pub const CROP_COLOR: Color = Color::Green;
/// Highlighted sidebar row.
pub const SELECTED_FG: Color = Color::Black;
pub const SELECTED_BG: Color = Color::Yellow;
/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Error message color.
pub const ERROR_FG: Color = Color::Red;

/// Computes Y-axis bounds `[0, max + 10%]` over all series.
///
/// Every plotted quantity is non-negative, so the axis always starts at zero.
pub fn auto_bounds_y(series: &[&[(f64, f64)]]) -> [f64; 2] {
    let max = series
        .iter()
        .flat_map(|s| s.iter().map(|&(_, y)| y))
        .fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() || max <= 0.0 {
        return [0.0, 1.0];
    }
    [0.0, max * 1.1]
}
