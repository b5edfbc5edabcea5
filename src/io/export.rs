//! CSV export for simulation samples.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::Sample;

/// Schema v1 column header for CSV telemetry export.
pub const HEADER: &str = "timestamp,apparent_zenith,azimuth,ghi,dhi,dni,dni_extra,\
                          tracker_theta,surface_tilt,surface_azimuth,\
                          poa_front,poa_back,poa_global,temp_cell,power_dc_kw,crop_irradiance";

/// Exports samples to a CSV file at the given path.
///
/// Writes a header row followed by one data row per step using the schema v1
/// column layout. Produces deterministic output for identical inputs.
///
/// # Arguments
///
/// * `samples` - Complete simulation samples
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(samples: &[Sample], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(samples, buf)
}

/// Writes samples as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(samples: &[Sample], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for s in samples {
        wtr.write_record(&[
            s.timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            format!("{:.4}", s.apparent_zenith),
            format!("{:.4}", s.azimuth),
            format!("{:.3}", s.ghi),
            format!("{:.3}", s.dhi),
            format!("{:.3}", s.dni),
            format!("{:.3}", s.dni_extra),
            format!("{:.4}", s.tracker_theta),
            format!("{:.4}", s.surface_tilt),
            format!("{:.4}", s.surface_azimuth),
            format!("{:.3}", s.poa_front),
            format!("{:.3}", s.poa_back),
            format!("{:.3}", s.poa_global),
            format!("{:.3}", s.temp_cell),
            format!("{:.4}", s.power_dc_kw()),
            format!("{:.3}", s.crop_irradiance),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
