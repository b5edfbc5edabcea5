//! Two-dimensional view factors for infinitely long, evenly spaced rows.
//!
//! Positions along a row's slant height are normalised to `x ∈ [0, 1]`,
//! measured from the lower edge. Positions on the ground are normalised to
//! the pitch, `0` directly below one row centre and `1` below the next.
//!
//! References: Marion et al. (2017), "Bifacial PV view factors", and
//! Mikofski et al. (2019), "A comparison of irradiance models for bifacial
//! PV in tracked and fixed-tilt arrays".

/// Distance helper shared by the row-to-sky and row-to-ground factors.
///
/// `delta` is `-1` when looking up toward the sky and `+1` toward the ground.
fn vf_poly(surface_tilt: f64, gcr: f64, x: f64, delta: f64) -> f64 {
    let a = 1.0 / gcr;
    let c = surface_tilt.to_radians().cos();
    (a * a + 2.0 * delta * a * c * x + x * x).sqrt()
}

/// Sky view factor from a point `x` on the row slant height.
pub fn vf_row_sky_2d(surface_tilt: f64, gcr: f64, x: f64) -> f64 {
    let p = vf_poly(surface_tilt, gcr, 1.0 - x, -1.0);
    let a = 1.0 / gcr;
    let c = surface_tilt.to_radians().cos();
    0.5 * (1.0 + (a * c - (1.0 - x)) / p)
}

/// Sky view factor averaged over `[x0, x1]` of the row slant height.
pub fn vf_row_sky_2d_integ(surface_tilt: f64, gcr: f64, x0: f64, x1: f64) -> f64 {
    let u = (x1 - x0).abs();
    if u < 1e-6 {
        return vf_row_sky_2d(surface_tilt, gcr, x0);
    }
    let p0 = vf_poly(surface_tilt, gcr, 1.0 - x0, -1.0);
    let p1 = vf_poly(surface_tilt, gcr, 1.0 - x1, -1.0);
    0.5 * (1.0 + (p1 - p0) / u)
}

/// Ground view factor from a point `x` on the row slant height.
pub fn vf_row_ground_2d(surface_tilt: f64, gcr: f64, x: f64) -> f64 {
    let p = vf_poly(surface_tilt, gcr, x, 1.0);
    let a = 1.0 / gcr;
    let c = surface_tilt.to_radians().cos();
    0.5 * (1.0 - (a * c + x) / p)
}

/// Ground view factor averaged over `[x0, x1]` of the row slant height.
pub fn vf_row_ground_2d_integ(surface_tilt: f64, gcr: f64, x0: f64, x1: f64) -> f64 {
    let u = (x1 - x0).abs();
    if u < 1e-6 {
        return vf_row_ground_2d(surface_tilt, gcr, x0);
    }
    let p0 = vf_poly(surface_tilt, gcr, x0, 1.0);
    let p1 = vf_poly(surface_tilt, gcr, x1, 1.0);
    0.5 * (1.0 - (p1 - p0) / u)
}

/// Fraction of the sky dome visible from ground position `x`.
///
/// Sums the gaps between the `2 · max_rows + 1` nearest rows. Sky beyond the
/// outermost rows is not counted.
///
/// # Arguments
///
/// * `rotation` - Row rotation from horizontal (degrees)
/// * `gcr` - Ground coverage ratio
/// * `x` - Ground position as a fraction of the pitch
/// * `pitch` - Row spacing (m)
/// * `height` - Height of the row centre above ground (m)
/// * `max_rows` - Rows considered on each side
pub fn vf_ground_sky_2d(
    rotation: f64,
    gcr: f64,
    x: f64,
    pitch: f64,
    height: f64,
    max_rows: usize,
) -> f64 {
    let half_width = gcr * pitch / 2.0;
    let dy = half_width * rotation.to_radians().sin();
    let dx = half_width * rotation.to_radians().cos();
    let n = max_rows as i64;

    // Elevation angles of each row's two edges, (low, high)
    let edges: Vec<(f64, f64)> = (-n..=n)
        .map(|k| {
            let d = (k as f64 - x) * pitch;
            let phi1 = (height + dy).atan2(d + dx);
            let phi2 = (height - dy).atan2(d - dx);
            if phi1 <= phi2 { (phi1, phi2) } else { (phi2, phi1) }
        })
        .collect();

    let gaps: f64 = edges
        .windows(2)
        .map(|pair| (pair[1].1.cos() - pair[0].0.cos()).max(0.0))
        .sum();
    gaps / 2.0
}

/// [`vf_ground_sky_2d`] averaged over one pitch with the trapezoid rule.
///
/// `npoints` is clamped to at least two.
pub fn vf_ground_sky_2d_integ(
    surface_tilt: f64,
    gcr: f64,
    height: f64,
    pitch: f64,
    max_rows: usize,
    npoints: usize,
) -> f64 {
    let npoints = npoints.max(2);
    let step = 1.0 / (npoints - 1) as f64;
    let values: Vec<f64> = (0..npoints)
        .map(|i| vf_ground_sky_2d(surface_tilt, gcr, i as f64 * step, pitch, height, max_rows))
        .collect();
    values
        .windows(2)
        .map(|pair| 0.5 * (pair[0] + pair[1]) * step)
        .sum()
}

/// Rows to include on each side so that anything beyond sits less than 5°
/// above the horizon.
pub fn max_rows_for(height: f64, pitch: f64) -> usize {
    let rows = (height / (pitch * 5.0_f64.to_radians().tan())).ceil();
    if rows.is_finite() && rows > 0.0 {
        rows as usize
    } else {
        1
    }
}
