//! Coordinate table construction.
//!
//! Converts a sample → (latitude, longitude) map into the index-aligned
//! numeric matrix the clusterer consumes. Row order is the map's sorted key
//! order; cluster labels are later joined back to sample identifiers purely
//! by row position, so this alignment is load-bearing.

use std::collections::BTreeMap;

use ndarray::Array2;

use super::error::{ClusterError, ClusterResult};

/// Sample identifier → (latitude, longitude) in decimal degrees.
///
/// A `BTreeMap` so iteration is deterministic (lexicographic by sample
/// identifier). The coordinate matrix and the population map derived from it
/// both rely on that order being reproducible across runs.
pub type CoordinateMap = BTreeMap<String, (f64, f64)>;

/// Matrix column holding latitude.
pub const LAT_COL: usize = 0;

/// Matrix column holding longitude.
pub const LON_COL: usize = 1;

/// Build the `(n, 2)` coordinate matrix for `coords`.
///
/// Row `i` holds `[lat, lon]` for the `i`-th key in sorted key order. The
/// matrix has exactly one row per sample: nothing is filtered, reordered, or
/// deduplicated. Pure function of its input.
///
/// # Errors
///
/// * [`ClusterError::EmptyInput`] if `coords` has no entries (clustering zero
///   points is undefined).
/// * [`ClusterError::InvalidCoordinate`] if any value is non-finite or
///   outside the valid degree ranges (|lat| ≤ 90, |lon| ≤ 180).
pub fn coords_to_matrix(coords: &CoordinateMap) -> ClusterResult<Array2<f64>> {
    if coords.is_empty() {
        return Err(ClusterError::EmptyInput);
    }

    let mut matrix = Array2::zeros((coords.len(), 2));
    for (row, (sample, &(lat, lon))) in coords.iter().enumerate() {
        validate_coordinate(sample, lat, lon)?;
        matrix[[row, LAT_COL]] = lat;
        matrix[[row, LON_COL]] = lon;
    }

    Ok(matrix)
}

/// Fail fast on values the distance metric cannot handle.
fn validate_coordinate(sample: &str, lat: f64, lon: f64) -> ClusterResult<()> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(ClusterError::invalid_coordinate(
            sample,
            lat,
            lon,
            "non-finite value",
        ));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(ClusterError::invalid_coordinate(
            sample,
            lat,
            lon,
            "latitude outside [-90, 90]",
        ));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(ClusterError::invalid_coordinate(
            sample,
            lat,
            lon,
            "longitude outside [-180, 180]",
        ));
    }
    Ok(())
}
