//! Density-based spatial clustering over great-circle distance.
//!
//! DBSCAN semantics: a point with at least `min_samples` neighbors within
//! `epsilon_km` (the point itself included) is a core point; clusters grow
//! outward from core points; everything unreachable stays noise. Noise is a
//! legitimate population with its own label, never an error.
//!
//! # Determinism
//!
//! Points are visited in coordinate-matrix row order (the sorted key order of
//! the input map), cluster labels are assigned in first-encounter order, and
//! there is no randomized tie-breaking anywhere. Identical inputs produce
//! identical population maps.

use std::collections::{BTreeMap, VecDeque};

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::coords::{coords_to_matrix, CoordinateMap, LAT_COL, LON_COL};
use super::distance::{haversine_radians, EARTH_MEAN_RADIUS_KM};
use super::error::{ClusterError, ClusterResult};

/// Population identifier → member sample identifiers.
///
/// Member lists keep the encounter order of the sorted sample keys. The lists
/// partition the full sample set: every sample lands in exactly one
/// population, noise included.
pub type PopulationMap = BTreeMap<String, Vec<String>>;

/// Cluster label reserved for noise points.
pub const NOISE_LABEL: i64 = -1;

/// Prefix for population identifiers derived from cluster labels.
pub const POPULATION_PREFIX: &str = "DB_";

/// Form the population identifier for a cluster label.
///
/// Noise (`-1`) becomes `"DB_-1"`: all unclustered points share that single
/// population rather than becoming one population each.
pub fn population_id(label: i64) -> String {
    format!("{POPULATION_PREFIX}{label}")
}

// =============================================================================
// GeoDbscanParams
// =============================================================================

/// Parameters for great-circle DBSCAN.
///
/// # Example
///
/// ```
/// use geopop_core::clustering::dbscan::GeoDbscanParams;
///
/// let params = GeoDbscanParams::new(25.0, 3);
/// assert!(params.validate().is_ok());
///
/// let invalid = params.with_epsilon_km(0.0);
/// assert!(invalid.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoDbscanParams {
    /// Maximum great-circle distance in kilometers for two points to be
    /// neighbors.
    pub epsilon_km: f64,

    /// Minimum neighborhood size (the point itself included) for a point to
    /// be a core point.
    pub min_samples: usize,
}

impl GeoDbscanParams {
    /// Create parameters from an epsilon in kilometers and a minimum
    /// neighborhood size.
    pub fn new(epsilon_km: f64, min_samples: usize) -> Self {
        Self {
            epsilon_km,
            min_samples,
        }
    }

    /// Set the neighborhood radius in kilometers.
    ///
    /// Value is NOT clamped - use `validate()` to check.
    #[must_use]
    pub fn with_epsilon_km(mut self, epsilon_km: f64) -> Self {
        self.epsilon_km = epsilon_km;
        self
    }

    /// Set the minimum neighborhood size.
    ///
    /// Value is NOT clamped - use `validate()` to check.
    #[must_use]
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    /// Validate parameters, failing fast with a descriptive message.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::InvalidParameter`] if:
    /// - `epsilon_km` is not a finite, positive distance
    /// - `min_samples` is 0
    pub fn validate(&self) -> ClusterResult<()> {
        if !self.epsilon_km.is_finite() || self.epsilon_km <= 0.0 {
            return Err(ClusterError::invalid_parameter(format!(
                "epsilon_km must be a finite positive distance in kilometers, got {}",
                self.epsilon_km
            )));
        }

        if self.min_samples < 1 {
            return Err(ClusterError::invalid_parameter(format!(
                "min_samples must be >= 1, got {}",
                self.min_samples
            )));
        }

        Ok(())
    }

    /// The neighborhood threshold as a central angle in radians.
    ///
    /// The haversine metric works on angles, so the kilometer epsilon is
    /// divided by Earth's mean radius before any comparison.
    pub fn epsilon_radians(&self) -> f64 {
        self.epsilon_km / EARTH_MEAN_RADIUS_KM
    }
}

// =============================================================================
// GeoDbscan
// =============================================================================

/// Great-circle DBSCAN clusterer.
///
/// Builds the coordinate matrix, runs DBSCAN with an exact haversine
/// neighborhood test, and regroups the positional labels into a
/// [`PopulationMap`].
///
/// # Example
///
/// ```
/// use geopop_core::clustering::coords::CoordinateMap;
/// use geopop_core::clustering::dbscan::{GeoDbscan, GeoDbscanParams};
///
/// let mut coords = CoordinateMap::new();
/// coords.insert("north".into(), (59.0, 18.0));
/// coords.insert("north2".into(), (59.001, 18.001));
/// coords.insert("south".into(), (-33.0, 151.0));
///
/// let populations = GeoDbscan::new(GeoDbscanParams::new(5.0, 2))
///     .fit(&coords)
///     .unwrap();
///
/// assert_eq!(populations["DB_0"], vec!["north".to_string(), "north2".to_string()]);
/// assert_eq!(populations["DB_-1"], vec!["south".to_string()]);
/// ```
pub struct GeoDbscan {
    params: GeoDbscanParams,
}

impl GeoDbscan {
    /// Create a clusterer with the given parameters.
    pub fn new(params: GeoDbscanParams) -> Self {
        Self { params }
    }

    /// The configured parameters.
    pub fn params(&self) -> &GeoDbscanParams {
        &self.params
    }

    /// Cluster `coords` into populations.
    ///
    /// Returns a map whose member lists partition the input key set exactly:
    /// every sample appears in exactly one population, with all noise points
    /// collected under `"DB_-1"`.
    ///
    /// # Errors
    ///
    /// - [`ClusterError::InvalidParameter`] for a non-positive epsilon or a
    ///   zero `min_samples`
    /// - [`ClusterError::EmptyInput`] / [`ClusterError::InvalidCoordinate`]
    ///   propagated from matrix construction
    pub fn fit(&self, coords: &CoordinateMap) -> ClusterResult<PopulationMap> {
        self.params.validate()?;
        let matrix = coords_to_matrix(coords)?;
        let labels = self.label_points(matrix.view());

        // Regroup: walk the same sorted key order the matrix was built from,
        // joining each sample to its label by row position.
        let mut populations = PopulationMap::new();
        for (row, sample) in coords.keys().enumerate() {
            populations
                .entry(population_id(labels[row]))
                .or_default()
                .push(sample.clone());
        }

        let noise = labels.iter().filter(|&&label| label == NOISE_LABEL).count();
        debug!(
            points = labels.len(),
            populations = populations.len(),
            noise,
            epsilon_km = self.params.epsilon_km,
            min_samples = self.params.min_samples,
            "regrouped cluster labels into populations"
        );
        if noise == labels.len() {
            warn!(
                points = labels.len(),
                epsilon_km = self.params.epsilon_km,
                min_samples = self.params.min_samples,
                "every point labeled noise; epsilon_km or min_samples may not fit this data"
            );
        }

        Ok(populations)
    }

    /// One integer label per matrix row; [`NOISE_LABEL`] marks noise.
    ///
    /// Classic DBSCAN: visit rows in order, start a cluster at each
    /// unvisited core point, and grow it breadth-first through core-point
    /// neighborhoods. A point first marked noise is claimed as a border
    /// point if a later cluster reaches it.
    fn label_points(&self, points: ArrayView2<'_, f64>) -> Vec<i64> {
        let n = points.nrows();
        let neighbors = self.neighborhoods(points);

        let mut labels = vec![NOISE_LABEL; n];
        let mut visited = vec![false; n];
        let mut next_label = 0i64;

        for seed in 0..n {
            if visited[seed] {
                continue;
            }
            visited[seed] = true;

            if neighbors[seed].len() < self.params.min_samples {
                continue; // stays noise unless some cluster claims it below
            }

            labels[seed] = next_label;
            let mut frontier: VecDeque<usize> = neighbors[seed].iter().copied().collect();

            while let Some(point) = frontier.pop_front() {
                if visited[point] {
                    if labels[point] == NOISE_LABEL {
                        labels[point] = next_label; // border point, found late
                    }
                    continue;
                }
                visited[point] = true;
                labels[point] = next_label;

                if neighbors[point].len() >= self.params.min_samples {
                    frontier.extend(neighbors[point].iter().copied());
                }
            }

            next_label += 1;
        }

        labels
    }

    /// Exact epsilon-neighborhoods by haversine central angle.
    ///
    /// A deterministic linear scan over all pairs; neighbor lists are in
    /// ascending index order and include the point itself. A spatial index
    /// would only change the running time, not the result.
    fn neighborhoods(&self, points: ArrayView2<'_, f64>) -> Vec<Vec<usize>> {
        let n = points.nrows();
        let epsilon = self.params.epsilon_radians();
        let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); n];

        for i in 0..n {
            neighbors[i].push(i);
            for j in (i + 1)..n {
                let angle = haversine_radians(
                    points[[i, LAT_COL]],
                    points[[i, LON_COL]],
                    points[[j, LAT_COL]],
                    points[[j, LON_COL]],
                );
                if angle <= epsilon {
                    neighbors[i].push(j);
                    neighbors[j].push(i);
                }
            }
        }

        neighbors
    }
}

/// Cluster samples by great-circle distance.
///
/// Convenience wrapper over [`GeoDbscan`] matching the pipeline call shape:
/// `epsilon_km` is the maximum neighbor distance in kilometers, `min_samples`
/// the minimum neighborhood size (the point itself included) for a core
/// point.
///
/// # Errors
///
/// Same as [`GeoDbscan::fit`].
pub fn cluster_by_distance(
    coords: &CoordinateMap,
    epsilon_km: f64,
    min_samples: usize,
) -> ClusterResult<PopulationMap> {
    GeoDbscan::new(GeoDbscanParams::new(epsilon_km, min_samples)).fit(coords)
}
