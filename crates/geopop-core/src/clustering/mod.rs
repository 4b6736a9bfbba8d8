//! Geographic population clustering pipeline.
//!
//! Three components composed in a straight pipeline:
//!
//! 1. [`coords::coords_to_matrix`] — sample map → index-aligned coordinate
//!    matrix.
//! 2. [`dbscan::GeoDbscan`] — DBSCAN over great-circle distance → population
//!    map.
//! 3. [`centroid::compute_centroids`] — per-population centroids, with an
//!    optional human-readable log.
//!
//! Data flows strictly forward; no component mutates shared state, and each
//! produces a fresh result from its inputs. The only side effect anywhere is
//! the optional centroid log file.

pub mod centroid;
pub mod coords;
pub mod dbscan;
pub mod distance;
pub mod error;

pub use centroid::{compute_centroids, log_path, population_matrix, CENTROID_LOG_SUFFIX};
pub use coords::{coords_to_matrix, CoordinateMap};
pub use dbscan::{
    cluster_by_distance, population_id, GeoDbscan, GeoDbscanParams, PopulationMap, NOISE_LABEL,
};
pub use error::{ClusterError, ClusterResult};
