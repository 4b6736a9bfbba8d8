//! Geopop Core Library
//!
//! Clusters georeferenced samples into discrete populations with DBSCAN over
//! great-circle (haversine) distance, then computes one representative
//! centroid per population. Intended for analysts with a set of samples
//! (unique identifier plus a latitude/longitude pair, decimal degrees) who
//! want spatial groups without pre-specifying their number.
//!
//! # Pipeline
//!
//! Raw coordinate map → numeric matrix → cluster labels → population map →
//! per-population centroids. Points in low-density regions are labeled noise
//! and collected under the `"DB_-1"` population rather than discarded.
//!
//! # Example
//!
//! ```
//! use geopop_core::{cluster_by_distance, compute_centroids, CoordinateMap};
//!
//! let mut coords = CoordinateMap::new();
//! coords.insert("A".into(), (10.0, 50.0));
//! coords.insert("B".into(), (10.001, 50.001));
//! coords.insert("C".into(), (80.0, -10.0));
//!
//! // Samples within 1 km of a neighbor (2 needed for a core point) group
//! // together; C is noise and lands in "DB_-1".
//! let populations = cluster_by_distance(&coords, 1.0, 2)?;
//! assert_eq!(populations.len(), 2);
//!
//! let centroids = compute_centroids(&coords, &populations, None)?;
//! assert_eq!(centroids.len(), populations.len());
//! # Ok::<(), geopop_core::ClusterError>(())
//! ```

pub mod clustering;

// Re-exports for convenience
pub use clustering::centroid::{compute_centroids, population_matrix};
pub use clustering::coords::{coords_to_matrix, CoordinateMap};
pub use clustering::dbscan::{cluster_by_distance, GeoDbscan, GeoDbscanParams, PopulationMap};
pub use clustering::error::{ClusterError, ClusterResult};
