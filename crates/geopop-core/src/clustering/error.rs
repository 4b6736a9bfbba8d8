//! Error types for the clustering pipeline.
//!
//! Every variant is fatal to the call that raised it. The pipeline never
//! returns a partial result: a malformed point or an empty population aborts
//! the whole operation so the completeness invariant (every sample in exactly
//! one population, every population with exactly one centroid) cannot be
//! silently violated. Only an outermost binary entry point should translate
//! one of these into process termination.

use thiserror::Error;

/// Result alias for clustering operations.
pub type ClusterResult<T> = Result<T, ClusterError>;

/// Errors produced by the clustering pipeline.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// A sample carries a coordinate the pipeline cannot use.
    ///
    /// Raised for non-finite values and for latitudes/longitudes outside
    /// their valid degree ranges.
    #[error("invalid coordinate for sample {sample}: ({lat}, {lon}): {reason}")]
    InvalidCoordinate {
        /// Identifier of the offending sample.
        sample: String,
        /// Latitude as given, degrees.
        lat: f64,
        /// Longitude as given, degrees.
        lon: f64,
        /// What was wrong with the pair.
        reason: String,
    },

    /// No samples were given to cluster.
    #[error("no coordinates to cluster")]
    EmptyInput,

    /// A clustering parameter is outside its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A population resolved to zero member coordinates.
    ///
    /// This is an invariant violation between the clusterer's output and the
    /// centroid calculator's input, not a data condition to skip over.
    #[error("no coordinates in cluster {population}")]
    EmptyCluster {
        /// Identifier of the empty population.
        population: String,
    },

    /// Writing the centroid log failed.
    #[error("centroid log I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClusterError {
    /// Build an [`ClusterError::InvalidCoordinate`] error.
    pub fn invalid_coordinate(
        sample: impl Into<String>,
        lat: f64,
        lon: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidCoordinate {
            sample: sample.into(),
            lat,
            lon,
            reason: reason.into(),
        }
    }

    /// Build an [`ClusterError::InvalidParameter`] error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    /// Build an [`ClusterError::EmptyCluster`] error.
    pub fn empty_cluster(population: impl Into<String>) -> Self {
        Self::EmptyCluster {
            population: population.into(),
        }
    }
}
