//! Per-population centroid computation.
//!
//! Reconstructs each population's coordinate subset, computes its geometric
//! centroid, and optionally writes a human-readable log of the point sets and
//! centroids. The centroid of a multi-point set is the arithmetic mean of its
//! coordinates, so one- and two-member populations fall out naturally.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use geo::{Centroid, MultiPoint, Point};
use ndarray::Array2;
use tracing::debug;

use super::coords::{CoordinateMap, LAT_COL, LON_COL};
use super::dbscan::PopulationMap;
use super::error::{ClusterError, ClusterResult};

/// Suffix appended to the caller's base path to form the log file name.
pub const CENTROID_LOG_SUFFIX: &str = ".clusterCentroids.txt";

/// Compute the geometric centroid of every population.
///
/// Populations are processed in the [`PopulationMap`]'s key order. For each,
/// the member coordinate subset is rebuilt from `coords` and reduced to a
/// [`geo::Point`] centroid (x = longitude, y = latitude, the `geo` axis
/// convention). The full centroid map is returned whether or not a log was
/// requested.
///
/// When `out` is given, `<out>.clusterCentroids.txt` is written (replacing
/// any previous file) with one block per population:
///
/// ```text
/// Population=DB_0
/// [[50 10]
///  [50.001 10.001]]
/// Centroid=(50.0005, 10.0005)
/// ```
///
/// The matrix lines and the centroid tuple are rendered in matrix column
/// order, latitude first.
///
/// # Errors
///
/// - [`ClusterError::EmptyCluster`] if any population resolves to zero
///   coordinates. This is an upstream invariant violation and aborts the
///   whole call: no partial centroid map is ever returned.
/// - [`ClusterError::Io`] if the log file cannot be written.
pub fn compute_centroids(
    coords: &CoordinateMap,
    populations: &PopulationMap,
    out: Option<&Path>,
) -> ClusterResult<BTreeMap<String, Point<f64>>> {
    let mut centroids = BTreeMap::new();
    let mut log = String::new();

    for (population, members) in populations {
        let cluster = population_matrix(coords, members);
        if cluster.nrows() == 0 {
            return Err(ClusterError::empty_cluster(population));
        }

        let points: MultiPoint<f64> = cluster
            .rows()
            .into_iter()
            .map(|row| Point::new(row[LON_COL], row[LAT_COL]))
            .collect();
        let centroid = points
            .centroid()
            .ok_or_else(|| ClusterError::empty_cluster(population))?;

        if out.is_some() {
            append_log_block(&mut log, population, &cluster, centroid);
        }
        centroids.insert(population.clone(), centroid);
    }

    if let Some(base) = out {
        let path = log_path(base);
        fs::write(&path, &log)?;
        debug!(
            path = %path.display(),
            populations = centroids.len(),
            "wrote centroid log"
        );
    }

    Ok(centroids)
}

/// Coordinate subset matrix for one population.
///
/// Walks `coords` in sorted key order and keeps the rows whose sample appears
/// in `members`, so subset rows stay aligned with the full matrix ordering
/// regardless of the member list's own order. May be empty; the caller
/// decides whether that is an error.
pub fn population_matrix(coords: &CoordinateMap, members: &[String]) -> Array2<f64> {
    let members: HashSet<&str> = members.iter().map(String::as_str).collect();
    let rows: Vec<(f64, f64)> = coords
        .iter()
        .filter(|(sample, _)| members.contains(sample.as_str()))
        .map(|(_, &pair)| pair)
        .collect();

    let mut matrix = Array2::zeros((rows.len(), 2));
    for (row, &(lat, lon)) in rows.iter().enumerate() {
        matrix[[row, LAT_COL]] = lat;
        matrix[[row, LON_COL]] = lon;
    }
    matrix
}

/// Log file path for a caller-supplied base path.
pub fn log_path(base: &Path) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(CENTROID_LOG_SUFFIX);
    PathBuf::from(name)
}

fn append_log_block(log: &mut String, population: &str, cluster: &Array2<f64>, centroid: Point<f64>) {
    log.push_str(&format!("Population={population}\n"));
    log.push_str(&render_matrix(cluster));
    log.push('\n');
    log.push_str(&format!("Centroid=({}, {})\n", centroid.y(), centroid.x()));
}

/// One bracketed row per line, latitude column first.
fn render_matrix(matrix: &Array2<f64>) -> String {
    let rows: Vec<String> = matrix
        .rows()
        .into_iter()
        .map(|row| format!("[{} {}]", row[LAT_COL], row[LON_COL]))
        .collect();
    format!("[{}]", rows.join("\n "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_point_line() -> (CoordinateMap, PopulationMap) {
        let mut coords = CoordinateMap::new();
        coords.insert("a".to_string(), (0.0, 0.0));
        coords.insert("b".to_string(), (2.0, 0.0));

        let mut populations = PopulationMap::new();
        populations.insert("DB_0".to_string(), vec!["a".to_string(), "b".to_string()]);
        (coords, populations)
    }

    #[test]
    fn centroid_of_two_points_is_their_midpoint() {
        let (coords, populations) = two_point_line();
        let centroids = compute_centroids(&coords, &populations, None).unwrap();

        let centroid = centroids["DB_0"];
        assert!((centroid.y() - 1.0).abs() < 1e-9, "latitude: {}", centroid.y());
        assert!(centroid.x().abs() < 1e-9, "longitude: {}", centroid.x());
    }

    #[test]
    fn centroid_of_a_singleton_is_the_point_itself() {
        let mut coords = CoordinateMap::new();
        coords.insert("only".to_string(), (-33.5, 151.25));
        let mut populations = PopulationMap::new();
        populations.insert("DB_-1".to_string(), vec!["only".to_string()]);

        let centroids = compute_centroids(&coords, &populations, None).unwrap();
        let centroid = centroids["DB_-1"];
        assert_eq!((centroid.y(), centroid.x()), (-33.5, 151.25));
    }

    #[test]
    fn empty_population_aborts_the_whole_call() {
        let (coords, mut populations) = two_point_line();
        populations.insert("DB_7".to_string(), vec!["missing".to_string()]);

        let err = compute_centroids(&coords, &populations, None).unwrap_err();
        assert!(matches!(err, ClusterError::EmptyCluster { .. }));
        assert!(err.to_string().contains("DB_7"), "got: {err}");
    }

    #[test]
    fn subset_rows_follow_coords_order_not_member_order() {
        let mut coords = CoordinateMap::new();
        coords.insert("a".to_string(), (1.0, 10.0));
        coords.insert("b".to_string(), (2.0, 20.0));
        coords.insert("c".to_string(), (3.0, 30.0));

        // Member list deliberately reversed; rows still come out a-then-c.
        let members = vec!["c".to_string(), "a".to_string()];
        let matrix = population_matrix(&coords, &members);

        assert_eq!(matrix.nrows(), 2);
        assert_eq!(matrix[[0, LAT_COL]], 1.0);
        assert_eq!(matrix[[1, LAT_COL]], 3.0);
    }

    #[test]
    fn log_file_carries_one_block_per_population() {
        let (mut coords, mut populations) = two_point_line();
        coords.insert("far".to_string(), (50.0, 50.0));
        populations.insert("DB_-1".to_string(), vec!["far".to_string()]);

        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("run");
        let centroids = compute_centroids(&coords, &populations, Some(&base)).unwrap();
        assert_eq!(centroids.len(), 2);

        let written = fs::read_to_string(log_path(&base)).unwrap();
        assert_eq!(written.matches("Population=").count(), 2);
        assert_eq!(written.matches("Centroid=(").count(), 2);
        assert!(written.contains("Population=DB_-1\n"));
        assert!(written.contains("Centroid=(1, 0)\n"), "log was: {written}");
        assert!(written.contains("[[0 0]\n [2 0]]"), "log was: {written}");
    }

    #[test]
    fn log_file_is_replaced_not_appended() {
        let (coords, populations) = two_point_line();
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("run");

        compute_centroids(&coords, &populations, Some(&base)).unwrap();
        compute_centroids(&coords, &populations, Some(&base)).unwrap();

        let written = fs::read_to_string(log_path(&base)).unwrap();
        assert_eq!(written.matches("Population=").count(), 1);
    }

    #[test]
    fn no_log_path_means_no_file() {
        let (coords, populations) = two_point_line();
        let dir = tempfile::tempdir().unwrap();

        compute_centroids(&coords, &populations, None).unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn log_path_appends_the_suffix() {
        let path = log_path(Path::new("/tmp/analysis/run3"));
        assert_eq!(
            path,
            PathBuf::from("/tmp/analysis/run3.clusterCentroids.txt")
        );
    }
}
