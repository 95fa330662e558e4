//! Per-face nearest centroid distances from the probe to the reference mesh

use crate::contact::types::DistanceField;
use crate::error::{CsaError, Result};
use crate::mesh::geometry::{compute_face_centroid, distance};
use crate::mesh::types::{Point, TriangleMesh};
use kiddo::ImmutableKdTree;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Nearest-centroid search strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMethod {
    /// Scan every reference centroid for every probe face
    #[default]
    BruteForce,

    /// Query a k-d tree built over the reference centroids
    KdTree,
}

/// Compute the distance field of `probe` against `reference`
///
/// Entry `i` is the minimum Euclidean distance from the centroid of probe face
/// `i` to any reference face centroid. Faces are processed independently and
/// the output is always in probe face order, whatever the execution order.
pub fn compute_distance_field(
    probe: &TriangleMesh,
    reference: &TriangleMesh,
    method: DistanceMethod,
    parallel_threshold: usize,
) -> Result<DistanceField> {
    if reference.is_empty() {
        return Err(CsaError::EmptyReferenceMesh {
            mesh: reference.name().to_string(),
        });
    }

    log::info!(
        "Computing distances from {} faces of '{}' to {} faces of '{}' ({:?})",
        probe.num_faces(),
        probe.name(),
        reference.num_faces(),
        reference.name(),
        method
    );

    let probe_centroids = face_centroids(probe);
    let reference_centroids = face_centroids(reference);

    let distances = match method {
        DistanceMethod::BruteForce => map_faces(&probe_centroids, parallel_threshold, |c| {
            nearest_distance_brute_force(c, &reference_centroids)
        }),
        DistanceMethod::KdTree => {
            let tree = build_centroid_kdtree(&reference_centroids);
            map_faces(&probe_centroids, parallel_threshold, |c| {
                nearest_distance_kdtree(c, &tree)
            })
        }
    };

    log::debug!("Distance field complete ({} entries)", distances.len());

    Ok(DistanceField::new(distances))
}

/// Centroid of every face, in face order
pub fn face_centroids(mesh: &TriangleMesh) -> Vec<Point> {
    mesh.triangles().iter().map(compute_face_centroid).collect()
}

/// Apply `f` to every probe centroid, in parallel for large inputs
fn map_faces<F>(centroids: &[Point], parallel_threshold: usize, f: F) -> Vec<f64>
where
    F: Fn(&Point) -> f64 + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        if centroids.len() >= parallel_threshold {
            return centroids.par_iter().map(|c| f(c)).collect();
        }
    }

    #[cfg(not(feature = "parallel"))]
    let _ = parallel_threshold;

    centroids.iter().map(f).collect()
}

/// Minimum distance from `query` to any of `targets` by exhaustive scan
fn nearest_distance_brute_force(query: &Point, targets: &[Point]) -> f64 {
    targets
        .iter()
        .map(|t| distance(query, t))
        .fold(f64::INFINITY, f64::min)
}

/// Minimum distance from `query` to the centroids indexed by `tree`
fn nearest_distance_kdtree(query: &Point, tree: &ImmutableKdTree<f64, 3>) -> f64 {
    let nearest = tree.nearest_one::<kiddo::SquaredEuclidean>(&[query.x, query.y, query.z]);
    nearest.distance.sqrt()
}

/// Build a k-d tree over centroids (indices are implicit: 0, 1, 2, ...)
fn build_centroid_kdtree(centroids: &[Point]) -> ImmutableKdTree<f64, 3> {
    let points: Vec<[f64; 3]> = centroids.iter().map(|c| [c.x, c.y, c.z]).collect();
    ImmutableKdTree::new_from_slice(&points)
}
