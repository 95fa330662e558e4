//! Area integration over face-index sets

use crate::error::{CsaError, Result};
use crate::mesh::geometry::face_area;
use crate::mesh::types::TriangleMesh;
use serde::{Deserialize, Serialize};

/// What to do with a face whose normal is undefined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateFacePolicy {
    /// Leave the face out of the sum and report it
    #[default]
    Skip,

    /// Fail the whole integration
    Abort,
}

/// Summed area of a face set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AreaIntegral {
    /// Total area of the non-degenerate faces
    pub area: f64,

    /// Faces skipped because their normal is undefined, in visiting order
    pub degenerate_faces: Vec<usize>,
}

/// Sum the areas of the given faces of `mesh`
///
/// Out-of-range indices are always an error. Degenerate faces are handled
/// according to `policy`.
pub fn integrate_area<I>(mesh: &TriangleMesh, indices: I, policy: DegenerateFacePolicy) -> Result<AreaIntegral>
where
    I: IntoIterator<Item = usize>,
{
    let mut integral = AreaIntegral::default();

    for index in indices {
        match face_area(mesh, index) {
            Ok(area) => integral.area += area,
            Err(CsaError::DegenerateFace { face_index, .. }) if policy == DegenerateFacePolicy::Skip => {
                log::warn!(
                    "Skipping degenerate face {} of mesh '{}'",
                    face_index,
                    mesh.name()
                );
                integral.degenerate_faces.push(face_index);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(integral)
}

/// Total surface area of a mesh
pub fn mesh_area(mesh: &TriangleMesh, policy: DegenerateFacePolicy) -> Result<AreaIntegral> {
    integrate_area(mesh, 0..mesh.num_faces(), policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::types::{Point, Triangle};
    use approx::assert_relative_eq;

    fn square_with_sliver() -> TriangleMesh {
        TriangleMesh::new(
            "square",
            "square.stl",
            vec![
                Triangle::new(
                    Point::new(0.0, 0.0, 0.0),
                    Point::new(1.0, 0.0, 0.0),
                    Point::new(1.0, 1.0, 0.0),
                ),
                Triangle::new(
                    Point::new(0.0, 0.0, 0.0),
                    Point::new(1.0, 1.0, 0.0),
                    Point::new(0.0, 1.0, 0.0),
                ),
                // Zero-area sliver
                Triangle::new(
                    Point::new(0.0, 0.0, 0.0),
                    Point::new(0.5, 0.0, 0.0),
                    Point::new(1.0, 0.0, 0.0),
                ),
            ],
        )
    }

    #[test]
    fn test_integrate_subset() {
        let mesh = square_with_sliver();
        let integral = integrate_area(&mesh, [0], DegenerateFacePolicy::Skip).unwrap();
        assert_relative_eq!(integral.area, 0.5, epsilon = 1e-12);
        assert!(integral.degenerate_faces.is_empty());
    }

    #[test]
    fn test_skip_degenerate() {
        let mesh = square_with_sliver();
        let integral = mesh_area(&mesh, DegenerateFacePolicy::Skip).unwrap();
        assert_relative_eq!(integral.area, 1.0, epsilon = 1e-12);
        assert_eq!(integral.degenerate_faces, vec![2]);
    }

    #[test]
    fn test_abort_on_degenerate() {
        let mesh = square_with_sliver();
        let result = mesh_area(&mesh, DegenerateFacePolicy::Abort);
        assert!(matches!(result, Err(CsaError::DegenerateFace { face_index: 2, .. })));
    }

    #[test]
    fn test_out_of_range_index() {
        let mesh = square_with_sliver();
        let result = integrate_area(&mesh, [7], DegenerateFacePolicy::Skip);
        assert!(matches!(result, Err(CsaError::FaceIndexOutOfBounds { .. })));
    }

    #[test]
    fn test_empty_set_has_zero_area() {
        let mesh = square_with_sliver();
        let integral = integrate_area(&mesh, Vec::new(), DegenerateFacePolicy::Skip).unwrap();
        assert_eq!(integral.area, 0.0);
    }
}
