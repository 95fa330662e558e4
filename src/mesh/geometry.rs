//! Geometric operations for mesh faces

use crate::error::{CsaError, Result};
use crate::mesh::types::{Point, Triangle, TriangleMesh, Vec3};

/// Normals shorter than this fraction of the summed edge-product magnitudes are
/// treated as undefined
const DEGENERATE_NORMAL_EPS: f64 = 1e-12;

/// Compute the centroid of a triangle (mean of its three vertices)
pub fn compute_face_centroid(face: &Triangle) -> Point {
    let [v0, v1, v2] = &face.vertices;
    Point::from((v0.coords + v1.coords + v2.coords) / 3.0)
}

/// Compute the unit normal of a triangle
///
/// Returns `None` when the vertices are collinear or coincident.
pub fn compute_face_normal(face: &Triangle) -> Option<Vec3> {
    polygon_normal(&face.vertices)
}

/// Compute the area of a triangle via the projected shoelace formula
pub fn compute_face_area(face: &Triangle) -> Option<f64> {
    polygon_area(&face.vertices)
}

/// Compute the area of face `index` of `mesh`
///
/// Fails with [`CsaError::DegenerateFace`] when the face has no defined normal.
pub fn face_area(mesh: &TriangleMesh, index: usize) -> Result<f64> {
    let face = get_face(mesh, index)?;
    compute_face_area(face).ok_or_else(|| CsaError::DegenerateFace {
        mesh: mesh.name().to_string(),
        face_index: index,
    })
}

/// Unit normal of a planar polygon (Newell's method)
///
/// For a triangle this is the normalized cross product of its two edge vectors.
pub fn polygon_normal(points: &[Point]) -> Option<Vec3> {
    if points.len() < 3 {
        return None;
    }

    let origin = points[0];
    let mut normal = Vec3::zeros();
    let mut scale = 0.0;
    for (i, current) in points.iter().enumerate() {
        let next = &points[(i + 1) % points.len()];
        let (a, b) = (current - origin, next - origin);
        normal += a.cross(&b);
        scale += a.norm() * b.norm();
    }

    let norm = normal.norm();
    if !norm.is_finite() || norm == 0.0 || norm <= DEGENERATE_NORMAL_EPS * scale {
        return None;
    }

    Some(normal / norm)
}

/// Area of a planar polygon
///
/// The vertices are projected onto an orthonormal in-plane basis: a coordinate
/// axis is Gram-Schmidt orthogonalized against the polygon normal to give the
/// first axis, and `normal × first` gives the second. The shoelace formula is
/// then applied to the projected 2-D points.
pub fn polygon_area(points: &[Point]) -> Option<f64> {
    let normal = polygon_normal(points)?;
    let (x_axis, y_axis) = plane_basis(&normal);

    let origin = points[0];
    let projected: Vec<(f64, f64)> = points
        .iter()
        .map(|p| {
            let v = p - origin;
            (v.dot(&x_axis), v.dot(&y_axis))
        })
        .collect();

    let mut twice_area = 0.0;
    for (i, &(x0, y0)) in projected.iter().enumerate() {
        let (x1, y1) = projected[(i + 1) % projected.len()];
        twice_area += x0 * y1 - x1 * y0;
    }

    Some(twice_area.abs() / 2.0)
}

/// Build an orthonormal basis of the plane orthogonal to `normal`
///
/// The reference axis is the coordinate axis least aligned with the normal, so
/// it is never parallel to it.
fn plane_basis(normal: &Vec3) -> (Vec3, Vec3) {
    let abs = normal.abs();
    let reference = if abs.x <= abs.y && abs.x <= abs.z {
        Vec3::x()
    } else if abs.y <= abs.z {
        Vec3::y()
    } else {
        Vec3::z()
    };

    let x_axis = (reference - reference.dot(normal) * normal).normalize();
    let y_axis = normal.cross(&x_axis);
    (x_axis, y_axis)
}

/// Signed volume enclosed by a closed triangle mesh (divergence theorem)
///
/// Sum of signed tetrahedra spanned by each face and the origin. Positive for
/// outward-facing winding; meaningless for open meshes.
pub fn signed_volume(mesh: &TriangleMesh) -> f64 {
    let sum: f64 = mesh
        .triangles()
        .iter()
        .map(|face| {
            let [v0, v1, v2] = &face.vertices;
            v0.coords.dot(&v1.coords.cross(&v2.coords))
        })
        .sum();

    sum / 6.0
}

/// Compute the distance between two points
pub fn distance(p1: &Point, p2: &Point) -> f64 {
    (p2 - p1).norm()
}

/// Helper to safely get a face from a mesh
fn get_face(mesh: &TriangleMesh, index: usize) -> Result<&Triangle> {
    mesh.face(index).ok_or(CsaError::FaceIndexOutOfBounds {
        index,
        face_count: mesh.num_faces(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Rotation3, Unit};

    fn right_triangle_3_4() -> Triangle {
        Triangle::new(
            Point::new(0.0, 0.0, 0.0),
            Point::new(3.0, 0.0, 0.0),
            Point::new(0.0, 4.0, 0.0),
        )
    }

    fn rotate(face: &Triangle, rotation: &Rotation3<f64>, offset: Vec3) -> Triangle {
        let [a, b, c] = face.vertices;
        Triangle::new(
            rotation * a + offset,
            rotation * b + offset,
            rotation * c + offset,
        )
    }

    #[test]
    fn test_face_centroid() {
        let centroid = compute_face_centroid(&right_triangle_3_4());
        assert_relative_eq!(centroid.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(centroid.y, 4.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(centroid.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_face_normal() {
        let normal = compute_face_normal(&right_triangle_3_4()).unwrap();
        assert_relative_eq!(normal.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(normal.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(normal.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_axis_aligned_area() {
        let area = compute_face_area(&right_triangle_3_4()).unwrap();
        assert_relative_eq!(area, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_area_invariant_under_rotation() {
        let face = right_triangle_3_4();
        let axes = [
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-0.3, 0.7, 0.2),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        ];

        for (i, axis) in axes.iter().enumerate() {
            for angle in [0.3, 1.1, 2.5, -0.9] {
                let rotation = Rotation3::from_axis_angle(&Unit::new_normalize(*axis), angle);
                let rotated = rotate(&face, &rotation, Vec3::new(i as f64, -2.0, 5.5));
                let area = compute_face_area(&rotated).unwrap();
                assert_relative_eq!(area, 6.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_area_matches_cross_product() {
        let face = Triangle::new(
            Point::new(0.2, -1.0, 3.0),
            Point::new(2.5, 0.4, 1.0),
            Point::new(-1.0, 2.0, 0.5),
        );
        let [a, b, c] = face.vertices;
        let expected = (b - a).cross(&(c - a)).norm() / 2.0;
        assert_relative_eq!(compute_face_area(&face).unwrap(), expected, epsilon = 1e-10);
    }

    #[test]
    fn test_polygon_area_square() {
        let square = [
            Point::new(0.0, 0.0, 1.0),
            Point::new(2.0, 0.0, 1.0),
            Point::new(2.0, 2.0, 1.0),
            Point::new(0.0, 2.0, 1.0),
        ];
        assert_relative_eq!(polygon_area(&square).unwrap(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tiny_triangle_is_not_degenerate() {
        for scale in [1e-7, 1e-3, 1e5] {
            let face = Triangle::new(
                Point::new(0.0, 0.0, 0.0),
                Point::new(3.0 * scale, 0.0, 0.0),
                Point::new(0.0, 4.0 * scale, 0.0),
            );
            let area = compute_face_area(&face).unwrap();
            assert_relative_eq!(area, 6.0 * scale * scale, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_degenerate_face() {
        let collinear = Triangle::new(
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 1.0, 1.0),
            Point::new(2.0, 2.0, 2.0),
        );
        assert!(compute_face_normal(&collinear).is_none());
        assert!(compute_face_area(&collinear).is_none());

        let mesh = TriangleMesh::new("bad", "bad.stl", vec![collinear]);
        match face_area(&mesh, 0) {
            Err(CsaError::DegenerateFace { face_index, .. }) => assert_eq!(face_index, 0),
            other => panic!("expected degenerate face error, got {:?}", other),
        }
        assert!(matches!(
            face_area(&mesh, 3),
            Err(CsaError::FaceIndexOutOfBounds { index: 3, face_count: 1 })
        ));
    }

    #[test]
    fn test_signed_volume_tetrahedron() {
        let o = Point::new(0.0, 0.0, 0.0);
        let x = Point::new(1.0, 0.0, 0.0);
        let y = Point::new(0.0, 1.0, 0.0);
        let z = Point::new(0.0, 0.0, 1.0);
        // Outward winding
        let mesh = TriangleMesh::new(
            "tet",
            "tet.stl",
            vec![
                Triangle::new(o, y, x),
                Triangle::new(o, x, z),
                Triangle::new(o, z, y),
                Triangle::new(x, y, z),
            ],
        );
        assert_relative_eq!(signed_volume(&mesh), 1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_distance() {
        let p1 = Point::new(0.0, 0.0, 0.0);
        let p2 = Point::new(3.0, 4.0, 0.0);
        assert_relative_eq!(distance(&p1, &p2), 5.0, epsilon = 1e-10);
    }
}
