//! Core mesh data structures

use nalgebra::{Point3, Vector3};
use std::cmp::Ordering;

/// 3D point type
pub type Point = Point3<f64>;

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// Triangle with three vertex positions
///
/// A triangle carries no identifier of its own; its position in the owning
/// [`TriangleMesh`] is its face index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Vertex positions in source winding order
    pub vertices: [Point; 3],
}

impl Triangle {
    /// Create a new triangle
    pub fn new(v0: Point, v1: Point, v2: Point) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Get the three edges as vertex pairs (v0-v1, v1-v2, v2-v0)
    pub fn edges(&self) -> [(&Point, &Point); 3] {
        let [a, b, c] = &self.vertices;
        [(a, b), (b, c), (c, a)]
    }
}

/// Immutable triangulated surface
///
/// Holds the ordered face list together with a display name and the identifier
/// of the source it was loaded from. Face indices are stable for the lifetime
/// of the mesh.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    name: String,
    source: String,
    triangles: Vec<Triangle>,
}

impl TriangleMesh {
    /// Create a mesh from an ordered triangle list
    pub fn new(name: impl Into<String>, source: impl Into<String>, triangles: Vec<Triangle>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            triangles,
        }
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source identifier (path or handle)
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of faces ("dimension")
    pub fn num_faces(&self) -> usize {
        self.triangles.len()
    }

    /// True when the mesh has no faces
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Get a face by index
    pub fn face(&self, index: usize) -> Option<&Triangle> {
        self.triangles.get(index)
    }

    /// All faces in index order
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Build the induced sub-mesh over the given face indices
    ///
    /// Faces keep their relative order; indices outside the mesh are ignored.
    pub fn submesh<I>(&self, name: impl Into<String>, indices: I) -> TriangleMesh
    where
        I: IntoIterator<Item = usize>,
    {
        let triangles = indices
            .into_iter()
            .filter_map(|idx| self.triangles.get(idx).copied())
            .collect();

        TriangleMesh::new(name, self.source.clone(), triangles)
    }
}

/// Probe/reference role assignment for a pair of meshes
#[derive(Debug, Clone)]
pub struct MeshRoles {
    /// Mesh with fewer faces; distances are measured from its faces
    pub probe: TriangleMesh,

    /// The other mesh; distances are measured to its faces
    pub reference: TriangleMesh,
}

impl MeshRoles {
    /// Assign probe and reference roles
    ///
    /// The mesh with the smaller face count becomes the probe. Equal face counts
    /// are broken on `(name, source)` so that the outcome does not depend on
    /// argument order.
    pub fn assign(a: TriangleMesh, b: TriangleMesh) -> Self {
        let order = a
            .num_faces()
            .cmp(&b.num_faces())
            .then_with(|| a.name().cmp(b.name()))
            .then_with(|| a.source().cmp(b.source()));

        if a.num_faces() == b.num_faces() {
            log::warn!(
                "Meshes '{}' and '{}' have the same face count ({}); probe chosen by name",
                a.name(),
                b.name(),
                a.num_faces()
            );
        }

        match order {
            Ordering::Greater => Self {
                probe: b,
                reference: a,
            },
            Ordering::Less | Ordering::Equal => Self {
                probe: a,
                reference: b,
            },
        }
    }
}
