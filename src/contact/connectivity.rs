//! Connectivity of the non-contact region
//!
//! The non-contact faces of the probe are turned into an undirected graph over
//! their vertex positions, with one edge per triangle side. Vertices are
//! identified by exact coordinate equality, so two faces are connected only if
//! they share a bit-identical vertex position.

use crate::contact::types::ContactFaceSet;
use crate::mesh::types::{Point, TriangleMesh};
use std::collections::{BTreeSet, HashMap, VecDeque};

/// Hashable identity of a vertex position
///
/// The raw bit pattern of each coordinate, with `-0.0` folded onto `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexKey([u64; 3]);

impl VertexKey {
    /// Key for a vertex position
    pub fn from_point(p: &Point) -> Self {
        // Adding +0.0 maps -0.0 to +0.0 and leaves every other value unchanged
        Self([(p.x + 0.0).to_bits(), (p.y + 0.0).to_bits(), (p.z + 0.0).to_bits()])
    }
}

/// Vertex graph of the non-contact faces
#[derive(Debug, Clone, Default)]
pub struct VertexGraph {
    /// Vertex key -> node id, node ids assigned in first-seen order
    node_ids: HashMap<VertexKey, usize>,

    /// For each node, the adjacent node ids
    adjacent: Vec<Vec<usize>>,

    /// For each node, the non-contact faces touching it
    node_faces: Vec<Vec<usize>>,
}

impl VertexGraph {
    /// Build the graph over the probe faces that are not in `contact`
    pub fn build(mesh: &TriangleMesh, contact: &ContactFaceSet) -> Self {
        let mut graph = Self::default();

        for (face_idx, face) in mesh.triangles().iter().enumerate() {
            if contact.contains(face_idx) {
                continue;
            }

            // Each vertex starts exactly one edge
            for (start, end) in face.edges() {
                let from = graph.node_for(start);
                let to = graph.node_for(end);
                graph.adjacent[from].push(to);
                graph.adjacent[to].push(from);
                graph.node_faces[from].push(face_idx);
            }
        }

        for adj_list in &mut graph.adjacent {
            adj_list.sort_unstable();
            adj_list.dedup();
        }

        graph
    }

    /// Number of distinct vertex positions
    pub fn num_vertices(&self) -> usize {
        self.adjacent.len()
    }

    /// True when no non-contact face exists
    pub fn is_empty(&self) -> bool {
        self.adjacent.is_empty()
    }

    /// Faces touching a vertex position
    pub fn faces_at(&self, key: &VertexKey) -> &[usize] {
        self.node_ids
            .get(key)
            .map(|&node| self.node_faces[node].as_slice())
            .unwrap_or(&[])
    }

    /// Face sets of the connected components, in order of first appearance
    pub fn connected_components(&self) -> Vec<BTreeSet<usize>> {
        let mut visited = vec![false; self.adjacent.len()];
        let mut components = Vec::new();

        for start in 0..self.adjacent.len() {
            if visited[start] {
                continue;
            }

            let mut faces = BTreeSet::new();
            let mut queue = VecDeque::from([start]);
            visited[start] = true;

            while let Some(node) = queue.pop_front() {
                faces.extend(self.node_faces[node].iter().copied());
                for &neighbor in &self.adjacent[node] {
                    if !visited[neighbor] {
                        visited[neighbor] = true;
                        queue.push_back(neighbor);
                    }
                }
            }

            components.push(faces);
        }

        components
    }

    fn node_for(&mut self, vertex: &Point) -> usize {
        let key = VertexKey::from_point(vertex);
        if let Some(&node) = self.node_ids.get(&key) {
            return node;
        }

        let node = self.adjacent.len();
        self.node_ids.insert(key, node);
        self.adjacent.push(Vec::new());
        self.node_faces.push(Vec::new());
        node
    }
}

/// Connected components of the non-contact faces of `mesh`
pub fn find_non_contact_components(
    mesh: &TriangleMesh,
    contact: &ContactFaceSet,
) -> Vec<BTreeSet<usize>> {
    let graph = VertexGraph::build(mesh, contact);
    let components = graph.connected_components();

    log::info!(
        "Non-contact region: {} vertices, {} connected component(s)",
        graph.num_vertices(),
        components.len()
    );

    components
}
