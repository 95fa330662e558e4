//! I/O module for reading and writing mesh files

pub mod json;
pub mod report;
pub mod stl;
pub mod vtu;

pub use json::{read_json_mesh, write_json_mesh};
pub use report::CsaReport;
pub use stl::{parse_stl, read_stl, write_stl};
pub use vtu::{write_contact_vtu, write_mesh_to_vtu, DEFAULT_VTK_VERSION};

use crate::error::{CsaError, Result};
use crate::mesh::types::TriangleMesh;
use std::path::Path;

/// Load a mesh, choosing the format from the file extension
///
/// Without `name` the mesh is named after the file stem.
pub fn read_mesh<P: AsRef<Path>>(path: P, name: Option<&str>) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("stl") => {
            let name = name.map(str::to_string).unwrap_or_else(|| json::file_stem(path));
            read_stl(path, &name)
        }
        Some("json") => read_json_mesh(path, name),
        _ => Err(CsaError::mesh_load(
            path.display().to_string(),
            "unsupported mesh format (expected .stl or .json)",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_mesh_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Liver.STL");
        std::fs::write(
            &path,
            "solid t\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\nendsolid t\n",
        )
        .unwrap();

        let mesh = read_mesh(&path, None).unwrap();
        assert_eq!(mesh.name(), "Liver");
        assert_eq!(mesh.num_faces(), 1);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = read_mesh("organ.obj", None);
        assert!(matches!(result, Err(CsaError::MeshLoadError { .. })));
    }
}
