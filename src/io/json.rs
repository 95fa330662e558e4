//! Simple JSON triangle mesh format for fixtures and tests

use crate::error::{CsaError, Result};
use crate::mesh::{Point, Triangle, TriangleMesh};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
struct JsonMesh {
    #[serde(default)]
    name: Option<String>,
    triangles: Vec<[[f64; 3]; 3]>,
}

/// Load a mesh from a JSON document `{ "triangles": [[[x, y, z], ...], ...] }`
///
/// `name` overrides the name stored in the file.
pub fn read_json_mesh<P: AsRef<Path>>(path: P, name: Option<&str>) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let source = path.display().to_string();

    let file = File::open(path)
        .map_err(|e| CsaError::mesh_load(&source, format!("cannot read file: {}", e)))?;

    let reader = BufReader::new(file);
    let json_mesh: JsonMesh = serde_json::from_reader(reader)
        .map_err(|e| CsaError::mesh_load(&source, format!("invalid JSON mesh: {}", e)))?;

    if json_mesh.triangles.is_empty() {
        return Err(CsaError::mesh_load(&source, "file contains no faces"));
    }

    let triangles = json_mesh
        .triangles
        .into_iter()
        .map(|[a, b, c]| Triangle::new(Point::from(a), Point::from(b), Point::from(c)))
        .collect();

    let name = name
        .map(str::to_string)
        .or(json_mesh.name)
        .unwrap_or_else(|| file_stem(path));

    Ok(TriangleMesh::new(name, source, triangles))
}

/// Write a mesh as a JSON document
pub fn write_json_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let json_mesh = JsonMesh {
        name: Some(mesh.name().to_string()),
        triangles: mesh
            .triangles()
            .iter()
            .map(|t| t.vertices.map(|v| [v.x, v.y, v.z]))
            .collect(),
    };

    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &json_mesh)?;

    Ok(())
}

/// File name without extension, used as the default mesh name
pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh")
        .to_string()
}
