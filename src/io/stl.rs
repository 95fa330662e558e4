//! STL (Stereolithography) reader and writer
//!
//! Both encodings are supported on input:
//! - Binary: 80-byte header, little-endian `u32` face count, then 50 bytes per
//!   face (normal, three `f32` vertices, attribute byte count).
//! - ASCII: `solid` / `facet normal` / `outer loop` / three `vertex` lines /
//!   `endloop` / `endfacet` ... `endsolid`.
//!
//! Faces are kept in file order, which becomes their face index. Stored normals
//! are ignored.

use crate::error::{CsaError, Result};
use crate::mesh::geometry::compute_face_normal;
use crate::mesh::types::{Point, Triangle, TriangleMesh, Vec3};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// STL binary header size in bytes
const HEADER_SIZE: usize = 80;

/// Size of one triangle record in binary STL
const TRIANGLE_SIZE: usize = 50;

/// Load a triangle mesh from an STL file
///
/// Any failure, including a file without faces, is reported as
/// [`CsaError::MeshLoadError`].
pub fn read_stl<P: AsRef<Path>>(path: P, name: &str) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let source = path.display().to_string();

    let bytes = std::fs::read(path)
        .map_err(|e| CsaError::mesh_load(&source, format!("cannot read file: {}", e)))?;

    let mesh = parse_stl(&bytes, name, &source)?;

    log::info!(
        "Loaded '{}' from {} ({} faces)",
        mesh.name(),
        source,
        mesh.num_faces()
    );

    Ok(mesh)
}

/// Parse an in-memory STL document
pub fn parse_stl(bytes: &[u8], name: &str, source: &str) -> Result<TriangleMesh> {
    let triangles = if is_binary(bytes) {
        parse_binary(bytes, source)?
    } else {
        parse_ascii(bytes, source)?
    };

    if triangles.is_empty() {
        return Err(CsaError::mesh_load(source, "file contains no faces"));
    }

    Ok(TriangleMesh::new(name, source, triangles))
}

/// Binary unless the document starts with "solid" and is too short to hold
/// the face count declared at offset 80
///
/// Some binary files start their header with "solid", and some carry trailing
/// bytes after the last record, so neither the keyword nor an exact size is
/// enough on its own.
fn is_binary(bytes: &[u8]) -> bool {
    if !starts_with_solid(bytes) {
        return true;
    }
    match declared_face_count(bytes).and_then(|count| count.checked_mul(TRIANGLE_SIZE)) {
        Some(payload) => bytes.len() >= HEADER_SIZE + 4 + payload,
        None => false,
    }
}

fn declared_face_count(bytes: &[u8]) -> Option<usize> {
    let raw = bytes.get(HEADER_SIZE..HEADER_SIZE + 4)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize)
}

fn starts_with_solid(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(HEADER_SIZE)];
    String::from_utf8_lossy(head).trim_start().starts_with("solid")
}

fn parse_binary(bytes: &[u8], source: &str) -> Result<Vec<Triangle>> {
    let count = declared_face_count(bytes)
        .ok_or_else(|| CsaError::mesh_load(source, "binary header truncated"))?;

    let body = &bytes[HEADER_SIZE + 4..];
    if body.len() < count * TRIANGLE_SIZE {
        return Err(CsaError::mesh_load(
            source,
            format!(
                "expected {} faces, file holds {}",
                count,
                body.len() / TRIANGLE_SIZE
            ),
        ));
    }

    Ok(body
        .chunks_exact(TRIANGLE_SIZE)
        .take(count)
        .map(|record| {
            // Skip the 12-byte normal
            Triangle::new(
                read_vertex(&record[12..24]),
                read_vertex(&record[24..36]),
                read_vertex(&record[36..48]),
            )
        })
        .collect())
}

/// Read a vertex from 12 bytes (3 little-endian f32s)
fn read_vertex(buf: &[u8]) -> Point {
    let coord = |i: usize| {
        f64::from(f32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]))
    };
    Point::new(coord(0), coord(4), coord(8))
}

fn parse_ascii(bytes: &[u8], source: &str) -> Result<Vec<Triangle>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| CsaError::mesh_load(source, format!("invalid UTF-8: {}", e)))?;

    let mut triangles = Vec::new();
    let mut vertices: Vec<Point> = Vec::with_capacity(3);
    let mut in_loop = false;

    for (line_no, line) in text.lines().enumerate() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(keyword) = parts.first() else {
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "outer" => {
                in_loop = true;
                vertices.clear();
            }
            "vertex" => {
                if !in_loop || parts.len() < 4 {
                    return Err(CsaError::mesh_load(
                        source,
                        format!("line {}: malformed vertex", line_no + 1),
                    ));
                }
                let mut coords = [0.0; 3];
                for (slot, token) in coords.iter_mut().zip(&parts[1..4]) {
                    *slot = token.parse().map_err(|_| {
                        CsaError::mesh_load(
                            source,
                            format!("line {}: invalid coordinate '{}'", line_no + 1, token),
                        )
                    })?;
                }
                vertices.push(Point::new(coords[0], coords[1], coords[2]));
            }
            "endloop" => in_loop = false,
            "endfacet" => {
                if vertices.len() != 3 {
                    return Err(CsaError::mesh_load(
                        source,
                        format!(
                            "line {}: facet has {} vertices, expected 3",
                            line_no + 1,
                            vertices.len()
                        ),
                    ));
                }
                triangles.push(Triangle::new(vertices[0], vertices[1], vertices[2]));
                vertices.clear();
            }
            "endsolid" => break,
            _ => {}
        }
    }

    Ok(triangles)
}

/// Save a mesh as binary STL
///
/// Coordinates are narrowed to `f32` as the format requires.
pub fn write_stl<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);

    let mut header = [b' '; HEADER_SIZE];
    let text = format!("binary STL: {}", mesh.name());
    let len = text.len().min(HEADER_SIZE);
    header[..len].copy_from_slice(&text.as_bytes()[..len]);
    writer.write_all(&header)?;

    let count = u32::try_from(mesh.num_faces()).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("mesh '{}' has too many faces for STL", mesh.name()),
        )
    })?;
    writer.write_all(&count.to_le_bytes())?;

    for face in mesh.triangles() {
        let normal = compute_face_normal(face).unwrap_or_else(Vec3::zeros);
        write_f32_triplet(&mut writer, normal.x, normal.y, normal.z)?;
        for v in &face.vertices {
            write_f32_triplet(&mut writer, v.x, v.y, v.z)?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    writer.flush()?;
    Ok(())
}

fn write_f32_triplet<W: Write>(writer: &mut W, x: f64, y: f64, z: f64) -> Result<()> {
    for c in [x, y, z] {
        writer.write_all(&(c as f32).to_le_bytes())?;
    }
    Ok(())
}
