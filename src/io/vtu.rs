//! VTU (VTK Unstructured Grid) file writer

use crate::contact::types::CsaResult;
use crate::error::{CsaError, Result};
use crate::mesh::types::TriangleMesh;
use std::path::{Path, PathBuf};
use vtkio::model::*;

/// Default VTK file format version (2.2 for broad compatibility)
pub const DEFAULT_VTK_VERSION: (u8, u8) = (2, 2);

/// Build an unstructured grid piece holding one triangle cell per face
///
/// Vertices are not shared between cells.
fn triangle_piece(mesh: &TriangleMesh) -> UnstructuredGridPiece {
    let points: Vec<f64> = mesh
        .triangles()
        .iter()
        .flat_map(|t| t.vertices.iter().flat_map(|p| [p.x, p.y, p.z]))
        .collect();

    let num_faces = mesh.num_faces();
    let cells = Cells {
        cell_verts: VertexNumbers::XML {
            connectivity: (0..num_faces as u64 * 3).collect(),
            offsets: (0..num_faces).map(|i| ((i + 1) * 3) as u64).collect(),
        },
        types: vec![CellType::Triangle; num_faces],
    };

    UnstructuredGridPiece {
        points: IOBuffer::F64(points),
        cells,
        data: Attributes::new(),
    }
}

fn scalar_cell_data(name: &str, data: IOBuffer) -> Attribute {
    Attribute::DataArray(DataArray {
        name: name.into(),
        elem: ElementType::Scalars {
            num_comp: 1,
            lookup_table: None,
        },
        data,
    })
}

fn export_piece(
    piece: UnstructuredGridPiece,
    title: String,
    output_path: &Path,
    version: (u8, u8),
) -> Result<()> {
    let vtk = Vtk {
        version: Version::new(version),
        title,
        byte_order: ByteOrder::LittleEndian,
        data: DataSet::UnstructuredGrid {
            pieces: vec![Piece::Inline(Box::new(piece))],
            meta: None,
        },
        file_path: None,
    };

    vtk.export(output_path)
        .map_err(|e| CsaError::VtkError(format!("Failed to write VTU file: {}", e)))?;

    log::info!("Successfully wrote VTU file to {:?}", output_path);
    Ok(())
}

/// Write a triangle mesh to a VTU file, with face areas as cell data
pub fn write_mesh_to_vtu(
    mesh: &TriangleMesh,
    output_path: &Path,
    vtk_version: Option<(u8, u8)>,
) -> Result<()> {
    let version = vtk_version.unwrap_or(DEFAULT_VTK_VERSION);
    log::info!(
        "Writing mesh '{}' with {} faces to {:?} (VTK version {}.{})",
        mesh.name(),
        mesh.num_faces(),
        output_path,
        version.0,
        version.1
    );

    let mut piece = triangle_piece(mesh);
    let areas = mesh
        .triangles()
        .iter()
        .map(|t| crate::mesh::geometry::compute_face_area(t).unwrap_or(0.0))
        .collect();
    piece.data.cell.push(scalar_cell_data("area", IOBuffer::F64(areas)));

    export_piece(piece, format!("Mesh: {}", mesh.name()), output_path, version)
}

/// Write `probe.vtu` (with per-face distance and contact flags), `reference.vtu`
/// and `contact.vtu` (the extracted contact patch) into `output_dir`
///
/// Returns the paths written, probe first.
pub fn write_contact_vtu(
    probe: &TriangleMesh,
    reference: &TriangleMesh,
    result: &CsaResult,
    output_dir: &Path,
    vtk_version: Option<(u8, u8)>,
) -> Result<Vec<PathBuf>> {
    let version = vtk_version.unwrap_or(DEFAULT_VTK_VERSION);
    std::fs::create_dir_all(output_dir)?;

    let probe_path = output_dir.join("probe.vtu");
    let mut piece = triangle_piece(probe);

    piece.data.cell.push(scalar_cell_data(
        "distance",
        IOBuffer::F64(result.distances.values().to_vec()),
    ));

    let flags = (0..probe.num_faces())
        .map(|i| i32::from(result.contact.contains(i)))
        .collect();
    piece.data.cell.push(scalar_cell_data("contact", IOBuffer::I32(flags)));

    let initial_flags = (0..probe.num_faces())
        .map(|i| i32::from(result.initial_contact.contains(i)))
        .collect();
    piece
        .data
        .cell
        .push(scalar_cell_data("initial_contact", IOBuffer::I32(initial_flags)));

    export_piece(
        piece,
        format!("Probe surface with contact data: {}", probe.name()),
        &probe_path,
        version,
    )?;

    let reference_path = output_dir.join("reference.vtu");
    write_mesh_to_vtu(reference, &reference_path, Some(version))?;

    let contact = result.contact_submesh(probe);
    let contact_path = output_dir.join("contact.vtu");
    write_mesh_to_vtu(&contact, &contact_path, Some(version))?;

    Ok(vec![probe_path, reference_path, contact_path])
}
