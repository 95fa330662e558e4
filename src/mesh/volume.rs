//! Enclosed volume of closed meshes

use crate::mesh::geometry::signed_volume;
use crate::mesh::types::TriangleMesh;

/// Computes the volume enclosed by a closed surface
///
/// The pipeline never validates closedness and trusts whatever the
/// implementation returns.
pub trait VolumeCalculator: Send + Sync {
    /// Enclosed volume of `mesh`
    fn volume(&self, mesh: &TriangleMesh) -> f64;
}

/// Divergence-theorem volume (sum of signed origin tetrahedra)
///
/// Takes the absolute value so inside-out winding still yields a positive volume.
#[derive(Debug, Clone, Copy, Default)]
pub struct DivergenceVolume;

impl VolumeCalculator for DivergenceVolume {
    fn volume(&self, mesh: &TriangleMesh) -> f64 {
        signed_volume(mesh).abs()
    }
}
