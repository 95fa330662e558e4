//! Contact region metrics

use crate::contact::types::CsaResult;
use crate::mesh::geometry::compute_face_area;
use crate::mesh::types::TriangleMesh;
use serde::{Deserialize, Serialize};

/// Summary statistics of the contact region on the probe surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMetrics {
    /// Total probe surface area
    pub total_area: f64,

    /// Area of contact faces
    pub contact_area: f64,

    /// Area of non-contact faces
    pub non_contact_area: f64,

    /// Contact area as a fraction of the probe area
    pub contact_fraction: f64,

    /// Number of contact faces
    pub num_contact_faces: usize,

    /// Number of contact faces added by fragmentation correction
    pub num_folded_faces: usize,

    /// Average contact distance (area-weighted)
    pub avg_distance: f64,

    /// Standard deviation of contact distance (area-weighted)
    pub std_dev_distance: f64,

    /// Minimum contact distance
    pub min_distance: f64,

    /// Maximum contact distance
    pub max_distance: f64,
}

impl ContactMetrics {
    /// Compute metrics for a finished run over its probe mesh
    pub fn compute(result: &CsaResult, probe: &TriangleMesh) -> Self {
        let mut weighted_distance_sum = 0.0;
        let mut weight_sum = 0.0;
        let mut min_dist = f64::MAX;
        let mut max_dist = f64::MIN;
        let mut samples = Vec::with_capacity(result.contact.len());

        for face_idx in result.contact.iter() {
            let Some(distance) = result.distances.get(face_idx) else {
                continue;
            };
            // Degenerate faces carry no weight
            let area = probe
                .face(face_idx)
                .and_then(compute_face_area)
                .unwrap_or(0.0);

            weighted_distance_sum += distance * area;
            weight_sum += area;
            min_dist = min_dist.min(distance);
            max_dist = max_dist.max(distance);
            samples.push((distance, area));
        }

        let avg_distance = if weight_sum > 0.0 {
            weighted_distance_sum / weight_sum
        } else {
            0.0
        };

        let variance_sum: f64 = samples
            .iter()
            .map(|&(d, area)| (d - avg_distance) * (d - avg_distance) * area)
            .sum();
        let std_dev_distance = if weight_sum > 0.0 {
            (variance_sum / weight_sum).sqrt()
        } else {
            0.0
        };

        let contact_fraction = if result.probe_area > 0.0 {
            result.contact_area / result.probe_area
        } else {
            0.0
        };

        let has_contact = !samples.is_empty();

        Self {
            total_area: result.probe_area,
            contact_area: result.contact_area,
            non_contact_area: result.probe_area - result.contact_area,
            contact_fraction,
            num_contact_faces: result.contact.len(),
            num_folded_faces: result.num_folded_faces(),
            avg_distance,
            std_dev_distance,
            min_distance: if has_contact { min_dist } else { 0.0 },
            max_distance: if has_contact { max_dist } else { 0.0 },
        }
    }

    /// Print metrics summary
    pub fn print_summary(&self, surface_name: &str) {
        println!("\n{}", "=".repeat(60));
        println!("CONTACT METRICS: {}", surface_name);
        println!("{}", "=".repeat(60));
        println!();
        println!("  Total Area:        {:.6}", self.total_area);
        println!("  Contact Area:      {:.6}  ({:.1}%)", self.contact_area, self.contact_fraction * 100.0);
        println!("  Non-contact Area:  {:.6}", self.non_contact_area);
        println!();
        println!("  Contact Faces:     {}", self.num_contact_faces);
        println!("  Folded Faces:      {}", self.num_folded_faces);
        println!();

        if self.num_contact_faces > 0 {
            println!("  Distance Statistics (area-weighted):");
            println!("    Average:   {:.6}", self.avg_distance);
            println!("    Std Dev:   {:.6}", self.std_dev_distance);
            println!("    Min:       {:.6}", self.min_distance);
            println!("    Max:       {:.6}", self.max_distance);
            println!();
        }

        println!("{}", "=".repeat(60));
    }
}
