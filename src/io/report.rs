//! JSON report export for contact surface area results

use crate::config::CsaConfig;
use crate::contact::metrics::ContactMetrics;
use crate::contact::types::CsaResult;
use crate::error::Result;
use crate::mesh::types::MeshRoles;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete record of one contact surface area run
#[derive(Debug, Serialize, Deserialize)]
pub struct CsaReport {
    /// Timestamp when the analysis was performed (RFC 3339)
    pub timestamp: String,

    /// Configuration the pipeline ran with
    pub config: CsaConfig,

    pub probe: SurfaceInfo,
    pub reference: SurfaceInfo,

    pub threshold: ThresholdInfo,

    /// Contact surface area after fragmentation correction
    pub contact_area: f64,

    /// Contact area of the threshold classification alone
    pub initial_contact_area: f64,

    pub num_contact_faces: usize,
    pub num_initial_contact_faces: usize,
    pub num_components: usize,

    pub metrics: ContactMetrics,
}

/// Per-mesh information
#[derive(Debug, Serialize, Deserialize)]
pub struct SurfaceInfo {
    pub name: String,
    pub source: String,
    pub total_faces: usize,
    pub area: f64,
    pub volume: f64,
    pub degenerate_faces: Vec<usize>,
}

/// Fitted threshold
#[derive(Debug, Serialize, Deserialize)]
pub struct ThresholdInfo {
    pub soft_cap: f64,
    pub value: f64,
    pub split_index: usize,
    pub residual: f64,
    pub samples: usize,
}

impl CsaReport {
    /// Build a report from a finished run over `roles`
    pub fn new(config: &CsaConfig, result: &CsaResult, roles: &MeshRoles) -> Self {
        let fit = &result.threshold;

        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            config: config.clone(),
            probe: SurfaceInfo {
                name: result.probe_name.clone(),
                source: roles.probe.source().to_string(),
                total_faces: roles.probe.num_faces(),
                area: result.probe_area,
                volume: result.probe_volume,
                degenerate_faces: result.degenerate_probe_faces.clone(),
            },
            reference: SurfaceInfo {
                name: result.reference_name.clone(),
                source: roles.reference.source().to_string(),
                total_faces: roles.reference.num_faces(),
                area: result.reference_area,
                volume: result.reference_volume,
                degenerate_faces: result.degenerate_reference_faces.clone(),
            },
            threshold: ThresholdInfo {
                soft_cap: result.soft_cap,
                value: fit.threshold,
                split_index: fit.split_index,
                residual: fit.residual,
                samples: fit.samples,
            },
            contact_area: result.contact_area,
            initial_contact_area: result.initial_contact_area,
            num_contact_faces: result.contact.len(),
            num_initial_contact_faces: result.initial_contact.len(),
            num_components: result.components.len(),
            metrics: ContactMetrics::compute(result, &roles.probe),
        }
    }

    /// Export the report to a JSON file
    pub fn export<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
