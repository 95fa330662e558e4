//! Contact surface area pipeline
//!
//! Stages run strictly in order, each consuming the previous stage's output:
//! distances, threshold, classification, connectivity (with fragmentation
//! correction), then whole-surface area and volume integration. Only the distance stage is parallel, and
//! it completes fully before the threshold stage starts.
//!
//! Progress is reported as an ordered event stream over an mpsc channel: one
//! `StageStarted` per stage reached, then exactly one terminal event
//! (`Finished` or `Failed`), then `End`.

use crate::config::CsaConfig;
use crate::contact::classify::classify_contact_faces;
use crate::contact::connectivity::find_non_contact_components;
use crate::contact::correction::{correct_fragmentation, tag_components};
use crate::contact::distance::compute_distance_field;
use crate::contact::threshold::select_threshold;
use crate::contact::types::{CsaResult, Stage};
use crate::error::Result;
use crate::mesh::area::{integrate_area, mesh_area};
use crate::mesh::types::MeshRoles;
use crate::mesh::volume::{DivergenceVolume, VolumeCalculator};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Event emitted by a running pipeline
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A stage has begun
    StageStarted(Stage),

    /// The pipeline completed
    Finished(Box<CsaResult>),

    /// The pipeline aborted; no result follows
    Failed {
        stage: Option<Stage>,
        message: String,
    },

    /// End of stream; nothing is sent after this
    End,
}

/// Contact surface area pipeline
#[derive(Debug, Clone)]
pub struct CsaPipeline<V = DivergenceVolume> {
    config: CsaConfig,
    volume: V,
}

impl CsaPipeline<DivergenceVolume> {
    /// Create a pipeline with the default volume calculator
    pub fn new(config: CsaConfig) -> Self {
        Self {
            config,
            volume: DivergenceVolume,
        }
    }
}

impl<V: VolumeCalculator> CsaPipeline<V> {
    /// Replace the volume calculator
    pub fn with_volume_calculator<W: VolumeCalculator>(self, volume: W) -> CsaPipeline<W> {
        CsaPipeline {
            config: self.config,
            volume,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &CsaConfig {
        &self.config
    }

    /// Run the pipeline without progress reporting
    pub fn run(&self, roles: &MeshRoles) -> Result<CsaResult> {
        self.execute(roles, |_| {})
    }

    /// Run the pipeline, reporting progress on `events`
    ///
    /// A disconnected receiver does not stop the pipeline.
    pub fn run_with_progress(
        &self,
        roles: &MeshRoles,
        events: &Sender<ProgressEvent>,
    ) -> Result<CsaResult> {
        let mut current = None;
        let outcome = self.execute(roles, |stage| {
            current = Some(stage);
            let _ = events.send(ProgressEvent::StageStarted(stage));
        });

        let terminal = match &outcome {
            Ok(result) => ProgressEvent::Finished(Box::new(result.clone())),
            Err(e) => ProgressEvent::Failed {
                stage: current,
                message: e.to_string(),
            },
        };
        let _ = events.send(terminal);
        let _ = events.send(ProgressEvent::End);

        outcome
    }

    fn execute<F>(&self, roles: &MeshRoles, mut on_stage: F) -> Result<CsaResult>
    where
        F: FnMut(Stage),
    {
        self.config.validate()?;

        let probe = &roles.probe;
        let reference = &roles.reference;
        let policy = self.config.degenerate_policy;

        log::info!(
            "Contact surface area of '{}' ({} faces) against '{}' ({} faces)",
            probe.name(),
            probe.num_faces(),
            reference.name(),
            reference.num_faces()
        );

        on_stage(Stage::Distances);
        let distances = compute_distance_field(
            probe,
            reference,
            self.config.distance_method,
            self.config.parallel_threshold,
        )?;

        on_stage(Stage::Threshold);
        let threshold = select_threshold(&distances, self.config.soft_cap)?;

        on_stage(Stage::Classification);
        let initial_contact = classify_contact_faces(&distances, threshold.threshold);
        let initial_area = integrate_area(probe, initial_contact.iter(), policy)?;

        on_stage(Stage::Connectivity);
        let components = tag_components(
            find_non_contact_components(probe, &initial_contact),
            &distances,
        );
        let contact = correct_fragmentation(&initial_contact, &components);
        let contact_area = integrate_area(probe, contact.iter(), policy)?;

        on_stage(Stage::Area);
        let probe_area = mesh_area(probe, policy)?;
        let reference_area = mesh_area(reference, policy)?;
        let probe_volume = self.volume.volume(probe);
        let reference_volume = self.volume.volume(reference);

        log::info!(
            "Contact surface area {:.6} over {} faces",
            contact_area.area,
            contact.len()
        );

        Ok(CsaResult {
            probe_name: probe.name().to_string(),
            reference_name: reference.name().to_string(),
            soft_cap: self.config.soft_cap,
            distances,
            threshold,
            initial_contact,
            components,
            contact,
            contact_area: contact_area.area,
            initial_contact_area: initial_area.area,
            probe_area: probe_area.area,
            reference_area: reference_area.area,
            probe_volume,
            reference_volume,
            degenerate_probe_faces: probe_area.degenerate_faces,
            degenerate_reference_faces: reference_area.degenerate_faces,
        })
    }
}

/// Handle to a pipeline running on a worker thread
pub struct PipelineHandle {
    /// Progress events, ending with [`ProgressEvent::End`]
    pub events: Receiver<ProgressEvent>,

    worker: JoinHandle<MeshRoles>,
}

impl PipelineHandle {
    /// Wait for the worker and take back the meshes
    pub fn join(self) -> Result<MeshRoles> {
        self.worker.join().map_err(|_| crate::error::CsaError::PipelineError {
            stage: "worker".to_string(),
            message: "pipeline worker thread panicked".to_string(),
        })
    }
}

impl<V: VolumeCalculator + 'static> CsaPipeline<V> {
    /// Run the pipeline on a worker thread
    ///
    /// The outcome is delivered through the event stream; the meshes are
    /// handed back by [`PipelineHandle::join`].
    pub fn spawn(self, roles: MeshRoles) -> PipelineHandle {
        let (sender, receiver) = mpsc::channel();
        let worker = thread::spawn(move || {
            let _ = self.run_with_progress(&roles, &sender);
            roles
        });

        PipelineHandle {
            events: receiver,
            worker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CsaError;
    use crate::mesh::area::DegenerateFacePolicy;
    use crate::mesh::types::{Point, Triangle, TriangleMesh};

    /// Flat grid of `n x n` unit squares (two triangles each) at height `z`
    fn grid(name: &str, n: usize, z: f64) -> TriangleMesh {
        let mut triangles = Vec::new();
        for i in 0..n {
            for j in 0..n {
                let (x, y) = (i as f64, j as f64);
                let p00 = Point::new(x, y, z);
                let p10 = Point::new(x + 1.0, y, z);
                let p01 = Point::new(x, y + 1.0, z);
                let p11 = Point::new(x + 1.0, y + 1.0, z);
                triangles.push(Triangle::new(p00, p10, p11));
                triangles.push(Triangle::new(p00, p11, p01));
            }
        }
        TriangleMesh::new(name, format!("{}.stl", name), triangles)
    }

    /// Sheet bent away from a floor at z = 0: the first columns lie on it,
    /// the rest climb steeply
    fn bent_sheet() -> TriangleMesh {
        let mut triangles = Vec::new();
        let height = |i: usize| if i < 3 { 0.0 } else { (i - 2) as f64 * 1.5 };
        for i in 0..8 {
            for j in 0..4 {
                let (x, y) = (i as f64, j as f64);
                let p00 = Point::new(x, y, height(i));
                let p10 = Point::new(x + 1.0, y, height(i + 1));
                let p01 = Point::new(x, y + 1.0, height(i));
                let p11 = Point::new(x + 1.0, y + 1.0, height(i + 1));
                triangles.push(Triangle::new(p00, p10, p11));
                triangles.push(Triangle::new(p00, p11, p01));
            }
        }
        TriangleMesh::new("sheet", "sheet.stl", triangles)
    }

    #[test]
    fn test_event_order_on_success() {
        let roles = MeshRoles::assign(bent_sheet(), grid("floor", 10, 0.0));

        let (tx, rx) = mpsc::channel();
        let result = CsaPipeline::new(CsaConfig::default()).run_with_progress(&roles, &tx);
        assert!(result.is_ok());
        drop(tx);

        let events: Vec<ProgressEvent> = rx.iter().collect();
        assert_eq!(events.len(), 7);
        assert!(matches!(events[0], ProgressEvent::StageStarted(Stage::Distances)));
        assert!(matches!(events[1], ProgressEvent::StageStarted(Stage::Threshold)));
        assert!(matches!(events[2], ProgressEvent::StageStarted(Stage::Classification)));
        assert!(matches!(events[3], ProgressEvent::StageStarted(Stage::Connectivity)));
        assert!(matches!(events[4], ProgressEvent::StageStarted(Stage::Area)));
        assert!(matches!(events[5], ProgressEvent::Finished(_)));
        assert!(matches!(events[6], ProgressEvent::End));
    }

    #[test]
    fn test_failure_reports_stage() {
        // Everything is far beyond the soft cap
        let roles = MeshRoles::assign(grid("near", 2, 0.0), grid("far", 3, 100.0));

        let (tx, rx) = mpsc::channel();
        let result = CsaPipeline::new(CsaConfig::default()).run_with_progress(&roles, &tx);
        assert!(matches!(result, Err(CsaError::InsufficientSamples { available: 0, .. })));
        drop(tx);

        let events: Vec<ProgressEvent> = rx.iter().collect();
        assert_eq!(events.len(), 4);
        match &events[2] {
            ProgressEvent::Failed { stage, .. } => assert_eq!(*stage, Some(Stage::Threshold)),
            other => panic!("expected failure event, got {:?}", other),
        }
        assert!(matches!(events[3], ProgressEvent::End));
    }

    #[test]
    fn test_degenerate_reference_face_aborts_in_area_stage() {
        let floor = grid("floor", 10, 0.0);
        let mut triangles = floor.triangles().to_vec();
        let p = Point::new(20.0, 20.0, 0.0);
        triangles.push(Triangle::new(p, p, p));
        let floor = TriangleMesh::new("floor", "floor.stl", triangles);

        let roles = MeshRoles::assign(bent_sheet(), floor);
        let config = CsaConfig {
            degenerate_policy: DegenerateFacePolicy::Abort,
            ..CsaConfig::default()
        };

        let (tx, rx) = mpsc::channel();
        let result = CsaPipeline::new(config).run_with_progress(&roles, &tx);
        drop(tx);

        match result {
            Err(CsaError::DegenerateFace { mesh, face_index }) => {
                assert_eq!(mesh, "floor");
                assert_eq!(face_index, 200);
            }
            other => panic!("expected degenerate face error, got {:?}", other),
        }

        let events: Vec<ProgressEvent> = rx.iter().collect();
        match &events[events.len() - 2] {
            ProgressEvent::Failed { stage, message } => {
                assert_eq!(*stage, Some(Stage::Area));
                assert!(message.contains("'floor'"));
            }
            other => panic!("expected failure event, got {:?}", other),
        }
    }

    #[test]
    fn test_degenerate_reference_face_is_skipped_by_default() {
        let floor = grid("floor", 10, 0.0);
        let mut triangles = floor.triangles().to_vec();
        let p = Point::new(20.0, 20.0, 0.0);
        triangles.push(Triangle::new(p, p, p));
        let floor = TriangleMesh::new("floor", "floor.stl", triangles);

        let roles = MeshRoles::assign(bent_sheet(), floor);
        let result = CsaPipeline::new(CsaConfig::default()).run(&roles).unwrap();
        assert_eq!(result.degenerate_reference_faces, vec![200]);
        assert!((result.reference_area - 100.0).abs() < 1e-9);
    }

    struct FixedVolume(f64);

    impl VolumeCalculator for FixedVolume {
        fn volume(&self, _mesh: &TriangleMesh) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_custom_volume_calculator() {
        let roles = MeshRoles::assign(bent_sheet(), grid("floor", 10, 0.0));
        let pipeline =
            CsaPipeline::new(CsaConfig::default()).with_volume_calculator(FixedVolume(2.5));

        let result = pipeline.run(&roles).unwrap();
        assert_eq!(result.probe_volume, 2.5);
        assert_eq!(result.reference_volume, 2.5);
    }

    #[test]
    fn test_empty_reference_fails_in_distance_stage() {
        let roles = MeshRoles {
            probe: grid("probe", 2, 0.0),
            reference: TriangleMesh::new("empty", "empty.stl", Vec::new()),
        };
        let result = CsaPipeline::new(CsaConfig::default()).run(&roles);
        assert!(matches!(result, Err(CsaError::EmptyReferenceMesh { .. })));
    }

    #[test]
    fn test_spawned_pipeline_returns_meshes() {
        let roles = MeshRoles::assign(grid("near", 2, 0.0), grid("far", 3, 100.0));
        let handle = CsaPipeline::new(CsaConfig::default()).spawn(roles);

        let events: Vec<ProgressEvent> = handle.events.iter().collect();
        assert!(matches!(events.last(), Some(ProgressEvent::End)));

        let roles = handle.join().unwrap();
        assert_eq!(roles.probe.name(), "near");
    }
}
