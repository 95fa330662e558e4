//! Contact surface area data types

use crate::mesh::types::TriangleMesh;
use std::collections::BTreeSet;
use std::fmt;

/// Per-face minimum centroid distance from the probe to the reference mesh
///
/// Indexed by probe face index. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceField {
    values: Vec<f64>,
}

impl DistanceField {
    /// Wrap distances already ordered by probe face index
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Number of probe faces covered
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no face is covered
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Distance of a single probe face
    pub fn get(&self, face_index: usize) -> Option<f64> {
        self.values.get(face_index).copied()
    }

    /// All distances in probe face order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Distances strictly below `cap`, sorted ascending
    pub fn sorted_below(&self, cap: f64) -> Vec<f64> {
        let mut below: Vec<f64> = self.values.iter().copied().filter(|&d| d < cap).collect();
        below.sort_by(f64::total_cmp);
        below
    }

    /// Largest distance among the given faces (0.0 for an empty set)
    pub fn max_over<'a, I>(&self, faces: I) -> f64
    where
        I: IntoIterator<Item = &'a usize>,
    {
        faces
            .into_iter()
            .filter_map(|&idx| self.get(idx))
            .fold(0.0, f64::max)
    }
}

/// Set of probe face indices classified as touching the reference mesh
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFaceSet {
    faces: BTreeSet<usize>,
}

impl ContactFaceSet {
    /// Create a set from face indices
    pub fn from_faces<I: IntoIterator<Item = usize>>(faces: I) -> Self {
        Self {
            faces: faces.into_iter().collect(),
        }
    }

    /// Number of contact faces
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// True when no face is in contact
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Membership test
    pub fn contains(&self, face_index: usize) -> bool {
        self.faces.contains(&face_index)
    }

    /// Face indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.faces.iter().copied()
    }

    /// Return a new set that also contains `faces`
    pub fn with_faces<'a, I>(&self, faces: I) -> Self
    where
        I: IntoIterator<Item = &'a usize>,
    {
        let mut merged = self.faces.clone();
        merged.extend(faces);
        Self { faces: merged }
    }
}

/// One connected piece of the non-contact region
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectivityComponent {
    /// Probe face indices of the component
    pub faces: BTreeSet<usize>,

    /// Largest distance among the member faces
    pub max_distance: f64,
}

impl ConnectivityComponent {
    /// Number of member faces
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// True when the component has no faces
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// Outcome of the threshold selection stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdFit {
    /// Distance separating contact from non-contact faces
    pub threshold: f64,

    /// Index into the sorted sub-cap distances where the split was placed
    pub split_index: usize,

    /// Sum of the residual norms of the two line fits at the split
    pub residual: f64,

    /// Number of sub-cap distances the fit was run on
    pub samples: usize,
}

/// Pipeline stage, used in progress events and error context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Distances,
    Threshold,
    Classification,
    Connectivity,
    Area,
}

impl Stage {
    /// Short lowercase stage name
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Distances => "distances",
            Stage::Threshold => "threshold",
            Stage::Classification => "classification",
            Stage::Connectivity => "connectivity",
            Stage::Area => "area",
        }
    }

    /// Human-readable status message for the stage start
    pub fn message(&self) -> &'static str {
        match self {
            Stage::Distances => "Computing distances",
            Stage::Threshold => "Computing threshold",
            Stage::Classification => "Computing contact faces",
            Stage::Connectivity => "Checking connectivity",
            Stage::Area => "Integrating surface areas",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Final output of a contact surface area run
#[derive(Debug, Clone)]
pub struct CsaResult {
    /// Name of the probe mesh
    pub probe_name: String,

    /// Name of the reference mesh
    pub reference_name: String,

    /// Soft distance cap used for threshold fitting
    pub soft_cap: f64,

    /// Probe face distances to the reference mesh
    pub distances: DistanceField,

    /// Threshold selection outcome
    pub threshold: ThresholdFit,

    /// Contact faces from the threshold pass alone
    pub initial_contact: ContactFaceSet,

    /// Non-contact components found by the connectivity check
    pub components: Vec<ConnectivityComponent>,

    /// Contact faces after fragmentation correction
    pub contact: ContactFaceSet,

    /// Area of the final contact faces
    pub contact_area: f64,

    /// Area of the threshold-pass contact faces
    pub initial_contact_area: f64,

    /// Whole-surface area of the probe
    pub probe_area: f64,

    /// Whole-surface area of the reference
    pub reference_area: f64,

    /// Enclosed volume of the probe
    pub probe_volume: f64,

    /// Enclosed volume of the reference
    pub reference_volume: f64,

    /// Probe faces skipped during area integration
    pub degenerate_probe_faces: Vec<usize>,

    /// Reference faces skipped during area integration
    pub degenerate_reference_faces: Vec<usize>,
}

impl CsaResult {
    /// Number of faces folded into the contact set by fragmentation correction
    pub fn num_folded_faces(&self) -> usize {
        self.contact.len() - self.initial_contact.len()
    }

    /// Contact geometry as the induced sub-mesh of the probe
    pub fn contact_submesh(&self, probe: &TriangleMesh) -> TriangleMesh {
        probe.submesh(format!("{} contact", self.probe_name), self.contact.iter())
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        println!("\n{}", "=".repeat(60));
        println!("CONTACT SURFACE AREA RESULTS");
        println!("{}", "=".repeat(60));
        println!();
        println!("  Probe:      {}", self.probe_name);
        println!("  Reference:  {}", self.reference_name);
        println!();
        println!("  Contact Surface Area:  {:.6}", self.contact_area);
        println!("  Threshold-only Area:   {:.6}", self.initial_contact_area);
        println!();
        println!("  Threshold:        {:.6}  (split {} of {} samples)", self.threshold.threshold, self.threshold.split_index, self.threshold.samples);
        println!("  Soft Cap:         {:.6}", self.soft_cap);
        println!("  Contact Faces:    {}", self.contact.len());
        println!("  Folded Faces:     {}", self.num_folded_faces());
        println!("  Components:       {}", self.components.len());
        println!();
        println!("  Probe Area:       {:.6}", self.probe_area);
        println!("  Probe Volume:     {:.6}", self.probe_volume);
        println!("  Reference Area:   {:.6}", self.reference_area);
        println!("  Reference Volume: {:.6}", self.reference_volume);

        let degenerate = self.degenerate_probe_faces.len() + self.degenerate_reference_faces.len();
        if degenerate > 0 {
            println!();
            println!("  Degenerate faces skipped: {}", degenerate);
        }

        println!();
        println!("{}", "=".repeat(60));
    }
}
