//! Error types for the contact surface area pipeline
//!
//! This module defines all error types that can occur during mesh loading,
//! distance computation, threshold fitting and result export.

use thiserror::Error;

/// Error types for contact surface area operations
///
/// Fatal pipeline errors abort the run before any result is produced. Degenerate
/// faces are only fatal when the configured policy asks for it; by default they
/// are skipped and reported alongside the result.
#[derive(Error, Debug)]
pub enum CsaError {
    /// Failed to read a triangulated surface
    ///
    /// Raised by the mesh loading collaborator for unreadable, truncated or
    /// malformed files, and for files that contain no faces at all.
    #[error("Failed to load mesh '{source_id}': {reason}")]
    MeshLoadError { source_id: String, reason: String },

    /// The reference mesh has no faces, so no distance can be measured to it
    #[error("Reference mesh '{mesh}' has no faces; cannot compute distance field")]
    EmptyReferenceMesh { mesh: String },

    /// Too few distances below the soft cap to fit the two-segment model
    ///
    /// The split search range `[2, n-2)` is empty for fewer than five samples.
    #[error(
        "Insufficient samples for threshold fitting: {available} distances below soft cap {soft_cap}, at least {required} required"
    )]
    InsufficientSamples {
        available: usize,
        required: usize,
        soft_cap: f64,
    },

    /// A triangle has no defined normal (zero area or collinear vertices)
    #[error("Degenerate face {face_index} of mesh '{mesh}': normal is undefined")]
    DegenerateFace { mesh: String, face_index: usize },

    /// A face index does not refer to a face of the mesh
    #[error("Face index {index} out of bounds for mesh with {face_count} faces")]
    FaceIndexOutOfBounds { index: usize, face_count: usize },

    /// A pipeline stage failed for a reason not covered above
    #[error("Stage '{stage}' failed: {message}")]
    PipelineError { stage: String, message: String },

    /// File I/O error
    ///
    /// Wraps standard I/O errors from file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization of a mesh or report failed
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// VTK file writing error
    #[error("VTK error: {0}")]
    VtkError(String),

    /// Configuration error
    ///
    /// Invalid configuration file format, missing required fields,
    /// or invalid parameter values.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CsaError {
    /// Shorthand for a [`CsaError::MeshLoadError`]
    pub fn mesh_load(source_id: impl Into<String>, reason: impl Into<String>) -> Self {
        CsaError::MeshLoadError {
            source_id: source_id.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results with [`CsaError`]
///
/// # Example
/// ```
/// use contact_surface_area::Result;
///
/// fn my_function() -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, CsaError>;
