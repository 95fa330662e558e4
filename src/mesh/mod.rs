//! Mesh data structures and operations

pub mod area;
pub mod geometry;
pub mod types;
pub mod volume;

pub use area::*;
pub use geometry::*;
pub use types::*;
pub use volume::*;
