//! Contact detection and area extraction

pub mod classify;
pub mod connectivity;
pub mod correction;
pub mod distance;
pub mod metrics;
pub mod pipeline;
pub mod threshold;
pub mod types;

pub use classify::*;
pub use connectivity::*;
pub use correction::*;
pub use distance::*;
pub use metrics::*;
pub use pipeline::*;
pub use threshold::*;
pub use types::*;
