//! Convenience re-exports for downstream crates (mirrors the teacher's
//! `viterbo::prelude` pattern).

pub use crate::config::Config;
pub use crate::error::{PolyfitError, Result};
pub use crate::mesh::{Diagnostics, Mesh};
pub use crate::reconstruct::reconstruct;
pub use crate::segment::{PlaneEq, PlanarSegment, PointSample};
