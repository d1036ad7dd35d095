//! PolyFit: reconstructs a watertight polyhedral mesh from a set of planar
//! point-cloud segments via plane-arrangement hypothesis generation followed
//! by binary-program face selection.
//!
//! See `reconstruct` for the single entry point most callers need.

pub mod alpha_shape;
pub mod arrangement;
pub mod config;
pub mod error;
pub mod kernel;
pub mod mesh;
pub mod prelude;
pub mod reconstruct;
pub mod segment;
pub mod solver;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use config::Config;
pub use error::{PolyfitError, Result};
pub use mesh::{Diagnostics, Mesh};
pub use reconstruct::reconstruct;
pub use segment::{PlaneEq, PlanarSegment, PointSample};
