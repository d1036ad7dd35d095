//! Hypothesis graph construction and scoring (§3, §4.2).

mod bbox;
mod build;
mod scoring;
mod types;

pub use bbox::{compute_bounding_box, BoundingBox};
pub use build::build_hypothesis_graph;
pub use scoring::score_faces;
pub use types::{Edge, EdgeId, Face, FaceId, HypothesisGraph, VertexId};
