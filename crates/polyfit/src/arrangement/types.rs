//! Data types for the hypothesis graph H = (V, E, F) (§3 "Hypothesis graph").
//!
//! Kept as three flat arrays referenced by index (spec.md §9 "Cyclic
//! face-edge-vertex references... implemented without cycles"); the only
//! backward link needed at solve time is edge -> incident face indices.

use crate::kernel::ExactVec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub usize);

/// A candidate face: a 2-cell of the arrangement on exactly one supporting
/// plane, clipped to the bounding box (§3 "Candidate face f").
#[derive(Clone, Debug)]
pub struct Face {
    pub id: FaceId,
    pub plane_index: usize,
    /// True when this face's source plane is one of the 6 synthetic
    /// bounding-box half-spaces rather than an input segment's supporting
    /// plane (spec.md §4.3 point 3 "bounding-box faces"). Such faces carry
    /// no segment of their own, so `support`/`confidence`/`coverage` stay 0;
    /// whether they may appear in the output is a face-selection decision
    /// (`Config::include_bbox_faces`), not a hypothesis-generation one.
    pub is_bbox_face: bool,
    /// Cyclic boundary, exact coordinates (one vertex per polygon corner).
    pub boundary: Vec<VertexId>,
    pub boundary_edges: Vec<EdgeId>,
    pub exact_boundary: Vec<ExactVec3>,
    pub centroid: [f64; 3],
    pub area: f64,
    /// `supp(f)`: average point-to-plane residual reward, §4.2.
    pub support: f64,
    /// `conf(f)`: alpha-shape area-fraction coverage, §4.2.
    pub confidence: f64,
    /// `cov(f) = conf(f) * area(f)`, §4.2.
    pub coverage: f64,
}

/// A candidate edge: a straight segment on the boundary of at least one
/// face (§3 "Candidate edge e").
#[derive(Clone, Debug)]
pub struct Edge {
    pub id: EdgeId,
    pub v0: VertexId,
    pub v1: VertexId,
    pub incident_faces: Vec<FaceId>,
    /// True iff every incident face lies on the same supporting plane
    /// (§3 invariant: bounding-box edge vs. sharp edge).
    pub is_bbox_edge: bool,
}

/// The hypothesis graph H = (V, E, F), built once and never mutated after
/// construction (§3 "Lifecycle").
#[derive(Clone, Debug, Default)]
pub struct HypothesisGraph {
    pub vertices: Vec<[f64; 3]>,
    pub exact_vertices: Vec<ExactVec3>,
    pub edges: Vec<Edge>,
    pub faces: Vec<Face>,
}

impl HypothesisGraph {
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn edges_of(&self, face: &Face) -> impl Iterator<Item = &Edge> {
        face.boundary_edges.iter().map(move |e| &self.edges[e.0])
    }

    pub fn sharp_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|e| !e.is_bbox_edge)
    }
}
