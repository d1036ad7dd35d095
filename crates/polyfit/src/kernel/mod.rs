//! Geometry kernel adapter (§4 "Geometry kernel adapter").
//!
//! Splits strictly along the exact/inexact duality required by the spec:
//! `exact` carries plane-plane(-plane) intersection and polygon clipping
//! (arrangement construction); everything else (scoring, alpha-shapes,
//! rendering) works in `nalgebra` f64 directly and is not re-exported here.

pub mod exact;

pub use exact::{
    plane_cap_box, polygon_area_f64, polygon_centroid_f64, split_convex_polygon, to_exact, to_f64,
    Exact, ExactBox, ExactPlane, ExactVec3,
};
