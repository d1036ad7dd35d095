//! Hypothesis generator (§4.2): intersects every supporting plane with the
//! bounding box and with every other supporting plane, subdividing each
//! plane into a planar arrangement whose 2-cells are candidate faces.
//!
//! Exactness: every step here (box-cap, chord subdivision) runs on
//! `kernel::exact` types. Conversion to f64 happens once, when a final cell
//! is registered as a `Face` (its inexact centroid/area are computed then;
//! scoring, which needs float residuals and alpha-shape areas, runs in a
//! later pass over the finished graph — see `scoring.rs`).

use std::collections::HashMap;

use crate::kernel::{plane_cap_box, polygon_area_f64, polygon_centroid_f64, split_convex_polygon, ExactBox, ExactPlane, ExactVec3};
use crate::segment::PlanarSegment;

use super::bbox::compute_bounding_box;
use super::types::{Edge, EdgeId, Face, FaceId, HypothesisGraph, VertexId};

/// Minimum vertex count for a polygon to be a valid (non-degenerate) cell.
const MIN_POLYGON_VERTS: usize = 3;

/// Build the hypothesis graph from (already plane-merged) planar segments.
/// Returns an empty graph (per §4.2 "Failure") when fewer than two planes
/// produce a non-empty box cap, or all planes are parallel/non-intersecting.
pub fn build_hypothesis_graph(segments: &[PlanarSegment], bbox_margin: f64) -> HypothesisGraph {
    let mut graph = HypothesisGraph::default();
    // §4.2 "Failure": fewer than two input planes can never yield a chord,
    // so the construction is declared empty outright rather than emitting a
    // lone, un-subdivided box cap.
    if segments.len() < 2 {
        return graph;
    }
    let Some(bbox) = compute_bounding_box(segments, bbox_margin) else {
        return graph;
    };
    let exact_box = bbox.to_exact();
    let num_segment_planes = segments.len();
    // The 6 bounding-box half-spaces are added as extra candidate source
    // planes (spec.md §4.3 point 3): with them present in the arrangement,
    // a gap left by a missing input plane can still be closed by a
    // bounding-box face, subject to the face-selection solver forbidding
    // or allowing it via `include_bbox_faces`.
    let mut planes: Vec<ExactPlane> = segments
        .iter()
        .map(|s| ExactPlane::from_f64(s.plane.a, s.plane.b, s.plane.c, s.plane.d))
        .collect();
    planes.extend(exact_box.half_spaces());

    let mut vertex_index: HashMap<ExactVec3, VertexId> = HashMap::new();
    let mut edge_index: HashMap<(VertexId, VertexId), EdgeId> = HashMap::new();

    for (i, plane_i) in planes.iter().enumerate() {
        let seed = plane_cap_box(plane_i, &exact_box);
        if seed.len() < MIN_POLYGON_VERTS {
            continue; // plane misses the bounding box entirely
        }
        let mut cells = vec![seed];
        for (j, plane_j) in planes.iter().enumerate() {
            if i == j {
                continue;
            }
            let mut next_cells = Vec::with_capacity(cells.len());
            for cell in &cells {
                let (neg, pos) = split_convex_polygon(cell, plane_j);
                if neg.len() >= MIN_POLYGON_VERTS {
                    next_cells.push(neg);
                }
                if pos.len() >= MIN_POLYGON_VERTS {
                    next_cells.push(pos);
                }
            }
            cells = next_cells;
            if cells.is_empty() {
                break;
            }
        }

        let is_bbox_face = i >= num_segment_planes;
        for cell in cells {
            register_face(&mut graph, &mut vertex_index, &mut edge_index, i, is_bbox_face, cell, &exact_box);
        }
    }

    finalize_edge_kinds(&mut graph);
    graph
}

fn register_face(
    graph: &mut HypothesisGraph,
    vertex_index: &mut HashMap<ExactVec3, VertexId>,
    edge_index: &mut HashMap<(VertexId, VertexId), EdgeId>,
    plane_index: usize,
    is_bbox_face: bool,
    cell: Vec<ExactVec3>,
    bbox: &ExactBox,
) {
    let _ = bbox; // kept for signature symmetry / future bbox-edge provenance use
    let n = cell.len();
    let mut boundary = Vec::with_capacity(n);
    for v in &cell {
        let id = *vertex_index.entry(v.clone()).or_insert_with(|| {
            let id = VertexId(graph.vertices.len());
            graph.vertices.push(v.to_f64());
            graph.exact_vertices.push(v.clone());
            id
        });
        boundary.push(id);
    }

    let face_id = FaceId(graph.faces.len());
    let mut boundary_edges = Vec::with_capacity(n);
    for k in 0..n {
        let a = boundary[k];
        let b = boundary[(k + 1) % n];
        let key = if a.0 <= b.0 { (a, b) } else { (b, a) };
        let edge_id = *edge_index.entry(key).or_insert_with(|| {
            let id = EdgeId(graph.edges.len());
            graph.edges.push(Edge {
                id,
                v0: key.0,
                v1: key.1,
                incident_faces: Vec::new(),
                is_bbox_edge: true, // provisional; finalized once all faces are known
            });
            id
        });
        graph.edges[edge_id.0].incident_faces.push(face_id);
        boundary_edges.push(edge_id);
    }

    let boundary_f64: Vec<[f64; 3]> = cell.iter().map(|v| v.to_f64()).collect();
    let centroid = polygon_centroid_f64(&boundary_f64);
    let area = polygon_area_f64(&boundary_f64);

    graph.faces.push(Face {
        id: face_id,
        plane_index,
        is_bbox_face,
        boundary,
        boundary_edges,
        exact_boundary: cell,
        centroid,
        area,
        support: 0.0,
        confidence: 0.0,
        coverage: 0.0,
    });
}

/// An edge is a bounding-box edge iff every incident face lies on the same
/// supporting plane; otherwise it is a sharp edge (§3 invariant).
fn finalize_edge_kinds(graph: &mut HypothesisGraph) {
    for edge in graph.edges.iter_mut() {
        let mut planes: Vec<usize> = edge
            .incident_faces
            .iter()
            .map(|f| graph.faces[f.0].plane_index)
            .collect();
        planes.sort_unstable();
        planes.dedup();
        edge.is_bbox_edge = planes.len() <= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{PlaneEq, PlanarSegment, PointSample};

    fn grid_segment(plane: PlaneEq, to3d: impl Fn(f64, f64) -> [f64; 3]) -> PlanarSegment {
        let mut points = Vec::new();
        for i in 0..5 {
            for j in 0..5 {
                let (u, v) = (i as f64 * 0.2 - 0.4, j as f64 * 0.2 - 0.4);
                points.push(PointSample {
                    position: to3d(u, v),
                    normal: None,
                    color: None,
                });
            }
        }
        PlanarSegment { points, plane, color: None }
    }

    fn unit_cube_segments() -> Vec<PlanarSegment> {
        vec![
            grid_segment(PlaneEq { a: 1.0, b: 0.0, c: 0.0, d: -0.5 }, |u, v| [0.5, u, v]),
            grid_segment(PlaneEq { a: -1.0, b: 0.0, c: 0.0, d: -0.5 }, |u, v| [-0.5, u, v]),
            grid_segment(PlaneEq { a: 0.0, b: 1.0, c: 0.0, d: -0.5 }, |u, v| [u, 0.5, v]),
            grid_segment(PlaneEq { a: 0.0, b: -1.0, c: 0.0, d: -0.5 }, |u, v| [u, -0.5, v]),
            grid_segment(PlaneEq { a: 0.0, b: 0.0, c: 1.0, d: -0.5 }, |u, v| [u, v, 0.5]),
            grid_segment(PlaneEq { a: 0.0, b: 0.0, c: -1.0, d: -0.5 }, |u, v| [u, v, -0.5]),
        ]
    }

    #[test]
    fn single_plane_yields_no_faces() {
        let segs = vec![grid_segment(PlaneEq { a: 0.0, b: 0.0, c: 1.0, d: 0.0 }, |u, v| [u, v, 0.0])];
        let graph = build_hypothesis_graph(&segs, 0.05);
        assert!(graph.is_empty());
    }

    #[test]
    fn cube_yields_six_faces_twelve_edges_eight_vertices() {
        let segs = unit_cube_segments();
        let graph = build_hypothesis_graph(&segs, 0.0);
        // With margin 0 the 6 bounding-box half-spaces exactly coincide with
        // the 6 input planes, so each input face has a duplicate bounding-box
        // candidate at the same location (spec.md §4.3 point 3).
        let real_faces = graph.faces.iter().filter(|f| !f.is_bbox_face).count();
        let bbox_faces = graph.faces.iter().filter(|f| f.is_bbox_face).count();
        assert_eq!(real_faces, 6, "expected 6 candidate faces sourced from input planes");
        assert_eq!(bbox_faces, 6, "expected 6 duplicate bounding-box candidate faces");
        assert_eq!(graph.edges.len(), 12, "expected 12 candidate edges");
        assert_eq!(graph.vertices.len(), 8, "expected 8 candidate vertices");
        for v in &graph.vertices {
            for coord in v {
                assert!((coord.abs() - 0.5).abs() < 1e-9, "vertex coord should be +/-0.5, got {coord}");
            }
        }
        // Every edge here is a sharp edge (two cube faces meet at each edge).
        assert_eq!(graph.sharp_edges().count(), 12);
    }

    #[test]
    fn two_parallel_planes_contribute_no_chord() {
        let a = grid_segment(PlaneEq { a: 0.0, b: 0.0, c: 1.0, d: -0.5 }, |u, v| [u, v, 0.5]);
        let b = grid_segment(PlaneEq { a: 0.0, b: 0.0, c: 1.0, d: 0.5 }, |u, v| [u, v, -0.5]);
        let graph = build_hypothesis_graph(&[a, b], 0.0);
        // The two input planes still yield exactly their box caps as single
        // faces each (no mutual chord since they never cross inside the box).
        let real_faces: Vec<_> = graph.faces.iter().filter(|f| !f.is_bbox_face).collect();
        assert_eq!(real_faces.len(), 2);
        for f in &real_faces {
            assert_eq!(f.boundary.len(), 4, "each real face stays a whole quadrilateral");
        }
    }
}
