//! Orchestration façade (§4.4): validate -> merge planes -> per-segment
//! alpha-shapes -> hypothesis generation -> scoring -> face-selection solve
//! -> mesh assembly. The only public entry point most callers need.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{info, info_span};

use crate::alpha_shape::{build_alpha_shape, AlphaShapeMesh};
use crate::arrangement::{build_hypothesis_graph, score_faces, HypothesisGraph};
use crate::config::Config;
use crate::error::{PolyfitError, Result};
use crate::mesh::{Diagnostics, DiagnosticStatus, Mesh};
use crate::segment::{merge_duplicate_planes, PlanarSegment};
use crate::solver::{build_problem, BipSolver, GoodLpSolver, SolveStatus};

const PLANE_MERGE_EPS: f64 = 1e-6;
const UNIT_NORMAL_EPS: f64 = 1e-3;

/// Run the full PolyFit pipeline (§4.4). Transactional: either returns a
/// complete `(Mesh, Diagnostics)` or fails with a `PolyfitError`, never a
/// partially-built mesh.
pub fn reconstruct(segments: Vec<PlanarSegment>, config: Config) -> Result<(Mesh, Diagnostics)> {
    let started = Instant::now();
    let _span = info_span!("reconstruct", num_segments = segments.len()).entered();

    config.validate()?;
    if segments.is_empty() {
        return Err(PolyfitError::InvalidInput("at least one segment is required".into()));
    }
    for seg in &segments {
        seg.validate(UNIT_NORMAL_EPS)?;
    }

    let segments = {
        let _span = info_span!("merge_duplicate_planes").entered();
        merge_duplicate_planes(segments, PLANE_MERGE_EPS)
    };

    let alpha_shapes: Vec<AlphaShapeMesh> = {
        let _span = info_span!("alpha_shapes", count = segments.len()).entered();
        segments
            .par_iter()
            .map(|s| build_alpha_shape(s, config.alpha_scale))
            .collect()
    };

    let mut graph: HypothesisGraph = {
        let _span = info_span!("hypothesis_generator").entered();
        build_hypothesis_graph(&segments, config.bbox_margin)
    };

    if graph.is_empty() {
        info!("hypothesis graph is empty, returning empty mesh");
        return Ok((Mesh::default(), Diagnostics::empty(started.elapsed().as_secs_f64())));
    }

    {
        let _span = info_span!("scoring", faces = graph.faces.len()).entered();
        score_faces(&mut graph, &segments, &alpha_shapes, &config);
    }

    let (problem, selection) = {
        let _span = info_span!("formulate_bip").entered();
        build_problem(&graph, &alpha_shapes, &config)
    };

    let solution = {
        let _span = info_span!("solve_bip", num_vars = problem.num_vars).entered();
        let solver = GoodLpSolver;
        solver.solve_bip(&problem)?
    };

    if solution.status == SolveStatus::Infeasible {
        info!("face-selection problem reported infeasible, returning empty mesh");
        let mut diagnostics = Diagnostics::empty(started.elapsed().as_secs_f64());
        diagnostics.solver_status = DiagnosticStatus::from(solution.status);
        return Ok((Mesh::default(), diagnostics));
    }

    let selected_faces: Vec<usize> = (0..graph.faces.len())
        .filter(|&i| solution.x[selection.face_var(i)] > 0.5)
        .collect();
    let selected_edges: Vec<usize> = (0..graph.edges.len())
        .filter(|&i| solution.x[selection.edge_var(i)] > 0.5)
        .collect();
    let num_sharp_edges = (0..graph.edges.len())
        .filter(|&i| {
            selection
                .sharp_var_of_edge
                .get(i)
                .and_then(|v| *v)
                .map(|var| solution.x[var] > 0.5)
                .unwrap_or(false)
        })
        .count();

    let mesh = assemble_mesh(&graph, &selected_faces);

    let support_total: f64 = graph.faces.iter().map(|f| f.support).sum::<f64>().max(1e-12);
    // §4.3 "Objective": area_total is the total area of the alpha-shape
    // meshes, not the candidate faces' own (often much larger) areas.
    let area_total: f64 = alpha_shapes.iter().map(AlphaShapeMesh::total_area).sum::<f64>().max(1e-12);
    let fit_sum: f64 = selected_faces.iter().map(|&i| graph.faces[i].support).sum();
    let coverage_sum: f64 = selected_faces.iter().map(|&i| graph.faces[i].coverage).sum();
    let sharp_denom = graph.sharp_edges().count().max(1) as f64;

    let fit_term = 1.0 - fit_sum / support_total;
    let coverage_term = 1.0 - coverage_sum / area_total;
    let complexity_term = num_sharp_edges as f64 / sharp_denom;
    let objective_value =
        config.fit_weight * fit_term + config.complexity_weight * complexity_term + config.coverage_weight * coverage_term;

    let diagnostics = Diagnostics {
        objective_value,
        fit_term,
        complexity_term,
        coverage_term,
        num_selected_faces: selected_faces.len(),
        num_selected_edges: selected_edges.len(),
        num_sharp_edges,
        solver_status: DiagnosticStatus::from(solution.status),
        elapsed_seconds: started.elapsed().as_secs_f64(),
        empty_result: selected_faces.is_empty(),
    };

    Ok((mesh, diagnostics))
}

/// Walk F and emit a polyhedral mesh consisting of {f : x_f = 1} (§4.3
/// "Output assembly"). Global vertex indices are renumbered densely and in
/// the order they are first encountered across `selected_faces` (itself in
/// ascending face-id order), which keeps the output deterministic.
fn assemble_mesh(graph: &HypothesisGraph, selected_faces: &[usize]) -> Mesh {
    let mut remap: Vec<Option<usize>> = vec![None; graph.vertices.len()];
    let mut vertices = Vec::new();
    let mut faces = Vec::with_capacity(selected_faces.len());

    for &face_index in selected_faces {
        let face = &graph.faces[face_index];
        let mut indices = Vec::with_capacity(face.boundary.len());
        for v in &face.boundary {
            let id = match remap[v.0] {
                Some(id) => id,
                None => {
                    let id = vertices.len();
                    vertices.push(graph.vertices[v.0]);
                    remap[v.0] = Some(id);
                    id
                }
            };
            indices.push(id);
        }
        faces.push(indices);
    }

    Mesh { vertices, faces }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(plane: PlaneEq, to3d: impl Fn(f64, f64) -> [f64; 3], n: usize) -> PlanarSegment {
        let mut points = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                let u = (i as f64 / (n - 1) as f64 - 0.5) * 0.9;
                let v = (j as f64 / (n - 1) as f64 - 0.5) * 0.9;
                points.push(crate::segment::PointSample {
                    position: to3d(u, v),
                    normal: None,
                    color: None,
                });
            }
        }
        PlanarSegment { points, plane, color: None }
    }

    fn cube_segments(n: usize) -> Vec<PlanarSegment> {
        vec![
            grid(PlaneEq { a: 1.0, b: 0.0, c: 0.0, d: -0.5 }, |u, v| [0.5, u, v], n),
            grid(PlaneEq { a: -1.0, b: 0.0, c: 0.0, d: -0.5 }, |u, v| [-0.5, u, v], n),
            grid(PlaneEq { a: 0.0, b: 1.0, c: 0.0, d: -0.5 }, |u, v| [u, 0.5, v], n),
            grid(PlaneEq { a: 0.0, b: -1.0, c: 0.0, d: -0.5 }, |u, v| [u, -0.5, v], n),
            grid(PlaneEq { a: 0.0, b: 0.0, c: 1.0, d: -0.5 }, |u, v| [u, v, 0.5], n),
            grid(PlaneEq { a: 0.0, b: 0.0, c: -1.0, d: -0.5 }, |u, v| [u, v, -0.5], n),
        ]
    }

    /// §8 end-to-end scenario 1: a fully closed unit cube.
    #[test]
    fn scenario_cube_recovers_six_faces() {
        let (mesh, diagnostics) = reconstruct(cube_segments(10), Config::default()).expect("reconstruct should succeed");
        assert_eq!(mesh.faces.len(), 6);
        assert_eq!(mesh.vertices.len(), 8);
        assert!(diagnostics.fit_term < 0.1, "fit term should be near zero (near-perfect fit)");
        assert!(!diagnostics.empty_result);
    }

    /// §8 end-to-end scenario 3: two perpendicular planes, open corner.
    #[test]
    fn scenario_two_perpendicular_planes_share_one_sharp_edge() {
        let a = grid(PlaneEq { a: 1.0, b: 0.0, c: 0.0, d: 0.0 }, |u, v| [0.0, u + 0.5, v + 0.5], 5);
        let b = grid(PlaneEq { a: 0.0, b: 1.0, c: 0.0, d: 0.0 }, |u, v| [u + 0.5, 0.0, v + 0.5], 5);
        let (mesh, diagnostics) = reconstruct(vec![a, b], Config::default()).expect("reconstruct should succeed");
        assert_eq!(mesh.faces.len(), 2);
        assert_eq!(diagnostics.num_sharp_edges, 1);
    }

    /// §8 end-to-end scenario 4: a closed tetrahedron.
    #[test]
    fn scenario_tetrahedron_is_closed() {
        // Four faces of a regular-ish tetrahedron via explicit vertices.
        let verts = [
            [1.0, 1.0, 1.0],
            [1.0, -1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0],
        ];
        let faces = [[0usize, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
        let mut segments = Vec::new();
        for tri in faces {
            let p0 = nalgebra::Vector3::new(verts[tri[0]][0], verts[tri[0]][1], verts[tri[0]][2]);
            let p1 = nalgebra::Vector3::new(verts[tri[1]][0], verts[tri[1]][1], verts[tri[1]][2]);
            let p2 = nalgebra::Vector3::new(verts[tri[2]][0], verts[tri[2]][1], verts[tri[2]][2]);
            let normal = (p1 - p0).cross(&(p2 - p0)).normalize();
            let d = -normal.dot(&p0);
            let plane = PlaneEq { a: normal.x, b: normal.y, c: normal.z, d };
            let frame = plane.frame();
            let mut points = Vec::with_capacity(64);
            for i in 0..8 {
                for j in 0..8 {
                    // Sample a small patch around the face centroid in-frame;
                    // exact footprint doesn't matter, only that >= 50 points
                    // land near the triangle's own plane.
                    let centroid = (p0 + p1 + p2) / 3.0;
                    let c2 = frame.to_2d(centroid);
                    let u = c2.x + (i as f64 - 3.5) * 0.03;
                    let v = c2.y + (j as f64 - 3.5) * 0.03;
                    let p = frame.to_3d(nalgebra::Vector2::new(u, v));
                    points.push(crate::segment::PointSample {
                        position: [p.x, p.y, p.z],
                        normal: None,
                        color: None,
                    });
                }
            }
            segments.push(PlanarSegment { points, plane, color: None });
        }

        let (mesh, _diagnostics) = reconstruct(segments, Config::default()).expect("reconstruct should succeed");
        assert_eq!(mesh.faces.len(), 4);
        assert_eq!(mesh.vertices.len(), 4);
    }

    /// §8 invariant: every selected edge has exactly 0 or 2 selected
    /// incident faces.
    #[test]
    fn manifold_invariant_holds_for_closed_cube() {
        let (mesh, _diagnostics) = reconstruct(cube_segments(10), Config::default()).expect("reconstruct should succeed");
        let mut edge_face_count: std::collections::HashMap<(usize, usize), usize> = std::collections::HashMap::new();
        for face in &mesh.faces {
            let n = face.len();
            for k in 0..n {
                let a = face[k];
                let b = face[(k + 1) % n];
                let key = if a <= b { (a, b) } else { (b, a) };
                *edge_face_count.entry(key).or_insert(0) += 1;
            }
        }
        for count in edge_face_count.values() {
            assert_eq!(*count, 2, "every edge of a closed cube should be shared by exactly 2 faces");
        }
    }

    /// §8 determinism: two runs with identical input produce byte-identical
    /// vertex and face lists.
    #[test]
    fn determinism_across_runs() {
        let (mesh_a, _) = reconstruct(cube_segments(10), Config::default()).unwrap();
        let (mesh_b, _) = reconstruct(cube_segments(10), Config::default()).unwrap();
        assert_eq!(mesh_a.vertices, mesh_b.vertices);
        assert_eq!(mesh_a.faces, mesh_b.faces);
    }

    /// §8 monotonicity: complexity_weight = 1 makes the empty mesh optimal.
    #[test]
    fn full_complexity_weight_prefers_empty_mesh() {
        let cfg = Config {
            fit_weight: 0.0,
            coverage_weight: 0.0,
            complexity_weight: 1.0,
            ..Config::default()
        };
        let (mesh, _diagnostics) = reconstruct(cube_segments(10), cfg).expect("reconstruct should succeed");
        assert!(mesh.faces.is_empty(), "penalizing every sharp edge should select no faces");
    }

    #[test]
    fn single_plane_yields_empty_output() {
        let segs = vec![grid(PlaneEq { a: 0.0, b: 0.0, c: 1.0, d: 0.0 }, |u, v| [u, v, 0.0], 5)];
        let (mesh, diagnostics) = reconstruct(segs, Config::default()).expect("reconstruct should succeed");
        assert!(mesh.is_empty());
        assert!(diagnostics.empty_result);
    }

    #[test]
    fn no_segments_is_invalid_input() {
        let result = reconstruct(vec![], Config::default());
        assert!(matches!(result, Err(PolyfitError::InvalidInput(_))));
    }
}
