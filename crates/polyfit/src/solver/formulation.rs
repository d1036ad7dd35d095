//! Builds the §4.3 binary program from a scored `HypothesisGraph`: one
//! `x_f` per face, one `z_e` manifold auxiliary per edge, and one `y_e`
//! sharp-edge indicator per candidate sharp edge.

use crate::alpha_shape::AlphaShapeMesh;
use crate::arrangement::HypothesisGraph;
use crate::config::Config;

use super::{BipProblem, ConstraintSense, LinearConstraint, VariableKind};

/// Maps a solved `BipSolution`'s `x` vector back to face/edge identities.
pub struct FaceSelection {
    pub num_faces: usize,
    pub num_edges: usize,
    /// Index of `y_e` within the solution vector, for each sharp-edge
    /// candidate edge (keyed by edge index); `None` for non-candidate edges.
    pub sharp_var_of_edge: Vec<Option<usize>>,
}

impl FaceSelection {
    pub fn face_var(&self, face_index: usize) -> usize {
        face_index
    }

    pub fn edge_var(&self, edge_index: usize) -> usize {
        self.num_faces + edge_index
    }
}

/// Build the §4.3 BIP from a scored graph. Returns `(problem, selection)`
/// where `selection` records the variable layout needed to read the
/// solution back into face/edge decisions.
pub fn build_problem(
    graph: &HypothesisGraph,
    alpha_shapes: &[AlphaShapeMesh],
    cfg: &Config,
) -> (BipProblem, FaceSelection) {
    let num_faces = graph.faces.len();
    let num_edges = graph.edges.len();

    let sharp_edge_indices: Vec<usize> = graph
        .edges
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.is_bbox_edge)
        .map(|(i, _)| i)
        .collect();
    let mut sharp_var_of_edge = vec![None; num_edges];
    for (k, &edge_index) in sharp_edge_indices.iter().enumerate() {
        sharp_var_of_edge[edge_index] = Some(num_faces + num_edges + k);
    }
    let num_sharp = sharp_edge_indices.len();
    let num_vars = num_faces + num_edges + num_sharp;

    let support_total: f64 = graph.faces.iter().map(|f| f.support).sum::<f64>().max(1e-12);
    // §4.3 "Objective": area_total is the total area of the alpha-shape
    // meshes across all segments, not the sum of candidate-face areas.
    let area_total: f64 = alpha_shapes.iter().map(AlphaShapeMesh::total_area).sum::<f64>().max(1e-12);
    let sharp_denom = num_sharp.max(1) as f64;

    // Objective: minimize
    //   fit_weight * (1 - sum supp(f) x_f / support_total)
    // + complexity_weight * (sum y_e) / |sharp edges|
    // + coverage_weight * (1 - sum cov(f) x_f / area_total)
    // The constant terms (the two leading "1 - ...") drop out of the
    // minimization since they don't depend on any variable; only the
    // variable-dependent remainder is encoded here.
    let mut objective_coeffs = vec![0.0; num_vars];
    for f in &graph.faces {
        objective_coeffs[f.id.0] += -cfg.fit_weight * f.support / support_total;
        objective_coeffs[f.id.0] += -cfg.coverage_weight * f.coverage / area_total;
    }
    for &edge_index in &sharp_edge_indices {
        let var = sharp_var_of_edge[edge_index].expect("sharp edge always has a y var");
        objective_coeffs[var] += cfg.complexity_weight / sharp_denom;
    }

    let mut constraints = Vec::new();

    // Manifold constraint per edge (§8 "every boundary edge is shared with
    // exactly one other selected face, OR is a boundary-box edge...
    // permitting open boundaries"): a genuine sharp-edge candidate (two
    // distinct supporting planes could meet there) must see exactly 0 or 2
    // selected incident faces, encoded as sum x_f - 2 z_e = 0. A
    // bounding-box edge (every incident face shares one plane, so it can
    // only ever close against a bounding-box face, not fold against another
    // input plane) instead only forbids double-covering the same location:
    // sum x_f <= 1, leaving it free to stay an open rim.
    for e in &graph.edges {
        let terms: Vec<(usize, f64)> = e.incident_faces.iter().map(|f| (f.0, 1.0)).collect();
        if e.is_bbox_edge {
            constraints.push(LinearConstraint {
                terms,
                sense: ConstraintSense::Le,
                rhs: 1.0,
            });
        } else {
            let mut terms = terms;
            terms.push((num_faces + e.id.0, -2.0));
            constraints.push(LinearConstraint {
                terms,
                sense: ConstraintSense::Eq,
                rhs: 0.0,
            });
        }
    }

    // Sharp-edge linearization (SPEC_FULL.md §4.3): for every unordered pair
    // of faces incident to a sharp-edge candidate that lie on different
    // planes, y_e >= x_f + x_g - 1; and y_e <= z_e so y_e is forced to 0 on
    // an unselected edge. Exact (not a relaxation) at any feasible integral
    // point because the manifold equality already limits a selected edge to
    // exactly one such pair.
    for &edge_index in &sharp_edge_indices {
        let edge = &graph.edges[edge_index];
        let y_var = sharp_var_of_edge[edge_index].unwrap();
        let incident = &edge.incident_faces;
        for i in 0..incident.len() {
            for j in (i + 1)..incident.len() {
                let f = incident[i];
                let g = incident[j];
                if graph.faces[f.0].plane_index == graph.faces[g.0].plane_index {
                    continue;
                }
                // y_e - x_f - x_g >= -1
                constraints.push(LinearConstraint {
                    terms: vec![(y_var, 1.0), (f.0, -1.0), (g.0, -1.0)],
                    sense: ConstraintSense::Ge,
                    rhs: -1.0,
                });
            }
        }
        // y_e - z_e <= 0
        constraints.push(LinearConstraint {
            terms: vec![(y_var, 1.0), (num_faces + edge_index, -1.0)],
            sense: ConstraintSense::Le,
            rhs: 0.0,
        });
    }

    // Bounding-box faces may be forbidden outright (§4.3 point 3).
    if !cfg.include_bbox_faces {
        for f in &graph.faces {
            if f.is_bbox_face {
                constraints.push(LinearConstraint {
                    terms: vec![(f.id.0, 1.0)],
                    sense: ConstraintSense::Eq,
                    rhs: 0.0,
                });
            }
        }
    }

    let mut variable_kinds = vec![VariableKind::Binary; num_vars];
    // z_e is nominally an aux for Σx_f ∈ {0,2}; its domain is binary too
    // (0 or 1) since a candidate edge has at most 2 incident faces in any
    // non-degenerate arrangement and the equality only ever needs z_e ∈ {0,1}.
    for e in &graph.edges {
        variable_kinds[num_faces + e.id.0] = VariableKind::Binary;
    }

    let problem = BipProblem {
        num_vars,
        objective_coeffs,
        constraints,
        variable_kinds,
        time_limit_seconds: cfg.solver_time_limit_seconds,
        gap: cfg.solver_gap,
    };
    let selection = FaceSelection {
        num_faces,
        num_edges,
        sharp_var_of_edge,
    };
    (problem, selection)
}
