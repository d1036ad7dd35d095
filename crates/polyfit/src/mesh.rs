//! Output types (§6.2 "Output"): the selected polyhedral mesh and the
//! diagnostics accompanying it.

use serde::{Deserialize, Serialize};

use crate::solver::SolveStatus;

/// A polyhedral mesh as (vertex list, face list). `faces[i]` is an ordered
/// list of indices into `vertices`; orientation follows the candidate
/// face's own boundary order, which is "arbitrary-but-consistent" per
/// segment (§9 "Open Question: orientation").
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<Vec<usize>>,
}

impl Mesh {
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticStatus {
    Optimal,
    FeasibleGapReached,
    TimeLimit,
    Infeasible,
    SolverError,
}

impl From<SolveStatus> for DiagnosticStatus {
    fn from(s: SolveStatus) -> Self {
        match s {
            SolveStatus::Optimal => DiagnosticStatus::Optimal,
            SolveStatus::FeasibleGapReached => DiagnosticStatus::FeasibleGapReached,
            SolveStatus::TimeLimit => DiagnosticStatus::TimeLimit,
            SolveStatus::Infeasible => DiagnosticStatus::Infeasible,
            SolveStatus::SolverError => DiagnosticStatus::SolverError,
        }
    }
}

/// Accompanies every successful `reconstruct` call (§6.2 "Diagnostics").
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostics {
    pub objective_value: f64,
    pub fit_term: f64,
    pub complexity_term: f64,
    pub coverage_term: f64,
    pub num_selected_faces: usize,
    pub num_selected_edges: usize,
    pub num_sharp_edges: usize,
    pub solver_status: DiagnosticStatus,
    pub elapsed_seconds: f64,
    /// §7: an empty hypothesis graph or all-zero solve is not an error, it
    /// is reported here instead.
    pub empty_result: bool,
}

impl Diagnostics {
    pub fn empty(elapsed_seconds: f64) -> Self {
        Self {
            objective_value: 0.0,
            fit_term: 0.0,
            complexity_term: 0.0,
            coverage_term: 0.0,
            num_selected_faces: 0,
            num_selected_edges: 0,
            num_sharp_edges: 0,
            solver_status: DiagnosticStatus::Optimal,
            elapsed_seconds,
            empty_result: true,
        }
    }
}
