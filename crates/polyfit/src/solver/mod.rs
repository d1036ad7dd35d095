//! Abstract binary/mixed-integer program contract and its `good_lp` binding
//! (§6.3 "Solver interface"). `formulation.rs` builds a `BipProblem` from a
//! scored `HypothesisGraph`; `good_lp_backend.rs` is the only module that
//! knows about `good_lp`.

mod formulation;
mod good_lp_backend;

pub use formulation::{build_problem, FaceSelection};
pub use good_lp_backend::GoodLpSolver;

/// `x_f ∈ {0,1}` vs. the (unused by this core, but part of the abstract
/// contract) general-integer case, §6.3 "variable_kinds".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariableKind {
    Binary,
    Integer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintSense {
    Le,
    Ge,
    Eq,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    FeasibleGapReached,
    TimeLimit,
    Infeasible,
    SolverError,
}

/// A single linear constraint `sum(coeffs[i] * x[var_index[i]]) <sense> rhs`.
#[derive(Clone, Debug)]
pub struct LinearConstraint {
    pub terms: Vec<(usize, f64)>,
    pub sense: ConstraintSense,
    pub rhs: f64,
}

/// The abstract matrix-form contract from §6.3: a binary/mixed-integer
/// program over `num_vars` variables, to be minimized.
#[derive(Clone, Debug)]
pub struct BipProblem {
    pub num_vars: usize,
    pub objective_coeffs: Vec<f64>,
    pub constraints: Vec<LinearConstraint>,
    pub variable_kinds: Vec<VariableKind>,
    pub time_limit_seconds: f64,
    pub gap: f64,
}

#[derive(Clone, Debug)]
pub struct BipSolution {
    pub status: SolveStatus,
    pub x: Vec<f64>,
    pub objective: f64,
}

/// Any MIP solver satisfying `solve_bip` (§6.3: "the core must not depend on
/// solver-specific extensions") may implement this trait in place of
/// `GoodLpSolver`.
pub trait BipSolver {
    fn solve_bip(&self, problem: &BipProblem) -> crate::error::Result<BipSolution>;
}
