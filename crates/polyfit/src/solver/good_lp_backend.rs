//! `good_lp`-backed implementation of `BipSolver` (§6.3 "Concrete binding").
//! `good_lp` is a modeling layer over pluggable MIP backends; this module is
//! the only place in the crate that names a concrete backend (`highs`),
//! matching spec.md §9 "Solver abstraction".

use std::time::Instant;

use good_lp::{variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable};

use crate::error::PolyfitError;

use super::{BipProblem, BipSolution, BipSolver, ConstraintSense, SolveStatus, VariableKind};

/// Default `BipSolver` implementation, dispatching to `good_lp::default_solver`
/// (resolved to the `highs` backend by this crate's feature selection).
#[derive(Default)]
pub struct GoodLpSolver;

impl BipSolver for GoodLpSolver {
    fn solve_bip(&self, problem: &BipProblem) -> crate::error::Result<BipSolution> {
        if problem.num_vars == 0 {
            return Ok(BipSolution {
                status: SolveStatus::Optimal,
                x: Vec::new(),
                objective: 0.0,
            });
        }

        let mut vars = ProblemVariables::new();
        let columns: Vec<Variable> = (0..problem.num_vars)
            .map(|i| {
                let def = match problem.variable_kinds[i] {
                    VariableKind::Binary => variable().binary(),
                    VariableKind::Integer => variable().integer().min(0).max(1),
                };
                vars.add(def)
            })
            .collect();

        let objective: Expression = problem
            .objective_coeffs
            .iter()
            .zip(&columns)
            .map(|(&c, &v)| c * v)
            .sum();

        let mut model = vars.minimise(objective).using(good_lp::default_solver);
        if problem.time_limit_seconds > 0.0 {
            model.set_option("time_limit", problem.time_limit_seconds);
        }
        if problem.gap > 0.0 {
            model.set_option("mip_rel_gap", problem.gap);
        }
        for c in &problem.constraints {
            let expr: Expression = c.terms.iter().map(|&(i, coeff)| coeff * columns[i]).sum();
            model = model.with(match c.sense {
                ConstraintSense::Le => expr.leq(c.rhs),
                ConstraintSense::Ge => expr.geq(c.rhs),
                ConstraintSense::Eq => expr.eq(c.rhs),
            });
        }

        let started = Instant::now();
        match model.solve() {
            Ok(solution) => {
                let elapsed = started.elapsed().as_secs_f64();
                let x: Vec<f64> = columns.iter().map(|&v| solution.value(v)).collect();
                let objective = problem.objective_coeffs.iter().zip(&x).map(|(c, v)| c * v).sum();
                // good_lp's cross-backend `Solution` trait doesn't surface HiGHS's
                // own model-status enum, so optimality-vs-early-stop is inferred
                // from the knobs we asked the solver to honor: a solve that ran to
                // (or past) the configured wall-clock budget is reported as a
                // time-limited incumbent, and one that permitted a nonzero
                // relative gap can't be claimed exactly optimal.
                let status = if problem.time_limit_seconds > 0.0 && elapsed >= problem.time_limit_seconds {
                    SolveStatus::TimeLimit
                } else if problem.gap > 0.0 {
                    SolveStatus::FeasibleGapReached
                } else {
                    SolveStatus::Optimal
                };
                Ok(BipSolution { status, x, objective })
            }
            Err(ResolutionError::Infeasible) => Ok(BipSolution {
                status: SolveStatus::Infeasible,
                x: vec![0.0; problem.num_vars],
                objective: 0.0,
            }),
            Err(e) => Err(PolyfitError::SolverError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::LinearConstraint;

    #[test]
    fn maximizes_coverage_subject_to_budget() {
        // minimize -x0 - x1 subject to x0 + x1 <= 1, binary.
        let problem = BipProblem {
            num_vars: 2,
            objective_coeffs: vec![-1.0, -1.0],
            constraints: vec![LinearConstraint {
                terms: vec![(0, 1.0), (1, 1.0)],
                sense: ConstraintSense::Le,
                rhs: 1.0,
            }],
            variable_kinds: vec![VariableKind::Binary, VariableKind::Binary],
            time_limit_seconds: 0.0,
            gap: 0.0,
        };
        let solver = GoodLpSolver;
        let solution = solver.solve_bip(&problem).expect("solve should succeed");
        let selected: f64 = solution.x.iter().sum();
        assert!((selected - 1.0).abs() < 1e-6);
    }
}
