//! Implements a solver interface for Clarabel
//!
//! The flux balance problem is written in Clarabel's conic form
//!
//! ```text
//! minimize    q'x
//! subject to  Ax + s = b,  s in K
//! ```
//!
//! where the zero cone holds the mass balance rows (and the bound of any fixed reaction) and the
//! nonnegative cone holds the finite flux bounds.
use crate::configuration::{Configuration, SolverSettings};
use crate::metabolic_model::model::Model;
use crate::optimize::solvers::{LpSolver, SolverError};
use crate::optimize::{ObjectiveSense, OptimizationStatus, ProblemSolution};

use clarabel::algebra::CscMatrix;
use clarabel::solver::*;
use indexmap::IndexMap;
use tracing::trace;

/// Solves flux balance problems with the Clarabel interior point solver
#[derive(Clone, Copy, Debug, Default)]
pub struct ClarabelSolver;

impl ClarabelSolver {
    pub fn new() -> Self {
        ClarabelSolver
    }
}

impl LpSolver for ClarabelSolver {
    fn optimize(
        &self,
        model: &Model,
        sense: ObjectiveSense,
        configuration: &Configuration,
    ) -> Result<ProblemSolution, SolverError> {
        let num_reactions = model.num_reactions();
        if num_reactions == 0 {
            return Ok(ProblemSolution {
                status: OptimizationStatus::Optimal,
                objective_value: Some(0.),
                fluxes: Some(IndexMap::new()),
            });
        }
        let problem = ConicProblem::from_model(model, sense)?;
        let p = CscMatrix::<f64>::zeros((num_reactions, num_reactions));
        let mut solver = DefaultSolver::new(
            &p,
            &problem.q,
            &problem.a,
            &problem.b,
            &problem.cones,
            settings(&configuration.solver),
        );
        solver.solve();

        let status = convert_status(&solver.solution.status);
        trace!(?status, iterations = solver.solution.iterations, "Clarabel solve");
        match status {
            OptimizationStatus::Optimal | OptimizationStatus::AlmostOptimal => {
                let fluxes: IndexMap<String, f64> = model
                    .reactions()
                    .iter()
                    .cloned()
                    .zip(solver.solution.x.iter().copied())
                    .collect();
                let objective_value = model
                    .objective()
                    .iter()
                    .zip(fluxes.values())
                    .map(|(c, v)| c * v)
                    .sum();
                Ok(ProblemSolution {
                    status,
                    objective_value: Some(objective_value),
                    fluxes: Some(fluxes),
                })
            }
            OptimizationStatus::Infeasible => Ok(ProblemSolution::infeasible()),
            other => Err(SolverError::Failed(other)),
        }
    }
}

/// Data of the conic problem, in Clarabel's layout
struct ConicProblem {
    q: Vec<f64>,
    a: CscMatrix<f64>,
    b: Vec<f64>,
    cones: Vec<SupportedConeT<f64>>,
}

impl ConicProblem {
    fn from_model(model: &Model, sense: ObjectiveSense) -> Result<Self, SolverError> {
        let stoichiometry = model.stoichiometry();
        let lower = model.lower_bounds();
        let upper = model.upper_bounds();
        let num_reactions = model.num_reactions();

        // Metabolites no reaction touches would only add empty rows
        let mut balance_rows = vec![None; model.num_metabolites()];
        let mut num_balance = 0usize;
        for (row, _, _) in stoichiometry.triplet_iter() {
            if balance_rows[row].is_none() {
                balance_rows[row] = Some(0);
            }
        }
        for row in balance_rows.iter_mut().flatten() {
            *row = num_balance;
            num_balance += 1;
        }

        let mut b = vec![0.; num_balance];
        // Fixed reactions get an equality row
        let mut fixed_rows = vec![None; num_reactions];
        for j in 0..num_reactions {
            if lower[j].is_nan() || upper[j].is_nan() || lower[j] > upper[j] {
                return Err(SolverError::InvalidProblem(format!(
                    "reaction `{}` has bounds [{}, {}]",
                    model.reactions()[j],
                    lower[j],
                    upper[j]
                )));
            }
            if lower[j] == upper[j] {
                fixed_rows[j] = Some(b.len());
                b.push(lower[j]);
            }
        }
        let num_zero = b.len();
        // Finite bounds of the remaining reactions as `x <= ub` and `-x <= -lb`
        let mut bound_rows = vec![(None, None); num_reactions];
        for j in 0..num_reactions {
            if fixed_rows[j].is_some() {
                continue;
            }
            if upper[j].is_finite() {
                bound_rows[j].0 = Some(b.len());
                b.push(upper[j]);
            }
            if lower[j].is_finite() {
                bound_rows[j].1 = Some(b.len());
                b.push(-lower[j]);
            }
        }
        let num_nonnegative = b.len() - num_zero;

        let mut colptr = Vec::with_capacity(num_reactions + 1);
        let mut rowval = Vec::new();
        let mut nzval = Vec::new();
        colptr.push(0);
        for j in 0..num_reactions {
            let column = stoichiometry.col(j);
            let mut entries = column
                .row_indices()
                .iter()
                .zip(column.values())
                .filter_map(|(row, value)| balance_rows[*row].map(|r| (r, *value)))
                .collect::<Vec<_>>();
            entries.sort_by_key(|(row, _)| *row);
            for (row, value) in entries {
                rowval.push(row);
                nzval.push(value);
            }
            if let Some(row) = fixed_rows[j] {
                rowval.push(row);
                nzval.push(1.);
            }
            if let Some(row) = bound_rows[j].0 {
                rowval.push(row);
                nzval.push(1.);
            }
            if let Some(row) = bound_rows[j].1 {
                rowval.push(row);
                nzval.push(-1.);
            }
            colptr.push(rowval.len());
        }
        let a = CscMatrix::new(b.len(), num_reactions, colptr, rowval, nzval);

        let mut cones = Vec::with_capacity(2);
        if num_zero > 0 {
            cones.push(SupportedConeT::ZeroConeT(num_zero));
        }
        if num_nonnegative > 0 {
            cones.push(SupportedConeT::NonnegativeConeT(num_nonnegative));
        }

        // Clarabel only minimizes
        let q = match sense {
            ObjectiveSense::Minimize => model.objective().to_vec(),
            ObjectiveSense::Maximize => model.objective().iter().map(|c| -c).collect(),
        };
        Ok(ConicProblem { q, a, b, cones })
    }
}

fn settings(solver: &SolverSettings) -> DefaultSettings<f64> {
    DefaultSettings {
        verbose: solver.verbose,
        max_iter: solver.max_iter,
        time_limit: solver.time_limit,
        tol_feas: solver.tol_feas,
        tol_gap_abs: solver.tol_gap_abs,
        tol_gap_rel: solver.tol_gap_rel,
        ..DefaultSettings::default()
    }
}

fn convert_status(status: &SolverStatus) -> OptimizationStatus {
    match status {
        SolverStatus::Solved => OptimizationStatus::Optimal,
        SolverStatus::AlmostSolved => OptimizationStatus::AlmostOptimal,
        SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
            OptimizationStatus::Infeasible
        }
        SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
            OptimizationStatus::Unbounded
        }
        SolverStatus::MaxIterations
        | SolverStatus::MaxTime
        | SolverStatus::InsufficientProgress => OptimizationStatus::SolverHalted,
        _ => OptimizationStatus::NumericalError,
    }
}
