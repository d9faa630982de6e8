//! Module for solving flux balance linear programs on a [`Model`]
//!
//! [`Model`]: crate::metabolic_model::model::Model

pub mod solvers;

use indexmap::IndexMap;

/// Sense of the objective
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ObjectiveSense {
    Minimize,
    Maximize,
}

/// Struct representing the solution to a flux balance problem
#[derive(Clone, Debug, PartialEq)]
pub struct ProblemSolution {
    /// The status of the optimization problem, representing if the optimization was
    /// completed successfully
    pub status: OptimizationStatus,
    /// Optimized value of the objective
    ///
    /// Some(f64) if the optimization was completed successfully, None otherwise
    pub objective_value: Option<f64>,
    /// Flux through each reaction at the optimum
    ///
    /// Some(IndexMap), keyed by reaction id in model order, if the problem could be solved,
    /// None otherwise
    pub fluxes: Option<IndexMap<String, f64>>,
}

impl ProblemSolution {
    /// Solution of a problem without a feasible point
    pub fn infeasible() -> Self {
        ProblemSolution {
            status: OptimizationStatus::Infeasible,
            objective_value: None,
            fluxes: None,
        }
    }

    /// Flux of a single reaction, None if the problem wasn't solved
    pub fn flux(&self, reaction: &str) -> Option<f64> {
        self.fluxes.as_ref().and_then(|f| f.get(reaction).copied())
    }

    pub fn is_infeasible(&self) -> bool {
        self.status == OptimizationStatus::Infeasible
    }
}

/// Status of an optimization problem
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OptimizationStatus {
    /// Problem has been optimized
    Optimal,
    /// An approximate solution has been found
    AlmostOptimal,
    /// Problem can't be solved because it is infeasible (conflicting constraints)
    Infeasible,
    /// Problem can't be optimized because objective value is not bounded
    Unbounded,
    /// A numerical error occurred during solving
    NumericalError,
    /// The solver hit the maximum allowed iterations, or max time, or made insufficient progress
    SolverHalted,
}
