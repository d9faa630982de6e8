//! Interface to the LP solvers used for flux balance problems
pub mod clarabel;

use crate::configuration::Configuration;
use crate::metabolic_model::model::Model;
use crate::optimize::{ObjectiveSense, OptimizationStatus, ProblemSolution};
use thiserror::Error;

/// A solver for the flux balance linear program of a model
///
/// The problem is `S v = 0`, `lb <= v <= ub`, optimizing `c . v` in the direction of `sense`,
/// where `S`, the bounds and `c` are read from the model. Implementations report an infeasible
/// problem through [`ProblemSolution::status`], and every other failure as a [`SolverError`].
pub trait LpSolver {
    fn optimize(
        &self,
        model: &Model,
        sense: ObjectiveSense,
        configuration: &Configuration,
    ) -> Result<ProblemSolution, SolverError>;
}

impl<T: LpSolver + ?Sized> LpSolver for &T {
    fn optimize(
        &self,
        model: &Model,
        sense: ObjectiveSense,
        configuration: &Configuration,
    ) -> Result<ProblemSolution, SolverError> {
        (**self).optimize(model, sense, configuration)
    }
}

/// Errors from the solver
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SolverError {
    /// The solver stopped without reaching an optimum or proving infeasibility
    #[error("Solver failed with status {0:?}")]
    Failed(OptimizationStatus),
    /// The problem couldn't be handed to the solver
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),
}
