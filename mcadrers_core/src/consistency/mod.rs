//! Consistency of a model after removing a candidate reaction
//!
//! A cheap structural pass ([`dead_ends`]) looks for core reactions that lost their only way of
//! balancing a metabolite, and only when it finds none are flux balance problems solved
//! ([`reachability`]) to find every blocked reaction.
use crate::metabolic_model::model::ModelError;
use crate::optimize::solvers::SolverError;
use thiserror::Error;

pub mod check;
pub mod dead_ends;
pub mod reachability;

/// Errors from checking the consistency of a model
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConsistencyError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Solver(#[from] SolverError),
}
