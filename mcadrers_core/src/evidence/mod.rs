//! Propagation of gene confidence scores through gene reaction rules to reaction evidence
//!
//! The pipeline is [`clauses`] (rules into disjunctive normal form), then [`combine`] (gene
//! scores into clause scores), then [`calculate`] (clause scores and the high confidence mask
//! into one evidence value per reaction).
use crate::evidence::clauses::GprClauseError;
use thiserror::Error;

pub mod calculate;
pub mod clauses;
pub mod combine;
pub mod score;

/// Errors from building evidence inputs or computing evidence
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EvidenceError {
    #[error("Score {score} of gene `{gene}` is outside [0, 1]")]
    ScoreOutOfRange { gene: String, score: f64 },
    #[error("Gene `{0}` has more than one score")]
    DuplicateGene(String),
    #[error("High confidence mask has length {found}, but the model has {expected} reactions")]
    MaskMisaligned { expected: usize, found: usize },
    #[error("Reaction `{0}` is not in the model")]
    UnknownReaction(String),
    #[error(transparent)]
    Clauses(#[from] GprClauseError),
}
