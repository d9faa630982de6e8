//! Core rust implementation of mcadrers, a crate for pruning genome scale metabolic models
//! into context specific models.
//!
//! Gene scores are propagated through the gene reaction rules into reaction evidence
//! ([`evidence`]), and candidate removals are checked for blocking the core of the model
//! ([`consistency`]). Flux balance problems are solved with Clarabel ([`optimize`]).

pub mod configuration;
pub mod consistency;
pub mod evidence;
pub mod io;
pub mod metabolic_model;
pub mod optimize;
