//! Module providing the Model struct for representing a metabolic model, and the GPR rules
//! attached to its reactions.

pub mod gpr;
pub mod model;
pub mod reaction;
