//! Module for reading Models and gene reaction rules
pub mod gpr_parse;
pub mod json;
