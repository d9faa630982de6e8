//! Module for parsing Gene Protein Reaction strings into AST values

use crate::io::gpr_parse::lexer::LexerError;
use crate::io::gpr_parse::parser::ParseError;
use crate::metabolic_model::gpr::Gpr;
use thiserror::Error;

mod lexer;
pub mod parser;

/// Parse a Gene Protein Reaction string into a GPR Tree
///
/// # Parameters
/// - `input`: &str representing the gene protein reaction rule
///
/// # Returns
/// Parse result which is
/// - `Ok(Some(gpr))`: The root node of the GPR tree
/// - `Ok(None)`: The rule was empty (or only whitespace), so no genes are associated with the
///     reaction
/// - `Err`: Returns the GprParseError describing the issue with the GPR rule which
///     was being parsed.
///
/// # Examples
/// ```rust
/// use mcadrers_core::io::gpr_parse::parse_gpr;
/// let gpr = parse_gpr("Rv0001 and (Rv0002 or Rv0003)").unwrap().unwrap();
/// assert_eq!(gpr.to_clauses().len(), 2);
/// assert!(parse_gpr("  ").unwrap().is_none());
/// ```
pub fn parse_gpr(input: &str) -> Result<Option<Gpr>, GprParseError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    // Convert the GPR string into tokens
    let tokens = lexer::Lexer::new(input).lex()?;
    // Now parse those tokens into a GPR tree
    let gpr = parser::GPRParser::new(tokens).parse()?;
    Ok(Some(gpr))
}

/// Enum representing possible lex and parse errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GprParseError {
    /// Lexing Error
    #[error("Error occurred during lexing (conversion of GPR string to tokens): {0}")]
    LexingError(#[from] LexerError),
    /// Parsing Error
    #[error("Error occurred during parsing (conversion of tokens to GPR tree): {0}")]
    ParsingError(#[from] ParseError),
}
