use crate::io::gpr_parse::lexer::Token;
use crate::metabolic_model::gpr::Gpr;

use thiserror::Error;

static EOF: Token = Token::Eof;
/*
GPR Grammar:
expression -> disjunction
disjunction -> conjunction ( "OR" conjunction )* ;
conjunction -> primary ( "AND" primary )* ;
primary -> GENE | "(" expression ")" ;

AND binds tighter than OR, e.g. Gene1 OR Gene2 AND Gene3 is Gene1 OR (Gene2 AND Gene3)
 */

/// GPR Parser
pub struct GPRParser {
    /// Vector of tokens from the GPR string
    tokens: Vec<Token>,
    /// Current token being processed
    current: usize,
}

impl GPRParser {
    /// Create a new GPRParser, `tokens` must be terminated by [`Token::Eof`]
    pub fn new(tokens: Vec<Token>) -> GPRParser {
        GPRParser { tokens, current: 0 }
    }

    // region Parsing Functions

    /// Parse the token vector into a GPR AST
    pub fn parse(&mut self) -> Result<Gpr, ParseError> {
        let gpr = self.disjunction()?;
        if !self.is_at_end() {
            // If entire expression has not been parsed, an error has occurred
            return match self.peek() {
                Token::RightParen => Err(ParseError::UnmatchedRightParen),
                _ => Err(ParseError::EarlyTermination),
            };
        }
        Ok(gpr)
    }

    fn disjunction(&mut self) -> Result<Gpr, ParseError> {
        let mut terms = vec![self.conjunction()?];
        while self.match_token(&Token::Or) {
            terms.push(self.conjunction()?);
        }
        Ok(Gpr::new_or(terms))
    }

    fn conjunction(&mut self) -> Result<Gpr, ParseError> {
        let mut factors = vec![self.primary()?];
        while self.match_token(&Token::And) {
            factors.push(self.primary()?);
        }
        Ok(Gpr::new_and(factors))
    }

    fn primary(&mut self) -> Result<Gpr, ParseError> {
        if let Some(identifier) = self.match_identifier() {
            return Ok(Gpr::new_gene_node(&identifier));
        }

        if self.match_token(&Token::LeftParen) {
            let expr = self.disjunction()?;
            self.consume(&Token::RightParen, "Expect ')' after expression.")?;
            return Ok(expr);
        }

        if self.check(&Token::Not) {
            return Err(ParseError::UnsupportedNegation);
        }

        Err(ParseError::ExpectedExpression)
    }

    // endregion Parsing Functions

    // region parsing helper functions

    /// Check whether the token at the current position matches `token`, if it does advance
    /// [`self.current`] and return true, otherwise return false
    fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            return true;
        }
        false
    }

    /// If the current token is a gene identifier advance and return `Some(GeneId)`,
    /// otherwise return None
    fn match_identifier(&mut self) -> Option<String> {
        if let Token::Gene(id) = self.peek() {
            let id = id.clone();
            self.advance();
            return Some(id);
        }
        None
    }

    /// Check whether the current token matches the provided `token`
    fn check(&self, token: &Token) -> bool {
        !self.is_at_end() && self.peek() == token
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        *self.peek() == Token::Eof
    }

    /// Current token, a missing trailing Eof is treated as though it were present
    fn peek(&self) -> &Token {
        self.tokens.get(self.current).unwrap_or(&EOF)
    }

    /// Advance past `token` or return a [`ParseError::MissingToken`] with `msg`.
    /// Used mainly for matching parenthesis.
    fn consume(&mut self, token: &Token, msg: &str) -> Result<(), ParseError> {
        if self.match_token(token) {
            return Ok(());
        }
        Err(ParseError::MissingToken(msg.to_string()))
    }

    // endregion parsing helper functions
}

/// Enum representing possible parse errors
#[derive(Debug, Error, PartialEq, Clone)]
pub enum ParseError {
    /// Missing expected token (e.g. a right parenthesis)
    #[error("Missing expected token: {0}")]
    MissingToken(String),
    /// A `)` without a matching `(`
    #[error("Found `)` without a matching `(`")]
    UnmatchedRightParen,
    /// No expression found when one was expected
    #[error("No expression found, check for a dangling `and`/`or` or empty parentheses")]
    ExpectedExpression,
    /// Expression was not completed when parsing terminated
    #[error("Parsing terminated early, check for two gene identifiers without an operator between them")]
    EarlyTermination,
    /// Negation was used, which can't be scored
    #[error("`not` is not supported in GPR rules")]
    UnsupportedNegation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::gpr_parse::lexer::Lexer;

    fn parse(rule: &str) -> Result<Gpr, ParseError> {
        let tokens = Lexer::new(rule).lex().unwrap();
        GPRParser::new(tokens).parse()
    }

    fn gene(id: &str) -> Gpr {
        Gpr::new_gene_node(id)
    }

    #[test]
    fn single_gene_parse() {
        assert_eq!(parse("Rv1304").unwrap(), gene("Rv1304"));
    }

    #[test]
    fn and_parse() {
        assert_eq!(
            parse("Rv1304 and Rv0023").unwrap(),
            Gpr::And(vec![gene("Rv1304"), gene("Rv0023")])
        );
    }

    #[test]
    fn or_parse() {
        assert_eq!(
            parse("Rv1304 or Rv0023").unwrap(),
            Gpr::Or(vec![gene("Rv1304"), gene("Rv0023")])
        );
    }

    #[test]
    fn grouping_parse() {
        assert_eq!(
            parse("(Rv3141 or Rv0023) and Rv0018").unwrap(),
            Gpr::And(vec![
                Gpr::Or(vec![gene("Rv3141"), gene("Rv0023")]),
                gene("Rv0018"),
            ])
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        assert_eq!(
            parse("Rv0001 or Rv0002 and Rv0003").unwrap(),
            Gpr::Or(vec![
                gene("Rv0001"),
                Gpr::And(vec![gene("Rv0002"), gene("Rv0003")]),
            ])
        );
        assert_eq!(
            parse("Rv0001 and Rv0002 or Rv0003").unwrap(),
            Gpr::Or(vec![
                Gpr::And(vec![gene("Rv0001"), gene("Rv0002")]),
                gene("Rv0003"),
            ])
        );
    }

    #[test]
    fn repeated_binary_parse() {
        assert_eq!(
            parse("Rv0001 and Rv0002 and Rv0003").unwrap(),
            Gpr::And(vec![gene("Rv0001"), gene("Rv0002"), gene("Rv0003")])
        );
    }

    #[test]
    fn redundant_parentheses() {
        assert_eq!(parse("((Rv0001))").unwrap(), gene("Rv0001"));
        assert_eq!(
            parse("(Rv0001) or ((Rv0002) and (Rv0003))").unwrap(),
            Gpr::Or(vec![
                gene("Rv0001"),
                Gpr::And(vec![gene("Rv0002"), gene("Rv0003")]),
            ])
        );
    }

    #[test]
    fn missing_operator() {
        assert_eq!(
            parse("Rv0001 Rv0023").unwrap_err(),
            ParseError::EarlyTermination
        );
    }

    #[test]
    fn unbalanced_parentheses() {
        assert!(matches!(
            parse("(Rv0001 and Rv0002").unwrap_err(),
            ParseError::MissingToken(_)
        ));
        assert_eq!(
            parse("Rv0001 and Rv0002)").unwrap_err(),
            ParseError::UnmatchedRightParen
        );
    }

    #[test]
    fn dangling_operator() {
        assert_eq!(
            parse("Rv0001 and").unwrap_err(),
            ParseError::ExpectedExpression
        );
        assert_eq!(parse("or Rv0001").unwrap_err(), ParseError::ExpectedExpression);
        assert_eq!(parse("()").unwrap_err(), ParseError::ExpectedExpression);
    }

    #[test]
    fn negation_rejected() {
        assert_eq!(
            parse("Rv0001 and not Rv0023").unwrap_err(),
            ParseError::UnsupportedNegation
        );
    }
}
