//! Lex a GPR string into a series of tokens for later parsing

use thiserror::Error;

/// Tokens of a gene protein reaction rule
#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub enum Token {
    /// A gene identifier
    Gene(String),
    /// Conjunction (`and`, `&`, `&&`)
    And,
    /// Disjunction (`or`, `|`, `||`)
    Or,
    /// Negation, lexed only so the parser can reject it with a useful error
    Not,
    LeftParen,
    RightParen,
    Eof,
}

/// Converts a GPR string into a vector of [`Token`]s
pub struct Lexer {
    source: Vec<char>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
        }
    }

    /// Consume the source, returning the tokens terminated by [`Token::Eof`]
    pub fn lex(mut self) -> Result<Vec<Token>, LexerError> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token()?;
        }
        self.tokens.push(Token::Eof);
        Ok(self.tokens)
    }

    fn scan_token(&mut self) -> Result<(), LexerError> {
        let c = self.advance();
        match c {
            '(' => self.tokens.push(Token::LeftParen),
            ')' => self.tokens.push(Token::RightParen),
            // Both the single and doubled forms are accepted
            '&' => {
                self.match_char('&');
                self.tokens.push(Token::And)
            }
            '|' => {
                self.match_char('|');
                self.tokens.push(Token::Or)
            }
            c if c.is_whitespace() => {}
            c if Lexer::is_identifier_char(c) => self.read_identifier(),
            character => {
                return Err(LexerError::InvalidCharacter {
                    character,
                    position: self.start,
                })
            }
        };
        Ok(())
    }

    fn read_identifier(&mut self) {
        while !self.is_at_end() && Lexer::is_identifier_char(self.peek()) {
            self.advance();
        }
        let text: String = self.source[self.start..self.current].iter().collect();
        let token = match text.as_str() {
            "and" | "And" | "AND" => Token::And,
            "or" | "Or" | "OR" => Token::Or,
            "not" | "Not" | "NOT" => Token::Not,
            _ => Token::Gene(text),
        };
        self.tokens.push(token);
    }

    /// Characters allowed in gene identifiers, covers ids like `Rv0001`, `10005.1`,
    /// `HGNC:1234` and `b0001-a`
    fn is_identifier_char(c: char) -> bool {
        c.is_alphanumeric() || matches!(c, '_' | '.' | ':' | '-' | '@' | '/')
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    fn match_char(&mut self, expected: char) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.current += 1;
            return true;
        }
        false
    }

    fn peek(&self) -> char {
        self.source[self.current]
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }
}

/// Errors raised while lexing a GPR string
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexerError {
    /// A character which can't start any token
    #[error("Invalid character `{character}` at position {position}")]
    InvalidCharacter { character: char, position: usize },
}
