//! # Core Parser Definitions
//!
//! The parser interface and error type underneath the combinators.

use thiserror::Error;

/// Parser over a slice of already-tokenized input.
///
/// # Type Parameters
///
/// * `I` - The input token type
/// * `O` - The output value type
pub trait Parser<I, O> {
    /// Attempts to parse the input starting at `pos`; on success returns the
    /// position after the consumed input together with the parsed value.
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O>;
}

pub type ParseResult<O> = Result<(usize, O), ParseError>;

/// Any `Fn(&[I], usize) -> ParseResult<O>` is a parser; every combinator in
/// [`combinators`](super::combinators) builds one of these.
impl<I, O, F> Parser<I, O> for F
where
    F: Fn(&[I], usize) -> ParseResult<O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        self(input, pos)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected end of line at token {position}")]
    UnexpectedEof { position: usize },
    #[error("expected {expected}, found {found} at token {position}")]
    Unexpected {
        expected: String,
        found: String,
        position: usize,
    },
    #[error("no alternative matched at token {position}")]
    NoAlternative { position: usize },
    #[error("{message} at token {position}")]
    Fail { message: String, position: usize },
    #[error("{message}: {inner}")]
    WithContext {
        message: String,
        inner: Box<ParseError>,
    },
}

impl ParseError {
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnexpectedEof { position }
            | ParseError::Unexpected { position, .. }
            | ParseError::NoAlternative { position }
            | ParseError::Fail { position, .. } => *position,
            ParseError::WithContext { inner, .. } => inner.position(),
        }
    }
}
