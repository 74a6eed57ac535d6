//! # Whitespace Token Handling
//!
//! Whitespace is kept as tokens so spans stay exact; the
//! [`TokenPreprocessor`](crate::preprocessor::TokenPreprocessor) removes it
//! before parsing. Line breaks carry no meaning in a script (`;` ends a line),
//! but they are tracked to report line/column positions.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    combinator::map,
    error::context,
};

use super::token::{ParserResult, Token};

/// Spaces, tabs and stray carriage returns.
///
/// ```
/// # use csl::tokenizer::whitespace::parse_whitespace;
/// # use csl::tokenizer::token::Token;
/// let (rest, token) = parse_whitespace(" \t x").unwrap();
/// assert_eq!(token, Token::Whitespace(" \t ".to_string()));
/// assert_eq!(rest, "x");
/// ```
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_whitespace(input: &str) -> ParserResult<Token> {
    context(
        "whitespace expected",
        map(
            take_while1(|c| c == ' ' || c == '\t' || c == '\r'),
            |ws: &str| Token::Whitespace(ws.to_string()),
        ),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_newline(input: &str) -> ParserResult<Token> {
    context(
        "newline expected",
        map(alt((tag("\r\n"), tag("\n"))), |_| Token::Newline),
    )(input)
}
