//! # Symbol Token Handling
//!
//! Symbols of the script language are few: the `.` that separates a
//! `root.`/`parent.` hop prefix from a command name, and the delimiters that
//! frame calls, statement blocks and line sections.

use strum_macros::{AsRefStr, Display, EnumString};

use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{map, value},
    error::context,
};

use super::token::{ParserResult, Token};

#[derive(Debug, Clone, PartialEq, EnumString, Display, AsRefStr)]
pub enum Operator {
    /// Hop separator (`.`) in `parent.get(..)`
    #[strum(serialize = ".")]
    Dot,
}

/// Constant for the close brace character, used because direct serialization in strum causes errors.
const CLOSE_BRACE: &str = "}";

#[derive(Debug, Clone, PartialEq, EnumString, Display, AsRefStr)]
pub enum Delimiter {
    /// Opening brace (`{`) of a statement block
    #[strum(serialize = "{")]
    OpenBrace,
    /// Closing brace (`}`) of a statement block
    #[strum(serialize = "CLOSE_BRACE")]
    CloseBrace,
    /// Opening parenthesis (`(`) of an argument list
    #[strum(serialize = "(")]
    OpenParen,
    /// Closing parenthesis (`)`) of an argument list
    #[strum(serialize = ")")]
    CloseParen,
    /// Argument separator (`,`)
    #[strum(serialize = ",")]
    Comma,
    /// Statement and line terminator (`;`)
    #[strum(serialize = ";")]
    Semicolon,
    /// Line section separator (`:`)
    #[strum(serialize = ":")]
    Colon,
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_operator(input: &str) -> ParserResult<Token> {
    context(
        "operator",
        map(value(Operator::Dot, tag(".")), Token::Operator),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_delimiter(input: &str) -> ParserResult<Token> {
    context(
        "delimiter",
        map(
            alt((
                value(Delimiter::OpenBrace, tag("{")),
                value(Delimiter::CloseBrace, tag(CLOSE_BRACE)),
                value(Delimiter::OpenParen, tag("(")),
                value(Delimiter::CloseParen, tag(")")),
                value(Delimiter::Comma, tag(",")),
                value(Delimiter::Semicolon, tag(";")),
                value(Delimiter::Colon, tag(":")),
            )),
            Token::Delimiter,
        ),
    )(input)
}
