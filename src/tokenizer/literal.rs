use nom::{
    branch::alt,
    bytes::complete::is_not,
    character::complete::{char, digit1},
    combinator::{map, opt, recognize, value},
    error::context,
    multi::many0,
    sequence::{delimited, pair, preceded, tuple},
};

use super::token::{ParserResult, Token};

/// Literal tokens. Numbers keep the exact text they were written with.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Integer(String),
    Float(String),
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_escape(input: &str) -> ParserResult<&str> {
    context(
        "string escape",
        preceded(
            char('\\'),
            alt((
                value("\"", char('"')),
                value("\\", char('\\')),
                value("\n", char('n')),
                value("\t", char('t')),
            )),
        ),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_string_literal(input: &str) -> ParserResult<Literal> {
    context(
        "string literal",
        map(
            delimited(
                char('"'),
                many0(alt((is_not("\\\""), parse_escape))),
                char('"'),
            ),
            |parts: Vec<&str>| Literal::String(parts.concat()),
        ),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_float_literal(input: &str) -> ParserResult<Literal> {
    context(
        "float literal",
        map(
            recognize(tuple((opt(char('-')), digit1, char('.'), digit1))),
            |s: &str| Literal::Float(s.to_string()),
        ),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_integer_literal(input: &str) -> ParserResult<Literal> {
    context(
        "integer literal",
        map(recognize(pair(opt(char('-')), digit1)), |s: &str| {
            Literal::Integer(s.to_string())
        }),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_literal(input: &str) -> ParserResult<Token> {
    context(
        "literal",
        map(
            alt((
                parse_string_literal,
                parse_float_literal,
                parse_integer_literal,
            )),
            Token::Literal,
        ),
    )(input)
}
