//! Line grammar of the script language.
//!
//! ```text
//! line       := expression ':' name? ':' statements
//! name       := identifier | string | integer
//! statements := '{' expression? (';' expression?)* '}' | expression | <nothing>
//! expression := call | literal
//! call       := hops identifier '(' (expression (',' expression)*)? ')'
//! hops       := 'root' '.' | ('parent' '.')*
//! literal    := string | integer | float | TRUE | FALSE | NULL
//! ```
//!
//! The trailing `;` of a line has already been removed by the
//! [`LineSegmenter`](crate::preprocessor::LineSegmenter).

use crate::{
    ast::{Atom, ContextHops, ScriptLine},
    tokenizer::{
        keyword::Keyword,
        literal::Literal,
        symbol::{Delimiter, Operator},
        token::Token,
    },
};

use super::prelude::*;

pub fn parse_line() -> impl Parser<Token, ScriptLine> {
    with_context(
        map(
            tuple2(
                tuple5(
                    with_context(parse_expression(), "condition"),
                    parse_colon(),
                    optional(parse_line_name()),
                    parse_colon(),
                    parse_statements(),
                ),
                end(),
            ),
            |((condition, _, name, _, statements), _)| {
                ScriptLine::new(condition, name.unwrap_or_default(), statements)
            },
        ),
        "script line",
    )
}

fn parse_line_name() -> impl Parser<Token, String> {
    satisfy(
        |token: &Token| match token {
            Token::Identifier(s) => Some(s.clone()),
            Token::Literal(Literal::String(s) | Literal::Integer(s)) => Some(s.clone()),
            _ => None,
        },
        "line name",
    )
}

fn parse_statements() -> impl Parser<Token, Vec<Atom>> {
    choice(vec![
        Box::new(parse_block()),
        Box::new(map(parse_expression(), |statement| vec![statement])),
        Box::new(map(end(), |_| Vec::new())),
    ])
}

fn parse_block() -> impl Parser<Token, Vec<Atom>> {
    with_context(
        delimited(
            as_unit(parse_open_brace()),
            map(
                separated_list(optional(parse_expression()), as_unit(parse_semicolon())),
                |statements| statements.into_iter().flatten().collect(),
            ),
            as_unit(parse_close_brace()),
        ),
        "statement block",
    )
}

pub fn parse_expression() -> impl Parser<Token, Atom> {
    lazy(|| {
        choice(vec![
            Box::new(parse_call()),
            Box::new(parse_literal()),
        ])
    })
}

fn parse_call() -> impl Parser<Token, Atom> {
    map(
        tuple5(
            parse_hops(),
            parse_identifier(),
            parse_open_paren(),
            separated_list(parse_expression(), as_unit(parse_comma())),
            with_context(parse_close_paren(), "argument list"),
        ),
        |(hops, name, _, args, _)| Atom::call_with_hops(name, args, hops),
    )
}

fn parse_hops() -> impl Parser<Token, ContextHops> {
    choice(vec![
        Box::new(map(parse_hop("root"), |_| ContextHops::Root)),
        Box::new(map(many(parse_hop("parent")), |hops| {
            ContextHops::Levels(hops.len())
        })),
    ])
}

fn parse_hop(prefix: &'static str) -> impl Parser<Token, ()> {
    as_unit(tuple2(
        expected(parse_identifier(), prefix.to_string()),
        parse_dot(),
    ))
}

fn parse_literal() -> impl Parser<Token, Atom> {
    satisfy(
        |token: &Token| match token {
            Token::Literal(Literal::String(s)) => Some(Atom::String(s.clone())),
            Token::Literal(Literal::Integer(s)) => Some(Atom::Integer(s.clone())),
            Token::Literal(Literal::Float(s)) => Some(Atom::Float(s.clone())),
            Token::Keyword(Keyword::True) => Some(Atom::Bool(true)),
            Token::Keyword(Keyword::False) => Some(Atom::Bool(false)),
            Token::Keyword(Keyword::Null) => Some(Atom::Null),
            _ => None,
        },
        "literal or call",
    )
}

fn parse_identifier() -> impl Parser<Token, String> {
    satisfy(
        |token: &Token| match token {
            Token::Identifier(s) => Some(s.clone()),
            _ => None,
        },
        "identifier",
    )
}

fn parse_dot() -> impl Parser<Token, Token> {
    equal(Token::Operator(Operator::Dot))
}

fn parse_comma() -> impl Parser<Token, Token> {
    equal(Token::Delimiter(Delimiter::Comma))
}

fn parse_colon() -> impl Parser<Token, Token> {
    equal(Token::Delimiter(Delimiter::Colon))
}

fn parse_semicolon() -> impl Parser<Token, Token> {
    equal(Token::Delimiter(Delimiter::Semicolon))
}

fn parse_open_paren() -> impl Parser<Token, Token> {
    equal(Token::Delimiter(Delimiter::OpenParen))
}

fn parse_close_paren() -> impl Parser<Token, Token> {
    equal(Token::Delimiter(Delimiter::CloseParen))
}

fn parse_open_brace() -> impl Parser<Token, Token> {
    equal(Token::Delimiter(Delimiter::OpenBrace))
}

fn parse_close_brace() -> impl Parser<Token, Token> {
    equal(Token::Delimiter(Delimiter::CloseBrace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        preprocessor::{LineSegmenter, Preprocessor, TokenPreprocessor},
        tokenizer::token::Tokenizer,
    };
    use pretty_assertions::assert_eq;

    fn tokens(source: &str) -> Vec<Token> {
        let spans = Tokenizer::new().tokenize(source).unwrap();
        let mut segments = LineSegmenter::new().process(TokenPreprocessor::new().process(spans));
        assert_eq!(segments.len(), 1);
        segments.remove(0).tokens
    }

    fn line(source: &str) -> ScriptLine {
        let input = tokens(source);
        let (pos, line) = parse_line().parse(&input, 0).unwrap();
        assert_eq!(pos, input.len());
        line
    }

    #[test]
    fn test_single_statement() {
        assert_eq!(
            line(r#"isSelected("q1_a") : bonus : addScore("total", 5);"#),
            ScriptLine::new(
                Atom::call("isSelected", vec![Atom::string("q1_a")]),
                "bonus",
                vec![Atom::call(
                    "addScore",
                    vec![Atom::string("total"), Atom::Integer("5".to_string())]
                )],
            )
        );
    }

    #[test]
    fn test_block_with_hops_and_empty_statements() {
        assert_eq!(
            line(r#"TRUE : "group 1" : { root.set("a", 1.50); ; parent.parent.log(NULL); };"#),
            ScriptLine::new(
                Atom::Bool(true),
                "group 1",
                vec![
                    Atom::call_with_hops(
                        "set",
                        vec![Atom::string("a"), Atom::Float("1.50".to_string())],
                        ContextHops::Root,
                    ),
                    Atom::call_with_hops("log", vec![Atom::Null], ContextHops::Levels(2)),
                ],
            )
        );
    }

    #[test]
    fn test_nameless_line_and_empty_statement() {
        assert_eq!(line("FALSE : : ;"), ScriptLine::new(Atom::Bool(false), "", vec![]));
        assert_eq!(line("TRUE : 7 : {};").name, "7");
    }

    #[test]
    fn test_nested_calls() {
        let parsed = line(r#"and(not(FALSE), equals(get("x"), "y")) : n : if(TRUE, log("a"), log("b"));"#);
        assert_eq!(
            parsed.condition.to_string(),
            r#"and(not(FALSE), equals(get("x"), "y"))"#
        );
        assert_eq!(
            parsed.statements[0].to_string(),
            r#"if(TRUE, log("a"), log("b"))"#
        );
    }

    #[test]
    fn test_root_as_command_name() {
        let parsed = line("root() : n : ;");
        assert_eq!(parsed.condition, Atom::call("root", vec![]));
    }

    #[test]
    fn test_invalid_lines() {
        for source in [
            r#"TRUE : n : set("x", );"#,
            r#"TRUE : n : set("x" 1);"#,
            r#"TRUE : n : log("a") log("b");"#,
            r#"TRUE n : log("a");"#,
            r#"TRUE : n : { log("a") ;"#,
        ] {
            let input = tokens(source);
            assert!(
                parse_line().parse(&input, 0).is_err(),
                "should not parse: {}",
                source
            );
        }
    }
}
