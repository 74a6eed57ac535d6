//! # Script Analyzer
//!
//! Turns script text into a [`Script`]:
//!
//! 1. [`Tokenizer`] lexes the text,
//! 2. [`TokenPreprocessor`] and [`LineSegmenter`] cut the token stream into lines,
//! 3. [`parsers::parse_line`] parses each line with the combinators in
//!    [`combinators`].
//!
//! The first line that fails to parse aborts the whole script with a
//! [`SyntaxError`] naming that line's source text.

pub mod combinators;
pub mod core;
pub mod parsers;
pub mod prelude;

pub use core::ParseError;
pub use core::ParseResult;
pub use core::Parser;

use thiserror::Error;

use crate::{
    ast::Script,
    preprocessor::{LineSegmenter, Preprocessor, TokenPreprocessor},
    tokenizer::token::Tokenizer,
};

/// A script line that does not match the grammar.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("syntax error on line {line} in `{snippet}`: {message}")]
pub struct SyntaxError {
    pub snippet: String,
    pub message: String,
    pub line: usize,
}

#[tracing::instrument(level = "debug", skip(source))]
pub fn parse_script(source: &str) -> Result<Script, SyntaxError> {
    let spans = Tokenizer::new()
        .tokenize(source)
        .map_err(|e| SyntaxError {
            snippet: e.found().to_string(),
            message: e.to_string(),
            line: e.span().line,
        })?;

    let segments = LineSegmenter::new().process(TokenPreprocessor::new().process(spans));
    let mut script = Script::with_capacity(segments.len());

    for segment in segments {
        if segment.tokens.is_empty() {
            continue;
        }
        let fault = |message: String| SyntaxError {
            snippet: segment.snippet(source).to_string(),
            message,
            line: segment.line,
        };
        if !segment.terminated {
            return Err(fault("missing `;` at end of line".to_string()));
        }
        let (_, line) = parsers::parse_line()
            .parse(&segment.tokens, 0)
            .map_err(|e| fault(e.to_string()))?;
        script.push(line);
    }

    tracing::debug!("parsed {} script lines", script.len());
    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Atom, ScriptLine};

    #[test]
    fn test_parse_script() {
        let script = parse_script(
            "// pre\nTRUE : a : set(\"x\", 1);\n\nisAnswered(\"q2\") : b : {\n  addScore(\"s\", 2);\n  log(\"done\");\n};\n",
        )
        .unwrap();
        assert_eq!(script.len(), 2);
        assert_eq!(script[0].name, "a");
        assert_eq!(script[1].statements.len(), 2);
    }

    #[test]
    fn test_empty_and_comment_only_scripts() {
        assert_eq!(parse_script("").unwrap(), Vec::<ScriptLine>::new());
        assert_eq!(parse_script("// nothing\n;;").unwrap(), Vec::<ScriptLine>::new());
    }

    #[test]
    fn test_syntax_error_names_snippet() {
        let err = parse_script("TRUE : ok : log(1);\nTRUE : bad : log(1 2);").unwrap_err();
        assert_eq!(err.snippet, "TRUE : bad : log(1 2);");
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_missing_terminator() {
        let err = parse_script("TRUE : a : log(1)").unwrap_err();
        assert_eq!(err.snippet, "TRUE : a : log(1)");
        assert!(err.message.contains("missing"));
    }

    #[test]
    fn test_lexer_error_is_syntax_error() {
        let err = parse_script("TRUE : a : log(#);").unwrap_err();
        assert!(err.snippet.starts_with('#'));
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_string_escapes() {
        let script = parse_script(r#"TRUE : a : log("a \"b\" \\ c");"#).unwrap();
        assert_eq!(
            script[0].statements[0],
            Atom::call("log", vec![Atom::string(r#"a "b" \ c"#)])
        );
    }
}
