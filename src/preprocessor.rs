//! # Preprocessor
//!
//! Sits between the tokenizer and the line parser:
//!
//! ```text
//! Script text → Tokenizer → TokenPreprocessor → LineSegmenter → Line parser → Script
//! ```
//!
//! * [`TokenPreprocessor`] drops whitespace, newline and comment tokens.
//! * [`LineSegmenter`] cuts the remaining stream into one segment per script
//!   line, at every `;` that is not nested inside `(..)` or `{..}`. Each
//!   segment remembers its byte range in the source so a syntax fault can name
//!   the offending snippet.

use crate::tokenizer::{
    symbol::Delimiter,
    token::{Token, TokenSpan},
};

/// A trait for preprocessing different types of input
pub trait Preprocessor<T, U = T> {
    /// Process the input of type T and return the processed result
    fn process(&self, input: T) -> U;
}

#[derive(Debug, Default)]
pub struct TokenPreprocessor {}

impl TokenPreprocessor {
    pub fn new() -> Self {
        Self {}
    }
}

impl Preprocessor<Vec<TokenSpan>> for TokenPreprocessor {
    fn process(&self, input: Vec<TokenSpan>) -> Vec<TokenSpan> {
        input
            .into_iter()
            .filter(|span| !span.token.is_trivia())
            .collect()
    }
}

/// The tokens of one script line, without its terminating `;`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    pub tokens: Vec<Token>,
    /// Byte offset of the first token.
    pub start: usize,
    /// Byte offset just past the terminator (or the last token if unterminated).
    pub end: usize,
    pub line: usize,
    pub terminated: bool,
}

impl LineSegment {
    /// Source text of the segment, for error messages.
    pub fn snippet<'a>(&self, source: &'a str) -> &'a str {
        source
            .get(self.start..self.end)
            .map(str::trim)
            .unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct LineSegmenter {}

impl LineSegmenter {
    pub fn new() -> Self {
        Self {}
    }
}

impl Preprocessor<Vec<TokenSpan>, Vec<LineSegment>> for LineSegmenter {
    fn process(&self, input: Vec<TokenSpan>) -> Vec<LineSegment> {
        let mut segments = Vec::new();
        let mut current: Option<LineSegment> = None;
        let mut depth: i32 = 0;

        for span in input {
            if span.token.is_trivia() {
                continue;
            }
            let segment = current.get_or_insert_with(|| LineSegment {
                tokens: Vec::new(),
                start: span.start,
                end: span.end,
                line: span.line,
                terminated: false,
            });
            segment.end = span.end;
            match &span.token {
                Token::Delimiter(Delimiter::OpenParen | Delimiter::OpenBrace) => depth += 1,
                Token::Delimiter(Delimiter::CloseParen | Delimiter::CloseBrace) => depth -= 1,
                Token::Delimiter(Delimiter::Semicolon) if depth <= 0 => {
                    segment.terminated = true;
                    depth = 0;
                    if let Some(done) = current.take() {
                        segments.push(done);
                    }
                    continue;
                }
                _ => {}
            }
            segment.tokens.push(span.token);
        }

        if let Some(rest) = current {
            segments.push(rest);
        }
        segments
    }
}
