//! # Tokenizer Component
//!
//! Lexical analysis for Coach Script Language logic text. Raw script text is
//! turned into a stream of [`TokenSpan`](token::TokenSpan)s that carry byte
//! offsets as well as line/column positions, so syntax faults can quote the
//! offending snippet.
//!
//! ## Component Structure
//!
//! * [`token`]: Core token types and tokenizer implementation
//! * [`keyword`]: `TRUE`, `FALSE` and `NULL`
//! * [`symbol`]: Delimiters and the `.` hop separator
//! * [`literal`]: String and number literals, kept as canonical text
//! * [`whitespace`]: Whitespace and newline handling
//! * [`comment`]: `//` line comments
//!
//! Whitespace and comments are preserved as tokens; the
//! [`preprocessor`](crate::preprocessor) strips them before parsing.
//!
//! ## Usage Example
//!
//! ```rust
//! use csl::tokenizer::token::Tokenizer;
//!
//! let mut tokenizer = Tokenizer::new();
//! let tokens = tokenizer.tokenize(r#"TRUE : n : set("a", 1);"#).unwrap();
//! assert!(!tokens.is_empty());
//! ```

pub mod comment;
pub mod keyword;
pub mod literal;
pub mod symbol;
pub mod token;
pub mod whitespace;
