//! # CSL: Coach Script Language
//!
//! CSL is the rule engine behind adaptive coaching questionnaires. Every
//! question of a coach carries a small script that reacts to the stored
//! answers: it adds to scores, sets variables, hides or shows questions,
//! awards badges, recommends content and spawns nested coaches.
//!
//! ## Script Shape
//!
//! A script is a list of lines, each `condition : name : statements ;`:
//!
//! ```text
//! isSelected("q1_a") : level : { addScore("total", 5); awardBadge("reader", "gold") };
//! TRUE               : level : addScore("total", 1);
//! ```
//!
//! Lines sharing a name form a group of alternatives: within one pass only
//! the first line of a group whose condition holds runs.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Logic text → Tokenizer → Preprocessor → Analyzer → AST Registry → Script Runner
//! ```
//!
//! * [`tokenizer`]: nom-based lexer producing positioned tokens
//! * [`preprocessor`]: strips trivia and cuts the stream into lines
//! * [`analyzer`]: parser combinators building [`ast::ScriptLine`]s
//! * [`ast_registry`]: bounded cache of parsed listings keyed by text
//! * [`runtime`]: re-evaluation passes with per-question revert
//!
//! ## Evaluation
//!
//! The [`eval`] module evaluates [`ast::Atom`]s against a
//! [`CoachContext`](eval::CoachContext), dispatching calls to the
//! [`command`] library. Commands act on [`context::ExecutionContext`]s, one
//! per coach instance, which outlive single evaluations and form a tree
//! through subcoach links.
//!
//! ## Host Integration
//!
//! The platform is reached only through [`host::CoachHost`]. The
//! [`engine::Engine`] façade wires a host, a [`context::ContextStore`], the
//! [`composer`] and the runner together.

pub mod analyzer;
pub mod ast;
pub mod ast_registry;
pub mod command;
pub mod composer;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod eval;
pub mod host;
pub mod log_sink;
pub mod numeric;
pub mod preprocessor;
pub mod runtime;
pub mod tokenizer;

// Re-exports
pub use ast::*;
pub use engine::Engine;
pub use error::*;
pub use eval::*;
