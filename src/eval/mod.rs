//! Atom evaluation.

pub mod coach_context;
pub mod evaluator;

pub use coach_context::CoachContext;
pub use evaluator::{resolve_target, EvalError, EvalResult, Evaluator};
