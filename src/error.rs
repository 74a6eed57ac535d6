use thiserror::Error;

use crate::analyzer::{ParseError, SyntaxError};
use crate::context::ContextError;
use crate::eval::EvalError;
use crate::host::HostError;
use crate::runtime::ChainedFault;
use crate::tokenizer::token::TokenizerError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    // syntax fault
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    // semantic fault
    #[error("Eval error: {0}")]
    Eval(#[from] EvalError),
    #[error("Context error: {0}")]
    Context(#[from] ContextError),
    #[error("Host error: {0}")]
    Host(#[from] HostError),
    #[error("{0}")]
    Chained(#[from] ChainedFault),
    #[error("Config error: {0}")]
    Config(String),
}

pub type CslResult<T> = Result<T, Error>;

impl Error {
    /// The line faults of a chained fault; empty for every other error.
    pub fn line_faults(&self) -> &[crate::runtime::LineFault] {
        match self {
            Error::Chained(chained) => &chained.faults,
            _ => &[],
        }
    }
}
