use std::sync::Arc;

use thiserror::Error;

use crate::{
    ast::{Atom, AtomType, ContextHops},
    command::{CommandCall, CommandRegistry},
    context::{ContextError, ExecutionContext},
    host::HostError,
};

use super::coach_context::CoachContext;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("unknown command {0}")]
    UnknownCommand(String),
    #[error("{command} expects {expected} arguments, got {actual}")]
    Arity {
        command: String,
        expected: String,
        actual: usize,
    },
    #[error("{command}: parameter {parameter} must be {allowed}, got {actual}")]
    ArgumentType {
        command: String,
        parameter: String,
        allowed: String,
        actual: AtomType,
    },
    #[error("condition {expression} evaluated to {found}, not a boolean")]
    NotBoolean { expression: String, found: AtomType },
    #[error("{command}: {message}")]
    InvalidValue { command: String, message: String },
    #[error("unknown question {0}")]
    UnknownQuestion(String),
    #[error("unknown coach {0}")]
    UnknownCoach(String),
    #[error("unknown subcoach instance {coach_id}.{instance_id}")]
    UnknownSubcoach {
        coach_id: String,
        instance_id: String,
    },
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Host(#[from] HostError),
}

pub type EvalResult<T> = Result<T, EvalError>;

/// Evaluates atoms against a [`CoachContext`] using one command table.
#[derive(Debug, Clone)]
pub struct Evaluator {
    commands: Arc<CommandRegistry>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(Arc::new(CommandRegistry::with_builtins()))
    }
}

impl Evaluator {
    pub fn new(commands: Arc<CommandRegistry>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Literals evaluate to themselves. A call is dispatched to its command
    /// in the context its hops resolve to; arguments up to the command's
    /// eager count are evaluated first, in the active context.
    pub fn evaluate(&self, atom: &Atom, cx: &CoachContext<'_>) -> EvalResult<Atom> {
        let Atom::MethodCall { name, args, hops } = atom else {
            return Ok(atom.clone());
        };

        let command = self
            .commands
            .get(name)
            .ok_or_else(|| EvalError::UnknownCommand(name.clone()))?;

        let arity = command.arity();
        if !arity.accepts(args.len()) {
            return Err(EvalError::Arity {
                command: name.clone(),
                expected: arity.to_string(),
                actual: args.len(),
            });
        }

        let eager = command
            .eager_arguments()
            .unwrap_or(args.len())
            .min(args.len());
        let mut resolved = Vec::with_capacity(args.len());
        for (index, arg) in args.iter().enumerate() {
            if index < eager && arg.is_call() {
                resolved.push(self.evaluate(arg, cx)?);
            } else {
                resolved.push(arg.clone());
            }
        }

        let target = resolve_target(&cx.execution, *hops);
        let call = CommandCall {
            name: name.as_str(),
            cx,
            target: &target,
            evaluator: self,
        };
        command.execute(&resolved, &call)
    }

    /// Evaluates `atom` and requires a boolean result.
    pub fn is_true(&self, atom: &Atom, cx: &CoachContext<'_>) -> EvalResult<bool> {
        let value = self.evaluate(atom, cx)?;
        value.as_bool().ok_or_else(|| EvalError::NotBoolean {
            expression: atom.to_string(),
            found: value.atom_type(),
        })
    }
}

/// Walks `hops` parent links up from `active`, stopping early at a context
/// without a parent.
pub fn resolve_target(active: &Arc<ExecutionContext>, hops: ContextHops) -> Arc<ExecutionContext> {
    let mut target = active.clone();
    let mut remaining = match hops {
        ContextHops::Levels(n) => n,
        ContextHops::Root => usize::MAX,
    };
    while remaining > 0 {
        match target.parent() {
            Some(parent) => {
                let parent = parent.clone();
                target = parent;
                remaining -= 1;
            }
            None => break,
        }
    }
    target
}
