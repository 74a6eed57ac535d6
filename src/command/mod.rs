//! # Command Library
//!
//! Every call in a script names a [`Command`]. Commands are stateless: they
//! declare how many arguments they take and how many of those are evaluated
//! before dispatch, and act on the [`CommandCall`] they are given.
//!
//! Commands live in a [`CommandRegistry`] handed to the
//! [`Evaluator`](crate::eval::Evaluator) at construction. Registering a
//! command under an existing name replaces it, which is how tests install
//! doubles.

pub mod array;
pub mod badge;
pub mod compare;
pub mod logic;
pub mod misc;
pub mod question;
pub mod recommendation;
pub mod score;
pub mod subcoach;
pub mod variable;

use std::{collections::HashMap, fmt, sync::Arc};

use crate::{
    ast::{Atom, AtomType},
    context::ExecutionContext,
    eval::{CoachContext, EvalError, EvalResult, Evaluator},
    numeric::Decimal,
};

/// Accepted argument counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Range(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::Range(min, max) => (min..=max).contains(&count),
            Arity::AtLeast(min) => count >= min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "exactly {}", n),
            Arity::Range(min, max) => write!(f, "{} to {}", min, max),
            Arity::AtLeast(min) => write!(f, "at least {}", min),
        }
    }
}

pub trait Command: Send + Sync {
    fn name(&self) -> &str;

    fn arity(&self) -> Arity;

    /// How many leading arguments are evaluated before dispatch; `None`
    /// means all of them. Arguments left unevaluated reach the command as
    /// calls and are evaluated only if the command asks for them.
    fn eager_arguments(&self) -> Option<usize> {
        None
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom>;
}

/// One dispatch of a command.
pub struct CommandCall<'a> {
    /// Name the command was invoked under.
    pub name: &'a str,
    pub cx: &'a CoachContext<'a>,
    /// Context the call's hops resolved to.
    pub target: &'a Arc<ExecutionContext>,
    pub evaluator: &'a Evaluator,
}

const TEXT: &[AtomType] = &[AtomType::String, AtomType::Integer, AtomType::Float];
const NUMBER: &[AtomType] = &[AtomType::Integer, AtomType::Float, AtomType::String];
const VALUE: &[AtomType] = &[
    AtomType::String,
    AtomType::Integer,
    AtomType::Float,
    AtomType::Bool,
    AtomType::Null,
];

impl CommandCall<'_> {
    /// Argument `index`, evaluated if it is still a call, and checked against
    /// `allowed`.
    pub fn arg(
        &self,
        args: &[Atom],
        index: usize,
        parameter: &str,
        allowed: &[AtomType],
    ) -> EvalResult<Atom> {
        let atom = args.get(index).cloned().unwrap_or_default();
        let value = if atom.is_call() {
            self.evaluator.evaluate(&atom, self.cx)?
        } else {
            atom
        };
        if allowed.contains(&value.atom_type()) {
            Ok(value)
        } else {
            Err(EvalError::ArgumentType {
                command: self.name.to_string(),
                parameter: parameter.to_string(),
                allowed: allowed
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" or "),
                actual: value.atom_type(),
            })
        }
    }

    /// Any literal value.
    pub fn value(&self, args: &[Atom], index: usize, parameter: &str) -> EvalResult<Atom> {
        self.arg(args, index, parameter, VALUE)
    }

    /// A string or number, as text.
    pub fn text(&self, args: &[Atom], index: usize, parameter: &str) -> EvalResult<String> {
        let value = self.arg(args, index, parameter, TEXT)?;
        Ok(value.text().unwrap_or_default())
    }

    /// A string, or `NULL`.
    pub fn optional_text(
        &self,
        args: &[Atom],
        index: usize,
        parameter: &str,
    ) -> EvalResult<Option<String>> {
        let value = self.arg(
            args,
            index,
            parameter,
            &[AtomType::String, AtomType::Integer, AtomType::Null],
        )?;
        Ok(value.text())
    }

    pub fn boolean(&self, args: &[Atom], index: usize, parameter: &str) -> EvalResult<bool> {
        let value = self.arg(args, index, parameter, &[AtomType::Bool])?;
        Ok(value.as_bool().unwrap_or_default())
    }

    /// Like [`boolean`](Self::boolean), but a non-boolean value is reported
    /// as a non-boolean condition.
    pub fn condition(&self, args: &[Atom], index: usize) -> EvalResult<bool> {
        let atom = args.get(index).cloned().unwrap_or_default();
        self.evaluator.is_true(&atom, self.cx)
    }

    pub fn decimal(&self, args: &[Atom], index: usize, parameter: &str) -> EvalResult<Decimal> {
        let value = self.arg(args, index, parameter, NUMBER)?;
        let text = value.text().unwrap_or_default();
        text.parse().map_err(|_| self.invalid(format!(
            "parameter {} must be a number, got {:?}",
            parameter, text
        )))
    }

    pub fn integer(&self, args: &[Atom], index: usize, parameter: &str) -> EvalResult<i64> {
        let value = self.arg(args, index, parameter, NUMBER)?;
        let text = value.text().unwrap_or_default();
        text.trim().parse().map_err(|_| self.invalid(format!(
            "parameter {} must be an integer, got {:?}",
            parameter, text
        )))
    }

    /// Source id for writes made by this call.
    pub fn source(&self) -> String {
        self.cx.source_for(self.target)
    }

    pub fn invalid(&self, message: impl Into<String>) -> EvalError {
        EvalError::InvalidValue {
            command: self.name.to_string(),
            message: message.into(),
        }
    }
}

/// Command table, looked up by exact name.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with every built-in command.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        logic::register(&mut registry);
        compare::register(&mut registry);
        score::register(&mut registry);
        variable::register(&mut registry);
        question::register(&mut registry);
        array::register(&mut registry);
        badge::register(&mut registry);
        recommendation::register(&mut registry);
        subcoach::register(&mut registry);
        misc::register(&mut registry);
        registry
    }

    /// Registers `command` under its name, returning the command it replaced.
    pub fn register<C: Command + 'static>(&mut self, command: C) -> Option<Arc<dyn Command>> {
        self.register_arc(Arc::new(command))
    }

    pub fn register_arc(&mut self, command: Arc<dyn Command>) -> Option<Arc<dyn Command>> {
        self.commands.insert(command.name().to_string(), command)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Command>> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.names())
            .finish()
    }
}
