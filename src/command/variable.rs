//! `set`, `get` and `append`.
//!
//! The optional key argument selects the source a value is stored under.
//! Without it the source is the evaluating question; an explicit `NULL` key
//! addresses the variable's fallback (most recent) value.

use crate::{ast::Atom, eval::EvalResult};

use super::{Arity, Command, CommandCall, CommandRegistry};

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Set);
    registry.register(Get);
    registry.register(Append);
}

/// Resolves the optional key argument at `index`.
fn source_key(args: &[Atom], index: usize, call: &CommandCall<'_>) -> EvalResult<Option<String>> {
    if index < args.len() {
        call.optional_text(args, index, "key")
    } else {
        Ok(Some(call.source()))
    }
}

/// `set(name, [key,] value)`; returns the value.
pub struct Set;

impl Command for Set {
    fn name(&self) -> &str {
        "set"
    }

    fn arity(&self) -> Arity {
        Arity::Range(2, 3)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let name = call.text(args, 0, "name")?;
        let (key, value_index) = if args.len() == 3 {
            (source_key(args, 1, call)?, 2)
        } else {
            (Some(call.source()), 1)
        };
        let value = call.value(args, value_index, "value")?;
        call.target
            .variables()
            .set(&name, key.as_deref(), value.clone());
        Ok(value)
    }
}

/// `get(name, [key, [default]])`.
pub struct Get;

impl Command for Get {
    fn name(&self) -> &str {
        "get"
    }

    fn arity(&self) -> Arity {
        Arity::Range(1, 3)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let name = call.text(args, 0, "name")?;
        let key = source_key(args, 1, call)?;
        match call.target.variables().get(&name, key.as_deref()) {
            Some(value) => Ok(value),
            None if args.len() == 3 => call.value(args, 2, "default"),
            None => Ok(Atom::Null),
        }
    }
}

/// `append(name, [key,] text)`: appends to the current text value and
/// returns the result.
pub struct Append;

impl Command for Append {
    fn name(&self) -> &str {
        "append"
    }

    fn arity(&self) -> Arity {
        Arity::Range(2, 3)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let name = call.text(args, 0, "name")?;
        let (key, text_index) = if args.len() == 3 {
            (source_key(args, 1, call)?, 2)
        } else {
            (Some(call.source()), 1)
        };
        let suffix = call.text(args, text_index, "text")?;
        let variables = call.target.variables();
        // Read-modify-write sees only its own key so a rerun does not append twice.
        let current = match key.as_deref() {
            Some(key) => variables.get_own(&name, key),
            None => variables.get(&name, None),
        };
        let current = current
            .and_then(|value| value.text())
            .unwrap_or_default();
        let value = Atom::String(current + &suffix);
        variables.set(&name, key.as_deref(), value.clone());
        Ok(value)
    }
}
