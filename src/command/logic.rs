//! `and`, `or`, `not`, `if`, `equals`.

use crate::{ast::Atom, eval::EvalResult};

use super::{Arity, Command, CommandCall, CommandRegistry};

pub fn register(registry: &mut CommandRegistry) {
    registry.register(And);
    registry.register(Or);
    registry.register(Not);
    registry.register(If);
    registry.register(Equals);
}

/// Evaluates every argument as a condition, in order.
fn conditions(args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Vec<bool>> {
    (0..args.len()).map(|i| call.condition(args, i)).collect()
}

pub struct And;

impl Command for And {
    fn name(&self) -> &str {
        "and"
    }

    fn arity(&self) -> Arity {
        Arity::AtLeast(1)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        Ok(conditions(args, call)?.into_iter().all(|b| b).into())
    }
}

pub struct Or;

impl Command for Or {
    fn name(&self) -> &str {
        "or"
    }

    fn arity(&self) -> Arity {
        Arity::AtLeast(1)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        Ok(conditions(args, call)?.into_iter().any(|b| b).into())
    }
}

pub struct Not;

impl Command for Not {
    fn name(&self) -> &str {
        "not"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        Ok((!call.condition(args, 0)?).into())
    }
}

/// `if(condition, then, [else])`. Only the condition is evaluated before
/// dispatch, so the branch not taken has no side effects.
pub struct If;

impl Command for If {
    fn name(&self) -> &str {
        "if"
    }

    fn arity(&self) -> Arity {
        Arity::Range(2, 3)
    }

    fn eager_arguments(&self) -> Option<usize> {
        Some(1)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let branch = if call.condition(args, 0)? { 1 } else { 2 };
        match args.get(branch) {
            Some(atom) => call.evaluator.evaluate(atom, call.cx),
            None => Ok(Atom::Null),
        }
    }
}

/// Same type and same text; two `NULL`s are equal.
pub struct Equals;

impl Command for Equals {
    fn name(&self) -> &str {
        "equals"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let left = call.value(args, 0, "left")?;
        let right = call.value(args, 1, "right")?;
        Ok((left.atom_type() == right.atom_type() && left.text() == right.text()).into())
    }
}
