use crate::{ast::Atom, eval::EvalResult};

use super::{Arity, Command, CommandCall, CommandRegistry};

pub fn register(registry: &mut CommandRegistry) {
    registry.register(AddScore);
    registry.register(CapScore);
    registry.register(GetScore);
}

/// `addScore(name, value)`; returns the new visible value.
pub struct AddScore;

impl Command for AddScore {
    fn name(&self) -> &str {
        "addScore"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let name = call.text(args, 0, "name")?;
        let value = call.decimal(args, 1, "value")?;
        let total = call.target.scores().add(&name, &call.source(), value);
        Ok(Atom::from(&total))
    }
}

/// `capScore(name, limit)`; returns the new visible value.
pub struct CapScore;

impl Command for CapScore {
    fn name(&self) -> &str {
        "capScore"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let name = call.text(args, 0, "name")?;
        let limit = call.decimal(args, 1, "limit")?;
        let total = call.target.scores().cap(&name, &call.source(), limit);
        Ok(Atom::from(&total))
    }
}

pub struct GetScore;

impl Command for GetScore {
    fn name(&self) -> &str {
        "getScore"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let name = call.text(args, 0, "name")?;
        Ok(Atom::from(&call.target.scores().value(&name)))
    }
}
