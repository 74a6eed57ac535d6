use crate::{ast::Atom, eval::EvalResult};

use super::{Arity, Command, CommandCall, CommandRegistry};

pub fn register(registry: &mut CommandRegistry) {
    registry.register(CreateBadge);
    registry.register(AwardBadge);
    registry.register(RevokeBadge);
    registry.register(HasBadge);
    registry.register(GetBadge);
}

/// `createBadge(name, class, ...)`: classes in ascending rank.
pub struct CreateBadge;

impl Command for CreateBadge {
    fn name(&self) -> &str {
        "createBadge"
    }

    fn arity(&self) -> Arity {
        Arity::AtLeast(2)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let name = call.text(args, 0, "name")?;
        let classes = (1..args.len())
            .map(|i| call.text(args, i, "class"))
            .collect::<EvalResult<Vec<_>>>()?;
        call.target.badges().create(&name, classes);
        Ok(Atom::Bool(true))
    }
}

pub struct AwardBadge;

impl Command for AwardBadge {
    fn name(&self) -> &str {
        "awardBadge"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let name = call.text(args, 0, "name")?;
        let class = call.text(args, 1, "class")?;
        call.target.badges().award(&name, &class)?;
        Ok(Atom::Bool(true))
    }
}

/// `revokeBadge(name)`; returns whether a class was awarded.
pub struct RevokeBadge;

impl Command for RevokeBadge {
    fn name(&self) -> &str {
        "revokeBadge"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let name = call.text(args, 0, "name")?;
        Ok(call.target.badges().revoke(&name).into())
    }
}

/// `hasBadge(name, [class])`.
pub struct HasBadge;

impl Command for HasBadge {
    fn name(&self) -> &str {
        "hasBadge"
    }

    fn arity(&self) -> Arity {
        Arity::Range(1, 2)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let name = call.text(args, 0, "name")?;
        let class = if args.len() == 2 {
            Some(call.text(args, 1, "class")?)
        } else {
            None
        };
        Ok(call.target.badges().has(&name, class.as_deref())?.into())
    }
}

/// `getBadge(name)`: the awarded class, or `NULL`.
pub struct GetBadge;

impl Command for GetBadge {
    fn name(&self) -> &str {
        "getBadge"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let name = call.text(args, 0, "name")?;
        Ok(call.target.badges().awarded(&name)?.into())
    }
}
