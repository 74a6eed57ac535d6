//! Subcoach instances: nested coaches whose contexts are linked under the
//! context that created them.

use crate::{
    ast::Atom,
    eval::{EvalError, EvalResult},
};

use super::{Arity, Command, CommandCall, CommandRegistry};

pub fn register(registry: &mut CommandRegistry) {
    registry.register(CreateSubcoach);
    registry.register(RemoveSubcoach);
    registry.register(GetParentArgument);
    registry.register(GetSubcoachVariable);
}

/// `createSubcoach(coachId, instanceId, [argument])`; returns whether the
/// instance is new. Creating an existing instance changes nothing.
pub struct CreateSubcoach;

impl Command for CreateSubcoach {
    fn name(&self) -> &str {
        "createSubcoach"
    }

    fn arity(&self) -> Arity {
        Arity::Range(2, 3)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let coach_id = call.text(args, 0, "coachId")?;
        let instance_id = call.text(args, 1, "instanceId")?;
        let argument = if args.len() == 3 {
            call.optional_text(args, 2, "argument")?.unwrap_or_default()
        } else {
            String::new()
        };

        let host = call.cx.host;
        if host.coach_definition(&coach_id)?.is_none() {
            return Err(EvalError::UnknownCoach(coach_id));
        }

        let (child, created) =
            call.cx
                .store
                .create_subcoach(call.target, &coach_id, &instance_id, &argument)?;
        if created {
            if let Err(e) = host.create_subcoach(&coach_id, child.fqcn()) {
                call.cx
                    .store
                    .remove_subcoach(call.target, &coach_id, &instance_id);
                return Err(e.into());
            }
            tracing::debug!("subcoach {} created from {}", child.fqcn(), call.target.fqcn());
        }
        Ok(created.into())
    }
}

/// `removeSubcoach(coachId, instanceId)`; returns whether it existed.
pub struct RemoveSubcoach;

impl Command for RemoveSubcoach {
    fn name(&self) -> &str {
        "removeSubcoach"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let coach_id = call.text(args, 0, "coachId")?;
        let instance_id = call.text(args, 1, "instanceId")?;
        let fqcn = call
            .target
            .subcoach(&coach_id, &instance_id)
            .map(|handle| handle.fqcn);
        let removed = call
            .cx
            .store
            .remove_subcoach(call.target, &coach_id, &instance_id);
        if let Some(fqcn) = fqcn {
            call.cx.host.remove_subcoach(&coach_id, &fqcn)?;
        }
        Ok(removed.into())
    }
}

/// `getParentArgument()`: the argument given at creation, empty for a
/// top-level coach.
pub struct GetParentArgument;

impl Command for GetParentArgument {
    fn name(&self) -> &str {
        "getParentArgument"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(0)
    }

    fn execute(&self, _args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        Ok(Atom::string(call.target.parent_argument()))
    }
}

/// `getSubcoachVariable(coachId, instanceId, name)`: the most recent value
/// the instance wrote to `name`, or `NULL`.
pub struct GetSubcoachVariable;

impl Command for GetSubcoachVariable {
    fn name(&self) -> &str {
        "getSubcoachVariable"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(3)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let coach_id = call.text(args, 0, "coachId")?;
        let instance_id = call.text(args, 1, "instanceId")?;
        let name = call.text(args, 2, "name")?;
        let handle = call
            .target
            .subcoach(&coach_id, &instance_id)
            .ok_or(EvalError::UnknownSubcoach {
                coach_id,
                instance_id,
            })?;
        Ok(handle.variables.get(&name, None).unwrap_or_default())
    }
}
