//! Answer and visibility commands.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    ast::Atom,
    eval::{EvalError, EvalResult},
    host::CoachDefinition,
};

use super::{Arity, Command, CommandCall, CommandRegistry};

pub fn register(registry: &mut CommandRegistry) {
    registry.register(IsSelected);
    registry.register(IsAnswered);
    registry.register(IsHidden);
    registry.register(SetHidden);
    registry.register(SetMHidden);
}

lazy_static! {
    static ref OWNING_QUESTION: Regex = Regex::new(r"^[^0-9]*q\d+").unwrap_or_else(|_| unreachable!());
}

/// The question an option id belongs to: its leading `…q<digits>` part.
pub fn owning_question(option_id: &str) -> Option<&str> {
    OWNING_QUESTION.find(option_id).map(|m| m.as_str())
}

/// Definition of the coach whose context `call` targets.
fn target_definition(call: &CommandCall<'_>) -> EvalResult<Arc<CoachDefinition>> {
    if call.target.coach_id().eq_ignore_ascii_case(&call.cx.coach.id) {
        return Ok(call.cx.coach.clone());
    }
    let coach_id = call.target.coach_id();
    call.cx
        .host
        .coach_definition(coach_id)?
        .ok_or_else(|| EvalError::UnknownCoach(coach_id.to_string()))
}

/// `isSelected(optionId)`: whether the answer to the option's question
/// contains the option id. Always false while that question is hidden.
pub struct IsSelected;

impl Command for IsSelected {
    fn name(&self) -> &str {
        "isSelected"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let option_id = call.text(args, 0, "optionId")?;
        let question_id = owning_question(&option_id).ok_or_else(|| {
            call.invalid(format!("{:?} does not name a question option", option_id))
        })?;
        if call.target.visibility().is_hidden(question_id) {
            return Ok(Atom::Bool(false));
        }
        let answer = call.cx.host.answer(call.target.fqcn(), question_id)?;
        Ok(answer
            .is_some_and(|answer| answer.contains_token(&option_id))
            .into())
    }
}

/// `isAnswered(questionId)`; always false while the question is hidden.
pub struct IsAnswered;

impl Command for IsAnswered {
    fn name(&self) -> &str {
        "isAnswered"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let question_id = call.text(args, 0, "questionId")?;
        if call.target.visibility().is_hidden(&question_id) {
            return Ok(Atom::Bool(false));
        }
        let answer = call.cx.host.answer(call.target.fqcn(), &question_id)?;
        Ok(answer.is_some().into())
    }
}

pub struct IsHidden;

impl Command for IsHidden {
    fn name(&self) -> &str {
        "isHidden"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let question_id = call.text(args, 0, "questionId")?;
        Ok(call.target.visibility().is_hidden(&question_id).into())
    }
}

/// `setHidden(questionId, hidden)`; returns whether visibility changed.
pub struct SetHidden;

impl Command for SetHidden {
    fn name(&self) -> &str {
        "setHidden"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let question_id = call.text(args, 0, "questionId")?;
        let hidden = call.boolean(args, 1, "hidden")?;
        let definition = target_definition(call)?;
        if definition.question(&question_id).is_none() {
            return Err(EvalError::UnknownQuestion(question_id));
        }
        Ok(call
            .target
            .visibility()
            .set_hidden(&question_id, hidden)
            .into())
    }
}

/// `setMHidden(low, high, hidden)`: every question whose id sorts in
/// `[low, high)`. Returns how many questions changed.
pub struct SetMHidden;

impl Command for SetMHidden {
    fn name(&self) -> &str {
        "setMHidden"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(3)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let low = call.text(args, 0, "low")?;
        let high = call.text(args, 1, "high")?;
        let hidden = call.boolean(args, 2, "hidden")?;
        let definition = target_definition(call)?;
        let visibility = call.target.visibility();
        let changed = definition
            .question_ids()
            .filter(|id| low.as_str() <= *id && *id < high.as_str())
            .filter(|id| visibility.set_hidden(id, hidden))
            .count();
        Ok(Atom::integer(changed as i64))
    }
}
