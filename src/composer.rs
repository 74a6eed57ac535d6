//! Builds the full logic text of a question: the coach's pre logic, the
//! question's own logic and the coach's post logic, in that order.

use crate::{
    eval::{EvalError, EvalResult},
    host::CoachDefinition,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct LogicComposer;

impl LogicComposer {
    pub fn new() -> Self {
        Self
    }

    /// The composed text for `question_id`. Empty parts are left out, and
    /// the parts are separated by newlines so that line numbers in syntax
    /// errors stay meaningful.
    pub fn compose(&self, coach: &CoachDefinition, question_id: &str) -> EvalResult<String> {
        let question = coach
            .question(question_id)
            .ok_or_else(|| EvalError::UnknownQuestion(question_id.to_string()))?;
        Ok([
            coach.pre_logic.as_str(),
            question.logic.as_str(),
            coach.post_logic.as_str(),
        ]
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n"))
    }
}
