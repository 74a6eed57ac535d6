use std::sync::Arc;

use crate::{
    context::{ContextStore, ExecutionContext},
    host::{Answer, CoachDefinition, CoachHost},
    log_sink::LogSink,
};

/// Everything one evaluation needs besides the expression itself: the active
/// execution context, the host, and the question being evaluated.
pub struct CoachContext<'a> {
    pub execution: Arc<ExecutionContext>,
    pub host: &'a dyn CoachHost,
    pub store: &'a ContextStore,
    pub log: &'a dyn LogSink,
    pub coach: Arc<CoachDefinition>,
    pub question_id: String,
    /// Stored answer of the question being evaluated, if there is one.
    pub answer: Option<Answer>,
}

impl<'a> CoachContext<'a> {
    pub fn new(
        execution: Arc<ExecutionContext>,
        host: &'a dyn CoachHost,
        store: &'a ContextStore,
        log: &'a dyn LogSink,
        coach: Arc<CoachDefinition>,
        question_id: impl Into<String>,
    ) -> Self {
        Self {
            execution,
            host,
            store,
            log,
            coach,
            question_id: question_id.into(),
            answer: None,
        }
    }

    pub fn with_answer(mut self, answer: Option<Answer>) -> Self {
        self.answer = answer;
        self
    }

    /// Fully-qualified name of the active coach instance.
    pub fn fqcn(&self) -> &str {
        self.execution.fqcn()
    }

    /// Source id under which writes to `target` are attributed.
    ///
    /// Writes to the active context use the question id. Writes reaching an
    /// ancestor are qualified with the active instance, so that two instances
    /// evaluating questions with the same id never revert each other's
    /// contributions.
    pub fn source_for(&self, target: &ExecutionContext) -> String {
        if std::ptr::eq(target, Arc::as_ptr(&self.execution)) {
            self.question_id.clone()
        } else {
            qualified_source(self.fqcn(), &self.question_id)
        }
    }
}

pub fn qualified_source(fqcn: &str, question_id: &str) -> String {
    format!("{}/{}", fqcn, question_id)
}

impl std::fmt::Debug for CoachContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoachContext")
            .field("fqcn", &self.fqcn())
            .field("question_id", &self.question_id)
            .field("answer", &self.answer)
            .finish()
    }
}
