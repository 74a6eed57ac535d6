//! # Engine
//!
//! Entry point for hosts: "the answer to this question changed, re-evaluate
//! it". The engine looks the coach up through the [`CoachHost`], composes
//! the question's logic, fetches or parses the listing and runs it against
//! the coach's execution context.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    composer::LogicComposer,
    config::EngineConfig,
    context::{ContextError, ContextSnapshot, ContextStore, ExecutionContext, Recommendation},
    eval::{CoachContext, EvalError},
    host::{CoachDefinition, CoachHost},
    log_sink::{LogSink, TracingLogSink},
    runtime::{ChainedFault, ScriptRunner},
    CslResult, Error,
};

pub struct Engine {
    host: Arc<dyn CoachHost>,
    log: Arc<dyn LogSink>,
    store: ContextStore,
    runner: ScriptRunner,
    composer: LogicComposer,
}

impl Engine {
    /// An engine logging script output through `tracing`.
    pub fn new(host: Arc<dyn CoachHost>, config: EngineConfig) -> Self {
        Self::with_log_sink(host, Arc::new(TracingLogSink), config)
    }

    pub fn with_log_sink(
        host: Arc<dyn CoachHost>,
        log: Arc<dyn LogSink>,
        config: EngineConfig,
    ) -> Self {
        Self::with_runner(host, log, ScriptRunner::new(config))
    }

    pub fn with_runner(host: Arc<dyn CoachHost>, log: Arc<dyn LogSink>, runner: ScriptRunner) -> Self {
        Self {
            host,
            log,
            store: ContextStore::new(),
            runner,
            composer: LogicComposer::new(),
        }
    }

    pub fn host(&self) -> &Arc<dyn CoachHost> {
        &self.host
    }

    pub fn store(&self) -> &ContextStore {
        &self.store
    }

    pub fn runner(&self) -> &ScriptRunner {
        &self.runner
    }

    /// Re-evaluates `question_id` of top-level coach `coach_id`. Returns the
    /// number of lines whose statements ran.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn evaluate_question(&self, coach_id: &str, question_id: &str) -> CslResult<usize> {
        let coach = self.coach_definition(coach_id)?;
        let execution = self.store.get_or_create(coach_id);
        self.evaluate(execution, coach, question_id)
    }

    /// Re-evaluates every question of `coach_id` in definition order.
    ///
    /// A syntax fault stops at the offending question. Line faults of all
    /// questions are collected and returned together after the last one.
    pub fn evaluate_coach(&self, coach_id: &str) -> CslResult<usize> {
        let coach = self.coach_definition(coach_id)?;
        let execution = self.store.get_or_create(coach_id);
        let mut executed = 0;
        let mut faults = Vec::new();
        for question in &coach.questions {
            match self.evaluate(execution.clone(), coach.clone(), &question.id) {
                Ok(count) => executed += count,
                Err(Error::Chained(chained)) => {
                    executed += chained.executed;
                    faults.extend(chained.faults);
                }
                Err(e) => return Err(e),
            }
        }
        info!(
            "evaluated {} questions of {}, {} lines executed",
            coach.questions.len(),
            coach_id,
            executed
        );
        if faults.is_empty() {
            Ok(executed)
        } else {
            Err(ChainedFault { faults, executed }.into())
        }
    }

    /// Re-evaluates `question_id` of the subcoach instance named `fqcn`.
    pub fn evaluate_instance(&self, fqcn: &str, question_id: &str) -> CslResult<usize> {
        let execution = self
            .store
            .get(fqcn)
            .ok_or_else(|| ContextError::UnknownContext(fqcn.to_string()))?;
        let coach = self.coach_definition(execution.coach_id())?;
        self.evaluate(execution, coach, question_id)
    }

    pub fn snapshot(&self, key: &str) -> CslResult<ContextSnapshot> {
        self.store
            .get(key)
            .map(|context| context.snapshot())
            .ok_or_else(|| ContextError::UnknownContext(key.to_string()).into())
    }

    pub fn recommendation_summary(&self, key: &str) -> CslResult<Vec<Recommendation>> {
        Ok(self.store.recommendation_summary(key)?)
    }

    /// Forgets the context of `key` and every context below it.
    pub fn reset(&self, key: &str) -> bool {
        self.store.reset(key)
    }

    fn coach_definition(&self, coach_id: &str) -> CslResult<Arc<CoachDefinition>> {
        self.host
            .coach_definition(coach_id)?
            .ok_or_else(|| EvalError::UnknownCoach(coach_id.to_string()).into())
    }

    fn evaluate(
        &self,
        execution: Arc<ExecutionContext>,
        coach: Arc<CoachDefinition>,
        question_id: &str,
    ) -> CslResult<usize> {
        let text = self.composer.compose(&coach, question_id)?;
        let script = self.runner.listing(&text)?;
        let answer = self.host.answer(execution.fqcn(), question_id)?;
        debug!(
            "evaluating {} of {} ({} lines)",
            question_id,
            execution.fqcn(),
            script.len()
        );
        let cx = CoachContext::new(
            execution,
            self.host.as_ref(),
            &self.store,
            self.log.as_ref(),
            coach,
            question_id,
        )
        .with_answer(answer);
        Ok(self.runner.execute_question(&script, &cx)?)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("store", &self.store)
            .field("runner", &self.runner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::Atom,
        host::{Answer, InMemoryHost, MockCoachHost},
        log_sink::MemoryLogSink,
        numeric::Decimal,
    };

    fn engine() -> (Arc<InMemoryHost>, Arc<MemoryLogSink>, Engine) {
        let host = Arc::new(InMemoryHost::new());
        host.add_coach(
            CoachDefinition::new("intro")
                .with_pre_logic(r#"TRUE : : log("pre");"#)
                .with_question("q1", r#"isSelected("q1_a") : : addScore("total", 5);"#)
                .with_question(
                    "q2",
                    r#"isSelected("q2_a") : : createSubcoach("child", "a", "from q2");"#,
                ),
        );
        host.add_coach(
            CoachDefinition::new("child")
                .with_question("q1", r#"TRUE : : root.addScore("total", 1);"#),
        );
        let log = Arc::new(MemoryLogSink::new());
        let engine = Engine::with_log_sink(host.clone(), log.clone(), EngineConfig::default());
        (host, log, engine)
    }

    #[test]
    fn test_answer_change_reevaluates() {
        let (host, log, engine) = engine();
        assert_eq!(engine.evaluate_question("intro", "q1").unwrap(), 1);
        let total = || engine.store().get("intro").unwrap().scores().value("total");
        assert_eq!(total(), Decimal::from(0));

        host.set_answer("intro", "q1", Answer::with_options(["q1_a"]));
        assert_eq!(engine.evaluate_question("intro", "q1").unwrap(), 2);
        assert_eq!(engine.evaluate_question("intro", "q1").unwrap(), 2);
        assert_eq!(total(), Decimal::from(5));

        host.clear_answer("intro", "q1");
        engine.evaluate_question("intro", "q1").unwrap();
        assert_eq!(total(), Decimal::from(0));
        assert_eq!(log.messages().len(), 4);
    }

    #[test]
    fn test_subcoach_instance_evaluation() {
        let (host, _, engine) = engine();
        host.set_answer("intro", "q2", Answer::with_options(["q2_a"]));
        engine.evaluate_coach("intro").unwrap();
        assert!(engine.store().contains("intro.child.a"));

        engine.evaluate_instance("intro.child.a", "q1").unwrap();
        engine.evaluate_instance("intro.child.a", "q1").unwrap();
        let snapshot = engine.snapshot("intro").unwrap();
        assert_eq!(snapshot.scores["total"], "1");
        assert_eq!(snapshot.subcoaches, vec!["intro.child.a".to_string()]);

        let child = engine.store().get("intro.child.a").unwrap();
        assert_eq!(child.parent_argument(), "from q2");
        assert!(matches!(
            engine.evaluate_instance("intro.child.b", "q1"),
            Err(Error::Context(ContextError::UnknownContext(_)))
        ));
    }

    #[test]
    fn test_unknown_coach_and_question() {
        let (_, _, engine) = engine();
        assert_eq!(
            engine.evaluate_question("nope", "q1"),
            Err(Error::Eval(EvalError::UnknownCoach("nope".to_string())))
        );
        assert_eq!(
            engine.evaluate_question("intro", "q9"),
            Err(Error::Eval(EvalError::UnknownQuestion("q9".to_string())))
        );
    }

    #[test]
    fn test_coach_faults_are_collected() {
        let host = Arc::new(InMemoryHost::new());
        host.add_coach(
            CoachDefinition::new("broken")
                .with_question("q1", "TRUE : : nosuch();")
                .with_question("q2", r#"TRUE : : set("ok", TRUE);"#)
                .with_question("q3", "TRUE : : getScore();"),
        );
        let engine = Engine::new(host, EngineConfig::default());
        let error = engine.evaluate_coach("broken").unwrap_err();
        let questions: Vec<&str> = error
            .line_faults()
            .iter()
            .map(|fault| fault.question_id.as_str())
            .collect();
        assert_eq!(questions, vec!["q1", "q3"]);
        assert_eq!(
            engine
                .store()
                .get("broken")
                .unwrap()
                .variables()
                .get("ok", None),
            Some(Atom::Bool(true))
        );
    }

    #[test]
    fn test_answer_is_looked_up_by_instance() {
        let mut host = MockCoachHost::new();
        host.expect_coach_definition().returning(|_| {
            Ok(Some(Arc::new(
                CoachDefinition::new("Intro").with_question("q1", ""),
            )))
        });
        host.expect_answer()
            .withf(|instance_id, question_id| instance_id == "intro" && question_id == "q1")
            .times(1)
            .returning(|_, _| Ok(None));
        let engine = Engine::new(Arc::new(host), EngineConfig::default());
        assert_eq!(engine.evaluate_question("Intro", "q1"), Ok(0));
    }
}
