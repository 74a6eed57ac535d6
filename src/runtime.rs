//! # Script Runner
//!
//! Executes parsed listings against an execution context.
//!
//! A question's logic is re-run every time its answer changes. Before each
//! run, everything the question contributed on the previous run is taken
//! back out (score entries, per-question variable values), so a run
//! replaces the question's earlier effects instead of adding to them.
//!
//! A faulting line does not stop the pass: every line is attempted and the
//! faults are returned together as one [`ChainedFault`].

use std::{fmt, sync::Arc};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    ast::{Script, ScriptLine},
    ast_registry::AstRegistry,
    config::EngineConfig,
    context::RunState,
    eval::{coach_context::qualified_source, CoachContext, EvalError, Evaluator},
    CslResult,
};

/// A fault raised by one line of a pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineFault {
    pub question_id: String,
    /// Zero-based position of the line in its listing.
    pub index: usize,
    /// The line, rendered back to script syntax.
    pub line: String,
    pub message: String,
    #[serde(skip)]
    pub error: EvalError,
}

impl fmt::Display for LineFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} line {} `{}`: {}",
            self.question_id,
            self.index + 1,
            self.line,
            self.message
        )
    }
}

/// Every fault of one pass, in line order.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub struct ChainedFault {
    pub faults: Vec<LineFault>,
    /// Lines whose statements ran, faulting or not.
    pub executed: usize,
}

impl fmt::Display for ChainedFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} script line(s) faulted", self.faults.len())?;
        for fault in &self.faults {
            write!(f, "\n  {}", fault)?;
        }
        Ok(())
    }
}

/// Result of a pass: the number of lines whose statements ran.
pub type RunResult = Result<usize, ChainedFault>;

#[derive(Debug, Clone)]
pub struct ScriptRunner {
    registry: Arc<AstRegistry>,
    evaluator: Evaluator,
    config: EngineConfig,
}

impl Default for ScriptRunner {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ScriptRunner {
    pub fn new(config: EngineConfig) -> Self {
        let registry = Arc::new(AstRegistry::new(config.ast_cache_capacity));
        Self::with_parts(registry, Evaluator::default(), config)
    }

    /// A runner sharing `registry` with other runners and dispatching through
    /// `evaluator`.
    pub fn with_parts(registry: Arc<AstRegistry>, evaluator: Evaluator, config: EngineConfig) -> Self {
        Self {
            registry,
            evaluator,
            config,
        }
    }

    pub fn registry(&self) -> &Arc<AstRegistry> {
        &self.registry
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The parsed listing for `text`, from the cache when it was seen before.
    pub fn listing(&self, text: &str) -> CslResult<Arc<Script>> {
        Ok(self.registry.get_or_parse(text)?)
    }

    /// Re-evaluates the question of `cx`.
    ///
    /// Under the active context's run lock: takes back every score entry the
    /// question added to the active context and to each ancestor, drops the
    /// question's per-source variable values except system variables, and
    /// runs `lines`.
    #[tracing::instrument(level = "debug", skip(self, lines, cx), fields(fqcn = cx.fqcn(), question = %cx.question_id))]
    pub fn execute_question(&self, lines: &[ScriptLine], cx: &CoachContext<'_>) -> RunResult {
        let execution = &cx.execution;
        let mut state = execution.lock_run();
        state.clear();

        let question_id = cx.question_id.as_str();
        let mut reverted = execution.scores().revert_source(question_id);
        let qualified = qualified_source(execution.fqcn(), question_id);
        for ancestor in execution.ancestors() {
            reverted += ancestor.scores().revert_source(&qualified);
        }
        reverted += execution
            .variables()
            .revert_source(question_id, &self.config.system_variable_prefix);
        debug!("reverted {} prior contributions", reverted);

        self.run_locked(lines, cx, &mut state)
    }

    /// Runs one pass of `lines` without reverting anything first.
    pub fn run_lines(&self, lines: &[ScriptLine], cx: &CoachContext<'_>) -> RunResult {
        let mut state = cx.execution.lock_run();
        self.run_locked(lines, cx, &mut state)
    }

    /// Parses (or fetches) `text` and re-evaluates the question of `cx`
    /// with it.
    pub fn execute_text(&self, text: &str, cx: &CoachContext<'_>) -> CslResult<usize> {
        let script = self.listing(text)?;
        Ok(self.execute_question(&script, cx)?)
    }

    fn run_locked(
        &self,
        lines: &[ScriptLine],
        cx: &CoachContext<'_>,
        state: &mut RunState,
    ) -> RunResult {
        state.clear();
        let mut faults = Vec::new();
        let mut executed = 0;

        for (index, line) in lines.iter().enumerate() {
            match self.run_line(line, cx, state) {
                Ok(true) => executed += 1,
                Ok(false) => {}
                Err((ran, error)) => {
                    if ran {
                        executed += 1;
                    }
                    let fault = LineFault {
                        question_id: cx.question_id.clone(),
                        index,
                        line: line.to_string(),
                        message: error.to_string(),
                        error,
                    };
                    warn!(fqcn = cx.fqcn(), question = %cx.question_id, "{}", fault);
                    faults.push(fault);
                }
            }
        }

        debug!("{} of {} lines executed", executed, lines.len());
        if faults.is_empty() {
            Ok(executed)
        } else {
            Err(ChainedFault { faults, executed })
        }
    }

    /// Returns whether the statements ran. On a fault the flag tells whether
    /// the line had started its statements.
    fn run_line(
        &self,
        line: &ScriptLine,
        cx: &CoachContext<'_>,
        state: &mut RunState,
    ) -> Result<bool, (bool, EvalError)> {
        let holds = self
            .evaluator
            .is_true(&line.condition, cx)
            .map_err(|e| (false, e))?;
        if !holds || !state.fire(&line.name) {
            return Ok(false);
        }
        debug!("line {:?} fired", line.name);
        for statement in &line.statements {
            self.evaluator
                .evaluate(statement, cx)
                .map_err(|e| (true, e))?;
        }
        Ok(true)
    }
}
