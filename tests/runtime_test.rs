use std::{sync::Arc, thread};

use csl::{
    config::EngineConfig,
    context::ContextStore,
    eval::{CoachContext, EvalError},
    host::{Answer, CoachDefinition, InMemoryHost},
    log_sink::MemoryLogSink,
    runtime::ScriptRunner,
    Engine, Error,
};
use pretty_assertions::assert_eq;

fn counting_coach() -> CoachDefinition {
    (1..=8).fold(CoachDefinition::new("count"), |coach, i| {
        coach.with_question(
            format!("q{}", i),
            r#"TRUE : : { addScore("total", 1); capScore("capped", 3); addScore("capped", 1) };"#,
        )
    })
}

#[test]
fn test_concurrent_reevaluation_is_idempotent() {
    let host = Arc::new(InMemoryHost::new());
    host.add_coach(counting_coach());
    let engine = Engine::new(host, EngineConfig::default());

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for round in 0..25 {
                    let question = format!("q{}", round % 8 + 1);
                    engine.evaluate_question("count", &question).unwrap();
                }
            });
        }
    });

    let snapshot = engine.snapshot("count").unwrap();
    assert_eq!(snapshot.scores["total"], "8");
    assert_eq!(snapshot.scores["capped"], "3");
    assert_eq!(engine.runner().registry().len(), 1);
}

#[test]
fn test_chained_fault_reports_every_line() {
    let host = Arc::new(InMemoryHost::new());
    host.add_coach(CoachDefinition::new("c").with_question(
        "q1",
        r#"
        TRUE : : addScore("s", "x");
        TRUE : : setHidden("q9", TRUE);
        TRUE : : addScore("s", 1);
        TRUE : : awardBadge("none", "gold");
        "#,
    ));
    let engine = Engine::new(host, EngineConfig::default());

    let Err(Error::Chained(fault)) = engine.evaluate_question("c", "q1") else {
        panic!("expected a chained fault");
    };
    assert_eq!(fault.executed, 4);
    assert_eq!(
        fault.faults.iter().map(|f| f.index).collect::<Vec<_>>(),
        vec![0, 1, 3]
    );
    assert_eq!(fault.faults[1].error, EvalError::UnknownQuestion("q9".to_string()));
    assert!(fault.to_string().starts_with("3 script line(s) faulted"));
    assert_eq!(engine.snapshot("c").unwrap().scores["s"], "1");
}

#[test]
fn test_syntax_fault_runs_nothing() {
    let host = Arc::new(InMemoryHost::new());
    host.add_coach(CoachDefinition::new("c").with_question(
        "q1",
        "TRUE : : addScore(\"s\", 1);\nTRUE : : addScore(;",
    ));
    let engine = Engine::new(host, EngineConfig::default());
    assert!(matches!(
        engine.evaluate_question("c", "q1"),
        Err(Error::Syntax(_))
    ));
    assert!(engine.snapshot("c").unwrap().scores.is_empty());
}

#[test]
fn test_runner_without_engine() {
    let host = InMemoryHost::new();
    let coach = Arc::new(CoachDefinition::new("c").with_question("q1", ""));
    host.add_coach((*coach).clone());
    host.set_answer("c", "q1", Answer::with_text("q1_yes"));
    let store = ContextStore::new();
    let log = MemoryLogSink::new();
    let runner = ScriptRunner::default();

    let cx = CoachContext::new(
        store.get_or_create("c"),
        &host,
        &store,
        &log,
        coach,
        "q1",
    );
    let lines = runner
        .listing(r#"isSelected("q1_yes") : : log("yes"); TRUE : : log("always");"#)
        .unwrap();
    assert_eq!(runner.run_lines(&lines, &cx), Ok(2));
    assert_eq!(runner.run_lines(&lines, &cx), Ok(2));
    assert_eq!(log.messages(), vec!["yes", "always", "yes", "always"]);
}

#[test]
fn test_reevaluation_replaces_arrays_and_appends() {
    let host = Arc::new(InMemoryHost::new());
    host.add_coach(
        CoachDefinition::new("c")
            .with_question(
                "q1",
                r#"TRUE : : { arrayAdd("a", "x"); append("t", "ab") };"#,
            )
            .with_question("q2", r#"TRUE : : arrayAdd("a", "y");"#),
    );
    let engine = Engine::new(host, EngineConfig::default());
    for _ in 0..3 {
        engine.evaluate_question("c", "q1").unwrap();
    }
    engine.evaluate_question("c", "q2").unwrap();
    engine.evaluate_question("c", "q2").unwrap();

    let variables = engine.snapshot("c").unwrap().variables;
    assert_eq!(variables["t"].value, Some("ab".to_string()));
    assert_eq!(variables["a"].sources["q1"], Some("x".to_string()));
    assert_eq!(variables["a"].sources["q2"], Some("y".to_string()));
    assert_eq!(variables["a"].value, Some("y".to_string()));
}
