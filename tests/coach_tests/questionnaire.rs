use csl::{host::Answer, host::CoachDefinition, Atom};
use pretty_assertions::assert_eq;

use crate::setup;

fn sleep_coach() -> CoachDefinition {
    CoachDefinition::new("sleep")
        .with_pre_logic(r#"TRUE : : set("sys_visits", concat(get("sys_visits", NULL, ""), "x"));"#)
        .with_question(
            "q1",
            r#"
            // hours of sleep
            isSelected("q1_short") : level : { set("level", "low"); setMHidden("q3", "q5", FALSE) };
            isSelected("q1_long")  : level : { set("level", "high"); setMHidden("q3", "q5", TRUE) };
            TRUE                   : level : set("level", "unknown");
            "#,
        )
        .with_question(
            "q2",
            r#"isAnswered("q2") : : addScore("quality", if(isSelected("q2_good"), 10, 2));"#,
        )
        .with_question("q3", "")
        .with_question("q4", r#"isSelected("q4_yes") : : addScore("quality", -5);"#)
        .with_question("q5", "")
}

#[test]
fn test_first_matching_line_of_a_group_wins() {
    let coach = setup(vec![sleep_coach()]);
    let engine = &coach.engine;

    engine.evaluate_question("sleep", "q1").unwrap();
    let level = || engine.store().get("sleep").unwrap().variables().get("level", None);
    assert_eq!(level(), Some(Atom::string("unknown")));

    coach
        .host
        .set_answer("sleep", "q1", Answer::with_options(["q1_long"]));
    engine.evaluate_question("sleep", "q1").unwrap();
    assert_eq!(level(), Some(Atom::string("high")));
    assert_eq!(
        engine.snapshot("sleep").unwrap().hidden_questions,
        vec!["q3".to_string(), "q4".to_string()]
    );

    coach
        .host
        .set_answer("sleep", "q1", Answer::with_options(["q1_short"]));
    engine.evaluate_question("sleep", "q1").unwrap();
    assert_eq!(level(), Some(Atom::string("low")));
    assert!(engine.snapshot("sleep").unwrap().hidden_questions.is_empty());
}

#[test]
fn test_hidden_questions_do_not_score() {
    let coach = setup(vec![sleep_coach()]);
    let engine = &coach.engine;
    coach
        .host
        .set_answer("sleep", "q2", Answer::with_options(["q2_good"]));
    coach
        .host
        .set_answer("sleep", "q4", Answer::with_options(["q4_yes"]));
    engine.evaluate_coach("sleep").unwrap();
    assert_eq!(engine.snapshot("sleep").unwrap().scores["quality"], "5");

    coach
        .host
        .set_answer("sleep", "q1", Answer::with_options(["q1_long"]));
    engine.evaluate_coach("sleep").unwrap();
    assert_eq!(engine.snapshot("sleep").unwrap().scores["quality"], "10");
}

#[test]
fn test_system_variables_accumulate_across_passes() {
    let coach = setup(vec![sleep_coach()]);
    let engine = &coach.engine;
    engine.evaluate_question("sleep", "q1").unwrap();
    engine.evaluate_question("sleep", "q1").unwrap();
    engine.evaluate_question("sleep", "q2").unwrap();

    let variables = engine.store().get("sleep").unwrap().variables().clone();
    assert_eq!(variables.get("sys_visits", None), Some(Atom::string("xxx")));
}
