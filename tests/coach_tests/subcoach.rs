use csl::{
    host::{Answer, CoachDefinition},
    Atom,
};
use pretty_assertions::assert_eq;

use crate::setup;

fn coaches() -> Vec<CoachDefinition> {
    vec![
        CoachDefinition::new("program").with_question(
            "q1",
            r#"
            isSelected("q1_sleep") : : createSubcoach("habit", "sleep", "8h");
            isSelected("q1_walk")  : : createSubcoach("habit", "walk", "10k steps");
            TRUE : : set("sleepGoal", getSubcoachVariable("habit", "sleep", "goal"));
            "#,
        ),
        CoachDefinition::new("habit")
            .with_question(
                "q1",
                r#"
                TRUE : : { set("goal", getParentArgument()); root.addScore("habits", 1) };
                isSelected("q1_done") : : { addScore("streak", 1); parent.set("lastDone", getParentArgument()) };
                TRUE : : addRecommendation(concat("keep-", getParentArgument()), 2, "Keep going", getParentArgument());
                "#,
            ),
    ]
}

#[test]
fn test_subcoach_tree() {
    let coach = setup(coaches());
    let engine = &coach.engine;
    coach.host.set_answer(
        "program",
        "q1",
        Answer::with_options(["q1_sleep", "q1_walk"]),
    );
    engine.evaluate_question("program", "q1").unwrap();
    assert_eq!(
        engine.snapshot("program").unwrap().subcoaches,
        vec!["program.habit.sleep".to_string(), "program.habit.walk".to_string()]
    );
    assert_eq!(coach.host.instances().len(), 2);

    for fqcn in ["program.habit.sleep", "program.habit.walk"] {
        engine.evaluate_instance(fqcn, "q1").unwrap();
        engine.evaluate_instance(fqcn, "q1").unwrap();
    }
    coach
        .host
        .set_answer("program.habit.walk", "q1", Answer::with_options(["q1_done"]));
    engine.evaluate_instance("program.habit.walk", "q1").unwrap();

    let program = engine.snapshot("program").unwrap();
    assert_eq!(program.scores["habits"], "2");
    assert_eq!(
        engine
            .store()
            .get("program")
            .unwrap()
            .variables()
            .get("lastDone", None),
        Some(Atom::string("10k steps"))
    );
    assert_eq!(
        engine.snapshot("program.habit.walk").unwrap().scores["streak"],
        "1"
    );
    assert!(!program.scores.contains_key("streak"));

    engine.evaluate_question("program", "q1").unwrap();
    assert_eq!(
        engine
            .store()
            .get("program")
            .unwrap()
            .variables()
            .get("sleepGoal", None),
        Some(Atom::string("8h"))
    );
}

#[test]
fn test_recommendations_surface_in_root_summary() {
    let coach = setup(coaches());
    let engine = &coach.engine;
    coach
        .host
        .set_answer("program", "q1", Answer::with_options(["q1_sleep q1_walk"]));
    engine.evaluate_question("program", "q1").unwrap();
    engine.evaluate_instance("program.habit.sleep", "q1").unwrap();
    engine.evaluate_instance("program.habit.walk", "q1").unwrap();

    let program = engine.snapshot("program").unwrap();
    assert!(program.recommendations.is_empty());
    assert_eq!(
        program.subcoach_recommendations["habit.sleep"][0].id,
        "keep-8h"
    );

    let summary: Vec<(String, Option<String>)> = engine
        .recommendation_summary("program")
        .unwrap()
        .into_iter()
        .map(|r| (r.id, r.instance))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("keep-10k steps".to_string(), Some("habit.walk".to_string())),
            ("keep-8h".to_string(), Some("habit.sleep".to_string())),
        ]
    );

    assert!(engine.reset("program"));
    assert!(engine.store().is_empty());
}
