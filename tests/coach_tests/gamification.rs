use csl::{
    host::{Answer, CoachDefinition},
    Atom,
};
use pretty_assertions::assert_eq;

use crate::setup;

fn fitness_coach() -> CoachDefinition {
    CoachDefinition::new("fitness")
        .with_pre_logic(r#"TRUE : : createBadge("runner", "bronze", "silver", "gold");"#)
        .with_question(
            "q1",
            r#"
            isSelected("q1_5k")  : medal : awardBadge("runner", "gold");
            isSelected("q1_1k")  : medal : awardBadge("runner", "bronze");
            TRUE                 : medal : revokeBadge("runner");
            hasBadge("runner", "gold") : : addRecommendation("marathon", 1, "Marathon", "Try a marathon", "goal:running:red");
            not(hasBadge("runner", "gold")) : : removeRecommendation("marathon");
            "#,
        )
        .with_question(
            "q2",
            r#"
            isSelected("q2_swim") : : arrayAdd("sports", "swim", TRUE);
            isSelected("q2_bike") : : arrayAdd("sports", "bike, road", TRUE);
            greaterThan(arrayLength("sports"), 1) : : log("multisport", arrayGet("sports", 1));
            "#,
        )
}

#[test]
fn test_badges_follow_answers() {
    let coach = setup(vec![fitness_coach()]);
    let engine = &coach.engine;
    let badge = || engine.snapshot("fitness").unwrap().badges["runner"].awarded.clone();

    engine.evaluate_question("fitness", "q1").unwrap();
    assert_eq!(badge(), None);

    coach
        .host
        .set_answer("fitness", "q1", Answer::with_options(["q1_1k"]));
    engine.evaluate_question("fitness", "q1").unwrap();
    assert_eq!(badge(), Some("bronze".to_string()));

    coach
        .host
        .set_answer("fitness", "q1", Answer::with_options(["q1_5k"]));
    engine.evaluate_question("fitness", "q1").unwrap();
    assert_eq!(badge(), Some("gold".to_string()));

    let summary = engine.recommendation_summary("fitness").unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].tags[0].label, "goal");

    coach.host.clear_answer("fitness", "q1");
    engine.evaluate_question("fitness", "q1").unwrap();
    assert_eq!(badge(), None);
    assert!(engine.recommendation_summary("fitness").unwrap().is_empty());
}

#[test]
fn test_array_variables() {
    let coach = setup(vec![fitness_coach()]);
    let engine = &coach.engine;
    coach.host.set_answer(
        "fitness",
        "q2",
        Answer::with_options(["q2_swim q2_bike"]),
    );
    engine.evaluate_question("fitness", "q2").unwrap();
    engine.evaluate_question("fitness", "q2").unwrap();

    let context = engine.store().get("fitness").unwrap();
    assert_eq!(
        context.variables().get("sports", Some("q2")),
        Some(Atom::string(r"swim, bike\, road"))
    );
    assert_eq!(coach.log.messages(), vec!["multisport bike, road"; 2]);
}
