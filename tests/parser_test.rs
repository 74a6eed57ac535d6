use csl::{
    analyzer::parse_script,
    ast::{Atom, ContextHops, ScriptLine},
};
use pretty_assertions::assert_eq;

#[test]
fn it_parses_a_coach_script() {
    let input = r#"
        // intro
        isSelected("q1_a") : bonus : { addScore("total", 5); awardBadge("reader", "gold"); };
        and(isAnswered("q2"), not(isHidden("q3"))) : "group two" : root.set("seen", TRUE);
        TRUE : 7 : parent.parent.append("trail", "x");   // trailing comment
        FALSE : : ;
    "#;
    let script = parse_script(input).unwrap();
    assert_eq!(
        script,
        vec![
            ScriptLine::new(
                Atom::call("isSelected", vec![Atom::string("q1_a")]),
                "bonus",
                vec![
                    Atom::call("addScore", vec![Atom::string("total"), Atom::integer(5)]),
                    Atom::call(
                        "awardBadge",
                        vec![Atom::string("reader"), Atom::string("gold")]
                    ),
                ],
            ),
            ScriptLine::new(
                Atom::call(
                    "and",
                    vec![
                        Atom::call("isAnswered", vec![Atom::string("q2")]),
                        Atom::call(
                            "not",
                            vec![Atom::call("isHidden", vec![Atom::string("q3")])]
                        ),
                    ]
                ),
                "group two",
                vec![Atom::call_with_hops(
                    "set",
                    vec![Atom::string("seen"), Atom::Bool(true)],
                    ContextHops::Root,
                )],
            ),
            ScriptLine::new(
                Atom::Bool(true),
                "7",
                vec![Atom::call_with_hops(
                    "append",
                    vec![Atom::string("trail"), Atom::string("x")],
                    ContextHops::Levels(2),
                )],
            ),
            ScriptLine::new(Atom::Bool(false), "", vec![]),
        ]
    );
}

#[test]
fn it_keeps_literal_text() {
    let script = parse_script(r#"TRUE : : set("n", 1.50, -3, "a \"b\" \\ c", NULL);"#).unwrap();
    let Atom::MethodCall { args, .. } = &script[0].statements[0] else {
        panic!("expected a call");
    };
    assert_eq!(
        args,
        &vec![
            Atom::string("n"),
            Atom::Float("1.50".to_string()),
            Atom::integer(-3),
            Atom::string(r#"a "b" \ c"#),
            Atom::Null,
        ]
    );
}

#[test]
fn it_renders_lines_back_to_source() {
    let input = r#"root.equals(getScore("s"), 1.0) : n : { parent.set("a\"b", TRUE); log("x"); };"#;
    let script = parse_script(input).unwrap();
    let rendered = script[0].to_string();
    assert_eq!(rendered, input);
    assert_eq!(parse_script(&rendered).unwrap(), script);
}

#[test]
fn it_reports_the_offending_line() {
    let input = "TRUE : : addScore(\"s\", 1);\nTRUE : : addScore(\"s\" 1);\nTRUE : : x();";
    let error = parse_script(input).unwrap_err();
    assert_eq!(error.snippet, r#"TRUE : : addScore("s" 1);"#);
    assert_eq!(error.line, 2);

    for invalid in [
        "TRUE : addScore(\"s\", 1);",
        "TRUE : : addScore(\"s\", 1)",
        "TRUE : : { a() b() };",
        "TRUE : : a(;",
        "a.b() : : c();",
        "TRUE : : @;",
    ] {
        assert!(parse_script(invalid).is_err(), "accepted {:?}", invalid);
    }
}
