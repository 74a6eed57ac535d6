use crate::{ast::Atom, eval::EvalResult};

use super::{Arity, Command, CommandCall, CommandRegistry};

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Concat);
    registry.register(Log);
    registry.register(GetMetadata);
    registry.register(HasHandler);
}

/// Text of every argument; `NULL` renders as nothing.
fn texts(args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Vec<String>> {
    (0..args.len())
        .map(|i| Ok(call.value(args, i, "value")?.text().unwrap_or_default()))
        .collect()
}

/// `concat(value, ...)`.
pub struct Concat;

impl Command for Concat {
    fn name(&self) -> &str {
        "concat"
    }

    fn arity(&self) -> Arity {
        Arity::AtLeast(0)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        Ok(Atom::String(texts(args, call)?.concat()))
    }
}

/// `log(value, ...)`: writes the space-joined values to the log sink and
/// returns them.
pub struct Log;

impl Command for Log {
    fn name(&self) -> &str {
        "log"
    }

    fn arity(&self) -> Arity {
        Arity::AtLeast(1)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let message = texts(args, call)?.join(" ");
        call.cx.log.log(call.cx.fqcn(), &call.cx.question_id, &message);
        Ok(Atom::String(message))
    }
}

/// `getMetadata(group, key, [default])`. An absent value is `NULL` unless
/// a default is given.
pub struct GetMetadata;

impl Command for GetMetadata {
    fn name(&self) -> &str {
        "getMetadata"
    }

    fn arity(&self) -> Arity {
        Arity::Range(2, 3)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let group = call.text(args, 0, "group")?;
        let key = call.text(args, 1, "key")?;
        match call.cx.host.metadata(call.target.fqcn(), &group, &key)? {
            Some(value) => Ok(Atom::String(value)),
            None if args.len() == 3 => call.value(args, 2, "default"),
            None => Ok(Atom::Null),
        }
    }
}

/// `hasHandler(name)`: whether the host registered handler `name` for the
/// coach.
pub struct HasHandler;

impl Command for HasHandler {
    fn name(&self) -> &str {
        "hasHandler"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let name = call.text(args, 0, "name")?;
        let handlers = call.cx.host.handlers(call.target.coach_id())?;
        Ok(handlers.iter().any(|handler| *handler == name).into())
    }
}

#[cfg(test)]
mod tests {
    use crate::{ast::Atom, command::test_support::Harness, log_sink::LogRecord};

    #[test]
    fn test_concat() {
        let harness = Harness::new();
        assert_eq!(
            harness.eval(r#"concat("a", 1, NULL, TRUE, 2.50)"#),
            Ok(Atom::string("a1TRUE2.50"))
        );
        assert_eq!(harness.eval("concat()"), Ok(Atom::string("")));
        assert_eq!(
            harness.eval(r#"concat("x", getScore("none"))"#),
            Ok(Atom::string("x0"))
        );
    }

    #[test]
    fn test_log_goes_to_sink() {
        let harness = Harness::new();
        harness.eval_as("q2", r#"log("score is", getScore("s"))"#).unwrap();
        assert_eq!(
            harness.log.records(),
            vec![LogRecord {
                instance_id: "coach".to_string(),
                question_id: "q2".to_string(),
                message: "score is 0".to_string(),
            }]
        );
    }

    #[test]
    fn test_metadata_and_handlers() {
        let harness = Harness::new();
        harness.host.set_metadata("coach", "profile", "level", "3");
        harness.host.set_handlers("coach", vec!["onFinish".to_string()]);

        assert_eq!(
            harness.eval(r#"getMetadata("profile", "level")"#),
            Ok(Atom::string("3"))
        );
        assert_eq!(harness.eval(r#"getMetadata("profile", "age")"#), Ok(Atom::Null));
        assert_eq!(
            harness.eval(r#"getMetadata("profile", "age", 40)"#),
            Ok(Atom::integer(40))
        );
        assert_eq!(harness.eval(r#"hasHandler("onFinish")"#), Ok(Atom::Bool(true)));
        assert_eq!(harness.eval(r#"hasHandler("onStart")"#), Ok(Atom::Bool(false)));
    }
}
