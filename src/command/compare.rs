//! Numeric comparisons. Operands are decoded from their literal text; a
//! comparison involving anything that is not a number is simply false.

use std::cmp::Ordering;

use crate::{ast::Atom, eval::EvalResult, numeric::Decimal};

use super::{Arity, Command, CommandCall, CommandRegistry};

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Compare::new("greaterThan", |o| o == Ordering::Greater));
    registry.register(Compare::new("greaterOrEqual", |o| o != Ordering::Less));
    registry.register(Compare::new("lessThan", |o| o == Ordering::Less));
    registry.register(Compare::new("lessOrEqual", |o| o != Ordering::Greater));
}

pub struct Compare {
    name: &'static str,
    test: fn(Ordering) -> bool,
}

impl Compare {
    pub fn new(name: &'static str, test: fn(Ordering) -> bool) -> Self {
        Self { name, test }
    }
}

fn decode(atom: &Atom) -> Option<Decimal> {
    atom.text()?.trim().parse().ok()
}

impl Command for Compare {
    fn name(&self) -> &str {
        self.name
    }

    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let left = call.value(args, 0, "left")?;
        let right = call.value(args, 1, "right")?;
        let result = match (decode(&left), decode(&right)) {
            (Some(left), Some(right)) => (self.test)(left.cmp(&right)),
            _ => false,
        };
        Ok(result.into())
    }
}

#[cfg(test)]
mod tests {
    use crate::{ast::Atom, command::test_support::Harness};

    #[test]
    fn test_comparisons_use_decimal_value() {
        let harness = Harness::new();
        assert_eq!(harness.eval(r#"greaterThan("10", 9.99)"#), Ok(Atom::Bool(true)));
        assert_eq!(harness.eval("lessThan(0.1, 0.10)"), Ok(Atom::Bool(false)));
        assert_eq!(harness.eval("lessOrEqual(0.1, 0.10)"), Ok(Atom::Bool(true)));
        assert_eq!(harness.eval("greaterOrEqual(-2, -1)"), Ok(Atom::Bool(false)));
        assert_eq!(
            harness.eval("greaterThan(12345678901234567890.5, 12345678901234567890)"),
            Ok(Atom::Bool(true))
        );
    }

    #[test]
    fn test_non_numeric_operand_is_false() {
        let harness = Harness::new();
        assert_eq!(harness.eval(r#"greaterThan("abc", 1)"#), Ok(Atom::Bool(false)));
        assert_eq!(harness.eval("lessThan(NULL, 1)"), Ok(Atom::Bool(false)));
        assert_eq!(harness.eval("lessOrEqual(TRUE, 1)"), Ok(Atom::Bool(false)));
    }
}
