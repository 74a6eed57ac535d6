//! Arrays stored in ordinary variables.
//!
//! An array is a string variable whose elements are joined by `", "`.
//! Inside an element `\` is written as `\\` and `,` as `\,`, so any text
//! survives a round trip. The empty string is the empty array, so an empty
//! element cannot be stored and `arrayAdd` rejects it.

use crate::{ast::Atom, eval::EvalResult};

use super::{Arity, Command, CommandCall, CommandRegistry};

pub fn register(registry: &mut CommandRegistry) {
    registry.register(ArrayAdd);
    registry.register(ArrayRemove);
    registry.register(ArrayLength);
    registry.register(ArrayContains);
    registry.register(ArrayGet);
    registry.register(ArrayClear);
}

const SEPARATOR: &str = ", ";

pub fn encode(elements: &[String]) -> String {
    elements
        .iter()
        .map(|element| element.replace('\\', "\\\\").replace(',', "\\,"))
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

pub fn decode(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut elements = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            ',' if chars.peek() == Some(&' ') => {
                chars.next();
                elements.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    elements.push(current);
    elements
}

/// Arrays are per question: only the evaluating question's own entry is read,
/// so a rerun starts from what revert left behind.
fn load(name: &str, call: &CommandCall<'_>) -> Vec<String> {
    call.target
        .variables()
        .get_own(name, &call.source())
        .and_then(|value| value.text())
        .map(|text| decode(&text))
        .unwrap_or_default()
}

fn store(name: &str, elements: &[String], call: &CommandCall<'_>) {
    call.target.variables().set(
        name,
        Some(&call.source()),
        Atom::String(encode(elements)),
    );
}

/// `arrayAdd(name, value, [unique])`; returns the new length.
pub struct ArrayAdd;

impl Command for ArrayAdd {
    fn name(&self) -> &str {
        "arrayAdd"
    }

    fn arity(&self) -> Arity {
        Arity::Range(2, 3)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let name = call.text(args, 0, "name")?;
        let value = call.text(args, 1, "value")?;
        let unique = if args.len() == 3 {
            call.boolean(args, 2, "unique")?
        } else {
            false
        };
        if value.is_empty() {
            return Err(call.invalid("array elements cannot be empty"));
        }
        let mut elements = load(&name, call);
        if !(unique && elements.contains(&value)) {
            elements.push(value);
            store(&name, &elements, call);
        }
        Ok(Atom::integer(elements.len() as i64))
    }
}

/// `arrayRemove(name, value)`: drops every matching element.
pub struct ArrayRemove;

impl Command for ArrayRemove {
    fn name(&self) -> &str {
        "arrayRemove"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let name = call.text(args, 0, "name")?;
        let value = call.text(args, 1, "value")?;
        let mut elements = load(&name, call);
        let before = elements.len();
        elements.retain(|element| *element != value);
        if elements.len() == before {
            return Ok(Atom::Bool(false));
        }
        store(&name, &elements, call);
        Ok(Atom::Bool(true))
    }
}

pub struct ArrayLength;

impl Command for ArrayLength {
    fn name(&self) -> &str {
        "arrayLength"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let name = call.text(args, 0, "name")?;
        Ok(Atom::integer(load(&name, call).len() as i64))
    }
}

pub struct ArrayContains;

impl Command for ArrayContains {
    fn name(&self) -> &str {
        "arrayContains"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let name = call.text(args, 0, "name")?;
        let value = call.text(args, 1, "value")?;
        Ok(load(&name, call).contains(&value).into())
    }
}

/// `arrayGet(name, index)`; `NULL` when the index is out of range.
pub struct ArrayGet;

impl Command for ArrayGet {
    fn name(&self) -> &str {
        "arrayGet"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let name = call.text(args, 0, "name")?;
        let index = call.integer(args, 1, "index")?;
        let elements = load(&name, call);
        Ok(usize::try_from(index)
            .ok()
            .and_then(|index| elements.get(index))
            .cloned()
            .into())
    }
}

pub struct ArrayClear;

impl Command for ArrayClear {
    fn name(&self) -> &str {
        "arrayClear"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let name = call.text(args, 0, "name")?;
        store(&name, &[], call);
        Ok(Atom::integer(0))
    }
}
