use core::fmt;

use serde::{Deserialize, Serialize};

/// Coach Script Language expression node.
///
/// An `Atom` is either a literal or a command invocation. Literals keep their
/// canonical source text (numbers are not parsed at construction time) so a
/// script can be rendered back exactly as it was written.
///
/// # Example
/// ```text
/// // condition          name     statement
/// isSelected("q1_a") : bonus : { addScore("total", 5); set("flag", TRUE) };
/// ```
///
/// Atoms never mutate after construction, which is what allows parsed
/// listings to be shared between threads through the
/// [`AstRegistry`](crate::ast_registry::AstRegistry).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Atom {
    MethodCall {
        name: String,
        args: Vec<Atom>,
        hops: ContextHops,
    },
    Integer(String),
    Float(String),
    Bool(bool),
    String(String),
    #[default]
    Null,
}

/// Literal and call kinds, used for argument validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum AtomType {
    MethodCall,
    Integer,
    Float,
    Bool,
    String,
    Null,
}

/// How far up the context tree a call is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextHops {
    /// `n` parent links above the active context; `Levels(0)` is the active context.
    Levels(usize),
    /// `root.` walks parent links until there are none left.
    Root,
}

impl Default for ContextHops {
    fn default() -> Self {
        ContextHops::Levels(0)
    }
}

impl Atom {
    pub fn call(name: impl Into<String>, args: Vec<Atom>) -> Self {
        Atom::MethodCall {
            name: name.into(),
            args,
            hops: ContextHops::default(),
        }
    }

    pub fn call_with_hops(name: impl Into<String>, args: Vec<Atom>, hops: ContextHops) -> Self {
        Atom::MethodCall {
            name: name.into(),
            args,
            hops,
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Atom::String(value.into())
    }

    pub fn integer(value: i64) -> Self {
        Atom::Integer(value.to_string())
    }

    pub fn atom_type(&self) -> AtomType {
        match self {
            Atom::MethodCall { .. } => AtomType::MethodCall,
            Atom::Integer(_) => AtomType::Integer,
            Atom::Float(_) => AtomType::Float,
            Atom::Bool(_) => AtomType::Bool,
            Atom::String(_) => AtomType::String,
            Atom::Null => AtomType::Null,
        }
    }

    pub fn is_call(&self) -> bool {
        matches!(self, Atom::MethodCall { .. })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Atom::Null)
    }

    /// The literal's canonical text. `Null` and calls have none.
    pub fn text(&self) -> Option<String> {
        match self {
            Atom::Integer(s) | Atom::Float(s) | Atom::String(s) => Some(s.clone()),
            Atom::Bool(true) => Some("TRUE".to_string()),
            Atom::Bool(false) => Some("FALSE".to_string()),
            Atom::Null | Atom::MethodCall { .. } => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Atom::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for Atom {
    fn from(value: bool) -> Self {
        Atom::Bool(value)
    }
}

impl From<Option<String>> for Atom {
    fn from(value: Option<String>) -> Self {
        value.map(Atom::String).unwrap_or(Atom::Null)
    }
}

fn escape_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "\"")?;
    for c in s.chars() {
        match c {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            _ => write!(f, "{}", c)?,
        }
    }
    write!(f, "\"")
}

impl fmt::Display for ContextHops {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextHops::Root => write!(f, "root."),
            ContextHops::Levels(n) => {
                for _ in 0..*n {
                    write!(f, "parent.")?;
                }
                Ok(())
            }
        }
    }
}

/// Renders the atom back into DSL syntax.
impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::MethodCall { name, args, hops } => {
                write!(f, "{}{}(", hops, name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Atom::Integer(s) | Atom::Float(s) => write!(f, "{}", s),
            Atom::Bool(true) => write!(f, "TRUE"),
            Atom::Bool(false) => write!(f, "FALSE"),
            Atom::String(s) => escape_string(f, s),
            Atom::Null => write!(f, "NULL"),
        }
    }
}

/// One `condition : name : statements ;` line of a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptLine {
    pub condition: Atom,
    /// Dedup group. An empty name never suppresses other lines.
    pub name: String,
    pub statements: Vec<Atom>,
}

impl ScriptLine {
    pub fn new(condition: Atom, name: impl Into<String>, statements: Vec<Atom>) -> Self {
        Self {
            condition,
            name: name.into(),
            statements,
        }
    }
}

impl fmt::Display for ScriptLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {} : ", self.condition, self.name)?;
        match self.statements.as_slice() {
            [single] => write!(f, "{}", single)?,
            statements => {
                write!(f, "{{ ")?;
                for statement in statements {
                    write!(f, "{}; ", statement)?;
                }
                write!(f, "}}")?;
            }
        }
        write!(f, ";")
    }
}

/// A parsed listing, in source order.
pub type Script = Vec<ScriptLine>;
