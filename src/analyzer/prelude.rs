//! Everything a grammar module needs: `use super::prelude::*`.

pub use super::combinators::{
    as_unit, choice, delimited, end, equal, expected, lazy, many, map, optional, satisfy,
    separated_list, tuple2, tuple5, with_context,
};
pub use super::core::{ParseError, ParseResult, Parser};
