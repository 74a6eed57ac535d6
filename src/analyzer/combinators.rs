//! # Parser Combinators
//!
//! Each combinator is a function returning a closure over `(&[I], usize)`;
//! the blanket impl in [`core`](super::core) makes those closures parsers.
//! The line grammar in [`parsers`](super::parsers) is built only from these.

use std::fmt;

use super::core::{ParseError, Parser};

fn unexpected<I: fmt::Display>(expected: impl ToString, found: &I, position: usize) -> ParseError {
    ParseError::Unexpected {
        expected: expected.to_string(),
        found: found.to_string(),
        position,
    }
}

/// Matches one token equal to `value`.
pub fn equal<I>(value: I) -> impl Parser<I, I>
where
    I: Clone + PartialEq + fmt::Display,
{
    move |input: &[I], pos: usize| match input.get(pos) {
        Some(found) if *found == value => Ok((pos + 1, found.clone())),
        Some(found) => Err(unexpected(&value, found, pos)),
        None => Err(ParseError::UnexpectedEof { position: pos }),
    }
}

/// Runs `parser` and rejects any output other than `value`.
pub fn expected<P, I, O>(parser: P, value: O) -> impl Parser<I, O>
where
    P: Parser<I, O>,
    O: PartialEq + fmt::Display,
{
    move |input: &[I], pos: usize| {
        let (next, parsed) = parser.parse(input, pos)?;
        if parsed == value {
            Ok((next, parsed))
        } else {
            Err(unexpected(&value, &parsed, pos))
        }
    }
}

pub fn end<I: fmt::Display>() -> impl Parser<I, ()> {
    |input: &[I], pos: usize| match input.get(pos) {
        None => Ok((pos, ())),
        Some(found) => Err(unexpected("end of line", found, pos)),
    }
}

/// Consumes one token if `f` maps it to a value.
pub fn satisfy<I, O, F>(f: F, expected: &'static str) -> impl Parser<I, O>
where
    I: fmt::Display,
    F: Fn(&I) -> Option<O>,
{
    move |input: &[I], pos: usize| {
        let found = input
            .get(pos)
            .ok_or(ParseError::UnexpectedEof { position: pos })?;
        f(found)
            .map(|value| (pos + 1, value))
            .ok_or_else(|| unexpected(expected, found, pos))
    }
}

/// Tries each parser in order; the first success wins.
///
/// When every alternative fails, the error that got furthest into the input
/// is reported, which is usually the one describing what the author meant.
pub fn choice<I, O>(parsers: Vec<Box<dyn Parser<I, O>>>) -> impl Parser<I, O> {
    move |input: &[I], pos: usize| {
        let mut furthest: Option<ParseError> = None;
        for parser in &parsers {
            match parser.parse(input, pos) {
                Ok(result) => return Ok(result),
                Err(e) if furthest.as_ref().map_or(true, |f| e.position() > f.position()) => {
                    furthest = Some(e)
                }
                Err(_) => {}
            }
        }
        Err(furthest.unwrap_or(ParseError::NoAlternative { position: pos }))
    }
}

pub fn map<P, F, A, B, I>(parser: P, f: F) -> impl Parser<I, B>
where
    P: Parser<I, A>,
    F: Fn(A) -> B,
{
    move |input: &[I], pos: usize| {
        parser
            .parse(input, pos)
            .map(|(next, value)| (next, f(value)))
    }
}

pub fn as_unit<I, O, P>(parser: P) -> impl Parser<I, ()>
where
    P: Parser<I, O>,
{
    map(parser, |_: O| ())
}

/// Zero or more repetitions; stops at the first failure or at a match that
/// consumed nothing.
pub fn many<P, I, O>(parser: P) -> impl Parser<I, Vec<O>>
where
    P: Parser<I, O>,
{
    move |input: &[I], mut pos: usize| {
        let mut items = Vec::new();
        while let Ok((next, item)) = parser.parse(input, pos) {
            if next == pos {
                break;
            }
            items.push(item);
            pos = next;
        }
        Ok((pos, items))
    }
}

/// Items separated by a separator. An item that fails after a separator ends
/// the list *before* that separator, so a trailing separator is left for the
/// caller.
pub fn separated_list<P, S, I, O>(item: P, separator: S) -> impl Parser<I, Vec<O>>
where
    P: Parser<I, O>,
    S: Parser<I, ()>,
{
    move |input: &[I], pos: usize| {
        let mut items = Vec::new();
        let Ok((mut pos, first)) = item.parse(input, pos) else {
            return Ok((pos, items));
        };
        items.push(first);
        while let Ok((after_separator, _)) = separator.parse(input, pos) {
            let Ok((next, value)) = item.parse(input, after_separator) else {
                break;
            };
            items.push(value);
            pos = next;
        }
        Ok((pos, items))
    }
}

pub fn optional<P, I, O>(parser: P) -> impl Parser<I, Option<O>>
where
    P: Parser<I, O>,
{
    move |input: &[I], pos: usize| match parser.parse(input, pos) {
        Ok((next, value)) => Ok((next, Some(value))),
        Err(_) => Ok((pos, None)),
    }
}

pub fn delimited<L, P, R, I, O>(left: L, parser: P, right: R) -> impl Parser<I, O>
where
    L: Parser<I, ()>,
    P: Parser<I, O>,
    R: Parser<I, ()>,
{
    move |input: &[I], pos: usize| {
        let (pos, _) = left.parse(input, pos)?;
        let (pos, value) = parser.parse(input, pos)?;
        let (pos, _) = right.parse(input, pos)?;
        Ok((pos, value))
    }
}

pub fn tuple2<P1, P2, I, O1, O2>(first: P1, second: P2) -> impl Parser<I, (O1, O2)>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
{
    move |input: &[I], pos: usize| {
        let (pos, a) = first.parse(input, pos)?;
        let (pos, b) = second.parse(input, pos)?;
        Ok((pos, (a, b)))
    }
}

#[allow(clippy::type_complexity)]
pub fn tuple5<P1, P2, P3, P4, P5, I, O1, O2, O3, O4, O5>(
    p1: P1,
    p2: P2,
    p3: P3,
    p4: P4,
    p5: P5,
) -> impl Parser<I, (O1, O2, O3, O4, O5)>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
    P3: Parser<I, O3>,
    P4: Parser<I, O4>,
    P5: Parser<I, O5>,
{
    move |input: &[I], pos: usize| {
        let (pos, a) = p1.parse(input, pos)?;
        let (pos, b) = p2.parse(input, pos)?;
        let (pos, c) = p3.parse(input, pos)?;
        let (pos, d) = p4.parse(input, pos)?;
        let (pos, e) = p5.parse(input, pos)?;
        Ok((pos, (a, b, c, d, e)))
    }
}

/// Wraps any failure of `parser` with `context`.
pub fn with_context<P, I, O, C>(parser: P, context: C) -> impl Parser<I, O>
where
    P: Parser<I, O>,
    C: ToString,
{
    move |input: &[I], pos: usize| {
        parser
            .parse(input, pos)
            .map_err(|inner| ParseError::WithContext {
                message: context.to_string(),
                inner: Box::new(inner),
            })
    }
}

/// Builds the inner parser only at parse time; breaks the construction cycle
/// of the recursive expression grammar.
pub fn lazy<I, O, F, P>(build: F) -> impl Parser<I, O>
where
    F: Fn() -> P,
    P: Parser<I, O>,
{
    move |input: &[I], pos: usize| build().parse(input, pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digit() -> impl Parser<char, u32> {
        satisfy(|c: &char| c.to_digit(10), "digit")
    }

    #[test]
    fn test_equal() {
        let input = vec!['a', 'b'];
        assert_eq!(equal('a').parse(&input, 0), Ok((1, 'a')));
        assert_eq!(
            equal('a').parse(&input, 1),
            Err(ParseError::Unexpected {
                expected: "a".to_string(),
                found: "b".to_string(),
                position: 1
            })
        );
        assert_eq!(
            equal('a').parse(&input, 2),
            Err(ParseError::UnexpectedEof { position: 2 })
        );
    }

    #[test]
    fn test_end() {
        let input = vec!['a'];
        assert_eq!(end().parse(&input, 1), Ok((1, ())));
        assert!(end().parse(&input, 0).is_err());
    }

    #[test]
    fn test_expected() {
        let input = vec!['7'];
        assert_eq!(expected(digit(), 7).parse(&input, 0), Ok((1, 7)));
        assert!(expected(digit(), 8).parse(&input, 0).is_err());
    }

    #[test]
    fn test_choice_reports_furthest_error() {
        let input = vec!['1', 'x'];
        let parser = choice::<char, u32>(vec![
            Box::new(map(equal('z'), |_| 0)),
            Box::new(map(tuple2(digit(), digit()), |(a, b): (u32, u32)| a * 10 + b)),
        ]);
        assert_eq!(parser.parse(&input, 0).unwrap_err().position(), 1);

        let input = vec!['4', '2'];
        assert_eq!(parser.parse(&input, 0), Ok((2, 42)));
    }

    #[test]
    fn test_separated_list_leaves_trailing_separator() {
        let input = vec!['1', ',', '2', ','];
        let parser = separated_list(digit(), as_unit(equal(',')));
        assert_eq!(parser.parse(&input, 0), Ok((3, vec![1, 2])));
        assert_eq!(parser.parse(&input, 1), Ok((1, vec![])));
    }

    #[test]
    fn test_many_and_optional() {
        let input = vec!['1', '2', 'x'];
        assert_eq!(many(digit()).parse(&input, 0), Ok((2, vec![1, 2])));
        assert_eq!(optional(digit()).parse(&input, 2), Ok((2, None)));
        assert_eq!(
            many(optional(digit())).parse(&input, 2),
            Ok((2, vec![]))
        );
    }

    #[test]
    fn test_delimited_and_context() {
        let input = vec!['(', '5', ')'];
        let parser = delimited(as_unit(equal('(')), digit(), as_unit(equal(')')));
        assert_eq!(parser.parse(&input, 0), Ok((3, 5)));

        let parser = with_context(lazy(|| equal('[')), "bracket");
        assert!(matches!(
            parser.parse(&input, 0),
            Err(ParseError::WithContext { ref message, .. }) if message == "bracket"
        ));
    }
}
