//! Arbitrary-precision decimals for comparisons and score algebra.
//!
//! Numbers in a script are kept as canonical text inside [`Atom`](crate::ast::Atom);
//! whenever a command needs their value the text is decoded into a [`Decimal`].

use std::{cmp::Ordering, fmt, ops::Add, str::FromStr};

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not a decimal number: {0:?}")]
pub struct DecimalParseError(pub String);

/// Signed decimal number of unbounded precision: `unscaled * 10^-scale`.
///
/// Values are always normalized (no trailing fractional zeros, zero has scale
/// 0), so derived equality is numeric equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Decimal {
    unscaled: BigInt,
    scale: u32,
}

impl Decimal {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.unscaled.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.unscaled.is_negative()
    }

    pub fn is_integral(&self) -> bool {
        self.scale == 0
    }

    fn normalized(mut self) -> Self {
        let ten = BigInt::from(10);
        while self.scale > 0 && (&self.unscaled % &ten).is_zero() {
            self.unscaled /= &ten;
            self.scale -= 1;
        }
        self
    }

    /// Unscaled value at `scale`, which must be >= `self.scale`.
    fn unscaled_at(&self, scale: u32) -> BigInt {
        &self.unscaled * BigInt::from(10).pow(scale - self.scale)
    }

    fn aligned(&self, other: &Decimal) -> (BigInt, BigInt, u32) {
        let scale = self.scale.max(other.scale);
        (self.unscaled_at(scale), other.unscaled_at(scale), scale)
    }
}

impl FromStr for Decimal {
    type Err = DecimalParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let err = || DecimalParseError(input.to_string());
        let text = input.trim();
        let (negative, unsigned) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };
        let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if integer.len() + fraction.len() == 0 || !all_digits(integer) || !all_digits(fraction) {
            return Err(err());
        }
        let magnitude: BigInt = format!("{}{}", integer, fraction)
            .parse()
            .map_err(|_| err())?;
        Ok(Decimal {
            unscaled: if negative { -magnitude } else { magnitude },
            scale: u32::try_from(fraction.len()).map_err(|_| err())?,
        }
        .normalized())
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal {
            unscaled: BigInt::from(value),
            scale: 0,
        }
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = self.aligned(other);
        a.cmp(&b)
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for &Decimal {
    type Output = Decimal;

    fn add(self, other: &Decimal) -> Decimal {
        let (a, b, scale) = self.aligned(other);
        Decimal {
            unscaled: a + b,
            scale,
        }
        .normalized()
    }
}

impl Add for Decimal {
    type Output = Decimal;

    fn add(self, other: Decimal) -> Decimal {
        &self + &other
    }
}

impl std::iter::Sum for Decimal {
    fn sum<I: Iterator<Item = Decimal>>(iter: I) -> Self {
        iter.fold(Decimal::zero(), |acc, d| acc + d)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            f.write_str("-")?;
        }
        let digits = self.unscaled.magnitude().to_string();
        let scale = self.scale as usize;
        if scale == 0 {
            return f.write_str(&digits);
        }
        let padded = format!("{:0>width$}", digits, width = scale + 1);
        let (integer, fraction) = padded.split_at(padded.len() - scale);
        write!(f, "{}.{}", integer, fraction)
    }
}

/// Integral values become `Integer` atoms, everything else `Float`.
impl From<&Decimal> for crate::ast::Atom {
    fn from(value: &Decimal) -> Self {
        if value.is_integral() {
            crate::ast::Atom::Integer(value.to_string())
        } else {
            crate::ast::Atom::Float(value.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_render() {
        assert_eq!(dec("007").to_string(), "7");
        assert_eq!(dec("-0.50").to_string(), "-0.5");
        assert_eq!(dec(".25").to_string(), "0.25");
        assert_eq!(dec("-0").to_string(), "0");
        assert_eq!(dec("12.000").to_string(), "12");
        assert!(dec("12.000").is_integral());
        assert!("abc".parse::<Decimal>().is_err());
        assert!("1.2.3".parse::<Decimal>().is_err());
        assert!("-".parse::<Decimal>().is_err());
        assert!("".parse::<Decimal>().is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(dec("2") > dec("1.999999999999999999999999999"));
        assert!(dec("-2") < dec("-1.5"));
        assert!(dec("-0.1") < dec("0"));
        assert_eq!(dec("1.0"), dec("1"));
        assert_eq!(
            dec("123456789012345678901234567890").cmp(&dec("123456789012345678901234567891")),
            Ordering::Less
        );
    }

    #[test]
    fn test_addition() {
        assert_eq!(dec("1.5") + dec("2.5"), dec("4"));
        assert_eq!(dec("1") + dec("-3.25"), dec("-2.25"));
        assert_eq!(dec("-1") + dec("1"), Decimal::zero());
        assert_eq!(dec("99.99") + dec("0.01"), dec("100"));
        assert_eq!(
            vec![dec("1"), dec("2"), dec("-0.5")]
                .into_iter()
                .sum::<Decimal>()
                .to_string(),
            "2.5"
        );
    }

    proptest! {
        #[test]
        fn prop_matches_integer_arithmetic(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
            prop_assert_eq!(Decimal::from(a) + Decimal::from(b), Decimal::from(a + b));
            prop_assert_eq!(Decimal::from(a).cmp(&Decimal::from(b)), a.cmp(&b));
        }
    }
}
