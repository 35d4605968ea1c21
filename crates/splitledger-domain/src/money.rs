//! Fixed-point money in integer minor units (cents).

use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

/// Number of minor units in one major unit.
pub const MINOR_UNITS: i64 = 100;

/// A signed amount of the single implicit currency, stored as whole cents.
///
/// Arithmetic is exact within the `i64` range and saturates at its ends.
/// Conversion to a decimal string happens only when the value is displayed or
/// serialized (always with two decimal places). Parsed and deserialized
/// amounts are limited to [`Money::MAX_AMOUNT`] in magnitude.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);
    /// Largest magnitude accepted from text or JSON: ten trillion units.
    pub const MAX_AMOUNT: Money = Money(1_000_000_000_000_000);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn from_major(units: i64) -> Self {
        Self(units.saturating_mul(MINOR_UNITS))
    }

    /// Converts a binary float to the nearest cent. Returns `None` for
    /// non-finite values and magnitudes above [`Money::MAX_AMOUNT`].
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let scaled = (value * MINOR_UNITS as f64).round();
        if scaled.abs() > Self::MAX_AMOUNT.0 as f64 {
            return None;
        }
        Some(Self(scaled as i64))
    }

    /// Wraps a cent count, rejecting magnitudes above [`Money::MAX_AMOUNT`].
    pub fn bounded(cents: i64) -> Option<Self> {
        (cents.unsigned_abs() <= Self::MAX_AMOUNT.0 as u64).then_some(Self(cents))
    }

    pub fn exceeds_max(self) -> bool {
        self.0.unsigned_abs() > Self::MAX_AMOUNT.0 as u64
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Splits the amount into `parts` shares that differ by at most one cent
    /// and always sum back to `self`. The leftover cents go to the leading
    /// shares. Returns an empty vector when `parts` is zero.
    pub fn split_evenly(self, parts: usize) -> Vec<Money> {
        if parts == 0 {
            return Vec::new();
        }
        let divisor = parts as i64;
        let base = self.0.div_euclid(divisor);
        let remainder = self.0.rem_euclid(divisor) as usize;
        (0..parts)
            .map(|idx| {
                if idx < remainder {
                    Money(base + 1)
                } else {
                    Money(base)
                }
            })
            .collect()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let units = magnitude / MINOR_UNITS as u64;
        let cents = magnitude % MINOR_UNITS as u64;
        f.pad(&format!("{sign}{units}.{cents:02}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Errors that can occur when parsing [`Money`] from text.
pub enum MoneyParseError {
    Empty,
    InvalidDigits(String),
    TooManyDecimals(String),
    Overflow(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::Empty => f.write_str("amount is empty"),
            MoneyParseError::InvalidDigits(raw) => write!(f, "`{raw}` is not a decimal amount"),
            MoneyParseError::TooManyDecimals(raw) => {
                write!(f, "`{raw}` has more than two decimal places")
            }
            MoneyParseError::Overflow(raw) => write!(f, "`{raw}` is out of range"),
        }
    }
}

impl std::error::Error for MoneyParseError {}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(MoneyParseError::Empty);
        }
        let (negative, unsigned) = match trimmed.as_bytes()[0] {
            b'-' => (true, &trimmed[1..]),
            b'+' => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(MoneyParseError::InvalidDigits(trimmed.to_string()));
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || !all_digits(fraction) {
            return Err(MoneyParseError::InvalidDigits(trimmed.to_string()));
        }
        if fraction.len() > 2 {
            return Err(MoneyParseError::TooManyDecimals(trimmed.to_string()));
        }

        let overflow = || MoneyParseError::Overflow(trimmed.to_string());
        let units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| overflow())? * 10,
            _ => fraction.parse().map_err(|_| overflow())?,
        };
        let total = units
            .checked_mul(MINOR_UNITS)
            .and_then(|value| value.checked_add(cents))
            .ok_or_else(overflow)?;
        Money::bounded(if negative { -total } else { total }).ok_or_else(overflow)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount as a string or number")
    }

    fn visit_str<E>(self, value: &str) -> Result<Money, E>
    where
        E: de::Error,
    {
        value.parse().map_err(E::custom)
    }

    fn visit_i64<E>(self, value: i64) -> Result<Money, E>
    where
        E: de::Error,
    {
        value
            .checked_mul(MINOR_UNITS)
            .and_then(Money::bounded)
            .ok_or_else(|| E::custom(format!("amount {value} is out of range")))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Money, E>
    where
        E: de::Error,
    {
        i64::try_from(value)
            .map_err(|_| E::custom(format!("amount {value} is out of range")))
            .and_then(|value| self.visit_i64(value))
    }

    fn visit_f64<E>(self, value: f64) -> Result<Money, E>
    where
        E: de::Error,
    {
        Money::from_f64(value).ok_or_else(|| E::custom(format!("amount {value} is out of range")))
    }
}
