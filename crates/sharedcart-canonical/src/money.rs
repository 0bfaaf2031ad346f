use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::validation::ValidationError;

/// Number of fractional decimal digits carried by every [`Money`] value.
pub const MONEY_SCALE: u32 = 2;

const MINOR_PER_MAJOR: i64 = 100;

fn money_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(-?)(0|[1-9][0-9]*)(?:\.([0-9]+))?$").expect("invalid regex")
    })
}

/// Exact monetary amount held as a signed count of minor currency units (cents).
///
/// The wire form is a decimal string with exactly [`MONEY_SCALE`] fractional
/// digits (`"90.00"`, `"-30.00"`). JSON numbers are rejected on input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Money = Money(0);

    /// Smallest positive amount (one cent).
    pub const MINOR_UNIT: Money = Money(1);

    /// Builds an amount from a raw count of minor units.
    pub const fn from_minor_units(units: i64) -> Self {
        Money(units)
    }

    /// Raw count of minor units.
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Parses a decimal string such as `"12.5"`, `"-3.00"`, or `"7"`.
    ///
    /// At most [`MONEY_SCALE`] fractional digits are accepted; `"-0"`,
    /// exponents, and explicit `+` signs are rejected.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let Some(caps) = money_pattern().captures(value) else {
            return Err(ValidationError::PatternMismatch {
                field: "money",
                value: value.to_string(),
            });
        };

        let negative = !caps[1].is_empty();
        let fraction = caps.get(3).map(|m| m.as_str()).unwrap_or("");
        if fraction.len() > MONEY_SCALE as usize {
            return Err(ValidationError::OutOfBounds {
                field: "scale",
                value: value.to_string(),
            });
        }

        let out_of_bounds = || ValidationError::OutOfBounds {
            field: "money",
            value: value.to_string(),
        };
        let whole: i64 = caps[2].parse().map_err(|_| out_of_bounds())?;
        let mut minor: i64 = 0;
        for (idx, digit) in fraction.bytes().enumerate() {
            let place = 10_i64.pow(MONEY_SCALE - 1 - idx as u32);
            minor += i64::from(digit - b'0') * place;
        }
        let units = whole
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|w| w.checked_add(minor))
            .ok_or_else(out_of_bounds)?;

        if negative && units == 0 {
            return Err(ValidationError::PatternMismatch {
                field: "money",
                value: value.to_string(),
            });
        }
        Ok(Money(if negative { -units } else { units }))
    }

    /// Sum, or `None` on overflow.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Difference, or `None` on overflow.
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Amount multiplied by an item quantity, or `None` on overflow.
    pub fn checked_mul(self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(i64::from(quantity)).map(Money)
    }

    /// Splits the amount into `parts` equal shares.
    ///
    /// Returns the per-part share and the number of leftover minor units
    /// (always `0 <= remainder < parts` for non-negative amounts). Returns
    /// `None` when `parts` is zero.
    pub fn split_even(self, parts: usize) -> Option<(Money, usize)> {
        if parts == 0 {
            return None;
        }
        let parts = i64::try_from(parts).ok()?;
        let share = self.0.div_euclid(parts);
        let remainder = self.0.rem_euclid(parts);
        Some((Money(share), remainder as usize))
    }

    /// Absolute value, saturating at `i64::MAX` minor units.
    pub fn abs(self) -> Money {
        Money(self.0.saturating_abs())
    }

    /// `true` when strictly greater than zero.
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// `true` when strictly less than zero.
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// `true` when exactly zero.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let per_major = MINOR_PER_MAJOR as u64;
        let whole = magnitude / per_major;
        let cents = magnitude % per_major;
        f.pad(&format!("{sign}{whole}.{cents:02}"))
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Money::parse(&raw).map_err(serde::de::Error::custom)
    }
}
