use std::fmt;
use std::str::FromStr;

use crate::validation::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw store key.
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Raw store key.
            pub const fn get(self) -> u64 {
                self.0
            }

            /// Parses a decimal identifier without sign or leading zeros.
            pub fn parse(value: impl AsRef<str>) -> Result<Self, ValidationError> {
                let s = value.as_ref();
                if !Regex::new(r"^(0|[1-9][0-9]*)$")
                    .expect("invalid regex")
                    .is_match(s)
                {
                    return Err(ValidationError::PatternMismatch {
                        field: stringify!($name),
                        value: s.to_string(),
                    });
                }
                s.parse::<u64>()
                    .map(Self)
                    .map_err(|_| ValidationError::OutOfBounds {
                        field: stringify!($name),
                        value: s.to_string(),
                    })
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

numeric_id!(
    ParticipantId,
    "Group member identifier. Ordering is numeric and drives every tie-break."
);
numeric_id!(BillId, "Bill identifier assigned by the bill store.");
numeric_id!(
    GroupId,
    "Expense group identifier assigned by the group store."
);

/// Identifier for canonicalization profiles (pattern: `[A-Za-z0-9_-]{16,128}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(String);

impl ProfileId {
    /// Parses a validated profile identifier.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !Regex::new(r"^[A-Za-z0-9_-]{16,128}$")
            .expect("invalid regex")
            .is_match(&s)
        {
            return Err(ValidationError::PatternMismatch {
                field: "ProfileId",
                value: s,
            });
        }
        Ok(Self(s))
    }
}

impl AsRef<str> for ProfileId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_order_numerically() {
        let mut ids = vec![
            ParticipantId::new(10),
            ParticipantId::new(9),
            ParticipantId::new(100),
        ];
        ids.sort();
        let raw: Vec<u64> = ids.iter().map(|id| id.get()).collect();
        assert_eq!(raw, vec![9, 10, 100]);
    }

    #[test]
    fn parse_rejects_signs_and_leading_zeros() {
        assert_eq!(BillId::parse("42").unwrap(), BillId::new(42));
        assert!(BillId::parse("042").is_err());
        assert!(BillId::parse("-1").is_err());
        assert!(matches!(
            GroupId::parse("99999999999999999999999"),
            Err(ValidationError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn ids_serialize_as_bare_integers() {
        assert_eq!(serde_json::to_string(&ParticipantId::new(7)).unwrap(), "7");
        let id: ParticipantId = serde_json::from_str("7").unwrap();
        assert_eq!(id.get(), 7);
    }

    #[test]
    fn profile_id_enforces_pattern() {
        assert!(ProfileId::parse("sharedcart-canonical-v1").is_ok());
        assert!(ProfileId::parse("short").is_err());
    }
}
