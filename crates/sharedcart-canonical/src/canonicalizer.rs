use canonical_json::to_string;
use serde_json::Value;

use crate::identifiers::ProfileId;
use std::fmt;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// A JSON number with a fractional part or exponent was found.
    ///
    /// Monetary values travel as decimal strings; a float anywhere in a
    /// hashed document means an amount slipped through as binary floating point.
    #[error("floating-point number at {path}")]
    FloatingPointNumber {
        /// JSON path of the offending number.
        path: String,
    },
    /// RFC 8785 encoding failed.
    #[error("canonical encoding failed: {0}")]
    Encoding(String),
}

/// Canonical bytes for a JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalBytes {
    /// Canonical UTF-8 bytes.
    pub bytes: Vec<u8>,
    /// Profile that produced the bytes.
    pub profile_id: ProfileId,
}

/// Helper for building JSON paths in error messages.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Canonicalizer that emits deterministic RFC 8785 bytes.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    profile: ProfileId,
}

impl Canonicalizer {
    /// Profile used for settlement digests.
    pub const SETTLEMENT_PROFILE: &'static str = "sharedcart-canonical-v1";

    /// Creates a canonicalizer for the provided profile.
    pub fn new(profile: ProfileId) -> Self {
        Self { profile }
    }

    /// Creates a canonicalizer for [`Canonicalizer::SETTLEMENT_PROFILE`].
    pub fn settlement() -> Self {
        Self {
            profile: ProfileId::parse(Self::SETTLEMENT_PROFILE).expect("valid built-in profile"),
        }
    }

    /// Profile this canonicalizer encodes under.
    pub fn profile(&self) -> &ProfileId {
        &self.profile
    }

    /// Produces canonical bytes after rejecting non-integer numbers.
    pub fn canonicalize(&self, value: &Value) -> Result<CanonicalBytes, CanonicalizationError> {
        reject_floats(value, Path::root())?;
        let canonical =
            to_string(value).map_err(|err| CanonicalizationError::Encoding(err.to_string()))?;
        Ok(CanonicalBytes {
            bytes: canonical.into_bytes(),
            profile_id: self.profile.clone(),
        })
    }
}

fn reject_floats(value: &Value, path: Path) -> Result<(), CanonicalizationError> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                reject_floats(child, path.push_field(key))?;
            }
            Ok(())
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                reject_floats(item, path.push_index(idx))?;
            }
            Ok(())
        }
        Value::Number(num) if !(num.is_i64() || num.is_u64()) => {
            Err(CanonicalizationError::FloatingPointNumber {
                path: path.to_string(),
            })
        }
        _ => Ok(()),
    }
}
