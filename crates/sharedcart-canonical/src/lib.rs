//! Boundary primitives for the SharedCart settlement engine.
//!
//! Monetary amounts cross the engine boundary as exact decimal strings and
//! are held internally as fixed-point minor units. Every value that
//! participates in a settlement digest is produced by this crate.
//!
#![deny(missing_docs)]

/// Canonical JSON encoding for deterministic hashing.
pub mod canonicalizer;
/// Digest primitives.
pub mod digest;
/// Numeric identifiers for participants, bills, and groups.
pub mod identifiers;
/// Fixed-point money.
pub mod money;
/// Domain-separated settlement digests.
pub mod settlement_digest;
/// Validation errors for boundary primitives.
pub mod validation;

pub use canonicalizer::{CanonicalBytes, CanonicalizationError, Canonicalizer};
pub use digest::{Digest, DigestAlg};
pub use identifiers::{BillId, GroupId, ParticipantId, ProfileId};
pub use money::{Money, MONEY_SCALE};
pub use settlement_digest::{
    compute_settlement_digest, verify_settlement_digest, SettlementDigestError,
};
pub use validation::ValidationError;
