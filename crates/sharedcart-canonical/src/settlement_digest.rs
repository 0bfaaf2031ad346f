//! Settlement digest computation with domain-separated hashing.
//!
//! A settlement digest is `sha256(domain_separator || canonical_bytes(result))`
//! where the `settlement_digest` field itself is excluded from the hash input.
//! Confirmations carry this digest so a confirmed settlement provably refers
//! to the exact bill set and transfers that were calculated.

use crate::{Canonicalizer, Digest, DigestAlg};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest as Sha2Digest, Sha256};

/// Domain separator: `b"sharedcart:settlement:v1\0"`.
const SETTLEMENT_DOMAIN_SEPARATOR: &[u8] = b"sharedcart:settlement:v1\0";

/// Field excluded from the hash input.
const DIGEST_FIELD: &str = "settlement_digest";

/// Computes the settlement digest of any serializable settlement document.
///
/// # Example
///
/// ```rust
/// use sharedcart_canonical::{compute_settlement_digest, Canonicalizer};
/// use serde_json::json;
///
/// let result = json!({
///     "bill_ids": [1, 2],
///     "total_amount": "90.00",
///     "transactions": []
/// });
///
/// let digest = compute_settlement_digest(&result, &Canonicalizer::settlement())?;
/// println!("settlement digest: {}", digest);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
///
/// Returns [`SettlementDigestError`] if serialization or canonicalization fails.
pub fn compute_settlement_digest<T: Serialize>(
    document: &T,
    canonicalizer: &Canonicalizer,
) -> Result<Digest, SettlementDigestError> {
    let mut value: Value = serde_json::to_value(document)
        .map_err(|e| SettlementDigestError::Serialization(e.to_string()))?;

    if let Value::Object(map) = &mut value {
        map.remove(DIGEST_FIELD);
    }

    let canonical = canonicalizer.canonicalize(&value)?;

    let mut hasher = Sha256::new();
    hasher.update(SETTLEMENT_DOMAIN_SEPARATOR);
    hasher.update(&canonical.bytes);
    let hash_bytes = hasher.finalize();

    use base64::Engine;
    let b64 = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(hash_bytes);
    Ok(Digest::new(DigestAlg::Sha256, b64)?)
}

/// Error during settlement digest computation.
#[derive(thiserror::Error, Debug)]
pub enum SettlementDigestError {
    /// Serialization failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
    /// Canonicalization failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] crate::CanonicalizationError),
    /// Digest construction failed.
    #[error("digest construction failed: {0}")]
    Digest(#[from] crate::ValidationError),
}

/// Checks a claimed digest against the recomputed one.
///
/// # Errors
///
/// Returns [`SettlementDigestError`] if computation fails.
pub fn verify_settlement_digest<T: Serialize>(
    document: &T,
    claimed: &Digest,
    canonicalizer: &Canonicalizer,
) -> Result<bool, SettlementDigestError> {
    let computed = compute_settlement_digest(document, canonicalizer)?;
    Ok(claimed == &computed)
}
