use serde_json::json;
use sharedcart_canonical::{
    compute_settlement_digest, verify_settlement_digest, BillId, CanonicalizationError,
    Canonicalizer, Digest, DigestAlg, Money, ParticipantId, ProfileId, SettlementDigestError,
};

#[test]
fn digest_serializes_to_golden_json() {
    let digest = Digest {
        alg: DigestAlg::Sha256,
        b64: "Zm9vYmFy".into(),
    };

    assert_eq!(
        serde_json::to_string(&digest).unwrap(),
        r#"{"alg":"sha-256","b64":"Zm9vYmFy"}"#
    );
}

#[test]
fn money_and_ids_serialize_to_golden_json() {
    let value = json!({
        "amount": Money::parse("1234.5").unwrap(),
        "bill": BillId::new(11),
        "net": Money::parse("-0.07").unwrap(),
        "participant": ParticipantId::new(3),
    });

    assert_eq!(
        serde_json::to_string(&value).unwrap(),
        r#"{"amount":"1234.50","bill":11,"net":"-0.07","participant":3}"#
    );
}

#[test]
fn canonicalizer_produces_ordered_bytes() {
    let profile = ProfileId::parse("profileid000000001").unwrap();
    let canonicalizer = Canonicalizer::new(profile.clone());
    let value = json!({"b": 1, "a": {"nested": "2.00"}});
    let result = canonicalizer.canonicalize(&value).unwrap();
    assert_eq!(result.bytes, br#"{"a":{"nested":"2.00"},"b":1}"#.to_vec());
    assert_eq!(result.profile_id, profile);
}

#[test]
fn settlement_digest_ignores_its_own_field_and_key_order() {
    let canonicalizer = Canonicalizer::settlement();
    let bare = json!({"bill_ids": [1, 2], "total_amount": "90.00"});
    let reordered_with_digest = json!({
        "total_amount": "90.00",
        "settlement_digest": {"alg": "sha-256", "b64": "ignored"},
        "bill_ids": [1, 2]
    });

    let a = compute_settlement_digest(&bare, &canonicalizer).unwrap();
    let b = compute_settlement_digest(&reordered_with_digest, &canonicalizer).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.alg, DigestAlg::Sha256);
    assert_eq!(a.b64.len(), 43);
    assert!(verify_settlement_digest(&reordered_with_digest, &a, &canonicalizer).unwrap());
}

#[test]
fn settlement_digest_changes_with_bill_set() {
    let canonicalizer = Canonicalizer::settlement();
    let a = compute_settlement_digest(&json!({"bill_ids": [1, 2]}), &canonicalizer).unwrap();
    let b = compute_settlement_digest(&json!({"bill_ids": [1]}), &canonicalizer).unwrap();
    assert_ne!(a, b);
}

#[test]
fn settlement_digest_rejects_float_amounts() {
    let canonicalizer = Canonicalizer::settlement();
    let float_total = json!({"total_amount": 90.5});
    let err = compute_settlement_digest(&float_total, &canonicalizer).unwrap_err();
    assert!(matches!(
        err,
        SettlementDigestError::Canonicalization(CanonicalizationError::FloatingPointNumber { .. })
    ));
}

#[test]
fn digest_display_includes_algorithm() {
    let digest = Digest::new(DigestAlg::Sha256, "A".repeat(43)).unwrap();
    assert_eq!(digest.to_string(), format!("sha-256:{}", "A".repeat(43)));
    assert!(Digest::new(DigestAlg::Sha256, "too-short").is_err());
}
