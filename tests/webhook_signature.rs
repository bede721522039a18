use chrono::{Duration, Utc};
use event_ticketing::gateways::stripe::{verify_signature_at, SIGNATURE_TOLERANCE_SECS};
use event_ticketing::gateways::WebhookError;
use hmac::{Hmac, Mac};
use sha2::Sha256;

const SECRET: &str = "whsec_test123secret456";
const PAYLOAD: &[u8] = br#"{"id":"evt_1","type":"checkout.session.completed"}"#;

fn sign(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

#[test]
fn valid_signature_is_accepted() {
    let now = Utc::now();
    let t = now.timestamp();
    let header = format!("t={},v1={}", t, sign(PAYLOAD, SECRET, t));

    assert!(verify_signature_at(PAYLOAD, &header, SECRET, SIGNATURE_TOLERANCE_SECS, now).is_ok());
}

#[test]
fn wrong_secret_is_rejected() {
    let now = Utc::now();
    let t = now.timestamp();
    let header = format!("t={},v1={}", t, sign(PAYLOAD, "wrong_secret", t));

    let err = verify_signature_at(PAYLOAD, &header, SECRET, SIGNATURE_TOLERANCE_SECS, now).unwrap_err();
    assert!(matches!(err, WebhookError::SignatureMismatch));
}

#[test]
fn tampered_payload_is_rejected() {
    let now = Utc::now();
    let t = now.timestamp();
    let header = format!("t={},v1={}", t, sign(PAYLOAD, SECRET, t));
    let tampered = br#"{"id":"evt_1","type":"checkout.session.completed","amount":0}"#;

    let err = verify_signature_at(tampered, &header, SECRET, SIGNATURE_TOLERANCE_SECS, now).unwrap_err();
    assert!(matches!(err, WebhookError::SignatureMismatch));
}

#[test]
fn stale_timestamp_is_rejected_even_with_valid_signature() {
    let now = Utc::now();
    let t = (now - Duration::seconds(SIGNATURE_TOLERANCE_SECS + 60)).timestamp();
    let header = format!("t={},v1={}", t, sign(PAYLOAD, SECRET, t));

    let err = verify_signature_at(PAYLOAD, &header, SECRET, SIGNATURE_TOLERANCE_SECS, now).unwrap_err();
    assert!(matches!(err, WebhookError::StaleTimestamp));
}

#[test]
fn future_timestamp_outside_tolerance_is_rejected() {
    let now = Utc::now();
    let t = (now + Duration::seconds(SIGNATURE_TOLERANCE_SECS + 60)).timestamp();
    let header = format!("t={},v1={}", t, sign(PAYLOAD, SECRET, t));

    let err = verify_signature_at(PAYLOAD, &header, SECRET, SIGNATURE_TOLERANCE_SECS, now).unwrap_err();
    assert!(matches!(err, WebhookError::StaleTimestamp));
}

#[test]
fn missing_timestamp_is_a_header_error() {
    let now = Utc::now();
    let header = format!("v1={}", sign(PAYLOAD, SECRET, now.timestamp()));

    let err = verify_signature_at(PAYLOAD, &header, SECRET, SIGNATURE_TOLERANCE_SECS, now).unwrap_err();
    assert!(matches!(err, WebhookError::InvalidHeader));
}

#[test]
fn missing_signature_is_a_header_error() {
    let now = Utc::now();
    let header = format!("t={}", now.timestamp());

    let err = verify_signature_at(PAYLOAD, &header, SECRET, SIGNATURE_TOLERANCE_SECS, now).unwrap_err();
    assert!(matches!(err, WebhookError::InvalidHeader));
}

#[test]
fn any_matching_v1_entry_is_enough() {
    let now = Utc::now();
    let t = now.timestamp();
    let stale_secret = sign(PAYLOAD, "rotated_out_secret", t);
    let good = sign(PAYLOAD, SECRET, t);
    let header = format!("t={},v1={},v1={}", t, stale_secret, good);

    assert!(verify_signature_at(PAYLOAD, &header, SECRET, SIGNATURE_TOLERANCE_SECS, now).is_ok());
}

#[test]
fn non_hex_candidates_are_skipped_not_fatal() {
    let now = Utc::now();
    let t = now.timestamp();
    let header = format!("t={},v1=not-hex-at-all,v1={}", t, sign(PAYLOAD, SECRET, t));

    assert!(verify_signature_at(PAYLOAD, &header, SECRET, SIGNATURE_TOLERANCE_SECS, now).is_ok());
}
