use event_ticketing::gateways::{amount_minor, join_payment_ids, parse_payment_ids, GatewayEvent};
use rust_decimal::Decimal;
use uuid::Uuid;

#[test]
fn checkout_session_event_parses_with_metadata() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let raw = format!(
        r#"{{
            "id": "evt_123",
            "type": "checkout.session.completed",
            "data": {{
                "object": {{
                    "id": "cs_test_1",
                    "payment_intent": "pi_456",
                    "metadata": {{
                        "customer_id": "{a}",
                        "payment_ids": "{a},{b}"
                    }}
                }}
            }}
        }}"#,
    );

    let event: GatewayEvent = serde_json::from_str(&raw).unwrap();
    assert_eq!(event.id, "evt_123");
    assert_eq!(event.event_type, "checkout.session.completed");

    let session = event.checkout_session().unwrap();
    assert_eq!(session.id, "cs_test_1");
    assert_eq!(session.payment_intent.as_deref(), Some("pi_456"));

    let ids = parse_payment_ids(session.metadata.get("payment_ids").unwrap());
    assert_eq!(ids, vec![a, b]);
}

#[test]
fn payment_intent_event_parses() {
    let raw = r#"{
        "id": "evt_456",
        "type": "payment_intent.succeeded",
        "data": { "object": { "id": "pi_789", "amount": 5000 } }
    }"#;

    let event: GatewayEvent = serde_json::from_str(raw).unwrap();
    let intent = event.payment_intent().unwrap();
    assert_eq!(intent.id, "pi_789");
}

#[test]
fn charge_event_carries_the_intent_reference() {
    let raw = r#"{
        "id": "evt_789",
        "type": "charge.dispute.created",
        "data": { "object": { "id": "ch_1", "payment_intent": "pi_789" } }
    }"#;

    let event: GatewayEvent = serde_json::from_str(raw).unwrap();
    let charge = event.charge().unwrap();
    assert_eq!(charge.id, "ch_1");
    assert_eq!(charge.payment_intent.as_deref(), Some("pi_789"));
}

#[test]
fn charge_without_intent_parses_to_none() {
    let raw = r#"{
        "id": "evt_790",
        "type": "charge.dispute.created",
        "data": { "object": { "id": "ch_2" } }
    }"#;

    let event: GatewayEvent = serde_json::from_str(raw).unwrap();
    assert!(event.charge().unwrap().payment_intent.is_none());
}

#[test]
fn session_without_metadata_parses_to_empty_map() {
    let raw = r#"{
        "id": "evt_791",
        "type": "checkout.session.completed",
        "data": { "object": { "id": "cs_2" } }
    }"#;

    let event: GatewayEvent = serde_json::from_str(raw).unwrap();
    let session = event.checkout_session().unwrap();
    assert!(session.metadata.is_empty());
    assert!(session.payment_intent.is_none());
}

#[test]
fn payment_id_list_round_trips() {
    let ids = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
    let joined = join_payment_ids(&ids);
    assert_eq!(parse_payment_ids(&joined), ids);
}

#[test]
fn payment_id_parsing_drops_blanks_and_junk() {
    let id = Uuid::new_v4();
    let raw = format!(" {id} ,, not-a-uuid ,{id}");
    assert_eq!(parse_payment_ids(&raw), vec![id, id]);
    assert!(parse_payment_ids("").is_empty());
}

#[test]
fn amounts_convert_to_minor_units() {
    assert_eq!(amount_minor("40.00".parse::<Decimal>().unwrap()), 4000);
    assert_eq!(amount_minor("0.01".parse::<Decimal>().unwrap()), 1);
    assert_eq!(amount_minor("99.99".parse::<Decimal>().unwrap()), 9999);
    assert_eq!(amount_minor(Decimal::ZERO), 0);
}
