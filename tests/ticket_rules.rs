use chrono::{Duration, Utc};
use event_ticketing::domain::event::Event;
use event_ticketing::domain::payment::generate_transaction_id;
use event_ticketing::domain::ticket::{generate_qr_code, TicketStatus};
use rust_decimal::Decimal;
use uuid::Uuid;

#[test]
fn only_active_tickets_transition() {
    use TicketStatus::*;

    assert!(Active.can_transition_to(Cancelled));
    assert!(Active.can_transition_to(Refunded));
    assert!(Active.can_transition_to(Used));

    for terminal in [Used, Cancelled, Refunded] {
        assert!(!terminal.can_transition_to(Active));
        assert!(!terminal.can_transition_to(Cancelled));
        assert!(!terminal.can_transition_to(Refunded));
        assert!(!terminal.can_transition_to(Used));
    }

    assert!(!Active.can_transition_to(Active));
}

#[test]
fn status_round_trips_through_storage_form() {
    for status in [
        TicketStatus::Active,
        TicketStatus::Used,
        TicketStatus::Cancelled,
        TicketStatus::Refunded,
    ] {
        assert_eq!(TicketStatus::parse(status.as_str()), Some(status));
    }
    assert_eq!(TicketStatus::parse("GARBAGE"), None);
}

#[test]
fn qr_codes_have_the_ticket_prefix_and_are_unique() {
    let a = generate_qr_code();
    let b = generate_qr_code();

    assert!(a.starts_with("TKT-"));
    assert_eq!(a.len(), "TKT-".len() + 32);
    assert!(a[4..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    assert_ne!(a, b);
}

#[test]
fn transaction_ids_embed_the_timestamp() {
    let now = Utc::now();
    let id = generate_transaction_id(now);

    assert!(id.starts_with("TXN-"));
    let parts: Vec<&str> = id.split('-').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[1], now.format("%Y%m%d%H%M%S").to_string());
    assert_eq!(parts[2].len(), 8);
}

#[test]
fn selling_requires_active_event_with_inventory() {
    let mut event = sample_event(10, 3);
    assert!(event.can_sell(1));
    assert!(event.can_sell(3));
    assert!(!event.can_sell(4));

    event.is_active = false;
    assert!(!event.can_sell(1));

    event.is_active = true;
    event.available_tickets = 0;
    assert!(!event.can_sell(1));
}

fn sample_event(capacity: i32, available: i32) -> Event {
    Event {
        id: Uuid::new_v4(),
        title: "Rust Conf".to_string(),
        description: String::new(),
        date: Utc::now() + Duration::days(30),
        location: "Berlin".to_string(),
        category: "Tech".to_string(),
        capacity,
        available_tickets: available,
        base_price: Decimal::from(100),
        image_url: String::new(),
        is_active: true,
        organizer_id: Uuid::new_v4(),
        created_at: Utc::now(),
        updated_at: None,
    }
}
