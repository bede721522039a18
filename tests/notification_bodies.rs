use chrono::{TimeZone, Utc};
use event_ticketing::domain::event::Event;
use event_ticketing::domain::ticket::{Ticket, TicketStatus};
use event_ticketing::domain::user::{User, UserRole};
use event_ticketing::service::mailer::{purchase_initiated_body, ticket_confirmation_body};
use rust_decimal::Decimal;
use uuid::Uuid;

#[test]
fn confirmation_email_embeds_the_qr_code_text() {
    let user = sample_user();
    let event = sample_event();
    let ticket = sample_ticket(&event, &user);

    let body = ticket_confirmation_body(&user, &ticket, &event);

    assert!(body.contains(&ticket.qr_code));
    assert!(body.contains("Ada Lovelace"));
    assert!(body.contains("Rust Conf"));
    assert!(body.contains("Berlin"));
    assert!(body.contains("40.00"));
}

#[test]
fn purchase_initiated_email_reports_quantity_and_total() {
    let user = sample_user();
    let event = sample_event();

    let body = purchase_initiated_body(&user, &event, 3, "120.00".parse().unwrap());

    assert!(body.contains("Tickets: 3"));
    assert!(body.contains("120.00"));
    assert!(body.contains("Rust Conf"));
}

fn sample_user() -> User {
    User {
        id: Uuid::new_v4(),
        email: "ada@example.com".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        role: UserRole::Customer,
        loyalty_points: 0,
        is_active: true,
        created_at: Utc::now(),
    }
}

fn sample_event() -> Event {
    Event {
        id: Uuid::new_v4(),
        title: "Rust Conf".to_string(),
        description: String::new(),
        date: Utc.with_ymd_and_hms(2026, 9, 12, 18, 30, 0).unwrap(),
        location: "Berlin".to_string(),
        category: "Tech".to_string(),
        capacity: 100,
        available_tickets: 50,
        base_price: Decimal::from(50),
        image_url: String::new(),
        is_active: true,
        organizer_id: Uuid::new_v4(),
        created_at: Utc::now(),
        updated_at: None,
    }
}

fn sample_ticket(event: &Event, user: &User) -> Ticket {
    Ticket {
        id: Uuid::new_v4(),
        qr_code: "TKT-0123456789ABCDEF0123456789ABCDEF".to_string(),
        price: "40.00".parse().unwrap(),
        seat_number: String::new(),
        status: TicketStatus::Active,
        purchase_date: Utc::now(),
        event_id: event.id,
        customer_id: user.id,
        created_at: Utc::now(),
        updated_at: None,
    }
}
