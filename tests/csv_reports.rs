use chrono::{TimeZone, Utc};
use event_ticketing::service::report::{
    events_csv, revenue_csv, sales_csv, users_csv, EventRow, RevenueRow, SalesRow, UserRow,
};
use rust_decimal::Decimal;
use uuid::Uuid;

#[test]
fn sales_csv_has_fixed_header_and_one_line_per_row() {
    let row = SalesRow {
        ticket_id: Uuid::nil(),
        event_title: "Rust Conf".to_string(),
        customer_email: "ada@example.com".to_string(),
        price: "40.00".parse().unwrap(),
        ticket_status: "ACTIVE".to_string(),
        payment_status: "COMPLETED".to_string(),
        purchase_date: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
    };

    let csv = sales_csv(&[row.clone(), row]);
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines[0], "ticket_id,event,customer,price,ticket_status,payment_status,purchase_date");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("ada@example.com"));
    assert!(lines[1].contains("40.00"));
    assert!(lines[1].ends_with("2025-06-01 12:00:00"));
}

#[test]
fn fields_with_commas_are_quoted() {
    let row = SalesRow {
        ticket_id: Uuid::nil(),
        event_title: "Dinner, Drinks & Code".to_string(),
        customer_email: "ada@example.com".to_string(),
        price: Decimal::from(10),
        ticket_status: "ACTIVE".to_string(),
        payment_status: "PENDING".to_string(),
        purchase_date: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
    };

    let csv = sales_csv(&[row]);
    assert!(csv.contains("\"Dinner, Drinks & Code\""));
}

#[test]
fn embedded_quotes_are_doubled() {
    let row = EventRow {
        id: Uuid::nil(),
        title: "The \"Big\" One".to_string(),
        category: "Music".to_string(),
        date: Utc.with_ymd_and_hms(2025, 7, 4, 20, 0, 0).unwrap(),
        location: "Town Hall".to_string(),
        capacity: 100,
        available_tickets: 60,
        base_price: Decimal::from(25),
        is_active: true,
        tickets_sold: 40,
    };

    let csv = events_csv(&[row]);
    assert!(csv.contains("\"The \"\"Big\"\" One\""));
}

#[test]
fn users_csv_header_and_shape() {
    let row = UserRow {
        id: Uuid::nil(),
        email: "org@example.com".to_string(),
        full_name: "Grace Hopper".to_string(),
        role: "EVENT_ORGANIZER".to_string(),
        loyalty_points: 120,
        is_active: true,
    };

    let csv = users_csv(&[row]);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "user_id,email,name,role,loyalty_points,is_active");
    assert!(lines[1].ends_with("EVENT_ORGANIZER,120,true"));
}

#[test]
fn revenue_csv_header_and_shape() {
    let row = RevenueRow {
        organizer_id: Uuid::nil(),
        organizer_email: "org@example.com".to_string(),
        events_count: 3,
        tickets_sold: 42,
        revenue: "1234.50".parse().unwrap(),
    };

    let csv = revenue_csv(&[row]);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "organizer_id,organizer_email,events,tickets_sold,revenue");
    assert!(lines[1].ends_with("3,42,1234.50"));
}
