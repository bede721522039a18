use chrono::{Duration, Utc};
use event_ticketing::domain::promotion::{discount_is_valid, discounted_price, window_is_valid, Promotion};
use rust_decimal::Decimal;
use uuid::Uuid;

#[test]
fn twenty_percent_off_fifty_is_forty() {
    let event_id = Uuid::new_v4();
    let promo = promotion("SAVE20", 20, event_id, true);
    let base: Decimal = "50.00".parse().unwrap();

    let price = discounted_price(base, Some(&promo), event_id, Utc::now());
    assert_eq!(price, "40.00".parse::<Decimal>().unwrap());
}

#[test]
fn no_code_leaves_base_price_unchanged() {
    let base: Decimal = "100.00".parse().unwrap();
    let price = discounted_price(base, None, Uuid::new_v4(), Utc::now());
    assert_eq!(price, base);
}

#[test]
fn code_for_another_event_does_not_apply() {
    let promo = promotion("SAVE20", 20, Uuid::new_v4(), true);
    let base: Decimal = "50.00".parse().unwrap();

    let price = discounted_price(base, Some(&promo), Uuid::new_v4(), Utc::now());
    assert_eq!(price, base);
}

#[test]
fn inactive_code_does_not_apply() {
    let event_id = Uuid::new_v4();
    let promo = promotion("SAVE20", 20, event_id, false);
    let base: Decimal = "50.00".parse().unwrap();

    let price = discounted_price(base, Some(&promo), event_id, Utc::now());
    assert_eq!(price, base);
}

#[test]
fn expired_window_does_not_apply() {
    let event_id = Uuid::new_v4();
    let mut promo = promotion("SAVE20", 20, event_id, true);
    promo.start_date = Utc::now() - Duration::days(30);
    promo.end_date = Utc::now() - Duration::days(1);
    let base: Decimal = "50.00".parse().unwrap();

    let price = discounted_price(base, Some(&promo), event_id, Utc::now());
    assert_eq!(price, base);
}

#[test]
fn future_window_does_not_apply() {
    let event_id = Uuid::new_v4();
    let mut promo = promotion("EARLYBIRD", 15, event_id, true);
    promo.start_date = Utc::now() + Duration::days(1);
    promo.end_date = Utc::now() + Duration::days(30);
    let base: Decimal = "50.00".parse().unwrap();

    let price = discounted_price(base, Some(&promo), event_id, Utc::now());
    assert_eq!(price, base);
}

#[test]
fn window_boundaries_are_inclusive() {
    let event_id = Uuid::new_v4();
    let now = Utc::now();
    let mut promo = promotion("EDGE", 10, event_id, true);
    promo.start_date = now;
    promo.end_date = now;

    assert!(promo.is_valid_for(event_id, now));
}

#[test]
fn full_discount_prices_at_zero() {
    let event_id = Uuid::new_v4();
    let promo = promotion("FREE", 100, event_id, true);
    let base: Decimal = "75.50".parse().unwrap();

    let price = discounted_price(base, Some(&promo), event_id, Utc::now());
    assert_eq!(price, Decimal::ZERO);
}

#[test]
fn zero_discount_keeps_base_price() {
    let event_id = Uuid::new_v4();
    let promo = promotion("NOOP", 0, event_id, true);
    let base: Decimal = "75.50".parse().unwrap();

    let price = discounted_price(base, Some(&promo), event_id, Utc::now());
    assert_eq!(price, base);
}

#[test]
fn create_validation_rules() {
    let now = Utc::now();
    assert!(window_is_valid(now, now + Duration::days(1)));
    assert!(!window_is_valid(now, now));
    assert!(!window_is_valid(now + Duration::days(1), now));

    assert!(discount_is_valid(Decimal::ZERO));
    assert!(discount_is_valid(Decimal::from(100)));
    assert!(!discount_is_valid(Decimal::from(101)));
    assert!(!discount_is_valid(Decimal::from(-1)));
}

fn promotion(code: &str, pct: i32, event_id: Uuid, is_active: bool) -> Promotion {
    Promotion {
        id: Uuid::new_v4(),
        code: code.to_string(),
        description: String::new(),
        discount_percentage: Decimal::from(pct),
        start_date: Utc::now() - Duration::days(1),
        end_date: Utc::now() + Duration::days(1),
        is_active,
        event_id,
        created_at: Utc::now(),
        updated_at: None,
    }
}
