use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promotion {
    pub id: Uuid,
    pub code: String,
    pub description: String,
    pub discount_percentage: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    pub event_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Promotion {
    /// A code is usable only while active, inside its window, and against
    /// the event it was created for.
    pub fn is_valid_for(&self, event_id: Uuid, now: DateTime<Utc>) -> bool {
        self.is_active && self.event_id == event_id && self.start_date <= now && now <= self.end_date
    }

    pub fn discount_amount(&self, original: Decimal) -> Decimal {
        original * (self.discount_percentage / Decimal::from(100))
    }
}

/// Final ticket price after an optional promotion. Invalid or mismatched
/// codes leave the base price unchanged.
pub fn discounted_price(
    base_price: Decimal,
    promotion: Option<&Promotion>,
    event_id: Uuid,
    now: DateTime<Utc>,
) -> Decimal {
    match promotion {
        Some(promo) if promo.is_valid_for(event_id, now) => base_price - promo.discount_amount(base_price),
        _ => base_price,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPromotion {
    pub code: String,
    pub description: Option<String>,
    pub discount_percentage: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub event_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromotionUpdate {
    pub description: String,
    pub discount_percentage: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
}

pub fn window_is_valid(start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    start < end
}

pub fn discount_is_valid(pct: Decimal) -> bool {
    pct >= Decimal::ZERO && pct <= Decimal::from(100)
}
