use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub category: String,
    pub capacity: i32,
    pub available_tickets: i32,
    pub base_price: Decimal,
    pub image_url: String,
    pub is_active: bool,
    pub organizer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    /// An event can sell tickets while it is active and has inventory left.
    pub fn can_sell(&self, requested: i32) -> bool {
        self.is_active && self.available_tickets >= requested
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub category: String,
    pub capacity: i32,
    pub base_price: Decimal,
    pub image_url: Option<String>,
    pub organizer_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventUpdate {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub category: String,
    pub base_price: Decimal,
    pub image_url: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventSearch {
    pub category: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub term: Option<String>,
}
