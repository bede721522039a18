use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Active,
    Used,
    Cancelled,
    Refunded,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Active => "ACTIVE",
            TicketStatus::Used => "USED",
            TicketStatus::Cancelled => "CANCELLED",
            TicketStatus::Refunded => "REFUNDED",
        }
    }

    pub fn parse(s: &str) -> Option<TicketStatus> {
        match s {
            "ACTIVE" => Some(TicketStatus::Active),
            "USED" => Some(TicketStatus::Used),
            "CANCELLED" => Some(TicketStatus::Cancelled),
            "REFUNDED" => Some(TicketStatus::Refunded),
            _ => None,
        }
    }

    /// Used, Cancelled and Refunded are terminal; only an Active ticket
    /// moves anywhere.
    pub fn can_transition_to(&self, next: TicketStatus) -> bool {
        *self == TicketStatus::Active && next != TicketStatus::Active
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub qr_code: String,
    pub price: Decimal,
    pub seat_number: String,
    pub status: TicketStatus,
    pub purchase_date: DateTime<Utc>,
    pub event_id: Uuid,
    pub customer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub fn generate_qr_code() -> String {
    format!("TKT-{}", Uuid::new_v4().simple().to_string().to_uppercase())
}
