use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    EventOrganizer,
    Customer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::EventOrganizer => "EVENT_ORGANIZER",
            UserRole::Customer => "CUSTOMER",
        }
    }

    pub fn parse(s: &str) -> Option<UserRole> {
        match s {
            "ADMIN" => Some(UserRole::Admin),
            "EVENT_ORGANIZER" => Some(UserRole::EventOrganizer),
            "CUSTOMER" => Some(UserRole::Customer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub loyalty_points: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
