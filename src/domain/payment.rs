use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Completed => "COMPLETED",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Refunded => "REFUNDED",
        }
    }

    pub fn parse(s: &str) -> Option<PaymentStatus> {
        match s {
            "PENDING" => Some(PaymentStatus::Pending),
            "COMPLETED" => Some(PaymentStatus::Completed),
            "FAILED" => Some(PaymentStatus::Failed),
            "REFUNDED" => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
    BankTransfer,
    Cash,
    Stripe,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "CREDIT_CARD",
            PaymentMethod::DebitCard => "DEBIT_CARD",
            PaymentMethod::Paypal => "PAYPAL",
            PaymentMethod::BankTransfer => "BANK_TRANSFER",
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Stripe => "STRIPE",
        }
    }

    pub fn parse(s: &str) -> Option<PaymentMethod> {
        match s {
            "CREDIT_CARD" => Some(PaymentMethod::CreditCard),
            "DEBIT_CARD" => Some(PaymentMethod::DebitCard),
            "PAYPAL" => Some(PaymentMethod::Paypal),
            "BANK_TRANSFER" => Some(PaymentMethod::BankTransfer),
            "CASH" => Some(PaymentMethod::Cash),
            "STRIPE" => Some(PaymentMethod::Stripe),
            _ => None,
        }
    }

    /// Hosted-checkout methods settle asynchronously via webhook; the rest
    /// are settled on the spot by an explicit service call.
    pub fn settles_via_webhook(&self) -> bool {
        matches!(self, PaymentMethod::Stripe)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub status: PaymentStatus,
    pub transaction_id: String,
    pub payment_method: PaymentMethod,
    pub ticket_id: Uuid,
    pub customer_id: Uuid,
    pub gateway_intent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub fn generate_transaction_id(now: DateTime<Utc>) -> String {
    let suffix: String = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
    format!("TXN-{}-{}", now.format("%Y%m%d%H%M%S"), suffix)
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(code: &str, message: &str) -> Self {
        ErrorEnvelope {
            error: ErrorPayload {
                code: code.to_string(),
                message: message.to_string(),
                details: None,
            },
        }
    }
}
