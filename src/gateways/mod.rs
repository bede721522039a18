use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

pub mod mock;
pub mod stripe;

#[derive(Debug, Clone)]
pub struct CheckoutSessionRequest {
    pub amount: Decimal,
    pub currency: String,
    pub customer_id: Uuid,
    pub description: String,
    pub success_url: String,
    pub cancel_url: String,
    pub payment_ids: Vec<Uuid>,
}

#[async_trait::async_trait]
pub trait CheckoutGateway: Send + Sync {
    fn name(&self) -> &'static str;

    /// Hosted checkout URL for the total amount, or None on any
    /// gateway-side failure. No retry.
    async fn create_checkout_session(&self, request: CheckoutSessionRequest) -> Option<String>;

    /// Gateway refund id, or None on failure.
    async fn create_refund(&self, gateway_intent_id: &str, amount: Decimal) -> Option<String>;
}

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("missing or malformed signature header")]
    InvalidHeader,
    #[error("signature timestamp outside tolerance")]
    StaleTimestamp,
    #[error("webhook signature verification failed")]
    SignatureMismatch,
    #[error("malformed webhook payload: {0}")]
    BadPayload(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: GatewayEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayEventData {
    pub object: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSessionObject {
    pub id: String,
    #[serde(default)]
    pub payment_intent: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntentObject {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChargeObject {
    pub id: String,
    #[serde(default)]
    pub payment_intent: Option<String>,
}

impl GatewayEvent {
    pub fn checkout_session(&self) -> Result<CheckoutSessionObject, WebhookError> {
        Ok(serde_json::from_value(self.data.object.clone())?)
    }

    pub fn payment_intent(&self) -> Result<PaymentIntentObject, WebhookError> {
        Ok(serde_json::from_value(self.data.object.clone())?)
    }

    pub fn charge(&self) -> Result<ChargeObject, WebhookError> {
        Ok(serde_json::from_value(self.data.object.clone())?)
    }
}

/// Comma-joined payment ids carried in session metadata so the webhook can
/// correlate back to local rows without a pre-existing intent id.
pub fn join_payment_ids(ids: &[Uuid]) -> String {
    ids.iter().map(Uuid::to_string).collect::<Vec<_>>().join(",")
}

/// Tolerates blanks and junk entries; anything that is not a uuid is dropped.
pub fn parse_payment_ids(raw: &str) -> Vec<Uuid> {
    raw.split(',')
        .filter_map(|part| Uuid::parse_str(part.trim()).ok())
        .collect()
}

/// Gateway APIs take amounts in minor currency units.
pub fn amount_minor(amount: Decimal) -> i64 {
    (amount * Decimal::from(100)).round().to_i64().unwrap_or(0)
}
