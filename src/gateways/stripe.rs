use crate::gateways::{
    amount_minor, join_payment_ids, CheckoutGateway, CheckoutSessionRequest, GatewayEvent, WebhookError,
};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signatures older (or newer) than this many seconds are rejected, which
/// bounds the replay window for a captured webhook body.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

pub struct StripeGateway {
    pub base_url: String,
    pub secret_key: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

#[async_trait::async_trait]
impl CheckoutGateway for StripeGateway {
    fn name(&self) -> &'static str {
        "stripe"
    }

    async fn create_checkout_session(&self, request: CheckoutSessionRequest) -> Option<String> {
        let url = format!("{}/v1/checkout/sessions", self.base_url);
        let unit_amount = amount_minor(request.amount).to_string();
        let payment_ids = join_payment_ids(&request.payment_ids);
        let customer_id = request.customer_id.to_string();

        let params: Vec<(&str, &str)> = vec![
            ("payment_method_types[0]", "card"),
            ("line_items[0][price_data][currency]", &request.currency),
            ("line_items[0][price_data][unit_amount]", &unit_amount),
            ("line_items[0][price_data][product_data][name]", "Event Ticket"),
            ("line_items[0][price_data][product_data][description]", &request.description),
            ("line_items[0][quantity]", "1"),
            ("mode", "payment"),
            ("success_url", &request.success_url),
            ("cancel_url", &request.cancel_url),
            ("metadata[customer_id]", &customer_id),
            ("metadata[description]", &request.description),
            ("metadata[payment_ids]", &payment_ids),
        ];

        let resp = self
            .client
            .post(url)
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&params)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await;

        match resp {
            Ok(r) if r.status().is_success() => {
                let v: serde_json::Value = r.json().await.unwrap_or_default();
                v.get("url").and_then(|u| u.as_str()).map(ToString::to_string)
            }
            Ok(r) => {
                let status = r.status();
                let body = r.text().await.unwrap_or_default();
                tracing::warn!(
                    "checkout session creation failed: HTTP {} {}",
                    status.as_u16(),
                    body.chars().take(200).collect::<String>()
                );
                None
            }
            Err(e) => {
                tracing::warn!("checkout session creation failed: {}", e);
                None
            }
        }
    }

    async fn create_refund(&self, gateway_intent_id: &str, amount: Decimal) -> Option<String> {
        let url = format!("{}/v1/refunds", self.base_url);
        let unit_amount = amount_minor(amount).to_string();
        let params: Vec<(&str, &str)> = vec![
            ("payment_intent", gateway_intent_id),
            ("amount", &unit_amount),
        ];

        let resp = self
            .client
            .post(url)
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&params)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await;

        match resp {
            Ok(r) if r.status().is_success() => {
                let v: serde_json::Value = r.json().await.unwrap_or_default();
                v.get("id").and_then(|id| id.as_str()).map(ToString::to_string)
            }
            Ok(r) => {
                tracing::warn!("refund creation failed: HTTP {}", r.status().as_u16());
                None
            }
            Err(e) => {
                tracing::warn!("refund creation failed: {}", e);
                None
            }
        }
    }
}

/// Verifies the signature header and parses the raw body into an event.
/// Any failure here must surface as a client error to the gateway, never
/// as silent acceptance.
pub fn construct_webhook_event(
    payload: &[u8],
    signature_header: &str,
    endpoint_secret: &str,
) -> Result<GatewayEvent, WebhookError> {
    verify_signature_at(payload, signature_header, endpoint_secret, SIGNATURE_TOLERANCE_SECS, Utc::now())?;
    Ok(serde_json::from_slice(payload)?)
}

/// The gateway signs `"{timestamp}.{raw body}"` with HMAC-SHA256 over the
/// shared endpoint secret and sends `t=<unix>,v1=<hex>` (possibly several
/// v1 entries during secret rotation). Comparison goes through
/// `Mac::verify_slice`, which is constant-time.
pub fn verify_signature_at(
    payload: &[u8],
    signature_header: &str,
    endpoint_secret: &str,
    tolerance_secs: i64,
    now: DateTime<Utc>,
) -> Result<(), WebhookError> {
    let mut timestamp: Option<i64> = None;
    let mut candidates: Vec<&str> = Vec::new();

    for part in signature_header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => candidates.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(WebhookError::InvalidHeader)?;
    if candidates.is_empty() {
        return Err(WebhookError::InvalidHeader);
    }

    if (now.timestamp() - timestamp).abs() > tolerance_secs {
        return Err(WebhookError::StaleTimestamp);
    }

    let mut mac = HmacSha256::new_from_slice(endpoint_secret.as_bytes())
        .map_err(|_| WebhookError::InvalidHeader)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    for candidate in candidates {
        let Ok(decoded) = hex::decode(candidate) else {
            continue;
        };
        if mac.clone().verify_slice(&decoded).is_ok() {
            return Ok(());
        }
    }

    Err(WebhookError::SignatureMismatch)
}
