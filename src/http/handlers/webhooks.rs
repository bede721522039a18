use crate::gateways::stripe::construct_webhook_event;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

/// Gateway callback endpoint. 200 after processing, 400 for anything
/// wrong with the signature or envelope, 500 for internal failures.
/// The signature is computed over the raw body, so the body is taken as
/// bytes before any parsing.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let endpoint_secret = &state.config.stripe_webhook_secret;
    if endpoint_secret.is_empty() {
        tracing::error!("webhook received but no endpoint secret is configured");
        return (StatusCode::BAD_REQUEST, "webhook secret not configured").into_response();
    }

    let Some(signature) = headers.get("Stripe-Signature").and_then(|h| h.to_str().ok()) else {
        tracing::warn!("webhook rejected: missing Stripe-Signature header");
        return (StatusCode::BAD_REQUEST, "missing signature header").into_response();
    };

    if body.is_empty() {
        tracing::warn!("webhook rejected: empty body");
        return (StatusCode::BAD_REQUEST, "empty webhook body").into_response();
    }

    let event = match construct_webhook_event(&body, signature, endpoint_secret) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("webhook rejected: {}", e);
            return (StatusCode::BAD_REQUEST, "signature verification failed").into_response();
        }
    };

    tracing::info!("verified webhook event {} of type {}", event.id, event.event_type);

    match state.reconciliation.handle(event).await {
        Ok(()) => (StatusCode::OK, "ok").into_response(),
        Err(e) => {
            tracing::error!("webhook processing failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}
