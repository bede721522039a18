use crate::domain::payment::{ErrorEnvelope, PaymentMethod, PaymentStatus};
use crate::gateways::CheckoutSessionRequest;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MAX_TICKETS_PER_PURCHASE: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub event_id: Uuid,
    pub customer_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub promotion_code: Option<String>,
    pub payment_method: PaymentMethod,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseOutcome {
    All,
    Partial,
    None,
}

#[derive(Debug, Serialize)]
pub struct PurchasedTicket {
    pub ticket_id: Uuid,
    pub payment_id: Option<Uuid>,
    pub qr_code: String,
    pub price: Decimal,
}

#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub requested: u32,
    pub purchased: u32,
    pub outcome: PurchaseOutcome,
    pub total_amount: Decimal,
    pub tickets: Vec<PurchasedTicket>,
    pub checkout_url: Option<String>,
}

/// Quantity N runs N independent purchase calls; availability can run out
/// mid-loop and the response then reports a partial outcome with exactly
/// the tickets that made it.
pub async fn purchase(
    State(state): State<AppState>,
    Json(req): Json<PurchaseRequest>,
) -> impl IntoResponse {
    if req.quantity == 0 || req.quantity > MAX_TICKETS_PER_PURCHASE {
        return bad_request("INVALID_QUANTITY", "quantity must be between 1 and 10");
    }

    let event = match state.event_service.find(req.event_id).await {
        Ok(Some(event)) => event,
        Ok(None) => return not_found("EVENT_NOT_FOUND"),
        Err(e) => return internal(e),
    };
    if !event.is_active {
        return bad_request("EVENT_UNAVAILABLE", "event is not open for ticket purchase");
    }

    let customer = match state.users_repo.find(req.customer_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return not_found("CUSTOMER_NOT_FOUND"),
        Err(e) => return internal(e),
    };

    let promo = req.promotion_code.as_deref();
    let unit_price = match state.event_service.calculate_price(req.event_id, promo).await {
        Ok(price) => price,
        Err(e) => return internal(e),
    };

    let mut tickets = Vec::new();
    let mut payment_ids = Vec::new();

    for _ in 0..req.quantity {
        let ticket = match state
            .ticket_service
            .purchase_ticket(req.event_id, req.customer_id, promo)
            .await
        {
            Ok(Some(ticket)) => ticket,
            Ok(None) => break,
            Err(e) => return internal(e),
        };

        let payment = match state
            .payment_service
            .process_payment(ticket.id, req.customer_id, req.payment_method, unit_price)
            .await
        {
            Ok(payment) => payment,
            Err(e) => return internal(e),
        };

        if let Some(payment) = &payment {
            payment_ids.push(payment.id);
        }

        tickets.push(PurchasedTicket {
            ticket_id: ticket.id,
            payment_id: payment.as_ref().map(|p| p.id),
            qr_code: ticket.qr_code,
            price: ticket.price,
        });
    }

    let purchased = tickets.len() as u32;
    let outcome = if purchased == req.quantity {
        PurchaseOutcome::All
    } else if purchased > 0 {
        PurchaseOutcome::Partial
    } else {
        PurchaseOutcome::None
    };
    let total_amount = unit_price * Decimal::from(purchased);

    let mut checkout_url = None;
    if purchased > 0 && req.payment_method.settles_via_webhook() {
        let session = state
            .gateway
            .create_checkout_session(CheckoutSessionRequest {
                amount: total_amount,
                currency: state.config.currency.clone(),
                customer_id: req.customer_id,
                description: format!("Ticket purchase for {} - {} ticket(s)", event.title, purchased),
                success_url: state.config.checkout_success_url.clone(),
                cancel_url: state.config.checkout_cancel_url.clone(),
                payment_ids: payment_ids.clone(),
            })
            .await;

        match session {
            Some(url) => checkout_url = Some(url),
            None => {
                // tickets and pending payments already exist; no rollback
                return (
                    StatusCode::BAD_GATEWAY,
                    Json(ErrorEnvelope::new(
                        "CHECKOUT_SESSION_FAILED",
                        "could not create hosted checkout session",
                    )),
                )
                    .into_response();
            }
        }
    } else {
        // offline methods settle on the spot
        for payment_id in &payment_ids {
            if let Err(e) = state
                .payment_service
                .update_status(*payment_id, PaymentStatus::Completed)
                .await
            {
                tracing::error!("could not settle offline payment {}: {}", payment_id, e);
            }
        }
    }

    if purchased > 0 {
        let mailer = state.mailer.clone();
        let event_copy = event.clone();
        let customer_copy = customer.clone();
        tokio::spawn(async move {
            mailer
                .send_purchase_initiated(&customer_copy, &event_copy, purchased as usize, total_amount)
                .await;
        });
    }

    (
        StatusCode::OK,
        Json(PurchaseResponse {
            requested: req.quantity,
            purchased,
            outcome,
            total_amount,
            tickets,
            checkout_url,
        }),
    )
        .into_response()
}

pub async fn get_ticket(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match state.ticket_service.find(id).await {
        Ok(Some(ticket)) => (StatusCode::OK, Json(ticket)).into_response(),
        Ok(None) => not_found("TICKET_NOT_FOUND"),
        Err(e) => internal(e),
    }
}

pub async fn customer_tickets(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.ticket_service.by_customer(customer_id).await {
        Ok(tickets) => (StatusCode::OK, Json(tickets)).into_response(),
        Err(e) => internal(e),
    }
}

pub async fn event_tickets(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.ticket_service.by_event(event_id).await {
        Ok(tickets) => (StatusCode::OK, Json(tickets)).into_response(),
        Err(e) => internal(e),
    }
}

pub async fn cancel(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match state.ticket_service.cancel_ticket(id).await {
        Ok(true) => (StatusCode::OK, Json(serde_json::json!({"cancelled": true}))).into_response(),
        Ok(false) => bad_request("CANCEL_REJECTED", "ticket missing or not active"),
        Err(e) => internal(e),
    }
}

/// Flips the ticket to Refunded and books the payment-side refund. The
/// payment step failing (e.g. nothing Completed yet) does not undo the
/// ticket transition.
pub async fn refund(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match state.ticket_service.refund_ticket(id).await {
        Ok(true) => {
            match state.payment_service.process_refund(id).await {
                Ok(true) => {}
                Ok(false) => tracing::warn!("no completed payment to refund for ticket {}", id),
                Err(e) => tracing::error!("payment refund for ticket {} failed: {}", id, e),
            }
            (StatusCode::OK, Json(serde_json::json!({"refunded": true}))).into_response()
        }
        Ok(false) => not_found("TICKET_NOT_FOUND"),
        Err(e) => internal(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub qr_code: String,
}

pub async fn validate(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> impl IntoResponse {
    if req.qr_code.is_empty() {
        return bad_request("MISSING_QR_CODE", "qr_code is required");
    }

    match state.ticket_service.validate_ticket(&req.qr_code).await {
        Ok(valid) => (StatusCode::OK, Json(serde_json::json!({"valid": valid}))).into_response(),
        Err(e) => internal(e),
    }
}

fn bad_request(code: &str, message: &str) -> axum::response::Response {
    (StatusCode::BAD_REQUEST, Json(ErrorEnvelope::new(code, message))).into_response()
}

fn not_found(code: &str) -> axum::response::Response {
    (StatusCode::NOT_FOUND, Json(ErrorEnvelope::new(code, "resource not found"))).into_response()
}

fn internal(e: anyhow::Error) -> axum::response::Response {
    tracing::error!("ticket handler error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorEnvelope::new("INTERNAL_ERROR", &e.to_string())),
    )
        .into_response()
}
