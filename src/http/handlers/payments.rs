use crate::domain::payment::{ErrorEnvelope, PaymentStatus};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

pub async fn get_payment(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match state.payment_service.find(id).await {
        Ok(Some(payment)) => (StatusCode::OK, Json(payment)).into_response(),
        Ok(None) => not_found("PAYMENT_NOT_FOUND"),
        Err(e) => internal(e),
    }
}

pub async fn customer_payments(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.payment_service.by_customer(customer_id).await {
        Ok(payments) => (StatusCode::OK, Json(payments)).into_response(),
        Err(e) => internal(e),
    }
}

pub async fn ticket_payments(
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.payment_service.by_ticket(ticket_id).await {
        Ok(payments) => (StatusCode::OK, Json(payments)).into_response(),
        Err(e) => internal(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: PaymentStatus,
}

/// Admin override; deliberately unguarded, any status can be written.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
    match state.payment_service.update_status(id, req.status).await {
        Ok(true) => (StatusCode::OK, Json(serde_json::json!({"updated": true}))).into_response(),
        Ok(false) => not_found("PAYMENT_NOT_FOUND"),
        Err(e) => internal(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct ValidateQuery {
    pub transaction_id: String,
}

pub async fn validate(
    State(state): State<AppState>,
    Query(query): Query<ValidateQuery>,
) -> impl IntoResponse {
    match state.payment_service.validate_payment(&query.transaction_id).await {
        Ok(valid) => (StatusCode::OK, Json(serde_json::json!({"valid": valid}))).into_response(),
        Err(e) => internal(e),
    }
}

pub async fn total_revenue(State(state): State<AppState>) -> impl IntoResponse {
    match state.payment_service.total_revenue().await {
        Ok(total) => (StatusCode::OK, Json(serde_json::json!({"total_revenue": total}))).into_response(),
        Err(e) => internal(e),
    }
}

pub async fn organizer_revenue(
    State(state): State<AppState>,
    Path(organizer_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.payment_service.revenue_by_organizer(organizer_id).await {
        Ok(total) => (
            StatusCode::OK,
            Json(serde_json::json!({"organizer_id": organizer_id, "revenue": total})),
        )
            .into_response(),
        Err(e) => internal(e),
    }
}

fn not_found(code: &str) -> axum::response::Response {
    (StatusCode::NOT_FOUND, Json(ErrorEnvelope::new(code, "resource not found"))).into_response()
}

fn internal(e: anyhow::Error) -> axum::response::Response {
    tracing::error!("payment handler error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorEnvelope::new("INTERNAL_ERROR", &e.to_string())),
    )
        .into_response()
}
