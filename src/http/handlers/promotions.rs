use crate::domain::payment::ErrorEnvelope;
use crate::domain::promotion::{NewPromotion, PromotionUpdate};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

pub async fn list_promotions(State(state): State<AppState>) -> impl IntoResponse {
    match state.promotion_service.list().await {
        Ok(promotions) => (StatusCode::OK, Json(promotions)).into_response(),
        Err(e) => internal(e),
    }
}

pub async fn active_promotions(State(state): State<AppState>) -> impl IntoResponse {
    match state.promotion_service.active().await {
        Ok(promotions) => (StatusCode::OK, Json(promotions)).into_response(),
        Err(e) => internal(e),
    }
}

pub async fn get_promotion(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match state.promotion_service.find(id).await {
        Ok(Some(promotion)) => (StatusCode::OK, Json(promotion)).into_response(),
        Ok(None) => not_found("PROMOTION_NOT_FOUND"),
        Err(e) => internal(e),
    }
}

pub async fn event_promotions(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.promotion_service.by_event(event_id).await {
        Ok(promotions) => (StatusCode::OK, Json(promotions)).into_response(),
        Err(e) => internal(e),
    }
}

pub async fn organizer_promotions(
    State(state): State<AppState>,
    Path(organizer_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.promotion_service.by_organizer(organizer_id).await {
        Ok(promotions) => (StatusCode::OK, Json(promotions)).into_response(),
        Err(e) => internal(e),
    }
}

pub async fn create_promotion(
    State(state): State<AppState>,
    Json(req): Json<NewPromotion>,
) -> impl IntoResponse {
    match state.promotion_service.create(&req).await {
        Ok(Some(promotion)) => (StatusCode::CREATED, Json(promotion)).into_response(),
        Ok(None) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorEnvelope::new(
                "INVALID_PROMOTION",
                "dates must satisfy start < end, discount must be within [0,100], event must exist",
            )),
        )
            .into_response(),
        Err(e) => internal(e),
    }
}

pub async fn update_promotion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PromotionUpdate>,
) -> impl IntoResponse {
    match state.promotion_service.update(id, &req).await {
        Ok(true) => (StatusCode::OK, Json(serde_json::json!({"updated": true}))).into_response(),
        Ok(false) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorEnvelope::new("UPDATE_REJECTED", "promotion missing or validation failed")),
        )
            .into_response(),
        Err(e) => internal(e),
    }
}

pub async fn delete_promotion(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match state.promotion_service.delete(id).await {
        Ok(true) => (StatusCode::OK, Json(serde_json::json!({"deleted": true}))).into_response(),
        Ok(false) => not_found("PROMOTION_NOT_FOUND"),
        Err(e) => internal(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct ValidatePromotionRequest {
    pub code: String,
    pub event_id: Uuid,
}

pub async fn validate_promotion(
    State(state): State<AppState>,
    Json(req): Json<ValidatePromotionRequest>,
) -> impl IntoResponse {
    match state.promotion_service.validate(&req.code, req.event_id).await {
        Ok(valid) => (StatusCode::OK, Json(serde_json::json!({"valid": valid}))).into_response(),
        Err(e) => internal(e),
    }
}

fn not_found(code: &str) -> axum::response::Response {
    (StatusCode::NOT_FOUND, Json(ErrorEnvelope::new(code, "resource not found"))).into_response()
}

fn internal(e: anyhow::Error) -> axum::response::Response {
    tracing::error!("promotion handler error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorEnvelope::new("INTERNAL_ERROR", &e.to_string())),
    )
        .into_response()
}
