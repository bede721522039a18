use crate::domain::event::{EventSearch, EventUpdate, NewEvent};
use crate::domain::payment::ErrorEnvelope;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

pub async fn list_events(State(state): State<AppState>) -> impl IntoResponse {
    match state.event_service.list_active().await {
        Ok(events) => (StatusCode::OK, Json(events)).into_response(),
        Err(e) => internal(e),
    }
}

pub async fn list_all_events(State(state): State<AppState>) -> impl IntoResponse {
    match state.event_service.list_all().await {
        Ok(events) => (StatusCode::OK, Json(events)).into_response(),
        Err(e) => internal(e),
    }
}

pub async fn get_event(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match state.event_service.find(id).await {
        Ok(Some(event)) => (StatusCode::OK, Json(event)).into_response(),
        Ok(None) => not_found("EVENT_NOT_FOUND"),
        Err(e) => internal(e),
    }
}

pub async fn search_events(
    State(state): State<AppState>,
    Query(filter): Query<EventSearch>,
) -> impl IntoResponse {
    match state.event_service.search(&filter).await {
        Ok(events) => (StatusCode::OK, Json(events)).into_response(),
        Err(e) => internal(e),
    }
}

pub async fn upcoming_events(State(state): State<AppState>) -> impl IntoResponse {
    match state.event_service.upcoming().await {
        Ok(events) => (StatusCode::OK, Json(events)).into_response(),
        Err(e) => internal(e),
    }
}

pub async fn organizer_events(
    State(state): State<AppState>,
    Path(organizer_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.event_service.by_organizer(organizer_id).await {
        Ok(events) => (StatusCode::OK, Json(events)).into_response(),
        Err(e) => internal(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub quantity: Option<i32>,
}

pub async fn availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> impl IntoResponse {
    let requested = query.quantity.unwrap_or(1);
    match state.event_service.check_availability(id, requested).await {
        Ok(available) => (
            StatusCode::OK,
            Json(serde_json::json!({"event_id": id, "requested": requested, "available": available})),
        )
            .into_response(),
        Err(e) => internal(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub promotion_code: Option<String>,
}

pub async fn price_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PriceQuery>,
) -> impl IntoResponse {
    match state
        .event_service
        .calculate_price(id, query.promotion_code.as_deref())
        .await
    {
        Ok(price) => (StatusCode::OK, Json(serde_json::json!({"event_id": id, "price": price}))).into_response(),
        Err(e) => internal(e),
    }
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<NewEvent>,
) -> impl IntoResponse {
    match state.event_service.create(&req).await {
        Ok(Some(event)) => (StatusCode::CREATED, Json(event)).into_response(),
        Ok(None) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorEnvelope::new("INVALID_EVENT", "capacity must be positive and price non-negative")),
        )
            .into_response(),
        Err(e) => internal(e),
    }
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EventUpdate>,
) -> impl IntoResponse {
    match state.event_service.update(id, &req).await {
        Ok(true) => (StatusCode::OK, Json(serde_json::json!({"updated": true}))).into_response(),
        Ok(false) => not_found("EVENT_NOT_FOUND"),
        Err(e) => internal(e),
    }
}

pub async fn delete_event(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match state.event_service.delete(id).await {
        Ok(true) => (StatusCode::OK, Json(serde_json::json!({"deleted": true}))).into_response(),
        Ok(false) => not_found("EVENT_NOT_FOUND"),
        Err(e) => internal(e),
    }
}

fn not_found(code: &str) -> axum::response::Response {
    (StatusCode::NOT_FOUND, Json(ErrorEnvelope::new(code, "resource not found"))).into_response()
}

fn internal(e: anyhow::Error) -> axum::response::Response {
    tracing::error!("event handler error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorEnvelope::new("INTERNAL_ERROR", &e.to_string())),
    )
        .into_response()
}
