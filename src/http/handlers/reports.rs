use crate::service::report::{events_csv, revenue_csv, sales_csv, users_csv};
use crate::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

pub async fn sales_report(State(state): State<AppState>) -> impl IntoResponse {
    match state.report_service.sales().await {
        Ok(rows) => csv_response(sales_csv(&rows)),
        Err(e) => internal(e),
    }
}

pub async fn users_report(State(state): State<AppState>) -> impl IntoResponse {
    match state.report_service.users().await {
        Ok(rows) => csv_response(users_csv(&rows)),
        Err(e) => internal(e),
    }
}

pub async fn events_report(State(state): State<AppState>) -> impl IntoResponse {
    match state.report_service.events().await {
        Ok(rows) => csv_response(events_csv(&rows)),
        Err(e) => internal(e),
    }
}

pub async fn revenue_report(State(state): State<AppState>) -> impl IntoResponse {
    match state.report_service.revenue().await {
        Ok(rows) => csv_response(revenue_csv(&rows)),
        Err(e) => internal(e),
    }
}

fn csv_response(body: String) -> axum::response::Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, "text/csv")], body).into_response()
}

fn internal(e: anyhow::Error) -> axum::response::Response {
    tracing::error!("report handler error: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
}
