//! Route handlers. Each one parses input, calls the lot service with the
//! current time, and converts the result into a response body.

use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::info;

use super::dto::{
    ExitResponse, HealthResponse, HistoryEntry, ParkResponse, ParkedEntry, SearchResponse,
    StatusResponse,
};
use super::form::{parse_exit_form, parse_park_form, parse_search_query};
use super::AppState;
use crate::error::ApiResult;

/// `POST /api/park`
pub async fn park(
    State(state): State<Arc<AppState>>,
    body: String,
) -> ApiResult<Json<ParkResponse>> {
    let form = parse_park_form(&body)?;

    let receipt = state
        .lot
        .park(form.vehicle_type, &form.vehicle_no, Utc::now())
        .await?;

    Ok(Json(receipt.into()))
}

/// `POST /api/exit`
pub async fn exit(
    State(state): State<Arc<AppState>>,
    body: String,
) -> ApiResult<Json<ExitResponse>> {
    let vehicle_no = parse_exit_form(&body)?;

    let receipt = state.lot.exit(&vehicle_no, Utc::now()).await?;
    info!(
        ticket_id = receipt.ticket.id,
        amount = %receipt.bill.amount,
        "Exit billed over HTTP"
    );

    Ok(Json(receipt.into()))
}

/// `GET /api/status`
pub async fn status(State(state): State<Arc<AppState>>) -> ApiResult<Json<StatusResponse>> {
    let status = state.lot.status().await?;
    Ok(Json(StatusResponse::from(&status)))
}

/// `GET /api/search?vehicleNo=<v>`
///
/// The query is read raw, like the park and exit bodies, so a plate is
/// matched byte for byte with what was parked.
pub async fn search(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> ApiResult<(StatusCode, Json<SearchResponse>)> {
    let vehicle_no = parse_search_query(query.as_deref())?;

    let response = match state.lot.search(&vehicle_no, Utc::now()).await? {
        Some(lookup) => (StatusCode::OK, Json(lookup.into())),
        None => (StatusCode::NOT_FOUND, Json(SearchResponse::not_found())),
    };

    Ok(response)
}

/// `GET /api/history`
pub async fn history(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<HistoryEntry>>> {
    let tickets = state.lot.history(state.history_limit).await?;
    Ok(Json(tickets.into_iter().map(HistoryEntry::from).collect()))
}

/// `GET /api/parked`
pub async fn parked(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<ParkedEntry>>> {
    let parked = state.lot.parked(Utc::now()).await?;
    Ok(Json(parked.into_iter().map(ParkedEntry::from).collect()))
}

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let database = state.lot.database().health_check().await;

    if database {
        (StatusCode::OK, Json(HealthResponse { status: "ok", database }))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse { status: "degraded", database }),
        )
    }
}

/// Fallback for paths with no static file.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "404 Not Found")
}
