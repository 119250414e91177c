//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use chrono::{Local, NaiveDateTime};

use super::dto::{HealthResponse, RangeQuery, SubscriptionListResponse};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::models::{ModelSummary, RangeSummary, ShiftWindow};
use crate::services::{bucketize, production_summary};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Current plant wall-clock time.
pub(crate) fn plant_now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn range_query(query: Result<Query<RangeQuery>, QueryRejection>) -> Result<RangeQuery, AppError> {
    query
        .map(|Query(range)| range)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the record store is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Units
// =============================================================================

/// GET /units
///
/// Known production units, sorted.
pub async fn list_units(State(state): State<AppState>) -> HandlerResult<Vec<String>> {
    let units = db_services::list_units(state.repository.as_ref()).await?;
    Ok(Json(units))
}

// =============================================================================
// OEE queries
// =============================================================================

/// GET /v1/units/{unit}/production?start_time=...&end_time=...
///
/// Per-model summaries over the whole range.
pub async fn get_production(
    State(state): State<AppState>,
    Path(unit): Path<String>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> HandlerResult<Vec<ModelSummary>> {
    let (start, end) = range_query(query)?.resolve(plant_now(), state.config.max_range())?;
    let summaries = production_summary(state.repository.as_ref(), &unit, start, end).await?;
    Ok(Json(summaries))
}

/// GET /v1/units/{unit}/hourly?start_time=...&end_time=...
///
/// Hour-aligned buckets and range totals.
pub async fn get_hourly(
    State(state): State<AppState>,
    Path(unit): Path<String>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> HandlerResult<RangeSummary> {
    let (start, end) = range_query(query)?.resolve(plant_now(), state.config.max_range())?;
    let summary = bucketize(
        state.repository.as_ref(),
        &unit,
        start,
        end,
        state.config.fetch_concurrency,
    )
    .await?;
    Ok(Json(summary))
}

/// GET /v1/shifts/current
///
/// The shift in progress on the plant clock.
pub async fn current_shift() -> HandlerResult<ShiftWindow> {
    Ok(Json(ShiftWindow::at(plant_now())))
}

// =============================================================================
// Subscriptions
// =============================================================================

/// GET /v1/subscriptions
///
/// WebSocket subscriptions currently receiving pushes.
pub async fn list_subscriptions(
    State(state): State<AppState>,
) -> HandlerResult<SubscriptionListResponse> {
    let subscriptions = state.subscriptions.list();
    let total = subscriptions.len();
    Ok(Json(SubscriptionListResponse {
        subscriptions,
        total,
    }))
}
