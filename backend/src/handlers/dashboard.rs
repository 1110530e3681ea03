//! Dashboard handlers: KPIs, operational view, forecast, filters and
//! threshold views

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::{ApiResponse, FilterOptions, FilterSpec, ForecastPoint, KpiMetrics};
use validator::Validate;

use super::observations::ObservationQuery;
use crate::error::AppResult;
use crate::services::dashboard::{OperationalSummary, ThresholdAction, ThresholdStatusSummary};
use crate::services::DashboardService;
use crate::AppState;

/// Forecast days returned when no horizon is given
const DEFAULT_FORECAST_HORIZON: u32 = 7;

#[derive(Debug, Deserialize, Validate)]
pub struct ForecastQuery {
    #[validate(range(min = 1, max = 30))]
    pub horizon: Option<u32>,
}

/// Compute KPIs for a filter
pub async fn post_kpis(
    State(state): State<AppState>,
    Json(filter): Json<FilterSpec>,
) -> AppResult<Json<ApiResponse<KpiMetrics>>> {
    let service = DashboardService::new(state.data.clone());
    let kpis = service.get_kpis(&filter)?;
    Ok(Json(ApiResponse::ok(kpis)))
}

/// Threshold status counts, action tracker and recent alerts for a filter
pub async fn post_operational(
    State(state): State<AppState>,
    Json(filter): Json<FilterSpec>,
) -> AppResult<Json<ApiResponse<OperationalSummary>>> {
    let service = DashboardService::new(state.data.clone());
    let summary = service.get_operational(&filter)?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// Forecast for the next `horizon` days (default 7)
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> AppResult<Json<ApiResponse<Vec<ForecastPoint>>>> {
    query.validate()?;
    let service = DashboardService::new(state.data.clone());
    let forecast = service.get_forecast(query.horizon.unwrap_or(DEFAULT_FORECAST_HORIZON))?;
    Ok(Json(ApiResponse::ok(forecast)))
}

/// Filter options present in the data
pub async fn get_filter_options(
    State(state): State<AppState>,
) -> Json<ApiResponse<FilterOptions>> {
    let service = DashboardService::new(state.data.clone());
    Json(ApiResponse::ok(service.get_filter_options()))
}

/// Threshold status over the last 30 days
pub async fn get_threshold_status(
    State(state): State<AppState>,
) -> Json<ApiResponse<ThresholdStatusSummary>> {
    let service = DashboardService::new(state.data.clone());
    Json(ApiResponse::ok(service.get_threshold_status()))
}

/// Actions taken, filtered by query string
pub async fn get_threshold_actions(
    State(state): State<AppState>,
    Query(query): Query<ObservationQuery>,
) -> AppResult<Json<ApiResponse<Vec<ThresholdAction>>>> {
    let filter = query.into_filter()?;
    let service = DashboardService::new(state.data.clone());
    let actions = service.get_threshold_actions(&filter)?;
    Ok(Json(ApiResponse::ok(actions)))
}

/// Actions taken, filtered by a JSON filter
pub async fn post_threshold_actions(
    State(state): State<AppState>,
    Json(filter): Json<FilterSpec>,
) -> AppResult<Json<ApiResponse<Vec<ThresholdAction>>>> {
    let service = DashboardService::new(state.data.clone());
    let actions = service.get_threshold_actions(&filter)?;
    Ok(Json(ApiResponse::ok(actions)))
}
