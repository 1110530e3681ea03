//! Reporting handlers for data export

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};

use super::observations::ObservationQuery;
use crate::error::AppResult;
use crate::services::{DashboardService, ReportingService};
use crate::AppState;

/// Export filtered observations as CSV
pub async fn export_observations(
    State(state): State<AppState>,
    Query(query): Query<ObservationQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = query.into_filter()?;
    let service = DashboardService::new(state.data.clone());
    let observations = service.get_observations(&filter).await?;
    let csv = ReportingService::export_observations(&observations)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"observations.csv\""),
        ],
        csv,
    ))
}
