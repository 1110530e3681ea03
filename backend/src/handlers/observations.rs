//! Observation query handlers

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::{
    ActionFilter, ApiResponse, DateRange, FieldStage, FilterSpec, Observation, PestType, Season,
    Selection, ThresholdFilter,
};

use crate::error::{AppError, AppResult};
use crate::services::DashboardService;
use crate::AppState;

/// Flat query-string form of a filter
#[derive(Debug, Default, Deserialize)]
pub struct ObservationQuery {
    pub year: Option<i32>,
    pub season: Option<Selection<Season>>,
    pub field_stage: Option<Selection<FieldStage>>,
    pub pest_type: Option<Selection<PestType>>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub threshold_status: Option<Selection<ThresholdFilter>>,
    pub action_status: Option<Selection<ActionFilter>>,
}

impl ObservationQuery {
    /// Convert to a filter; `start` and `end` must be given together
    pub fn into_filter(self) -> AppResult<FilterSpec> {
        let date_range = match (self.start, self.end) {
            (Some(start), Some(end)) => Some(DateRange::new(start, end)),
            (None, None) => None,
            _ => {
                return Err(AppError::validation(
                    "start",
                    "Both start and end are required for a date range",
                ))
            }
        };

        Ok(FilterSpec {
            year: self.year,
            season: self.season,
            field_stage: self.field_stage,
            pest_type: self.pest_type,
            date_range,
            threshold_status: self.threshold_status,
            action_status: self.action_status,
        })
    }
}

/// List observations matching the query
pub async fn list_observations(
    State(state): State<AppState>,
    Query(query): Query<ObservationQuery>,
) -> AppResult<Json<ApiResponse<Vec<Observation>>>> {
    let filter = query.into_filter()?;
    let service = DashboardService::new(state.data.clone());
    let observations = service.get_observations(&filter).await?;
    Ok(Json(ApiResponse::ok(observations)))
}
