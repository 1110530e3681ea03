//! Reporting service for data export

use chrono::NaiveDate;
use serde::Serialize;
use shared::Observation;

use crate::error::{AppError, AppResult};

/// One CSV row per observation; every column is always present
#[derive(Debug, Serialize)]
pub struct ObservationRow<'a> {
    pub id: &'a str,
    pub date: NaiveDate,
    pub pest_type: &'static str,
    pub count: u32,
    pub threshold: u32,
    pub threshold_status: &'static str,
    pub season: &'static str,
    pub field_stage: &'static str,
    pub location: Option<&'a str>,
    pub action_taken: bool,
    pub action_type: Option<&'a str>,
    pub action_date: Option<NaiveDate>,
}

impl<'a> From<&'a Observation> for ObservationRow<'a> {
    fn from(obs: &'a Observation) -> Self {
        Self {
            id: &obs.id,
            date: obs.date,
            pest_type: obs.pest_type.as_str(),
            count: obs.count,
            threshold: obs.threshold,
            threshold_status: obs.threshold_status().as_str(),
            season: obs.season.as_str(),
            field_stage: obs.field_stage.as_str(),
            location: obs.location.as_deref(),
            action_taken: obs.action_taken,
            action_type: obs.action_type.as_deref(),
            action_date: obs.action_date,
        }
    }
}

/// Reporting service
pub struct ReportingService;

impl ReportingService {
    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }

    /// Export observations with a fixed column layout
    pub fn export_observations(observations: &[Observation]) -> AppResult<String> {
        let rows: Vec<ObservationRow<'_>> = observations.iter().map(ObservationRow::from).collect();
        Self::export_to_csv(&rows)
    }
}
