//! Pest forecast models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::PestType;

/// Maximum number of days ahead a forecast covers
pub const FORECAST_HORIZON_DAYS: u32 = 30;

/// Predicted pest count for one future day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub pest_type: PestType,
    pub predicted: u32,
    pub lower_bound: u32,
    pub upper_bound: u32,
    /// Percentage; never increases with the horizon
    pub confidence: u32,
}

impl ForecastPoint {
    pub fn brackets_prediction(&self) -> bool {
        self.lower_bound <= self.predicted && self.predicted <= self.upper_bound
    }
}
