//! Validation utilities for the Pest.i monitoring platform
//!
//! The filter and KPI functions do not validate their input; these checks
//! are applied at the boundary before data reaches them.

use crate::models::{classify_threshold, Observation, Season, FORECAST_HORIZON_DAYS};
use crate::types::DateRange;

// ============================================================================
// Query Validations
// ============================================================================

/// Validate that a date range does not end before it starts
pub fn validate_date_range(range: &DateRange) -> Result<(), &'static str> {
    if range.end < range.start {
        return Err("Date range end must not be before its start");
    }
    Ok(())
}

/// Validate a forecast horizon in days
pub fn validate_forecast_horizon(days: u32) -> Result<(), &'static str> {
    if days == 0 || days > FORECAST_HORIZON_DAYS {
        return Err("Forecast horizon must be between 1 and 30 days");
    }
    Ok(())
}

// ============================================================================
// Observation Validations
// ============================================================================

/// Validate the derived fields of a generated observation
pub fn validate_observation(observation: &Observation) -> Result<(), &'static str> {
    let class = classify_threshold(observation.count);
    if observation.threshold != class.threshold
        || observation.above_threshold != class.above_threshold
    {
        return Err("Threshold classification does not match pest count");
    }
    if observation.season != Season::from_date(observation.date) {
        return Err("Season does not match observation month");
    }
    match (observation.action_taken, observation.action_date) {
        (true, Some(date)) if date == observation.date => Ok(()),
        (true, _) => Err("Action date must equal observation date when action was taken"),
        (false, Some(_)) => Err("Action date present without an action"),
        (false, None) => Ok(()),
    }
}
