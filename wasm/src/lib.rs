//! WebAssembly module for the Pest.i dashboard
//!
//! Provides client-side computation for:
//! - Observation filtering
//! - KPI aggregation
//! - Threshold classification
//! - Season lookup

use chrono::NaiveDate;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::{FilterSpec, KpiMetrics, Observation, Season, ThresholdStatus};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("pest-monitor wasm ready"));
}

fn to_js_error(message: String) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&message));
    js_sys::Error::new(&message).into()
}

fn parse_observations(observations_json: &str) -> Result<Vec<Observation>, String> {
    serde_json::from_str(observations_json)
        .map_err(|e| format!("Invalid observations JSON: {}", e))
}

fn filter_json(observations_json: &str, filter_json: &str) -> Result<String, String> {
    let observations = parse_observations(observations_json)?;
    let filter: FilterSpec =
        serde_json::from_str(filter_json).map_err(|e| format!("Invalid filter JSON: {}", e))?;
    if let Some(range) = &filter.date_range {
        shared::validate_date_range(range)?;
    }

    let filtered = shared::filter_observations(&observations, &filter);
    serde_json::to_string(&filtered).map_err(|e| e.to_string())
}

fn kpis_json(observations_json: &str) -> Result<String, String> {
    let observations = parse_observations(observations_json)?;
    let kpis = shared::calculate_kpis(&observations);
    serde_json::to_string(&kpis).map_err(|e| e.to_string())
}

fn season_of(date: &str) -> Result<Season, String> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date {:?}: {}", date, e))?;
    Ok(Season::from_date(date))
}

/// Filter a JSON array of observations with a JSON filter, returning the
/// matching observations as JSON
#[wasm_bindgen]
pub fn filter_observations(observations_json: &str, filter: &str) -> Result<String, JsValue> {
    filter_json(observations_json, filter).map_err(to_js_error)
}

/// Compute KPI metrics over a JSON array of observations
#[wasm_bindgen]
pub fn calculate_kpis(observations_json: &str) -> Result<String, JsValue> {
    kpis_json(observations_json).map_err(to_js_error)
}

/// Threshold status label for a pest count
#[wasm_bindgen]
pub fn classify_threshold_status(count: u32) -> String {
    shared::classify_threshold(count).status().to_string()
}

/// Whether a pest count is at or above the economic threshold
#[wasm_bindgen]
pub fn is_above_threshold(count: u32) -> bool {
    shared::classify_threshold(count).above_threshold
}

/// Season ("Wet" or "Dry") for an ISO date
#[wasm_bindgen]
pub fn season_for_date(date: &str) -> Result<String, JsValue> {
    season_of(date)
        .map(|season| season.to_string())
        .map_err(to_js_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OBSERVATIONS: &str = r#"[
        {"id":"OBS-0001","date":"2025-03-02","pestType":"Black Rice Bug","count":3,"threshold":5,
         "aboveThreshold":false,"season":"Dry","fieldStage":"Seedling","actionTaken":false},
        {"id":"OBS-0002","date":"2025-07-14","pestType":"Black Rice Bug","count":12,"threshold":10,
         "aboveThreshold":true,"season":"Wet","fieldStage":"Reproductive","actionTaken":true,
         "actionDate":"2025-07-14"}
    ]"#;

    #[test]
    fn test_classify_threshold_status() {
        assert_eq!(classify_threshold_status(0), "Below Threshold");
        assert_eq!(classify_threshold_status(4), "Below Threshold");
        assert_eq!(classify_threshold_status(5), "Economic Threshold");
        assert_eq!(classify_threshold_status(10), "Economic Damage");
        assert!(!is_above_threshold(4));
        assert!(is_above_threshold(5));
    }

    #[test]
    fn test_season_of() {
        assert_eq!(season_of("2025-05-01").unwrap(), Season::Wet);
        assert_eq!(season_of("2025-10-31").unwrap(), Season::Wet);
        assert_eq!(season_of("2025-11-01").unwrap(), Season::Dry);
        assert!(season_of("2025-13-01").is_err());
    }

    #[test]
    fn test_filter_json() {
        let out = filter_json(OBSERVATIONS, r#"{"season":"Wet"}"#).unwrap();
        let filtered: Vec<Observation> = serde_json::from_str(&out).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "OBS-0002");

        let out = filter_json(OBSERVATIONS, r#"{"season":"All"}"#).unwrap();
        let filtered: Vec<Observation> = serde_json::from_str(&out).unwrap();
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_filter_json_rejects_bad_input() {
        assert!(filter_json("not json", "{}").is_err());
        assert!(filter_json(
            OBSERVATIONS,
            r#"{"dateRange":{"start":"2025-08-01","end":"2025-07-01"}}"#
        )
        .is_err());
    }

    #[test]
    fn test_kpis_json() {
        let out = kpis_json(OBSERVATIONS).unwrap();
        let kpis: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(kpis["totalObservations"], 2);
        assert_eq!(kpis["averagePestCount"], 7.5);
        assert_eq!(kpis["percentAboveThreshold"], 50.0);
        assert_eq!(kpis["currentFieldStage"], "Reproductive");

        let empty: serde_json::Value = serde_json::from_str(&kpis_json("[]").unwrap()).unwrap();
        assert_eq!(empty["mostAffectedStage"], "N/A");
    }
}
