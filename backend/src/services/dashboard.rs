//! Dashboard service: filtering, KPIs, threshold views and forecasts over
//! the provider's collections

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use shared::{
    calculate_kpis, filter_observations, validate_date_range, validate_forecast_horizon,
    FieldStage, FilterOptions, FilterSpec, ForecastPoint, KpiMetrics, Observation, PestType,
    Season, ThresholdStatus,
};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::data_provider::DataProvider;
use crate::error::{AppError, AppResult};

/// Window of the threshold status summary, in days before today
const STATUS_WINDOW_DAYS: i64 = 30;

/// Window of the operational recent-alerts list, in days before the range end
const RECENT_ALERT_DAYS: i64 = 7;

const RECENT_ALERT_LIMIT: usize = 10;

/// Dashboard service
#[derive(Clone)]
pub struct DashboardService {
    data: Arc<DataProvider>,
}

/// Observation counts per threshold status
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ThresholdStatusSummary {
    /// Economic Damage
    pub critical: usize,
    /// Economic Threshold
    pub warning: usize,
    /// Below Threshold
    pub normal: usize,
}

impl ThresholdStatusSummary {
    pub fn from_observations<'a, I: IntoIterator<Item = &'a Observation>>(observations: I) -> Self {
        observations
            .into_iter()
            .fold(Self::default(), |mut summary, obs| {
                match obs.threshold_status() {
                    ThresholdStatus::EconomicDamage => summary.critical += 1,
                    ThresholdStatus::EconomicThreshold => summary.warning += 1,
                    ThresholdStatus::BelowThreshold => summary.normal += 1,
                }
                summary
            })
    }
}

/// An intervention recorded against an observation
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdAction {
    pub id: String,
    pub date: NaiveDate,
    pub pest_type: PestType,
    pub count: u32,
    pub threshold: u32,
    pub field_stage: FieldStage,
    pub season: Season,
    pub action_type: String,
    pub status: ThresholdStatus,
}

impl From<&Observation> for ThresholdAction {
    fn from(obs: &Observation) -> Self {
        Self {
            id: format!("action-{}", obs.id),
            date: obs.action_date.unwrap_or(obs.date),
            pest_type: obs.pest_type,
            count: obs.count,
            threshold: obs.threshold,
            field_stage: obs.field_stage,
            season: obs.season,
            action_type: obs
                .action_type
                .clone()
                .unwrap_or_else(|| "Intervention".to_string()),
            status: obs.threshold_status(),
        }
    }
}

/// A recent above-threshold observation
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecentAlert {
    pub id: String,
    pub date: NaiveDate,
    pub pest_type: PestType,
    pub count: u32,
    pub threshold: u32,
    pub field_stage: FieldStage,
    pub status: ThresholdStatus,
}

/// Threshold status, action tracker and recent alerts for a filter
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationalSummary {
    pub threshold_status: ThresholdStatusSummary,
    /// Actions taken per observation date
    pub action_tracker: BTreeMap<NaiveDate, usize>,
    pub recent_alerts: Vec<RecentAlert>,
}

/// Reject filters that can never match because they are malformed
pub fn check_filter(filter: &FilterSpec) -> AppResult<()> {
    if let Some(range) = &filter.date_range {
        validate_date_range(range).map_err(|msg| AppError::validation("dateRange", msg))?;
    }
    Ok(())
}

impl DashboardService {
    pub fn new(data: Arc<DataProvider>) -> Self {
        Self { data }
    }

    /// Observations matching `filter`, oldest first
    pub async fn get_observations(&self, filter: &FilterSpec) -> AppResult<Vec<Observation>> {
        check_filter(filter)?;
        let observations = self.data.observations_async().await;
        let filtered = filter_observations(&observations, filter);
        tracing::debug!(
            total = observations.len(),
            matched = filtered.len(),
            "Filtered observations"
        );
        Ok(filtered)
    }

    /// KPIs over the observations matching `filter`
    pub fn get_kpis(&self, filter: &FilterSpec) -> AppResult<KpiMetrics> {
        check_filter(filter)?;
        let observations = self.data.observations();
        Ok(calculate_kpis(&filter_observations(&observations, filter)))
    }

    /// First `horizon` days of the forecast
    pub fn get_forecast(&self, horizon: u32) -> AppResult<Vec<ForecastPoint>> {
        validate_forecast_horizon(horizon).map_err(|msg| AppError::validation("horizon", msg))?;
        let last = self.data.today() + Duration::days(i64::from(horizon));
        Ok(self
            .data
            .forecast()
            .iter()
            .filter(|point| point.date <= last)
            .cloned()
            .collect())
    }

    /// Filter choices present in the data
    pub fn get_filter_options(&self) -> FilterOptions {
        FilterOptions::from_observations(&self.data.observations(), self.data.today().year())
    }

    /// Threshold status counts over the last 30 days
    pub fn get_threshold_status(&self) -> ThresholdStatusSummary {
        let today = self.data.today();
        let since = today - Duration::days(STATUS_WINDOW_DAYS);
        let observations = self.data.observations();
        ThresholdStatusSummary::from_observations(
            observations
                .iter()
                .filter(|obs| obs.date >= since && obs.date <= today),
        )
    }

    /// Actions taken on observations matching `filter`, newest first
    pub fn get_threshold_actions(&self, filter: &FilterSpec) -> AppResult<Vec<ThresholdAction>> {
        check_filter(filter)?;
        let observations = self.data.observations();
        let mut actions: Vec<ThresholdAction> = observations
            .iter()
            .filter(|obs| obs.action_taken && filter.matches(obs))
            .map(ThresholdAction::from)
            .collect();
        actions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(actions)
    }

    /// Operational view for `filter`; recent alerts are relative to the end
    /// of the filter's date range, or today when there is none
    pub fn get_operational(&self, filter: &FilterSpec) -> AppResult<OperationalSummary> {
        check_filter(filter)?;
        let observations = self.data.observations();
        let filtered = filter_observations(&observations, filter);

        let mut action_tracker = BTreeMap::new();
        for obs in filtered.iter().filter(|obs| obs.action_taken) {
            *action_tracker.entry(obs.date).or_insert(0) += 1;
        }

        let end = filter
            .date_range
            .map(|range| range.end)
            .unwrap_or_else(|| self.data.today());
        let since = end - Duration::days(RECENT_ALERT_DAYS);
        let mut recent: Vec<&Observation> = filtered
            .iter()
            .filter(|obs| obs.above_threshold && obs.date >= since)
            .collect();
        recent.sort_by(|a, b| b.date.cmp(&a.date));

        let recent_alerts = recent
            .into_iter()
            .take(RECENT_ALERT_LIMIT)
            .map(|obs| RecentAlert {
                id: format!("alert-{}", obs.id),
                date: obs.date,
                pest_type: obs.pest_type,
                count: obs.count,
                threshold: obs.threshold,
                field_stage: obs.field_stage,
                status: obs.threshold_status(),
            })
            .collect();

        Ok(OperationalSummary {
            threshold_status: ThresholdStatusSummary::from_observations(&filtered),
            action_tracker,
            recent_alerts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::random::ScriptedRandom;
    use shared::{DateRange, Selection};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn service(draw: f64) -> DashboardService {
        let provider = DataProvider::with_random(today(), ScriptedRandom::constant(draw));
        DashboardService::new(Arc::new(provider))
    }

    #[test]
    fn test_threshold_action_defaults() {
        let obs = Observation {
            id: "OBS-0042".to_string(),
            date: today(),
            pest_type: PestType::BlackRiceBug,
            count: 14,
            threshold: 10,
            above_threshold: true,
            season: Season::Wet,
            field_stage: FieldStage::Ripening,
            location: None,
            action_taken: true,
            action_type: None,
            action_date: None,
        };
        let action = ThresholdAction::from(&obs);
        assert_eq!(action.id, "action-OBS-0042");
        assert_eq!(action.action_type, "Intervention");
        assert_eq!(action.status, ThresholdStatus::EconomicDamage);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let filter = FilterSpec {
            date_range: Some(DateRange::new(today(), today() - Duration::days(1))),
            ..FilterSpec::default()
        };
        assert!(matches!(
            service(0.5).get_kpis(&filter),
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn test_forecast_horizon_slices() {
        let service = service(0.0);
        assert_eq!(service.get_forecast(7).unwrap().len(), 7);
        assert_eq!(service.get_forecast(30).unwrap().len(), 30);
        assert!(service.get_forecast(0).is_err());
        assert!(service.get_forecast(31).is_err());
    }

    #[test]
    fn test_operational_alerts_are_recent_and_capped() {
        // Constant 0.99 draws land in the top count tier: every record is a breach
        let service = service(0.99);
        let filter = FilterSpec {
            season: Some(Selection::All),
            ..FilterSpec::default()
        };
        let summary = service.get_operational(&filter).unwrap();

        assert!(summary.recent_alerts.len() <= RECENT_ALERT_LIMIT);
        assert!(!summary.recent_alerts.is_empty());
        assert!(summary
            .recent_alerts
            .iter()
            .all(|alert| alert.date >= today() - Duration::days(RECENT_ALERT_DAYS)));
        assert_eq!(summary.threshold_status.normal, 0);
    }

    #[test]
    fn test_threshold_status_counts_last_month() {
        let service = service(0.5);
        let summary = service.get_threshold_status();
        let total = summary.critical + summary.warning + summary.normal;
        let expected = service
            .data
            .observations()
            .iter()
            .filter(|obs| obs.date >= today() - Duration::days(STATUS_WINDOW_DAYS))
            .count();
        assert_eq!(total, expected);
    }
}
