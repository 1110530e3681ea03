//! KPI aggregation over observation collections

use serde::{Deserialize, Serialize};

use crate::models::{FieldStage, Observation};

/// Placeholder shown for stage metrics when there is no data
pub const NOT_AVAILABLE: &str = "N/A";

/// Summary metrics for a set of observations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KpiMetrics {
    pub total_observations: usize,
    pub average_pest_count: f64,
    pub percent_above_threshold: f64,
    pub total_actions_taken: usize,
    pub action_rate: f64,
    pub current_field_stage: String,
    pub most_affected_stage: String,
}

impl KpiMetrics {
    pub fn empty() -> Self {
        Self {
            total_observations: 0,
            average_pest_count: 0.0,
            percent_above_threshold: 0.0,
            total_actions_taken: 0,
            action_rate: 0.0,
            current_field_stage: NOT_AVAILABLE.to_string(),
            most_affected_stage: NOT_AVAILABLE.to_string(),
        }
    }
}

/// Round to one decimal place, halves away from zero
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn percent(part: usize, total: usize) -> f64 {
    part as f64 / total as f64 * 100.0
}

/// Stage of the latest-dated observation; the first one in input order wins a tie
fn current_field_stage(observations: &[Observation]) -> Option<FieldStage> {
    observations
        .iter()
        .fold(None::<&Observation>, |latest, obs| match latest {
            Some(current) if current.date >= obs.date => Some(current),
            _ => Some(obs),
        })
        .map(|obs| obs.field_stage)
}

/// Stage with the largest summed count; the first stage encountered wins a tie
fn most_affected_stage(observations: &[Observation]) -> Option<FieldStage> {
    let mut totals: Vec<(FieldStage, u64)> = Vec::new();
    for obs in observations {
        match totals.iter_mut().find(|(stage, _)| *stage == obs.field_stage) {
            Some((_, total)) => *total += u64::from(obs.count),
            None => totals.push((obs.field_stage, u64::from(obs.count))),
        }
    }

    let mut best: Option<(FieldStage, u64)> = None;
    for (stage, total) in totals {
        if best.map_or(true, |(_, best_total)| total > best_total) {
            best = Some((stage, total));
        }
    }
    best.map(|(stage, _)| stage)
}

/// Reduce a collection of observations to dashboard KPIs
pub fn calculate_kpis(observations: &[Observation]) -> KpiMetrics {
    if observations.is_empty() {
        return KpiMetrics::empty();
    }

    let total = observations.len();
    let total_count: u64 = observations.iter().map(|o| u64::from(o.count)).sum();
    let above = observations.iter().filter(|o| o.above_threshold).count();
    let actions = observations.iter().filter(|o| o.action_taken).count();

    let stage_name = |stage: Option<FieldStage>| {
        stage.map_or_else(|| NOT_AVAILABLE.to_string(), |s| s.to_string())
    };

    KpiMetrics {
        total_observations: total,
        average_pest_count: round_one_decimal(total_count as f64 / total as f64),
        percent_above_threshold: round_one_decimal(percent(above, total)),
        total_actions_taken: actions,
        action_rate: round_one_decimal(percent(actions, total)),
        current_field_stage: stage_name(current_field_stage(observations)),
        most_affected_stage: stage_name(most_affected_stage(observations)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PestType, Season};
    use chrono::NaiveDate;

    fn obs(
        day: u32,
        count: u32,
        threshold: u32,
        above: bool,
        action: bool,
        stage: FieldStage,
    ) -> Observation {
        let date = NaiveDate::from_ymd_opt(2025, 7, day).unwrap();
        Observation {
            id: Observation::format_id(day as usize),
            date,
            pest_type: PestType::BlackRiceBug,
            count,
            threshold,
            above_threshold: above,
            season: Season::Wet,
            field_stage: stage,
            location: None,
            action_taken: action,
            action_type: None,
            action_date: action.then_some(date),
        }
    }

    #[test]
    fn test_empty_collection_sentinel() {
        let kpis = calculate_kpis(&[]);
        assert_eq!(kpis.total_observations, 0);
        assert_eq!(kpis.average_pest_count, 0.0);
        assert_eq!(kpis.percent_above_threshold, 0.0);
        assert_eq!(kpis.total_actions_taken, 0);
        assert_eq!(kpis.action_rate, 0.0);
        assert_eq!(kpis.current_field_stage, "N/A");
        assert_eq!(kpis.most_affected_stage, "N/A");
    }

    #[test]
    fn test_two_observation_scenario() {
        let data = [
            obs(1, 60, 50, true, true, FieldStage::Vegetative),
            obs(2, 25, 40, false, false, FieldStage::Ripening),
        ];
        let kpis = calculate_kpis(&data);
        assert_eq!(kpis.total_observations, 2);
        assert_eq!(kpis.average_pest_count, 42.5);
        assert_eq!(kpis.percent_above_threshold, 50.0);
        assert_eq!(kpis.total_actions_taken, 1);
        assert_eq!(kpis.action_rate, 50.0);
        assert_eq!(kpis.current_field_stage, "Ripening");
        assert_eq!(kpis.most_affected_stage, "Vegetative");
    }

    #[test]
    fn test_rounding_to_one_decimal() {
        // 1/3 above threshold -> 33.333...
        let data = [
            obs(1, 1, 5, false, false, FieldStage::Seedling),
            obs(2, 2, 5, false, false, FieldStage::Seedling),
            obs(3, 6, 5, true, false, FieldStage::Seedling),
        ];
        let kpis = calculate_kpis(&data);
        assert_eq!(kpis.average_pest_count, 3.0);
        assert_eq!(kpis.percent_above_threshold, 33.3);
        assert_eq!(round_one_decimal(2.25), 2.3);
        assert_eq!(round_one_decimal(66.666), 66.7);
    }

    #[test]
    fn test_current_stage_tie_takes_first_in_input_order() {
        let data = [
            obs(3, 1, 5, false, false, FieldStage::Harvest),
            obs(9, 1, 5, false, false, FieldStage::Fallow),
            obs(9, 1, 5, false, false, FieldStage::Nursery),
            obs(4, 1, 5, false, false, FieldStage::Seedling),
        ];
        assert_eq!(calculate_kpis(&data).current_field_stage, "Fallow");
    }

    #[test]
    fn test_most_affected_tie_takes_first_stage_encountered() {
        let data = [
            obs(1, 4, 5, false, false, FieldStage::LandPrep),
            obs(2, 3, 5, false, false, FieldStage::Harvest),
            obs(3, 1, 5, false, false, FieldStage::Harvest),
        ];
        assert_eq!(calculate_kpis(&data).most_affected_stage, "Land Prep");
    }
}
