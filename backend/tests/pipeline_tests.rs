//! Observation pipeline integration tests
//!
//! Tests for the generate -> filter -> aggregate pipeline including:
//! - Generated observation window and classification table
//! - Forecast bounds and confidence decay
//! - Filter sub-selection
//! - Cache identity of the data provider

use chrono::{Duration, Months, NaiveDate};
use pest_monitor::services::mock_forecast::generate_forecast;
use pest_monitor::services::mock_observations::generate_observations;
use pest_monitor::services::random::{seeded_rng, ScriptedRandom};
use pest_monitor::services::DataProvider;
use proptest::prelude::*;
use shared::*;
use std::sync::Arc;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Two calls return the same collection object
    #[test]
    fn test_provider_returns_same_collection() {
        let provider = DataProvider::with_random(today(), seeded_rng(Some(5)));
        let first = provider.observations();
        let second = provider.observations();
        assert!(Arc::ptr_eq(&first, &second));
    }

    /// The async shim resolves to the cached collection
    #[test]
    fn test_async_observations_match_sync() {
        let provider = DataProvider::with_random(today(), seeded_rng(Some(5)));
        let from_async = tokio_test::block_on(provider.observations_async());
        assert!(Arc::ptr_eq(&from_async, &provider.observations()));
    }

    /// Same seed, same history
    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate_observations(today(), &mut seeded_rng(Some(99)));
        let b = generate_observations(today(), &mut seeded_rng(Some(99)));
        assert_eq!(a, b);
    }

    /// Filtering by pest type keeps matching entries in order
    #[test]
    fn test_pest_type_filter_preserves_order() {
        let observations = generate_observations(today(), &mut seeded_rng(Some(3)));
        let spec = FilterSpec::default().with_pest_type(PestType::BlackRiceBug);
        let filtered = filter_observations(&observations, &spec);
        assert_eq!(filtered, observations);
    }

    /// KPIs over a filtered year count only that year
    #[test]
    fn test_pipeline_kpis_for_one_year() {
        let observations = generate_observations(today(), &mut seeded_rng(Some(8)));
        let spec = FilterSpec::default().with_year(2026);
        let filtered = filter_observations(&observations, &spec);
        let kpis = calculate_kpis(&filtered);

        assert_eq!(kpis.total_observations, filtered.len());
        assert!(kpis.total_observations > 0);
        assert!(kpis.percent_above_threshold <= 100.0);
        assert!(kpis.action_rate <= 100.0);
        assert_ne!(kpis.current_field_stage, "N/A");
    }

    /// The newest record is today's and is the current stage
    #[test]
    fn test_current_stage_comes_from_today() {
        let observations = generate_observations(today(), &mut ScriptedRandom::constant(0.5));
        let kpis = calculate_kpis(&observations);
        let todays = observations.iter().find(|o| o.date == today()).unwrap();
        assert_eq!(kpis.current_field_stage, todays.field_stage.to_string());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn stage_strategy() -> impl Strategy<Value = FieldStage> {
        prop::sample::select(FieldStage::ALL.to_vec())
    }

    fn spec_strategy() -> impl Strategy<Value = FilterSpec> {
        (
            prop::option::of(2024i32..=2026),
            prop::option::of(prop::sample::select(Season::ALL.to_vec())),
            prop::option::of(stage_strategy()),
            prop::option::of((0i64..730, 0i64..120)),
            prop::option::of(any::<bool>()),
            prop::option::of(any::<bool>()),
        )
            .prop_map(|(year, season, stage, range, above, taken)| {
                let mut spec = FilterSpec::default();
                spec.year = year;
                spec.season = season.map(Selection::Only);
                spec.field_stage = stage.map(Selection::Only);
                spec.date_range = range.map(|(back, len)| {
                    let start = today() - Duration::days(back);
                    DateRange::new(start, start + Duration::days(len))
                });
                spec.threshold_status = above.map(|a| {
                    Selection::Only(if a { ThresholdFilter::Above } else { ThresholdFilter::Below })
                });
                spec.action_status = taken.map(|t| {
                    Selection::Only(if t { ActionFilter::Taken } else { ActionFilter::NotTaken })
                });
                spec
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Every generated date falls within the two-year window
        #[test]
        fn prop_dates_within_window(seed in any::<u64>()) {
            let start = today().checked_sub_months(Months::new(24)).unwrap();
            let observations = generate_observations(today(), &mut seeded_rng(Some(seed)));
            for obs in &observations {
                prop_assert!(obs.date >= start && obs.date <= today());
            }
            prop_assert!(observations.windows(2).all(|w| w[0].date <= w[1].date));
        }

        /// Threshold pairing follows the classification table
        #[test]
        fn prop_classification_table(seed in any::<u64>()) {
            let observations = generate_observations(today(), &mut seeded_rng(Some(seed)));
            for obs in &observations {
                match obs.count {
                    0..=4 => prop_assert!(obs.threshold == 5 && !obs.above_threshold),
                    5..=9 => prop_assert!(obs.threshold == 5 && obs.above_threshold),
                    _ => prop_assert!(obs.threshold == 10 && obs.above_threshold),
                }
                prop_assert!(obs.count <= 25);
                prop_assert!(validate_observation(obs).is_ok());
            }
        }

        /// The last seven days each have at least one record
        #[test]
        fn prop_recent_days_backfilled(seed in any::<u64>()) {
            let observations = generate_observations(today(), &mut seeded_rng(Some(seed)));
            for days_back in 0..7 {
                let date = today() - Duration::days(days_back);
                prop_assert!(observations.iter().any(|o| o.date == date));
            }
        }

        /// Forecast bounds bracket the prediction and confidence never rises
        #[test]
        fn prop_forecast_bounds(seed in any::<u64>()) {
            let forecast = generate_forecast(today(), &mut seeded_rng(Some(seed)));
            prop_assert_eq!(forecast.len(), 30);
            for point in &forecast {
                prop_assert!(point.lower_bound <= point.predicted);
                prop_assert!(point.predicted <= point.upper_bound);
                prop_assert!(point.date > today());
            }
            prop_assert!(forecast.windows(2).all(|w| w[0].confidence >= w[1].confidence));
        }

        /// Filtering only ever sub-selects, and every result matches
        #[test]
        fn prop_filter_is_sub_selection(seed in 0u64..16, spec in spec_strategy()) {
            let observations = generate_observations(today(), &mut seeded_rng(Some(seed)));
            let filtered = filter_observations(&observations, &spec);
            prop_assert!(filtered.len() <= observations.len());
            for obs in &filtered {
                prop_assert!(spec.matches(obs));
            }
            let expected = observations.iter().filter(|o| spec.matches(o)).count();
            prop_assert_eq!(filtered.len(), expected);
        }

        /// Filtering never mutates its input
        #[test]
        fn prop_filter_leaves_input_untouched(spec in spec_strategy()) {
            let observations = generate_observations(today(), &mut seeded_rng(Some(1)));
            let before = observations.clone();
            let _ = filter_observations(&observations, &spec);
            prop_assert_eq!(observations, before);
        }
    }
}
