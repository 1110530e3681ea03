//! Mock observation generator
//!
//! Synthesizes two years of Black Rice Bug observations with roughly two to
//! three inspections per week. The shape of the series (dates, spacing,
//! backfilled recent days) is fixed; the values come from the random source.

use chrono::{Duration, Months, NaiveDate};
use shared::{classify_threshold, FieldStage, Observation, PestType, Season};
use std::collections::HashSet;

use super::random::RandomSource;

/// Length of the generated history
const HISTORY_MONTHS: u32 = 24;

/// Average observations per calendar day
const OBSERVATIONS_PER_DAY: f64 = 0.3;

/// Maximum perturbation applied to an evenly spaced date, in days
const DATE_JITTER_DAYS: u32 = 3;

/// Number of most recent days (today included) guaranteed to have data
pub const BACKFILL_DAYS: i64 = 7;

/// Pest count drawn from a four-tier mixture skewed toward low counts
fn sample_pest_count<R: RandomSource + ?Sized>(rng: &mut R) -> u32 {
    let tier = rng.next_f64();
    if tier < 0.5 {
        rng.next_in(0, 6)
    } else if tier < 0.8 {
        rng.next_in(5, 8)
    } else if tier < 0.95 {
        rng.next_in(12, 9)
    } else {
        rng.next_in(20, 6)
    }
}

/// Probability that an action follows an observation
fn action_probability(above_threshold: bool) -> f64 {
    if above_threshold {
        0.70
    } else {
        0.15
    }
}

/// Sample every value-bearing field of an observation for `date`
fn sample_observation<R: RandomSource + ?Sized>(
    sequence: usize,
    date: NaiveDate,
    rng: &mut R,
) -> Observation {
    let count = sample_pest_count(rng);
    let class = classify_threshold(count);
    let action_taken = rng.chance(action_probability(class.above_threshold));
    let field_stage = FieldStage::from_weighted_draw(rng.next_f64());

    Observation {
        id: Observation::format_id(sequence),
        date,
        pest_type: PestType::BlackRiceBug,
        count,
        threshold: class.threshold,
        above_threshold: class.above_threshold,
        season: Season::from_date(date),
        field_stage,
        location: None,
        action_taken,
        action_type: None,
        action_date: action_taken.then_some(date),
    }
}

/// Generate the observation history ending at `today`, sorted by date.
///
/// Candidates perturbed outside `[today - 2 years, today]` are dropped, so
/// the result may hold slightly fewer records than the target. Each of the
/// last [`BACKFILL_DAYS`] days without a record gets one synthesized entry;
/// its id continues the insertion sequence and does not reflect its
/// position after sorting.
pub fn generate_observations<R: RandomSource + ?Sized>(
    today: NaiveDate,
    rng: &mut R,
) -> Vec<Observation> {
    let start = today
        .checked_sub_months(Months::new(HISTORY_MONTHS))
        .unwrap_or(today);
    let total_days = (today - start).num_days();
    let target = (total_days as f64 * OBSERVATIONS_PER_DAY).floor() as i64;

    let mut observations: Vec<Observation> = Vec::with_capacity(target.max(0) as usize);

    for i in 0..target {
        let offset = ((i as f64 / target as f64) * total_days as f64).floor() as i64;
        let jitter =
            i64::from(rng.next_in(0, 2 * DATE_JITTER_DAYS + 1)) - i64::from(DATE_JITTER_DAYS);
        let date = start + Duration::days(offset + jitter);

        if date > today || date < start {
            continue;
        }

        let sequence = observations.len() + 1;
        observations.push(sample_observation(sequence, date, rng));
    }

    observations.sort_by_key(|obs| obs.date);

    let existing: HashSet<NaiveDate> = observations.iter().map(|obs| obs.date).collect();
    for days_back in (0..BACKFILL_DAYS).rev() {
        let date = today - Duration::days(days_back);
        if !existing.contains(&date) {
            let sequence = observations.len() + 1;
            observations.push(sample_observation(sequence, date, rng));
        }
    }

    observations.sort_by_key(|obs| obs.date);
    observations
}
