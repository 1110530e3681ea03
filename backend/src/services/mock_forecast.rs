//! Mock forecast generator
//!
//! Placeholder for a real forecasting model: a random base level with a
//! sinusoidal wobble and a confidence band that widens with the horizon.

use chrono::{Duration, NaiveDate};
use shared::{ForecastPoint, PestType, FORECAST_HORIZON_DAYS};

use super::random::RandomSource;

/// Forecast the days after `today`, one point per pest type per day
pub fn generate_forecast<R: RandomSource + ?Sized>(
    today: NaiveDate,
    rng: &mut R,
) -> Vec<ForecastPoint> {
    let mut forecast = Vec::with_capacity(FORECAST_HORIZON_DAYS as usize * PestType::ALL.len());

    for day in 1..=FORECAST_HORIZON_DAYS {
        let date = today + Duration::days(i64::from(day));
        let horizon = f64::from(day);

        for pest_type in PestType::ALL {
            let base = f64::from(rng.next_in(5, 15));
            let fluctuation = (horizon / 1.5).sin() * 5.0;
            let predicted = (base + fluctuation).floor().max(0.0);
            // Only the stored confidence is floored; the margin uses the exact decay
            let confidence = 95.0 - horizon * 0.5;
            let margin = (predicted * (1.0 - confidence / 100.0) * 4.0).max(2.0);

            forecast.push(ForecastPoint {
                date,
                pest_type,
                predicted: predicted as u32,
                lower_bound: (predicted - margin).floor().max(0.0) as u32,
                upper_bound: (predicted + margin).floor() as u32,
                confidence: confidence.floor() as u32,
            });
        }
    }

    forecast
}
