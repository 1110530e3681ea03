//! Data provider owning the canonical mock collections
//!
//! Constructed once at startup and shared through application state. Each
//! collection is generated on first access and then handed out as the same
//! `Arc` for the life of the provider.

use chrono::{Local, NaiveDate};
use shared::{ForecastPoint, Observation};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use super::mock_forecast::generate_forecast;
use super::mock_observations::generate_observations;
use super::random::{seeded_rng, RandomSource};

type SharedRandom = Mutex<Box<dyn RandomSource + Send>>;

/// Lazily generated observation and forecast collections
pub struct DataProvider {
    today: NaiveDate,
    rng: SharedRandom,
    observations: OnceLock<Arc<Vec<Observation>>>,
    forecast: OnceLock<Arc<Vec<ForecastPoint>>>,
}

impl DataProvider {
    /// Create a provider anchored at the local date
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_random(Local::now().date_naive(), seeded_rng(seed))
    }

    /// Create a provider with an explicit anchor date and random source
    pub fn with_random<R: RandomSource + Send + 'static>(today: NaiveDate, rng: R) -> Self {
        Self {
            today,
            rng: Mutex::new(Box::new(rng)),
            observations: OnceLock::new(),
            forecast: OnceLock::new(),
        }
    }

    /// Date the collections are generated relative to
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut dyn RandomSource) -> T) -> T {
        let mut guard = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(guard.as_mut())
    }

    /// The observation history; generated once, read-only afterwards
    pub fn observations(&self) -> Arc<Vec<Observation>> {
        self.observations
            .get_or_init(|| {
                let observations = self.with_rng(|rng| generate_observations(self.today, rng));
                tracing::info!(
                    count = observations.len(),
                    today = %self.today,
                    "Generated mock observations"
                );
                Arc::new(observations)
            })
            .clone()
    }

    /// Async wrapper kept for callers that expect a future; never suspends
    pub async fn observations_async(&self) -> Arc<Vec<Observation>> {
        self.observations()
    }

    /// The 30-day forecast; generated once, read-only afterwards
    pub fn forecast(&self) -> Arc<Vec<ForecastPoint>> {
        self.forecast
            .get_or_init(|| {
                let forecast = self.with_rng(|rng| generate_forecast(self.today, rng));
                tracing::info!(count = forecast.len(), "Generated mock forecast");
                Arc::new(forecast)
            })
            .clone()
    }

    /// Sizes of the collections generated so far
    pub fn cached_sizes(&self) -> (Option<usize>, Option<usize>) {
        (
            self.observations.get().map(|o| o.len()),
            self.forecast.get().map(|f| f.len()),
        )
    }
}
