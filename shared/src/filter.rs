//! Observation filtering
//!
//! A [`FilterSpec`] is a set of optional criteria. Each criterion that is
//! absent or set to `"All"` places no constraint on its dimension; the
//! remaining criteria are combined with AND.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt::Display;
use std::str::FromStr;

use crate::models::{FieldStage, Observation, PestType, Season};
use crate::types::{DateRange, ParseError};

/// Sentinel accepted on every categorical filter
pub const ALL_SENTINEL: &str = "All";

/// Either every value or exactly one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T: Copy> Selection<T> {
    pub fn only(&self) -> Option<T> {
        match self {
            Selection::All => None,
            Selection::Only(value) => Some(*value),
        }
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_SENTINEL {
            Ok(Selection::All)
        } else {
            s.parse().map(Selection::Only)
        }
    }
}

impl<T: Display> Display for Selection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selection::All => f.write_str(ALL_SENTINEL),
            Selection::Only(value) => value.fmt(f),
        }
    }
}

impl<T: Display> Serialize for Selection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T> Deserialize<'de> for Selection<T>
where
    T: FromStr,
    T::Err: Display,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Threshold status criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdFilter {
    Above,
    Below,
}

impl Display for ThresholdFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThresholdFilter::Above => f.write_str("Above"),
            ThresholdFilter::Below => f.write_str("Below"),
        }
    }
}

impl FromStr for ThresholdFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Above" => Ok(ThresholdFilter::Above),
            "Below" => Ok(ThresholdFilter::Below),
            other => Err(ParseError::new("threshold status", other)),
        }
    }
}

/// Action status criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionFilter {
    Taken,
    NotTaken,
}

impl ActionFilter {
    fn as_str(&self) -> &'static str {
        match self {
            ActionFilter::Taken => "Taken",
            ActionFilter::NotTaken => "Not Taken",
        }
    }
}

impl Display for ActionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Taken" => Ok(ActionFilter::Taken),
            "Not Taken" => Ok(ActionFilter::NotTaken),
            other => Err(ParseError::new("action status", other)),
        }
    }
}

/// Filter criteria for an observation query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSpec {
    pub year: Option<i32>,
    pub season: Option<Selection<Season>>,
    pub field_stage: Option<Selection<FieldStage>>,
    pub pest_type: Option<Selection<PestType>>,
    pub date_range: Option<DateRange>,
    pub threshold_status: Option<Selection<ThresholdFilter>>,
    pub action_status: Option<Selection<ActionFilter>>,
}

fn active<T: Copy>(selection: &Option<Selection<T>>) -> Option<T> {
    selection.as_ref().and_then(Selection::only)
}

impl FilterSpec {
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_season(mut self, season: Season) -> Self {
        self.season = Some(Selection::Only(season));
        self
    }

    pub fn with_field_stage(mut self, stage: FieldStage) -> Self {
        self.field_stage = Some(Selection::Only(stage));
        self
    }

    pub fn with_pest_type(mut self, pest_type: PestType) -> Self {
        self.pest_type = Some(Selection::Only(pest_type));
        self
    }

    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = Some(DateRange::new(start, end));
        self
    }

    pub fn with_threshold_status(mut self, status: ThresholdFilter) -> Self {
        self.threshold_status = Some(Selection::Only(status));
        self
    }

    pub fn with_action_status(mut self, status: ActionFilter) -> Self {
        self.action_status = Some(Selection::Only(status));
        self
    }

    /// True when `observation` satisfies every active criterion
    pub fn matches(&self, observation: &Observation) -> bool {
        if let Some(year) = self.year {
            if observation.date.year() != year {
                return false;
            }
        }
        if let Some(season) = active(&self.season) {
            if observation.season != season {
                return false;
            }
        }
        if let Some(stage) = active(&self.field_stage) {
            if observation.field_stage != stage {
                return false;
            }
        }
        if let Some(pest_type) = active(&self.pest_type) {
            if observation.pest_type != pest_type {
                return false;
            }
        }
        if let Some(range) = &self.date_range {
            if !range.contains(observation.date) {
                return false;
            }
        }
        match active(&self.threshold_status) {
            Some(ThresholdFilter::Above) if !observation.above_threshold => return false,
            Some(ThresholdFilter::Below) if observation.above_threshold => return false,
            _ => {}
        }
        match active(&self.action_status) {
            Some(ActionFilter::Taken) if !observation.action_taken => return false,
            Some(ActionFilter::NotTaken) if observation.action_taken => return false,
            _ => {}
        }
        true
    }
}

/// Select the observations matching `spec`, preserving their order
pub fn filter_observations(observations: &[Observation], spec: &FilterSpec) -> Vec<Observation> {
    observations
        .iter()
        .filter(|observation| spec.matches(observation))
        .cloned()
        .collect()
}

/// Filter choices offered by the dashboard, derived from the data itself
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Newest first
    pub years: Vec<i32>,
    pub seasons: Vec<String>,
    pub field_stages: Vec<String>,
    pub pest_types: Vec<String>,
    pub threshold_statuses: Vec<String>,
    pub action_statuses: Vec<String>,
    pub date_range: Option<DateRange>,
    pub default_year: i32,
}

fn with_all<I: IntoIterator<Item = String>>(values: I) -> Vec<String> {
    std::iter::once(ALL_SENTINEL.to_string()).chain(values).collect()
}

impl FilterOptions {
    /// Collect the distinct values present in `observations`.
    ///
    /// `fallback_year` is the default year when there is no data.
    pub fn from_observations(observations: &[Observation], fallback_year: i32) -> Self {
        let years: BTreeSet<i32> = observations.iter().map(|o| o.date.year()).collect();
        let seasons: BTreeSet<&str> = observations.iter().map(|o| o.season.as_str()).collect();
        let stages: BTreeSet<&str> = observations.iter().map(|o| o.field_stage.as_str()).collect();
        let pests: BTreeSet<&str> = observations.iter().map(|o| o.pest_type.as_str()).collect();
        let statuses: BTreeSet<&str> = observations
            .iter()
            .map(|o| if o.above_threshold { "Above" } else { "Below" })
            .collect();
        let actions: BTreeSet<&str> = observations
            .iter()
            .map(|o| {
                if o.action_taken {
                    ActionFilter::Taken.as_str()
                } else {
                    ActionFilter::NotTaken.as_str()
                }
            })
            .collect();

        let min = observations.iter().map(|o| o.date).min();
        let max = observations.iter().map(|o| o.date).max();
        let years: Vec<i32> = years.into_iter().rev().collect();
        let default_year = years.first().copied().unwrap_or(fallback_year);

        Self {
            years,
            seasons: with_all(seasons.into_iter().map(String::from)),
            field_stages: with_all(stages.into_iter().map(String::from)),
            pest_types: with_all(pests.into_iter().map(String::from)),
            threshold_statuses: with_all(statuses.into_iter().map(String::from)),
            action_statuses: with_all(actions.into_iter().map(String::from)),
            date_range: min.zip(max).map(|(start, end)| DateRange::new(start, end)),
            default_year,
        }
    }
}
