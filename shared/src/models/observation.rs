//! Pest observation models

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::ParseError;

/// Pest species tracked by the platform
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PestType {
    #[serde(rename = "Black Rice Bug")]
    BlackRiceBug,
}

impl PestType {
    pub const ALL: [PestType; 1] = [PestType::BlackRiceBug];

    pub fn as_str(&self) -> &'static str {
        match self {
            PestType::BlackRiceBug => "Black Rice Bug",
        }
    }
}

impl std::fmt::Display for PestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PestType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Black Rice Bug" | "RBB" => Ok(PestType::BlackRiceBug),
            other => Err(ParseError::new("pest type", other)),
        }
    }
}

/// Growing season
///
/// Dry: November to April. Wet: May to October.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Season {
    Dry,
    Wet,
}

impl Season {
    pub const ALL: [Season; 2] = [Season::Dry, Season::Wet];

    /// Derive the season from the calendar month of `date`
    pub fn from_date(date: NaiveDate) -> Self {
        if (5..=10).contains(&date.month()) {
            Season::Wet
        } else {
            Season::Dry
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Dry => "Dry",
            Season::Wet => "Wet",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Dry" => Ok(Season::Dry),
            "Wet" => Ok(Season::Wet),
            other => Err(ParseError::new("season", other)),
        }
    }
}

/// Crop growth stage of the field at observation time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldStage {
    Seedling,
    Vegetative,
    Reproductive,
    Ripening,
    Harvest,
    Fallow,
    #[serde(rename = "Land Prep")]
    LandPrep,
    Nursery,
}

impl FieldStage {
    /// All stages, in the order used for weighted sampling
    pub const ALL: [FieldStage; 8] = [
        FieldStage::Seedling,
        FieldStage::Vegetative,
        FieldStage::Reproductive,
        FieldStage::Ripening,
        FieldStage::Harvest,
        FieldStage::Fallow,
        FieldStage::LandPrep,
        FieldStage::Nursery,
    ];

    /// Relative frequency of each stage in [`FieldStage::ALL`] order
    pub const WEIGHTS: [f64; 8] = [0.05, 0.25, 0.25, 0.20, 0.10, 0.05, 0.05, 0.05];

    /// Pick a stage from a uniform draw in `[0, 1)` by cumulative weight.
    ///
    /// Falls back to the last stage when rounding leaves the draw unmatched.
    pub fn from_weighted_draw(draw: f64) -> Self {
        let mut cumulative = 0.0;
        for (stage, weight) in Self::ALL.iter().zip(Self::WEIGHTS) {
            cumulative += weight;
            if draw <= cumulative {
                return *stage;
            }
        }
        Self::ALL[Self::ALL.len() - 1]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldStage::Seedling => "Seedling",
            FieldStage::Vegetative => "Vegetative",
            FieldStage::Reproductive => "Reproductive",
            FieldStage::Ripening => "Ripening",
            FieldStage::Harvest => "Harvest",
            FieldStage::Fallow => "Fallow",
            FieldStage::LandPrep => "Land Prep",
            FieldStage::Nursery => "Nursery",
        }
    }
}

impl std::fmt::Display for FieldStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldStage {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| ParseError::new("field stage", s))
    }
}

/// Economic threshold classification of a pest count
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ThresholdStatus {
    #[serde(rename = "Below Threshold")]
    BelowThreshold,
    #[serde(rename = "Economic Threshold")]
    EconomicThreshold,
    #[serde(rename = "Economic Damage")]
    EconomicDamage,
}

impl ThresholdStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThresholdStatus::BelowThreshold => "Below Threshold",
            ThresholdStatus::EconomicThreshold => "Economic Threshold",
            ThresholdStatus::EconomicDamage => "Economic Damage",
        }
    }
}

impl std::fmt::Display for ThresholdStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Threshold in force for a count and whether the count exceeds it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdClassification {
    pub threshold: u32,
    pub above_threshold: bool,
}

impl ThresholdClassification {
    pub fn status(&self) -> ThresholdStatus {
        if !self.above_threshold {
            ThresholdStatus::BelowThreshold
        } else if self.threshold >= ECONOMIC_DAMAGE_THRESHOLD {
            ThresholdStatus::EconomicDamage
        } else {
            ThresholdStatus::EconomicThreshold
        }
    }
}

/// Count at which the economic threshold is reached
pub const ECONOMIC_THRESHOLD: u32 = 5;

/// Count at which economic damage is assumed
pub const ECONOMIC_DAMAGE_THRESHOLD: u32 = 10;

/// Classify a pest count against the economic thresholds
pub fn classify_threshold(count: u32) -> ThresholdClassification {
    match count {
        0..=4 => ThresholdClassification {
            threshold: ECONOMIC_THRESHOLD,
            above_threshold: false,
        },
        5..=9 => ThresholdClassification {
            threshold: ECONOMIC_THRESHOLD,
            above_threshold: true,
        },
        _ => ThresholdClassification {
            threshold: ECONOMIC_DAMAGE_THRESHOLD,
            above_threshold: true,
        },
    }
}

/// A single field inspection record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub id: String,
    pub date: NaiveDate,
    pub pest_type: PestType,
    pub count: u32,
    /// Threshold in force when the record was created
    pub threshold: u32,
    /// Stored at creation; not recomputed from `count`
    pub above_threshold: bool,
    pub season: Season,
    pub field_stage: FieldStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub action_taken: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_date: Option<NaiveDate>,
}

impl Observation {
    /// Format an insertion sequence number as an observation id
    pub fn format_id(sequence: usize) -> String {
        format!("OBS-{:04}", sequence)
    }

    pub fn threshold_status(&self) -> ThresholdStatus {
        ThresholdClassification {
            threshold: self.threshold,
            above_threshold: self.above_threshold,
        }
        .status()
    }
}
