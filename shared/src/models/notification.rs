//! Notification models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::PestType;
use crate::types::ParseError;

/// Visual severity of a notification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Alert,
    Warning,
    Info,
    Success,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    High,
    Medium,
    Low,
}

impl NotificationPriority {
    pub const ALL: [NotificationPriority; 3] = [
        NotificationPriority::High,
        NotificationPriority::Medium,
        NotificationPriority::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationPriority::High => "high",
            NotificationPriority::Medium => "medium",
            NotificationPriority::Low => "low",
        }
    }
}

impl std::fmt::Display for NotificationPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationPriority {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| ParseError::new("notification priority", s))
    }
}

/// Closed set of notification categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationCategory {
    PestAlert,
    Threshold,
    Forecast,
    System,
    ActionRequired,
}

impl NotificationCategory {
    pub const ALL: [NotificationCategory; 5] = [
        NotificationCategory::PestAlert,
        NotificationCategory::Threshold,
        NotificationCategory::Forecast,
        NotificationCategory::System,
        NotificationCategory::ActionRequired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationCategory::PestAlert => "pest-alert",
            NotificationCategory::Threshold => "threshold",
            NotificationCategory::Forecast => "forecast",
            NotificationCategory::System => "system",
            NotificationCategory::ActionRequired => "action-required",
        }
    }
}

impl std::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationCategory {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ParseError::new("notification category", s))
    }
}

/// Extra context attached to pest-related notifications
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pest_type: Option<PestType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u32>,
}

/// A dashboard notification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    pub priority: NotificationPriority,
    pub category: NotificationCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<NotificationMetadata>,
}
