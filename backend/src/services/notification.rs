//! Notification service for in-app dashboard notifications
//!
//! Supports:
//! - Seeding notifications from threshold breaches in the observation data
//! - Listing by category, priority and read state
//! - Read / read-all / delete management
//!
//! Notifications live in memory for the life of the process.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use shared::{
    Notification, NotificationCategory, NotificationMetadata, NotificationPriority,
    NotificationType, Observation,
};
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Breach count above which a forecast risk warning is raised
const FORECAST_WARNING_BREACHES: usize = 5;

/// Notification service backed by an in-memory store
#[derive(Clone, Default)]
pub struct NotificationService {
    store: Arc<RwLock<Vec<Notification>>>,
}

/// Options for listing notifications
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub category: Option<NotificationCategory>,
    pub priority: Option<NotificationPriority>,
    pub unread_only: bool,
    pub limit: Option<usize>,
}

fn threshold_alert(obs: &Observation) -> Notification {
    Notification {
        id: Uuid::new_v4(),
        title: "Critical pest threshold exceeded".to_string(),
        message: format!(
            "{} count ({}) surpassed threshold ({}) in {} stage. Immediate action recommended.",
            obs.pest_type, obs.count, obs.threshold, obs.field_stage
        ),
        kind: NotificationType::Alert,
        timestamp: Utc.from_utc_datetime(&obs.date.and_time(NaiveTime::default())),
        read: false,
        priority: NotificationPriority::High,
        category: NotificationCategory::Threshold,
        metadata: Some(NotificationMetadata {
            pest_type: Some(obs.pest_type),
            location: Some(obs.location.clone().unwrap_or_else(|| obs.field_stage.to_string())),
            count: Some(obs.count),
            threshold: Some(obs.threshold),
        }),
    }
}

/// Build the notification feed for a set of observations.
///
/// Threshold alerts cover at most `limit` of the most recent breaches.
pub fn notifications_from_observations(
    observations: &[Observation],
    limit: usize,
    now: DateTime<Utc>,
) -> Vec<Notification> {
    let mut breaches: Vec<&Observation> =
        observations.iter().filter(|obs| obs.above_threshold).collect();
    breaches.sort_by(|a, b| b.date.cmp(&a.date));

    let mut notifications: Vec<Notification> = breaches
        .iter()
        .take(limit)
        .map(|obs| threshold_alert(obs))
        .collect();

    if breaches.len() > FORECAST_WARNING_BREACHES {
        notifications.push(Notification {
            id: Uuid::new_v4(),
            title: "Forecast: Elevated Black Rice Bug risk".to_string(),
            message: "Model projects rising counts over the next 7 days. Prepare interventions."
                .to_string(),
            kind: NotificationType::Warning,
            timestamp: now - Duration::hours(2),
            read: false,
            priority: NotificationPriority::High,
            category: NotificationCategory::Forecast,
            metadata: Some(NotificationMetadata {
                location: Some("Multiple fields".to_string()),
                ..NotificationMetadata::default()
            }),
        });
    }

    let unaddressed = breaches.iter().filter(|obs| !obs.action_taken).count();
    if unaddressed > 0 {
        notifications.push(Notification {
            id: Uuid::new_v4(),
            title: "Inspection required".to_string(),
            message: format!(
                "{} fields need follow-up after threshold breaches.",
                unaddressed
            ),
            kind: NotificationType::Warning,
            timestamp: now - Duration::hours(4),
            read: false,
            priority: NotificationPriority::Medium,
            category: NotificationCategory::ActionRequired,
            metadata: None,
        });
    }

    notifications.push(Notification {
        id: Uuid::new_v4(),
        title: "System sync complete".to_string(),
        message: "Latest observations synchronized from field devices.".to_string(),
        kind: NotificationType::Info,
        timestamp: now - Duration::days(1),
        read: true,
        priority: NotificationPriority::Low,
        category: NotificationCategory::System,
        metadata: None,
    });

    notifications.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    notifications
}

impl NotificationService {
    pub fn new(notifications: Vec<Notification>) -> Self {
        Self {
            store: Arc::new(RwLock::new(notifications)),
        }
    }

    /// Seed the store from the observation data
    pub fn seeded(observations: &[Observation], limit: usize) -> Self {
        let notifications = notifications_from_observations(observations, limit, Utc::now());
        tracing::info!(count = notifications.len(), "Seeded notifications");
        Self::new(notifications)
    }

    /// List notifications, newest first
    pub fn list(&self, options: &ListOptions) -> Vec<Notification> {
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        let mut notifications: Vec<Notification> = store
            .iter()
            .filter(|n| options.category.map_or(true, |c| n.category == c))
            .filter(|n| options.priority.map_or(true, |p| n.priority == p))
            .filter(|n| !options.unread_only || !n.read)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if let Some(limit) = options.limit {
            notifications.truncate(limit);
        }
        notifications
    }

    pub fn unread_count(&self) -> usize {
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        store.iter().filter(|n| !n.read).count()
    }

    /// Mark a notification as read
    pub fn mark_as_read(&self, id: Uuid) -> AppResult<Notification> {
        let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
        let notification = store
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| AppError::NotFound("Notification".to_string()))?;
        notification.read = true;
        Ok(notification.clone())
    }

    /// Mark every notification as read, returning how many changed
    pub fn mark_all_as_read(&self) -> usize {
        let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
        let mut changed = 0;
        for notification in store.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            changed += 1;
        }
        changed
    }

    pub fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
        let index = store
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| AppError::NotFound("Notification".to_string()))?;
        store.remove(index);
        tracing::debug!(%id, "Deleted notification");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::{classify_threshold, FieldStage, PestType, Season};

    fn obs(day: u32, count: u32, action: bool) -> Observation {
        let date = NaiveDate::from_ymd_opt(2026, 9, day).unwrap();
        let class = classify_threshold(count);
        Observation {
            id: Observation::format_id(day as usize),
            date,
            pest_type: PestType::BlackRiceBug,
            count,
            threshold: class.threshold,
            above_threshold: class.above_threshold,
            season: Season::Wet,
            field_stage: FieldStage::Vegetative,
            location: None,
            action_taken: action,
            action_type: None,
            action_date: action.then_some(date),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_feed_from_few_breaches() {
        let data = [obs(1, 2, false), obs(2, 12, true), obs(3, 7, false)];
        let feed = notifications_from_observations(&data, 10, now());

        let categories: Vec<_> = feed.iter().map(|n| n.category).collect();
        assert_eq!(
            categories,
            [
                NotificationCategory::ActionRequired,
                NotificationCategory::System,
                NotificationCategory::Threshold,
                NotificationCategory::Threshold,
            ]
        );
        assert_eq!(feed[0].message, "1 fields need follow-up after threshold breaches.");
        assert_eq!(
            feed[2].message,
            "Black Rice Bug count (7) surpassed threshold (5) in Vegetative stage. Immediate action recommended."
        );
    }

    #[test]
    fn test_forecast_warning_after_many_breaches() {
        let data: Vec<_> = (1..=8).map(|day| obs(day, 15, true)).collect();
        let feed = notifications_from_observations(&data, 3, now());

        let thresholds = feed
            .iter()
            .filter(|n| n.category == NotificationCategory::Threshold)
            .count();
        assert_eq!(thresholds, 3);
        assert!(feed.iter().any(|n| n.category == NotificationCategory::Forecast));
        assert!(!feed.iter().any(|n| n.category == NotificationCategory::ActionRequired));
    }

    #[test]
    fn test_read_management() {
        let service = NotificationService::new(notifications_from_observations(
            &[obs(1, 9, false), obs(2, 11, false)],
            10,
            now(),
        ));
        assert_eq!(service.unread_count(), 3);

        let first = service.list(&ListOptions::default())[0].id;
        assert!(service.mark_as_read(first).unwrap().read);
        assert_eq!(service.unread_count(), 2);

        assert_eq!(service.mark_all_as_read(), 2);
        assert_eq!(service.unread_count(), 0);
        assert!(service.list(&ListOptions { unread_only: true, ..Default::default() }).is_empty());
    }

    #[test]
    fn test_delete_and_missing_ids() {
        let service = NotificationService::new(notifications_from_observations(&[], 10, now()));
        let all = service.list(&ListOptions::default());
        assert_eq!(all.len(), 1);

        service.delete(all[0].id).unwrap();
        assert!(service.list(&ListOptions::default()).is_empty());
        assert!(matches!(service.delete(all[0].id), Err(AppError::NotFound(_))));
        assert!(matches!(service.mark_as_read(Uuid::new_v4()), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_list_by_category_and_limit() {
        let data: Vec<_> = (1..=4).map(|day| obs(day, 6, false)).collect();
        let service = NotificationService::new(notifications_from_observations(&data, 10, now()));

        let options = ListOptions {
            category: Some(NotificationCategory::Threshold),
            limit: Some(2),
            ..Default::default()
        };
        let listed = service.list(&options);
        assert_eq!(listed.len(), 2);
        assert!(listed[0].timestamp >= listed[1].timestamp);
        assert!(listed.iter().all(|n| n.category == NotificationCategory::Threshold));
    }

    #[test]
    fn test_list_by_priority() {
        let data: Vec<_> = (1..=3).map(|day| obs(day, 8, false)).collect();
        let service = NotificationService::new(notifications_from_observations(&data, 10, now()));

        let by_priority = |priority| {
            service.list(&ListOptions {
                priority: Some(priority),
                ..Default::default()
            })
        };
        let high = by_priority(NotificationPriority::High);
        assert_eq!(high.len(), 3);
        assert!(high.iter().all(|n| n.category == NotificationCategory::Threshold));

        let medium = by_priority(NotificationPriority::Medium);
        assert_eq!(medium.len(), 1);
        assert_eq!(medium[0].category, NotificationCategory::ActionRequired);

        let low = by_priority(NotificationPriority::Low);
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].category, NotificationCategory::System);

        assert_eq!(service.list(&ListOptions::default()).len(), 5);
    }
}
