//! HTTP handlers for notification management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use shared::{ApiResponse, Notification, NotificationCategory, NotificationPriority};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::notification::ListOptions;
use crate::AppState;

/// Query parameters for listing notifications
#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    /// A category name, or `all`
    pub category: Option<String>,
    /// `high`, `medium`, `low`, or `all`
    pub priority: Option<String>,
    pub unread_only: Option<bool>,
    pub limit: Option<usize>,
}

/// Unread notification count response
#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub count: usize,
}

/// Mark-all response
#[derive(Debug, Serialize)]
pub struct MarkAllResponse {
    pub updated: usize,
}

/// List notifications
pub async fn get_notifications(
    State(state): State<AppState>,
    Query(query): Query<ListNotificationsQuery>,
) -> AppResult<Json<ApiResponse<Vec<Notification>>>> {
    let category = match query.category.as_deref() {
        None | Some("all") => None,
        Some(name) => Some(name.parse::<NotificationCategory>()?),
    };

    let priority = match query.priority.as_deref() {
        None | Some("all") => None,
        Some(name) => Some(name.parse::<NotificationPriority>()?),
    };

    let options = ListOptions {
        category,
        priority,
        unread_only: query.unread_only.unwrap_or(false),
        limit: query.limit,
    };
    Ok(Json(ApiResponse::ok(state.notifications.list(&options))))
}

/// Get unread notification count
pub async fn get_unread_count(
    State(state): State<AppState>,
) -> Json<ApiResponse<UnreadCountResponse>> {
    let count = state.notifications.unread_count();
    Json(ApiResponse::ok(UnreadCountResponse { count }))
}

/// Mark notification as read
pub async fn mark_as_read(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let notification = state.notifications.mark_as_read(notification_id)?;
    Ok(Json(ApiResponse::ok(notification)))
}

/// Mark all notifications as read
pub async fn mark_all_as_read(
    State(state): State<AppState>,
) -> Json<ApiResponse<MarkAllResponse>> {
    let updated = state.notifications.mark_all_as_read();
    Json(ApiResponse::ok(MarkAllResponse { updated }))
}

/// Delete a notification
pub async fn delete_notification(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.notifications.delete(notification_id)?;
    Ok(StatusCode::NO_CONTENT)
}
