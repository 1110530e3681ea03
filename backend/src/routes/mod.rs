//! Route definitions for the Pest.i monitoring API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/observations", get(handlers::list_observations))
        .route("/filters", get(handlers::get_filter_options))
        .nest("/dashboard", dashboard_routes())
        .nest("/threshold", threshold_routes())
        .nest("/notifications", notification_routes())
        .nest("/reports", report_routes())
}

/// KPI, operational and forecast routes
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/kpi", post(handlers::post_kpis))
        .route("/operational", post(handlers::post_operational))
        .route("/forecast", get(handlers::get_forecast))
}

/// Threshold status and action routes
fn threshold_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(handlers::get_threshold_status))
        .route(
            "/actions",
            get(handlers::get_threshold_actions).post(handlers::post_threshold_actions),
        )
}

/// Notification management routes
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_notifications))
        .route("/unread-count", get(handlers::get_unread_count))
        .route("/read-all", post(handlers::mark_all_as_read))
        .route("/:notification_id/read", post(handlers::mark_as_read))
        .route(
            "/:notification_id",
            axum::routing::delete(handlers::delete_notification),
        )
}

/// Export routes
fn report_routes() -> Router<AppState> {
    Router::new().route("/observations.csv", get(handlers::export_observations))
}
