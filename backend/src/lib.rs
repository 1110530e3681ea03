//! Pest.i monitoring server library
//!
//! Serves the pest observation pipeline (mock data generation, filtering,
//! KPI aggregation) and its supporting dashboard views over HTTP.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;

use services::{DataProvider, NotificationService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub data: Arc<DataProvider>,
    pub notifications: NotificationService,
    pub config: Arc<Config>,
}

impl AppState {
    /// Build state from an existing provider, seeding notifications from
    /// its observations
    pub fn new(data: Arc<DataProvider>, config: Config) -> Self {
        let notifications =
            NotificationService::seeded(&data.observations(), config.data.notification_limit);
        Self {
            data,
            notifications,
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Pest.i Monitoring API v1.0"
}
