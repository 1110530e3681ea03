//! Business logic services for the Pest.i monitoring platform

pub mod dashboard;
pub mod data_provider;
pub mod mock_forecast;
pub mod mock_observations;
pub mod notification;
pub mod random;
pub mod reporting;

pub use dashboard::DashboardService;
pub use data_provider::DataProvider;
pub use notification::NotificationService;
pub use reporting::ReportingService;
