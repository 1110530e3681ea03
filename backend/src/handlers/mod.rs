//! HTTP handlers for the Pest.i monitoring API

pub mod dashboard;
pub mod health;
pub mod notification;
pub mod observations;
pub mod reporting;

pub use dashboard::*;
pub use health::*;
pub use notification::*;
pub use observations::*;
pub use reporting::*;
