//! Shared types and models for the Pest.i monitoring platform
//!
//! This crate contains the observation data model together with the pure
//! filtering and KPI functions used by the backend and, via WASM, the
//! dashboard itself.

pub mod filter;
pub mod kpi;
pub mod models;
pub mod types;
pub mod validation;

pub use filter::*;
pub use kpi::*;
pub use models::*;
pub use types::*;
pub use validation::*;
