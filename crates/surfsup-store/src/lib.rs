//! Observation store for Surfs Up
//!
//! Read-only queries over the Hawaii climate database: trailing-year
//! precipitation and temperature listings, per-station measurement counts,
//! and date-range temperature aggregates.

pub mod error;
pub mod schema;
pub mod store;
pub mod types;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use error::{StoreError, StoreResult};
pub use store::ClimateStore;
pub use types::*;
