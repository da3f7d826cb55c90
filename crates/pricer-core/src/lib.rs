//! Pricer core: shared data model, pricing catalog, and configuration.
//!
//! - [`types`]: catalog records and derived query results
//! - [`catalog`]: CSV-backed immutable model catalog
//! - [`config`]: JSON config schema, loader, env overrides
//! - [`utils`]: paths, timestamps, string helpers

pub mod catalog;
pub mod config;
pub mod types;
pub mod utils;

pub use catalog::{Catalog, CatalogError};
pub use types::{CostEstimate, CostRanking, DispatchReport, DispatchResult, ModelRecord};
