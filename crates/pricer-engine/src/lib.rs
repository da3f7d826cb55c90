//! Pricer query engine: cost ranking and live multi-model dispatch.
//!
//! This crate contains:
//! - **cost**: unit estimate and stable cheapest-first ranking
//! - **dispatch**: request filters, the client resolver seam, per-model execution
//! - **engine**: [`QueryEngine`], the entry point used by the CLI and gateway

pub mod cost;
pub mod dispatch;
pub mod engine;

pub use cost::{estimate_units, savings_percentage};
pub use dispatch::{select_models, ClientResolver, DispatchRequest};
pub use engine::{QueryEngine, QueryError};
