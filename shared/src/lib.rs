//! Shared types and reorder logic for the Bar Reorder Planner
//!
//! This crate holds everything that is pure computation: the domain models,
//! category/supplier/pack inference, the reorder calculator and report
//! aggregation. It is used by the backend server and, through WASM, by the
//! browser.

pub mod inference;
pub mod merge;
pub mod models;
pub mod reorder;
pub mod sales;
pub mod types;
pub mod validation;

pub use inference::*;
pub use merge::*;
pub use models::*;
pub use reorder::*;
pub use sales::*;
pub use types::*;
pub use validation::*;
