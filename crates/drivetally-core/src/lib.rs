//! # drivetally-core
//!
//! Core crate for drivetally. Contains the domain types produced by the
//! aggregation engine, configuration schemas, the collaborator traits the
//! engine consumes, and the unified error system.
//!
//! This crate has **no** internal dependencies on other drivetally crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
