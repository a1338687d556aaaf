//! Convenience result type alias for drivetally.

use crate::error::AppError;

/// A specialized `Result` type for drivetally operations.
pub type AppResult<T> = Result<T, AppError>;
