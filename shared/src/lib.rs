//! Shared types for the PVZ service
//!
//! Domain models, error codes and the error response body used by the
//! server and by anything that talks to its API.

pub mod error;
pub mod models;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode};
pub use http;
