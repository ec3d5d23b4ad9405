//! Domain models
//!
//! Shared between the service and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`;
//! closed-set enums are stored as their canonical text and decoded through
//! `TryFrom<String>`.

pub mod pickup_point;
pub mod product;
pub mod reception;
pub mod user;

// Re-exports
pub use pickup_point::*;
pub use product::*;
pub use reception::*;
pub use user::*;

use thiserror::Error;

/// A string that is not a member of one of the closed value sets
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
