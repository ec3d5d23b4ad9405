//! Lifecycle failures and their mapping onto API errors

use serde_json::json;
use shared::models::{City, ProductType, Role};
use shared::{AppError, ErrorCode};
use thiserror::Error;

use crate::store::StoreError;

/// Coarse grouping callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Malformed input, rejected before any store call
    Validation,
    /// Caller's role does not permit the operation
    Authorization,
    /// Expected domain outcome given the current state
    State,
    /// A referenced record does not exist
    NotFound,
    /// Store failure; the operation may be retried
    Infrastructure,
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("{field} is not a valid UUID: {value:?}")]
    InvalidId { field: &'static str, value: String },

    #[error("unsupported city: {0:?}")]
    UnsupportedCity(String),

    #[error("unsupported product type: {0:?}")]
    UnsupportedProductType(String),

    #[error("{field} must be a positive integer, got {value}")]
    InvalidPagination { field: &'static str, value: i64 },

    #[error("{field} must be an RFC 3339 timestamp or YYYY-MM-DD date, got {value:?}")]
    InvalidDate { field: &'static str, value: String },

    #[error("startDate must not be after endDate")]
    InvalidDateRange,

    #[error("{operation} requires the {required} role")]
    Forbidden {
        operation: &'static str,
        required: Role,
    },

    #[error("pickup point already has an open reception")]
    ReceptionAlreadyOpen,

    #[error("pickup point has no open reception")]
    NoOpenReception,

    #[error("open reception has no products to delete")]
    NoProductsToDelete,

    #[error("pickup point already exists")]
    AlreadyExists,

    #[error("pickup point not found")]
    PickupPointNotFound,

    #[error("reception not found")]
    ReceptionNotFound,

    #[error("storage failure")]
    Storage(#[source] StoreError),
}

impl LifecycleError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidId { .. }
            | Self::UnsupportedCity(_)
            | Self::UnsupportedProductType(_)
            | Self::InvalidPagination { .. }
            | Self::InvalidDate { .. }
            | Self::InvalidDateRange => FailureKind::Validation,
            Self::Forbidden { .. } => FailureKind::Authorization,
            Self::ReceptionAlreadyOpen
            | Self::NoOpenReception
            | Self::NoProductsToDelete
            | Self::AlreadyExists => FailureKind::State,
            Self::PickupPointNotFound | Self::ReceptionNotFound => FailureKind::NotFound,
            Self::Storage(_) => FailureKind::Infrastructure,
        }
    }
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        let message = err.to_string();
        match err {
            LifecycleError::InvalidId { field, value } => {
                AppError::with_message(ErrorCode::InvalidId, message)
                    .with_detail("field", field)
                    .with_detail("value", value)
            }
            LifecycleError::UnsupportedCity(value) => {
                let allowed: Vec<&str> = City::ALL.iter().map(City::as_str).collect();
                AppError::with_message(ErrorCode::UnsupportedCity, message)
                    .with_detail("value", value)
                    .with_detail("allowed", json!(allowed))
            }
            LifecycleError::UnsupportedProductType(value) => {
                let allowed: Vec<&str> = ProductType::ALL.iter().map(ProductType::as_str).collect();
                AppError::with_message(ErrorCode::UnsupportedProductType, message)
                    .with_detail("value", value)
                    .with_detail("allowed", json!(allowed))
            }
            LifecycleError::InvalidPagination { field, .. } => {
                AppError::with_message(ErrorCode::ValueOutOfRange, message).with_detail("field", field)
            }
            LifecycleError::InvalidDate { field, .. } => {
                AppError::validation(message).with_detail("field", field)
            }
            LifecycleError::InvalidDateRange => AppError::validation(message),
            LifecycleError::Forbidden { required, .. } => {
                AppError::with_message(ErrorCode::RoleRequired, message)
                    .with_detail("required_role", required.as_str())
            }
            LifecycleError::ReceptionAlreadyOpen => AppError::new(ErrorCode::ReceptionAlreadyOpen),
            LifecycleError::NoOpenReception => AppError::new(ErrorCode::NoOpenReception),
            LifecycleError::NoProductsToDelete => AppError::new(ErrorCode::NoProductsToDelete),
            LifecycleError::AlreadyExists => AppError::new(ErrorCode::PickupPointAlreadyExists),
            LifecycleError::PickupPointNotFound => AppError::new(ErrorCode::PickupPointNotFound),
            LifecycleError::ReceptionNotFound => AppError::new(ErrorCode::ReceptionNotFound),
            LifecycleError::Storage(e) => {
                tracing::error!(error = ?e, "store operation failed");
                AppError::database("Database error")
            }
        }
    }
}
