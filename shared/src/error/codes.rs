//! Unified error codes for the PVZ service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Pickup point errors
//! - 4xxx: Reception errors
//! - 5xxx: Product errors
//! - 6xxx: Account errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so HTTP clients can branch
/// on a stable number instead of parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Identifier is not a well-formed UUID
    InvalidId = 6,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,

    // ==================== 3xxx: Pickup point ====================
    /// Pickup point not found
    PickupPointNotFound = 3001,
    /// Pickup point with this id already exists
    PickupPointAlreadyExists = 3002,
    /// City is not in the supported set
    UnsupportedCity = 3003,

    // ==================== 4xxx: Reception ====================
    /// Reception not found
    ReceptionNotFound = 4001,
    /// Pickup point already has an open reception
    ReceptionAlreadyOpen = 4002,
    /// Pickup point has no open reception
    NoOpenReception = 4003,

    // ==================== 5xxx: Product ====================
    /// Product type is not in the supported set
    UnsupportedProductType = 5001,
    /// Open reception has no products left to delete
    NoProductsToDelete = 5002,

    // ==================== 6xxx: Account ====================
    /// Email is already registered
    EmailAlreadyRegistered = 6001,
    /// Role is not recognized
    UnknownRole = 6002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidId => "Identifier is not a valid UUID",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",

            // Pickup point
            ErrorCode::PickupPointNotFound => "Pickup point not found",
            ErrorCode::PickupPointAlreadyExists => "Pickup point already exists",
            ErrorCode::UnsupportedCity => "City is not supported",

            // Reception
            ErrorCode::ReceptionNotFound => "Reception not found",
            ErrorCode::ReceptionAlreadyOpen => "Pickup point already has an open reception",
            ErrorCode::NoOpenReception => "Pickup point has no open reception",

            // Product
            ErrorCode::UnsupportedProductType => "Product type is not supported",
            ErrorCode::NoProductsToDelete => "Open reception has no products to delete",

            // Account
            ErrorCode::EmailAlreadyRegistered => "Email is already registered",
            ErrorCode::UnknownRole => "Role is not recognized",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

/// Error returned when converting an unknown u16 to [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            6 => Ok(ErrorCode::InvalidId),
            8 => Ok(ErrorCode::ValueOutOfRange),

            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),

            3001 => Ok(ErrorCode::PickupPointNotFound),
            3002 => Ok(ErrorCode::PickupPointAlreadyExists),
            3003 => Ok(ErrorCode::UnsupportedCity),

            4001 => Ok(ErrorCode::ReceptionNotFound),
            4002 => Ok(ErrorCode::ReceptionAlreadyOpen),
            4003 => Ok(ErrorCode::NoOpenReception),

            5001 => Ok(ErrorCode::UnsupportedProductType),
            5002 => Ok(ErrorCode::NoProductsToDelete),

            6001 => Ok(ErrorCode::EmailAlreadyRegistered),
            6002 => Ok(ErrorCode::UnknownRole),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
