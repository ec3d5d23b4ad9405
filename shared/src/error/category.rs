//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Permission errors
/// - 3xxx: Pickup point errors
/// - 4xxx: Reception errors
/// - 5xxx: Product errors
/// - 6xxx: Account errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Pickup point errors (3xxx)
    PickupPoint,
    /// Reception errors (4xxx)
    Reception,
    /// Product errors (5xxx)
    Product,
    /// Account errors (6xxx)
    Account,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::PickupPoint,
            4000..5000 => Self::Reception,
            5000..6000 => Self::Product,
            6000..7000 => Self::Account,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::PickupPoint => "pickup_point",
            Self::Reception => "reception",
            Self::Product => "product",
            Self::Account => "account",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::Permission);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::PickupPoint);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Reception);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Product);
        assert_eq!(ErrorCategory::from_code(6001), ErrorCategory::Account);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::NotAuthenticated.category(), ErrorCategory::Auth);
        assert_eq!(
            ErrorCode::UnsupportedCity.category(),
            ErrorCategory::PickupPoint
        );
        assert_eq!(
            ErrorCode::NoOpenReception.category(),
            ErrorCategory::Reception
        );
        assert_eq!(
            ErrorCode::NoProductsToDelete.category(),
            ErrorCategory::Product
        );
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::PickupPoint).unwrap();
        assert_eq!(json, "\"pickup_point\"");
        assert_eq!(ErrorCategory::PickupPoint.name(), "pickup_point");
    }
}
