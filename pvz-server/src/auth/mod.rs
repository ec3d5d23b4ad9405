//! Authentication: token issuance and validation, password hashing, the
//! request identity extractor and account operations.

pub mod accounts;
pub mod extractor;
pub mod jwt;
pub mod password;

pub use accounts::{AccountService, AuthError, Registration};
pub use extractor::{Authorized, CurrentUser};
pub use jwt::{JwtConfig, JwtService};
