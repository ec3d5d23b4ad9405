//! Persistence contracts for pickup points, receptions, products and accounts.
//!
//! The engine only talks to these traits. Two implementations exist:
//! [`postgres::PgStore`] for production and [`memory::MemoryStore`] for tests
//! and database-less local runs. Every trait is `#[automock]`ed so engine tests
//! can assert which store calls were (or were not) made.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use shared::models::{PickupPoint, PickupPointWithReceptions, Product, Reception, Role, User};
use sqlx::error::{DatabaseError, ErrorKind};
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("record conflicts with an existing one")]
    Conflict,

    #[error("referenced record does not exist")]
    ReferenceNotFound,

    #[error("referenced reception is no longer open")]
    ReferenceClosed,

    #[error("nothing to delete")]
    NothingToDelete,

    #[error("storage error")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        if matches!(error, sqlx::Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::Conflict,
            Some(ErrorKind::ForeignKeyViolation) => Self::ReferenceNotFound,
            _ => Self::Database(error),
        }
    }
}

/// Inclusive time window applied to reception `date_time` when listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceptionWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl ReceptionWindow {
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| at >= start) && self.end.is_none_or(|end| at <= end)
    }
}

/// 1-based page over pickup points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub limit: u32,
}

impl Page {
    pub fn offset(&self) -> u64 {
        u64::from(self.number.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Account row including the stored password hash
#[derive(Debug, Clone, PartialEq)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Account to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[automock]
#[async_trait]
pub trait PickupPointStore: Send + Sync {
    /// Fails with [`StoreError::Conflict`] when the id is taken.
    async fn create(&self, pvz: PickupPoint) -> Result<PickupPoint, StoreError>;

    async fn list_all(&self) -> Result<Vec<PickupPoint>, StoreError>;

    /// Pickup points newest first, each with its receptions (newest first) and
    /// their products (oldest first). A bounded window keeps only pickup points
    /// that have at least one reception inside it.
    async fn list_with_receptions(
        &self,
        window: ReceptionWindow,
        page: Page,
    ) -> Result<Vec<PickupPointWithReceptions>, StoreError>;
}

#[automock]
#[async_trait]
pub trait ReceptionStore: Send + Sync {
    /// Fails with [`StoreError::NotFound`] when the pickup point has no open reception.
    async fn find_open_by_pickup_point(&self, pvz_id: Uuid) -> Result<Reception, StoreError>;

    /// Fails with [`StoreError::Conflict`] when an open reception already exists
    /// and [`StoreError::ReferenceNotFound`] when the pickup point does not.
    async fn create(&self, reception: Reception) -> Result<Reception, StoreError>;

    /// Closes the most recent open reception in one atomic step.
    async fn close_most_recent_open(&self, pvz_id: Uuid) -> Result<Reception, StoreError>;

    async fn list_by_pickup_point(&self, pvz_id: Uuid) -> Result<Vec<Reception>, StoreError>;
}

#[automock]
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Fails with [`StoreError::ReferenceNotFound`] when the reception does not
    /// exist and [`StoreError::ReferenceClosed`] when it was closed meanwhile.
    async fn append(&self, product: Product) -> Result<Product, StoreError>;

    /// Removes and returns the newest product of an open reception.
    async fn delete_most_recent_for_reception(
        &self,
        reception_id: Uuid,
    ) -> Result<Product, StoreError>;

    async fn list_for_reception(&self, reception_id: Uuid) -> Result<Vec<Product>, StoreError>;
}

#[automock]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::Conflict`] when the email is registered.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<UserCredentials, StoreError>;
}
