//! PostgreSQL store
//!
//! Concurrency rests on the schema and on row locks, not on process state:
//! - `receptions_one_open_per_pvz` (partial unique index) rejects a second
//!   open reception for the same pickup point
//! - closing is a single `UPDATE` that re-checks `status = 'open'`
//! - product append/delete lock the reception row before touching products

mod pickup_points;
mod products;
mod receptions;
mod users;

use async_trait::async_trait;
use shared::models::{PickupPoint, PickupPointWithReceptions, Product, Reception, User};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::{
    NewUser, Page, PickupPointStore, ProductStore, ReceptionStore, ReceptionWindow, StoreError,
    UserCredentials, UserStore,
};
use crate::BoxError;
use crate::config::Config;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect the pool and apply pending migrations
    pub async fn connect(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(config.database_acquire_timeout)
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl PickupPointStore for PgStore {
    async fn create(&self, pvz: PickupPoint) -> Result<PickupPoint, StoreError> {
        pickup_points::insert(&self.pool, &pvz).await
    }

    async fn list_all(&self) -> Result<Vec<PickupPoint>, StoreError> {
        pickup_points::list_all(&self.pool).await
    }

    async fn list_with_receptions(
        &self,
        window: ReceptionWindow,
        page: Page,
    ) -> Result<Vec<PickupPointWithReceptions>, StoreError> {
        pickup_points::list_with_receptions(&self.pool, window, page).await
    }
}

#[async_trait]
impl ReceptionStore for PgStore {
    async fn find_open_by_pickup_point(&self, pvz_id: Uuid) -> Result<Reception, StoreError> {
        receptions::find_open(&self.pool, pvz_id).await
    }

    async fn create(&self, reception: Reception) -> Result<Reception, StoreError> {
        receptions::insert(&self.pool, &reception).await
    }

    async fn close_most_recent_open(&self, pvz_id: Uuid) -> Result<Reception, StoreError> {
        receptions::close_most_recent_open(&self.pool, pvz_id).await
    }

    async fn list_by_pickup_point(&self, pvz_id: Uuid) -> Result<Vec<Reception>, StoreError> {
        receptions::list_by_pickup_point(&self.pool, pvz_id).await
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn append(&self, product: Product) -> Result<Product, StoreError> {
        products::append(&self.pool, &product).await
    }

    async fn delete_most_recent_for_reception(
        &self,
        reception_id: Uuid,
    ) -> Result<Product, StoreError> {
        products::delete_most_recent(&self.pool, reception_id).await
    }

    async fn list_for_reception(&self, reception_id: Uuid) -> Result<Vec<Product>, StoreError> {
        products::list_for_reception(&self.pool, reception_id).await
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        users::insert(&self.pool, &user).await
    }

    async fn find_by_email(&self, email: &str) -> Result<UserCredentials, StoreError> {
        users::find_by_email(&self.pool, email).await
    }
}
