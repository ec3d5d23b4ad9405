//! In-memory store
//!
//! One mutex guards every table, so each trait call is atomic with respect to
//! every other. Products keep a monotonically increasing sequence number that
//! breaks timestamp ties the same way the `seq` column does in Postgres.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::models::{
    PickupPoint, PickupPointWithReceptions, Product, Reception, ReceptionStatus,
    ReceptionWithProducts, User,
};
use uuid::Uuid;

use super::{
    NewUser, Page, PickupPointStore, ProductStore, ReceptionStore, ReceptionWindow, StoreError,
    UserCredentials, UserStore,
};

#[derive(Default)]
struct Tables {
    pickup_points: HashMap<Uuid, PickupPoint>,
    receptions: HashMap<Uuid, Reception>,
    /// (seq, product), append order
    products: Vec<(u64, Product)>,
    next_seq: u64,
    users: HashMap<String, UserCredentials>,
}

impl Tables {
    fn products_of(&self, reception_id: Uuid) -> Vec<Product> {
        let mut rows: Vec<&(u64, Product)> = self
            .products
            .iter()
            .filter(|(_, p)| p.reception_id == reception_id)
            .collect();
        rows.sort_by_key(|(seq, p)| (p.date_time, *seq));
        rows.into_iter().map(|(_, p)| p.clone()).collect()
    }

    fn receptions_of(&self, pvz_id: Uuid) -> Vec<Reception> {
        let mut rows: Vec<Reception> = self
            .receptions
            .values()
            .filter(|r| r.pvz_id == pvz_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date_time.cmp(&a.date_time));
        rows
    }

    fn open_reception_of(&self, pvz_id: Uuid) -> Option<&Reception> {
        self.receptions
            .values()
            .filter(|r| r.pvz_id == pvz_id && r.status.is_open())
            .max_by_key(|r| r.date_time)
    }

    fn ensure_open(&self, reception_id: Uuid) -> Result<(), StoreError> {
        match self.receptions.get(&reception_id) {
            None => Err(StoreError::ReferenceNotFound),
            Some(r) if !r.status.is_open() => Err(StoreError::ReferenceClosed),
            Some(_) => Ok(()),
        }
    }
}

/// Process-local store implementing every store trait
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PickupPointStore for MemoryStore {
    async fn create(&self, pvz: PickupPoint) -> Result<PickupPoint, StoreError> {
        let mut tables = self.tables.lock();
        if tables.pickup_points.contains_key(&pvz.id) {
            return Err(StoreError::Conflict);
        }
        tables.pickup_points.insert(pvz.id, pvz.clone());
        Ok(pvz)
    }

    async fn list_all(&self) -> Result<Vec<PickupPoint>, StoreError> {
        let tables = self.tables.lock();
        let mut rows: Vec<PickupPoint> = tables.pickup_points.values().cloned().collect();
        rows.sort_by(|a, b| {
            b.registration_date
                .cmp(&a.registration_date)
                .then(a.id.cmp(&b.id))
        });
        Ok(rows)
    }

    async fn list_with_receptions(
        &self,
        window: ReceptionWindow,
        page: Page,
    ) -> Result<Vec<PickupPointWithReceptions>, StoreError> {
        let pvzs = self.list_all().await?;
        let tables = self.tables.lock();

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);

        let listed = pvzs
            .into_iter()
            .filter_map(|pvz| {
                let receptions: Vec<ReceptionWithProducts> = tables
                    .receptions_of(pvz.id)
                    .into_iter()
                    .filter(|r| window.contains(r.date_time))
                    .map(|reception| ReceptionWithProducts {
                        products: tables.products_of(reception.id),
                        reception,
                    })
                    .collect();

                if !window.is_unbounded() && receptions.is_empty() {
                    return None;
                }
                Some(PickupPointWithReceptions { pvz, receptions })
            })
            .skip(offset)
            .take(limit)
            .collect();

        Ok(listed)
    }
}

#[async_trait]
impl ReceptionStore for MemoryStore {
    async fn find_open_by_pickup_point(&self, pvz_id: Uuid) -> Result<Reception, StoreError> {
        let tables = self.tables.lock();
        tables
            .open_reception_of(pvz_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, reception: Reception) -> Result<Reception, StoreError> {
        let mut tables = self.tables.lock();
        if !tables.pickup_points.contains_key(&reception.pvz_id) {
            return Err(StoreError::ReferenceNotFound);
        }
        if tables.receptions.contains_key(&reception.id) {
            return Err(StoreError::Conflict);
        }
        if reception.status.is_open() && tables.open_reception_of(reception.pvz_id).is_some() {
            return Err(StoreError::Conflict);
        }
        tables.receptions.insert(reception.id, reception.clone());
        Ok(reception)
    }

    async fn close_most_recent_open(&self, pvz_id: Uuid) -> Result<Reception, StoreError> {
        let mut tables = self.tables.lock();
        let id = tables
            .open_reception_of(pvz_id)
            .map(|r| r.id)
            .ok_or(StoreError::NotFound)?;
        let reception = tables
            .receptions
            .get_mut(&id)
            .ok_or(StoreError::NotFound)?;
        reception.status = ReceptionStatus::Closed;
        Ok(reception.clone())
    }

    async fn list_by_pickup_point(&self, pvz_id: Uuid) -> Result<Vec<Reception>, StoreError> {
        Ok(self.tables.lock().receptions_of(pvz_id))
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn append(&self, product: Product) -> Result<Product, StoreError> {
        let mut tables = self.tables.lock();
        tables.ensure_open(product.reception_id)?;
        if tables.products.iter().any(|(_, p)| p.id == product.id) {
            return Err(StoreError::Conflict);
        }
        let seq = tables.next_seq;
        tables.next_seq += 1;
        tables.products.push((seq, product.clone()));
        Ok(product)
    }

    async fn delete_most_recent_for_reception(
        &self,
        reception_id: Uuid,
    ) -> Result<Product, StoreError> {
        let mut tables = self.tables.lock();
        tables.ensure_open(reception_id)?;
        let index = tables
            .products
            .iter()
            .enumerate()
            .filter(|(_, (_, p))| p.reception_id == reception_id)
            .max_by_key(|(_, (seq, p))| (p.date_time, *seq))
            .map(|(index, _)| index)
            .ok_or(StoreError::NothingToDelete)?;
        let (_, product) = tables.products.remove(index);
        Ok(product)
    }

    async fn list_for_reception(&self, reception_id: Uuid) -> Result<Vec<Product>, StoreError> {
        Ok(self.tables.lock().products_of(reception_id))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.lock();
        if tables.users.contains_key(&user.email) {
            return Err(StoreError::Conflict);
        }
        let created = User {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        };
        tables.users.insert(
            user.email,
            UserCredentials {
                user: created.clone(),
                password_hash: user.password_hash,
            },
        );
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<UserCredentials, StoreError> {
        self.tables
            .lock()
            .users
            .get(email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use shared::models::{City, ProductType};

    async fn seeded() -> (MemoryStore, PickupPoint) {
        let store = MemoryStore::new();
        let pvz = PickupPointStore::create(
            &store,
            PickupPoint {
                id: Uuid::new_v4(),
                registration_date: Utc::now(),
                city: City::Moscow,
            },
        )
        .await
        .unwrap();
        (store, pvz)
    }

    fn product(reception_id: Uuid, at: chrono::DateTime<Utc>) -> Product {
        Product {
            id: Uuid::new_v4(),
            date_time: at,
            product_type: ProductType::Electronics,
            reception_id,
        }
    }

    #[tokio::test]
    async fn test_second_open_reception_conflicts() {
        let (store, pvz) = seeded().await;
        ReceptionStore::create(&store, Reception::open(pvz.id, Utc::now()))
            .await
            .unwrap();

        let result = ReceptionStore::create(&store, Reception::open(pvz.id, Utc::now())).await;
        assert!(matches!(result, Err(StoreError::Conflict)), "got {result:?}");
    }

    #[tokio::test]
    async fn test_reception_for_unknown_pickup_point() {
        let store = MemoryStore::new();
        let result = ReceptionStore::create(&store, Reception::open(Uuid::new_v4(), Utc::now())).await;
        assert!(matches!(result, Err(StoreError::ReferenceNotFound)), "got {result:?}");
    }

    #[tokio::test]
    async fn test_close_flips_only_the_open_reception() {
        let (store, pvz) = seeded().await;
        let opened = ReceptionStore::create(&store, Reception::open(pvz.id, Utc::now()))
            .await
            .unwrap();

        let closed = store.close_most_recent_open(pvz.id).await.unwrap();
        assert_eq!(closed.id, opened.id);
        assert_eq!(closed.status, ReceptionStatus::Closed);

        let again = store.close_most_recent_open(pvz.id).await;
        assert!(matches!(again, Err(StoreError::NotFound)), "got {again:?}");
    }

    #[tokio::test]
    async fn test_equal_timestamps_delete_in_reverse_append_order() {
        let (store, pvz) = seeded().await;
        let reception = ReceptionStore::create(&store, Reception::open(pvz.id, Utc::now()))
            .await
            .unwrap();
        let at = Utc::now();
        let first = store.append(product(reception.id, at)).await.unwrap();
        let second = store.append(product(reception.id, at)).await.unwrap();

        let deleted = store
            .delete_most_recent_for_reception(reception.id)
            .await
            .unwrap();
        assert_eq!(deleted.id, second.id);
        let deleted = store
            .delete_most_recent_for_reception(reception.id)
            .await
            .unwrap();
        assert_eq!(deleted.id, first.id);

        let empty = store.delete_most_recent_for_reception(reception.id).await;
        assert!(matches!(empty, Err(StoreError::NothingToDelete)), "got {empty:?}");
    }

    #[tokio::test]
    async fn test_append_to_closed_reception_is_rejected() {
        let (store, pvz) = seeded().await;
        let reception = ReceptionStore::create(&store, Reception::open(pvz.id, Utc::now()))
            .await
            .unwrap();
        store.close_most_recent_open(pvz.id).await.unwrap();

        let result = store.append(product(reception.id, Utc::now())).await;
        assert!(matches!(result, Err(StoreError::ReferenceClosed)), "got {result:?}");
    }

    #[tokio::test]
    async fn test_window_filters_pickup_points_and_receptions() {
        let (store, pvz) = seeded().await;
        let old = Utc::now() - Duration::days(30);
        ReceptionStore::create(
            &store,
            Reception {
                status: ReceptionStatus::Closed,
                ..Reception::open(pvz.id, old)
            },
        )
        .await
        .unwrap();
        ReceptionStore::create(&store, Reception::open(pvz.id, Utc::now()))
            .await
            .unwrap();

        let page = Page { number: 1, limit: 10 };
        let recent = ReceptionWindow {
            start: Some(Utc::now() - Duration::days(1)),
            end: None,
        };
        let listed = store.list_with_receptions(recent, page).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].receptions.len(), 1);

        let ancient = ReceptionWindow {
            start: None,
            end: Some(old - Duration::days(1)),
        };
        assert!(store.list_with_receptions(ancient, page).await.unwrap().is_empty());

        let all = store
            .list_with_receptions(ReceptionWindow::default(), page)
            .await
            .unwrap();
        assert_eq!(all[0].receptions.len(), 2);
        assert!(all[0].receptions[0].reception.date_time > all[0].receptions[1].reception.date_time);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        let new_user = || NewUser {
            id: Uuid::new_v4(),
            email: "worker@example.com".into(),
            password_hash: "hash".into(),
            role: shared::models::Role::Employee,
        };
        UserStore::create(&store, new_user()).await.unwrap();
        let result = UserStore::create(&store, new_user()).await;
        assert!(matches!(result, Err(StoreError::Conflict)), "got {result:?}");

        let found = store.find_by_email("worker@example.com").await.unwrap();
        assert_eq!(found.password_hash, "hash");
    }
}
