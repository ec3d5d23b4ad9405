use std::sync::Arc;

use chrono::Utc;
use shared::models::{PickupPoint, PickupPointWithReceptions, Product, Reception};
use uuid::Uuid;

use super::commands::{
    AddProduct, CloseLastReception, Command, CreatePickupPoint, CreateReception,
    DeleteLastProduct, ListWithReceptions,
};
use super::{Caller, LifecycleError};
use crate::store::{PickupPointStore, ProductStore, ReceptionStore, StoreError};
use crate::telemetry::Telemetry;

/// Enforces the reception lifecycle on top of the stores
#[derive(Clone)]
pub struct ReceptionEngine {
    pickup_points: Arc<dyn PickupPointStore>,
    receptions: Arc<dyn ReceptionStore>,
    products: Arc<dyn ProductStore>,
    telemetry: Arc<dyn Telemetry>,
}

impl ReceptionEngine {
    pub fn new(
        pickup_points: Arc<dyn PickupPointStore>,
        receptions: Arc<dyn ReceptionStore>,
        products: Arc<dyn ProductStore>,
        telemetry: Arc<dyn Telemetry>,
    ) -> Self {
        Self {
            pickup_points,
            receptions,
            products,
            telemetry,
        }
    }

    /// Engine over a single backend that implements every store trait
    pub fn with_store<S>(store: Arc<S>, telemetry: Arc<dyn Telemetry>) -> Self
    where
        S: PickupPointStore + ReceptionStore + ProductStore + 'static,
    {
        Self::new(store.clone(), store.clone(), store, telemetry)
    }

    /// Checks the caller's role for `C` without looking at its input
    pub fn authorize<C: Command>(caller: &Caller) -> Result<(), LifecycleError> {
        if let Some(required) = C::REQUIRED_ROLE
            && caller.role != required
        {
            tracing::warn!(
                target: "security",
                subject = %caller.subject,
                role = %caller.role,
                required = %required,
                operation = C::NAME,
                "operation denied"
            );
            return Err(LifecycleError::Forbidden {
                operation: C::NAME,
                required,
            });
        }
        Ok(())
    }

    /// Role check first, then input validation. Nothing reaches a store
    /// unless both pass.
    fn admit<C: Command>(caller: &Caller, command: C) -> Result<C::Valid, LifecycleError> {
        Self::authorize::<C>(caller)?;
        command.validate()
    }

    pub async fn create_pickup_point(
        &self,
        caller: &Caller,
        command: CreatePickupPoint,
    ) -> Result<PickupPoint, LifecycleError> {
        let new = Self::admit(caller, command)?;

        let pvz = self
            .pickup_points
            .create(PickupPoint {
                id: new.id,
                registration_date: new.registration_date,
                city: new.city,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict => LifecycleError::AlreadyExists,
                other => LifecycleError::Storage(other),
            })?;

        self.telemetry.pickup_point_created();
        tracing::info!(pvz_id = %pvz.id, city = %pvz.city, "pickup point created");
        Ok(pvz)
    }

    pub async fn list_with_receptions(
        &self,
        caller: &Caller,
        query: ListWithReceptions,
    ) -> Result<Vec<PickupPointWithReceptions>, LifecycleError> {
        let (window, page) = Self::admit(caller, query)?;
        self.pickup_points
            .list_with_receptions(window, page)
            .await
            .map_err(LifecycleError::Storage)
    }

    /// Every pickup point, without receptions
    pub async fn list_pickup_points(&self) -> Result<Vec<PickupPoint>, LifecycleError> {
        self.pickup_points
            .list_all()
            .await
            .map_err(LifecycleError::Storage)
    }

    pub async fn create_reception(
        &self,
        caller: &Caller,
        command: CreateReception,
    ) -> Result<Reception, LifecycleError> {
        let pvz_id = Self::admit(caller, command)?;

        match self.receptions.find_open_by_pickup_point(pvz_id).await {
            Ok(open) => {
                tracing::debug!(pvz_id = %pvz_id, reception_id = %open.id, "reception already open");
                return Err(LifecycleError::ReceptionAlreadyOpen);
            }
            Err(StoreError::NotFound) => {}
            Err(e) => return Err(LifecycleError::Storage(e)),
        }

        // A concurrent caller can still win between the lookup and the
        // insert; the store's uniqueness check reports that as a conflict.
        let reception = self
            .receptions
            .create(Reception::open(pvz_id, Utc::now()))
            .await
            .map_err(|e| match e {
                StoreError::Conflict => LifecycleError::ReceptionAlreadyOpen,
                StoreError::ReferenceNotFound => LifecycleError::PickupPointNotFound,
                other => LifecycleError::Storage(other),
            })?;

        self.telemetry.reception_created();
        tracing::info!(pvz_id = %pvz_id, reception_id = %reception.id, "reception opened");
        Ok(reception)
    }

    pub async fn close_last_reception(
        &self,
        caller: &Caller,
        command: CloseLastReception,
    ) -> Result<Reception, LifecycleError> {
        let pvz_id = Self::admit(caller, command)?;

        let reception = self
            .receptions
            .close_most_recent_open(pvz_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => LifecycleError::NoOpenReception,
                other => LifecycleError::Storage(other),
            })?;

        tracing::info!(pvz_id = %pvz_id, reception_id = %reception.id, "reception closed");
        Ok(reception)
    }

    pub async fn add_product(
        &self,
        caller: &Caller,
        command: AddProduct,
    ) -> Result<Product, LifecycleError> {
        let (pvz_id, product_type) = Self::admit(caller, command)?;
        let reception = self.open_reception(pvz_id).await?;

        let product = self
            .products
            .append(Product {
                id: Uuid::new_v4(),
                date_time: Utc::now(),
                product_type,
                reception_id: reception.id,
            })
            .await
            .map_err(|e| match e {
                StoreError::ReferenceClosed => LifecycleError::NoOpenReception,
                StoreError::ReferenceNotFound => LifecycleError::ReceptionNotFound,
                other => LifecycleError::Storage(other),
            })?;

        self.telemetry.product_added();
        tracing::info!(
            pvz_id = %pvz_id,
            reception_id = %reception.id,
            product_id = %product.id,
            product_type = %product.product_type,
            "product added"
        );
        Ok(product)
    }

    /// Removes the newest product of the open reception and returns it
    pub async fn delete_last_product(
        &self,
        caller: &Caller,
        command: DeleteLastProduct,
    ) -> Result<Product, LifecycleError> {
        let pvz_id = Self::admit(caller, command)?;
        let reception = self.open_reception(pvz_id).await?;

        let product = self
            .products
            .delete_most_recent_for_reception(reception.id)
            .await
            .map_err(|e| match e {
                StoreError::NothingToDelete => LifecycleError::NoProductsToDelete,
                StoreError::ReferenceClosed => LifecycleError::NoOpenReception,
                StoreError::ReferenceNotFound => LifecycleError::ReceptionNotFound,
                other => LifecycleError::Storage(other),
            })?;

        tracing::info!(
            pvz_id = %pvz_id,
            reception_id = %reception.id,
            product_id = %product.id,
            "product deleted"
        );
        Ok(product)
    }

    async fn open_reception(&self, pvz_id: Uuid) -> Result<Reception, LifecycleError> {
        self.receptions
            .find_open_by_pickup_point(pvz_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => LifecycleError::NoOpenReception,
                other => LifecycleError::Storage(other),
            })
    }
}
