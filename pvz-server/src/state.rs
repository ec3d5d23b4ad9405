//! Application state shared by the HTTP and gRPC handlers

use std::sync::Arc;

use crate::auth::{AccountService, JwtConfig, JwtService};
use crate::config::Config;
use crate::lifecycle::ReceptionEngine;
use crate::store::{PickupPointStore, ProductStore, ReceptionStore, UserStore};
use crate::telemetry::Metrics;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Reception lifecycle rules
    pub engine: Arc<ReceptionEngine>,
    /// Registration and login
    pub accounts: Arc<AccountService>,
    /// Token issuing and validation
    pub jwt: Arc<JwtService>,
    /// Prometheus registry and business counters
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Wire every service over one store backend
    pub fn new<S>(store: Arc<S>, jwt: JwtService, metrics: Arc<Metrics>) -> Self
    where
        S: PickupPointStore + ReceptionStore + ProductStore + UserStore + 'static,
    {
        let jwt = Arc::new(jwt);
        let engine = ReceptionEngine::with_store(store.clone(), metrics.clone());
        let accounts = AccountService::new(store, jwt.clone());

        Self {
            engine: Arc::new(engine),
            accounts: Arc::new(accounts),
            jwt,
            metrics,
        }
    }

    /// Token service configured from [`Config`]
    pub fn jwt_from_config(config: &Config) -> JwtService {
        JwtService::with_config(JwtConfig::new(
            config.jwt_secret.clone(),
            config.jwt_expiration_hours,
        ))
    }
}
