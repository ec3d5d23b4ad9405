//! PVZ server: pickup points, goods receptions and the products received in
//! them.
//!
//! # Modules
//!
//! ```text
//! pvz-server/src/
//! ├── config.rs     # environment configuration
//! ├── lifecycle/    # reception rules (engine, commands, errors)
//! ├── store/        # persistence traits, Postgres and in-memory backends
//! ├── auth/         # JWT, argon2, accounts, request identity
//! ├── api/          # HTTP routes and handlers
//! ├── grpc/         # read-only gRPC listing
//! ├── telemetry/    # logging and Prometheus metrics
//! └── server.rs     # listener startup and graceful shutdown
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod grpc;
pub mod lifecycle;
pub mod server;
pub mod state;
pub mod store;
pub mod telemetry;

pub use config::Config;
pub use lifecycle::{Caller, LifecycleError, ReceptionEngine};
pub use state::AppState;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
