//! Reception lifecycle
//!
//! The engine owns the rules around pickup points, receptions and products:
//! a pickup point has at most one open reception, products are only added to
//! or removed from that open reception, and every mutation is gated on the
//! caller's role. All state lives in the stores; the engine holds none.

pub mod commands;
mod engine;
mod error;

pub use commands::{
    AddProduct, CloseLastReception, Command, CreatePickupPoint, CreateReception,
    DeleteLastProduct, ListWithReceptions,
};
pub use engine::ReceptionEngine;
pub use error::{FailureKind, LifecycleError};

use shared::models::Role;

/// Who is invoking an engine operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// Token subject, used in logs
    pub subject: String,
    pub role: Role,
}

impl Caller {
    pub fn new(subject: impl Into<String>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            role,
        }
    }
}
