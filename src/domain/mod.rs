//! Domain types and contracts

pub mod api_key;
pub mod client;
pub mod error;

pub use api_key::{ApiKeyRecord, AuthIdentity, RejectReason, ValidationVerdict};
pub use client::Client;
pub use error::DomainError;
