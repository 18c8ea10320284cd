//! API key domain: records, validation verdicts, repository contract

pub mod entity;
pub mod repository;
pub mod verdict;

pub use entity::ApiKeyRecord;
pub use repository::ApiKeyRepository;
pub use verdict::{AuthIdentity, RejectReason, ValidationVerdict};

/// Permission scopes understood by the gateway's own endpoints
pub mod permissions {
    /// Submit email content for NLP extraction
    pub const EMAIL_EXTRACT: &str = "email:extract";
    /// Submit invoice documents for parsing
    pub const INVOICE_PARSE: &str = "invoice:parse";
}
