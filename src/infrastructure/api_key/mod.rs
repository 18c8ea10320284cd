//! API key infrastructure: codec, service and repository implementations

pub mod codec;
pub mod postgres_repository;
pub mod repository;
pub mod service;

pub use codec::KeyCodec;
pub use postgres_repository::PgApiKeyRepository;
pub use repository::InMemoryApiKeyRepository;
pub use service::{ApiKeyService, IssuedApiKey};
