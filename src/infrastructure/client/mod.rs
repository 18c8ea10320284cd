//! Client infrastructure: service and repository implementations

pub mod postgres_repository;
pub mod repository;
pub mod service;

pub use postgres_repository::PgClientRepository;
pub use repository::InMemoryClientRepository;
pub use service::ClientService;
