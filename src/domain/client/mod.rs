//! Client domain: owner accounts for API keys

pub mod entity;
pub mod repository;

pub use entity::Client;
pub use repository::ClientRepository;
