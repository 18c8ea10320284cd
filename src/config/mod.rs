pub mod app_config;

pub use app_config::{
    ApiKeyConfig, AppConfig, LogFormat, LoggingConfig, ProcessingConfig, ServerConfig,
    StorageBackend, StorageConfig,
};
