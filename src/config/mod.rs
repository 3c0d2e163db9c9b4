//! Application configuration loading

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, DatabaseConfig, Environment, LogFormat, LoggingConfig, ServerConfig,
};
