pub mod config;
pub mod logging;

pub use config::{default_logging_config, AppConfig, CliArgs, CorsConfig, LoggingConfig, Section, ServerConfig};
