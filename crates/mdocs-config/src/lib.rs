pub mod config;
pub mod error;
pub mod templates;

pub use config::{Config, DiagramsConfig, InternalLinksConfig, RewriteConfig};
pub use error::ConfigError;
