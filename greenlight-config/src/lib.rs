//! Shared configuration library for Greenlight.
//!
//! Loads `.env` files, composes defaults with environment overrides and
//! validates the result. The server binary layers its CLI flags on top of the
//! [`Config`] returned here.

pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, error::ConfigLoadError};
pub use models::sources::EnvConfig;
pub use models::{Config, ConfigMetadata, DatabaseConfig, Environment, ServerConfig};
pub use validation::{ConfigWarning, ConfigWarnings};
