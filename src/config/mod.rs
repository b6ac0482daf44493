//! Persistent user preferences: S/U cap, default credits, import mode and
//! output settings.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, CONFIG_KEYS};
