//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: `StoreConfig` and TOML loading
//! - [`defaults`]: serde default functions
//! - [`validation`]: up-front checks that report every problem at once

mod defaults;
mod types;
pub mod validation;

pub use types::{ConfigError, StoreConfig};
pub use validation::{ValidationError, validate};
