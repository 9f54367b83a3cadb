//! # rerate common library
//!
//! Shared code for the rerate workspace:
//! - Error and result types
//! - Configuration loading (root folder, TOML file, environment overrides)
//! - Logging setup

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
