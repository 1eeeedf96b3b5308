//! Core types, configuration, and error handling for codemedic.
//!
//! This crate provides the shared foundation used by the stage crates:
//! - [`CodemedicError`]: unified error type using `thiserror`
//! - [`CodemedicConfig`]: typed configuration loaded from a `.env` file
//! - [`load_properties`] / [`parse_properties`]: the `KEY=VALUE` reader
//! - Shared report types: [`Stage`], [`StageReport`]

mod config;
mod error;
mod types;

pub use config::{
    load_properties, parse_properties, CodemedicConfig, API_KEY_PROPERTY, API_URL_ENV,
    DEFAULT_API_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
    TIMEOUT_PROPERTY,
};
pub use error::CodemedicError;
pub use types::{Stage, StageReport};

/// A convenience `Result` type for codemedic operations.
pub type Result<T> = std::result::Result<T, CodemedicError>;
