//! Shared utilities for quote-brief
//!
//! This crate provides common functionality used across the workspace:
//! tracing setup and the small amount of process-wide configuration the
//! binary needs before anything else is constructed.

pub mod config;
pub mod logging;

pub use config::AppConfig;
pub use logging::{init_tracing, init_tracing_with};
