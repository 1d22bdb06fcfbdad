//! Shared utilities for the ATT workspace.

pub mod logging;

pub use logging::{init_tracing, LogFormat};
