//! Error handling for railguard.
//! One error enum per subsystem, `thiserror` only.
//!
//! The analysis pipeline itself is a total function — even the route-root-
//! missing case returns normally with an empty result and a
//! [`crate::model::diagnostic::Severity::Fatal`] diagnostic, per the core's
//! design. The only place a `Result` legitimately crosses this crate's
//! boundary is loading an [`crate::config::AnalyzerConfig`] override.

pub mod config_error;

pub use config_error::ConfigError;
