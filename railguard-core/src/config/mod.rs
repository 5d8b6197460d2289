//! Analyzer configuration.
//! Single-layer TOML override over compiled defaults — there is no CLI or
//! environment layer in this crate; an embedder that wants one composes it on
//! top of [`AnalyzerConfig::from_toml`].

pub mod analyzer_config;

pub use analyzer_config::AnalyzerConfig;
