//! Analyzer tunables: inheritance depth, auth-filter rules, strong-param
//! type-hint heuristics.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// The bound on the controller ancestor walk. A deliberate heuristic to avoid
/// chasing unresolved ancestors forever — kept as a named constant, not a
/// magic number, per the design notes it implements.
pub const DEFAULT_MAX_INHERITANCE_HOPS: usize = 3;

const DEFAULT_AUTH_FILTER_NAMES: &[&str] = &[
    "authenticate_user!",
    "authorize!",
    "require_login",
    "doorkeeper_authorize!",
    "authenticate!",
    "login_required",
    "require_user",
];

const DEFAULT_AUTH_FILTER_PATTERN: &str = r"(?i)auth|login|session|token|verify|signed[_ ]in";
const DEFAULT_INTEGER_HINT_PATTERN: &str = r"_id$|_count$|^(id|age|quantity|size|limit|offset)$";
const DEFAULT_BOOLEAN_HINT_PATTERN: &str = r"^(is_|has_|published|active|enabled)|\?$";

/// Analyzer configuration, loaded from a compiled default and optionally
/// overridden by a single TOML file. There is no CLI/env layering here —
/// this crate has no CLI of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Max ancestor hops walked when composing a controller's effective
    /// filter set.
    pub max_inheritance_hops: usize,
    /// Exact filter names always classified as authentication filters.
    pub auth_filter_names: Vec<String>,
    /// Case-insensitive regex; any filter name it matches is also an auth
    /// filter, in addition to `auth_filter_names`.
    pub auth_filter_pattern: String,
    /// Strong-param field names matching this pattern hint `"integer"`.
    pub integer_hint_pattern: String,
    /// Strong-param field names matching this pattern hint `"boolean"`.
    pub boolean_hint_pattern: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_inheritance_hops: DEFAULT_MAX_INHERITANCE_HOPS,
            auth_filter_names: DEFAULT_AUTH_FILTER_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            auth_filter_pattern: DEFAULT_AUTH_FILTER_PATTERN.to_string(),
            integer_hint_pattern: DEFAULT_INTEGER_HINT_PATTERN.to_string(),
            boolean_hint_pattern: DEFAULT_BOOLEAN_HINT_PATTERN.to_string(),
        }
    }
}

impl AnalyzerConfig {
    /// Load a config, merging a TOML override file on top of defaults. Any
    /// field absent from the file keeps its compiled default (`#[serde(default)]`
    /// on the struct covers whole-file absence of a key).
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text, &path.display().to_string())
    }

    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_include_the_canonical_auth_filters() {
        let cfg = AnalyzerConfig::default();
        assert!(cfg.auth_filter_names.iter().any(|n| n == "authenticate_user!"));
        assert_eq!(cfg.max_inheritance_hops, 3);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let cfg = AnalyzerConfig::from_toml_str("max_inheritance_hops = 5\n", "<test>").unwrap();
        assert_eq!(cfg.max_inheritance_hops, 5);
        assert!(cfg.auth_filter_names.iter().any(|n| n == "require_login"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = AnalyzerConfig::from_toml_str("not valid = [", "<test>").unwrap_err();
        matches!(err, ConfigError::Parse { .. });
    }
}
