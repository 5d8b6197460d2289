//! Auth-filter classification: exact-name set plus a case-insensitive
//! regex, folded into the final per-endpoint [`AuthStatus`].

use railguard_core::config::AnalyzerConfig;
use railguard_core::model::controller::ControllerSummary;
use railguard_core::model::resolved::AuthStatus;
use regex::Regex;
use rustc_hash::FxHashMap;

use super::inheritance::effective_filters;

pub fn is_auth_filter_name(name: &str, config: &AnalyzerConfig, auth_re: &Regex) -> bool {
    config.auth_filter_names.iter().any(|n| n == name) || auth_re.is_match(name)
}

/// Classifies one controller action. Precedence: a recognized auth filter in
/// the effective set wins outright; otherwise an unresolved ancestor chain
/// or a surviving block filter (which can never be proven either way) is
/// `Unknown`; a fully resolved chain with nothing auth-shaped is
/// `Unprotected`.
pub fn classify(
    classes: &FxHashMap<String, ControllerSummary>,
    config: &AnalyzerConfig,
    auth_re: &Regex,
    controller_class: &str,
    action: &str,
) -> (AuthStatus, Vec<String>) {
    let ef = effective_filters(classes, controller_class, action, config.max_inheritance_hops);
    let has_auth = ef
        .filters
        .iter()
        .any(|f| is_auth_filter_name(f, config, auth_re));

    let status = if has_auth {
        AuthStatus::Authenticated
    } else if !ef.fully_resolved || ef.has_block_filter {
        AuthStatus::Unknown
    } else {
        AuthStatus::Unprotected
    };
    (status, ef.filters)
}
