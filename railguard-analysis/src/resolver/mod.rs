//! Endpoint Resolver: joins Route Evaluator output with Controller Analyzer
//! output into [`ResolvedEndpoint`]s, deduplicating on `(verb, path)` while
//! preserving routing-declaration order.

use railguard_core::config::AnalyzerConfig;
use railguard_core::model::controller::ControllerSummary;
use railguard_core::model::diagnostic::Diagnostic;
use railguard_core::model::endpoint::{EndpointFlag, EndpointRecord, Verb};
use railguard_core::model::resolved::ResolvedEndpoint;
use regex::Regex;
use rustc_hash::FxHashMap;

use crate::controller_analyzer::auth;

/// Joins and deduplicates. When two `EndpointRecord`s share a `(verb, path)`,
/// the first-declared one wins and a diagnostic records the collision — the
/// route evaluator runs in declaration order, so "first" means "declared
/// earliest in `config/routes.rb`" per the determinism invariant.
pub fn resolve(
    records: Vec<EndpointRecord>,
    classes: &FxHashMap<String, ControllerSummary>,
    config: &AnalyzerConfig,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<ResolvedEndpoint> {
    let auth_re = Regex::new(&config.auth_filter_pattern)
        .unwrap_or_else(|_| Regex::new(r"(?i)auth").unwrap());

    let mut seen: FxHashMap<(Verb, String), usize> = FxHashMap::default();
    let mut resolved: Vec<ResolvedEndpoint> = Vec::new();

    for mut record in records {
        let key = (record.verb, record.path.clone());
        if let Some(&existing_idx) = seen.get(&key) {
            let existing = &resolved[existing_idx];
            let mut flags = existing.record.flags.clone();
            flags.extend(record.flags.iter().copied());
            resolved[existing_idx].record.flags = flags;
            diagnostics.push(Diagnostic::warn(format!(
                "duplicate route {} {} ({} shadows a prior declaration at {}:{})",
                record.verb.as_str(),
                record.path,
                record.controller_class,
                existing.record.source_file,
                existing.record.source_line
            )));
            continue;
        }

        let controller_summary = classes.get(&record.controller_class);
        if controller_summary.is_none() {
            record.flags.insert(EndpointFlag::UnknownController);
            diagnostics.push(
                Diagnostic::warn(format!(
                    "{} not found on disk; {} {} is unknown",
                    record.controller_class,
                    record.verb.as_str(),
                    record.path
                ))
                .at(record.source_file.clone(), record.source_line),
            );
        }

        let (auth_status, effective_filters) = auth::classify(
            classes,
            config,
            &auth_re,
            &record.controller_class,
            &record.action,
        );
        let request_schema = controller_summary
            .and_then(|summary| schema_for_action(summary, &record.action))
            .cloned();

        seen.insert(key, resolved.len());
        resolved.push(ResolvedEndpoint {
            record,
            auth_status,
            effective_filters,
            request_schema,
        });
    }

    resolved
}

/// A `*_params` method is usually named after the resource (`post_params`),
/// not the action, and Rails conventionally reuses it for both `create` and
/// `update`. Match on the action name directly first (covers the rare
/// action-named method); for `create`/`update` with no direct hit, fall back
/// to the controller's lone schema when it only declares one.
fn schema_for_action<'a>(
    summary: &'a railguard_core::model::controller::ControllerSummary,
    action: &str,
) -> Option<&'a railguard_core::model::schema::RequestSchema> {
    if let Some(schema) = summary.action_params.get(action) {
        return Some(schema);
    }
    if matches!(action, "create" | "update") && summary.action_params.len() == 1 {
        return summary.action_params.values().next();
    }
    None
}
