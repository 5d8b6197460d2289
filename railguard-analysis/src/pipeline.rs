//! Top-level orchestration: Mini-Parser + Controller Analyzer (parallel) ->
//! Route Evaluator (sequential) -> Endpoint Resolver (sequential). A total
//! function — the route-root-missing case returns normally, per the error
//! model.

use railguard_core::config::AnalyzerConfig;
use railguard_core::model::diagnostic::Diagnostic;
use railguard_core::model::resolved::ResolvedEndpoint;
use railguard_core::vfs::VirtualFs;

use crate::controller_analyzer;
use crate::resolver;
use crate::route_eval::RouteEvaluator;

/// The sole entry point. Returns the ordered list of resolved endpoints and
/// every diagnostic recorded along the way; never panics on malformed or
/// missing input, never returns an `Err`.
#[tracing::instrument(skip_all)]
pub fn analyze(fs: &dyn VirtualFs, config: &AnalyzerConfig) -> (Vec<ResolvedEndpoint>, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();

    let (classes, controller_diags) = controller_analyzer::discover(fs, config);
    tracing::debug!(controllers = classes.len(), "controller analyzer finished");
    diagnostics.extend(controller_diags);

    let evaluator = RouteEvaluator::new(fs);
    let (records, route_diags) = evaluator.evaluate_root();
    for diag in &route_diags {
        if diag.severity == railguard_core::model::diagnostic::Severity::Fatal {
            tracing::error!(message = %diag.message, "route evaluation failed fatally");
        } else {
            tracing::warn!(message = %diag.message, "route evaluation diagnostic");
        }
    }
    diagnostics.extend(route_diags);

    if records.is_empty() && diagnostics.iter().any(|d| d.severity == railguard_core::model::diagnostic::Severity::Fatal) {
        return (Vec::new(), diagnostics);
    }

    let resolved = resolver::resolve(records, &classes, config, &mut diagnostics);
    tracing::debug!(endpoints = resolved.len(), "endpoint resolver finished");
    (resolved, diagnostics)
}
