//! Controller Analyzer: discovers `app/controllers/**/*.rb`, extracts each
//! class's declared filters and strong-parameter schemas, then (via
//! [`inheritance`]) composes the effective filter set each action runs under
//! and (via [`auth`]) classifies it.

pub mod auth;
pub mod inheritance;
pub mod strong_params;

use std::sync::Arc;

use railguard_core::config::AnalyzerConfig;
use railguard_core::model::ast::Node;
use railguard_core::model::controller::{ControllerSummary, FilterDecl};
use railguard_core::model::diagnostic::Diagnostic;
use railguard_core::vfs::VirtualFs;
use rayon::prelude::*;
use regex::Regex;
use rustc_hash::FxHashMap;

use strong_params::ParamHints;

const FILTER_METHODS: &[&str] = &["before_action", "before_filter"];
const SKIP_FILTER_METHODS: &[&str] = &["skip_before_action", "skip_before_filter"];

/// Walk `app/controllers`, parsing and extracting every controller class in
/// parallel — each file's AST and summary is independent of every other.
#[tracing::instrument(skip_all)]
pub fn discover(
    fs: &dyn VirtualFs,
    config: &AnalyzerConfig,
) -> (FxHashMap<String, ControllerSummary>, Vec<Diagnostic>) {
    let hints = ParamHints {
        integer_re: Regex::new(&config.integer_hint_pattern)
            .unwrap_or_else(|_| Regex::new(r"_id$").unwrap()),
        boolean_re: Regex::new(&config.boolean_hint_pattern)
            .unwrap_or_else(|_| Regex::new(r"^(is_|has_)").unwrap()),
    };

    let mut paths: Vec<String> = fs
        .list("app/controllers")
        .into_iter()
        .filter(|p| p.ends_with(".rb"))
        .collect();
    paths.sort();

    let per_file: Vec<(FxHashMap<String, ControllerSummary>, Vec<Diagnostic>)> = paths
        .par_iter()
        .map(|path| {
            let _span = tracing::debug_span!("parse_controller", file = %path).entered();
            let mut classes = FxHashMap::default();
            let mut diagnostics = Vec::new();
            let Some(src) = fs.read(path) else {
                diagnostics.push(Diagnostic::warn(format!("{path} listed but unreadable")));
                return (classes, diagnostics);
            };
            let (nodes, parse_diags) = crate::parser::parse(&src, Arc::from(path.as_str()));
            diagnostics.extend(parse_diags);
            collect_classes(&nodes, "", &hints, &mut classes, &mut diagnostics);
            (classes, diagnostics)
        })
        .collect();

    let mut classes = FxHashMap::default();
    let mut diagnostics = Vec::new();
    for (file_classes, file_diags) in per_file {
        classes.extend(file_classes);
        diagnostics.extend(file_diags);
    }
    (classes, diagnostics)
}

fn collect_classes(
    nodes: &[Node],
    module_prefix: &str,
    hints: &ParamHints,
    out: &mut FxHashMap<String, ControllerSummary>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for node in nodes {
        match &node.kind {
            railguard_core::model::ast::NodeKind::ModuleDef { name, body } => {
                let prefix = qualify(module_prefix, name);
                collect_classes(body, &prefix, hints, out, diagnostics);
            }
            railguard_core::model::ast::NodeKind::ClassDef { name, parent, body } => {
                let class_name = qualify(module_prefix, name);
                let mut summary =
                    ControllerSummary::new(class_name.clone(), node.file.to_string(), node.line);
                summary.parent_class = parent.clone();
                extract_body(body, hints, &mut summary, diagnostics);
                out.insert(class_name, summary);
            }
            _ => {}
        }
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}::{name}")
    }
}

fn extract_body(
    body: &[Node],
    hints: &ParamHints,
    summary: &mut ControllerSummary,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for node in body {
        match &node.kind {
            railguard_core::model::ast::NodeKind::Call {
                method,
                positional_args,
                keyword_args,
                block,
                ..
            } => {
                if FILTER_METHODS.contains(&method.as_str()) {
                    summary.before_actions.extend(filter_decls(
                        positional_args,
                        keyword_args,
                        block.is_some(),
                        &summary.class_name,
                        node,
                        diagnostics,
                    ));
                } else if SKIP_FILTER_METHODS.contains(&method.as_str()) {
                    summary.skip_before_actions.extend(filter_decls(
                        positional_args,
                        keyword_args,
                        block.is_some(),
                        &summary.class_name,
                        node,
                        diagnostics,
                    ));
                }
            }
            railguard_core::model::ast::NodeKind::MethodDef { name, body } if name.ends_with("_params") => {
                if let Some(schema) = strong_params::extract_schema(body, hints) {
                    let action = name.trim_end_matches("_params").trim_end_matches('_');
                    summary.action_params.insert(action.to_string(), schema);
                }
            }
            _ => {}
        }
    }
}

fn filter_decls(
    positional_args: &[Node],
    keyword_args: &[railguard_core::model::ast::KeywordArg],
    has_block: bool,
    class_name: &str,
    node: &Node,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<FilterDecl> {
    use railguard_core::model::ast::NodeKind;

    let only = keyword_args
        .iter()
        .find(|kw| kw.name == "only")
        .map(|kw| action_set(&kw.value));
    let except = keyword_args
        .iter()
        .find(|kw| kw.name == "except")
        .map(|kw| action_set(&kw.value));
    let (only, except) = if only.is_some() && except.is_some() {
        diagnostics.push(
            Diagnostic::warn(format!(
                "{class_name} has a filter with both only: and except:; except: dropped"
            ))
            .at(node.file.to_string(), node.line),
        );
        (only, None)
    } else {
        (only, except)
    };

    let names: Vec<String> = positional_args
        .iter()
        .filter_map(|n| match &n.kind {
            NodeKind::Symbol(s) | NodeKind::StringLit(s) => Some(s.clone()),
            _ => None,
        })
        .collect();

    if names.is_empty() {
        if has_block {
            vec![FilterDecl {
                filter_name: FilterDecl::BLOCK_FILTER_NAME.to_string(),
                only,
                except,
            }]
        } else {
            Vec::new()
        }
    } else {
        names
            .into_iter()
            .map(|filter_name| FilterDecl {
                filter_name,
                only: only.clone(),
                except: except.clone(),
            })
            .collect()
    }
}

fn action_set(node: &Node) -> std::collections::BTreeSet<String> {
    use railguard_core::model::ast::NodeKind;
    match &node.kind {
        NodeKind::Symbol(s) | NodeKind::StringLit(s) => {
            let mut set = std::collections::BTreeSet::new();
            set.insert(s.clone());
            set
        }
        NodeKind::ArrayLit(items) => items
            .iter()
            .filter_map(|n| match &n.kind {
                NodeKind::Symbol(s) | NodeKind::StringLit(s) => Some(s.clone()),
                _ => None,
            })
            .collect(),
        _ => std::collections::BTreeSet::new(),
    }
}
