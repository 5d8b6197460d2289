//! Strong-parameters extraction: `params.require(:x).permit(:a, :b, c: [])`.

use railguard_core::model::ast::{KeywordArg, Node, NodeKind};
use railguard_core::model::schema::{RequestSchema, TypeHint};
use regex::Regex;

/// Compiled type-hint patterns from [`railguard_core::config::AnalyzerConfig`].
pub struct ParamHints {
    pub integer_re: Regex,
    pub boolean_re: Regex,
}

impl ParamHints {
    pub fn hint(&self, field: &str) -> TypeHint {
        if self.integer_re.is_match(field) {
            TypeHint::Integer
        } else if self.boolean_re.is_match(field) {
            TypeHint::Boolean
        } else {
            TypeHint::String
        }
    }
}

/// Finds the first `*_params`-style permit chain in a method body and builds
/// its [`RequestSchema`]. `None` when the method body has no `permit` call —
/// not every `*_params` method is strong-parameters (some just return a hash
/// literal), and that's legal, not an error.
pub fn extract_schema(body: &[Node], hints: &ParamHints) -> Option<RequestSchema> {
    body.iter().find_map(|stmt| schema_from_call(stmt, hints))
}

fn schema_from_call(node: &Node, hints: &ParamHints) -> Option<RequestSchema> {
    let NodeKind::Call {
        method,
        receiver,
        positional_args,
        keyword_args,
        ..
    } = &node.kind
    else {
        return None;
    };
    if method == "permit" {
        let root_key = receiver.as_deref().and_then(require_key);
        let mut fields = Vec::new();
        for arg in positional_args {
            if let Some(name) = symbol_name(arg) {
                let hint = hints.hint(&name);
                fields.push((name, hint));
            }
        }
        for KeywordArg { name, .. } in keyword_args {
            let hint = hints.hint(name);
            fields.push((name.clone(), hint));
        }
        return Some(RequestSchema { root_key, fields });
    }
    receiver.as_deref().and_then(|r| schema_from_call(r, hints))
}

fn require_key(node: &Node) -> Option<String> {
    match &node.kind {
        NodeKind::Call {
            method,
            positional_args,
            receiver,
            ..
        } => {
            if method == "require" {
                return positional_args.first().and_then(symbol_name);
            }
            receiver.as_deref().and_then(require_key)
        }
        _ => None,
    }
}

fn symbol_name(node: &Node) -> Option<String> {
    match &node.kind {
        NodeKind::Symbol(s) | NodeKind::StringLit(s) => Some(s.clone()),
        _ => None,
    }
}
