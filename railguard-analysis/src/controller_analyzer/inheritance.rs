//! Ancestor-chain filter composition: given a controller class and an
//! action, walks up the inheritance chain (root-first) applying each
//! ancestor's `before_action`/`skip_before_action` declarations in turn.

use railguard_core::model::controller::{ControllerSummary, FilterDecl, INHERITANCE_BOUNDARIES};
use rustc_hash::FxHashMap;

pub struct EffectiveFilters {
    /// Filter names still active for this action after the full walk, in
    /// the order they were first added (root ancestor's filters first).
    pub filters: Vec<String>,
    /// `false` when the walk was cut short — either by
    /// [`railguard_core::config::AnalyzerConfig::max_inheritance_hops`] or by
    /// reaching a parent class name this analyzer never indexed. A
    /// non-fully-resolved chain can't be proven free of an auth filter it
    /// didn't see.
    pub fully_resolved: bool,
    pub has_block_filter: bool,
}

/// Composes the effective filter set for `action` on `class_name`.
pub fn effective_filters(
    classes: &FxHashMap<String, ControllerSummary>,
    class_name: &str,
    action: &str,
    max_hops: usize,
) -> EffectiveFilters {
    let mut chain = Vec::new();
    let mut cur = class_name.to_string();
    let mut fully_resolved = false;
    let mut hops = 0usize;

    loop {
        let is_boundary = INHERITANCE_BOUNDARIES.contains(&cur.as_str());
        let Some(summary) = classes.get(&cur) else {
            // An indexed boundary class (an app that defines its own
            // ApplicationController) still contributes filters below; an
            // unindexed one (the framework-provided common case) is
            // resolved by name alone, with nothing left to apply.
            fully_resolved = is_boundary;
            break;
        };
        chain.push(cur.clone());
        if is_boundary {
            fully_resolved = true;
            break;
        }
        match &summary.parent_class {
            Some(parent) => {
                if hops >= max_hops {
                    break;
                }
                hops += 1;
                cur = parent.clone();
            }
            None => {
                fully_resolved = true;
                break;
            }
        }
    }
    chain.reverse();

    let mut active: Vec<String> = Vec::new();
    for name in &chain {
        let Some(summary) = classes.get(name) else { continue };
        for decl in &summary.before_actions {
            if decl.applies_to(action) && !active.contains(&decl.filter_name) {
                active.push(decl.filter_name.clone());
            }
        }
        for decl in &summary.skip_before_actions {
            if decl.applies_to(action) {
                active.retain(|f| f != &decl.filter_name);
            }
        }
    }
    let has_block_filter = active.iter().any(|f| f == FilterDecl::BLOCK_FILTER_NAME);

    EffectiveFilters {
        filters: active,
        fully_resolved,
        has_block_filter,
    }
}
