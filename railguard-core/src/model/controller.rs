//! `ControllerSummary` and `FilterDecl`, the Controller Analyzer's output.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::schema::RequestSchema;

/// `before_action :x, only: [...]` / `skip_before_action :x, except: [...]`.
/// Invariant: `only` and `except` are mutually exclusive — when a call
/// parses with both, `except` is dropped and a diagnostic recorded (the
/// documented tie-break), so a live `FilterDecl` never carries both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDecl {
    pub filter_name: String,
    pub only: Option<BTreeSet<String>>,
    pub except: Option<BTreeSet<String>>,
}

impl FilterDecl {
    /// Does this filter declaration apply to `action`?
    pub fn applies_to(&self, action: &str) -> bool {
        if let Some(only) = &self.only {
            return only.contains(action);
        }
        if let Some(except) = &self.except {
            return !except.contains(action);
        }
        true
    }

    /// The synthetic name recorded for `before_action do ... end` — a block
    /// filter can never be proven an auth filter, so it classifies as
    /// `unknown` wherever it survives inheritance composition.
    pub const BLOCK_FILTER_NAME: &'static str = "(block)";

    pub fn is_block(&self) -> bool {
        self.filter_name == Self::BLOCK_FILTER_NAME
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerSummary {
    pub class_name: String,
    pub parent_class: Option<String>,
    pub before_actions: Vec<FilterDecl>,
    pub skip_before_actions: Vec<FilterDecl>,
    pub action_params: FxHashMap<String, RequestSchema>,
    pub file: String,
    pub line: u32,
}

impl ControllerSummary {
    pub fn new(class_name: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            class_name: class_name.into(),
            parent_class: None,
            before_actions: Vec::new(),
            skip_before_actions: Vec::new(),
            action_params: FxHashMap::default(),
            file: file.into(),
            line,
        }
    }
}

/// The three class names the ancestor walk stops at without needing to
/// resolve them further — they are Rails/framework boundaries, never
/// controllers this analyzer indexes.
pub const INHERITANCE_BOUNDARIES: &[&str] = &[
    "ApplicationController",
    "ActionController::Base",
    "ActionController::API",
];
