//! The accumulating lexical context the Route Evaluator threads through the
//! routing DSL. A value type by design — each DSL block derives a new
//! context rather than mutating a shared one, so back-tracking at block exit
//! is automatic (see the design notes this realizes).

use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::ast::Node;

pub const DEFAULT_PATH_PARAM_NAME: &str = "id";

#[derive(Debug, Clone, PartialEq)]
pub struct RouteContext {
    pub path_prefix: String,
    pub module_prefix: String,
    pub controller_override: Option<String>,
    /// The controller a bare verb call inside a `resources`/`resource`
    /// block (including its `member`/`collection` sub-blocks) falls back to
    /// when nothing else names one. Set to the resource's own derived
    /// controller class, never to a basename — unlike `controller_override`
    /// it is never consulted when deriving a *nested* resource's own
    /// controller, so it can't leak into that derivation.
    pub default_controller: Option<String>,
    pub path_param_name: String,
    pub conditional: bool,
    pub dynamic: bool,
    /// `concern :name do ... end` bodies, keyed by name. `Rc`-shared so
    /// pushing a child context that doesn't touch concerns is O(1).
    pub concerns: Rc<FxHashMap<String, Vec<Node>>>,
    /// Keyword bag accumulated from `with_options`.
    pub default_options: Rc<FxHashMap<String, Node>>,
    pub engine_mount: Option<String>,
}

impl Default for RouteContext {
    fn default() -> Self {
        Self {
            path_prefix: String::new(),
            module_prefix: String::new(),
            controller_override: None,
            default_controller: None,
            path_param_name: DEFAULT_PATH_PARAM_NAME.to_string(),
            conditional: false,
            dynamic: false,
            concerns: Rc::new(FxHashMap::default()),
            default_options: Rc::new(FxHashMap::default()),
            engine_mount: None,
        }
    }
}

impl RouteContext {
    pub fn root() -> Self {
        Self::default()
    }

    /// `path_prefix += "/" + segment`, normalized (no double slash).
    pub fn with_path_segment(&self, segment: &str) -> Self {
        let mut ctx = self.clone();
        ctx.path_prefix = join_path(&ctx.path_prefix, segment);
        ctx
    }

    /// `module_prefix += segment` (colon-joined, used only for class names).
    pub fn with_module_segment(&self, segment: &str) -> Self {
        let mut ctx = self.clone();
        if ctx.module_prefix.is_empty() {
            ctx.module_prefix = segment.to_string();
        } else {
            ctx.module_prefix = format!("{}::{}", ctx.module_prefix, segment);
        }
        ctx
    }

    pub fn with_controller_override(&self, controller: Option<String>) -> Self {
        let mut ctx = self.clone();
        ctx.controller_override = controller;
        ctx
    }

    pub fn with_default_controller(&self, controller: Option<String>) -> Self {
        let mut ctx = self.clone();
        ctx.default_controller = controller;
        ctx
    }

    pub fn with_path_param_name(&self, name: impl Into<String>) -> Self {
        let mut ctx = self.clone();
        ctx.path_param_name = name.into();
        ctx
    }

    pub fn with_conditional(&self, conditional: bool) -> Self {
        let mut ctx = self.clone();
        ctx.conditional = ctx.conditional || conditional;
        ctx
    }

    pub fn with_dynamic(&self, dynamic: bool) -> Self {
        let mut ctx = self.clone();
        ctx.dynamic = ctx.dynamic || dynamic;
        ctx
    }

    pub fn with_engine_mount(&self, mount: impl Into<String>) -> Self {
        let mut ctx = self.clone();
        ctx.engine_mount = Some(mount.into());
        ctx
    }

    pub fn with_concern(&self, name: impl Into<String>, body: Vec<Node>) -> Self {
        let mut ctx = self.clone();
        let mut map = (*ctx.concerns).clone();
        map.insert(name.into(), body);
        ctx.concerns = Rc::new(map);
        ctx
    }

    pub fn with_default_options(&self, extra: impl IntoIterator<Item = (String, Node)>) -> Self {
        let mut ctx = self.clone();
        let mut map = (*ctx.default_options).clone();
        for (k, v) in extra {
            map.insert(k, v);
        }
        ctx.default_options = Rc::new(map);
        ctx
    }
}

/// Collapse consecutive `/`, strip a trailing `/` unless the result is `/`.
pub fn join_path(prefix: &str, segment: &str) -> String {
    let combined = format!("{}/{}", prefix, segment);
    normalize_path(&combined)
}

pub fn normalize_path(path: &str) -> String {
    let mut collapsed = String::with_capacity(path.len());
    let mut prev_slash = false;
    for c in path.chars() {
        if c == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        collapsed.push(c);
    }
    if !collapsed.starts_with('/') {
        collapsed.insert(0, '/');
    }
    if collapsed.len() > 1 && collapsed.ends_with('/') {
        collapsed.pop();
    }
    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_and_trims() {
        assert_eq!(normalize_path("//api//v1//users/"), "/api/v1/users");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn pushing_a_child_context_does_not_mutate_the_parent() {
        let root = RouteContext::root();
        let child = root.with_path_segment("api").with_module_segment("Api");
        assert_eq!(root.path_prefix, "");
        assert_eq!(child.path_prefix, "/api");
        assert_eq!(child.module_prefix, "Api");
    }

    #[test]
    fn concerns_are_structurally_shared_until_modified() {
        let root = RouteContext::root();
        let sibling = root.with_path_segment("a");
        assert!(std::rc::Rc::ptr_eq(&root.concerns, &sibling.concerns));
    }
}
