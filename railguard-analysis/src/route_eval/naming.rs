//! Controller-class derivation: `camelize(path_segment) + "Controller"`,
//! prefixed by the accumulated, already-camelized `module_prefix`.

use railguard_core::model::route_context::RouteContext;

/// `users` -> `Users`, `api_keys` -> `ApiKeys`. Pluralize/singularize
/// mapping is deliberately not attempted — the name is used as given, per
/// the routing DSL's documented algorithm.
pub fn camelize(segment: &str) -> String {
    segment
        .split(|c: char| c == '_' || c == '/' || c == '-')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("")
}

fn qualify(module_prefix: &str, tail: &str) -> String {
    if module_prefix.is_empty() {
        tail.to_string()
    } else {
        format!("{}::{}", module_prefix, tail)
    }
}

/// Controller class for a `resources`/`resource` declaration: the resource
/// name, unless `controller_override` is set (from `scope(controller:)` or
/// `with_options(controller:)`), camelized and suffixed `Controller`,
/// qualified by `module_prefix`.
pub fn resource_controller_class(ctx: &RouteContext, resource_name: &str) -> String {
    let basename = ctx
        .controller_override
        .clone()
        .unwrap_or_else(|| resource_name.to_string());
    qualify(&ctx.module_prefix, &format!("{}Controller", camelize(&basename)))
}

/// Controller class from an explicit `'ctrl#action'` or `ctrl: 'x'` string,
/// which may itself contain `/` for nested controllers (`admin/users` ->
/// `Admin::UsersController`).
pub fn controller_class_from_path(ctx: &RouteContext, ctrl_path: &str) -> String {
    let mut segments: Vec<String> = ctrl_path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(camelize)
        .collect();
    if segments.is_empty() {
        return qualify(&ctx.module_prefix, "Controller");
    }
    if let Some(last) = segments.last_mut() {
        *last = format!("{}Controller", last);
    }
    qualify(&ctx.module_prefix, &segments.join("::"))
}

/// When only `controller:` is known with no resource/verb context yet
/// (bare `scope(controller: :x)` with no trailing call).
pub fn controller_class_from_override(ctx: &RouteContext) -> Option<String> {
    ctx.controller_override
        .as_ref()
        .map(|name| qualify(&ctx.module_prefix, &format!("{}Controller", camelize(name))))
}
