//! `EndpointRecord`, the Route Evaluator's output — before auth resolution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    /// Engine-mount only, per `mount X => '/p'`.
    Any,
}

impl Verb {
    pub fn from_dsl_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            "put" => Some(Self::Put),
            "patch" => Some(Self::Patch),
            "delete" => Some(Self::Delete),
            "head" => Some(Self::Head),
            "options" => Some(Self::Options),
            _ => None,
        }
    }

    /// The seven standard verbs `via: :all` expands to.
    pub fn all_standard() -> [Verb; 7] {
        [
            Verb::Get,
            Verb::Post,
            Verb::Put,
            Verb::Patch,
            Verb::Delete,
            Verb::Head,
            Verb::Options,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
            Verb::Head => "HEAD",
            Verb::Options => "OPTIONS",
            Verb::Any => "*",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointFlag {
    Conditional,
    Dynamic,
    EngineMount,
    ConstraintPresent,
    UnknownController,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointRecord {
    pub verb: Verb,
    /// Rails-form path, e.g. `/api/v1/users/:id`.
    pub path: String,
    pub controller_class: String,
    pub action: String,
    pub source_file: String,
    pub source_line: u32,
    pub flags: std::collections::BTreeSet<EndpointFlag>,
    /// Preserved verbatim for OpenAPI extensions; ordered for deterministic
    /// serialization.
    pub raw_options: BTreeMap<String, String>,
}

impl EndpointRecord {
    pub fn has_flag(&self, flag: EndpointFlag) -> bool {
        self.flags.contains(&flag)
    }
}
