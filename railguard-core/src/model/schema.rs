//! `RequestSchema`: the shape extracted from a `*_params` strong-parameters
//! method.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeHint {
    Integer,
    Boolean,
    String,
}

impl TypeHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeHint::Integer => "integer",
            TypeHint::Boolean => "boolean",
            TypeHint::String => "string",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RequestSchema {
    pub root_key: Option<String>,
    pub fields: Vec<(String, TypeHint)>,
}
