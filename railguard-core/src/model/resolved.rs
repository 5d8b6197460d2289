//! `ResolvedEndpoint`, the Endpoint Resolver's final output.

use serde::{Deserialize, Serialize};

use super::endpoint::EndpointRecord;
use super::schema::RequestSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthStatus {
    Authenticated,
    Unprotected,
    /// The safe fallback: ancestors unresolved, only block filters apply, or
    /// the controller class itself could not be found on disk.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedEndpoint {
    #[serde(flatten)]
    pub record: EndpointRecord,
    pub auth_status: AuthStatus,
    pub effective_filters: Vec<String>,
    pub request_schema: Option<RequestSchema>,
}
