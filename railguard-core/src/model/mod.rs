//! The shared data model: AST nodes, route context, endpoint records,
//! controller summaries, resolved endpoints, diagnostics.

pub mod ast;
pub mod controller;
pub mod diagnostic;
pub mod endpoint;
pub mod resolved;
pub mod route_context;
pub mod schema;
