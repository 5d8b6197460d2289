//! Route Evaluator: walks the routing DSL AST under an accumulating
//! [`railguard_core::model::route_context::RouteContext`], emitting
//! [`railguard_core::model::endpoint::EndpointRecord`]s.

pub mod dsl;
pub mod naming;

pub use dsl::RouteEvaluator;
