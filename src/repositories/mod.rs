//! Data access layer for graph operations.
//!
//! Repositories translate domain values into Cypher and back, using the
//! `FromContext` derive macro for dependency injection.

mod route;
mod schema;

pub use route::{CreateOutcome, RouteRepository};
pub use schema::RouteSchema;
