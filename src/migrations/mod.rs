//! Schema migrations for the route graph with version tracking.
//!
//! Migrations are:
//! - **Idempotent**: Use `IF NOT EXISTS`, `MERGE`, `coalesce` - required for safe retries
//! - **Forward-only**: No rollback support - create compensating migrations if needed
//! - **Version-tracked**: Schema version stored in a `(:SchemaVersion)` node
//! - **Schema-aware**: The relational layout registers extra migrations on top of the flat one

mod m001_route_node_constraint;
mod m002_route_relationship_constraints;
mod m003_route_relationships;
pub mod runner;
mod traits;

pub use m001_route_node_constraint::M001RouteNodeConstraint;
pub use m002_route_relationship_constraints::M002RouteRelationshipConstraints;
pub use m003_route_relationships::M003RouteRelationships;
pub use runner::{run_migrations, MigrationResult};
pub use traits::{GraphMigration, Migration, Register};

use crate::repositories::RouteSchema;

/// Create the migrations register for a storage layout.
pub fn create_register(schema: RouteSchema) -> Register<dyn GraphMigration> {
    let register = Register::<dyn GraphMigration>::new().register(M001RouteNodeConstraint);

    match schema {
        RouteSchema::Flat => register,
        RouteSchema::Relational => register
            .register(M002RouteRelationshipConstraints)
            .register(M003RouteRelationships),
    }
}
