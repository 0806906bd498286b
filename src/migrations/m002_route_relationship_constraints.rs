//! Station identity and unique identifier on `:Route` relationships.

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::AppError;
use crate::graph::{CypherExecutor, Query};
use crate::migrations::Migration;

pub struct M002RouteRelationshipConstraints;

impl Migration for M002RouteRelationshipConstraints {
    type Context = dyn CypherExecutor + Sync;

    fn id(&self) -> &'static str {
        "m002_route_relationship_constraints"
    }
    fn version(&self) -> u32 {
        2
    }
    fn description(&self) -> &'static str {
        "Unique Station names and unique Id on Route relationships"
    }

    fn up<'a>(&'a self, ctx: &'a Self::Context) -> BoxFuture<'a, Result<(), AppError>> {
        async move {
            Query::new(
                ctx,
                "CREATE CONSTRAINT station_name_unique IF NOT EXISTS
                 FOR (s:Station) REQUIRE s.Name IS UNIQUE",
            )
            .run()
            .await?;

            Query::new(
                ctx,
                "CREATE CONSTRAINT route_relationship_id_unique IF NOT EXISTS
                 FOR ()-[r:Route]-() REQUIRE r.Id IS UNIQUE",
            )
            .run()
            .await
        }
        .boxed()
    }
}
