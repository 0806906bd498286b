//! Unique identifier on `:Route` nodes.

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::AppError;
use crate::graph::{CypherExecutor, Query};
use crate::migrations::Migration;

pub struct M001RouteNodeConstraint;

impl Migration for M001RouteNodeConstraint {
    type Context = dyn CypherExecutor + Sync;

    fn id(&self) -> &'static str {
        "m001_route_node_constraint"
    }
    fn version(&self) -> u32 {
        1
    }
    fn description(&self) -> &'static str {
        "Unique Id on Route nodes"
    }

    fn up<'a>(&'a self, ctx: &'a Self::Context) -> BoxFuture<'a, Result<(), AppError>> {
        async move {
            Query::new(
                ctx,
                "CREATE CONSTRAINT route_id_unique IF NOT EXISTS
                 FOR (r:Route) REQUIRE r.Id IS UNIQUE",
            )
            .run()
            .await
        }
        .boxed()
    }
}
