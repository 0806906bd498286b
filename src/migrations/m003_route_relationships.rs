//! Converts flat `:Route` nodes into `Station-[:Route]->Station` relationships.
//!
//! Nodes missing either station name are left in place. Running it again
//! finds no `:Route` nodes and does nothing.

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::AppError;
use crate::graph::{CypherExecutor, Query};
use crate::migrations::Migration;

pub struct M003RouteRelationships;

impl Migration for M003RouteRelationships {
    type Context = dyn CypherExecutor + Sync;

    fn id(&self) -> &'static str {
        "m003_route_relationships"
    }
    fn version(&self) -> u32 {
        3
    }
    fn description(&self) -> &'static str {
        "Move Route nodes onto relationships between Station nodes"
    }

    fn up<'a>(&'a self, ctx: &'a Self::Context) -> BoxFuture<'a, Result<(), AppError>> {
        async move {
            Query::new(
                ctx,
                "MATCH (r:Route)
                 WHERE r.OriginStation IS NOT NULL AND r.DestinationStation IS NOT NULL
                 MERGE (o:Station {Name: r.OriginStation})
                 MERGE (d:Station {Name: r.DestinationStation})
                 CREATE (o)-[:Route {
                     Id: r.Id,
                     DepartureTime: r.DepartureTime,
                     ArrivalTime: r.ArrivalTime,
                     InterludeTimes: coalesce(r.InterludeTimes, []),
                     IsActive: coalesce(r.IsActive, true)
                 }]->(d)
                 DELETE r",
            )
            .run()
            .await
        }
        .boxed()
    }
}
