//! Route repository mapping routes to and from the graph.

use std::sync::Arc;

use crate::context::Context;
use crate::di::FromContext;
use crate::error::AppError;
use crate::graph::backends::neo4j::Neo4jClient;
use crate::graph::{Connection, CypherExecutor, GraphClient, Query, QueryExt, Row};
use crate::models::time::{format_time, parse_time};
use crate::models::{Route, RouteId};
use crate::repositories::RouteSchema;

/// Result of [`RouteRepository::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Inserted,
    /// A route with the same identifier is already stored; nothing was written.
    AlreadyExists,
}

/// Repository for route persistence.
///
/// Every mutating call runs in exactly one write transaction and every
/// read in one read transaction, each on its own session.
#[derive(FromContext)]
#[from_context(Context = "Context<C>")]
pub struct RouteRepository<C: GraphClient = Neo4jClient> {
    connection: Arc<Connection<C>>,
    schema: RouteSchema,
}

impl<C: GraphClient> Clone for RouteRepository<C> {
    fn clone(&self) -> Self {
        Self {
            connection: Arc::clone(&self.connection),
            schema: self.schema,
        }
    }
}

impl<C: GraphClient> RouteRepository<C> {
    pub fn new(connection: Arc<Connection<C>>, schema: RouteSchema) -> Self {
        Self { connection, schema }
    }

    pub fn schema(&self) -> RouteSchema {
        self.schema
    }

    /// Ensure the identifier uniqueness constraint exists. Idempotent.
    pub async fn create_constraints(&self) -> Result<(), AppError> {
        let cypher = self.schema.constraint();
        let session = self.connection.session().await?;
        session
            .write(move |tx| Box::pin(async move { tx.query(cypher).run().await }))
            .await?;

        tracing::info!(schema = %self.schema, "Route identifier constraint ensured");
        Ok(())
    }

    /// Store a new route.
    ///
    /// An identifier that is already taken is reported as
    /// [`CreateOutcome::AlreadyExists`] instead of an error.
    pub async fn create(&self, route: &Route) -> Result<CreateOutcome, AppError> {
        let cypher = self.schema.create();
        let route = route.clone();
        let id = route.id;

        let session = self.connection.session().await?;
        let result = session
            .write(move |tx| {
                Box::pin(async move {
                    bind_fields(tx.query(cypher), &route)
                        .param("active", route.is_active)
                        .run()
                        .await
                })
            })
            .await;

        match result {
            Ok(()) => {
                tracing::debug!(%id, "Route created");
                Ok(CreateOutcome::Inserted)
            }
            Err(e) if e.is_constraint_violation() => {
                tracing::warn!(%id, "Route already exists, skipping create");
                Ok(CreateOutcome::AlreadyExists)
            }
            Err(e) => Err(e),
        }
    }

    /// All stored routes, including soft-deleted ones.
    pub async fn get_all(&self) -> Result<Vec<Route>, AppError> {
        let cypher = self.schema.get_all();
        let session = self.connection.session().await?;
        let rows = session
            .read(move |tx| Box::pin(async move { tx.query(cypher).fetch_all().await }))
            .await;

        let rows = match rows {
            Ok(rows) => rows,
            Err(e) if e.is_not_found() => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        rows.iter().map(row_to_route).collect()
    }

    /// Find an active route by ID. Soft-deleted routes are `None`.
    pub async fn get_by_id(&self, id: RouteId) -> Result<Option<Route>, AppError> {
        let cypher = self.schema.get_by_id();
        let session = self.connection.session().await?;
        let row = session
            .read(move |tx| {
                Box::pin(async move {
                    tx.query(cypher)
                        .param("id", id.to_string())
                        .fetch_one()
                        .await
                })
            })
            .await;

        let row = match row {
            Ok(row) => row,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        match row {
            Some(row) => {
                let route = row_to_route(&row)?;
                Ok(route.is_active.then_some(route))
            }
            None => Ok(None),
        }
    }

    /// Replace the mutable fields of a stored route.
    ///
    /// The identifier and active flag are never written. Returns whether a
    /// route with `route.id` was found.
    pub async fn update(&self, route: &Route) -> Result<bool, AppError> {
        let cypher = self.schema.update();
        let route = route.clone();

        let session = self.connection.session().await?;
        let row = session
            .write(move |tx| {
                Box::pin(async move { bind_fields(tx.query(cypher), &route).fetch_one().await })
            })
            .await?;

        matched(row)
    }

    /// Soft delete: sets the active flag to false. Returns whether a route
    /// with `id` was found.
    pub async fn delete(&self, id: RouteId) -> Result<bool, AppError> {
        let cypher = self.schema.soft_delete();
        let session = self.connection.session().await?;
        let row = session
            .write(move |tx| {
                Box::pin(async move {
                    tx.query(cypher)
                        .param("id", id.to_string())
                        .fetch_one()
                        .await
                })
            })
            .await?;

        let found = matched(row)?;
        if found {
            tracing::debug!(%id, "Route deactivated");
        }
        Ok(found)
    }

    /// Whether any stored route starts or ends at `name`.
    pub async fn exists_station(&self, name: &str) -> Result<bool, AppError> {
        let cypher = self.schema.exists_station();
        let name = name.to_string();
        let session = self.connection.session().await?;
        let row = session
            .read(move |tx| {
                Box::pin(async move { tx.query(cypher).param("name", name).fetch_one().await })
            })
            .await?;

        found(row)
    }

    /// Whether a route from `origin` to `destination` is stored.
    pub async fn exists_route(&self, origin: &str, destination: &str) -> Result<bool, AppError> {
        let cypher = self.schema.exists_route();
        let origin = origin.to_string();
        let destination = destination.to_string();
        let session = self.connection.session().await?;
        let row = session
            .read(move |tx| {
                Box::pin(async move {
                    tx.query(cypher)
                        .param("origin", origin)
                        .param("destination", destination)
                        .fetch_one()
                        .await
                })
            })
            .await?;

        found(row)
    }
}

/// Binds every mapped field except the active flag.
fn bind_fields<'a, E: CypherExecutor>(query: Query<'a, E>, route: &Route) -> Query<'a, E> {
    let interludes: Vec<String> = route
        .interlude_times
        .iter()
        .map(|t| format_time(*t))
        .collect();

    query
        .param("id", route.id.to_string())
        .param("origin", &route.origin_station)
        .param("destination", &route.destination_station)
        .param("departure", format_time(route.departure_time))
        .param("arrival", format_time(route.arrival_time))
        .param("interludes", interludes)
}

fn row_to_route(row: &Row) -> Result<Route, AppError> {
    let raw_id: String = row.get("id")?;
    let id = raw_id.parse::<RouteId>().map_err(|e| AppError::Decode {
        field: "id".to_string(),
        reason: e.to_string(),
    })?;

    let interludes: Vec<String> = row.get_opt("interludes")?.unwrap_or_default();
    let interlude_times = interludes
        .iter()
        .map(|raw| decode_time("interludes", raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Route {
        id,
        origin_station: row.get("origin")?,
        destination_station: row.get("destination")?,
        departure_time: decode_time("departure", &row.get::<String>("departure")?)?,
        arrival_time: decode_time("arrival", &row.get::<String>("arrival")?)?,
        interlude_times,
        is_active: row.get_opt("active")?.unwrap_or(true),
    })
}

fn decode_time(field: &str, raw: &str) -> Result<chrono::NaiveTime, AppError> {
    parse_time(raw).map_err(|reason| AppError::Decode {
        field: field.to_string(),
        reason,
    })
}

fn matched(row: Option<Row>) -> Result<bool, AppError> {
    match row {
        Some(row) => Ok(row.get::<i64>("matched")? > 0),
        None => Ok(false),
    }
}

fn found(row: Option<Row>) -> Result<bool, AppError> {
    match row {
        Some(row) => Ok(row.get_opt::<bool>("found")?.unwrap_or(false)),
        None => Ok(false),
    }
}
