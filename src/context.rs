//! Application context providing dependency injection root.

use std::sync::Arc;

use crate::config::Config;
use crate::di::{Context as ContextDerive, FromRef};
use crate::error::AppError;
use crate::graph::backends::neo4j::Neo4jClient;
use crate::graph::{Connection, GraphClient};
use crate::repositories::RouteSchema;

/// Root application context for dependency injection.
///
/// The Context holds all shared dependencies and uses `#[derive(Context)]`
/// to generate `FromRef` implementations for each field. It is generic over
/// the graph client so the same wiring runs against a scripted client in
/// tests.
#[derive(ContextDerive)]
pub struct Context<C: GraphClient = Neo4jClient> {
    /// The process-wide graph connection.
    pub connection: Arc<Connection<C>>,
    /// Application configuration.
    pub config: Arc<Config>,
}

impl<C: GraphClient> Clone for Context<C> {
    fn clone(&self) -> Self {
        Self {
            connection: Arc::clone(&self.connection),
            config: Arc::clone(&self.config),
        }
    }
}

impl<C: GraphClient> Context<C> {
    /// Creates a new context with the given dependencies.
    pub fn new(connection: Connection<C>, config: Config) -> Self {
        Self {
            connection: Arc::new(connection),
            config: Arc::new(config),
        }
    }
}

impl Context<Neo4jClient> {
    /// Opens the Neo4j connection described by `config`.
    pub async fn connect(config: Config) -> Result<Self, AppError> {
        let connection = Connection::open(&config.neo4j).await?;
        Ok(Self::new(connection, config))
    }
}

impl<C: GraphClient> FromRef<Context<C>> for RouteSchema {
    fn from_ref(ctx: &Context<C>) -> Self {
        ctx.config.routes.schema
    }
}
