//! Neo4j backend implementation over the `neo4rs` Bolt driver.
//!
//! # Example
//!
//! ```ignore
//! use metro_routes::graph::backends::neo4j::Neo4jClient;
//! use metro_routes::graph::{AccessMode, GraphClient, QueryExt, Transaction};
//!
//! let client = Neo4jClient::connect(&config.neo4j).await?;
//! let txn = client.begin(AccessMode::Write).await?;
//! txn.query("MERGE (s:Station {Name: $name})").param("name", "Central").run().await?;
//! txn.commit().await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use neo4rs::{BoltList, BoltMap, BoltNull, BoltString, BoltType, ConfigBuilder, Graph, Txn};
use serde_json::Value as JsonValue;
use tokio::sync::Mutex;

use crate::config::Neo4jConfig;
use crate::error::{AppError, QueryErrorKind};
use crate::graph::row::{Params, Row, RowStream};
use crate::graph::traits::{AccessMode, CypherExecutor, GraphClient, Transaction};

/// Neo4j graph client.
///
/// Wraps the pooled `neo4rs::Graph`. Cheap to clone - the pool is shared.
#[derive(Clone)]
pub struct Neo4jClient {
    graph: Graph,
}

impl Neo4jClient {
    /// Opens a connection pool using the given settings.
    ///
    /// The pool connects lazily; authentication and reachability problems
    /// surface as [`AppError::Connection`] on first use or here, depending
    /// on the driver.
    pub async fn connect(config: &Neo4jConfig) -> Result<Self, AppError> {
        let mut builder = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .max_connections(config.max_connections);
        if let Some(db) = config.database.as_deref() {
            builder = builder.db(db);
        }
        let driver_config = builder
            .build()
            .map_err(|e| AppError::Connection(format!("Invalid Neo4j settings: {}", e)))?;

        let graph = Graph::connect(driver_config)
            .await
            .map_err(|e| AppError::Connection(format!("{} ({})", e, config.uri)))?;

        tracing::info!(uri = %config.uri, "Connected to Neo4j");
        Ok(Self { graph })
    }
}

#[async_trait]
impl CypherExecutor for Neo4jClient {
    async fn execute_cypher(
        &self,
        cypher: &str,
        params: Params,
    ) -> Result<RowStream<'_>, AppError> {
        tracing::debug!(cypher, "auto-commit query");
        let mut stream = self
            .graph
            .execute(build_query(cypher, params))
            .await
            .map_err(|e| translate(e, cypher))?;

        let mut rows = Vec::new();
        while let Some(row) = stream.next().await.map_err(|e| translate(e, cypher))? {
            rows.push(convert_row(row, cypher));
        }
        Ok(Box::pin(futures::stream::iter(rows)))
    }

    async fn run_cypher(&self, cypher: &str, params: Params) -> Result<(), AppError> {
        tracing::debug!(cypher, "auto-commit statement");
        self.graph
            .run(build_query(cypher, params))
            .await
            .map_err(|e| translate(e, cypher))
    }
}

#[async_trait]
impl GraphClient for Neo4jClient {
    type Tx<'a> = Neo4jTransaction;

    /// Starts an explicit transaction tagged with `mode`.
    ///
    /// neo4rs 0.8 has no read-only transaction, so `start_txn` is used for
    /// both modes and the server would accept writes inside a read. The tag
    /// only drives logging and how `Session` ends the transaction.
    async fn begin(&self, mode: AccessMode) -> Result<Self::Tx<'_>, AppError> {
        let txn = self
            .graph
            .start_txn()
            .await
            .map_err(|e| translate(e, "BEGIN"))?;
        tracing::debug!(%mode, "transaction started");
        Ok(Neo4jTransaction {
            txn: Mutex::new(Some(txn)),
            mode,
        })
    }
}

/// An explicit Neo4j transaction.
///
/// Must be committed or rolled back; dropping it unfinished logs a warning
/// and leaves the server to time the transaction out.
pub struct Neo4jTransaction {
    txn: Mutex<Option<Txn>>,
    mode: AccessMode,
}

impl Neo4jTransaction {
    fn finish(mut self) -> Result<Txn, AppError> {
        self.txn
            .get_mut()
            .take()
            .ok_or_else(|| AppError::Internal("Transaction already finished".to_string()))
    }
}

#[async_trait]
impl CypherExecutor for Neo4jTransaction {
    async fn execute_cypher(
        &self,
        cypher: &str,
        params: Params,
    ) -> Result<RowStream<'_>, AppError> {
        tracing::debug!(cypher, mode = %self.mode, "query");
        let mut guard = self.txn.lock().await;
        let txn = guard
            .as_mut()
            .ok_or_else(|| AppError::Internal("Transaction already finished".to_string()))?;

        let mut stream = txn
            .execute(build_query(cypher, params))
            .await
            .map_err(|e| translate(e, cypher))?;

        let mut rows = Vec::new();
        while let Some(row) = stream
            .next(txn.handle())
            .await
            .map_err(|e| translate(e, cypher))?
        {
            rows.push(convert_row(row, cypher));
        }
        Ok(Box::pin(futures::stream::iter(rows)))
    }

    async fn run_cypher(&self, cypher: &str, params: Params) -> Result<(), AppError> {
        tracing::debug!(cypher, mode = %self.mode, "statement");
        let mut guard = self.txn.lock().await;
        let txn = guard
            .as_mut()
            .ok_or_else(|| AppError::Internal("Transaction already finished".to_string()))?;
        txn.run(build_query(cypher, params))
            .await
            .map_err(|e| translate(e, cypher))
    }
}

#[async_trait]
impl Transaction for Neo4jTransaction {
    fn mode(&self) -> AccessMode {
        self.mode
    }

    async fn commit(self) -> Result<(), AppError> {
        self.finish()?
            .commit()
            .await
            .map_err(|e| translate(e, "COMMIT"))
    }

    async fn rollback(self) -> Result<(), AppError> {
        self.finish()?
            .rollback()
            .await
            .map_err(|e| translate(e, "ROLLBACK"))
    }
}

impl Drop for Neo4jTransaction {
    fn drop(&mut self) {
        if self.txn.get_mut().is_some() {
            tracing::warn!(
                mode = %self.mode,
                "Transaction dropped without commit or rollback"
            );
        }
    }
}

// ----------------------------------------------------------------------------
// Conversions
// ----------------------------------------------------------------------------

/// Maps a driver error onto [`AppError`], classifying server failures by
/// their Neo4j status code.
fn translate(err: neo4rs::Error, cypher: &str) -> AppError {
    match err {
        neo4rs::Error::Neo4j(e) => AppError::Query {
            kind: QueryErrorKind::from_code(e.code()),
            code: e.code().to_string(),
            message: e.message().to_string(),
            query: cypher.to_string(),
        },
        other => AppError::Connection(other.to_string()),
    }
}

fn build_query(cypher: &str, params: Params) -> neo4rs::Query {
    params
        .into_iter()
        .fold(neo4rs::query(cypher), |q, (name, value)| {
            q.param(&name, to_bolt(value))
        })
}

fn convert_row(row: neo4rs::Row, cypher: &str) -> Result<Row, AppError> {
    row.to::<HashMap<String, JsonValue>>()
        .map(Row::new)
        .map_err(|e| AppError::Decode {
            field: "row".to_string(),
            reason: format!("{} (query: {})", e, cypher),
        })
}

fn to_bolt(value: JsonValue) -> BoltType {
    match value {
        JsonValue::Null => BoltType::Null(BoltNull),
        JsonValue::Bool(b) => b.into(),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => i.into(),
            None => n.as_f64().unwrap_or_default().into(),
        },
        JsonValue::String(s) => s.into(),
        JsonValue::Array(items) => {
            let mut list = BoltList::with_capacity(items.len());
            for item in items {
                list.push(to_bolt(item));
            }
            BoltType::List(list)
        }
        JsonValue::Object(fields) => {
            let mut map = BoltMap::with_capacity(fields.len());
            for (key, item) in fields {
                map.put(BoltString::from(key.as_str()), to_bolt(item));
            }
            BoltType::Map(map)
        }
    }
}
