//! Process-wide connection handle and scoped sessions.

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::RwLock;

use crate::config::Neo4jConfig;
use crate::error::AppError;
use crate::graph::backends::neo4j::Neo4jClient;
use crate::graph::traits::{AccessMode, GraphClient, Transaction};

/// Owns the single long-lived client for the process.
///
/// Sessions are minted per unit of work with [`session`](Connection::session);
/// [`close`](Connection::close) releases the client once at shutdown.
pub struct Connection<C: GraphClient = Neo4jClient> {
    client: RwLock<Option<Arc<C>>>,
}

impl Connection<Neo4jClient> {
    /// Connects to Neo4j with the given settings.
    pub async fn open(config: &Neo4jConfig) -> Result<Self, AppError> {
        let client = Neo4jClient::connect(config).await?;
        Ok(Self::from_client(client))
    }
}

impl<C: GraphClient> Connection<C> {
    /// Wraps an already constructed client.
    pub fn from_client(client: C) -> Self {
        Self {
            client: RwLock::new(Some(Arc::new(client))),
        }
    }

    /// A handle with no client behind it. Sessions fail with
    /// [`AppError::NotConnected`]; closing it is a no-op.
    pub fn unopened() -> Self {
        Self {
            client: RwLock::new(None),
        }
    }

    /// Mints a session sharing the underlying client.
    pub async fn session(&self) -> Result<Session<C>, AppError> {
        let client = self.client.read().await;
        client
            .as_ref()
            .map(|client| Session {
                client: Arc::clone(client),
            })
            .ok_or(AppError::NotConnected)
    }

    /// Releases the client. Safe to call repeatedly.
    ///
    /// Sessions already handed out keep their clone of the client until
    /// they are dropped.
    pub async fn close(&self) {
        if self.client.write().await.take().is_some() {
            tracing::info!("Graph connection closed");
        }
    }

    pub async fn is_open(&self) -> bool {
        self.client.read().await.is_some()
    }
}

/// A short-lived handle for one unit of work.
///
/// Each call to [`read`](Session::read) or [`write`](Session::write) runs
/// inside its own transaction, which is finished on every exit path.
pub struct Session<C: GraphClient> {
    client: Arc<C>,
}

impl<C: GraphClient> Session<C> {
    /// Runs `f` in a read transaction and always rolls it back.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let rows = session
    ///     .read(|tx| Box::pin(async move { tx.query("MATCH (r:Route) RETURN r.Id AS id").fetch_all().await }))
    ///     .await?;
    /// ```
    pub async fn read<'s, F, R>(&'s self, f: F) -> Result<R, AppError>
    where
        F: for<'t> FnOnce(&'t C::Tx<'s>) -> BoxFuture<'t, Result<R, AppError>> + Send,
        R: Send,
    {
        let tx = self.client.begin(AccessMode::Read).await?;
        let result = f(&tx).await;
        if let Err(e) = tx.rollback().await {
            tracing::warn!(error = %e, "Failed to release read transaction");
        }
        result
    }

    /// Runs `f` in a write transaction, committing on `Ok` and rolling back
    /// on `Err`.
    pub async fn write<'s, F, R>(&'s self, f: F) -> Result<R, AppError>
    where
        F: for<'t> FnOnce(&'t C::Tx<'s>) -> BoxFuture<'t, Result<R, AppError>> + Send,
        R: Send,
    {
        let tx = self.client.begin(AccessMode::Write).await?;
        match f(&tx).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "Rollback failed");
                }
                Err(e)
            }
        }
    }

    /// The client this session runs against.
    pub fn client(&self) -> &C {
        &self.client
    }
}
