//! Migration traits and registry.

use futures::future::BoxFuture;

use crate::error::AppError;
use crate::graph::{AccessMode, CypherExecutor, GraphClient, Transaction as _};
use crate::migrations::runner::update_schema_version;

// =============================================================================
// Migration Trait
// =============================================================================

/// Base migration trait with explicit lifetime-bounded future.
/// Uses BoxFuture to avoid `'static` requirements from `#[async_trait]`.
pub trait Migration: Send + Sync {
    type Context: ?Sized + Sync;

    fn id(&self) -> &'static str;
    fn version(&self) -> u32;
    fn description(&self) -> &'static str;
    fn up<'a>(&'a self, ctx: &'a Self::Context) -> BoxFuture<'a, Result<(), AppError>>;
}

/// A migration that only needs to run Cypher.
pub trait GraphMigration: Migration<Context = dyn CypherExecutor + Sync> {}
impl<T: Migration<Context = dyn CypherExecutor + Sync>> GraphMigration for T {}

// =============================================================================
// Migration Registry
// =============================================================================

pub struct Register<T: ?Sized> {
    migrations: Vec<Box<T>>,
}

impl Register<dyn GraphMigration> {
    pub fn new() -> Self {
        Self {
            migrations: Vec::new(),
        }
    }

    pub fn register(mut self, migration: impl GraphMigration + 'static) -> Self {
        self.migrations.push(Box::new(migration));
        self
    }

    /// Run all pending migrations above `current_version`.
    ///
    /// Each migration runs in its own write transaction. The schema version
    /// is recorded in a separate transaction after every commit, so a later
    /// failure keeps the earlier migrations marked as applied.
    /// Returns (new_version, applied_migration_ids).
    pub async fn run_pending<C>(
        &self,
        client: &C,
        current_version: u32,
    ) -> Result<(u32, Vec<String>), AppError>
    where
        C: GraphClient + 'static,
        for<'a> C::Tx<'a>: 'static,
    {
        let mut applied = vec![];
        let mut new_version = current_version;

        for migration in &self.migrations {
            if migration.version() <= current_version {
                continue;
            }

            tracing::info!(
                "Applying migration {} (v{}): {}",
                migration.id(),
                migration.version(),
                migration.description()
            );

            let txn = client.begin(AccessMode::Write).await?;
            match migration.up(&txn).await {
                Ok(()) => txn.commit().await?,
                Err(e) => {
                    tracing::error!("Migration {} failed: {}", migration.id(), e);
                    txn.rollback().await?;
                    return Err(e);
                }
            }

            update_schema_version(client, migration.version(), migration.id()).await?;
            new_version = migration.version();
            applied.push(migration.id().to_string());
        }

        Ok((new_version, applied))
    }
}

impl Default for Register<dyn GraphMigration> {
    fn default() -> Self {
        Self::new()
    }
}
