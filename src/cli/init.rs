//! Init command handler.

use color_eyre::Result;

use crate::bootstrap::bootstrap;
use crate::di::FromRef;
use crate::migrations::run_migrations;
use crate::repositories::RouteRepository;

use super::App;

impl App {
    /// Run migrations, then bootstrap constraints and seed data.
    pub async fn run_init(&self) -> Result<()> {
        let ctx = self.connect().await?;
        let schema = ctx.config.routes.schema;

        tracing::info!("Running migrations...");
        let session = ctx.connection.session().await?;
        let result = run_migrations(session.client(), schema)
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Migration failed: {}", e))?;
        drop(session);

        if result.applied_migrations.is_empty() {
            tracing::info!(
                "Schema already at v{}, no migrations needed",
                result.current_version
            );
        } else {
            tracing::info!(
                "Migrations complete: v{} -> v{}, applied: {:?}",
                result.previous_version,
                result.current_version,
                result.applied_migrations
            );
        }

        let routes: RouteRepository = RouteRepository::from_ref(&ctx);
        let report = bootstrap(&routes, &ctx.config.seed).await?;
        tracing::info!(seeded = report.seeded, "Route store ready");

        ctx.connection.close().await;
        Ok(())
    }
}
