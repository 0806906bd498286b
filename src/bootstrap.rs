//! Startup preparation of the route store.

use crate::config::SeedConfig;
use crate::error::AppError;
use crate::graph::GraphClient;
use crate::repositories::RouteRepository;
use crate::seed::seed_routes;

/// What [`bootstrap`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Routes inserted by the seeder; zero when seeding was skipped.
    pub seeded: usize,
}

/// Ensures the identifier constraint, then seeds an empty store when
/// seeding is enabled.
///
/// The constraint is always in place before the first write.
pub async fn bootstrap<C: GraphClient>(
    routes: &RouteRepository<C>,
    seed: &SeedConfig,
) -> Result<BootstrapReport, AppError> {
    routes.create_constraints().await?;

    if !seed.enabled {
        tracing::debug!("Seeding disabled");
        return Ok(BootstrapReport::default());
    }

    let existing = routes.get_all().await?;
    if !existing.is_empty() {
        tracing::info!(routes = existing.len(), "Store already populated, skipping seed");
        return Ok(BootstrapReport::default());
    }

    let seeded = seed_routes(routes, seed.count).await?;
    Ok(BootstrapReport { seeded })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::graph::testing::{row, ScriptedClient};
    use crate::graph::Connection;
    use crate::models::RouteId;
    use crate::repositories::RouteSchema;

    fn repository(client: &ScriptedClient) -> RouteRepository<ScriptedClient> {
        RouteRepository::new(
            Arc::new(Connection::from_client(client.clone())),
            RouteSchema::Relational,
        )
    }

    fn seed(enabled: bool, count: usize) -> SeedConfig {
        SeedConfig { enabled, count }
    }

    #[tokio::test]
    async fn test_constraint_precedes_seed_writes() {
        let client = ScriptedClient::new();

        let report = bootstrap(&repository(&client), &seed(true, 5)).await.unwrap();

        assert_eq!(report.seeded, 5);
        let log = client.statements();
        assert!(log[0].cypher.contains("CREATE CONSTRAINT"));
        assert_eq!(client.statements_matching("CREATE (o)-[:Route").len(), 5);
    }

    #[tokio::test]
    async fn test_populated_store_is_not_seeded() {
        let client = ScriptedClient::new();
        client.on(
            "MATCH (o:Station)-[r:Route]->(d:Station)\n",
            vec![row(&[
                ("id", json!(RouteId::new().to_string())),
                ("origin", json!("A")),
                ("destination", json!("B")),
                ("departure", json!("08:00")),
                ("arrival", json!("08:30")),
                ("active", json!(true)),
            ])],
        );

        let report = bootstrap(&repository(&client), &seed(true, 5)).await.unwrap();

        assert_eq!(report.seeded, 0);
        assert!(client.statements_matching("MERGE (o:Station").is_empty());
    }

    #[tokio::test]
    async fn test_disabled_seed_only_creates_constraint() {
        let client = ScriptedClient::new();

        let report = bootstrap(&repository(&client), &seed(false, 5)).await.unwrap();

        assert_eq!(report, BootstrapReport::default());
        assert_eq!(client.statements().len(), 1);
    }
}
