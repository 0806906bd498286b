//! Migration runner with version tracking.

use crate::cypher;
use crate::error::AppError;
use crate::graph::{AccessMode, GraphClient, QueryExt, Transaction};
use crate::migrations::create_register;
use crate::repositories::RouteSchema;

/// Result of running migrations.
#[derive(Debug, Clone)]
pub struct MigrationResult {
    pub previous_version: u32,
    pub current_version: u32,
    pub applied_migrations: Vec<String>,
}

/// Run every migration registered for `schema` that is newer than the
/// recorded schema version.
pub async fn run_migrations<C>(client: &C, schema: RouteSchema) -> Result<MigrationResult, AppError>
where
    C: GraphClient + 'static,
    for<'a> C::Tx<'a>: 'static,
{
    ensure_schema_version(client).await?;

    let previous_version = get_schema_version(client).await?;
    let register = create_register(schema);

    let (current_version, applied) = register.run_pending(client, previous_version).await?;

    Ok(MigrationResult {
        previous_version,
        current_version,
        applied_migrations: applied,
    })
}

// =============================================================================
// Schema Version (:SchemaVersion node)
// =============================================================================

async fn ensure_schema_version<C: GraphClient>(client: &C) -> Result<(), AppError> {
    let now = chrono::Utc::now().to_rfc3339();
    let txn = client.begin(AccessMode::Write).await?;

    let result = cypher!(
        txn,
        "MERGE (sv:SchemaVersion {id: 'schema_version'})
         ON CREATE SET sv.version = 0, sv.applied_migrations = [],
                       sv.created_at = $now, sv.last_applied_at = $now",
        now = &now
    )
    .run()
    .await;

    finish(txn, result).await
}

async fn get_schema_version<C: GraphClient>(client: &C) -> Result<u32, AppError> {
    let txn = client.begin(AccessMode::Read).await?;
    let row = cypher!(
        txn,
        "MATCH (sv:SchemaVersion {id: 'schema_version'}) RETURN sv.version AS version"
    )
    .fetch_one()
    .await;
    txn.rollback().await?;

    let version = match row? {
        Some(row) => row.get_opt::<i64>("version")?.unwrap_or(0),
        None => 0,
    };
    u32::try_from(version).map_err(|e| AppError::Decode {
        field: "version".to_string(),
        reason: format!("{} is not a schema version: {}", version, e),
    })
}

/// Record `migration_id` as applied and bump the version.
pub(crate) async fn update_schema_version<C: GraphClient>(
    client: &C,
    version: u32,
    migration_id: &str,
) -> Result<(), AppError> {
    let now = chrono::Utc::now().to_rfc3339();
    let txn = client.begin(AccessMode::Write).await?;

    let result = cypher!(
        txn,
        "MATCH (sv:SchemaVersion {id: 'schema_version'})
         SET sv.version = $version,
             sv.applied_migrations = sv.applied_migrations + [$migration_id],
             sv.last_applied_at = $now",
        version = version as i64,
        migration_id = migration_id,
        now = &now
    )
    .run()
    .await;

    finish(txn, result).await
}

async fn finish<T: Transaction>(txn: T, result: Result<(), AppError>) -> Result<(), AppError> {
    match result {
        Ok(()) => txn.commit().await,
        Err(e) => {
            if let Err(rollback) = txn.rollback().await {
                tracing::warn!(error = %rollback, "Rollback failed");
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::QueryErrorKind;
    use crate::graph::testing::{row, ScriptedClient};

    #[tokio::test]
    async fn test_fresh_store_applies_relational_migrations_in_order() {
        let client = ScriptedClient::new();

        let result = run_migrations(&client, RouteSchema::Relational).await.unwrap();

        assert_eq!(result.previous_version, 0);
        assert_eq!(result.current_version, 3);
        assert_eq!(
            result.applied_migrations,
            vec![
                "m001_route_node_constraint",
                "m002_route_relationship_constraints",
                "m003_route_relationships",
            ]
        );

        let updates = client.statements_matching("SET sv.version = $version");
        assert_eq!(updates.len(), 3);
        assert_eq!(updates[2].params["version"], json!(3));
        assert_eq!(updates[2].params["migration_id"], json!("m003_route_relationships"));
    }

    #[tokio::test]
    async fn test_flat_schema_only_needs_node_constraint() {
        let client = ScriptedClient::new();

        let result = run_migrations(&client, RouteSchema::Flat).await.unwrap();

        assert_eq!(result.applied_migrations, vec!["m001_route_node_constraint"]);
        assert!(client.statements_matching("MATCH (r:Route)").is_empty());
    }

    #[tokio::test]
    async fn test_recorded_version_skips_applied_migrations() {
        let client = ScriptedClient::new();
        client.on("RETURN sv.version AS version", vec![row(&[("version", json!(2))])]);

        let result = run_migrations(&client, RouteSchema::Relational).await.unwrap();

        assert_eq!(result.previous_version, 2);
        assert_eq!(result.applied_migrations, vec!["m003_route_relationships"]);
        assert!(client.statements_matching("CREATE CONSTRAINT").is_empty());
    }

    #[tokio::test]
    async fn test_failed_migration_rolls_back_and_keeps_earlier_versions() {
        let client = ScriptedClient::new();
        client.fail("DELETE r", QueryErrorKind::Other);

        let err = run_migrations(&client, RouteSchema::Relational)
            .await
            .unwrap_err();

        assert_eq!(err.query_kind(), Some(QueryErrorKind::Other));
        assert_eq!(client.statements_matching("SET sv.version = $version").len(), 2);
        assert_eq!(client.rollbacks(), 2);
    }

    #[tokio::test]
    async fn test_negative_version_is_a_decode_error() {
        let client = ScriptedClient::new();
        client.on("RETURN sv.version AS version", vec![row(&[("version", json!(-1))])]);

        let err = run_migrations(&client, RouteSchema::Flat).await.unwrap_err();

        assert!(matches!(err, AppError::Decode { ref field, .. } if field == "version"));
        assert!(client.statements_matching("CREATE CONSTRAINT").is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_version_is_not_treated_as_fresh() {
        let client = ScriptedClient::new();
        client.on("RETURN sv.version AS version", vec![row(&[("version", json!("two"))])]);

        let err = run_migrations(&client, RouteSchema::Relational)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Decode { .. }));
        assert!(client.statements_matching("CREATE CONSTRAINT").is_empty());
        assert!(client.statements_matching("SET sv.version = $version").is_empty());
    }
}
