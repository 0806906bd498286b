//! Macro for convenient Cypher query construction.

/// Macro for inline Cypher queries with optional parameters.
///
/// # Usage
///
/// ```ignore
/// use metro_routes::graph::cypher;
///
/// let query = cypher!(txn, "MATCH (r:Route) RETURN r.Id AS id");
///
/// let query = cypher!(
///     txn,
///     "MATCH (r:Route) WHERE r.OriginStation = $origin AND r.DestinationStation = $destination RETURN r",
///     origin = origin,
///     destination = destination
/// );
///
/// let rows = query.fetch_all().await?;
/// ```
#[macro_export]
macro_rules! cypher {
    // Query without parameters
    ($graph:expr, $query:expr) => {
        $graph.query($query)
    };
    // Query with parameters
    ($graph:expr, $query:expr, $($name:ident = $value:expr),+ $(,)?) => {
        $graph.query($query)$(.param(stringify!($name), $value))+
    };
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::error::AppError;
    use crate::graph::query::QueryExt;
    use crate::graph::row::{Params, RowStream};
    use crate::graph::traits::CypherExecutor;

    #[derive(Default)]
    struct RecordingExecutor {
        seen: Mutex<Vec<(String, Params)>>,
    }

    #[async_trait::async_trait]
    impl CypherExecutor for RecordingExecutor {
        async fn execute_cypher(
            &self,
            cypher: &str,
            params: Params,
        ) -> Result<RowStream<'_>, AppError> {
            self.seen.lock().unwrap().push((cypher.to_string(), params));
            Ok(Box::pin(futures::stream::empty()))
        }

        async fn run_cypher(&self, cypher: &str, params: Params) -> Result<(), AppError> {
            self.seen.lock().unwrap().push((cypher.to_string(), params));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_cypher_macro_no_params() {
        let executor = RecordingExecutor::default();
        cypher!(executor, "MATCH (r:Route) RETURN r").run().await.unwrap();

        let seen = executor.seen.lock().unwrap();
        assert_eq!(seen[0].0, "MATCH (r:Route) RETURN r");
        assert!(seen[0].1.is_empty());
    }

    #[tokio::test]
    async fn test_cypher_macro_binds_named_params() {
        let executor = RecordingExecutor::default();
        let origin = "Central";
        let destination = "Harbor";
        cypher!(
            executor,
            "MATCH (r:Route {OriginStation: $origin, DestinationStation: $destination}) RETURN r",
            origin = origin,
            destination = destination,
        )
        .fetch_all()
        .await
        .unwrap();

        let seen = executor.seen.lock().unwrap();
        assert_eq!(seen[0].1["origin"], serde_json::json!("Central"));
        assert_eq!(seen[0].1["destination"], serde_json::json!("Harbor"));
    }
}
