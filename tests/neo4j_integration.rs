//! Integration tests against a live Neo4j.
//!
//! Run with: `cargo test --features integration --test neo4j_integration`
//! The server is taken from `METRO_TEST_NEO4J_URI` (default
//! `neo4j://localhost:7687`) with `METRO_TEST_NEO4J_USER` /
//! `METRO_TEST_NEO4J_PASSWORD`.

#![cfg(feature = "integration")]

use std::sync::Arc;

use chrono::NaiveTime;
use metro_routes::config::Neo4jConfig;
use metro_routes::graph::{Connection, Params};
use metro_routes::models::Route;
use metro_routes::repositories::{CreateOutcome, RouteRepository, RouteSchema};
use serial_test::serial;

/// Every station created here starts with this prefix so cleanup never
/// touches other data.
const PREFIX: &str = "it-";

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn station(name: &str) -> String {
    format!("{}{}", PREFIX, name)
}

fn test_config() -> Neo4jConfig {
    let defaults = Neo4jConfig::default();
    Neo4jConfig {
        uri: std::env::var("METRO_TEST_NEO4J_URI").unwrap_or(defaults.uri.clone()),
        user: std::env::var("METRO_TEST_NEO4J_USER").unwrap_or(defaults.user.clone()),
        password: std::env::var("METRO_TEST_NEO4J_PASSWORD").unwrap_or_default(),
        ..defaults
    }
}

async fn repository(schema: RouteSchema) -> (Arc<Connection>, RouteRepository) {
    let connection = Arc::new(
        Connection::open(&test_config())
            .await
            .expect("Failed to connect to test database"),
    );
    cleanup(&connection).await;

    let repo = RouteRepository::new(Arc::clone(&connection), schema);
    repo.create_constraints()
        .await
        .expect("Failed to create constraints");
    (connection, repo)
}

async fn cleanup(connection: &Connection) {
    use metro_routes::graph::CypherExecutor;

    let session = connection.session().await.expect("Connection closed");
    let client = session.client();
    let mut params = Params::new();
    params.insert("prefix".to_string(), serde_json::json!(PREFIX));
    let _ = client
        .run_cypher(
            "MATCH (s:Station) WHERE s.Name STARTS WITH $prefix DETACH DELETE s",
            params.clone(),
        )
        .await;
    let _ = client
        .run_cypher(
            "MATCH (r:Route) WHERE r.OriginStation STARTS WITH $prefix DETACH DELETE r",
            params,
        )
        .await;
}

fn ours(routes: Vec<Route>) -> Vec<Route> {
    routes
        .into_iter()
        .filter(|r| r.origin_station.starts_with(PREFIX))
        .collect()
}

#[tokio::test]
#[serial]
async fn test_round_trip_keeps_every_field() {
    for schema in [RouteSchema::Relational, RouteSchema::Flat] {
        let (connection, repo) = repository(schema).await;
        let route = Route::new(
            station("Central"),
            station("Harbor"),
            t(10, 0),
            t(11, 0),
            vec![t(10, 15), t(10, 45)],
        );

        assert_eq!(repo.create(&route).await.unwrap(), CreateOutcome::Inserted);
        let loaded = repo.get_by_id(route.id).await.unwrap();

        assert_eq!(loaded, Some(route), "schema {}", schema);
        cleanup(&connection).await;
        connection.close().await;
    }
}

#[tokio::test]
#[serial]
async fn test_create_twice_keeps_one_route() {
    for schema in [RouteSchema::Relational, RouteSchema::Flat] {
        let (connection, repo) = repository(schema).await;
        let route = Route::new(station("A"), station("B"), t(8, 0), t(8, 30), vec![]);

        assert_eq!(repo.create(&route).await.unwrap(), CreateOutcome::Inserted);
        assert_eq!(
            repo.create(&route).await.unwrap(),
            CreateOutcome::AlreadyExists
        );

        let stored = ours(repo.get_all().await.unwrap());
        assert_eq!(stored.len(), 1, "schema {}", schema);
        cleanup(&connection).await;
        connection.close().await;
    }
}

#[tokio::test]
#[serial]
async fn test_soft_delete_scenario() {
    for schema in [RouteSchema::Relational, RouteSchema::Flat] {
        let (connection, repo) = repository(schema).await;
        let route = Route::new(station("A"), station("B"), t(8, 0), t(8, 30), vec![]);
        repo.create(&route).await.unwrap();

        let listed = ours(repo.get_all().await.unwrap());
        assert_eq!(listed, vec![route.clone()]);

        assert!(repo.delete(route.id).await.unwrap());
        assert_eq!(repo.get_by_id(route.id).await.unwrap(), None);

        let listed = ours(repo.get_all().await.unwrap());
        assert_eq!(listed.len(), 1, "schema {}", schema);
        assert_eq!(listed[0].id, route.id);
        assert!(!listed[0].is_active);

        cleanup(&connection).await;
        connection.close().await;
    }
}

#[tokio::test]
#[serial]
async fn test_update_preserves_identity_and_flag() {
    for schema in [RouteSchema::Relational, RouteSchema::Flat] {
        let (connection, repo) = repository(schema).await;
        let route = Route::new(station("A"), station("B"), t(8, 0), t(8, 30), vec![]);
        repo.create(&route).await.unwrap();
        repo.delete(route.id).await.unwrap();

        let changed = Route {
            origin_station: station("C"),
            destination_station: station("D"),
            departure_time: t(9, 0),
            arrival_time: t(9, 45),
            interlude_times: vec![t(9, 20)],
            is_active: true,
            ..route.clone()
        };
        assert!(repo.update(&changed).await.unwrap());

        let listed = ours(repo.get_all().await.unwrap());
        assert_eq!(listed.len(), 1, "schema {}", schema);
        assert_eq!(listed[0].id, route.id);
        assert_eq!(listed[0].origin_station, station("C"));
        assert_eq!(listed[0].interlude_times, vec![t(9, 20)]);
        assert!(!listed[0].is_active, "update resurrected a deleted route");

        cleanup(&connection).await;
        connection.close().await;
    }
}

#[tokio::test]
#[serial]
async fn test_existence_predicates() {
    for schema in [RouteSchema::Relational, RouteSchema::Flat] {
        let (connection, repo) = repository(schema).await;
        let route = Route::new(station("Central"), station("Harbor"), t(8, 0), t(8, 30), vec![]);
        repo.create(&route).await.unwrap();

        assert!(repo.exists_station(&station("Central")).await.unwrap());
        assert!(!repo.exists_station(&station("Nowhere")).await.unwrap());
        assert!(repo
            .exists_route(&station("Central"), &station("Harbor"))
            .await
            .unwrap());
        assert!(!repo
            .exists_route(&station("Harbor"), &station("Central"))
            .await
            .unwrap());

        cleanup(&connection).await;
        connection.close().await;
    }
}

#[tokio::test]
#[serial]
async fn test_unknown_ids_are_not_errors() {
    let (connection, repo) = repository(RouteSchema::Relational).await;
    let missing = metro_routes::models::RouteId::new();

    assert_eq!(repo.get_by_id(missing).await.unwrap(), None);
    assert!(!repo.delete(missing).await.unwrap());

    connection.close().await;
}
