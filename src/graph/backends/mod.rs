//! Backend implementations for graph databases.
//!
//! Each backend implements the core traits from [`crate::graph::traits`]:
//!
//! - [`CypherExecutor`](crate::graph::CypherExecutor) for the client and its transactions
//! - [`Transaction`](crate::graph::Transaction) for the transaction type
//! - [`GraphClient`](crate::graph::GraphClient) for the client
//!
//! | Backend | Module |
//! |---------|--------|
//! | Neo4j (Bolt) | [`neo4j`] |

pub mod neo4j;
