//! Graph abstraction layer for backend-agnostic database access.
//!
//! # Architecture
//!
//! - [`CypherExecutor`] - Execute Cypher queries
//! - [`Transaction`] - Transaction lifecycle (commit/rollback)
//! - [`GraphClient`] - Connection pool and transaction creation
//! - [`Connection`] / [`Session`] - Process-wide handle and scoped units of work
//!
//! # Usage
//!
//! ```ignore
//! use metro_routes::graph::{Connection, QueryExt};
//!
//! let connection = Connection::open(&config.neo4j).await?;
//! let session = connection.session().await?;
//!
//! let rows = session
//!     .read(|tx| Box::pin(async move {
//!         tx.query("MATCH (r:Route) WHERE r.Id = $id RETURN r.Id AS id")
//!             .param("id", id)
//!             .fetch_all()
//!             .await
//!     }))
//!     .await?;
//!
//! connection.close().await;
//! ```

mod connection;
mod macros;
mod query;
mod row;
mod traits;

pub mod backends;

#[cfg(test)]
pub(crate) mod testing;

pub use connection::{Connection, Session};
pub use query::{Query, QueryExt};
pub use row::{Params, Row, RowStream};
pub use traits::{AccessMode, CypherExecutor, GraphClient, Transaction};

// Re-export macro (defined at crate root via #[macro_export])
#[doc(inline)]
pub use crate::cypher;
