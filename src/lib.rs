//! Metro route service
//!
//! Route records persisted in a Neo4j graph, either as flat `:Route` nodes or
//! as `:Route` relationships between `:Station` nodes, served over HTTP.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod context;
pub mod di;
pub mod error;
pub mod graph;
pub mod migrations;
pub mod models;
pub mod repositories;
pub mod seed;
pub mod services;

// Re-export FromRef at crate root for di-macros generated code
pub use di::FromRef;
