//! CLI module for the route service.
//!
//! Subcommands:
//! - `init`: Run migrations, ensure constraints and seed an empty store
//! - `serve`: Run the HTTP API
//! - `seed`: Insert synthetic routes

mod init;
mod seed;
mod serve;

use clap::{Parser, Subcommand};
use color_eyre::Result;

use crate::config::Config;
use crate::context::Context;

/// Metro route service
#[derive(Parser)]
#[command(name = "metro-routes")]
#[command(about = "Metro route service - routes stored in a Neo4j graph behind an HTTP API")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run pending migrations, then ensure constraints and seed an empty store
    Init,

    /// Run the HTTP API
    Serve {
        /// Host address to bind to (overrides `server.host`)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides `server.port`)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Insert synthetic routes
    Seed {
        /// Number of routes to generate (defaults to `seed.count`)
        #[arg(long)]
        count: Option<usize>,
    },
}

impl App {
    /// Run the CLI application.
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Init => self.run_init().await,
            Command::Serve { ref host, port } => self.run_serve(host.clone(), port).await,
            Command::Seed { count } => self.run_seed(count).await,
        }
    }

    /// Loads the configuration and opens the graph connection.
    async fn connect(&self) -> Result<Context> {
        let config = Config::load()?;
        tracing::info!(
            schema = %config.routes.schema,
            "Connecting to Neo4j at {}",
            config.neo4j.uri
        );
        let ctx = Context::connect(config).await?;
        Ok(ctx)
    }
}
