//! HTTP server command handler.

use std::net::SocketAddr;

use color_eyre::Result;

use crate::api;
use crate::bootstrap::bootstrap;
use crate::di::FromRef;
use crate::repositories::RouteRepository;
use crate::services::RouteService;

use super::App;

impl App {
    /// Bootstrap the store and serve the route API until Ctrl-C.
    pub async fn run_serve(&self, host: Option<String>, port: Option<u16>) -> Result<()> {
        tracing::info!("Starting metro route service");

        let ctx = self.connect().await?;

        let routes: RouteRepository = RouteRepository::from_ref(&ctx);
        let report = bootstrap(&routes, &ctx.config.seed).await?;
        if report.seeded > 0 {
            tracing::info!(seeded = report.seeded, "Seeded empty route store");
        }

        let service: RouteService = RouteService::from_ref(&ctx);
        let app = api::router(service);

        let bind = ctx
            .config
            .server
            .clone()
            .with_overrides(host, port)
            .bind_address();
        let addr: SocketAddr = bind
            .parse()
            .map_err(|e| color_eyre::eyre::eyre!("Invalid address {}: {}", bind, e))?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Failed to bind to {}: {}", addr, e))?;

        tracing::info!("Route API listening on http://{}", addr);

        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        ctx.connection.close().await;

        served.map_err(|e| {
            tracing::error!(error = %e, "HTTP server error");
            color_eyre::eyre::eyre!("HTTP server error: {}", e)
        })?;

        tracing::info!("Route API stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
