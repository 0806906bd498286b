//! Seed command handler.

use color_eyre::Result;

use crate::di::FromRef;
use crate::repositories::RouteRepository;
use crate::seed::seed_routes;

use super::App;

impl App {
    /// Insert `count` synthetic routes, whether or not the store is empty.
    pub async fn run_seed(&self, count: Option<usize>) -> Result<()> {
        let ctx = self.connect().await?;
        let count = count.unwrap_or(ctx.config.seed.count);

        let routes: RouteRepository = RouteRepository::from_ref(&ctx);
        routes.create_constraints().await?;
        let inserted = seed_routes(&routes, count).await?;

        println!("Inserted {} of {} routes", inserted, count);

        ctx.connection.close().await;
        Ok(())
    }
}
