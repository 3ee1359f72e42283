use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use todo_core::MemoryPool;
use todo_server::config::Config;
use todo_server::logging::init_logging;
use todo_server::postgres::PgTodoPool;
use todo_server::Pool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::parse();
    init_logging(&config);

    let pool: Pool = match &config.database_url {
        Some(url) => {
            let pg = PgTodoPool::connect(url, config.max_connections, config.acquire_timeout())
                .await
                .context("failed to connect to PostgreSQL")?;
            if let Err(e) = pg.health_check().await {
                tracing::warn!(error = %e, "database health check failed");
            }
            Arc::new(pg)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, todos are kept in memory");
            Arc::new(MemoryPool::with_max_connections(config.max_connections as usize))
        }
    };

    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");
    todo_server::run(listener, pool).await?;
    Ok(())
}
