//! Serves the task board JSON API.
//!
//! Usage:
//!
//! ```text
//! taskboard-server [--bind 127.0.0.1:8080] [--database-url postgres://...]
//! ```
//!
//! Without a database URL, tasks are kept in memory for the lifetime of the
//! process. With one, the `tasks` table from `migrations/` must already
//! exist.

use clap::Parser;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use std::sync::Arc;
use taskboard::config::{ConfigError, ServerCliArgs, ServerConfig};
use taskboard::http::{AppState, router};
use taskboard::task::{
    adapters::{memory::InMemoryTaskRepository, postgres::PostgresTaskRepository},
    ports::TaskRepository,
    services::TaskBoardService,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build database pool: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
    #[error("server stopped: {0}")]
    Serve(std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = ServerCliArgs::parse();
    let config = ServerConfig::load(&cli).map_err(ServerError::from)?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if let Some(url) = config.database_url.as_deref() {
        let manager = ConnectionManager::<PgConnection>::new(url);
        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .build(manager)
            .map_err(ServerError::from)?;
        tracing::info!(pool_size = config.max_pool_size, "using PostgreSQL task store");
        serve(&config, PostgresTaskRepository::new(pool)).await?;
    } else {
        tracing::info!("using in-memory task store");
        serve(&config, InMemoryTaskRepository::new()).await?;
    }
    Ok(())
}

async fn serve<R>(config: &ServerConfig, repository: R) -> Result<(), ServerError>
where
    R: TaskRepository + 'static,
{
    let service = TaskBoardService::new(Arc::new(repository), Arc::new(DefaultClock))
        .with_timeout(config.operation_timeout);
    let app = router(AppState::new(Arc::new(service)));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind_addr.clone(),
            source,
        })?;
    tracing::info!(
        addr = %config.bind_addr,
        timeout = ?config.operation_timeout,
        "taskboard server listening"
    );
    axum::serve(listener, app).await.map_err(ServerError::Serve)
}
