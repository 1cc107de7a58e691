use anyhow::Context;

use stockroom_infra::{AppConfig, StoreBackend, Stores};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockroom_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let (stores, database) = match (config.backend, &config.db) {
        (StoreBackend::Postgres, Some(db_config)) => {
            let database = stockroom_infra::connect(db_config)
                .await
                .context("failed to connect to Postgres")?;
            if config.run_migrations {
                database.migrate().await.context("failed to run migrations")?;
            }
            (Stores::postgres(&database), Some(database))
        }
        _ => {
            tracing::warn!("using in-memory store; data is lost on exit");
            (Stores::in_memory(), None)
        }
    };

    let app = stockroom_api::app::build_app(stores);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(database) = database {
        database.close().await;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
