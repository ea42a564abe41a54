use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jobharvest::collectors::{build_http_client, default_collectors};
use jobharvest::config::{Command, Config, LogFormat};
use jobharvest::db;
use jobharvest::pipeline::{Aggregator, PersistenceGateway, Pipeline};
use jobharvest::routes::{self, AppState};
use jobharvest::store::PgStore;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("jobharvest=info,tower_http=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(config.log_format);

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    if config.run_migrations {
        tracing::info!("Running database migrations...");
        db::run_migrations(&pool).await?;
        tracing::info!("Migrations complete");
    }

    let client = build_http_client(&config.user_agent)?;
    let pipeline = Pipeline::new(
        Aggregator::new(default_collectors(client), config.fetch_timeout()),
        PersistenceGateway::new(Arc::new(PgStore::new(pool))),
    );

    match config.resolved_command() {
        Command::Serve { listen_addr } => {
            let app = routes::router(AppState::new(pipeline));
            let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
            tracing::info!("Listening on {listen_addr}");
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = tokio::signal::ctrl_c().await;
                    tracing::info!("Shutdown signal received, exiting gracefully");
                })
                .await?;
        }
        Command::Scrape => {
            let summary = pipeline.run().await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
