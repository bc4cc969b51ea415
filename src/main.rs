use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use course_catalog::api;
use course_catalog::config::AppConfig;
use course_catalog::db::{self, SqliteCourseStore, MIGRATOR};
use course_catalog::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "course_catalog=debug,tower_http=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new_from_env()?;

    let pool = db::connect(&config.database_url, config.max_connections).await?;
    info!("connected to {}", config.database_url);

    MIGRATOR.run(&pool).await?;

    let store = SqliteCourseStore::new(pool, config.store_timeout);
    let state = AppState::new(Arc::new(store));

    let app = api::app(state, &config.cors_origins);

    let addr = config.socket_addr();
    info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
