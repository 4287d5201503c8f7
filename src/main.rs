mod clock;
mod config;
mod db;
mod engine;
mod handlers;
mod models;
mod seed;
mod store;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use clock::SystemClock;
use config::Config;
use engine::Engine;
use std::sync::Arc;
use store::{GameStore, MemoryStore};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub struct AppState {
    pub engine: Arc<Engine>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "habitquest=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenv::dotenv().ok();
    let config = Config::from_env().context("Failed to load configuration")?;

    let store: Arc<dyn GameStore> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database");
            let db_pool = db::create_pool(database_url)
                .await
                .context("Failed to create database pool")?;

            tracing::info!("Running database migrations");
            db::run_migrations(&db_pool)
                .await
                .context("Failed to run migrations")?;

            Arc::new(db::PgStore::new(db_pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, progress will be kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    tracing::info!("Loading seed data");
    seed::load_seed_data(store.as_ref())
        .await
        .context("Failed to load seed data")?;

    match seed::read_admin_list().await {
        Some(admins) => {
            let granted = seed::grant_admins(store.as_ref(), &admins).await?;
            tracing::info!("Loaded {} admin(s), {} newly granted", admins.len(), granted);
        }
        None => tracing::warn!("No admins configured (no ADMINS env var or admins.txt file)"),
    }

    let engine = Arc::new(Engine::new(
        store,
        Arc::new(SystemClock),
        config.calendar,
        config.leveling,
    ));
    tracing::info!("Game day is {}", engine.today());

    if let Some(every) = config.daily_sweep {
        tracing::info!("Running daily sweep every {:?}", every);
        engine::spawn_daily_sweep(engine.clone(), every);
    }

    let state = Arc::new(AppState { engine });

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .nest("/api", handlers::api_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
