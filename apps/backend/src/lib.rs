pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use hifz_core::{InMemoryStore, ProgressStore, ProgressTracker, SystemClock};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<ProgressTracker>,
}

impl AppState {
    pub fn new(tracker: ProgressTracker) -> Self {
        Self {
            tracker: Arc::new(tracker),
        }
    }
}

/// Build the HTTP router over the given state.
pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // Memorization routes
        .route("/api/memorization/plan", get(routes::memorization::plan))
        .route("/api/memorization/progress", get(routes::memorization::progress))
        .route("/api/memorization/memorize", post(routes::memorization::memorize))
        .route("/api/memorization/review", post(routes::memorization::review))
        // Settings routes
        .route(
            "/api/settings",
            get(routes::settings::get).put(routes::settings::update),
        )
        // Section routes
        .route("/api/sections", get(routes::sections::list))
        .route(
            "/api/sections/{id}/assessment",
            post(routes::sections::submit_assessment),
        )
        // Unit routes
        .route("/api/units/{unit}/section", get(routes::units::section))
        .layer(middleware::from_fn(routes::auth::auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store: Arc<dyn ProgressStore> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let db = Database::connect(database_url).await?;

            tracing::info!("Running migrations...");
            db.run_migrations().await?;
            Arc::new(db)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, progress will be kept in memory");
            Arc::new(InMemoryStore::new())
        }
    };

    let tracker = ProgressTracker::new(store, Arc::new(SystemClock));
    let app = router(AppState::new(tracker));

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
