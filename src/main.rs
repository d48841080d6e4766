use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::env;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use netclair_web::{booking, cache, routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "netclair_web=debug,tower_http=info".into()),
        )
        .init();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    let app_cache = cache::AppCache::new();
    tokio::spawn(cache::start_cache_warmer(app_cache.clone(), pool.clone()));

    let state = AppState {
        db: pool,
        cache: app_cache,
    };

    let api = booking::router()
        .route("/testimonials", post(routes::site::submit_testimonial))
        .nest("/admin", routes::admin::router());

    let app = Router::new()
        .route("/", get(routes::site::home))
        .route("/services", get(routes::site::services))
        .route("/services/:slug", get(routes::site::service_detail))
        .route("/tarifs", get(routes::site::tarifs))
        .route("/booking", get(routes::site::booking_form))
        .route("/pages/:slug", get(routes::site::page))
        .route("/health", get(routes::site::health))
        .nest("/api", api)
        .nest_service("/static", ServeDir::new("static"))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state);

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(3000);
    let address = format!("0.0.0.0:{port}");

    tracing::info!("Starting NetClair web on http://{address}");
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
