use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::database::{connect_pool, migrate_legacy_vault, run_migrations};
use crate::engine::Scheduler;
use crate::handlers;
use crate::state::AppState;

/// Build the application state: open the pool, ensure the schema, and run
/// the one-time legacy vault import. Lock contention, a missing file, and a
/// quarantined file are informational; schema and commit errors abort
/// startup.
pub async fn bootstrap(config: AppConfig) -> anyhow::Result<AppState> {
    let pool = connect_pool(&config).await?;
    run_migrations(&pool).await?;

    let state = AppState::new(config, pool);
    let outcome = migrate_legacy_vault(&state.pool, &state.config)
        .await
        .context("legacy vault migration failed")?;
    if outcome.migrated() {
        info!("Legacy vault migrated on startup");
    }

    Ok(state)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::healthcheck))
        .route("/agents", get(handlers::agents::list_agents).post(handlers::agents::create_agent))
        .route("/posts", get(handlers::posts::list_posts))
        .route("/quickpost", post(handlers::posts::quickpost))
        .route(
            "/rituals",
            get(handlers::rituals::list_rituals).post(handlers::rituals::create_ritual),
        )
        .route("/vault", get(handlers::vault::list_vault))
        .route("/vault/export", get(handlers::vault::export_vault))
        .route("/generate", post(handlers::generate::generate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until ctrl-c.
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = bootstrap(config).await?;
    let mut scheduler = Scheduler::start(state.clone());

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!("Agent Spark API listening on http://{bind_addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    scheduler.shutdown();
    Ok(())
}
