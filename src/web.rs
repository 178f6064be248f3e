use axum::{
    Json, Router,
    extract::{Query, State},
    response::Html,
    routing::get,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::DestinaError;
use crate::pipeline::{GuidePage, TravelGuide};
use crate::render;

#[derive(Debug, Deserialize)]
pub struct LookupParams {
    pub city: Option<String>,
}

pub fn router(guide: TravelGuide) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/api/lookup", get(lookup))
        .route("/health", get(health))
        .with_state(guide)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(guide: TravelGuide, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(DestinaError::from)?;
    tracing::info!("Web server running at http://localhost:{}", port);
    axum::serve(listener, router(guide))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}

/// No `city` parameter means nothing was submitted yet.
async fn index(
    State(guide): State<TravelGuide>,
    Query(params): Query<LookupParams>,
) -> Html<String> {
    let page = match &params.city {
        Some(input) => Some(guide.lookup(input).await),
        None => None,
    };
    let input = params.city.as_deref().unwrap_or_default();
    Html(render::html::page(input, page.as_ref()).into_string())
}

async fn lookup(
    State(guide): State<TravelGuide>,
    Query(params): Query<LookupParams>,
) -> Json<GuidePage> {
    let input = params.city.unwrap_or_default();
    Json(guide.lookup(&input).await)
}

async fn health() -> &'static str {
    "ok"
}
