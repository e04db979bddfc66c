//! HTTP surface of the recommender service

use crate::engine::RecommendationEngine;
use crate::error::RecommenderError;
use crate::store::InteractionStore;
use actix_web::{http::StatusCode, web, HttpResponse};
use gearup_core::{AggregatedHealth, ComponentHealth, SimpleHealth};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

pub const SERVICE_NAME: &str = "recommender-service";

/// Shared handler state
///
/// The store is built once at start-up and handed to every worker.
pub struct AppState {
    pub engine: RecommendationEngine,
    pub store: Arc<dyn InteractionStore>,
}

impl AppState {
    pub fn new(engine: RecommendationEngine, store: Arc<dyn InteractionStore>) -> Self {
        Self { engine, store }
    }
}

/// Register all service routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check))
        .route(
            "/recommendations/{user_id}",
            web::get().to(get_recommendations),
        );
}

async fn get_recommendations(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, RecommenderError> {
    let user_id = path.into_inner();

    let table = state.store.fetch_interactions().await.map_err(|e| {
        error!(user_id = %user_id, error = %e, "Failed to fetch interactions");
        RecommenderError::from(e)
    })?;

    let recommendations = state.engine.recommend(&table, &user_id).map_err(|e| {
        debug!(user_id = %user_id, "Error: {}", e);
        e
    })?;

    Ok(HttpResponse::Ok().json(recommendations))
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(SimpleHealth::healthy(SERVICE_NAME, env!("CARGO_PKG_VERSION")))
}

async fn readiness_check(state: web::Data<AppState>) -> HttpResponse {
    let start = Instant::now();
    let result = state.store.ping().await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let component = match result {
        Ok(()) => ComponentHealth::healthy(state.store.name(), latency_ms, true),
        Err(e) => {
            warn!(store = state.store.name(), error = %e, "Readiness probe failed");
            ComponentHealth::unhealthy(state.store.name(), latency_ms, true, e.to_string())
        }
    };

    let health = AggregatedHealth::from_components(
        vec![component],
        env!("CARGO_PKG_VERSION"),
        latency_ms,
    );
    let status = StatusCode::from_u16(health.http_status_code())
        .unwrap_or(StatusCode::SERVICE_UNAVAILABLE);

    HttpResponse::build(status).json(health)
}
