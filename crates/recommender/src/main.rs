//! Recommender Service - product recommendations from user interactions
//!
//! Default port: 5000

use actix_web::{web, App, HttpServer};
use gearup_core::{init_logging, load_dotenv, ConfigLoader, LogConfig, ServiceConfig};
use gearup_recommender::{
    configure, AppState, FirebaseInteractionStore, RecommendationEngine, RecommenderConfig,
    SERVICE_NAME,
};
use std::sync::Arc;
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let service_config = ServiceConfig::from_env()?;
    service_config.validate()?;

    init_logging(&LogConfig::new(
        SERVICE_NAME,
        service_config.log_level.clone(),
        service_config.log_format,
    ))?;

    let config = RecommenderConfig::from_env()?;
    config.validate()?;

    let store = FirebaseInteractionStore::from_config(&config.firebase)?;
    info!(
        node = store.node_url(),
        anonymous = config.firebase.anonymous,
        "Interaction store initialized"
    );

    let state = web::Data::new(AppState::new(
        RecommendationEngine::new(config.engine),
        Arc::new(store),
    ));

    let bind_addr = service_config.bind_address();
    info!("Starting {} on {}", SERVICE_NAME, bind_addr);

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .workers(service_config.workers)
        .bind(&bind_addr)?
        .run()
        .await?;

    Ok(())
}
