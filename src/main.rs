// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::application::form_controller::FormController;
use crate::application::prediction_gateway::GatewayHandle;
use crate::infrastructure::api_client::PredictionApiClient;
use crate::infrastructure::settings::{override_store_path, resolve_api_settings};
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    api_status, cost_edit, cost_reset, cost_snapshot, cost_submit, delay_edit, delay_reset,
    delay_snapshot, delay_submit, get_settings, health_check, update_settings,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Resolve configuration (persisted override > environment > default)
    let override_store = override_store_path();
    let api_settings = resolve_api_settings(&override_store)?;
    tracing::info!(url = %api_settings.api_base_url, "using prediction api");

    // Create gateway (infrastructure layer)
    let client = PredictionApiClient::new(&api_settings.api_base_url)?;
    let gateway = GatewayHandle::new(Arc::new(client));

    // Create application state with one controller per prediction domain
    let state = Arc::new(AppState {
        delay_form: FormController::new(gateway.clone()),
        cost_form: FormController::new(gateway.clone()),
        gateway,
        override_store,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/api/status", get(api_status))
        .route("/api/delay", get(delay_snapshot))
        .route("/api/delay/fields", put(delay_edit))
        .route("/api/delay/submit", post(delay_submit))
        .route("/api/delay/reset", post(delay_reset))
        .route("/api/cost", get(cost_snapshot))
        .route("/api/cost/fields", put(cost_edit))
        .route("/api/cost/submit", post(cost_submit))
        .route("/api/cost/reset", post(cost_reset))
        .route("/api/settings", get(get_settings).put(update_settings))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = "0.0.0.0:8080".parse()?;
    println!("Starting prediction-dashboard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
