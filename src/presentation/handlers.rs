// HTTP request handlers
use crate::application::form_controller::{EditError, FormSnapshot};
use crate::infrastructure::api_client::PredictionApiClient;
use crate::infrastructure::settings::{ApiSettings, resolve_api_settings, update_api_base_url};
use crate::presentation::app_state::AppState;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Upstream online/offline indicator. Advisory only; a failing probe
/// never blocks submissions.
pub async fn api_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    let gateway = state.gateway.current().await;
    let upstream = match gateway.health_check().await {
        Ok(_) => "online",
        Err(e) => {
            tracing::debug!("upstream health check failed: {e}");
            "offline"
        }
    };
    Json(json!({ "upstream": upstream }))
}

pub async fn delay_snapshot(State(state): State<Arc<AppState>>) -> Response {
    snapshot_response(state.delay_form.snapshot().await)
}

pub async fn delay_edit(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<Map<String, Value>>,
) -> Response {
    edit_response(state.delay_form.edit(patch).await)
}

pub async fn delay_submit(State(state): State<Arc<AppState>>) -> Response {
    snapshot_response(state.delay_form.submit().await)
}

pub async fn delay_reset(State(state): State<Arc<AppState>>) -> Response {
    snapshot_response(state.delay_form.reset().await)
}

pub async fn cost_snapshot(State(state): State<Arc<AppState>>) -> Response {
    snapshot_response(state.cost_form.snapshot().await)
}

pub async fn cost_edit(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<Map<String, Value>>,
) -> Response {
    edit_response(state.cost_form.edit(patch).await)
}

pub async fn cost_submit(State(state): State<Arc<AppState>>) -> Response {
    snapshot_response(state.cost_form.submit().await)
}

pub async fn cost_reset(State(state): State<Arc<AppState>>) -> Response {
    snapshot_response(state.cost_form.reset().await)
}

pub async fn get_settings(State(state): State<Arc<AppState>>) -> Response {
    let store = state.override_store.clone();
    // Settings touch the filesystem; keep that off the async workers.
    match tokio::task::spawn_blocking(move || resolve_api_settings(&store)).await {
        Ok(Ok(settings)) => Json(settings).into_response(),
        Ok(Err(e)) => {
            tracing::error!("failed to resolve api settings: {e:#}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(e) => {
            tracing::error!("settings task failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct SettingsUpdate {
    pub api_base_url: String,
}

/// Persists the base URL override, then performs the full re-init:
/// a fresh client replaces the active gateway so every controller's
/// next submission uses the new URL.
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> Response {
    let store = state.override_store.clone();
    let new_url = update.api_base_url.clone();
    match tokio::task::spawn_blocking(move || update_api_base_url(&store, &new_url)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::error!("failed to persist api base url: {e:#}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
        Err(e) => {
            tracing::error!("settings task failed: {e}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }
    match PredictionApiClient::new(&update.api_base_url) {
        Ok(client) => {
            state.gateway.replace(Arc::new(client)).await;
            Json(ApiSettings {
                api_base_url: update.api_base_url,
            })
            .into_response()
        }
        Err(e) => {
            tracing::error!("failed to rebuild prediction client: {e:#}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn snapshot_response(result: Result<FormSnapshot, serde_json::Error>) -> Response {
    match result {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => {
            tracing::error!("failed to snapshot form state: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn edit_response(result: Result<FormSnapshot, EditError>) -> Response {
    match result {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e @ (EditError::UnknownField(_) | EditError::InvalidValue(_))) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
        Err(EditError::Internal(e)) => {
            tracing::error!("failed to apply field edit: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
