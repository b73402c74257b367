// API settings - layered base URL resolution with a persisted override
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const API_BASE_URL_KEY: &str = "api_base_url";
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    pub api_base_url: String,
}

/// Location of the persisted override store, next to the rest of the
/// runtime configuration.
pub fn override_store_path() -> PathBuf {
    PathBuf::from("config/override.toml")
}

/// Resolves the active API base URL. Precedence, lowest to highest:
/// hard-coded default, `API_BASE_URL` environment variable, persisted
/// override. The URL is not validated here; a malformed value surfaces
/// as a transport failure on the first request.
pub fn resolve_api_settings(override_store: &Path) -> anyhow::Result<ApiSettings> {
    resolve_with(override_store, config::Environment::default())
}

fn resolve_with(
    override_store: &Path,
    environment: config::Environment,
) -> anyhow::Result<ApiSettings> {
    let settings = config::Config::builder()
        .set_default(API_BASE_URL_KEY, DEFAULT_API_BASE_URL)?
        .add_source(environment)
        .add_source(config::File::from(override_store).required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Persists a new base URL override. The caller is responsible for the
/// re-init step: building a fresh client and swapping it into the
/// gateway handle so every subsequent request uses the new URL.
pub fn update_api_base_url(override_store: &Path, new_url: &str) -> anyhow::Result<()> {
    if let Some(parent) = override_store.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string(&ApiSettings {
        api_base_url: new_url.to_string(),
    })?;
    std::fs::write(override_store, contents)?;
    tracing::info!(url = new_url, "persisted api base url override");
    Ok(())
}
