// Gateway trait for the external prediction API
use crate::infrastructure::wire::WireQuery;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Uniform error shape for everything that goes wrong past the form
/// controller. Controllers only ever surface the message; they never
/// inspect raw transport errors.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The API answered with a non-2xx status. The message prefers the
    /// server-supplied `detail` field when one could be parsed.
    #[error("{message}")]
    Upstream { status: u16, message: String },
    /// Network failure, timeout, or an unusable response body.
    #[error("{message}")]
    Transport { message: String },
}

/// One prediction call, fully described: where to post, which response
/// key holds the single-element batch, and what to tell the user when
/// the backend gives no usable detail.
#[derive(Debug, Clone)]
pub struct PredictionRequest {
    pub endpoint: &'static str,
    pub response_label: &'static str,
    pub fallback_error: &'static str,
    pub body: WireQuery,
}

#[async_trait]
pub trait PredictionGateway: Send + Sync {
    /// `GET /` liveness probe; any 2xx counts as healthy. Only feeds the
    /// online/offline indicator, never gates predictions.
    async fn health_check(&self) -> Result<serde_json::Value, GatewayError>;

    /// Posts the wire query and returns the first element of the
    /// response envelope's batch.
    async fn predict(&self, request: PredictionRequest) -> Result<f64, GatewayError>;
}

/// Swappable handle to the active gateway.
///
/// Updating the API base URL builds a fresh client and replaces it here,
/// so every subsequent submission uses the new URL. This is the single
/// re-init point; no partial reconfiguration path exists.
#[derive(Clone)]
pub struct GatewayHandle {
    inner: Arc<RwLock<Arc<dyn PredictionGateway>>>,
}

impl GatewayHandle {
    pub fn new(gateway: Arc<dyn PredictionGateway>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(gateway)),
        }
    }

    pub async fn current(&self) -> Arc<dyn PredictionGateway> {
        self.inner.read().await.clone()
    }

    pub async fn replace(&self, gateway: Arc<dyn PredictionGateway>) {
        *self.inner.write().await = gateway;
    }
}
