// Prediction API client - reqwest adapter behind the gateway trait
use crate::application::prediction_gateway::{GatewayError, PredictionGateway, PredictionRequest};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Structured error body the API sends on rejection.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug, Clone)]
pub struct PredictionApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl PredictionApiClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    fn with_timeout(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn extract_detail(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body).ok().map(|b| b.detail)
    }
}

#[async_trait]
impl PredictionGateway for PredictionApiClient {
    async fn health_check(&self) -> Result<Value, GatewayError> {
        let url = format!("{}/", self.base_url);
        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!("health check failed: {e}");
            GatewayError::Transport {
                message: "Prediction API is unreachable.".to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                message: format!("Prediction API health check returned {status}"),
            });
        }

        // Any 2xx counts as healthy; the body is informational only.
        Ok(response.json::<Value>().await.unwrap_or(Value::Null))
    }

    async fn predict(&self, request: PredictionRequest) -> Result<f64, GatewayError> {
        let url = format!("{}{}", self.base_url, request.endpoint);
        tracing::debug!(endpoint = request.endpoint, "sending prediction request");

        let response = self
            .client
            .post(&url)
            .json(&request.body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    tracing::error!(endpoint = request.endpoint, "prediction request timed out");
                } else {
                    tracing::error!(endpoint = request.endpoint, "prediction request failed: {e}");
                }
                GatewayError::Transport {
                    message: request.fallback_error.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = Self::extract_detail(&body)
                .unwrap_or_else(|| request.fallback_error.to_string());
            tracing::error!(
                endpoint = request.endpoint,
                status = status.as_u16(),
                %message,
                "prediction request rejected"
            );
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Value = response.json().await.map_err(|e| {
            tracing::error!(endpoint = request.endpoint, "failed to parse response: {e}");
            GatewayError::Transport {
                message: request.fallback_error.to_string(),
            }
        })?;

        // The envelope maps the domain's label to a batch of size 1.
        let value = envelope
            .get(request.response_label)
            .and_then(Value::as_array)
            .and_then(|batch| batch.first())
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                tracing::error!(
                    endpoint = request.endpoint,
                    label = request.response_label,
                    "response envelope missing prediction"
                );
                GatewayError::Transport {
                    message: request.fallback_error.to_string(),
                }
            })?;

        tracing::debug!(endpoint = request.endpoint, value, "prediction received");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shipment::{ShipmentDelayForm, ShipmentDelaySchema};
    use crate::infrastructure::wire::to_wire_query;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    use crate::application::form_schema::FormSchema as _;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn delay_request() -> PredictionRequest {
        let form = ShipmentDelayForm {
            traffic_congestion_level: 5.0,
            ..ShipmentDelayForm::default()
        };
        PredictionRequest {
            endpoint: ShipmentDelaySchema::ENDPOINT,
            response_label: ShipmentDelaySchema::RESPONSE_LABEL,
            fallback_error: ShipmentDelaySchema::FALLBACK_ERROR,
            body: to_wire_query(&form).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_predict_unwraps_envelope() {
        let router = Router::new().route(
            "/predict_time_delay",
            post(|Json(body): Json<Value>| async move {
                // The wire shape reaches the server with wrapped fields.
                assert_eq!(body["traffic_congestion_level"], json!([5.0]));
                Json(json!({"Time Delay (In Hours)": [4.82]}))
            }),
        );
        let base_url = serve(router).await;

        let client = PredictionApiClient::new(&base_url).unwrap();
        let value = client.predict(delay_request()).await.unwrap();
        assert_eq!(value, 4.82);
    }

    #[tokio::test]
    async fn test_server_detail_preferred_on_rejection() {
        let router = Router::new().route(
            "/predict_time_delay",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"detail": "model unavailable"})),
                )
            }),
        );
        let base_url = serve(router).await;

        let client = PredictionApiClient::new(&base_url).unwrap();
        let error = client.predict(delay_request()).await.unwrap_err();
        match error {
            GatewayError::Upstream { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "model unavailable");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unstructured_rejection_falls_back() {
        let router = Router::new().route(
            "/predict_time_delay",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream gone") }),
        );
        let base_url = serve(router).await;

        let client = PredictionApiClient::new(&base_url).unwrap();
        let error = client.predict(delay_request()).await.unwrap_err();
        assert_eq!(
            error.to_string(),
            "Failed to predict time delay. Please check your inputs and try again."
        );
    }

    #[tokio::test]
    async fn test_timeout_classified_as_transport_with_fallback() {
        let router = Router::new().route(
            "/predict_time_delay",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"Time Delay (In Hours)": [4.82]}))
            }),
        );
        let base_url = serve(router).await;

        let client =
            PredictionApiClient::with_timeout(&base_url, Duration::from_millis(100)).unwrap();
        let error = client.predict(delay_request()).await.unwrap_err();
        match error {
            GatewayError::Transport { message } => {
                assert_eq!(
                    message,
                    "Failed to predict time delay. Please check your inputs and try again."
                );
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_transport_error() {
        let router = Router::new().route(
            "/predict_time_delay",
            post(|| async { Json(json!({"Time Delay (In Hours)": []})) }),
        );
        let base_url = serve(router).await;

        let client = PredictionApiClient::new(&base_url).unwrap();
        let error = client.predict(delay_request()).await.unwrap_err();
        assert!(matches!(error, GatewayError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_health_check_accepts_any_2xx_json() {
        let router = Router::new()
            .route("/", get(|| async { Json(json!({"status": "API is running"})) }));
        let base_url = serve(router).await;

        let client = PredictionApiClient::new(&base_url).unwrap();
        let body = client.health_check().await.unwrap();
        assert_eq!(body["status"], "API is running");
    }

    #[tokio::test]
    async fn test_health_check_tolerates_non_json_body() {
        let router = Router::new().route("/", get(|| async { "API is running" }));
        let base_url = serve(router).await;

        let client = PredictionApiClient::new(&base_url).unwrap();
        let body = client.health_check().await.unwrap();
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_health_check_unreachable_host() {
        // Bind and immediately drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = PredictionApiClient::new(&format!("http://{addr}")).unwrap();
        let error = client.health_check().await.unwrap_err();
        assert!(matches!(error, GatewayError::Transport { .. }));
    }

    #[test]
    fn test_trailing_slash_trimmed_from_base_url() {
        let client = PredictionApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:8000");
    }
}
