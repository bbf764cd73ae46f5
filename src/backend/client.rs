//! Backend Client: HTTP client for the prediction service and printer API
//!
//! Handles prediction requests, printer CRUD, health/maintenance/analytics
//! snapshots, and maintenance scheduling.

use async_trait::async_trait;
use reqwest::{IntoUrl, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::DashboardConfig;
use crate::types::{
    Alert, Analytics, HealthSnapshot, MaintenanceRecord, MaintenanceRequest, NewPrinter,
    PredictionResponse, PredictionResult, PrintParameters, Printer, TimeRange,
};

/// Shown when the prediction service cannot be reached or gives no reason.
pub const PREDICTION_UNAVAILABLE: &str =
    "Failed to connect to the prediction service. Please make sure the server is running.";

/// Backend client errors
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server returned status {0}")]
    ServerError(reqwest::StatusCode),
    /// The service answered with an `error` message in the body
    #[error("{0}")]
    Service(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
    /// Printer id that cannot name a single path segment
    #[error("Invalid printer id: {0:?}")]
    InvalidPrinterId(String),
}

impl ClientError {
    /// Single user-facing line for the prediction panel.
    pub fn user_message(&self) -> String {
        match self {
            Self::Service(msg) => msg.clone(),
            _ => PREDICTION_UNAVAILABLE.to_string(),
        }
    }

    /// 404 from the backend, or an id no printer can have.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::ServerError(s) => *s == reqwest::StatusCode::NOT_FOUND,
            Self::InvalidPrinterId(_) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Anything that can turn print parameters into a prediction.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, params: &PrintParameters) -> Result<PredictionResult, ClientError>;

    /// Liveness probe for the system health endpoint.
    async fn is_available(&self) -> bool {
        true
    }
}

/// HTTP client for the prediction service and the printer backend
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    prediction_url: String,
    backend_url: String,
}

impl BackendClient {
    /// Create a new client. A zero `timeout` disables the request timeout.
    pub fn new(prediction_url: &str, backend_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            prediction_url: prediction_url.trim_end_matches('/').to_string(),
            backend_url: backend_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, ClientError> {
        Self::new(
            &config.prediction.base_url,
            &config.backend.base_url,
            Duration::from_secs(config.prediction.request_timeout_secs),
        )
    }

    /// Get prediction URL for logging
    pub fn prediction_url(&self) -> &str {
        &self.prediction_url
    }

    /// Get backend URL for logging
    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// Ping the prediction service's `/health` endpoint.
    pub async fn check_health(&self) -> bool {
        match self
            .http
            .get(format!("{}/health", self.prediction_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                warn!(error = %e, "Prediction service health check failed");
                false
            }
        }
    }

    /// `POST /predict`
    ///
    /// Missing fields in a successful response default to zero / empty. A
    /// non-success response surfaces the body's `error` text when present.
    pub async fn predict(&self, params: &PrintParameters) -> Result<PredictionResult, ClientError> {
        debug!(url = %self.prediction_url, material = %params.material, "Sending prediction request");

        let resp = self
            .http
            .post(format!("{}/predict", self.prediction_url))
            .json(params)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error);
            return Err(match message {
                Some(msg) => ClientError::Service(msg),
                None => ClientError::ServerError(status),
            });
        }

        let raw: PredictionResponse = serde_json::from_slice(&body)?;
        let result = PredictionResult::from(raw);
        if let Some(ref w) = result.backend_warning {
            warn!(warning = %w, "Prediction service reported a problem");
        }
        Ok(result)
    }

    /// `GET /printers`
    pub async fn list_printers(&self) -> Result<Vec<Printer>, ClientError> {
        self.get_json(format!("{}/printers", self.backend_url)).await
    }

    /// `POST /printers`
    pub async fn create_printer(&self, printer: &NewPrinter) -> Result<Printer, ClientError> {
        let resp = self
            .http
            .post(format!("{}/printers", self.backend_url))
            .json(printer)
            .send()
            .await?;
        Self::decode(resp).await
    }

    /// `GET /printers/{id}/health`
    pub async fn printer_health(&self, printer_id: &str) -> Result<HealthSnapshot, ClientError> {
        self.get_json(self.printer_url(printer_id, "health")?).await
    }

    /// `GET /printers/{id}/alerts`
    pub async fn printer_alerts(&self, printer_id: &str) -> Result<Vec<Alert>, ClientError> {
        self.get_json(self.printer_url(printer_id, "alerts")?).await
    }

    /// `GET /printers/{id}/maintenance`
    pub async fn maintenance_history(
        &self,
        printer_id: &str,
    ) -> Result<Vec<MaintenanceRecord>, ClientError> {
        self.get_json(self.printer_url(printer_id, "maintenance")?).await
    }

    /// `POST /printers/{id}/maintenance`
    pub async fn schedule_maintenance(
        &self,
        printer_id: &str,
        request: &MaintenanceRequest,
    ) -> Result<MaintenanceRecord, ClientError> {
        let resp = self
            .http
            .post(self.printer_url(printer_id, "maintenance")?)
            .json(request)
            .send()
            .await?;
        Self::decode(resp).await
    }

    /// `GET /printers/{id}/analytics?timeRange=`
    pub async fn analytics(
        &self,
        printer_id: &str,
        range: TimeRange,
    ) -> Result<Analytics, ClientError> {
        let mut url = self.printer_url(printer_id, "analytics")?;
        url.query_pairs_mut().append_pair("timeRange", range.as_str());
        self.get_json(url).await
    }

    /// `{backend}/printers/{id}/{leaf}` with the id encoded as one segment.
    pub fn printer_url(&self, printer_id: &str, leaf: &str) -> Result<Url, ClientError> {
        if is_dot_segment(printer_id) {
            return Err(ClientError::InvalidPrinterId(printer_id.to_string()));
        }
        let mut url =
            Url::parse(&self.backend_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.backend_url.clone()))?
            .pop_if_empty()
            .extend(["printers", printer_id, leaf]);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: impl IntoUrl) -> Result<T, ClientError> {
        let resp = self.http.get(url).send().await?;
        Self::decode(resp).await
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::ServerError(status));
        }
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Empty, `.` or `..`, including the `%2e` spellings a backend would decode.
fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    matches!(decoded.as_str(), "" | "." | "..")
}

#[async_trait]
impl PredictionService for BackendClient {
    async fn predict(&self, params: &PrintParameters) -> Result<PredictionResult, ClientError> {
        Self::predict(self, params).await
    }

    async fn is_available(&self) -> bool {
        self.check_health().await
    }
}
