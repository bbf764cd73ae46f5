//! API route handlers
//!
//! Every handler returns a [`Response`] built with [`ApiResponse`] or
//! [`ApiErrorResponse`]. Bodies that fail to deserialize are reported through
//! the same envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::backend::PredictionService;
use crate::classification::{priority_actions, ScoreReading, StressLevel, StressReading};
use crate::config::DataSource;
use crate::cost_benefit::{self, CostBenefitResult, DEFAULT_TIMEFRAME};
use crate::store::PrinterRepository;
use crate::types::{
    Alert, HealthSnapshot, MaintenanceRecommendation, MaintenanceRequest, Material,
    MaterialGuidance, NewPrinter, PredictionResult, PrintParameters, TimeRange,
};
use crate::validator::{self, ValidationWarning, Violation};

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct DashboardState {
    /// Printer fleet data
    pub repository: Arc<dyn PrinterRepository>,
    /// Prediction backend
    pub predictor: Arc<dyn PredictionService>,
    /// Where printer data comes from, reported by the health endpoint
    pub data_source: DataSource,
    pub started_at: Instant,
}

impl DashboardState {
    pub fn new(
        repository: Arc<dyn PrinterRepository>,
        predictor: Arc<dyn PredictionService>,
        data_source: DataSource,
    ) -> Self {
        Self {
            repository,
            predictor,
            data_source,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

// ============================================================================
// Request / response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DefaultsQuery {
    #[serde(default)]
    pub material: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default, rename = "timeRange")]
    pub time_range: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CostBenefitRequest {
    pub recommendations: Vec<MaintenanceRecommendation>,
    pub health: HealthSnapshot,
    #[serde(default)]
    pub timeframe: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PrinterCostBenefitRequest {
    pub recommendations: Vec<MaintenanceRecommendation>,
    #[serde(default)]
    pub timeframe: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LegacyHealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct SystemHealth {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    pub data_source: DataSource,
    pub prediction_service: bool,
}

#[derive(Debug, Serialize)]
pub struct ParameterDefaults {
    pub material: Material,
    pub parameters: PrintParameters,
    pub guidance: MaterialGuidance,
}

#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub violations: Vec<Violation>,
    pub advisories: Vec<ValidationWarning>,
}

/// Prediction plus the dashboard's reading of it.
#[derive(Debug, Serialize)]
pub struct PredictionView {
    #[serde(flatten)]
    pub result: PredictionResult,
    pub wear: StressReading,
    pub thermal: StressReading,
    pub priority_actions: Vec<String>,
    pub schedule: &'static str,
    pub advice: &'static str,
}

impl From<PredictionResult> for PredictionView {
    fn from(result: PredictionResult) -> Self {
        let level = StressLevel::from_fraction(result.wear_factor);
        Self {
            wear: StressReading::wear(result.wear_factor),
            thermal: StressReading::thermal(result.thermal_stress),
            priority_actions: priority_actions(&result.alerts),
            schedule: level.schedule_text(),
            advice: level.advice_text(),
            result,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBenefitView {
    #[serde(flatten)]
    pub result: CostBenefitResult,
    pub band: &'static str,
    pub verdict: &'static str,
    pub timeframe: String,
    pub report: String,
}

impl CostBenefitView {
    fn new(result: CostBenefitResult, timeframe: Option<String>) -> Self {
        let timeframe = timeframe
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TIMEFRAME.to_string());
        let band = result.roi_band();
        Self {
            report: cost_benefit::render_report(&result, &timeframe),
            band: band.label(),
            verdict: band.verdict(),
            timeframe,
            result,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterHealthView {
    #[serde(flatten)]
    pub snapshot: HealthSnapshot,
    pub overall: ScoreReading,
    pub component_bands: BTreeMap<String, ScoreReading>,
    pub wear: StressReading,
    pub thermal: StressReading,
    pub schedule: &'static str,
    pub advice: &'static str,
}

impl From<HealthSnapshot> for PrinterHealthView {
    fn from(snapshot: HealthSnapshot) -> Self {
        let level = StressLevel::from_fraction(snapshot.wear_factor);
        Self {
            overall: ScoreReading::new(snapshot.overall_score),
            component_bands: snapshot
                .components
                .iter()
                .map(|(name, score)| (name.clone(), ScoreReading::new(*score)))
                .collect(),
            wear: StressReading::wear(snapshot.wear_factor),
            thermal: StressReading::thermal(snapshot.thermal_stress),
            schedule: level.schedule_text(),
            advice: level.advice_text(),
            snapshot,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertsView {
    pub alerts: Vec<Alert>,
    pub priority_actions: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsView {
    pub time_range: TimeRange,
    pub label: &'static str,
    #[serde(flatten)]
    pub analytics: crate::types::Analytics,
}

// ============================================================================
// Internal helpers
// ============================================================================

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiErrorResponse::bad_request(rejection.body_text()))
}

fn all_finite(recommendations: &[MaintenanceRecommendation], health: Option<&HealthSnapshot>) -> bool {
    recommendations.iter().all(|r| r.estimated_cost.is_finite())
        && health.map_or(true, |h| h.overall_score.is_finite())
}

const NON_FINITE_MESSAGE: &str = "Costs and scores must be finite numbers";

// ============================================================================
// System
// ============================================================================

/// GET /health
pub async fn legacy_health_check(State(state): State<DashboardState>) -> Json<LegacyHealthResponse> {
    Json(LegacyHealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime_secs(),
    })
}

/// GET /api/v1/system/health
pub async fn system_health(State(state): State<DashboardState>) -> Response {
    let prediction_service = state.predictor.is_available().await;
    ApiResponse::ok(SystemHealth {
        status: if prediction_service { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.uptime_secs(),
        data_source: state.data_source,
        prediction_service,
    })
}

// ============================================================================
// Parameters and prediction
// ============================================================================

/// GET /api/v1/parameters/defaults?material=
pub async fn parameter_defaults(Query(q): Query<DefaultsQuery>) -> Response {
    let material = match q.material.as_deref() {
        None | Some("") => Material::Pla,
        Some(raw) => match raw.parse::<Material>() {
            Ok(m) => m,
            Err(_) => return ApiErrorResponse::bad_request(format!("Invalid material type: {raw}")),
        },
    };
    ApiResponse::ok(ParameterDefaults {
        material,
        parameters: PrintParameters::for_material(material),
        guidance: material.guidance(),
    })
}

/// POST /api/v1/parameters/validate
pub async fn validate_parameters(payload: Result<Json<PrintParameters>, JsonRejection>) -> Response {
    let params = match json_body(payload) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let violations = validator::validate_detailed(&params);
    ApiResponse::ok(ValidationReport {
        valid: violations.is_empty(),
        advisories: validator::material_advisories(&params),
        violations,
    })
}

/// POST /api/v1/predict
pub async fn predict(
    State(state): State<DashboardState>,
    payload: Result<Json<PrintParameters>, JsonRejection>,
) -> Response {
    let params = match json_body(payload) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let violations = validator::validate(&params);
    if !violations.is_empty() {
        info!(count = violations.len(), "Rejected prediction request with invalid parameters");
        return ApiErrorResponse::validation_failed(violations);
    }

    match state.predictor.predict(&params).await {
        Ok(result) => ApiResponse::ok(PredictionView::from(result)),
        Err(e) => {
            warn!(error = %e, "Prediction request failed");
            ApiErrorResponse::bad_gateway(e.user_message())
        }
    }
}

/// POST /api/v1/cost-benefit
pub async fn cost_benefit(payload: Result<Json<CostBenefitRequest>, JsonRejection>) -> Response {
    let req = match json_body(payload) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    if !all_finite(&req.recommendations, Some(&req.health)) {
        return ApiErrorResponse::bad_request(NON_FINITE_MESSAGE);
    }
    let result = cost_benefit::estimate(&req.recommendations, &req.health);
    ApiResponse::ok(CostBenefitView::new(result, req.timeframe))
}

// ============================================================================
// Printers
// ============================================================================

/// GET /api/v1/printers
pub async fn list_printers(State(state): State<DashboardState>) -> Response {
    match state.repository.list_printers().await {
        Ok(printers) => ApiResponse::ok(printers),
        Err(e) => ApiErrorResponse::from_store(&e),
    }
}

/// POST /api/v1/printers
pub async fn add_printer(
    State(state): State<DashboardState>,
    payload: Result<Json<NewPrinter>, JsonRejection>,
) -> Response {
    let input = match json_body(payload) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    match state.repository.add_printer(input).await {
        Ok(printer) => ApiResponse::created(printer),
        Err(e) => ApiErrorResponse::from_store(&e),
    }
}

/// GET /api/v1/printers/:id/health
pub async fn printer_health(
    State(state): State<DashboardState>,
    Path(printer_id): Path<String>,
) -> Response {
    match state.repository.health(&printer_id).await {
        Ok(snapshot) => ApiResponse::ok(PrinterHealthView::from(snapshot)),
        Err(e) => ApiErrorResponse::from_store(&e),
    }
}

/// GET /api/v1/printers/:id/alerts
pub async fn printer_alerts(
    State(state): State<DashboardState>,
    Path(printer_id): Path<String>,
) -> Response {
    match state.repository.alerts(&printer_id).await {
        Ok(alerts) => ApiResponse::ok(AlertsView {
            priority_actions: priority_actions(&alerts),
            alerts,
        }),
        Err(e) => ApiErrorResponse::from_store(&e),
    }
}

/// GET /api/v1/printers/:id/maintenance
pub async fn maintenance_history(
    State(state): State<DashboardState>,
    Path(printer_id): Path<String>,
) -> Response {
    match state.repository.maintenance_history(&printer_id).await {
        Ok(records) => ApiResponse::ok(records),
        Err(e) => ApiErrorResponse::from_store(&e),
    }
}

/// POST /api/v1/printers/:id/maintenance
pub async fn schedule_maintenance(
    State(state): State<DashboardState>,
    Path(printer_id): Path<String>,
    payload: Result<Json<MaintenanceRequest>, JsonRejection>,
) -> Response {
    let request = match json_body(payload) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    match state.repository.schedule_maintenance(&printer_id, request).await {
        Ok(record) => ApiResponse::created(record),
        Err(e) => ApiErrorResponse::from_store(&e),
    }
}

/// GET /api/v1/printers/:id/analytics?timeRange=
pub async fn printer_analytics(
    State(state): State<DashboardState>,
    Path(printer_id): Path<String>,
    Query(q): Query<AnalyticsQuery>,
) -> Response {
    let range = match q.time_range.as_deref() {
        None | Some("") => TimeRange::default(),
        Some(raw) => match raw.parse::<TimeRange>() {
            Ok(r) => r,
            Err(e) => return ApiErrorResponse::bad_request(e),
        },
    };
    match state.repository.analytics(&printer_id, range).await {
        Ok(analytics) => ApiResponse::ok(AnalyticsView {
            time_range: range,
            label: range.label(),
            analytics,
        }),
        Err(e) => ApiErrorResponse::from_store(&e),
    }
}

/// POST /api/v1/printers/:id/cost-benefit
pub async fn printer_cost_benefit(
    State(state): State<DashboardState>,
    Path(printer_id): Path<String>,
    payload: Result<Json<PrinterCostBenefitRequest>, JsonRejection>,
) -> Response {
    let req = match json_body(payload) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    if !all_finite(&req.recommendations, None) {
        return ApiErrorResponse::bad_request(NON_FINITE_MESSAGE);
    }
    let health = match state.repository.health(&printer_id).await {
        Ok(h) => h,
        Err(e) => return ApiErrorResponse::from_store(&e),
    };
    let result = cost_benefit::estimate(&req.recommendations, &health);
    ApiResponse::ok(CostBenefitView::new(result, req.timeframe))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AlertKind, Priority};

    #[test]
    fn test_prediction_view_classifies() {
        let view = PredictionView::from(PredictionResult {
            wear_factor: 0.45,
            thermal_stress: 0.7,
            alerts: vec![Alert {
                kind: AlertKind::Critical,
                component: "Extruder".to_string(),
                message: "Extruder skipping detected".to_string(),
                priority: Priority::Critical,
                maintenance_items: Some(vec!["Check extruder tension".to_string()]),
            }],
            backend_warning: None,
        });
        assert_eq!(view.wear.percent, "45%");
        assert_eq!(view.wear.level, StressLevel::Moderate);
        assert_eq!(view.thermal.level, StressLevel::High);
        assert_eq!(view.priority_actions, vec!["Check extruder tension"]);
        assert_eq!(view.schedule, "Increased monitoring recommended");
    }

    #[test]
    fn test_cost_benefit_view_default_timeframe() {
        let health = HealthSnapshot::with_score(90.0);
        let recs = vec![MaintenanceRecommendation::new("Extruder", 100.0, "Clean gear")];
        let view = CostBenefitView::new(cost_benefit::estimate(&recs, &health), Some("  ".to_string()));
        assert_eq!(view.timeframe, DEFAULT_TIMEFRAME);
        assert_eq!(view.band, "highly recommended");
        assert!(view.report.starts_with("Cost-Benefit Analysis Report (monthly)"));
    }

    #[test]
    fn test_non_finite_inputs_detected() {
        let mut recs = vec![MaintenanceRecommendation::new("Motors", 10.0, "Lubricate")];
        assert!(all_finite(&recs, Some(&HealthSnapshot::with_score(70.0))));
        assert!(!all_finite(&recs, Some(&HealthSnapshot::with_score(f64::NAN))));
        recs[0].estimated_cost = f64::INFINITY;
        assert!(!all_finite(&recs, None));
    }
}
