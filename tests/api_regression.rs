//! API Regression Tests
//!
//! In-process tests that build the Axum app via `create_app()` and exercise
//! the /api/v1/* endpoints using `tower::ServiceExt::oneshot()`.
//! Printer data comes from the in-memory demo fleet; predictions from a
//! scripted service. No network port.

use printwatch::api::{create_app, DashboardState};
use printwatch::backend::{ClientError, PredictionService};
use printwatch::config::DataSource;
use printwatch::store::InMemoryPrinterStore;
use printwatch::types::{Alert, AlertKind, PredictionResult, PrintParameters, Priority};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

struct ScriptedPredictor {
    calls: AtomicUsize,
    outcome: Result<PredictionResult, String>,
}

#[async_trait]
impl PredictionService for ScriptedPredictor {
    async fn predict(&self, _params: &PrintParameters) -> Result<PredictionResult, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone().map_err(ClientError::Service)
    }
}

fn healthy_prediction() -> PredictionResult {
    PredictionResult {
        wear_factor: 0.25,
        thermal_stress: 0.65,
        alerts: vec![Alert {
            kind: AlertKind::Warning,
            component: "Nozzle".to_string(),
            message: "Nozzle wear detected".to_string(),
            priority: Priority::High,
            maintenance_items: Some(vec!["Clean nozzle".to_string()]),
        }],
        backend_warning: None,
    }
}

fn app_with(predictor: Arc<ScriptedPredictor>) -> Router {
    let state = DashboardState::new(
        Arc::new(InMemoryPrinterStore::with_demo_fleet()),
        predictor,
        DataSource::Fixtures,
    );
    create_app(state)
}

fn test_app() -> Router {
    app_with(Arc::new(ScriptedPredictor {
        calls: AtomicUsize::new(0),
        outcome: Ok(healthy_prediction()),
    }))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn post(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn valid_params() -> Value {
    serde_json::to_value(PrintParameters::default()).unwrap()
}

/// All GET endpoints should return 200 for the demo fleet.
#[tokio::test]
async fn test_get_endpoints_return_200() {
    let endpoints = [
        "/health",
        "/api/v1/system/health",
        "/api/v1/parameters/defaults",
        "/api/v1/parameters/defaults?material=TPU",
        "/api/v1/printers",
        "/api/v1/printers/printer-001/health",
        "/api/v1/printers/printer-002/alerts",
        "/api/v1/printers/printer-003/maintenance",
        "/api/v1/printers/printer-001/analytics",
        "/api/v1/printers/printer-001/analytics?timeRange=year",
    ];

    for endpoint in &endpoints {
        let (status, _) = get(test_app(), endpoint).await;
        assert_eq!(status, StatusCode::OK, "GET {endpoint}");
    }
}

#[tokio::test]
async fn test_envelope_shape() {
    let (_, v) = get(test_app(), "/api/v1/system/health").await;
    assert_eq!(v["data"]["status"], "ok");
    assert_eq!(v["data"]["data_source"], "fixtures");
    assert!(v["meta"]["timestamp"].is_string());
}

#[tokio::test]
async fn test_defaults_for_material() {
    let (status, v) = get(test_app(), "/api/v1/parameters/defaults?material=abs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["data"]["material"], "ABS");
    assert_eq!(v["data"]["parameters"]["nozzle_temperature"], 235.0);
    assert_eq!(v["data"]["parameters"]["infill_pattern"], "triangles");

    let (status, v) = get(test_app(), "/api/v1/parameters/defaults?material=WOOD").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["error"]["message"], "Invalid material type: WOOD");
}

#[tokio::test]
async fn test_validate_reports_single_violation() {
    let mut params = valid_params();
    params["nozzle_temperature"] = json!(159.0);

    let (status, v) = post(test_app(), "/api/v1/parameters/validate", &params).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["data"]["valid"], false);
    let violations = v["data"]["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0]["field"], "nozzle_temperature");
    assert_eq!(
        violations[0]["message"],
        "Nozzle temperature must be between 160°C and 300°C"
    );
}

#[tokio::test]
async fn test_validate_null_field_is_a_violation() {
    let mut params = valid_params();
    params["bed_temperature"] = Value::Null;
    params.as_object_mut().unwrap().remove("infill_density");

    let (status, v) = post(test_app(), "/api/v1/parameters/validate", &params).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["data"]["valid"], false);
    let fields: Vec<&str> = v["data"]["violations"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|x| x["field"].as_str())
        .collect();
    assert_eq!(fields, ["bed_temperature", "infill_density"]);
}

#[tokio::test]
async fn test_validate_unknown_material_keeps_raw_value() {
    let mut params = valid_params();
    params["material"] = json!("Nylon");
    params["infill_pattern"] = json!("cubic");

    let (_, v) = post(test_app(), "/api/v1/parameters/validate", &params).await;
    let messages: Vec<&str> = v["data"]["violations"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|x| x["message"].as_str())
        .collect();
    assert_eq!(
        messages,
        ["Invalid material type: Nylon", "Invalid infill pattern: cubic"]
    );
    assert!(v["data"]["advisories"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_predict_blocks_invalid_parameters() {
    let predictor = Arc::new(ScriptedPredictor {
        calls: AtomicUsize::new(0),
        outcome: Ok(healthy_prediction()),
    });
    let mut params = valid_params();
    params["print_speed"] = json!(151.0);
    params["fan_speed"] = json!(-1.0);

    let (status, v) = post(app_with(predictor.clone()), "/api/v1/predict", &params).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["error"]["code"], "VALIDATION_FAILED");
    assert_eq!(v["error"]["details"].as_array().unwrap().len(), 2);
    assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_predict_returns_classified_result() {
    let (status, v) = post(test_app(), "/api/v1/predict", &valid_params()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["data"]["wear_factor"], 0.25);
    assert_eq!(v["data"]["wear"]["percent"], "25%");
    assert_eq!(v["data"]["wear"]["level"], "low");
    assert_eq!(v["data"]["thermal"]["text"], "High thermal stress - adjust settings");
    assert_eq!(v["data"]["priority_actions"], json!(["Clean nozzle"]));
    assert_eq!(v["data"]["alerts"][0]["type"], "warning");
}

#[tokio::test]
async fn test_predict_upstream_failure() {
    let predictor = Arc::new(ScriptedPredictor {
        calls: AtomicUsize::new(0),
        outcome: Err("Model not loaded".to_string()),
    });
    let (status, v) = post(app_with(predictor), "/api/v1/predict", &valid_params()).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(v["error"]["code"], "UPSTREAM_ERROR");
    assert_eq!(v["error"]["message"], "Model not loaded");
}

#[tokio::test]
async fn test_malformed_body_is_enveloped() {
    let resp = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let v: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(v["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_cost_benefit_reference_case() {
    let body = json!({
        "recommendations": [{"component": "Extruder", "estimatedCost": 100.0, "action": "Clean gear"}],
        "health": {"overallScore": 90.0},
    });
    let (status, v) = post(test_app(), "/api/v1/cost-benefit", &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["data"]["totalSavings"], 2250.0);
    assert_eq!(v["data"]["roi"], 2250.0);
    assert_eq!(v["data"]["band"], "highly recommended");
    assert_eq!(v["data"]["timeframe"], "monthly");
    assert!(v["data"]["report"]
        .as_str()
        .unwrap()
        .contains("Return on Investment: 2250.0%"));
}

#[tokio::test]
async fn test_cost_benefit_without_recommendations() {
    let body = json!({
        "recommendations": [],
        "health": {"overallScore": 35.0},
        "timeframe": "Q3",
    });
    let (_, v) = post(test_app(), "/api/v1/cost-benefit", &body).await;
    assert_eq!(v["data"]["maintenanceCostSavings"], 500.0);
    assert_eq!(v["data"]["roi"], 0.0);
    assert_eq!(v["data"]["band"], "review");
    assert_eq!(v["data"]["timeframe"], "Q3");
}

#[tokio::test]
async fn test_printer_cost_benefit_uses_stored_health() {
    // printer-001 scores 88: same reactive tier and uptime headroom as 90
    let body = json!({
        "recommendations": [{"component": "Extruder", "estimatedCost": 100.0}],
    });
    let (status, v) = post(test_app(), "/api/v1/printers/printer-001/cost-benefit", &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["data"]["totalSavings"], 2250.0);

    let (status, _) = post(test_app(), "/api/v1/printers/nope/cost-benefit", &body).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_printer_health_bands() {
    let (_, v) = get(test_app(), "/api/v1/printers/printer-003/health").await;
    assert_eq!(v["data"]["overallScore"], 54.0);
    assert_eq!(v["data"]["overall"]["band"], "poor");
    assert_eq!(v["data"]["overall"]["color"], "red");
    assert_eq!(v["data"]["componentBands"]["bed"]["band"], "moderate");
    assert_eq!(v["data"]["wear"]["level"], "high");
    assert_eq!(v["data"]["schedule"], "Immediate maintenance required");
}

#[tokio::test]
async fn test_printer_alerts_priority_actions() {
    let (_, v) = get(test_app(), "/api/v1/printers/printer-001/alerts").await;
    assert_eq!(
        v["data"]["priorityActions"],
        json!([
            "Check extruder tension",
            "Clean extruder gear",
            "Clean nozzle",
            "Check for wear"
        ])
    );
}

#[tokio::test]
async fn test_unknown_printer_is_404() {
    for endpoint in [
        "/api/v1/printers/printer-999/health",
        "/api/v1/printers/printer-999/alerts",
        "/api/v1/printers/printer-999/maintenance",
        "/api/v1/printers/printer-999/analytics",
    ] {
        let (status, v) = get(test_app(), endpoint).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "GET {endpoint}");
        assert_eq!(v["error"]["code"], "NOT_FOUND");
    }
}

#[tokio::test]
async fn test_add_printer_then_list() {
    let app = test_app();
    let (status, v) = post(
        app.clone(),
        "/api/v1/printers",
        &json!({"name": "Bay 4", "model": "Bambu X1C", "status": "printing"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(v["data"]["status"], "printing");

    let (_, v) = get(app.clone(), "/api/v1/printers").await;
    assert_eq!(v["data"].as_array().unwrap().len(), 4);

    let (status, _) = post(app, "/api/v1/printers", &json!({"name": "", "model": "X"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_schedule_maintenance() {
    let app = test_app();
    let (status, v) = post(
        app.clone(),
        "/api/v1/printers/printer-002/maintenance",
        &json!({
            "date": "2026-11-02T09:30",
            "type": "emergency",
            "description": "Replace hotend",
            "technician": "R. Ortiz"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(v["data"]["status"], "scheduled");
    assert_eq!(v["data"]["printerId"], "printer-002");

    let (_, v) = get(app.clone(), "/api/v1/printers/printer-002/maintenance").await;
    assert_eq!(v["data"].as_array().unwrap().len(), 3);

    let (status, _) = post(
        app,
        "/api/v1/printers/printer-002/maintenance",
        &json!({"date": "soon", "type": "routine"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analytics_time_range() {
    let (_, v) = get(test_app(), "/api/v1/printers/printer-001/analytics?timeRange=month").await;
    assert_eq!(v["data"]["timeRange"], "month");
    assert_eq!(v["data"]["label"], "Last Month");
    assert_eq!(v["data"]["maintenanceCosts"], 1000.0);

    let (status, _) = get(test_app(), "/api/v1/printers/printer-001/analytics?timeRange=decade").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_path_falls_back() {
    let resp = test_app()
        .oneshot(Request::builder().uri("/nowhere").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
