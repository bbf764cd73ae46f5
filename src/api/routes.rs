//! API route table
//!
//! - /system/health, /parameters/*, /predict, /cost-benefit
//! - /printers and the per-printer health, alerts, maintenance, analytics
//!   and cost-benefit endpoints

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, DashboardState};

/// Build the `/api/v1` router.
pub fn api_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/system/health", get(handlers::system_health))
        // Parameters and prediction
        .route("/parameters/defaults", get(handlers::parameter_defaults))
        .route("/parameters/validate", post(handlers::validate_parameters))
        .route("/predict", post(handlers::predict))
        .route("/cost-benefit", post(handlers::cost_benefit))
        // Printers
        .route(
            "/printers",
            get(handlers::list_printers).post(handlers::add_printer),
        )
        .route("/printers/:id/health", get(handlers::printer_health))
        .route("/printers/:id/alerts", get(handlers::printer_alerts))
        .route(
            "/printers/:id/maintenance",
            get(handlers::maintenance_history).post(handlers::schedule_maintenance),
        )
        .route("/printers/:id/analytics", get(handlers::printer_analytics))
        .route("/printers/:id/cost-benefit", post(handlers::printer_cost_benefit))
        .with_state(state)
}

/// Legacy health endpoint at root level
pub fn legacy_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(handlers::legacy_health_check))
        .with_state(state)
}
