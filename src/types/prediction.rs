//! Prediction wire types: Alert, AlertKind, Priority, PredictionResponse,
//! PredictionResult

use serde::{Deserialize, Serialize};

/// Alert type tag on the wire (`"warning"` / `"critical"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Critical,
}

/// Alert priority, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

/// Maintenance alert shared between the prediction service and the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub component: String,
    pub message: String,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_items: Option<Vec<String>>,
}

/// Raw `POST /predict` response body.
///
/// Every field is optional: the service omits fields on partial failures and
/// reports problems through `error` / `details`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub wear_factor: Option<f64>,
    #[serde(default)]
    pub thermal_stress: Option<f64>,
    #[serde(default)]
    pub alerts: Option<Vec<Alert>>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

/// Prediction as displayed by the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Mechanical degradation estimate in [0, 1]
    pub wear_factor: f64,
    /// Thermal strain estimate in [0, 1]
    pub thermal_stress: f64,
    pub alerts: Vec<Alert>,
    /// `error` text the service attached to an otherwise successful response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_warning: Option<String>,
}

impl From<PredictionResponse> for PredictionResult {
    fn from(resp: PredictionResponse) -> Self {
        let backend_warning = match (resp.error, resp.details) {
            (Some(err), Some(details)) => Some(format!("{err}: {details}")),
            (Some(err), None) => Some(err),
            (None, _) => None,
        };
        Self {
            wear_factor: resp.wear_factor.filter(|v| v.is_finite()).unwrap_or(0.0),
            thermal_stress: resp.thermal_stress.filter(|v| v.is_finite()).unwrap_or(0.0),
            alerts: resp.alerts.unwrap_or_default(),
            backend_warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_response_defaults_to_zero() {
        let resp: PredictionResponse = serde_json::from_str("{}").unwrap();
        let result = PredictionResult::from(resp);
        assert_eq!(result.wear_factor, 0.0);
        assert_eq!(result.thermal_stress, 0.0);
        assert!(result.alerts.is_empty());
        assert!(result.backend_warning.is_none());
    }

    #[test]
    fn test_alert_wire_shape() {
        let json = r#"{
            "type": "critical",
            "component": "Extruder",
            "message": "Extruder skipping detected",
            "priority": "critical",
            "maintenance_items": ["Check extruder tension"]
        }"#;
        let alert: Alert = serde_json::from_str(json).unwrap();
        assert_eq!(alert.kind, AlertKind::Critical);
        assert_eq!(alert.priority, Priority::Critical);
        assert_eq!(alert.maintenance_items.as_deref().map(<[String]>::len), Some(1));

        let back = serde_json::to_value(&alert).unwrap();
        assert_eq!(back["type"], "critical");
    }

    #[test]
    fn test_backend_error_kept_as_warning() {
        let resp = PredictionResponse {
            wear_factor: Some(0.4),
            error: Some("model fallback".to_string()),
            details: Some("using rules".to_string()),
            ..Default::default()
        };
        let result = PredictionResult::from(resp);
        assert_eq!(result.wear_factor, 0.4);
        assert_eq!(result.backend_warning.as_deref(), Some("model fallback: using rules"));
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Critical > Priority::High);
        assert!(Priority::Medium > Priority::Low);
    }
}
