//! Printer fleet types: Printer, PrinterStatus, HealthSnapshot,
//! MaintenanceRecommendation, MaintenanceRecord, Analytics, TimeRange

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::Priority;

// ============================================================================
// Printers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrinterStatus {
    #[default]
    Operational,
    Idle,
    Printing,
    Maintenance,
    Error,
}

/// Snapshot of what a printer is currently running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentParameters {
    pub material: String,
    pub temperature: f64,
    pub print_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Printer {
    pub id: String,
    pub name: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    pub last_maintenance: DateTime<Utc>,
    #[serde(default)]
    pub total_print_hours: f64,
    #[serde(default)]
    pub status: PrinterStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_parameters: Option<CurrentParameters>,
}

/// Body of `POST /printers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPrinter {
    pub name: String,
    pub model: String,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default = "default_new_printer_status")]
    pub status: PrinterStatus,
}

const fn default_new_printer_status() -> PrinterStatus {
    PrinterStatus::Idle
}

// ============================================================================
// Health
// ============================================================================

/// Health of one printer: an overall 0-100 score plus per-component scores.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    pub overall_score: f64,
    #[serde(default)]
    pub components: BTreeMap<String, f64>,
    /// Latest predicted wear fraction in [0, 1]
    #[serde(default)]
    pub wear_factor: f64,
    /// Latest predicted thermal stress fraction in [0, 1]
    #[serde(default)]
    pub thermal_stress: f64,
}

impl HealthSnapshot {
    pub fn with_score(overall_score: f64) -> Self {
        Self {
            overall_score,
            ..Self::default()
        }
    }
}

// ============================================================================
// Maintenance
// ============================================================================

/// A suggested maintenance action with its price tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecommendation {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub printer_id: String,
    pub component: String,
    #[serde(default)]
    pub action: String,
    #[serde(default = "default_recommendation_priority")]
    pub priority: Priority,
    pub estimated_cost: f64,
    /// Hours of work
    #[serde(default)]
    pub estimated_time: f64,
    /// Unix millis
    #[serde(default)]
    pub due_date: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub benefits: Vec<String>,
}

const fn default_recommendation_priority() -> Priority {
    Priority::Medium
}

impl MaintenanceRecommendation {
    pub fn new(component: impl Into<String>, estimated_cost: f64, action: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            printer_id: String::new(),
            component: component.into(),
            action: action.into(),
            priority: Priority::Medium,
            estimated_cost,
            estimated_time: 0.0,
            due_date: 0,
            description: String::new(),
            benefits: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceKind {
    #[default]
    Routine,
    Preventive,
    Emergency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceStatus {
    #[default]
    Scheduled,
    Completed,
    Pending,
}

/// Body of `POST /printers/{id}/maintenance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceRequest {
    /// `datetime-local` form value or RFC 3339
    pub date: String,
    #[serde(rename = "type", default)]
    pub kind: MaintenanceKind,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technician: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    pub id: String,
    pub printer_id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: MaintenanceKind,
    pub description: String,
    pub technician: String,
    pub status: MaintenanceStatus,
}

// ============================================================================
// Analytics
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl TimeRange {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Human label used in report headers.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Day => "Last 24 Hours",
            Self::Week => "Last Week",
            Self::Month => "Last Month",
            Self::Year => "Last Year",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(format!("unknown time range '{other}'")),
        }
    }
}

/// Cost and prevention roll-up for one printer over a time range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub maintenance_costs: f64,
    pub downtime_costs: f64,
    pub savings_from_predictive: f64,
    pub predicted_issues: u32,
    pub prevented_issues: u32,
    /// Uptime fraction in [0, 1]
    pub uptime: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_minimal_wire_form() {
        let json = r#"{"component": "Extruder", "estimatedCost": 120.0}"#;
        let rec: MaintenanceRecommendation = serde_json::from_str(json).unwrap();
        assert_eq!(rec.component, "Extruder");
        assert_eq!(rec.estimated_cost, 120.0);
        assert_eq!(rec.priority, Priority::Medium);
        assert!(rec.benefits.is_empty());
    }

    #[test]
    fn test_health_snapshot_camel_case() {
        let json = r#"{"overallScore": 72.5, "components": {"extruder": 70.0}}"#;
        let h: HealthSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(h.overall_score, 72.5);
        assert_eq!(h.components.get("extruder"), Some(&70.0));
        assert_eq!(h.wear_factor, 0.0);
    }

    #[test]
    fn test_maintenance_request_type_field() {
        let json = r#"{"date": "2026-11-02T09:30", "type": "emergency", "description": "Hotend swap", "technician": "R. Ortiz"}"#;
        let req: MaintenanceRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.kind, MaintenanceKind::Emergency);
    }

    #[test]
    fn test_time_range_parse() {
        assert_eq!("Year".parse::<TimeRange>().unwrap(), TimeRange::Year);
        assert!("decade".parse::<TimeRange>().is_err());
        assert_eq!(TimeRange::default(), TimeRange::Month);
    }
}
