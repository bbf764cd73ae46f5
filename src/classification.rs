//! Severity bands used across the dashboard.
//!
//! Two scales:
//! - 0-100 health scores: ≥80 good, ≥60 moderate, otherwise poor
//! - 0-1 wear / thermal stress fractions: <0.3 low, <0.6 moderate, otherwise high

use serde::Serialize;

use crate::types::{Alert, Priority};

// ============================================================================
// Health score bands
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthBand {
    Good,
    Moderate,
    Poor,
}

impl HealthBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Good
        } else if score >= 60.0 {
            Self::Moderate
        } else {
            Self::Poor
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Good => "green",
            Self::Moderate => "yellow",
            Self::Poor => "red",
        }
    }
}

// ============================================================================
// Stress / wear bands
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StressLevel {
    Low,
    Moderate,
    High,
}

impl StressLevel {
    pub fn from_fraction(value: f64) -> Self {
        if value < 0.3 {
            Self::Low
        } else if value < 0.6 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "green",
            Self::Moderate => "yellow",
            Self::High => "red",
        }
    }

    pub const fn wear_text(self) -> &'static str {
        match self {
            Self::Low => "Normal wear pattern",
            Self::Moderate => "Moderate wear detected",
            Self::High => "High wear level - maintenance needed",
        }
    }

    pub const fn thermal_text(self) -> &'static str {
        match self {
            Self::Low => "Temperature within optimal range",
            Self::Moderate => "Moderate thermal stress",
            Self::High => "High thermal stress - adjust settings",
        }
    }

    /// Maintenance cadence implied by this wear level.
    pub const fn schedule_text(self) -> &'static str {
        match self {
            Self::Low => "Regular maintenance schedule",
            Self::Moderate => "Increased monitoring recommended",
            Self::High => "Immediate maintenance required",
        }
    }

    pub const fn advice_text(self) -> &'static str {
        match self {
            Self::Low => "Continue with regular maintenance schedule.",
            Self::Moderate => "Consider scheduling preventive maintenance in the next few days.",
            Self::High => "Schedule maintenance as soon as possible to prevent potential issues.",
        }
    }
}

/// `0.456` → `"46%"`.
pub fn format_percentage(fraction: f64) -> String {
    format!("{}%", (fraction * 100.0).round())
}

// ============================================================================
// Classified views
// ============================================================================

/// A 0-1 reading with its band and description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StressReading {
    pub value: f64,
    pub percent: String,
    pub level: StressLevel,
    pub color: &'static str,
    pub text: &'static str,
}

impl StressReading {
    pub fn wear(value: f64) -> Self {
        let level = StressLevel::from_fraction(value);
        Self {
            value,
            percent: format_percentage(value),
            level,
            color: level.color(),
            text: level.wear_text(),
        }
    }

    pub fn thermal(value: f64) -> Self {
        let level = StressLevel::from_fraction(value);
        Self {
            value,
            percent: format_percentage(value),
            level,
            color: level.color(),
            text: level.thermal_text(),
        }
    }
}

/// A 0-100 score with its band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReading {
    pub score: f64,
    pub band: HealthBand,
    pub color: &'static str,
}

impl ScoreReading {
    pub fn new(score: f64) -> Self {
        let band = HealthBand::from_score(score);
        Self {
            score,
            band,
            color: band.color(),
        }
    }
}

// ============================================================================
// Alerts
// ============================================================================

/// Maintenance items from critical alerts, then from high-priority alerts.
pub fn priority_actions(alerts: &[Alert]) -> Vec<String> {
    [Priority::Critical, Priority::High]
        .into_iter()
        .flat_map(|priority| {
            alerts
                .iter()
                .filter(move |a| a.priority == priority)
                .flat_map(|a| a.maintenance_items.iter().flatten().cloned())
        })
        .collect()
}
