//! Print parameter validation.
//!
//! Two layers:
//!
//! - **Hard ranges** ([`validate`]): fixed machine limits. Any violation blocks
//!   submission to the prediction service. Every rule is evaluated, results
//!   come back in rule order, one message per failing rule.
//! - **Material guidance** ([`material_advisories`]): the recommended window
//!   for the selected filament. Advisory only, never blocks.
//!
//! Both are pure functions of their input so the form can call them on every
//! edit and again at submit time and get identical answers.

use serde::Serialize;

use crate::types::{Choice, PrintParameters};

// ============================================================================
// Results
// ============================================================================

/// One failed hard-range rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Wire name of the offending field (e.g. `nozzle_temperature`)
    pub field: &'static str,
    pub message: String,
}

/// A non-fatal warning (suspicious value, typo).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Hard ranges
// ============================================================================

/// Inclusive numeric limit for one field.
#[derive(Debug, Clone, Copy)]
pub struct RangeRule {
    pub field: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
    read: fn(&PrintParameters) -> f64,
}

impl RangeRule {
    /// NaN and infinities are rejected along with out-of-range values.
    pub fn accepts(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn value(&self, params: &PrintParameters) -> f64 {
        (self.read)(params)
    }

    fn message(&self) -> String {
        format!(
            "{} must be between {}{} and {}{}",
            self.label, self.min, self.unit, self.max, self.unit
        )
    }
}

/// Numeric rules in reporting order. Material is checked before these and
/// infill pattern after.
pub static RANGE_RULES: [RangeRule; 8] = [
    RangeRule {
        field: "nozzle_temperature",
        label: "Nozzle temperature",
        min: 160.0,
        max: 300.0,
        unit: "°C",
        read: |p| p.nozzle_temperature,
    },
    RangeRule {
        field: "bed_temperature",
        label: "Bed temperature",
        min: 0.0,
        max: 120.0,
        unit: "°C",
        read: |p| p.bed_temperature,
    },
    RangeRule {
        field: "print_speed",
        label: "Print speed",
        min: 10.0,
        max: 150.0,
        unit: "mm/s",
        read: |p| p.print_speed,
    },
    RangeRule {
        field: "fan_speed",
        label: "Fan speed",
        min: 0.0,
        max: 100.0,
        unit: "%",
        read: |p| p.fan_speed,
    },
    RangeRule {
        field: "layer_height",
        label: "Layer height",
        min: 0.05,
        max: 0.4,
        unit: "mm",
        read: |p| p.layer_height,
    },
    RangeRule {
        field: "wall_thickness",
        label: "Wall thickness",
        min: 0.4,
        max: 2.0,
        unit: "mm",
        read: |p| p.wall_thickness,
    },
    RangeRule {
        field: "nozzle_diameter",
        label: "Nozzle diameter",
        min: 0.2,
        max: 1.0,
        unit: "mm",
        read: |p| p.nozzle_diameter,
    },
    RangeRule {
        field: "infill_density",
        label: "Infill density",
        min: 0.0,
        max: 100.0,
        unit: "%",
        read: |p| p.infill_density,
    },
];

/// Check every hard-range rule and return the failures in rule order.
pub fn validate_detailed(params: &PrintParameters) -> Vec<Violation> {
    let mut violations = Vec::new();

    if let Choice::Unknown(raw) = &params.material {
        violations.push(Violation {
            field: "material",
            message: format!("Invalid material type: {raw}"),
        });
    }

    for rule in &RANGE_RULES {
        if !rule.accepts(rule.value(params)) {
            violations.push(Violation {
                field: rule.field,
                message: rule.message(),
            });
        }
    }

    if let Choice::Unknown(raw) = &params.infill_pattern {
        violations.push(Violation {
            field: "infill_pattern",
            message: format!("Invalid infill pattern: {raw}"),
        });
    }

    violations
}

/// Human-readable violation messages, empty when the parameters may be submitted.
pub fn validate(params: &PrintParameters) -> Vec<String> {
    validate_detailed(params)
        .into_iter()
        .map(|v| v.message)
        .collect()
}

// ============================================================================
// Material guidance
// ============================================================================

fn outside_window(
    warnings: &mut Vec<ValidationWarning>,
    field: &str,
    label: &str,
    value: f64,
    (min, max): (f64, f64),
    unit: &str,
    material: &str,
) {
    if value.is_finite() && !(min..=max).contains(&value) {
        warnings.push(ValidationWarning {
            field: field.to_string(),
            message: format!(
                "{label} {value}{unit} is outside the recommended {min}-{max}{unit} for {material}"
            ),
            suggestion: Some(format!("{}{unit}", (min + max) / 2.0)),
        });
    }
}

/// Warnings for values outside the selected material's recommended window.
///
/// Returns nothing for an unknown material; that case is already a hard
/// violation.
pub fn material_advisories(params: &PrintParameters) -> Vec<ValidationWarning> {
    let Some(material) = params.material.known() else {
        return Vec::new();
    };
    let g = material.guidance();
    let name = material.as_str();
    let mut warnings = Vec::new();

    outside_window(
        &mut warnings,
        "nozzle_temperature",
        "Nozzle temperature",
        params.nozzle_temperature,
        g.nozzle_temperature,
        "°C",
        name,
    );
    outside_window(
        &mut warnings,
        "bed_temperature",
        "Bed temperature",
        params.bed_temperature,
        g.bed_temperature,
        "°C",
        name,
    );
    if params.print_speed.is_finite() && params.print_speed > g.max_print_speed {
        warnings.push(ValidationWarning {
            field: "print_speed".to_string(),
            message: format!(
                "Print speed {}mm/s exceeds the recommended maximum of {}mm/s for {name}",
                params.print_speed, g.max_print_speed
            ),
            suggestion: Some(format!("{}mm/s", g.max_print_speed)),
        });
    }
    outside_window(
        &mut warnings,
        "fan_speed",
        "Fan speed",
        params.fan_speed,
        g.fan_speed,
        "%",
        name,
    );
    outside_window(
        &mut warnings,
        "layer_height",
        "Layer height",
        params.layer_height,
        g.layer_height,
        "mm",
        name,
    );
    outside_window(
        &mut warnings,
        "wall_thickness",
        "Wall thickness",
        params.wall_thickness,
        g.wall_thickness,
        "mm",
        name,
    );

    warnings
}
