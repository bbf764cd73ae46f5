//! Dashboard form and view state.
//!
//! [`PredictionForm`] owns the parameters being edited and re-validates on
//! every change; [`PredictionForm::submit`] validates again before anything
//! leaves the process. [`Panel`] holds what one dashboard panel shows: a
//! failed request records an error and leaves the last good data in place.

use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

use crate::backend::PredictionService;
use crate::types::{Choice, InfillPattern, Material, PredictionResult, PrintParameters};
use crate::validator::{self, ValidationWarning};

/// Shown when submission is attempted with outstanding violations.
pub const FIX_ERRORS_MESSAGE: &str = "Please fix validation errors before submitting.";

// ============================================================================
// Panel state
// ============================================================================

/// What one panel displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub loading: bool,
}

impl<T> Default for Panel<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            loading: false,
        }
    }
}

impl<T> Panel<T> {
    pub fn begin(&mut self) {
        self.loading = true;
    }

    /// Record the outcome of a request. Errors keep the previous data.
    pub fn finish(&mut self, outcome: Result<T, String>) {
        self.loading = false;
        match outcome {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(message) => {
                self.error = Some(message);
            }
        }
    }
}

// ============================================================================
// Form fields
// ============================================================================

/// Numeric fields of the prediction form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamField {
    NozzleTemperature,
    BedTemperature,
    PrintSpeed,
    FanSpeed,
    LayerHeight,
    WallThickness,
    NozzleDiameter,
    PrintTime,
    InfillDensity,
}

impl FromStr for ParamField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nozzle_temperature" => Ok(Self::NozzleTemperature),
            "bed_temperature" => Ok(Self::BedTemperature),
            "print_speed" => Ok(Self::PrintSpeed),
            "fan_speed" => Ok(Self::FanSpeed),
            "layer_height" => Ok(Self::LayerHeight),
            "wall_thickness" => Ok(Self::WallThickness),
            "nozzle_diameter" => Ok(Self::NozzleDiameter),
            "print_time" => Ok(Self::PrintTime),
            "infill_density" => Ok(Self::InfillDensity),
            other => Err(format!("unknown form field '{other}'")),
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// Submit-time gate refused the parameters
    #[error("{}", FIX_ERRORS_MESSAGE)]
    Invalid(Vec<String>),

    /// The prediction service failed; carries the user-facing message
    #[error("{0}")]
    Service(String),
}

// ============================================================================
// Prediction form
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionForm {
    params: PrintParameters,
    violations: Vec<String>,
}

impl Default for PredictionForm {
    fn default() -> Self {
        Self::new(PrintParameters::default())
    }
}

impl PredictionForm {
    pub fn new(params: PrintParameters) -> Self {
        let violations = validator::validate(&params);
        Self { params, violations }
    }

    pub const fn params(&self) -> &PrintParameters {
        &self.params
    }

    /// Violations as of the last edit.
    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    pub fn advisories(&self) -> Vec<ValidationWarning> {
        validator::material_advisories(&self.params)
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    fn revalidate(&mut self) {
        self.violations = validator::validate(&self.params);
    }

    /// Switch material and load its defaults.
    pub fn select_material(&mut self, material: Material) {
        self.params.material = Choice::Known(material);
        self.params.apply_defaults(material.defaults());
        self.revalidate();
    }

    /// Set the material from a raw form value. Unknown values are kept and
    /// reported as a violation; defaults only load for known materials.
    pub fn select_material_str(&mut self, raw: &str) {
        match raw.parse::<Material>() {
            Ok(m) => self.select_material(m),
            Err(_) => {
                self.params.material = Choice::Unknown(raw.to_string());
                self.revalidate();
            }
        }
    }

    pub fn set_infill_pattern(&mut self, raw: &str) {
        self.params.infill_pattern = InfillPattern::ALL
            .into_iter()
            .find(|p| p.as_str() == raw)
            .map_or_else(|| Choice::Unknown(raw.to_string()), Choice::Known);
        self.revalidate();
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn set_field(&mut self, field: ParamField, value: f64) {
        let p = &mut self.params;
        match field {
            ParamField::NozzleTemperature => p.nozzle_temperature = value,
            ParamField::BedTemperature => p.bed_temperature = value,
            ParamField::PrintSpeed => p.print_speed = value,
            ParamField::FanSpeed => p.fan_speed = value,
            ParamField::LayerHeight => p.layer_height = value,
            ParamField::WallThickness => p.wall_thickness = value,
            ParamField::NozzleDiameter => p.nozzle_diameter = value,
            ParamField::PrintTime => {
                p.print_time = if value.is_finite() { value.trunc() as i64 } else { 0 };
            }
            ParamField::InfillDensity => p.infill_density = value,
        }
        self.revalidate();
    }

    /// Apply a raw text edit. Text that is not a number is stored as NaN and
    /// shows up as a violation on that field.
    pub fn set_field_text(&mut self, name: &str, text: &str) -> Result<(), String> {
        let field: ParamField = name.parse()?;
        let value = text.trim().parse::<f64>().unwrap_or(f64::NAN);
        self.set_field(field, value);
        Ok(())
    }

    /// Validate again and, if clean, ask `service` for a prediction.
    pub async fn submit<S>(&mut self, service: &S) -> Result<PredictionResult, SubmitError>
    where
        S: PredictionService + ?Sized,
    {
        self.revalidate();
        if !self.is_valid() {
            warn!(violations = self.violations.len(), "Prediction submit blocked by validation");
            return Err(SubmitError::Invalid(self.violations.clone()));
        }

        info!(material = %self.params.material, "Submitting prediction request");
        service
            .predict(&self.params)
            .await
            .map_err(|e| SubmitError::Service(e.user_message()))
    }
}

// ============================================================================
// Prediction page
// ============================================================================

/// Form plus result panel for the prediction page.
#[derive(Debug, Default)]
pub struct PredictionPage {
    pub form: PredictionForm,
    pub result: Panel<PredictionResult>,
}

impl PredictionPage {
    pub async fn submit<S>(&mut self, service: &S)
    where
        S: PredictionService + ?Sized,
    {
        self.result.begin();
        let outcome = self.form.submit(service).await.map_err(|e| e.to_string());
        self.result.finish(outcome);
    }
}
