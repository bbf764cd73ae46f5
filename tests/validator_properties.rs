//! Validator and Estimator Properties
//!
//! Behavioural checks on the pure functions: validation totality and
//! idempotence, single-field violations, estimator reference values, and
//! the form's submit gate.

use printwatch::backend::{ClientError, PredictionService};
use printwatch::cost_benefit::{estimate, RoiBand};
use printwatch::session::{ParamField, PredictionForm, SubmitError};
use printwatch::types::{
    HealthSnapshot, MaintenanceRecommendation, Material, PredictionResult, PrintParameters,
};
use printwatch::validator::{self, RANGE_RULES};

use async_trait::async_trait;

#[test]
fn material_defaults_are_valid() {
    for material in Material::ALL {
        let params = PrintParameters::for_material(material);
        assert!(
            validator::validate(&params).is_empty(),
            "{material} defaults should validate"
        );
        assert!(
            validator::material_advisories(&params).is_empty(),
            "{material} defaults should sit inside the recommended window"
        );
    }
}

#[test]
fn one_step_outside_each_range_names_that_field() {
    for rule in &RANGE_RULES {
        for value in [rule.min - 0.01, rule.max + 0.01] {
            let mut form = PredictionForm::default();
            form.set_field_text(rule.field, &value.to_string()).unwrap();
            let violations = validator::validate_detailed(form.params());
            assert_eq!(violations.len(), 1, "{} = {value}", rule.field);
            assert_eq!(violations[0].field, rule.field);
        }
    }
}

#[test]
fn bounds_are_inclusive() {
    for rule in &RANGE_RULES {
        for value in [rule.min, rule.max] {
            let mut form = PredictionForm::default();
            form.set_field_text(rule.field, &value.to_string()).unwrap();
            assert!(form.is_valid(), "{} = {value} should pass", rule.field);
        }
    }
}

#[test]
fn non_finite_values_are_violations() {
    for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let mut form = PredictionForm::default();
        form.set_field(ParamField::LayerHeight, value);
        assert_eq!(
            form.violations(),
            ["Layer height must be between 0.05mm and 0.4mm"]
        );
    }
}

#[test]
fn validation_is_idempotent() {
    let mut params = PrintParameters::default();
    params.bed_temperature = 130.0;
    params.wall_thickness = 0.1;
    let first = validator::validate(&params);
    assert_eq!(first.len(), 2);
    assert_eq!(validator::validate(&params), first);
}

#[test]
fn estimate_without_recommendations() {
    let health = HealthSnapshot::with_score(65.0);
    let result = estimate(&[], &health);
    assert_eq!(result.maintenance_cost_savings, 150.0);
    assert_eq!(result.uptime_improvement, 0.0);
    assert_eq!(result.quality_improvement, 0.0);
    assert_eq!(result.lifespan_extension, 0.0);
    assert_eq!(result.roi, 0.0);
}

#[test]
fn estimate_reference_case() {
    let health = HealthSnapshot::with_score(90.0);
    let recs = [MaintenanceRecommendation::new("Extruder", 100.0, "Clean gear")];
    let result = estimate(&recs, &health);
    assert_eq!(result.total_savings, 2250.0);
    assert_eq!(result.roi, 2250.0);
    assert_eq!(result.roi_band(), RoiBand::HighlyRecommended);
}

#[test]
fn estimate_is_deterministic() {
    let health = HealthSnapshot::with_score(47.0);
    let recs = [
        MaintenanceRecommendation::new("Motors", 80.0, "Lubricate"),
        MaintenanceRecommendation::new("Filament System", 40.0, "Replace PTFE tube"),
    ];
    assert_eq!(estimate(&recs, &health), estimate(&recs, &health));
}

struct NeverCalled;

#[async_trait]
impl PredictionService for NeverCalled {
    async fn predict(&self, _params: &PrintParameters) -> Result<PredictionResult, ClientError> {
        panic!("submit gate let invalid parameters through");
    }
}

#[test]
fn submit_gate_revalidates() {
    let mut form = PredictionForm::default();
    form.set_field_text("infill_density", "101").unwrap();

    let outcome = tokio_test::block_on(form.submit(&NeverCalled));
    match outcome {
        Err(SubmitError::Invalid(violations)) => {
            assert_eq!(violations, ["Infill density must be between 0% and 100%"]);
        }
        other => panic!("expected Invalid, got {other:?}"),
    }
}
