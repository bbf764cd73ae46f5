//! Cost-benefit estimation for preventive maintenance.
//!
//! Projects what a set of maintenance recommendations is worth against the
//! printer's current health, using fixed linear dollar weights:
//!
//! | Benefit                | Weight            |
//! |------------------------|-------------------|
//! | Avoided reactive cost  | 1:1               |
//! | Uptime                 | $50 per point     |
//! | Print quality          | $100 per point    |
//! | Lifespan               | $1000 per year    |
//!
//! [`estimate`] is a deterministic pure function of its two inputs. Health
//! scores outside [0, 100] are clamped and negative costs count as zero.

mod report;

pub use report::{render_report, Report, RoiBand, DEFAULT_TIMEFRAME};

use serde::{Deserialize, Serialize};

use crate::types::{HealthSnapshot, MaintenanceRecommendation};

/// Dollars per percentage point of uptime gained.
pub const UPTIME_POINT_VALUE: f64 = 50.0;
/// Dollars per print quality point gained.
pub const QUALITY_POINT_VALUE: f64 = 100.0;
/// Dollars per year of equipment life gained.
pub const LIFESPAN_YEAR_VALUE: f64 = 1000.0;

/// Uptime gained per recommendation (percentage points).
const UPTIME_PER_RECOMMENDATION: f64 = 5.0;
/// Lifespan gained per recommendation (years).
const LIFESPAN_PER_RECOMMENDATION: f64 = 0.5;
const UPTIME_FLOOR: f64 = 50.0;
const UPTIME_CEILING: f64 = 98.0;

/// Projected value of carrying out a set of recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBenefitResult {
    pub maintenance_cost_savings: f64,
    /// Percentage points
    pub uptime_improvement: f64,
    /// Quality points
    pub quality_improvement: f64,
    /// Years
    pub lifespan_extension: f64,
    pub total_savings: f64,
    /// Percent of preventive spend
    pub roi: f64,
}

impl CostBenefitResult {
    pub fn roi_band(&self) -> RoiBand {
        RoiBand::from_roi(self.roi)
    }
}

fn clamped_score(health: &HealthSnapshot) -> f64 {
    if health.overall_score.is_nan() {
        return 0.0;
    }
    health.overall_score.clamp(0.0, 100.0)
}

/// Expected cost of fixing things after they break, by overall health.
///
/// A step function: >80 → 50, >60 → 150, >40 → 300, otherwise 500.
pub fn reactive_cost(health: &HealthSnapshot) -> f64 {
    let score = clamped_score(health);
    if score > 80.0 {
        50.0
    } else if score > 60.0 {
        150.0
    } else if score > 40.0 {
        300.0
    } else {
        500.0
    }
}

/// Sum of estimated costs; negative entries count as zero.
pub fn preventive_cost(recommendations: &[MaintenanceRecommendation]) -> f64 {
    recommendations
        .iter()
        .map(|r| r.estimated_cost.max(0.0))
        .sum()
}

/// Quality points credited for servicing a component.
pub fn quality_bonus(component: &str) -> f64 {
    match component {
        "Extruder" => 15.0,
        "Motors" => 10.0,
        "Filament System" => 8.0,
        _ => 5.0,
    }
}

/// Current uptime estimate (percent), never below 50.
pub fn current_uptime(health: &HealthSnapshot) -> f64 {
    clamped_score(health).max(UPTIME_FLOOR)
}

/// Estimate savings and ROI for `recommendations` against `health`.
pub fn estimate(
    recommendations: &[MaintenanceRecommendation],
    health: &HealthSnapshot,
) -> CostBenefitResult {
    let count = recommendations.len() as f64;

    let preventive = preventive_cost(recommendations);
    let maintenance_cost_savings = (reactive_cost(health) - preventive).max(0.0);

    let current = current_uptime(health);
    let projected = (current + UPTIME_PER_RECOMMENDATION * count).min(UPTIME_CEILING);
    let uptime_improvement = projected - current;

    let quality_improvement: f64 = recommendations
        .iter()
        .map(|r| quality_bonus(&r.component))
        .sum();

    let lifespan_extension = LIFESPAN_PER_RECOMMENDATION * count;

    let total_savings = maintenance_cost_savings
        + uptime_improvement * UPTIME_POINT_VALUE
        + quality_improvement * QUALITY_POINT_VALUE
        + lifespan_extension * LIFESPAN_YEAR_VALUE;

    let roi = if preventive > 0.0 {
        total_savings / preventive * 100.0
    } else {
        0.0
    };

    CostBenefitResult {
        maintenance_cost_savings,
        uptime_improvement,
        quality_improvement,
        lifespan_extension,
        total_savings,
        roi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(component: &str, cost: f64) -> MaintenanceRecommendation {
        MaintenanceRecommendation::new(component, cost, "service")
    }

    #[test]
    fn test_single_extruder_at_90() {
        let r = estimate(&[rec("Extruder", 100.0)], &HealthSnapshot::with_score(90.0));
        assert_eq!(r.maintenance_cost_savings, 0.0);
        assert_eq!(r.uptime_improvement, 5.0);
        assert_eq!(r.quality_improvement, 15.0);
        assert_eq!(r.lifespan_extension, 0.5);
        assert_eq!(r.total_savings, 2250.0);
        assert_eq!(r.roi, 2250.0);
        assert_eq!(r.roi_band(), RoiBand::HighlyRecommended);
    }

    #[test]
    fn test_no_recommendations() {
        for score in [95.0, 70.0, 50.0, 10.0] {
            let health = HealthSnapshot::with_score(score);
            let r = estimate(&[], &health);
            assert_eq!(r.maintenance_cost_savings, reactive_cost(&health));
            assert_eq!(r.uptime_improvement, 0.0);
            assert_eq!(r.quality_improvement, 0.0);
            assert_eq!(r.lifespan_extension, 0.0);
            assert_eq!(r.roi, 0.0);
        }
    }

    #[test]
    fn test_reactive_cost_thresholds_are_strict() {
        let cost = |s: f64| reactive_cost(&HealthSnapshot::with_score(s));
        assert_eq!(cost(80.1), 50.0);
        assert_eq!(cost(80.0), 150.0);
        assert_eq!(cost(60.0), 300.0);
        assert_eq!(cost(40.0), 500.0);
        assert_eq!(cost(0.0), 500.0);
    }

    #[test]
    fn test_uptime_capped_at_98() {
        let recs: Vec<_> = (0..4).map(|_| rec("Belts", 10.0)).collect();
        let r = estimate(&recs, &HealthSnapshot::with_score(90.0));
        assert_eq!(r.uptime_improvement, 8.0);
    }

    #[test]
    fn test_uptime_floor_at_50() {
        let r = estimate(&[rec("Bed", 10.0)], &HealthSnapshot::with_score(20.0));
        // 50 -> 55
        assert_eq!(r.uptime_improvement, 5.0);
    }

    #[test]
    fn test_quality_bonus_by_component() {
        let recs = [
            rec("Extruder", 0.0),
            rec("Motors", 0.0),
            rec("Filament System", 0.0),
            rec("Nozzle", 0.0),
        ];
        let r = estimate(&recs, &HealthSnapshot::with_score(100.0));
        assert_eq!(r.quality_improvement, 38.0);
        // zero preventive spend means no ROI figure
        assert_eq!(r.roi, 0.0);
    }

    #[test]
    fn test_savings_never_negative() {
        let r = estimate(&[rec("Motors", 900.0)], &HealthSnapshot::with_score(30.0));
        assert_eq!(r.maintenance_cost_savings, 0.0);
    }

    #[test]
    fn test_out_of_range_score_is_clamped() {
        let high = estimate(&[], &HealthSnapshot::with_score(180.0));
        let capped = estimate(&[], &HealthSnapshot::with_score(100.0));
        assert_eq!(high, capped);

        let negative = estimate(&[rec("Bed", 50.0)], &HealthSnapshot::with_score(-20.0));
        let zero = estimate(&[rec("Bed", 50.0)], &HealthSnapshot::with_score(0.0));
        assert_eq!(negative, zero);
    }

    #[test]
    fn test_negative_cost_counts_as_zero() {
        let r = estimate(
            &[rec("Bed", -40.0), rec("Nozzle", 60.0)],
            &HealthSnapshot::with_score(50.0),
        );
        assert_eq!(preventive_cost(&[rec("Bed", -40.0), rec("Nozzle", 60.0)]), 60.0);
        assert_eq!(r.maintenance_cost_savings, 240.0);
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let recs = [rec("Extruder", 75.0), rec("Motors", 40.0)];
        let health = HealthSnapshot::with_score(66.0);
        assert_eq!(estimate(&recs, &health), estimate(&recs, &health));
    }
}
