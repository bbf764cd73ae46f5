//! Plain-text cost-benefit report.

use serde::Serialize;
use std::fmt;

use super::CostBenefitResult;

/// Qualitative verdict on a return-on-investment figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoiBand {
    /// ROI above 200%
    HighlyRecommended,
    /// ROI above 100%
    Recommended,
    /// ROI above 50%
    Consider,
    Review,
}

impl RoiBand {
    pub fn from_roi(roi: f64) -> Self {
        if roi > 200.0 {
            Self::HighlyRecommended
        } else if roi > 100.0 {
            Self::Recommended
        } else if roi > 50.0 {
            Self::Consider
        } else {
            Self::Review
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::HighlyRecommended => "highly recommended",
            Self::Recommended => "recommended",
            Self::Consider => "consider",
            Self::Review => "review",
        }
    }

    /// Verdict line printed at the bottom of the report.
    pub const fn verdict(self) -> &'static str {
        match self {
            Self::HighlyRecommended => "✅ Highly recommended - Excellent ROI",
            Self::Recommended => "✅ Recommended - Good ROI",
            Self::Consider => "⚠️ Consider - Moderate ROI",
            Self::Review => "❌ Review - Low ROI",
        }
    }
}

impl fmt::Display for RoiBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Report period used when the caller gives none.
pub const DEFAULT_TIMEFRAME: &str = "monthly";

/// Render `result` into the fixed report template.
pub fn render_report(result: &CostBenefitResult, timeframe: &str) -> String {
    Report { result, timeframe }.to_string()
}

/// A result paired with its report period; `Display` writes the template.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    pub result: &'a CostBenefitResult,
    pub timeframe: &'a str,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.result;
        writeln!(f, "Cost-Benefit Analysis Report ({})", self.timeframe)?;
        writeln!(f)?;
        writeln!(f, "Financial Impact:")?;
        writeln!(f, "• Maintenance Cost Savings: ${:.2}", r.maintenance_cost_savings)?;
        writeln!(f, "• Uptime Improvement: {:.1}%", r.uptime_improvement)?;
        writeln!(f, "• Quality Improvement: {:.1} points", r.quality_improvement)?;
        writeln!(f, "• Equipment Lifespan Extension: {:.1} years", r.lifespan_extension)?;
        writeln!(f)?;
        writeln!(f, "Total Projected Savings: ${:.2}", r.total_savings)?;
        writeln!(f, "Return on Investment: {:.1}%", r.roi)?;
        writeln!(f)?;
        writeln!(f, "Recommendations:")?;
        writeln!(f, "{}", r.roi_band().verdict())
    }
}
