//! The engine's output: one per calculation, never mutated after return.

use crate::{
    comparison::VerificationComparison,
    event::VerificationEvent,
    inputs::VerificationInputs,
    projection::MonthlyProjection,
    types::Money,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationFinancialModel {
    pub inputs:              VerificationInputs,
    pub monthly_projections: Vec<MonthlyProjection>,
    pub comparison:          VerificationComparison,
    pub verification_events: Vec<VerificationEvent>,

    // Summary, on the requested cadence
    pub total_project_revenue: Money,
    pub total_project_costs:   Money,
    #[serde(rename = "projectROI")]
    pub project_roi:           f64,
    /// Month index of payback; equals the horizon length when never reached.
    pub payback_period:        usize,
    pub npv:                   Money,
    pub climate_risk_score:    f64,
}

impl VerificationFinancialModel {
    /// True when cumulative cash flow never turned non-negative.
    pub fn payback_saturated(&self) -> bool {
        self.payback_period >= self.monthly_projections.len()
    }
}
