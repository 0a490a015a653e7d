//! Cross-frequency comparison (phase 6).
//!
//! Each cadence is a full re-simulation over identical inputs. The
//! recommendation minimizes total financing cost; exact ties go to the more
//! frequent cadence because `VerificationFrequency::ALL` is ordered
//! monthly-first and only a strictly lower cost displaces the incumbent.

use crate::{
    cadence::VerificationFrequency,
    config::InsightThresholds,
    error::{VerifyError, VerifyResult},
    inputs::VerificationInputs,
    metrics,
    projection::Projection,
    types::Money,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyScenario {
    pub frequency:            VerificationFrequency,
    pub total_revenue:        Money,
    pub avg_working_capital:  Money,
    pub financing_cost_total: Money,
    /// Peak working-capital balance, i.e. the most debt the cadence needs.
    pub max_working_capital:  Money,
    pub npv:                  Money,
    pub payback_period:       usize,
}

impl FrequencyScenario {
    pub fn from_projection(projection: &Projection, discount_rate: f64) -> VerifyResult<Self> {
        metrics::ensure_finite(projection)?;
        Ok(Self {
            frequency:            projection.frequency,
            total_revenue:        metrics::finite("totalRevenue", projection.total_revenue())?,
            avg_working_capital:  metrics::finite("avgWorkingCapital", projection.avg_working_capital())?,
            financing_cost_total: metrics::finite("financingCostTotal", projection.total_financing_cost())?,
            max_working_capital:  metrics::finite("maxWorkingCapital", projection.max_working_capital())?,
            npv:                  metrics::finite("npv", metrics::npv(&projection.months, discount_rate))?,
            payback_period:       metrics::payback_period(&projection.months),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationComparison {
    pub scenarios:             BTreeMap<VerificationFrequency, FrequencyScenario>,
    pub recommended_frequency: VerificationFrequency,
    pub key_insights:          Vec<String>,
    pub risk_factors:          Vec<String>,
}

/// Lowest financing cost wins; earlier (more frequent) cadences win ties.
pub fn recommend(
    scenarios: &BTreeMap<VerificationFrequency, FrequencyScenario>,
) -> Option<VerificationFrequency> {
    let mut best: Option<&FrequencyScenario> = None;
    for frequency in VerificationFrequency::ALL {
        let Some(candidate) = scenarios.get(&frequency) else {
            continue;
        };
        match best {
            Some(current) if candidate.financing_cost_total >= current.financing_cost_total => {}
            _ => best = Some(candidate),
        }
    }
    best.map(|s| s.frequency)
}

pub fn compare_scenarios(
    inputs: &VerificationInputs,
    projections: &[Projection],
    thresholds: &InsightThresholds,
) -> VerifyResult<VerificationComparison> {
    let discount_rate = inputs.discount_rate.unwrap_or(0.0);

    let mut scenarios = BTreeMap::new();
    for projection in projections {
        let scenario = FrequencyScenario::from_projection(projection, discount_rate)?;
        log::debug!(
            "{} scenario: revenue={:.0} financing={:.0} avg_wc={:.0} max_wc={:.0} payback={}",
            scenario.frequency,
            scenario.total_revenue,
            scenario.financing_cost_total,
            scenario.avg_working_capital,
            scenario.max_working_capital,
            scenario.payback_period
        );
        scenarios.insert(scenario.frequency, scenario);
    }

    let recommended_frequency = recommend(&scenarios)
        .ok_or_else(|| VerifyError::computation("no verification scenarios were computed"))?;

    let horizon = inputs.total_months()?;
    let (key_insights, risk_factors) =
        build_insights(inputs, &scenarios, recommended_frequency, horizon, thresholds);

    Ok(VerificationComparison {
        scenarios,
        recommended_frequency,
        key_insights,
        risk_factors,
    })
}

fn build_insights(
    inputs: &VerificationInputs,
    scenarios: &BTreeMap<VerificationFrequency, FrequencyScenario>,
    recommended: VerificationFrequency,
    horizon: usize,
    thresholds: &InsightThresholds,
) -> (Vec<String>, Vec<String>) {
    let mut insights = Vec::new();
    let mut risks = Vec::new();

    if let (Some(monthly), Some(annual)) = (
        scenarios.get(&VerificationFrequency::Monthly),
        scenarios.get(&VerificationFrequency::Annual),
    ) {
        let saving = annual.financing_cost_total - monthly.financing_cost_total;
        if saving > 0.0 {
            insights.push(format!(
                "Monthly verification saves {saving:.0} in working-capital financing versus annual verification"
            ));
        }
    }

    if let Some(best) = scenarios.get(&recommended) {
        if best.payback_period < horizon && best.payback_period < thresholds.early_payback_months {
            insights.push(format!(
                "Cumulative cash flow turns non-negative in month {} with {recommended} verification",
                best.payback_period + 1
            ));
        }
        if best.payback_period >= horizon {
            risks.push(format!(
                "Cumulative cash flow stays negative for the whole {horizon}-month horizon"
            ));
        }

        let debt_limit = inputs.annual_production_value() * thresholds.high_debt_revenue_share;
        if best.max_working_capital > debt_limit {
            risks.push(format!(
                "Peak working capital of {:.0} may pose financing challenges",
                best.max_working_capital
            ));
        }
    }

    if inputs.project_type.is_nature_based() {
        risks.push(
            "Natural carbon projects face seasonal and climate-related verification risks".to_string(),
        );
    }

    (insights, risks)
}
