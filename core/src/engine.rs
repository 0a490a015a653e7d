//! The financial engine: inputs in, complete financial model out.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Structural checks      (reject contradictions, no range validation)
//!   2. Projection per cadence (phases 1–5, all four cadences)
//!   3. Comparison             (phase 6)
//!   4. Summary metrics        (phase 7, on the REQUESTED cadence)
//!
//! RULES:
//!   - Pure: no I/O, no shared mutable state, no randomness.
//!   - Either a complete model is returned or an error; never a partial one.
//!   - No NaN or ±Infinity leaves the engine.

use crate::{
    cadence::VerificationFrequency,
    comparison,
    config::EngineConfig,
    error::{VerifyError, VerifyResult},
    inputs::VerificationInputs,
    metrics,
    model::VerificationFinancialModel,
    projection::{self, Projection},
    risk,
};

#[derive(Debug, Clone, Default)]
pub struct FinancialEngine {
    config: EngineConfig,
}

impl FinancialEngine {
    /// Rejects a risk model whose score would not be monotonic in
    /// verification frequency.
    pub fn new(config: EngineConfig) -> VerifyResult<Self> {
        config.risk.check()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn calculate(&self, inputs: &VerificationInputs) -> VerifyResult<VerificationFinancialModel> {
        log::info!(
            "Starting verification calculation: project='{}' type={} tonnes={} frequency={}",
            inputs.project_name,
            inputs.project_type,
            inputs.annual_tonnes,
            inputs.verification_frequency
        );

        check_structure(inputs)?;

        let projections = VerificationFrequency::ALL
            .into_iter()
            .map(|frequency| projection::project(inputs, frequency))
            .collect::<VerifyResult<Vec<Projection>>>()?;

        let comparison =
            comparison::compare_scenarios(inputs, &projections, &self.config.insights)?;

        let selected = projections
            .into_iter()
            .find(|p| p.frequency == inputs.verification_frequency)
            .ok_or_else(|| {
                VerifyError::computation(format!(
                    "no projection for requested frequency {}",
                    inputs.verification_frequency
                ))
            })?;
        metrics::ensure_finite(&selected)?;

        let expected_months = inputs.total_months()?;
        if selected.months.len() != expected_months {
            return Err(VerifyError::computation(format!(
                "projection has {} months, expected {expected_months}",
                selected.months.len()
            )));
        }

        // ── Summary ────────────────────────────────────────────

        let total_project_revenue = metrics::finite("totalProjectRevenue", selected.total_revenue())?;
        let total_project_costs = metrics::finite("totalProjectCosts", selected.total_costs())?;
        let project_roi = metrics::finite(
            "projectROI",
            metrics::project_roi(total_project_revenue, total_project_costs),
        )?;
        let payback_period = metrics::payback_period(&selected.months);
        let npv = metrics::finite(
            "npv",
            metrics::npv(&selected.months, inputs.discount_rate.unwrap_or(0.0)),
        )?;
        let climate_risk_score = risk::climate_risk_score(
            &self.config.risk,
            inputs.project_type,
            inputs.verification_frequency,
        );

        let model = VerificationFinancialModel {
            inputs: inputs.clone(),
            monthly_projections: selected.months,
            comparison,
            verification_events: selected.events,
            total_project_revenue,
            total_project_costs,
            project_roi,
            payback_period,
            npv,
            climate_risk_score,
        };

        log::info!(
            "Verification calculation completed: revenue={:.0} roi={:.2}% payback={}{} recommended={} climate_risk={:.2}",
            model.total_project_revenue,
            model.project_roi * 100.0,
            model.payback_period,
            if model.payback_saturated() { " (not reached)" } else { "" },
            model.comparison.recommended_frequency,
            model.climate_risk_score
        );

        Ok(model)
    }
}

/// Calculate with the built-in config.
pub fn calculate_project_financials(
    inputs: &VerificationInputs,
) -> VerifyResult<VerificationFinancialModel> {
    FinancialEngine::default().calculate(inputs)
}

/// Contradictions the engine cannot compute through, even though range
/// validation is the caller's job.
fn check_structure(inputs: &VerificationInputs) -> VerifyResult<()> {
    if inputs.project_duration == 0 {
        return Err(VerifyError::invalid("projectDuration must be at least one year"));
    }
    inputs.total_months()?;

    let numeric = [
        ("annualTonnes", inputs.annual_tonnes),
        ("pricePerTonne", inputs.price_per_tonne),
        ("variableCostPerTonne", inputs.variable_cost_per_tonne),
        ("annualFixedCosts", inputs.annual_fixed_costs),
        ("costOfFinancing", inputs.cost_of_financing),
        ("carbonPriceGrowth", inputs.carbon_price_growth.unwrap_or(0.0)),
        ("discountRate", inputs.discount_rate.unwrap_or(0.0)),
    ];
    if let Some((name, value)) = numeric.iter().find(|(_, v)| !v.is_finite()) {
        return Err(VerifyError::invalid(format!("{name} is {value}")));
    }

    let multipliers = inputs
        .operational_ramp
        .iter()
        .flatten()
        .chain(inputs.seasonality_factors.iter().flatten());
    for &m in multipliers {
        if !m.is_finite() || m < 0.0 {
            return Err(VerifyError::invalid(format!(
                "production multiplier {m} must be a finite, non-negative number"
            )));
        }
    }

    if inputs.carbon_price_growth.unwrap_or(0.0) <= -1.0 {
        return Err(VerifyError::invalid("carbonPriceGrowth must be above -100%"));
    }
    if inputs.discount_rate.unwrap_or(0.0) <= -1.0 {
        return Err(VerifyError::invalid("discountRate must be above -100%"));
    }
    Ok(())
}
