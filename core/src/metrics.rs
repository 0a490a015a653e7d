//! Summary financial metrics (phase 7).
//!
//! RULE: No metric may return NaN or ±Infinity. Divisions with a zero
//! denominator resolve to a documented sentinel instead.

use crate::{
    error::{VerifyError, VerifyResult},
    projection::{MonthlyProjection, Projection},
    types::{Money, MONTHS_PER_YEAR},
};

/// (revenue − costs) / costs. Sentinel 0 when costs are 0.
pub fn project_roi(total_revenue: Money, total_costs: Money) -> f64 {
    if total_costs > 0.0 {
        (total_revenue - total_costs) / total_costs
    } else {
        0.0
    }
}

/// First month index whose cumulative cash flow is non-negative.
/// Saturates at the horizon length when payback never happens.
pub fn payback_period(months: &[MonthlyProjection]) -> usize {
    months
        .iter()
        .position(|m| m.cumulative_cash_flow >= 0.0)
        .unwrap_or(months.len())
}

/// Monthly equivalent of an annual discount rate: (1 + r)^(1/12) − 1.
pub fn monthly_discount_rate(annual_rate: f64) -> f64 {
    (1.0 + annual_rate).powf(1.0 / MONTHS_PER_YEAR as f64) - 1.0
}

/// Σ netCashFlow[m] / (1 + monthly rate)^m.
pub fn npv(months: &[MonthlyProjection], annual_discount_rate: f64) -> Money {
    let monthly_rate = monthly_discount_rate(annual_discount_rate);
    let mut discount = 1.0;
    let mut total = 0.0;
    for m in months {
        total += m.net_cash_flow / discount;
        discount *= 1.0 + monthly_rate;
    }
    total
}

/// Reject a projection that carries any non-finite monetary value.
pub fn ensure_finite(projection: &Projection) -> VerifyResult<()> {
    for m in &projection.months {
        let fields = [
            ("tonnesProduced", m.tonnes_produced),
            ("recognizedRevenue", m.recognized_revenue),
            ("variableCosts", m.variable_costs),
            ("fixedCosts", m.fixed_costs),
            ("workingCapitalBalance", m.working_capital_balance),
            ("financingCost", m.financing_cost),
            ("netCashFlow", m.net_cash_flow),
            ("cumulativeCashFlow", m.cumulative_cash_flow),
            ("operatingMargin", m.operating_margin),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(VerifyError::computation(format!(
                "{} projection month {}: {name} is {value}",
                projection.frequency, m.month_index
            )));
        }
    }
    Ok(())
}

/// Check a single summary figure before it leaves the engine.
pub fn finite(name: &str, value: f64) -> VerifyResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(VerifyError::computation(format!("{name} is {value}")))
    }
}
