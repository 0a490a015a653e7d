//! Monthly cash-flow projection (phases 3–5).
//!
//! EXECUTION ORDER per month (fixed, never reordered):
//!   1. Production   tonnes produced, escalated price
//!   2. Recognition  does this month close? release pending tonnes/value
//!   3. Costs        variable costs as produced, fixed costs pro-rata
//!   4. Financing    interest on the PRIOR month's working-capital balance
//!   5. Cash         net cash flow, cumulative totals
//!
//! RULES:
//!   - Costs are incurred as produced, independent of the cadence.
//!   - Production value is accumulated at the producing year's price and
//!     released whole on the next close, so nothing is lost or double-counted.
//!   - The final project month always closes.

use crate::{
    cadence::VerificationFrequency,
    calendar::ProjectCalendar,
    error::VerifyResult,
    event::VerificationEvent,
    inputs::VerificationInputs,
    schedule::ProductionSchedule,
    types::{MonthIndex, Money, Tonnes, MONTHS_PER_YEAR},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProjection {
    pub month_index: MonthIndex,
    pub period:      String,

    // Production
    pub tonnes_produced:   Tonnes,
    pub cumulative_tonnes: Tonnes,
    pub price_per_tonne:   Money,
    pub production_value:  Money,

    // Recognition
    pub verification_due:   bool,
    pub recognized_tonnes:  Tonnes,
    pub recognized_revenue: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_issue_date:  Option<NaiveDate>,

    // Costs
    pub variable_costs:   Money,
    pub fixed_costs:      Money,
    pub operating_income: Money,
    pub operating_margin: f64,

    // Working capital
    pub working_capital_balance:   Money,
    pub financing_cost:            Money,
    pub cumulative_financing_cost: Money,

    // Cash
    pub net_cash_flow:        Money,
    pub cumulative_cash_flow: Money,
}

/// One full run of the monthly loop for a single cadence.
#[derive(Debug, Clone)]
pub struct Projection {
    pub frequency: VerificationFrequency,
    pub months:    Vec<MonthlyProjection>,
    pub events:    Vec<VerificationEvent>,
}

/// Production accumulated since the last close.
#[derive(Debug, Default)]
struct PendingVerification {
    tonnes: Tonnes,
    value:  Money,
    months: usize,
}

impl PendingVerification {
    fn accrue(&mut self, tonnes: Tonnes, price: Money) {
        self.tonnes += tonnes;
        self.value += tonnes * price;
        self.months += 1;
    }

    fn release(&mut self) -> PendingVerification {
        std::mem::take(self)
    }
}

/// Run phases 1–5 over the whole horizon for `frequency`.
/// `inputs.verification_frequency` is ignored so the comparison phase can
/// re-run every cadence over identical inputs.
pub fn project(
    inputs: &VerificationInputs,
    frequency: VerificationFrequency,
) -> VerifyResult<Projection> {
    let total_months = inputs.total_months()?;
    let calendar = ProjectCalendar::new(inputs.project_start_date, total_months);
    let schedule = ProductionSchedule::from_inputs(inputs);

    let monthly_fixed_costs = inputs.annual_fixed_costs / MONTHS_PER_YEAR as f64;
    let monthly_financing_rate = inputs.cost_of_financing / MONTHS_PER_YEAR as f64;

    let mut months = Vec::with_capacity(total_months);
    let mut events = Vec::new();

    let mut pending = PendingVerification::default();
    let mut cumulative_tonnes = 0.0;
    let mut working_capital = 0.0;
    let mut cumulative_financing_cost = 0.0;
    let mut cumulative_cash_flow = 0.0;

    for month in 0..total_months {
        let year = calendar.year_of(month);
        let calendar_month = calendar.calendar_month_of(month);

        // ── Production ─────────────────────────────────────────

        let tonnes_produced = schedule.tonnes_produced(year, calendar_month);
        let price_per_tonne = schedule.effective_price(year);
        let production_value = tonnes_produced * price_per_tonne;
        cumulative_tonnes += tonnes_produced;
        pending.accrue(tonnes_produced, price_per_tonne);

        // ── Recognition ────────────────────────────────────────

        let cadence_close = frequency.is_closing_month(calendar_month)?;
        let final_true_up = !cadence_close && calendar.is_final_month(month);
        let verification_due = cadence_close || final_true_up;

        let (recognized_tonnes, recognized_revenue, credit_issue_date) = if verification_due {
            let released = pending.release();
            let issue_date = calendar.credit_issue_date(month);
            let period = calendar.period_label(month);

            log::debug!(
                "{period} {frequency} verification: {:.1} t -> {:.2} ({} months{})",
                released.tonnes,
                released.value,
                released.months,
                if final_true_up { ", final true-up" } else { "" }
            );

            events.push(VerificationEvent {
                month_index:        month,
                period,
                frequency,
                recognized_tonnes:  released.tonnes,
                recognized_revenue: released.value,
                months_covered:     released.months,
                final_true_up,
                credit_issue_date:  issue_date,
            });
            (released.tonnes, released.value, issue_date)
        } else {
            (0.0, 0.0, None)
        };

        // ── Costs ──────────────────────────────────────────────

        let variable_costs = tonnes_produced * inputs.variable_cost_per_tonne;
        let fixed_costs = monthly_fixed_costs;
        let operating_income = production_value - variable_costs - fixed_costs;
        let operating_margin = if production_value > 0.0 {
            operating_income / production_value
        } else {
            0.0
        };

        // ── Financing ──────────────────────────────────────────

        let financing_cost = working_capital * monthly_financing_rate;
        cumulative_financing_cost += financing_cost;
        working_capital =
            (working_capital + variable_costs + fixed_costs - recognized_revenue).max(0.0);

        // ── Cash ───────────────────────────────────────────────

        let net_cash_flow = recognized_revenue - variable_costs - fixed_costs - financing_cost;
        cumulative_cash_flow += net_cash_flow;

        months.push(MonthlyProjection {
            month_index: month,
            period: calendar.period_label(month),
            tonnes_produced,
            cumulative_tonnes,
            price_per_tonne,
            production_value,
            verification_due,
            recognized_tonnes,
            recognized_revenue,
            credit_issue_date,
            variable_costs,
            fixed_costs,
            operating_income,
            operating_margin,
            working_capital_balance: working_capital,
            financing_cost,
            cumulative_financing_cost,
            net_cash_flow,
            cumulative_cash_flow,
        });
    }

    Ok(Projection { frequency, months, events })
}

impl Projection {
    pub fn total_revenue(&self) -> Money {
        self.months.iter().map(|m| m.recognized_revenue).sum()
    }

    pub fn total_financing_cost(&self) -> Money {
        self.months.iter().map(|m| m.financing_cost).sum()
    }

    /// Variable + fixed + financing across the horizon.
    pub fn total_costs(&self) -> Money {
        self.months
            .iter()
            .map(|m| m.variable_costs + m.fixed_costs + m.financing_cost)
            .sum()
    }

    pub fn avg_working_capital(&self) -> Money {
        if self.months.is_empty() {
            return 0.0;
        }
        let total: Money = self.months.iter().map(|m| m.working_capital_balance).sum();
        total / self.months.len() as f64
    }

    pub fn max_working_capital(&self) -> Money {
        self.months
            .iter()
            .map(|m| m.working_capital_balance)
            .fold(0.0, f64::max)
    }
}
