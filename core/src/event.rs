//! Credit issuance events: one per closing month.
//!
//! RULE: Events are derived from the projection, never the other way round.
//! They exist so callers can render an issuance timeline without re-scanning
//! every month for `verification_due`.

use crate::{
    cadence::VerificationFrequency,
    types::{MonthIndex, Money, Tonnes},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationEvent {
    pub month_index:        MonthIndex,
    pub period:             String,
    pub frequency:          VerificationFrequency,
    pub recognized_tonnes:  Tonnes,
    pub recognized_revenue: Money,
    /// Months of production covered by this verification.
    pub months_covered:     usize,
    /// True when the close was forced by the end of the project rather
    /// than by the cadence.
    pub final_true_up:      bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_issue_date:  Option<NaiveDate>,
}
