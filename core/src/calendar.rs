//! Project calendar: maps a month index onto project years, calendar
//! months and real dates.

use crate::types::{MonthIndex, ProjectYear, MONTHS_PER_YEAR};
use chrono::{Datelike, Months, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectCalendar {
    pub start_date:   NaiveDate,
    pub total_months: usize,
}

impl ProjectCalendar {
    pub fn new(start_date: NaiveDate, total_months: usize) -> Self {
        Self { start_date, total_months }
    }

    pub fn year_of(&self, month: MonthIndex) -> ProjectYear {
        month / MONTHS_PER_YEAR
    }

    /// Month within the project year (0..12), relative to the start date.
    pub fn calendar_month_of(&self, month: MonthIndex) -> usize {
        month % MONTHS_PER_YEAR
    }

    pub fn is_final_month(&self, month: MonthIndex) -> bool {
        month + 1 == self.total_months
    }

    /// First day of the month `month` months after the start date's month.
    /// None only if the date leaves chrono's supported range.
    pub fn month_start(&self, month: MonthIndex) -> Option<NaiveDate> {
        let first = self.start_date.with_day(1)?;
        first.checked_add_months(Months::new(u32::try_from(month).ok()?))
    }

    /// Display label, e.g. "Jan 2024".
    pub fn period_label(&self, month: MonthIndex) -> String {
        match self.month_start(month) {
            Some(date) => date.format("%b %Y").to_string(),
            None => format!("M{}", month + 1),
        }
    }

    /// Credits from a closing month issue at the end of that month.
    pub fn credit_issue_date(&self, month: MonthIndex) -> Option<NaiveDate> {
        self.month_start(month + 1)?.pred_opt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calendar() -> ProjectCalendar {
        ProjectCalendar::new(NaiveDate::from_ymd_opt(2024, 11, 15).unwrap(), 24)
    }

    #[test]
    fn year_and_calendar_month() {
        let cal = calendar();
        assert_eq!(cal.year_of(0), 0);
        assert_eq!(cal.year_of(11), 0);
        assert_eq!(cal.year_of(12), 1);
        assert_eq!(cal.calendar_month_of(13), 1);
        assert!(cal.is_final_month(23));
        assert!(!cal.is_final_month(22));
    }

    #[test]
    fn period_labels_cross_year_boundary() {
        let cal = calendar();
        assert_eq!(cal.period_label(0), "Nov 2024");
        assert_eq!(cal.period_label(2), "Jan 2025");
        assert_eq!(cal.period_label(23), "Oct 2026");
    }

    #[test]
    fn credit_issue_date_is_month_end() {
        let cal = calendar();
        assert_eq!(cal.credit_issue_date(0), NaiveDate::from_ymd_opt(2024, 11, 30));
        assert_eq!(cal.credit_issue_date(3), NaiveDate::from_ymd_opt(2025, 2, 28));
    }
}
