//! Week counting and canonical pay-period windows.
//!
//! Two week counts exist on purpose: [`weeks_in_range`] feeds accruals and
//! reconciliation, [`preview_weeks_in_range`] feeds payout previews and never reports
//! less than a full week for a non-empty range. Report callers depend on both.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::model::salary::PayPeriod;

/// Fractional weeks between two dates, as used for accrual.
///
/// Inverted or zero-length ranges yield `0.0`.
pub fn weeks_in_range(start: NaiveDate, end: NaiveDate) -> f64 {
    let days = (end - start).num_days();
    (days as f64 / 7.0).max(0.0)
}

/// Fractional weeks for a payout preview: a non-empty range counts as at least one week.
pub fn preview_weeks_in_range(start: NaiveDate, end: NaiveDate) -> f64 {
    if end <= start {
        return 0.0;
    }
    weeks_in_range(start, end).max(1.0)
}

/// Inclusive `(start, end)` dates of the pay period of the given cadence containing `today`.
///
/// Returns `None` for cadences without a canonical window.
pub fn period_window(period: &PayPeriod, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    match period {
        PayPeriod::Day => Some((today, today)),
        PayPeriod::Week => {
            let monday = today - Days::new(today.weekday().num_days_from_monday() as u64);
            Some((monday, monday + Days::new(6)))
        }
        PayPeriod::Month => {
            let first = today.with_day(1)?;
            let last = first.checked_add_months(Months::new(1))? - Days::new(1);
            Some((first, last))
        }
        PayPeriod::Other(_) => None,
    }
}
