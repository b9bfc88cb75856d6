use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::payroll::PayrollService;
use crate::payroll::accrual::{Breakdown, accrue};
use crate::payroll::error::PayrollResult;
use crate::payroll::period::{preview_weeks_in_range, weeks_in_range};
use crate::payroll::store::PayrollStore;

/// Accrued against paid for one teacher over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Reconciliation {
    pub accrued: Breakdown,
    pub paid: Breakdown,
    /// `accrued - paid`; negative when the teacher was overpaid.
    pub unpaid: Breakdown,
}

/// What a payout over a range would be, before anything is paid.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PayoutPreview {
    pub teacher_id: u64,
    #[schema(value_type = String, format = "date")]
    pub period_start: NaiveDate,
    #[schema(value_type = String, format = "date")]
    pub period_end: NaiveDate,
    pub duty_days: i64,
    pub weeks: f64,
    pub proposed: Breakdown,
}

impl<S: PayrollStore> PayrollService<S> {
    #[instrument(skip(self))]
    pub async fn reconcile(
        &self,
        teacher_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PayrollResult<Reconciliation> {
        let salary = self.current_salary(teacher_id).await?;
        let duty_days = self.count_duty_days(teacher_id, start, end).await?;
        let weeks = weeks_in_range(start, end);
        let accrued = accrue(Some(&salary), duty_days, weeks);

        let totals = self
            .store()
            .sum_payments_by_type(teacher_id, start, end)
            .await?;
        let paid = Breakdown {
            base: totals.base,
            allowance: totals.allowance,
            total: totals.total,
        };

        debug!(duty_days, weeks, ?accrued, ?paid, "Reconciled payroll");

        Ok(Reconciliation {
            accrued,
            unpaid: accrued.minus(&paid),
            paid,
        })
    }

    #[instrument(skip(self))]
    pub async fn preview_payout(
        &self,
        teacher_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PayrollResult<PayoutPreview> {
        let salary = self.current_salary(teacher_id).await?;
        let duty_days = self.count_duty_days(teacher_id, start, end).await?;
        let weeks = preview_weeks_in_range(start, end);

        Ok(PayoutPreview {
            teacher_id,
            period_start: start,
            period_end: end,
            duty_days,
            weeks,
            proposed: accrue(Some(&salary), duty_days, weeks),
        })
    }
}
