//! Periodic payroll generation across all teachers.
//!
//! Each teacher ends a run generated, skipped, or with an error message; one
//! teacher's failure never stops the rest. Re-running for the same period skips
//! teachers that already hold a payment for it.
//!
//! TODO: two runs racing on the same period can both pass the existence check and
//! double-pay; guard the run with a named lock (`GET_LOCK`) keyed on the window.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::model::payment::{NewPayment, PaymentType};
use crate::model::salary::PayPeriod;
use crate::model::teacher::Teacher;
use crate::payroll::PayrollService;
use crate::payroll::accrual::accrue;
use crate::payroll::error::{PayrollError, PayrollResult};
use crate::payroll::period::{period_window, weeks_in_range};
use crate::payroll::store::PayrollStore;

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "generated": 12,
    "skipped": 3,
    "errors": ["Budi Santoso: failed to create expense: pool timed out"]
}))]
pub struct PayrollRunSummary {
    pub generated: u32,
    pub skipped: u32,
    pub errors: Vec<String>,
}

enum Outcome {
    Generated,
    Skipped,
}

/// Window and run metadata shared by every teacher in one run.
struct Run {
    id: Uuid,
    period: PayPeriod,
    start: NaiveDate,
    end: NaiveDate,
}

impl Run {
    fn payment(&self, teacher_id: u64, amount: i64, payment_type: PaymentType) -> NewPayment {
        NewPayment {
            teacher_id,
            amount,
            payment_type,
            period_start: self.start,
            period_end: self.end,
            reference: Some(format!("payroll-run:{}", self.id)),
            notes: Some(format!(
                "Auto-generated {} payroll for {} to {}",
                self.period, self.start, self.end
            )),
        }
    }
}

impl<S: PayrollStore> PayrollService<S> {
    /// Generates payments for the current `period` window.
    pub async fn generate_payroll(&self, period: PayPeriod) -> PayrollResult<PayrollRunSummary> {
        self.generate_payroll_on(period, Local::now().date_naive())
            .await
    }

    /// Generates payments for the `period` window containing `today`.
    #[instrument(skip(self))]
    pub async fn generate_payroll_on(
        &self,
        period: PayPeriod,
        today: NaiveDate,
    ) -> PayrollResult<PayrollRunSummary> {
        let (start, end) = period_window(&period, today).ok_or_else(|| {
            PayrollError::validation(format!(
                "unsupported period '{period}', expected day, week or month"
            ))
        })?;

        let run = Run {
            id: Uuid::new_v4(),
            period,
            start,
            end,
        };
        info!(run_id = %run.id, %start, %end, "Payroll run started");

        let teachers = self.store().list_teachers().await?;
        let mut summary = PayrollRunSummary::default();

        for teacher in &teachers {
            match self.generate_for_teacher(&run, teacher).await {
                Ok(Outcome::Generated) => summary.generated += 1,
                Ok(Outcome::Skipped) => summary.skipped += 1,
                Err(e) => {
                    warn!(teacher_id = teacher.id, error = %e, "Payroll generation failed for teacher");
                    summary
                        .errors
                        .push(format!("{}: {}", teacher.display_name(), e));
                }
            }
        }

        info!(
            run_id = %run.id,
            generated = summary.generated,
            skipped = summary.skipped,
            errors = summary.errors.len(),
            "Payroll run finished"
        );
        Ok(summary)
    }

    async fn generate_for_teacher(&self, run: &Run, teacher: &Teacher) -> PayrollResult<Outcome> {
        // teachers paid on another cadence are not part of this run
        let Some(salary) = self.store().current_salary(teacher.id).await? else {
            return Ok(Outcome::Skipped);
        };
        if salary.base_period != run.period {
            return Ok(Outcome::Skipped);
        }

        if self
            .store()
            .payment_exists(teacher.id, run.start, run.end)
            .await?
        {
            return Ok(Outcome::Skipped);
        }

        let duty_days = self.count_duty_days(teacher.id, run.start, run.end).await?;
        let weeks = weeks_in_range(run.start, run.end);
        let accrued = accrue(Some(&salary), duty_days, weeks);

        let name = teacher.display_name();
        if accrued.base > 0 {
            let payment = run.payment(teacher.id, accrued.base, PaymentType::BaseSalary);
            self.record_payment(&payment, &name).await?;
        }
        if accrued.allowance > 0 {
            let payment = run.payment(teacher.id, accrued.allowance, PaymentType::Allowance);
            self.record_payment(&payment, &name).await?;
        }

        if accrued.total > 0 {
            Ok(Outcome::Generated)
        } else {
            Ok(Outcome::Skipped)
        }
    }
}
