//! Teacher payroll: accrual from attendance, reconciliation against payments, and
//! atomic disbursement with a mirrored expense line.

pub mod accrual;
pub mod batch;
pub mod error;
#[cfg(test)]
pub mod memory;
pub mod mysql;
pub mod period;
pub mod reconcile;
pub mod salary;
pub mod store;
pub mod transaction;

use chrono::NaiveDate;

use crate::model::payment::Payment;
use crate::model::teacher::Teacher;
use crate::payroll::error::{PayrollError, PayrollResult};
use crate::payroll::store::PayrollStore;

/// Entry point for every payroll operation, generic over where the data lives.
pub struct PayrollService<S> {
    store: S,
    currency: String,
}

impl<S: PayrollStore> PayrollService<S> {
    pub fn new(store: S, currency: impl Into<String>) -> Self {
        Self {
            store,
            currency: currency.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Currency code stamped on every expense line.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Days the teacher was present in `[start, end]`; zero when nothing is recorded.
    pub async fn count_duty_days(
        &self,
        teacher_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PayrollResult<i64> {
        Ok(self
            .store
            .count_present_days(teacher_id, start, end)
            .await?)
    }

    pub async fn teacher(&self, teacher_id: u64) -> PayrollResult<Teacher> {
        self.store
            .find_teacher(teacher_id)
            .await?
            .ok_or(PayrollError::TeacherNotFound { teacher_id })
    }

    /// Payments whose pay date falls in `[from, to]`, newest first.
    pub async fn list_payments(
        &self,
        teacher_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> PayrollResult<Vec<Payment>> {
        Ok(self.store.list_payments(teacher_id, from, to).await?)
    }
}
