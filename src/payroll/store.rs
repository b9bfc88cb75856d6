//! Storage seams the payroll core talks through.
//!
//! [`PayrollStore`] covers reads and the salary versioning write; every write that
//! must land together with an expense line goes through a [`PayrollTx`]. Dropping a
//! transaction without calling [`PayrollTx::commit`] discards its writes.

#![allow(async_fn_in_trait)]

use chrono::{NaiveDate, NaiveDateTime};

use crate::model::expense::{ExpenseEntry, NewExpense};
use crate::model::payment::{NewPayment, Payment, PaymentTotals};
use crate::model::salary::{NewSalaryConfig, SalaryConfig};
use crate::model::teacher::Teacher;

pub type StoreResult<T> = Result<T, sqlx::Error>;

pub trait PayrollStore {
    type Tx: PayrollTx;

    async fn begin(&self) -> StoreResult<Self::Tx>;

    /// Days marked present for the teacher in `[from, to]`.
    async fn count_present_days(
        &self,
        teacher_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<i64>;

    async fn current_salary(&self, teacher_id: u64) -> StoreResult<Option<SalaryConfig>>;

    /// All versions, newest first.
    async fn salary_history(&self, teacher_id: u64) -> StoreResult<Vec<SalaryConfig>>;

    /// Inserts a new version and supersedes the previous current one.
    async fn upsert_salary(&self, config: &NewSalaryConfig) -> StoreResult<SalaryConfig>;

    /// Sums payments whose `paid_at` date falls in `[from, to]`.
    async fn sum_payments_by_type(
        &self,
        teacher_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<PaymentTotals>;

    /// Whether a payment covers exactly this period.
    async fn payment_exists(
        &self,
        teacher_id: u64,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> StoreResult<bool>;

    /// Payments whose `paid_at` date falls in `[from, to]`, newest first.
    async fn list_payments(
        &self,
        teacher_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<Payment>>;

    async fn list_teachers(&self) -> StoreResult<Vec<Teacher>>;

    async fn find_teacher(&self, teacher_id: u64) -> StoreResult<Option<Teacher>>;
}

pub trait PayrollTx {
    async fn insert_payment(
        &mut self,
        payment: &NewPayment,
        paid_at: NaiveDateTime,
    ) -> StoreResult<Payment>;

    /// Id of the active category with this name, creating it if needed.
    async fn find_or_create_category(&mut self, name: &str) -> StoreResult<u64>;

    async fn insert_expense(&mut self, entry: &NewExpense) -> StoreResult<ExpenseEntry>;

    async fn commit(self) -> StoreResult<()>;
}
