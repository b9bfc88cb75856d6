//! Disbursement recording.
//!
//! A payment and its expense line are written in one storage transaction, payment
//! first. Any failing step returns before `commit`, and dropping the transaction
//! discards both writes.

use chrono::Local;
use tracing::{error, info, instrument};

use crate::model::expense::{NewExpense, SALARY_CATEGORY};
use crate::model::payment::{NewPayment, Payment};
use crate::payroll::PayrollService;
use crate::payroll::error::{PayrollError, PayrollResult, TransactionStep};
use crate::payroll::store::{PayrollStore, PayrollTx};

pub fn validate_payment(payment: &NewPayment) -> PayrollResult<()> {
    if payment.amount <= 0 {
        return Err(PayrollError::validation("amount must be greater than zero"));
    }
    if payment.period_start > payment.period_end {
        return Err(PayrollError::validation(
            "period_start must not be after period_end",
        ));
    }
    Ok(())
}

impl<S: PayrollStore> PayrollService<S> {
    /// Records a disbursement and its mirrored expense line atomically.
    #[instrument(
        skip(self, payment),
        fields(
            teacher_id = payment.teacher_id,
            amount = payment.amount,
            payment_type = payment.payment_type.as_ref()
        )
    )]
    pub async fn record_payment(
        &self,
        payment: &NewPayment,
        teacher_name: &str,
    ) -> PayrollResult<Payment> {
        validate_payment(payment)?;

        let rollback = |step: TransactionStep| {
            move |e: sqlx::Error| {
                error!(error = %e, %step, "Payment transaction rolled back");
                PayrollError::Transaction { step, source: e }
            }
        };

        let mut tx = self
            .store()
            .begin()
            .await
            .map_err(rollback(TransactionStep::Begin))?;

        let paid_at = Local::now().naive_local();
        let saved = tx
            .insert_payment(payment, paid_at)
            .await
            .map_err(rollback(TransactionStep::InsertPayment))?;

        let category_id = tx
            .find_or_create_category(SALARY_CATEGORY)
            .await
            .map_err(rollback(TransactionStep::CreateCategory))?;

        let expense = NewExpense::for_payment(&saved, category_id, teacher_name, self.currency());
        tx.insert_expense(&expense)
            .await
            .map_err(rollback(TransactionStep::CreateExpense))?;

        tx.commit().await.map_err(rollback(TransactionStep::Commit))?;

        info!(payment_id = saved.id, "Payment recorded");
        Ok(saved)
    }

    /// Manual payout: resolves the teacher's display name, then records the payment.
    pub async fn pay_teacher(&self, payment: &NewPayment) -> PayrollResult<Payment> {
        validate_payment(payment)?;
        let teacher = self.teacher(payment.teacher_id).await?;
        self.record_payment(payment, &teacher.display_name()).await
    }
}
