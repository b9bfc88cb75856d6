use chrono::{Days, Local, NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::{MySql, MySqlPool, Transaction};

use crate::model::attendance::AttendanceStatus;
use crate::model::expense::{ExpenseEntry, NewExpense};
use crate::model::payment::{NewPayment, Payment, PaymentRow, PaymentTotals};
use crate::model::salary::{NewSalaryConfig, SalaryConfig, SalaryConfigRow};
use crate::model::teacher::Teacher;
use crate::payroll::store::{PayrollStore, PayrollTx, StoreResult};

const SALARY_COLUMNS: &str = r#"
    id, teacher_id, base_amount, base_period, has_allowance, allowance_amount,
    allowance_period, allowance_trigger, effective_date, created_at, superseded_at
"#;

const PAYMENT_COLUMNS: &str = r#"
    id, teacher_id, amount, payment_type, period_start, period_end, paid_at, reference, notes
"#;

const CATEGORY_UPSERT: &str = r#"
    INSERT INTO expense_categories (name, is_active)
    VALUES (?, TRUE)
    ON DUPLICATE KEY UPDATE id = LAST_INSERT_ID(id)
"#;

#[derive(Clone)]
pub struct MySqlPayrollStore {
    pool: MySqlPool,
}

impl MySqlPayrollStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// Half-open `[from 00:00, to+1 00:00)` bounds for filtering a DATETIME column by date.
fn day_bounds(from: NaiveDate, to: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let upper = to.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX);
    (
        from.and_time(NaiveTime::MIN),
        upper.and_time(NaiveTime::MIN),
    )
}

fn decode_payment(row: PaymentRow) -> StoreResult<Payment> {
    Payment::try_from(row).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

impl PayrollStore for MySqlPayrollStore {
    type Tx = MySqlPayrollTx;

    async fn begin(&self) -> StoreResult<Self::Tx> {
        Ok(MySqlPayrollTx {
            tx: self.pool.begin().await?,
        })
    }

    async fn count_present_days(
        &self,
        teacher_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM teacher_attendance
            WHERE teacher_id = ?
            AND status = ?
            AND date BETWEEN ? AND ?
            "#,
        )
        .bind(teacher_id)
        .bind(AttendanceStatus::Present.as_ref())
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await
    }

    async fn current_salary(&self, teacher_id: u64) -> StoreResult<Option<SalaryConfig>> {
        let sql = format!(
            "SELECT {SALARY_COLUMNS} FROM salary_configs \
             WHERE teacher_id = ? AND superseded_at IS NULL AND deleted_at IS NULL"
        );

        let row = sqlx::query_as::<_, SalaryConfigRow>(&sql)
            .bind(teacher_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(SalaryConfig::from))
    }

    async fn salary_history(&self, teacher_id: u64) -> StoreResult<Vec<SalaryConfig>> {
        let sql = format!(
            "SELECT {SALARY_COLUMNS} FROM salary_configs \
             WHERE teacher_id = ? AND deleted_at IS NULL \
             ORDER BY created_at DESC, id DESC"
        );

        let rows = sqlx::query_as::<_, SalaryConfigRow>(&sql)
            .bind(teacher_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(SalaryConfig::from).collect())
    }

    async fn upsert_salary(&self, config: &NewSalaryConfig) -> StoreResult<SalaryConfig> {
        let now = Local::now().naive_local();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE salary_configs
            SET superseded_at = ?
            WHERE teacher_id = ?
            AND superseded_at IS NULL
            AND deleted_at IS NULL
            "#,
        )
        .bind(now)
        .bind(config.teacher_id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            r#"
            INSERT INTO salary_configs
            (teacher_id, base_amount, base_period, has_allowance, allowance_amount,
             allowance_period, allowance_trigger, effective_date, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(config.teacher_id)
        .bind(config.base_amount)
        .bind(config.base_period.as_str())
        .bind(config.has_allowance)
        .bind(config.allowance_amount)
        .bind(config.allowance_period.as_str())
        .bind(&config.allowance_trigger)
        .bind(config.effective_date)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let sql = format!("SELECT {SALARY_COLUMNS} FROM salary_configs WHERE id = ?");
        let row = sqlx::query_as::<_, SalaryConfigRow>(&sql)
            .bind(result.last_insert_id())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn sum_payments_by_type(
        &self,
        teacher_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<PaymentTotals> {
        let (lower, upper) = day_bounds(from, to);

        // SUM over BIGINT yields DECIMAL in MySQL; cast back so it decodes as i64
        sqlx::query_as::<_, PaymentTotals>(
            r#"
            SELECT
                CAST(COALESCE(SUM(CASE WHEN payment_type = 'base_salary' THEN amount ELSE 0 END), 0) AS SIGNED) AS base,
                CAST(COALESCE(SUM(CASE WHEN payment_type = 'allowance' THEN amount ELSE 0 END), 0) AS SIGNED) AS allowance,
                CAST(COALESCE(SUM(amount), 0) AS SIGNED) AS total
            FROM teacher_payments
            WHERE teacher_id = ?
            AND paid_at >= ?
            AND paid_at < ?
            "#,
        )
        .bind(teacher_id)
        .bind(lower)
        .bind(upper)
        .fetch_one(&self.pool)
        .await
    }

    async fn payment_exists(
        &self,
        teacher_id: u64,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> StoreResult<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM teacher_payments
            WHERE teacher_id = ?
            AND period_start = ?
            AND period_end = ?
            "#,
        )
        .bind(teacher_id)
        .bind(period_start)
        .bind(period_end)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    async fn list_payments(
        &self,
        teacher_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<Payment>> {
        let (lower, upper) = day_bounds(from, to);
        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} FROM teacher_payments \
             WHERE teacher_id = ? AND paid_at >= ? AND paid_at < ? \
             ORDER BY paid_at DESC, id DESC"
        );

        let rows = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(teacher_id)
            .bind(lower)
            .bind(upper)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(decode_payment).collect()
    }

    async fn list_teachers(&self) -> StoreResult<Vec<Teacher>> {
        sqlx::query_as::<_, Teacher>(
            r#"
            SELECT id, first_name, last_name
            FROM teachers
            WHERE deleted_at IS NULL
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn find_teacher(&self, teacher_id: u64) -> StoreResult<Option<Teacher>> {
        sqlx::query_as::<_, Teacher>(
            r#"
            SELECT id, first_name, last_name
            FROM teachers
            WHERE id = ?
            AND deleted_at IS NULL
            "#,
        )
        .bind(teacher_id)
        .fetch_optional(&self.pool)
        .await
    }
}

/// Open MySQL transaction; rolled back on drop unless committed.
pub struct MySqlPayrollTx {
    tx: Transaction<'static, MySql>,
}

impl PayrollTx for MySqlPayrollTx {
    async fn insert_payment(
        &mut self,
        payment: &NewPayment,
        paid_at: NaiveDateTime,
    ) -> StoreResult<Payment> {
        let result = sqlx::query(
            r#"
            INSERT INTO teacher_payments
            (teacher_id, amount, payment_type, period_start, period_end, paid_at, reference, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(payment.teacher_id)
        .bind(payment.amount)
        .bind(payment.payment_type.as_ref())
        .bind(payment.period_start)
        .bind(payment.period_end)
        .bind(paid_at)
        .bind(&payment.reference)
        .bind(&payment.notes)
        .execute(&mut *self.tx)
        .await?;

        Ok(Payment {
            id: result.last_insert_id(),
            teacher_id: payment.teacher_id,
            amount: payment.amount,
            payment_type: payment.payment_type,
            period_start: payment.period_start,
            period_end: payment.period_end,
            paid_at,
            reference: payment.reference.clone(),
            notes: payment.notes.clone(),
        })
    }

    async fn find_or_create_category(&mut self, name: &str) -> StoreResult<u64> {
        // unique on `active_name`; on a duplicate, LAST_INSERT_ID(id) hands back the live row
        let result = sqlx::query(CATEGORY_UPSERT)
            .bind(name)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.last_insert_id())
    }

    async fn insert_expense(&mut self, entry: &NewExpense) -> StoreResult<ExpenseEntry> {
        let result = sqlx::query(
            r#"
            INSERT INTO expenses
            (category_id, title, amount, currency, expense_date, period_start, period_end, due_date, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.category_id)
        .bind(&entry.title)
        .bind(entry.amount)
        .bind(&entry.currency)
        .bind(entry.date)
        .bind(entry.period_start)
        .bind(entry.period_end)
        .bind(entry.due_date)
        .bind(&entry.notes)
        .execute(&mut *self.tx)
        .await?;

        Ok(ExpenseEntry::from_new(result.last_insert_id(), entry))
    }

    async fn commit(self) -> StoreResult<()> {
        self.tx.commit().await
    }
}
