use tracing::{info, instrument};

use crate::model::salary::{NewSalaryConfig, SalaryConfig};
use crate::payroll::PayrollService;
use crate::payroll::error::{PayrollError, PayrollResult};
use crate::payroll::store::PayrollStore;

/// Largest amount accepted in a salary configuration: 2^53, the `f64` exact-integer limit.
pub const MAX_SALARY_AMOUNT: i64 = 1 << 53;

fn validate_salary(config: &NewSalaryConfig) -> PayrollResult<()> {
    if config.base_amount <= 0 {
        return Err(PayrollError::validation("base_amount must be greater than zero"));
    }
    if config.allowance_amount < 0 {
        return Err(PayrollError::validation("allowance_amount must not be negative"));
    }
    if config.base_amount > MAX_SALARY_AMOUNT || config.allowance_amount > MAX_SALARY_AMOUNT {
        return Err(PayrollError::validation(format!(
            "amounts must not exceed {MAX_SALARY_AMOUNT}"
        )));
    }
    if !config.base_period.is_known() {
        return Err(PayrollError::validation(format!(
            "unsupported base_period '{}', expected day, week or month",
            config.base_period
        )));
    }
    if !config.allowance_period.is_known() {
        return Err(PayrollError::validation(format!(
            "unsupported allowance_period '{}', expected day, week or month",
            config.allowance_period
        )));
    }
    Ok(())
}

impl<S: PayrollStore> PayrollService<S> {
    /// Stores a new salary version for the teacher, superseding the current one.
    #[instrument(skip(self, config), fields(teacher_id = config.teacher_id))]
    pub async fn set_salary(&self, config: &NewSalaryConfig) -> PayrollResult<SalaryConfig> {
        validate_salary(config)?;
        self.teacher(config.teacher_id).await?;

        let saved = self.store().upsert_salary(config).await?;
        info!(salary_id = saved.id, "Salary configuration updated");
        Ok(saved)
    }

    pub async fn current_salary(&self, teacher_id: u64) -> PayrollResult<SalaryConfig> {
        self.store()
            .current_salary(teacher_id)
            .await?
            .ok_or(PayrollError::SalaryNotConfigured { teacher_id })
    }

    pub async fn salary_history(&self, teacher_id: u64) -> PayrollResult<Vec<SalaryConfig>> {
        Ok(self.store().salary_history(teacher_id).await?)
    }
}
