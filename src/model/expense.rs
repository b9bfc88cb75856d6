use chrono::{NaiveDate, NaiveDateTime};

use crate::model::payment::Payment;

/// Ledger category every payroll disbursement is filed under.
pub const SALARY_CATEGORY: &str = "Salaries";

/// An expense line about to be written to the school's expense ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub category_id: u64,
    pub title: String,
    pub amount: i64,
    pub currency: String,
    pub date: NaiveDateTime,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: String,
}

impl NewExpense {
    /// Mirrors a freshly inserted payment as an expense line.
    pub fn for_payment(
        payment: &Payment,
        category_id: u64,
        teacher_name: &str,
        currency: &str,
    ) -> Self {
        Self {
            category_id,
            title: payment.payment_type.expense_title(teacher_name),
            amount: payment.amount,
            currency: currency.to_string(),
            date: payment.paid_at,
            period_start: payment.period_start,
            period_end: payment.period_end,
            due_date: payment.period_end,
            notes: format!(
                "Payroll disbursement for period {} to {}",
                payment.period_start, payment.period_end
            ),
        }
    }
}

/// A stored expense line.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseEntry {
    pub id: u64,
    pub category_id: u64,
    pub title: String,
    pub amount: i64,
    pub currency: String,
    pub date: NaiveDateTime,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: String,
}

impl ExpenseEntry {
    pub fn from_new(id: u64, entry: &NewExpense) -> Self {
        Self {
            id,
            category_id: entry.category_id,
            title: entry.title.clone(),
            amount: entry.amount,
            currency: entry.currency.clone(),
            date: entry.date,
            period_start: entry.period_start,
            period_end: entry.period_end,
            due_date: entry.due_date,
            notes: entry.notes.clone(),
        }
    }
}
