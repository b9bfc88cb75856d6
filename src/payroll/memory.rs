//! In-memory [`PayrollStore`] for tests.
//!
//! Transactions stage their writes and apply them on commit; dropping one discards
//! everything it staged. Individual operations can be made to fail.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::model::attendance::AttendanceStatus;
use crate::model::expense::{ExpenseEntry, NewExpense};
use crate::model::payment::{NewPayment, Payment, PaymentTotals, PaymentType};
use crate::model::salary::{NewSalaryConfig, SalaryConfig};
use crate::model::teacher::Teacher;
use crate::payroll::store::{PayrollStore, PayrollTx, StoreResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub is_active: bool,
    pub deleted: bool,
}

/// One row of `teacher_attendance`.
struct AttendanceRecord {
    teacher_id: u64,
    date: NaiveDate,
    status: AttendanceStatus,
}

/// Operations that can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    CountPresentDays,
    InsertPayment,
    CreateCategory,
    /// The category lookup hands back an id that does not exist.
    DanglingCategory,
    InsertExpense,
    Commit,
}

#[derive(Default)]
struct State {
    next_id: u64,
    teachers: Vec<Teacher>,
    attendance: Vec<AttendanceRecord>,
    salaries: Vec<SalaryConfig>,
    payments: Vec<Payment>,
    categories: Vec<Category>,
    expenses: Vec<ExpenseEntry>,
    faults: HashMap<Fault, Option<u64>>,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Fails if the fault is armed for everyone or for this teacher.
    fn check(&self, fault: Fault, teacher_id: Option<u64>) -> StoreResult<()> {
        match self.faults.get(&fault) {
            Some(None) => Err(injected(fault)),
            Some(Some(target)) if Some(*target) == teacher_id => Err(injected(fault)),
            _ => Ok(()),
        }
    }
}

fn injected(fault: Fault) -> sqlx::Error {
    sqlx::Error::Protocol(format!("injected fault: {fault:?}"))
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_teacher(&self, first_name: &str, last_name: &str) -> u64 {
        let mut state = self.lock();
        let id = state.next_id();
        state.teachers.push(Teacher {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        });
        id
    }

    pub fn mark(&self, teacher_id: u64, date: NaiveDate, status: AttendanceStatus) {
        self.lock().attendance.push(AttendanceRecord {
            teacher_id,
            date,
            status,
        });
    }

    /// Marks every day in `[from, to]` present.
    pub fn mark_present_between(&self, teacher_id: u64, from: NaiveDate, to: NaiveDate) {
        for date in from.iter_days().take_while(|d| *d <= to) {
            self.mark(teacher_id, date, AttendanceStatus::Present);
        }
    }

    /// Writes a payment directly, bypassing the transaction manager.
    pub fn seed_payment(
        &self,
        teacher_id: u64,
        amount: i64,
        payment_type: PaymentType,
        period: (NaiveDate, NaiveDate),
        paid_at: NaiveDateTime,
    ) -> Payment {
        let mut state = self.lock();
        let payment = Payment {
            id: state.next_id(),
            teacher_id,
            amount,
            payment_type,
            period_start: period.0,
            period_end: period.1,
            paid_at,
            reference: None,
            notes: None,
        };
        state.payments.push(payment.clone());
        payment
    }

    pub fn fail(&self, fault: Fault) {
        self.lock().faults.insert(fault, None);
    }

    pub fn fail_for_teacher(&self, fault: Fault, teacher_id: u64) {
        self.lock().faults.insert(fault, Some(teacher_id));
    }

    pub fn clear_faults(&self) {
        self.lock().faults.clear();
    }

    pub fn payments(&self) -> Vec<Payment> {
        self.lock().payments.clone()
    }

    pub fn expenses(&self) -> Vec<ExpenseEntry> {
        self.lock().expenses.clone()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.lock().categories.clone()
    }

    pub fn all_salaries(&self) -> Vec<SalaryConfig> {
        self.lock().salaries.clone()
    }
}

impl PayrollStore for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> StoreResult<Self::Tx> {
        Ok(MemoryTx {
            store: self.clone(),
            payments: Vec::new(),
            categories: Vec::new(),
            expenses: Vec::new(),
            teacher_id: None,
        })
    }

    async fn count_present_days(
        &self,
        teacher_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<i64> {
        let state = self.lock();
        state.check(Fault::CountPresentDays, Some(teacher_id))?;
        let days = state
            .attendance
            .iter()
            .filter(|a| {
                a.teacher_id == teacher_id
                    && a.status == AttendanceStatus::Present
                    && a.date >= from
                    && a.date <= to
            })
            .count();
        Ok(days as i64)
    }

    async fn current_salary(&self, teacher_id: u64) -> StoreResult<Option<SalaryConfig>> {
        Ok(self
            .lock()
            .salaries
            .iter()
            .find(|s| s.teacher_id == teacher_id && s.superseded_at.is_none())
            .cloned())
    }

    async fn salary_history(&self, teacher_id: u64) -> StoreResult<Vec<SalaryConfig>> {
        let mut history: Vec<SalaryConfig> = self
            .lock()
            .salaries
            .iter()
            .filter(|s| s.teacher_id == teacher_id)
            .cloned()
            .collect();
        history.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(history)
    }

    async fn upsert_salary(&self, config: &NewSalaryConfig) -> StoreResult<SalaryConfig> {
        let now = Local::now().naive_local();
        let mut state = self.lock();

        for previous in state
            .salaries
            .iter_mut()
            .filter(|s| s.teacher_id == config.teacher_id && s.superseded_at.is_none())
        {
            previous.superseded_at = Some(now);
        }

        let saved = SalaryConfig {
            id: state.next_id(),
            teacher_id: config.teacher_id,
            base_amount: config.base_amount,
            base_period: config.base_period.clone(),
            has_allowance: config.has_allowance,
            allowance_amount: config.allowance_amount,
            allowance_period: config.allowance_period.clone(),
            allowance_trigger: config.allowance_trigger.clone(),
            effective_date: config.effective_date,
            created_at: now,
            superseded_at: None,
        };
        state.salaries.push(saved.clone());
        Ok(saved)
    }

    async fn sum_payments_by_type(
        &self,
        teacher_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<PaymentTotals> {
        let state = self.lock();
        let mut totals = PaymentTotals::default();
        for payment in state.payments.iter().filter(|p| {
            let paid_on = p.paid_at.date();
            p.teacher_id == teacher_id && paid_on >= from && paid_on <= to
        }) {
            match payment.payment_type {
                PaymentType::BaseSalary => totals.base += payment.amount,
                PaymentType::Allowance => totals.allowance += payment.amount,
                PaymentType::Combined => {}
            }
            totals.total += payment.amount;
        }
        Ok(totals)
    }

    async fn payment_exists(
        &self,
        teacher_id: u64,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> StoreResult<bool> {
        Ok(self.lock().payments.iter().any(|p| {
            p.teacher_id == teacher_id
                && p.period_start == period_start
                && p.period_end == period_end
        }))
    }

    async fn list_payments(
        &self,
        teacher_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<Payment>> {
        let mut payments: Vec<Payment> = self
            .lock()
            .payments
            .iter()
            .filter(|p| {
                let paid_on = p.paid_at.date();
                p.teacher_id == teacher_id && paid_on >= from && paid_on <= to
            })
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.paid_at.cmp(&a.paid_at).then(b.id.cmp(&a.id)));
        Ok(payments)
    }

    async fn list_teachers(&self) -> StoreResult<Vec<Teacher>> {
        Ok(self.lock().teachers.clone())
    }

    async fn find_teacher(&self, teacher_id: u64) -> StoreResult<Option<Teacher>> {
        Ok(self
            .lock()
            .teachers
            .iter()
            .find(|t| t.id == teacher_id)
            .cloned())
    }
}

pub struct MemoryTx {
    store: MemoryStore,
    payments: Vec<Payment>,
    categories: Vec<Category>,
    expenses: Vec<ExpenseEntry>,
    teacher_id: Option<u64>,
}

impl PayrollTx for MemoryTx {
    async fn insert_payment(
        &mut self,
        payment: &NewPayment,
        paid_at: NaiveDateTime,
    ) -> StoreResult<Payment> {
        let mut state = self.store.lock();
        self.teacher_id = Some(payment.teacher_id);
        state.check(Fault::InsertPayment, self.teacher_id)?;

        let saved = Payment {
            id: state.next_id(),
            teacher_id: payment.teacher_id,
            amount: payment.amount,
            payment_type: payment.payment_type,
            period_start: payment.period_start,
            period_end: payment.period_end,
            paid_at,
            reference: payment.reference.clone(),
            notes: payment.notes.clone(),
        };
        self.payments.push(saved.clone());
        Ok(saved)
    }

    async fn find_or_create_category(&mut self, name: &str) -> StoreResult<u64> {
        let mut state = self.store.lock();
        state.check(Fault::CreateCategory, self.teacher_id)?;
        if state.check(Fault::DanglingCategory, self.teacher_id).is_err() {
            return Ok(u64::MAX);
        }

        let existing = state
            .categories
            .iter()
            .chain(self.categories.iter())
            .find(|c| c.name == name && !c.deleted)
            .map(|c| c.id);
        if let Some(id) = existing {
            return Ok(id);
        }

        let id = state.next_id();
        self.categories.push(Category {
            id,
            name: name.to_string(),
            is_active: true,
            deleted: false,
        });
        Ok(id)
    }

    async fn insert_expense(&mut self, entry: &NewExpense) -> StoreResult<ExpenseEntry> {
        let mut state = self.store.lock();
        state.check(Fault::InsertExpense, self.teacher_id)?;

        let known_category = state
            .categories
            .iter()
            .chain(self.categories.iter())
            .any(|c| c.id == entry.category_id);
        if !known_category {
            return Err(sqlx::Error::Protocol(format!(
                "foreign key violation: category {} does not exist",
                entry.category_id
            )));
        }

        let saved = ExpenseEntry::from_new(state.next_id(), entry);
        self.expenses.push(saved.clone());
        Ok(saved)
    }

    async fn commit(self) -> StoreResult<()> {
        let mut state = self.store.lock();
        state.check(Fault::Commit, self.teacher_id)?;

        let mut expenses = self.expenses;
        for category in self.categories {
            // another transaction may have committed the same name first
            let existing = state
                .categories
                .iter()
                .find(|c| c.name == category.name && !c.deleted)
                .map(|c| c.id);
            match existing {
                Some(id) => expenses
                    .iter_mut()
                    .filter(|e| e.category_id == category.id)
                    .for_each(|e| e.category_id = id),
                None => state.categories.push(category),
            }
        }
        state.payments.extend(self.payments);
        state.expenses.extend(expenses);
        Ok(())
    }
}
