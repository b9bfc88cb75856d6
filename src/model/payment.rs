use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentType {
    BaseSalary,
    Allowance,
    Combined,
}

impl PaymentType {
    /// Title of the expense line mirrored for a payout of this type.
    pub fn expense_title(&self, teacher_name: &str) -> String {
        match self {
            PaymentType::BaseSalary => format!("Salary Payout: {teacher_name}"),
            PaymentType::Allowance => format!("Allowance Payout: {teacher_name}"),
            PaymentType::Combined => format!("Full Salary Payout: {teacher_name}"),
        }
    }
}

/// A recorded disbursement. Never updated after insert.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Payment {
    #[schema(example = 41)]
    pub id: u64,

    #[schema(example = 7)]
    pub teacher_id: u64,

    #[schema(example = 2000000)]
    pub amount: i64,

    #[serde(rename = "type")]
    pub payment_type: PaymentType,

    #[schema(value_type = String, format = "date")]
    pub period_start: NaiveDate,

    #[schema(value_type = String, format = "date")]
    pub period_end: NaiveDate,

    #[schema(value_type = String, format = "date-time")]
    pub paid_at: NaiveDateTime,

    pub reference: Option<String>,
    pub notes: Option<String>,
}

#[derive(sqlx::FromRow)]
pub struct PaymentRow {
    pub id: u64,
    pub teacher_id: u64,
    pub amount: i64,
    pub payment_type: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub paid_at: NaiveDateTime,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = strum::ParseError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            teacher_id: row.teacher_id,
            amount: row.amount,
            payment_type: row.payment_type.parse()?,
            period_start: row.period_start,
            period_end: row.period_end,
            paid_at: row.paid_at,
            reference: row.reference,
            notes: row.notes,
        })
    }
}

/// Manual payment request body, also built by the batch generator.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewPayment {
    #[schema(example = 7)]
    pub teacher_id: u64,

    #[schema(example = 1000000)]
    pub amount: i64,

    #[serde(rename = "type")]
    pub payment_type: PaymentType,

    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub period_start: NaiveDate,

    #[schema(example = "2026-01-31", value_type = String, format = "date")]
    pub period_end: NaiveDate,

    #[schema(example = "TRX-2026-0001")]
    pub reference: Option<String>,

    #[schema(example = "January salary, first instalment")]
    pub notes: Option<String>,
}

/// Paid amounts over a range, split by payment type.
///
/// `combined` payments only count toward `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct PaymentTotals {
    pub base: i64,
    pub allowance: i64,
    pub total: i64,
}
