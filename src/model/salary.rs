use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::EnumString;
use utoipa::ToSchema;

/// Cadence a salary component is expressed in.
///
/// Values stored outside `day`/`week`/`month` are kept verbatim in `Other`; they accrue
/// as a flat amount and never match a batch period.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PayPeriod {
    Day,
    Week,
    Month,
    #[strum(default)]
    Other(String),
}

impl PayPeriod {
    pub fn as_str(&self) -> &str {
        match self {
            PayPeriod::Day => "day",
            PayPeriod::Week => "week",
            PayPeriod::Month => "month",
            PayPeriod::Other(raw) => raw,
        }
    }

    /// Parses a stored or submitted period; unrecognised values land in `Other`.
    pub fn from_raw(raw: &str) -> Self {
        raw.parse()
            .unwrap_or_else(|_| PayPeriod::Other(raw.to_string()))
    }

    /// True for the three cadences a batch run or a new salary may use.
    pub fn is_known(&self) -> bool {
        !matches!(self, PayPeriod::Other(_))
    }
}

impl std::fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PayPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PayPeriod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(PayPeriod::from_raw(raw.as_str()))
    }
}

/// One version of a teacher's salary configuration.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "id": 12,
    "teacher_id": 7,
    "base_amount": 3000000,
    "base_period": "month",
    "has_allowance": true,
    "allowance_amount": 5000,
    "allowance_period": "day",
    "allowance_trigger": "start_of_duty",
    "effective_date": "2026-01-01",
    "created_at": "2026-01-01T08:00:00",
    "superseded_at": null
}))]
pub struct SalaryConfig {
    pub id: u64,
    pub teacher_id: u64,
    pub base_amount: i64,
    #[schema(value_type = String, example = "month")]
    pub base_period: PayPeriod,
    pub has_allowance: bool,
    pub allowance_amount: i64,
    #[schema(value_type = String, example = "day")]
    pub allowance_period: PayPeriod,
    pub allowance_trigger: String,
    #[schema(value_type = String, format = "date")]
    pub effective_date: NaiveDate,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub superseded_at: Option<NaiveDateTime>,
}

/// Row shape of `salary_configs`; periods arrive as raw strings.
#[derive(sqlx::FromRow)]
pub struct SalaryConfigRow {
    pub id: u64,
    pub teacher_id: u64,
    pub base_amount: i64,
    pub base_period: String,
    pub has_allowance: bool,
    pub allowance_amount: i64,
    pub allowance_period: String,
    pub allowance_trigger: String,
    pub effective_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub superseded_at: Option<NaiveDateTime>,
}

impl From<SalaryConfigRow> for SalaryConfig {
    fn from(row: SalaryConfigRow) -> Self {
        Self {
            id: row.id,
            teacher_id: row.teacher_id,
            base_amount: row.base_amount,
            base_period: PayPeriod::from_raw(row.base_period.as_str()),
            has_allowance: row.has_allowance,
            allowance_amount: row.allowance_amount,
            allowance_period: PayPeriod::from_raw(row.allowance_period.as_str()),
            allowance_trigger: row.allowance_trigger,
            effective_date: row.effective_date,
            created_at: row.created_at,
            superseded_at: row.superseded_at,
        }
    }
}

/// Body of the "set salary" action.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewSalaryConfig {
    #[schema(example = 7)]
    pub teacher_id: u64,

    #[schema(example = 3000000)]
    pub base_amount: i64,

    #[schema(value_type = String, example = "month")]
    pub base_period: PayPeriod,

    #[serde(default)]
    pub has_allowance: bool,

    #[serde(default)]
    #[schema(example = 5000)]
    pub allowance_amount: i64,

    #[serde(default = "default_allowance_period")]
    #[schema(value_type = String, example = "day")]
    pub allowance_period: PayPeriod,

    #[serde(default = "default_allowance_trigger")]
    #[schema(example = "start_of_duty")]
    pub allowance_trigger: String,

    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub effective_date: NaiveDate,
}

fn default_allowance_period() -> PayPeriod {
    PayPeriod::Month
}

fn default_allowance_trigger() -> String {
    "start_of_duty".to_string()
}
