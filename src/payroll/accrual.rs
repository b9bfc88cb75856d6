//! Pure accrual rules: what a salary configuration owes for a stretch of duty.

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::salary::{PayPeriod, SalaryConfig};

/// Base, allowance and total amounts in minor currency units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct Breakdown {
    #[schema(example = 2000000)]
    pub base: i64,
    #[schema(example = 100000)]
    pub allowance: i64,
    #[schema(example = 2100000)]
    pub total: i64,
}

impl Breakdown {
    /// Sums saturate at the `i64` bounds.
    pub fn new(base: i64, allowance: i64) -> Self {
        Self {
            base,
            allowance,
            total: base.saturating_add(allowance),
        }
    }

    /// Component-wise difference. May go negative; saturates at the `i64` bounds.
    pub fn minus(&self, other: &Breakdown) -> Breakdown {
        Breakdown {
            base: self.base.saturating_sub(other.base),
            allowance: self.allowance.saturating_sub(other.allowance),
            total: self.total.saturating_sub(other.total),
        }
    }
}

/// Amount owed for one salary component.
///
/// Day rates scale with duty days and week rates with (fractional) weeks; anything
/// else is the flat amount itself. Fractional weeks are truncated toward zero, not
/// rounded.
fn component(amount: i64, period: &PayPeriod, duty_days: i64, weeks: f64) -> i64 {
    match period {
        PayPeriod::Day => amount.saturating_mul(duty_days),
        // `as` saturates on overflow
        PayPeriod::Week => (amount as f64 * weeks).trunc() as i64,
        PayPeriod::Month | PayPeriod::Other(_) => amount,
    }
}

/// Accrued pay for a period. A missing configuration owes nothing.
pub fn accrue(config: Option<&SalaryConfig>, duty_days: i64, weeks: f64) -> Breakdown {
    let Some(config) = config else {
        return Breakdown::default();
    };

    let base = component(config.base_amount, &config.base_period, duty_days, weeks);
    let allowance = if config.has_allowance {
        component(
            config.allowance_amount,
            &config.allowance_period,
            duty_days,
            weeks,
        )
    } else {
        0
    };

    Breakdown::new(base, allowance)
}
