use crate::model::payment::{NewPayment, Payment, PaymentType};
use crate::model::salary::{NewSalaryConfig, SalaryConfig};
use crate::payroll::accrual::Breakdown;
use crate::payroll::batch::PayrollRunSummary;
use crate::payroll::reconcile::{PayoutPreview, Reconciliation};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "School Admin Payroll API",
        version = "1.0.0",
        description = r#"
## Teacher Payroll

Accrues teacher pay from attendance and salary configuration, reconciles it against
recorded payments, and records every disbursement together with a matching expense line.

### 🔹 Key Features
- **Reconciliation**
  - Accrued, paid and unpaid amounts per teacher and date range
- **Payments**
  - Manual payouts and periodic batch runs (day, week, month)
- **Salary Configuration**
  - Versioned salary and allowance settings with full history

### 🔐 Security
All endpoints require a **JWT Bearer** access token.
Admin and Bursar roles manage payroll; teachers can read their own status, preview and payments.

### 📦 Amounts
All amounts are integers in the minor unit of the configured currency.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::payroll::payroll_status,
        crate::api::payroll::preview_payout,
        crate::api::payroll::list_payments,
        crate::api::payroll::pay_teacher,
        crate::api::payroll::generate_payroll,
        crate::api::payroll::set_salary,
        crate::api::payroll::get_salary,
        crate::api::payroll::salary_history
    ),
    components(
        schemas(
            Breakdown,
            Reconciliation,
            PayoutPreview,
            Payment,
            PaymentType,
            NewPayment,
            PayrollRunSummary,
            SalaryConfig,
            NewSalaryConfig
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Payroll", description = "Teacher payroll APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
