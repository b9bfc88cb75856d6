use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::auth::AuthUser;
use crate::model::payment::NewPayment;
use crate::model::salary::{NewSalaryConfig, PayPeriod};
use crate::payroll::PayrollService;
use crate::payroll::store::PayrollStore;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PayrollRangeQuery {
    #[param(example = 7)]
    pub teacher_id: u64,

    #[param(example = "2026-06-01", value_type = String, format = Date)]
    pub from: NaiveDate,

    #[param(example = "2026-06-30", value_type = String, format = Date)]
    pub to: NaiveDate,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GenerateQuery {
    /// `day`, `week` or `month`
    #[param(example = "month", value_type = String)]
    pub period: PayPeriod,
}

/// Registers the payroll resources. Callers wrap the enclosing scope with authentication.
pub fn payroll_routes<S: PayrollStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/status").route(web::get().to(payroll_status::<S>)))
        .service(web::resource("/preview").route(web::get().to(preview_payout::<S>)))
        .service(web::resource("/payments").route(web::get().to(list_payments::<S>)))
        .service(web::resource("/pay").route(web::post().to(pay_teacher::<S>)))
        .service(web::resource("/generate").route(web::post().to(generate_payroll::<S>)))
        .service(web::resource("/salary").route(web::put().to(set_salary::<S>)))
        .service(web::resource("/salary/{teacher_id}").route(web::get().to(get_salary::<S>)))
        .service(
            web::resource("/salary/{teacher_id}/history")
                .route(web::get().to(salary_history::<S>)),
        );
}

#[utoipa::path(
    get,
    path = "/api/payroll/status",
    params(PayrollRangeQuery),
    responses(
        (status = 200, description = "Accrued, paid and unpaid amounts for the range", body = crate::payroll::reconcile::Reconciliation),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Salary not configured", body = Object, example = json!({
            "error": "salary_not_configured",
            "message": "salary not configured for teacher 7"
        }))
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn payroll_status<S: PayrollStore + 'static>(
    auth: AuthUser,
    service: web::Data<PayrollService<S>>,
    query: web::Query<PayrollRangeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_teacher_access(query.teacher_id)?;

    let status = service
        .reconcile(query.teacher_id, query.from, query.to)
        .await?;
    Ok(HttpResponse::Ok().json(status))
}

#[utoipa::path(
    get,
    path = "/api/payroll/preview",
    params(PayrollRangeQuery),
    responses(
        (status = 200, description = "Proposed payout for the range", body = crate::payroll::reconcile::PayoutPreview),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Salary not configured")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn preview_payout<S: PayrollStore + 'static>(
    auth: AuthUser,
    service: web::Data<PayrollService<S>>,
    query: web::Query<PayrollRangeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_teacher_access(query.teacher_id)?;

    let preview = service
        .preview_payout(query.teacher_id, query.from, query.to)
        .await?;
    Ok(HttpResponse::Ok().json(preview))
}

#[utoipa::path(
    get,
    path = "/api/payroll/payments",
    params(PayrollRangeQuery),
    responses(
        (status = 200, description = "Payments made in the range, newest first", body = [crate::model::payment::Payment]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn list_payments<S: PayrollStore + 'static>(
    auth: AuthUser,
    service: web::Data<PayrollService<S>>,
    query: web::Query<PayrollRangeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_teacher_access(query.teacher_id)?;

    let payments = service
        .list_payments(query.teacher_id, query.from, query.to)
        .await?;
    Ok(HttpResponse::Ok().json(payments))
}

#[utoipa::path(
    post,
    path = "/api/payroll/pay",
    request_body = NewPayment,
    responses(
        (status = 201, description = "Payment and expense line recorded", body = crate::model::payment::Payment),
        (status = 400, description = "Invalid payment", body = Object, example = json!({
            "error": "validation_error",
            "message": "validation failed: amount must be greater than zero"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Teacher not found"),
        (status = 500, description = "Transaction failed and was rolled back", body = Object, example = json!({
            "error": "transaction_failed",
            "message": "failed to create expense"
        }))
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn pay_teacher<S: PayrollStore + 'static>(
    auth: AuthUser,
    service: web::Data<PayrollService<S>>,
    payload: web::Json<NewPayment>,
) -> actix_web::Result<impl Responder> {
    auth.require_finance()?;

    let payment = service.pay_teacher(&payload).await?;
    Ok(HttpResponse::Created().json(payment))
}

#[utoipa::path(
    post,
    path = "/api/payroll/generate",
    params(GenerateQuery),
    responses(
        (status = 200, description = "Run finished; per-teacher failures are listed in `errors`", body = crate::payroll::batch::PayrollRunSummary),
        (status = 400, description = "Unsupported period"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn generate_payroll<S: PayrollStore + 'static>(
    auth: AuthUser,
    service: web::Data<PayrollService<S>>,
    query: web::Query<GenerateQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_finance()?;

    let summary = service
        .generate_payroll(query.into_inner().period)
        .await?;
    Ok(HttpResponse::Ok().json(summary))
}

#[utoipa::path(
    put,
    path = "/api/payroll/salary",
    request_body = NewSalaryConfig,
    responses(
        (status = 200, description = "New salary version stored", body = crate::model::salary::SalaryConfig),
        (status = 400, description = "Invalid salary configuration"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Teacher not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn set_salary<S: PayrollStore + 'static>(
    auth: AuthUser,
    service: web::Data<PayrollService<S>>,
    payload: web::Json<NewSalaryConfig>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let saved = service.set_salary(&payload).await?;
    Ok(HttpResponse::Ok().json(saved))
}

#[utoipa::path(
    get,
    path = "/api/payroll/salary/{teacher_id}",
    params(
        ("teacher_id", description = "Teacher ID")
    ),
    responses(
        (status = 200, description = "Current salary configuration", body = crate::model::salary::SalaryConfig),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Salary not configured")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn get_salary<S: PayrollStore + 'static>(
    auth: AuthUser,
    service: web::Data<PayrollService<S>>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_finance()?;

    let salary = service.current_salary(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(salary))
}

#[utoipa::path(
    get,
    path = "/api/payroll/salary/{teacher_id}/history",
    params(
        ("teacher_id", description = "Teacher ID")
    ),
    responses(
        (status = 200, description = "Every salary version, newest first", body = [crate::model::salary::SalaryConfig]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn salary_history<S: PayrollStore + 'static>(
    auth: AuthUser,
    service: web::Data<PayrollService<S>>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_finance()?;

    let history = service.salary_history(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(history))
}
