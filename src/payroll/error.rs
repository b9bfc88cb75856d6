//! Errors raised by the payroll core.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use strum_macros::Display;
use thiserror::Error;

/// Step of a payment transaction, named in the failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TransactionStep {
    #[strum(serialize = "failed to begin transaction")]
    Begin,
    #[strum(serialize = "failed to insert payment")]
    InsertPayment,
    #[strum(serialize = "failed to create category")]
    CreateCategory,
    #[strum(serialize = "failed to create expense")]
    CreateExpense,
    #[strum(serialize = "failed to commit transaction")]
    Commit,
}

#[derive(Debug, Error)]
pub enum PayrollError {
    /// The teacher has no current salary configuration.
    #[error("salary not configured for teacher {teacher_id}")]
    SalaryNotConfigured { teacher_id: u64 },

    #[error("teacher {teacher_id} not found")]
    TeacherNotFound { teacher_id: u64 },

    /// Rejected before any write.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A step of the payment transaction failed; nothing was committed.
    #[error("{step}: {source}")]
    Transaction {
        step: TransactionStep,
        #[source]
        source: sqlx::Error,
    },

    #[error("data access error: {0}")]
    DataAccess(#[from] sqlx::Error),
}

pub type PayrollResult<T> = Result<T, PayrollError>;

impl PayrollError {
    pub fn validation(message: impl Into<String>) -> Self {
        PayrollError::Validation(message.into())
    }

    fn code(&self) -> &'static str {
        match self {
            PayrollError::SalaryNotConfigured { .. } => "salary_not_configured",
            PayrollError::TeacherNotFound { .. } => "teacher_not_found",
            PayrollError::Validation(_) => "validation_error",
            PayrollError::Transaction { .. } => "transaction_failed",
            PayrollError::DataAccess(_) => "data_access_error",
        }
    }
}

impl ResponseError for PayrollError {
    fn status_code(&self) -> StatusCode {
        match self {
            PayrollError::SalaryNotConfigured { .. } | PayrollError::TeacherNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            PayrollError::Validation(_) => StatusCode::BAD_REQUEST,
            PayrollError::Transaction { .. } | PayrollError::DataAccess(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            // storage details stay in the logs
            PayrollError::DataAccess(_) => "Internal Server Error".to_string(),
            PayrollError::Transaction { step, .. } => step.to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({
            "error": self.code(),
            "message": message,
        }))
    }
}
