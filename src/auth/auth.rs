use crate::model::role::Role;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, error::ErrorUnauthorized};
use futures::future::{Ready, ready};

/// Caller identity, attached to the request by [`auth_middleware`](super::middleware::auth_middleware).
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
    pub role: Role,

    /// Present only if this user is linked to a teacher record
    pub teacher_id: Option<u64>,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(ErrorUnauthorized("Missing token"))),
        }
    }
}

impl AuthUser {
    pub fn require_admin(&self) -> actix_web::Result<()> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(actix_web::error::ErrorForbidden("Admin only"))
        }
    }

    /// Admin or bursar.
    pub fn require_finance(&self) -> actix_web::Result<()> {
        if matches!(self.role, Role::Admin | Role::Bursar) {
            Ok(())
        } else {
            Err(actix_web::error::ErrorForbidden("Bursar/Admin only"))
        }
    }

    /// Finance staff see every teacher; a teacher sees only their own records.
    pub fn require_teacher_access(&self, teacher_id: u64) -> actix_web::Result<()> {
        if self.require_finance().is_ok() {
            return Ok(());
        }
        if self.role == Role::Teacher && self.teacher_id == Some(teacher_id) {
            return Ok(());
        }
        Err(actix_web::error::ErrorForbidden(
            "Not allowed to view this teacher's payroll",
        ))
    }
}
