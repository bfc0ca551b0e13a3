//! Business logic between the HTTP routes and the backend client traits.
//!
//! Services are generic over the reader/writer traits of [`crate::api`], so
//! they run unchanged against the HTTP client or a mock.

use thiserror::Error;

use crate::models::auth::AuthenticatedUser;

pub mod export;
pub mod tickets;
pub mod training;
pub mod users;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The signed-in user lacks the role for this screen.
    #[error("unauthorized")]
    Unauthorized,

    /// The backend refused the session credentials.
    #[error("session expired")]
    SessionExpired,

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Form(String),

    /// Another change for the same record is still in flight.
    #[error("{0}")]
    Conflict(String),

    /// Backend failure, already phrased for the user.
    #[error("{0}")]
    Backend(String),

    #[error("type constraint violation: {0}")]
    TypeConstraint(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Whether `roles` contains `role`.
pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|r| r == role)
}

pub fn ensure_role(user: &AuthenticatedUser, role: &str) -> ServiceResult<()> {
    if check_role(role, &user.roles) {
        Ok(())
    } else {
        log::warn!("User {} lacks role {role}", user.email);
        Err(ServiceError::Unauthorized)
    }
}
