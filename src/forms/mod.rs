//! Form and query-string definitions backing the dashboard routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod list;
pub mod tickets;
pub mod users;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("malformed query string: {0}")]
    Query(#[from] serde::de::value::Error),

    #[error("unknown status action")]
    InvalidStatus,

    #[error("unknown approval decision")]
    InvalidDecision,
}
