//! Error conversion glue between the layers.
//!
//! The domain, backend client and controller layers know nothing about
//! services; the conversions into [`ServiceError`] live here instead.

use crate::api::errors::ApiError;
use crate::controller::mutation::MutationError;
use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<ApiError> for ServiceError {
    fn from(val: ApiError) -> Self {
        match val {
            ApiError::Unauthorized => ServiceError::SessionExpired,
            ApiError::NotFound => ServiceError::NotFound,
            other => ServiceError::Backend(other.user_message()),
        }
    }
}

impl From<MutationError> for ServiceError {
    fn from(val: MutationError) -> Self {
        match val {
            MutationError::Validation(message) => ServiceError::Form(message),
            busy @ MutationError::Busy(_) => ServiceError::Conflict(busy.user_message()),
            MutationError::Api(err) => ServiceError::from(err),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(val: FormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_is_kept_verbatim() {
        let err = ServiceError::from(MutationError::Api(ApiError::Application(Some(
            "Cannot suspend last active admin".into(),
        ))));
        assert_eq!(err.to_string(), "Cannot suspend last active admin");
    }

    #[test]
    fn unauthorized_backend_means_expired_session() {
        assert!(matches!(
            ServiceError::from(ApiError::Unauthorized),
            ServiceError::SessionExpired
        ));
    }
}
