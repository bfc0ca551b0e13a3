use crate::SERVICE_ACCESS_ROLE;
use crate::api::PlaceholderSource;
use crate::dto::training::{TrainingCard, TrainingModulePage, TrainingPage};
use crate::models::auth::AuthenticatedUser;
use crate::services::{ServiceError, ServiceResult, ensure_role};

/// Lists training modules, published ones first.
pub fn load_training<P>(placeholders: &P, user: &AuthenticatedUser) -> ServiceResult<TrainingPage>
where
    P: PlaceholderSource + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let mut modules = placeholders
        .training_modules()
        .iter()
        .map(TrainingCard::from)
        .collect::<Vec<_>>();
    modules.sort_by_key(|card| (!card.published, card.id));

    Ok(TrainingPage { modules })
}

pub fn load_training_module<P>(
    placeholders: &P,
    user: &AuthenticatedUser,
    module_id: i64,
) -> ServiceResult<TrainingModulePage>
where
    P: PlaceholderSource + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let module = placeholders
        .training_module(module_id)
        .ok_or(ServiceError::NotFound)?;
    Ok(TrainingModulePage {
        total_minutes: module.total_minutes(),
        module,
    })
}
