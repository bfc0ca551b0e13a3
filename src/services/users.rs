use crate::SERVICE_ACCESS_ROLE;
use crate::api::errors::ApiError;
use crate::api::{ApiResult, ListQuery, PlaceholderSource, UserReader, UserWriter, selected_values};
use crate::controller::ListController;
use crate::controller::fetch::ListState;
use crate::controller::mapper::{DisplayMapper, UserDisplay};
use crate::controller::mutation::{
    MutationDispatcher, RecordKind, ValidChange, ValidatedCommand,
};
use crate::controller::refine::refine_by_location;
use crate::domain::types::RecordId;
use crate::domain::user::{User, UserKind};
use crate::dto::ListFilters;
use crate::dto::users::{UserDetailPage, UserListPage};
use crate::forms::list::ListParams;
use crate::forms::users::{ApprovalForm, UserStatusForm};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{Paginated, PaginationEnvelope};
use crate::services::{ServiceError, ServiceResult, ensure_role};

/// Runs one fetch of `query` and returns the refined page.
pub(crate) async fn fetch_users<R>(
    repo: &R,
    kind: UserKind,
    query: &ListQuery,
) -> ServiceResult<ListState<UserDisplay>>
where
    R: UserReader + ?Sized,
{
    let controller = ListController::<UserDisplay>::new(query.clone());
    controller
        .refresh(|q| async move { repo.search_users(kind, &q).await })
        .await;

    let mut state = controller.state();
    if state.session_expired {
        return Err(ServiceError::SessionExpired);
    }
    state.records = refine_by_location(state.records, query.location.as_ref());
    Ok(state)
}

/// Loads one page of users of `kind` for the list screen.
pub async fn load_user_list<R>(
    repo: &R,
    dispatcher: &MutationDispatcher,
    user: &AuthenticatedUser,
    kind: UserKind,
    params: &ListParams,
) -> ServiceResult<UserListPage>
where
    R: UserReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let query = params.to_list_query(kind.page_size());
    let state = fetch_users(repo, kind, &query).await?;

    let envelope = state
        .pagination
        .unwrap_or_else(|| PaginationEnvelope::synthesize(query.page(), query.per_page(), 0));

    Ok(UserListPage {
        screen: kind.into(),
        users: Paginated::new(state.records, &envelope),
        error: state.error,
        filters: ListFilters::new(&query, selected_values(&params.status)),
        busy_ids: dispatcher.busy_ids(RecordKind::User),
    })
}

fn parse_id(raw: &str) -> ServiceResult<RecordId> {
    RecordId::parse(raw).map_err(|_| ServiceError::NotFound)
}

/// A record fetched through one screen must belong to it.
fn ensure_kind(kind: UserKind, record: &User) -> ServiceResult<()> {
    match record.user_type.as_deref() {
        Some(user_type) if !user_type.eq_ignore_ascii_case(kind.wire_value()) => {
            log::warn!(
                "User {} is a {user_type}, not shown under {}",
                record.id,
                kind.slug()
            );
            Err(ServiceError::NotFound)
        }
        _ => Ok(()),
    }
}

/// Loads the detail screen of one user.
pub async fn load_user_detail<R, P>(
    repo: &R,
    placeholders: &P,
    dispatcher: &MutationDispatcher,
    user: &AuthenticatedUser,
    kind: UserKind,
    raw_id: &str,
) -> ServiceResult<UserDetailPage>
where
    R: UserReader + ?Sized,
    P: PlaceholderSource + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let id = parse_id(raw_id)?;
    let record = repo.get_user(&id).await.map_err(|err| {
        log::error!("Failed to get user {id}: {err}");
        ServiceError::from(err)
    })?;
    ensure_kind(kind, &record)?;

    let bookings = match kind {
        UserKind::Host => placeholders.host_bookings(&id),
        _ => Vec::new(),
    };

    Ok(UserDetailPage {
        screen: kind.into(),
        busy: dispatcher.is_busy(RecordKind::User, &id),
        user: record.to_display(),
        bookings,
    })
}

async fn send_user_change<R>(repo: &R, command: ValidatedCommand) -> ApiResult<User>
where
    R: UserWriter + ?Sized,
{
    let id = &command.record_id;
    match &command.change {
        ValidChange::Account(status) => repo.update_user_status(id, status).await,
        ValidChange::Approval(status, reason) => {
            repo.update_user_approval(id, status, reason.as_ref()).await
        }
        ValidChange::Ticket(_) => Err(ApiError::Application(Some(
            "Ticket statuses cannot be applied to users.".to_string(),
        ))),
    }
}

/// Activates, suspends, blocks or deletes a user account.
pub async fn change_user_status<R>(
    repo: &R,
    dispatcher: &MutationDispatcher,
    user: &AuthenticatedUser,
    raw_id: &str,
    form: &UserStatusForm,
) -> ServiceResult<UserDisplay>
where
    R: UserWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let command = form.to_command(raw_id)?;
    let updated = dispatcher
        .dispatch(&command, |cmd| send_user_change(repo, cmd))
        .await?;
    log::info!("{} changed status of user {raw_id}", user.email);
    Ok(updated.to_display())
}

/// Approves or rejects a host or coordinator.
pub async fn change_user_approval<R>(
    repo: &R,
    dispatcher: &MutationDispatcher,
    user: &AuthenticatedUser,
    kind: UserKind,
    raw_id: &str,
    form: &ApprovalForm,
) -> ServiceResult<UserDisplay>
where
    R: UserWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    if !kind.has_approval() {
        return Err(ServiceError::NotFound);
    }

    let command = form.to_command(raw_id)?;
    let updated = dispatcher
        .dispatch(&command, |cmd| send_user_change(repo, cmd))
        .await?;
    log::info!("{} changed approval of user {raw_id}", user.email);
    Ok(updated.to_display())
}
