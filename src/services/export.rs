//! CSV export of the rows currently shown on a user list screen.

use serde::Serialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::api::UserReader;
use crate::controller::mapper::UserDisplay;
use crate::domain::user::UserKind;
use crate::forms::list::ListParams;
use crate::models::auth::AuthenticatedUser;
use crate::services::users::fetch_users;
use crate::services::{ServiceError, ServiceResult, ensure_role};

#[derive(Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    location: &'a str,
    status: String,
    approval_status: &'a str,
    joined_on: &'a str,
    last_active: &'a str,
}

impl<'a> From<&'a UserDisplay> for ExportRow<'a> {
    fn from(user: &'a UserDisplay) -> Self {
        Self {
            id: &user.id,
            name: &user.name,
            email: &user.email,
            phone: &user.phone,
            location: &user.location,
            status: user.status.to_string(),
            approval_status: &user.approval_status,
            joined_on: &user.joined_on,
            last_active: &user.last_active,
        }
    }
}

fn write_csv(rows: &[UserDisplay]) -> ServiceResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(ExportRow::from(row)).map_err(|err| {
            log::error!("Failed to write export row: {err}");
            ServiceError::Internal(err.to_string())
        })?;
    }
    writer
        .into_inner()
        .map_err(|err| ServiceError::Internal(err.to_string()))
}

/// Exports the page the list screen would show for `params`, location
/// refinement included.
pub async fn export_users_csv<R>(
    repo: &R,
    user: &AuthenticatedUser,
    kind: UserKind,
    params: &ListParams,
) -> ServiceResult<Vec<u8>>
where
    R: UserReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let query = params.to_list_query(kind.page_size());
    let state = fetch_users(repo, kind, &query).await?;
    if let Some(message) = state.error {
        return Err(ServiceError::Backend(message));
    }

    log::info!(
        "{} exported {} {} rows",
        user.email,
        state.records.len(),
        kind.slug()
    );
    write_csv(&state.records)
}
