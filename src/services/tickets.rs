use crate::SERVICE_ACCESS_ROLE;
use crate::api::errors::ApiError;
use crate::api::{IssueReader, IssueWriter, selected_values};
use crate::controller::ListController;
use crate::controller::mapper::{DisplayMapper, TicketDisplay};
use crate::controller::mutation::{MutationDispatcher, RecordKind, ValidChange};
use crate::controller::refine::NoRefinement;
use crate::domain::issue::TICKETS_PAGE_SIZE;
use crate::domain::types::RecordId;
use crate::dto::ListFilters;
use crate::dto::tickets::{TicketDetailPage, TicketListPage};
use crate::forms::list::ListParams;
use crate::forms::tickets::TicketStatusForm;
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{Paginated, PaginationEnvelope};
use crate::services::{ServiceError, ServiceResult, ensure_role};

/// Statuses offered in the ticket status selector.
pub const TICKET_STATUSES: [&str; 4] = ["OPEN", "IN_PROGRESS", "RESOLVED", "CLOSED"];

pub async fn load_ticket_list<R>(
    repo: &R,
    dispatcher: &MutationDispatcher,
    user: &AuthenticatedUser,
    params: &ListParams,
) -> ServiceResult<TicketListPage>
where
    R: IssueReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let query = params.to_ticket_query(TICKETS_PAGE_SIZE);
    let controller = ListController::<TicketDisplay>::new(query.clone());
    controller
        .refresh(|q| async move { repo.search_issues(&q).await })
        .await;

    let state = controller.visible(&NoRefinement);
    if state.session_expired {
        return Err(ServiceError::SessionExpired);
    }
    let envelope = state
        .pagination
        .unwrap_or_else(|| PaginationEnvelope::synthesize(query.page(), query.per_page(), 0));

    Ok(TicketListPage {
        tickets: Paginated::new(state.records, &envelope),
        error: state.error,
        filters: ListFilters::new(&query, selected_values(&params.status)),
        busy_ids: dispatcher.busy_ids(RecordKind::Ticket),
    })
}

pub async fn load_ticket_detail<R>(
    repo: &R,
    dispatcher: &MutationDispatcher,
    user: &AuthenticatedUser,
    raw_id: &str,
) -> ServiceResult<TicketDetailPage>
where
    R: IssueReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let id = RecordId::parse(raw_id).map_err(|_| ServiceError::NotFound)?;
    let issue = repo.get_issue(&id).await.map_err(|err| {
        log::error!("Failed to get ticket {id}: {err}");
        ServiceError::from(err)
    })?;

    Ok(TicketDetailPage {
        ticket: issue.to_display(),
        busy: dispatcher.is_busy(RecordKind::Ticket, &id),
        statuses: TICKET_STATUSES.to_vec(),
    })
}

pub async fn change_ticket_status<R>(
    repo: &R,
    dispatcher: &MutationDispatcher,
    user: &AuthenticatedUser,
    raw_id: &str,
    form: &TicketStatusForm,
) -> ServiceResult<TicketDisplay>
where
    R: IssueWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let command = form.to_command(raw_id)?;
    let updated = dispatcher
        .dispatch(&command, |cmd| async move {
            match &cmd.change {
                ValidChange::Ticket(status) => {
                    repo.update_issue_status(&cmd.record_id, status).await
                }
                _ => Err(ApiError::Application(Some(
                    "Only ticket statuses apply to tickets.".to_string(),
                ))),
            }
        })
        .await?;
    log::info!("{} changed status of ticket {raw_id}", user.email);
    Ok(updated.to_display())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use mockall::predicate::eq;
    use serde_json::json;

    use super::*;
    use crate::api::ListPage;
    use crate::api::mock::MockBackend;
    use crate::domain::issue::Issue;
    use crate::domain::status::TicketStatus;
    use crate::services::test_support::{admin_user, viewer_user};

    fn issue(value: serde_json::Value) -> Issue {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn list_uses_ticket_page_size() {
        let mut repo = MockBackend::new();
        repo.expect_search_issues()
            .withf(|query| query.per_page() == 20 && query.statuses == vec!["OPEN".to_string()])
            .times(1)
            .returning(|_| {
                Ok(ListPage {
                    records: vec![issue(
                        json!({"id": 1, "subject": "Leaking roof", "status": "OPEN"}),
                    )],
                    pagination: Some(PaginationEnvelope::new(1, 20, 45)),
                })
            });

        let params = ListParams {
            status: vec!["OPEN".into()],
            ..ListParams::default()
        };
        let page = load_ticket_list(&repo, &MutationDispatcher::new(), &admin_user(), &params)
            .await
            .unwrap();

        assert_eq!(page.tickets.items[0].subject, "Leaking roof");
        assert_eq!(page.tickets.pages, vec![Some(1), Some(2), Some(3)]);
        assert!(page.tickets.has_next);
    }

    #[tokio::test]
    async fn list_requires_role() {
        let mut repo = MockBackend::new();
        repo.expect_search_issues().times(0);
        let result = load_ticket_list(
            &repo,
            &MutationDispatcher::new(),
            &viewer_user(),
            &ListParams::default(),
        )
        .await;
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[tokio::test]
    async fn missing_ticket_is_not_found() {
        let mut repo = MockBackend::new();
        repo.expect_get_issue()
            .with(eq(RecordId::Str("T-9".into())))
            .returning(|_| Err(ApiError::NotFound));

        let result =
            load_ticket_detail(&repo, &MutationDispatcher::new(), &admin_user(), "T-9").await;
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[tokio::test]
    async fn resolve_sends_status() {
        let mut repo = MockBackend::new();
        repo.expect_update_issue_status()
            .with(eq(RecordId::Int(3)), eq(TicketStatus::Resolved))
            .times(1)
            .returning(|_, _| Ok(issue(json!({"id": 3, "status": "RESOLVED"}))));

        let display = change_ticket_status(
            &repo,
            &MutationDispatcher::new(),
            &admin_user(),
            "3",
            &TicketStatusForm {
                status: "RESOLVED".into(),
                next: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(display.status, "RESOLVED");
    }
}
