//! Mock backend implementations for isolating services in tests.

use mockall::mock;

use crate::api::{
    ApiResult, IssueReader, IssueWriter, ListPage, ListQuery, UserReader, UserWriter,
};
use crate::domain::issue::Issue;
use crate::domain::status::{AccountStatus, ApprovalStatus, TicketStatus};
use crate::domain::types::{RecordId, RejectionReason};
use crate::domain::user::{User, UserKind};

mock! {
    pub Backend {}

    impl UserReader for Backend {
        async fn search_users(
            &self,
            kind: UserKind,
            query: &ListQuery,
        ) -> ApiResult<ListPage<User>>;
        async fn get_user(&self, id: &RecordId) -> ApiResult<User>;
    }

    impl UserWriter for Backend {
        async fn update_user_status(
            &self,
            id: &RecordId,
            status: &AccountStatus,
        ) -> ApiResult<User>;
        async fn update_user_approval<'a>(
            &self,
            id: &RecordId,
            approval: &ApprovalStatus,
            reason: Option<&'a RejectionReason>,
        ) -> ApiResult<User>;
    }

    impl IssueReader for Backend {
        async fn search_issues(&self, query: &ListQuery) -> ApiResult<ListPage<Issue>>;
        async fn get_issue(&self, id: &RecordId) -> ApiResult<Issue>;
    }

    impl IssueWriter for Backend {
        async fn update_issue_status(
            &self,
            id: &RecordId,
            status: &TicketStatus,
        ) -> ApiResult<Issue>;
    }
}
