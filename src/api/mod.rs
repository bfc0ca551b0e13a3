//! Backend access layer.
//!
//! Reader/writer traits describe what the dashboard needs from the Heaven
//! Connect REST backend. [`client::HeavenApi`] implements them over HTTP;
//! services only ever see the traits so they can be exercised with fakes.

use serde::Serialize;

use crate::domain::booking::Booking;
use crate::domain::issue::Issue;
use crate::domain::status::{AccountStatus, ApprovalStatus, TicketStatus};
use crate::domain::training::TrainingModule;
use crate::domain::types::{LocationNeedle, RecordId, RejectionReason, SearchTerm};
use crate::domain::user::{User, UserKind};
use crate::pagination::PaginationEnvelope;

pub mod client;
pub mod errors;
pub mod fixtures;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod wire;

pub use errors::{ApiError, ApiResult};

/// UI placeholder meaning "do not filter on this dimension".
pub const ALL_SENTINEL: &str = "all";

/// Session identity attached to every backend request.
///
/// Supplied by the caller instead of being read from ambient storage, so the
/// client can be driven from tests without a browser or cookie jar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionCredentials {
    pub token: String,
    pub user_id: String,
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

/// Current request shape of a list screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    pub search: Option<SearchTerm>,
    /// Backend status values; empty means the filter is omitted.
    pub statuses: Vec<String>,
    /// Backend approval values; empty means the filter is omitted.
    pub approvals: Vec<String>,
    /// Applied to the fetched page only, never sent to the backend.
    pub location: Option<LocationNeedle>,
    pub pagination: Pagination,
}

/// Normalizes a categorical filter selection.
///
/// Blank entries are dropped and any `"all"` selection clears the filter.
pub fn selected_values<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut values = Vec::new();
    for value in raw {
        let value = value.as_ref().trim();
        if value.is_empty() {
            continue;
        }
        if value.eq_ignore_ascii_case(ALL_SENTINEL) {
            return Vec::new();
        }
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }
    values
}

impl ListQuery {
    pub fn new(per_page: usize) -> Self {
        Self {
            search: None,
            statuses: Vec::new(),
            approvals: Vec::new(),
            location: None,
            pagination: Pagination { page: 1, per_page },
        }
    }

    /// Sets the free-text search; blank text clears it.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = SearchTerm::new(term).ok();
        self
    }

    pub fn statuses<I, S>(mut self, raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.statuses = selected_values(raw);
        self
    }

    pub fn approvals<I, S>(mut self, raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.approvals = selected_values(raw);
        self
    }

    pub fn location(mut self, needle: impl Into<String>) -> Self {
        self.location = LocationNeedle::new(needle).ok();
        self
    }

    /// Moves to `page`, clamped to the first page.
    pub fn paginate(mut self, page: usize) -> Self {
        self.pagination.page = page.max(1);
        self
    }

    pub fn page(&self) -> usize {
        self.pagination.page
    }

    pub fn per_page(&self) -> usize {
        self.pagination.per_page
    }
}

/// One fetched page of records, already normalized from the wire shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub records: Vec<T>,
    pub pagination: Option<PaginationEnvelope>,
}

#[allow(async_fn_in_trait)]
pub trait UserReader {
    async fn search_users(&self, kind: UserKind, query: &ListQuery) -> ApiResult<ListPage<User>>;
    async fn get_user(&self, id: &RecordId) -> ApiResult<User>;
}

#[allow(async_fn_in_trait)]
pub trait UserWriter {
    async fn update_user_status(&self, id: &RecordId, status: &AccountStatus) -> ApiResult<User>;
    async fn update_user_approval(
        &self,
        id: &RecordId,
        approval: &ApprovalStatus,
        reason: Option<&RejectionReason>,
    ) -> ApiResult<User>;
}

#[allow(async_fn_in_trait)]
pub trait IssueReader {
    async fn search_issues(&self, query: &ListQuery) -> ApiResult<ListPage<Issue>>;
    async fn get_issue(&self, id: &RecordId) -> ApiResult<Issue>;
}

#[allow(async_fn_in_trait)]
pub trait IssueWriter {
    async fn update_issue_status(&self, id: &RecordId, status: &TicketStatus) -> ApiResult<Issue>;
}

/// Data the backend does not serve yet.
pub trait PlaceholderSource {
    fn training_modules(&self) -> Vec<TrainingModule>;
    fn training_module(&self, id: i64) -> Option<TrainingModule>;
    fn host_bookings(&self, host_id: &RecordId) -> Vec<Booking>;
}
