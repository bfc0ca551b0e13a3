//! Request sequencing for list fetches.
//!
//! Every fetch takes a [`FetchTicket`] from a monotonic counter before it
//! suspends on I/O. When it resumes, its result is applied only if no newer
//! ticket was issued in the meantime, so a slow response can never overwrite
//! a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::api::errors::ApiError;
use crate::api::{ApiResult, ListPage, ListQuery};
use crate::controller::mapper::DisplayMapper;
use crate::pagination::PaginationEnvelope;

/// What a list screen renders.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ListState<D> {
    pub loading: bool,
    pub error: Option<String>,
    /// Set when the backend refused the session; routes turn it into a
    /// sign-in redirect.
    pub session_expired: bool,
    pub records: Vec<D>,
    pub pagination: Option<PaginationEnvelope>,
}

impl<D> Default for ListState<D> {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            session_expired: false,
            records: Vec::new(),
            pagination: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub struct FetchOrchestrator<D> {
    issued: AtomicU64,
    state: Mutex<ListState<D>>,
}

impl<D> Default for FetchOrchestrator<D> {
    fn default() -> Self {
        Self {
            issued: AtomicU64::new(0),
            state: Mutex::new(ListState::default()),
        }
    }
}

impl<D: Clone> FetchOrchestrator<D> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ListState<D>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a new in-flight request and marks the list as loading.
    pub fn begin(&self) -> FetchTicket {
        let mut state = self.lock();
        let sequence = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        state.loading = true;
        FetchTicket(sequence)
    }

    /// Whether `ticket` belongs to the most recently issued request.
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// Applies the outcome of the request identified by `ticket`.
    ///
    /// Returns `false` and leaves state untouched when the ticket is stale.
    pub fn complete<R>(
        &self,
        ticket: FetchTicket,
        query: &ListQuery,
        result: ApiResult<ListPage<R>>,
    ) -> bool
    where
        R: DisplayMapper<Display = D>,
    {
        let mut state = self.lock();
        if !self.is_current(ticket) {
            log::debug!(
                "Discarding stale list response #{} (latest #{})",
                ticket.0,
                self.issued.load(Ordering::SeqCst)
            );
            return false;
        }

        match result {
            Ok(page) => {
                let limit = query.per_page();
                let mut records = page.records;
                if limit > 0 && records.len() > limit {
                    log::warn!(
                        "Backend returned {} records for a page of {limit}; truncating",
                        records.len()
                    );
                    records.truncate(limit);
                }
                let pagination = match page.pagination {
                    Some(envelope) => {
                        PaginationEnvelope::new(envelope.page, envelope.limit, envelope.total)
                    }
                    None => PaginationEnvelope::synthesize(query.page(), limit, records.len()),
                };
                state.records = records.iter().map(DisplayMapper::to_display).collect();
                state.pagination = Some(pagination);
                state.error = None;
                state.session_expired = false;
            }
            Err(err) => {
                log::error!("Failed to fetch list: {err}");
                state.session_expired = matches!(err, ApiError::Unauthorized);
                state.error = Some(err.user_message());
                state.records.clear();
                state.pagination = None;
            }
        }
        state.loading = false;
        true
    }

    pub fn snapshot(&self) -> ListState<D> {
        self.lock().clone()
    }
}
