//! The list screen controller: query state, fetch, refine and mutate.
//!
//! A [`ListController`] owns the query of one list screen and the result of
//! its latest fetch. Backend access is passed in as closures so the same
//! controller drives hosts, guests, coordinators and tickets.
//!
//! The web handlers build one controller per request: a changed query is a
//! new page load. Fetch sequencing matters to callers that keep a controller
//! and refresh it while an earlier fetch is still pending.

use std::future::Future;

use crate::api::{ApiResult, ListPage, ListQuery};
use crate::controller::fetch::{FetchOrchestrator, ListState};
use crate::controller::mapper::DisplayMapper;
use crate::controller::mutation::{
    MutationCommand, MutationDispatcher, MutationError, ValidatedCommand,
};
use crate::controller::refine::PageRefiner;

pub mod fetch;
pub mod mapper;
pub mod mutation;
pub mod refine;

#[derive(Debug)]
pub struct ListController<D> {
    query: ListQuery,
    fetch: FetchOrchestrator<D>,
}

impl<D: Clone> ListController<D> {
    pub fn new(query: ListQuery) -> Self {
        Self {
            query,
            fetch: FetchOrchestrator::new(),
        }
    }

    /// Fetches the current query through `load`.
    ///
    /// Returns `false` when a newer fetch started while this one was pending;
    /// its result is then dropped.
    pub async fn refresh<R, F, Fut>(&self, load: F) -> bool
    where
        R: DisplayMapper<Display = D>,
        F: FnOnce(ListQuery) -> Fut,
        Fut: Future<Output = ApiResult<ListPage<R>>>,
    {
        let ticket = self.fetch.begin();
        let result = load(self.query.clone()).await;
        self.fetch.complete(ticket, &self.query, result)
    }

    pub fn state(&self) -> ListState<D> {
        self.fetch.snapshot()
    }

    /// Current state with `refiner` applied to the fetched page.
    pub fn visible(&self, refiner: &impl PageRefiner<D>) -> ListState<D> {
        let mut state = self.state();
        state.records = refiner.refine(state.records);
        state
    }

    /// Sends `command` through `dispatcher`; on success, fetches once more.
    ///
    /// A failed command leaves the fetched list as it was.
    pub async fn mutate<T, R, S, SFut, L, LFut>(
        &self,
        dispatcher: &MutationDispatcher,
        command: &MutationCommand,
        send: S,
        reload: L,
    ) -> Result<T, MutationError>
    where
        R: DisplayMapper<Display = D>,
        S: FnOnce(ValidatedCommand) -> SFut,
        SFut: Future<Output = ApiResult<T>>,
        L: FnOnce(ListQuery) -> LFut,
        LFut: Future<Output = ApiResult<ListPage<R>>>,
    {
        let outcome = dispatcher.dispatch(command, send).await?;
        self.refresh(reload).await;
        Ok(outcome)
    }
}
