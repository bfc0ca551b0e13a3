//! DTO modules that bridge services with templates and the JSON API.

pub mod tickets;
pub mod training;
pub mod users;

use serde::Serialize;

use crate::api::ListQuery;

/// Filter values echoed back into the list form.
#[derive(Debug, Default, Clone, Serialize, PartialEq, Eq)]
pub struct ListFilters {
    pub search_query: Option<String>,
    pub statuses: Vec<String>,
    pub approvals: Vec<String>,
    pub location: Option<String>,
}

impl ListFilters {
    pub fn new(query: &ListQuery, selected_statuses: Vec<String>) -> Self {
        Self {
            search_query: query.search.as_ref().map(|s| s.to_string()),
            statuses: selected_statuses,
            approvals: query.approvals.clone(),
            location: query.location.as_ref().map(|l| l.to_string()),
        }
    }
}
