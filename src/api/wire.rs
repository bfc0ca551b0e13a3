//! Request and response shapes of the backend REST API.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::errors::{ApiError, ApiResult};
use crate::api::{ListPage, ListQuery};
use crate::domain::user::UserKind;
use crate::pagination::{PaginationEnvelope, WirePagination};

/// Body of `POST /api/v1/{users,issues}/search`.
#[derive(Debug, Serialize, PartialEq)]
pub struct SearchRequest<'a> {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub user_type: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub approval_status: Vec<&'a str>,
    pub page: usize,
    pub limit: usize,
}

impl<'a> SearchRequest<'a> {
    pub fn users(kind: UserKind, query: &'a ListQuery) -> Self {
        Self {
            user_type: vec![kind.wire_value()],
            ..Self::issues(query)
        }
    }

    pub fn issues(query: &'a ListQuery) -> Self {
        Self {
            user_type: Vec::new(),
            search_query: query.search.as_ref().map(|term| term.as_str()),
            status: query.statuses.iter().map(String::as_str).collect(),
            approval_status: query.approvals.iter().map(String::as_str).collect(),
            page: query.page(),
            limit: query.per_page(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusUpdate<'a> {
    pub status: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ApprovalUpdate<'a> {
    pub approval_status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<&'a str>,
}

/// Common response wrapper `{status, data, errMessage}`.
///
/// `data` stays untyped until `status` has been checked; failure responses
/// may carry a placeholder there that matches no record shape.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub status: Option<bool>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default, rename = "errMessage", alias = "err_message", alias = "message")]
    pub err_message: Option<String>,
}

impl Envelope {
    pub fn into_result<T: DeserializeOwned>(self) -> ApiResult<T> {
        if self.status == Some(false) {
            return Err(ApiError::Application(self.err_message));
        }
        let data = self
            .data
            .ok_or_else(|| ApiError::Decode("response carries no data".to_string()))?;
        serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// The two list shapes the backend is known to return.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Array(Vec<T>),
    Envelope {
        list: Vec<T>,
        #[serde(default)]
        pagination: Option<WirePagination>,
        #[serde(flatten)]
        inline: WirePagination,
    },
}

impl<T> ListPayload<T> {
    /// Flattens either shape into a page.
    ///
    /// `requested_page` and `limit` fill the gaps when the server omits
    /// pagination metadata.
    pub fn into_page(self, requested_page: usize, limit: usize) -> ListPage<T> {
        match self {
            ListPayload::Array(records) => ListPage {
                records,
                pagination: None,
            },
            ListPayload::Envelope {
                list,
                pagination,
                inline,
            } => {
                let wire = pagination.or_else(|| {
                    (inline != WirePagination::default()).then_some(inline)
                });
                let pagination = wire.map(|wire| {
                    PaginationEnvelope::reconcile(Some(wire), requested_page, limit, list.len())
                });
                ListPage {
                    records: list,
                    pagination,
                }
            }
        }
    }
}
