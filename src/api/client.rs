//! HTTP client for the Heaven Connect REST backend.
//!
//! Wraps the `/api/v1/users` and `/api/v1/issues` endpoints using
//! [`reqwest`]. Credentials are bound per request through
//! [`HeavenApi::session`].

use std::time::Duration;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::api::errors::{ApiError, ApiResult};
use crate::api::wire::{ApprovalUpdate, Envelope, ListPayload, SearchRequest, StatusUpdate};
use crate::api::{
    IssueReader, IssueWriter, ListPage, ListQuery, SessionCredentials, UserReader, UserWriter,
};
use crate::domain::issue::Issue;
use crate::domain::status::{AccountStatus, ApprovalStatus, TicketStatus};
use crate::domain::types::{RecordId, RejectionReason};
use crate::domain::user::{User, UserKind};

/// Shared HTTP client; cheap to clone, pools connections.
#[derive(Clone, Debug)]
pub struct HeavenApi {
    client: reqwest::Client,
    base_url: String,
}

/// [`HeavenApi`] bound to the credentials of one signed-in admin.
#[derive(Clone, Copy, Debug)]
pub struct SessionApi<'a> {
    api: &'a HeavenApi,
    credentials: &'a SessionCredentials,
}

impl HeavenApi {
    /// Creates a client with a per-request timeout.
    ///
    /// * `base_url` - Backend origin, e.g. `https://api.example.com`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Creates a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session<'a>(&'a self, credentials: &'a SessionCredentials) -> SessionApi<'a> {
        SessionApi {
            api: self,
            credentials,
        }
    }
}

fn record_path(collection: &str, id: &RecordId) -> String {
    let id = id.to_string();
    format!(
        "/api/v1/{collection}/{}",
        utf8_percent_encode(&id, NON_ALPHANUMERIC)
    )
}

impl SessionApi<'_> {
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request_id = Uuid::new_v4().to_string();
        log::debug!("{method} {path} request_id={request_id}");

        self.api
            .client
            .request(method, format!("{}{}", self.api.base_url, path))
            .bearer_auth(&self.credentials.token)
            .header("x-user-id", &self.credentials.user_id)
            .header("x-session-id", &self.credentials.session_id)
            .header("x-request-id", request_id)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }

        let body = response.bytes().await?;

        if !status.is_success() {
            // Error bodies usually still use the `{status, errMessage}` wrapper.
            if let Ok(envelope) = serde_json::from_slice::<Envelope>(&body)
                && envelope.err_message.is_some()
            {
                return Err(ApiError::Application(envelope.err_message));
            }
            if status == StatusCode::NOT_FOUND {
                return Err(ApiError::NotFound);
            }
            log::warn!("Backend answered HTTP {status}");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let envelope: Envelope =
            serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        envelope.into_result()
    }

    async fn search<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &SearchRequest<'_>,
    ) -> ApiResult<ListPage<T>> {
        let payload: ListPayload<T> = self
            .send(self.request(Method::POST, path).json(body))
            .await?;
        Ok(payload.into_page(body.page, body.limit))
    }
}

impl UserReader for SessionApi<'_> {
    async fn search_users(&self, kind: UserKind, query: &ListQuery) -> ApiResult<ListPage<User>> {
        self.search("/api/v1/users/search", &SearchRequest::users(kind, query))
            .await
    }

    async fn get_user(&self, id: &RecordId) -> ApiResult<User> {
        self.send(self.request(Method::GET, &record_path("users", id)))
            .await
    }
}

impl UserWriter for SessionApi<'_> {
    async fn update_user_status(&self, id: &RecordId, status: &AccountStatus) -> ApiResult<User> {
        let status = status.to_string();
        let path = format!("{}/status", record_path("users", id));
        self.send(
            self.request(Method::PATCH, &path)
                .json(&StatusUpdate { status: &status }),
        )
        .await
    }

    async fn update_user_approval(
        &self,
        id: &RecordId,
        approval: &ApprovalStatus,
        reason: Option<&RejectionReason>,
    ) -> ApiResult<User> {
        let approval = approval.to_string();
        let path = format!("{}/approval", record_path("users", id));
        self.send(self.request(Method::PATCH, &path).json(&ApprovalUpdate {
            approval_status: &approval,
            rejection_reason: reason.map(RejectionReason::as_str),
        }))
        .await
    }
}

impl IssueReader for SessionApi<'_> {
    async fn search_issues(&self, query: &ListQuery) -> ApiResult<ListPage<Issue>> {
        self.search("/api/v1/issues/search", &SearchRequest::issues(query))
            .await
    }

    async fn get_issue(&self, id: &RecordId) -> ApiResult<Issue> {
        self.send(self.request(Method::GET, &record_path("issues", id)))
            .await
    }
}

impl IssueWriter for SessionApi<'_> {
    async fn update_issue_status(&self, id: &RecordId, status: &TicketStatus) -> ApiResult<Issue> {
        let status = status.to_string();
        let path = format!("{}/status", record_path("issues", id));
        self.send(
            self.request(Method::PATCH, &path)
                .json(&StatusUpdate { status: &status }),
        )
        .await
    }
}
