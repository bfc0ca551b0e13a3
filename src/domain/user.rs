use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::domain::status::{AccountStatus, ApprovalStatus};
use crate::domain::types::RecordId;

/// Marketplace user kinds managed from the dashboard.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum UserKind {
    #[serde(rename = "HOST")]
    Host,
    #[serde(rename = "GUEST")]
    Guest,
    #[serde(rename = "ATP")]
    AreaCoordinator,
}

impl UserKind {
    /// Value sent in the `user_type` search field.
    pub const fn wire_value(self) -> &'static str {
        match self {
            UserKind::Host => "HOST",
            UserKind::Guest => "GUEST",
            UserKind::AreaCoordinator => "ATP",
        }
    }

    /// URL segment of the screen listing this kind.
    pub const fn slug(self) -> &'static str {
        match self {
            UserKind::Host => "hosts",
            UserKind::Guest => "guests",
            UserKind::AreaCoordinator => "coordinators",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            UserKind::Host => "Hosts",
            UserKind::Guest => "Guests",
            UserKind::AreaCoordinator => "Area Coordinators",
        }
    }

    /// Rows per page on the list screen.
    pub const fn page_size(self) -> usize {
        match self {
            UserKind::Host | UserKind::AreaCoordinator => 10,
            UserKind::Guest => 20,
        }
    }

    /// Whether the kind goes through the approval workflow.
    pub const fn has_approval(self) -> bool {
        matches!(self, UserKind::Host | UserKind::AreaCoordinator)
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "hosts" => Some(UserKind::Host),
            "guests" => Some(UserKind::Guest),
            "coordinators" => Some(UserKind::AreaCoordinator),
            _ => None,
        }
    }
}

impl Display for UserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_value())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Address {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// User record as returned by `/api/v1/users`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: RecordId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub status: Option<AccountStatus>,
    #[serde(default)]
    pub approval_status: Option<ApprovalStatus>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default, alias = "avatar")]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, alias = "last_login")]
    pub last_login_at: Option<String>,
}

impl User {
    /// Joined first and last name, `None` when both are blank.
    pub fn full_name(&self) -> Option<String> {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() { None } else { Some(name) }
    }
}
