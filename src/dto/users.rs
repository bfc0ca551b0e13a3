use serde::Serialize;

use crate::controller::mapper::UserDisplay;
use crate::domain::booking::Booking;
use crate::domain::user::UserKind;
use crate::dto::ListFilters;
use crate::pagination::Paginated;

/// Screen-level facts templates need about a user kind.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ScreenInfo {
    pub slug: &'static str,
    pub title: &'static str,
    pub has_approval: bool,
}

impl From<UserKind> for ScreenInfo {
    fn from(kind: UserKind) -> Self {
        Self {
            slug: kind.slug(),
            title: kind.title(),
            has_approval: kind.has_approval(),
        }
    }
}

/// Data required to render a user list screen.
#[derive(Debug, Serialize)]
pub struct UserListPage {
    pub screen: ScreenInfo,
    pub users: Paginated<UserDisplay>,
    /// Set when the fetch failed; `users` is then empty.
    pub error: Option<String>,
    pub filters: ListFilters,
    /// Rows with a status change in flight.
    pub busy_ids: Vec<String>,
}

/// Data required to render a user detail screen.
#[derive(Debug, Serialize)]
pub struct UserDetailPage {
    pub screen: ScreenInfo,
    pub user: UserDisplay,
    pub busy: bool,
    /// Only filled for hosts.
    pub bookings: Vec<Booking>,
}
