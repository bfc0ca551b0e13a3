//! Projection of backend records into display records.
//!
//! Mapping is pure and total: every missing or malformed field gets a
//! default, so a half-filled record from the backend still renders.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

use crate::domain::issue::Issue;
use crate::domain::status::DisplayStatus;
use crate::domain::types::format_phone_international;
use crate::domain::user::{Address, User};

/// Shown wherever a value is missing.
pub const NOT_AVAILABLE: &str = "N/A";

const AVATAR_SERVICE: &str = "https://ui-avatars.com/api/";

/// Records that have a flat display projection.
pub trait DisplayMapper {
    type Display;

    fn to_display(&self) -> Self::Display;
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct UserDisplay {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub avatar_url: String,
    pub status: DisplayStatus,
    pub account_status: String,
    pub approval_status: String,
    pub rejection_reason: Option<String>,
    pub joined_on: String,
    pub last_active: String,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct TicketDisplay {
    pub id: String,
    pub number: String,
    pub subject: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub category: String,
    pub reporter_name: String,
    pub reporter_email: String,
    pub opened_on: String,
    pub updated_on: String,
}

fn or_na(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

/// Normalizes a backend timestamp to `YYYY-MM-DD`, or [`NOT_AVAILABLE`].
pub fn format_date(value: Option<&str>) -> String {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return NOT_AVAILABLE.to_string();
    };

    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    match date {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => NOT_AVAILABLE.to_string(),
    }
}

/// Joins the present parts of an address, most specific first.
pub fn format_location(address: Option<&Address>) -> String {
    let Some(address) = address else {
        return NOT_AVAILABLE.to_string();
    };
    let parts = [
        address.city.as_deref(),
        address.state.as_deref(),
        address.country.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>();

    if parts.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        parts.join(", ")
    }
}

/// Deterministic avatar URL for records without a picture.
pub fn placeholder_avatar(seed: &str) -> String {
    format!(
        "{AVATAR_SERVICE}?name={}&background=0D8ABC&color=fff",
        utf8_percent_encode(seed, NON_ALPHANUMERIC)
    )
}

fn format_phone(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => format_phone_international(raw).unwrap_or_else(|_| raw.to_string()),
        None => NOT_AVAILABLE.to_string(),
    }
}

impl DisplayMapper for User {
    type Display = UserDisplay;

    fn to_display(&self) -> UserDisplay {
        let id = self.id.to_string();
        let name = self.full_name();
        let avatar_url = self
            .profile_image
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| placeholder_avatar(name.as_deref().unwrap_or(&id)));
        let (status, account_status) = match &self.status {
            Some(status) => (DisplayStatus::from(status), status.to_string()),
            None => (DisplayStatus::Pending, NOT_AVAILABLE.to_string()),
        };

        UserDisplay {
            name: name.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            email: or_na(self.email.as_deref()),
            phone: format_phone(self.phone.as_deref()),
            location: format_location(self.address.as_ref()),
            avatar_url,
            status,
            account_status,
            approval_status: self
                .approval_status
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            rejection_reason: self
                .rejection_reason
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
            joined_on: format_date(self.created_at.as_deref()),
            last_active: format_date(self.last_login_at.as_deref()),
            id,
        }
    }
}

impl DisplayMapper for Issue {
    type Display = TicketDisplay;

    fn to_display(&self) -> TicketDisplay {
        let id = self.id.to_string();
        let reporter = self.reporter.as_ref();
        let reporter_name = reporter
            .map(|r| {
                [r.first_name.as_deref(), r.last_name.as_deref()]
                    .into_iter()
                    .flatten()
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        TicketDisplay {
            number: self
                .ticket_number
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{id}")),
            subject: or_na(self.subject.as_deref()),
            description: or_na(self.description.as_deref()),
            status: self
                .status
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            priority: or_na(self.priority.as_deref()),
            category: or_na(self.category.as_deref()),
            reporter_name,
            reporter_email: or_na(reporter.and_then(|r| r.email.as_deref())),
            opened_on: format_date(self.created_at.as_deref()),
            updated_on: format_date(self.updated_at.as_deref()),
            id,
        }
    }
}
