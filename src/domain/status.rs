//! Status vocabularies shared by backend records.
//!
//! Every enum here is open: values the dashboard does not know about are kept
//! in an `Other` variant and written back unchanged.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Account status of a user record as stored by the backend.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum AccountStatus {
    Active,
    Pending,
    Suspended,
    Blocked,
    Banned,
    Deleted,
    Other(String),
}

/// Approval (verification) sub-status of hosts and coordinators.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
    Other(String),
}

/// Status of a support ticket.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
    Other(String),
}

/// Reduced vocabulary shown in list badges.
#[derive(Clone, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(into = "String")]
pub enum DisplayStatus {
    Verified,
    Suspended,
    Pending,
    Other(String),
}

impl Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::Active => write!(f, "ACTIVE"),
            AccountStatus::Pending => write!(f, "PENDING"),
            AccountStatus::Suspended => write!(f, "SUSPENDED"),
            AccountStatus::Blocked => write!(f, "BLOCKED"),
            AccountStatus::Banned => write!(f, "BANNED"),
            AccountStatus::Deleted => write!(f, "DELETED"),
            AccountStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for AccountStatus {
    fn from(s: &str) -> Self {
        match s {
            "ACTIVE" => AccountStatus::Active,
            "PENDING" => AccountStatus::Pending,
            "SUSPENDED" => AccountStatus::Suspended,
            "BLOCKED" => AccountStatus::Blocked,
            "BANNED" => AccountStatus::Banned,
            "DELETED" => AccountStatus::Deleted,
            _ => AccountStatus::Other(s.to_string()),
        }
    }
}

impl From<String> for AccountStatus {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<AccountStatus> for String {
    fn from(value: AccountStatus) -> Self {
        value.to_string()
    }
}

impl Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApprovalStatus::Pending => write!(f, "PENDING"),
            ApprovalStatus::Approved => write!(f, "APPROVED"),
            ApprovalStatus::Rejected => write!(f, "REJECTED"),
            ApprovalStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for ApprovalStatus {
    fn from(s: &str) -> Self {
        match s {
            "PENDING" => ApprovalStatus::Pending,
            "APPROVED" => ApprovalStatus::Approved,
            "REJECTED" => ApprovalStatus::Rejected,
            _ => ApprovalStatus::Other(s.to_string()),
        }
    }
}

impl From<String> for ApprovalStatus {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<ApprovalStatus> for String {
    fn from(value: ApprovalStatus) -> Self {
        value.to_string()
    }
}

impl Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketStatus::Open => write!(f, "OPEN"),
            TicketStatus::InProgress => write!(f, "IN_PROGRESS"),
            TicketStatus::Resolved => write!(f, "RESOLVED"),
            TicketStatus::Closed => write!(f, "CLOSED"),
            TicketStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for TicketStatus {
    fn from(s: &str) -> Self {
        match s {
            "OPEN" => TicketStatus::Open,
            "IN_PROGRESS" => TicketStatus::InProgress,
            "RESOLVED" => TicketStatus::Resolved,
            "CLOSED" => TicketStatus::Closed,
            _ => TicketStatus::Other(s.to_string()),
        }
    }
}

impl From<String> for TicketStatus {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<TicketStatus> for String {
    fn from(value: TicketStatus) -> Self {
        value.to_string()
    }
}

impl From<&AccountStatus> for DisplayStatus {
    fn from(status: &AccountStatus) -> Self {
        match status {
            AccountStatus::Active => DisplayStatus::Verified,
            AccountStatus::Blocked
            | AccountStatus::Banned
            | AccountStatus::Deleted
            | AccountStatus::Suspended => DisplayStatus::Suspended,
            AccountStatus::Pending => DisplayStatus::Pending,
            AccountStatus::Other(s) => DisplayStatus::Other(s.clone()),
        }
    }
}

impl Display for DisplayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayStatus::Verified => write!(f, "verified"),
            DisplayStatus::Suspended => write!(f, "suspended"),
            DisplayStatus::Pending => write!(f, "pending"),
            DisplayStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<DisplayStatus> for String {
    fn from(value: DisplayStatus) -> Self {
        value.to_string()
    }
}

impl DisplayStatus {
    /// Backend statuses a list filter on this badge expands to.
    pub fn backend_statuses(filter: &str) -> Vec<AccountStatus> {
        match filter {
            "verified" => vec![AccountStatus::Active],
            "suspended" => vec![
                AccountStatus::Suspended,
                AccountStatus::Blocked,
                AccountStatus::Banned,
                AccountStatus::Deleted,
            ],
            "pending" => vec![AccountStatus::Pending],
            other => vec![AccountStatus::from(other)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_status_table() {
        let cases = [
            ("ACTIVE", "verified"),
            ("BLOCKED", "suspended"),
            ("BANNED", "suspended"),
            ("DELETED", "suspended"),
            ("PENDING", "pending"),
            ("ON_HOLD", "ON_HOLD"),
        ];
        for (wire, shown) in cases {
            let status = AccountStatus::from(wire);
            assert_eq!(DisplayStatus::from(&status).to_string(), shown);
        }
    }

    #[test]
    fn unknown_values_round_trip() {
        let status: ApprovalStatus = serde_json::from_str("\"ESCALATED\"").unwrap();
        assert_eq!(status, ApprovalStatus::Other("ESCALATED".into()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"ESCALATED\"");

        let ticket: TicketStatus = serde_json::from_str("\"IN_PROGRESS\"").unwrap();
        assert_eq!(ticket, TicketStatus::InProgress);
    }

    #[test]
    fn badge_filters_expand_to_backend_statuses() {
        assert_eq!(
            DisplayStatus::backend_statuses("verified"),
            vec![AccountStatus::Active]
        );
        assert_eq!(DisplayStatus::backend_statuses("suspended").len(), 4);
        assert_eq!(
            DisplayStatus::backend_statuses("BLOCKED"),
            vec![AccountStatus::Blocked]
        );
    }
}
