use serde::{Deserialize, Serialize};

use crate::domain::status::TicketStatus;
use crate::domain::types::RecordId;

/// Person who opened a support ticket.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Reporter {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Support ticket as returned by `/api/v1/issues`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub id: RecordId,
    #[serde(default)]
    pub ticket_number: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, alias = "user")]
    pub reporter: Option<Reporter>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Rows per page on the tickets screen.
pub const TICKETS_PAGE_SIZE: usize = 20;
