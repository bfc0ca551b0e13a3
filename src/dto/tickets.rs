use serde::Serialize;

use crate::controller::mapper::TicketDisplay;
use crate::dto::ListFilters;
use crate::pagination::Paginated;

#[derive(Debug, Serialize)]
pub struct TicketListPage {
    pub tickets: Paginated<TicketDisplay>,
    pub error: Option<String>,
    pub filters: ListFilters,
    pub busy_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TicketDetailPage {
    pub ticket: TicketDisplay,
    pub busy: bool,
    /// Wire values offered in the status selector.
    pub statuses: Vec<&'static str>,
}
