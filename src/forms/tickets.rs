use serde::Deserialize;
use validator::Validate;

use crate::controller::mutation::{MutationCommand, StatusChange};
use crate::domain::status::TicketStatus;
use crate::forms::FormError;

#[derive(Deserialize, Validate)]
/// New status for a support ticket.
pub struct TicketStatusForm {
    #[validate(length(min = 1))]
    pub status: String,
    #[serde(default)]
    pub next: Option<String>,
}

impl TicketStatusForm {
    pub fn to_command(&self, record_id: &str) -> Result<MutationCommand, FormError> {
        self.validate()?;
        match TicketStatus::from(self.status.trim()) {
            TicketStatus::Other(_) => Err(FormError::InvalidStatus),
            status => Ok(MutationCommand::new(record_id, StatusChange::Ticket(status))),
        }
    }
}
