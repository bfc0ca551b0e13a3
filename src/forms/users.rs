use serde::Deserialize;
use validator::Validate;

use crate::controller::mutation::{MutationCommand, StatusChange};
use crate::domain::status::{AccountStatus, ApprovalStatus};
use crate::forms::FormError;

#[derive(Deserialize, Validate)]
/// Account action submitted from a user row or detail page.
pub struct UserStatusForm {
    /// One of `activate`, `suspend`, `block` or `delete`.
    #[validate(length(min = 1))]
    pub action: String,
    /// Page to return to afterwards.
    #[serde(default)]
    pub next: Option<String>,
}

impl UserStatusForm {
    pub fn status(&self) -> Result<AccountStatus, FormError> {
        match self.action.trim() {
            "activate" => Ok(AccountStatus::Active),
            "suspend" => Ok(AccountStatus::Suspended),
            "block" => Ok(AccountStatus::Blocked),
            "delete" => Ok(AccountStatus::Deleted),
            _ => Err(FormError::InvalidStatus),
        }
    }

    pub fn to_command(&self, record_id: &str) -> Result<MutationCommand, FormError> {
        self.validate()?;
        let status = self.status()?;
        Ok(MutationCommand::new(record_id, StatusChange::Account(status)))
    }
}

#[derive(Deserialize, Validate)]
/// Approve or reject a host or coordinator application.
pub struct ApprovalForm {
    /// `approve` or `reject`.
    pub decision: String,
    /// Required when rejecting; checked together with the rest of the
    /// command before anything is sent.
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

impl ApprovalForm {
    pub fn to_command(&self, record_id: &str) -> Result<MutationCommand, FormError> {
        self.validate()?;
        let status = match self.decision.trim() {
            "approve" => ApprovalStatus::Approved,
            "reject" => ApprovalStatus::Rejected,
            _ => return Err(FormError::InvalidDecision),
        };
        Ok(MutationCommand::new(
            record_id,
            StatusChange::Approval {
                status,
                reason: self.reason.clone(),
            },
        ))
    }
}
