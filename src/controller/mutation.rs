//! Single-record state transitions.
//!
//! A command is validated before anything is sent, then dispatched while the
//! record is marked busy. At most one command per record can be in flight;
//! commands for different records proceed independently. Users and tickets
//! are separate collections, so user 5 and ticket 5 never block each other.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::api::errors::ApiError;
use crate::api::ApiResult;
use crate::domain::status::{AccountStatus, ApprovalStatus, TicketStatus};
use crate::domain::types::{RecordId, RejectionReason};

/// Requested transition, as submitted by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusChange {
    Account(AccountStatus),
    Approval {
        status: ApprovalStatus,
        reason: Option<String>,
    },
    Ticket(TicketStatus),
}

/// Transition whose inputs passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidChange {
    Account(AccountStatus),
    Approval(ApprovalStatus, Option<RejectionReason>),
    Ticket(TicketStatus),
}

/// Backend collection a record lives in; ids are only unique within one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    User,
    Ticket,
}

impl ValidChange {
    pub fn record_kind(&self) -> RecordKind {
        match self {
            ValidChange::Account(_) | ValidChange::Approval(..) => RecordKind::User,
            ValidChange::Ticket(_) => RecordKind::Ticket,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutationCommand {
    pub record_id: Option<String>,
    pub change: StatusChange,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedCommand {
    pub record_id: RecordId,
    pub change: ValidChange,
}

#[derive(Debug, Error)]
pub enum MutationError {
    /// Rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    #[error("an update for record {0} is already in progress")]
    Busy(RecordId),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl MutationError {
    pub fn user_message(&self) -> String {
        match self {
            MutationError::Validation(message) => message.clone(),
            MutationError::Busy(_) => self.to_string(),
            MutationError::Api(err) => err.user_message(),
        }
    }
}

impl MutationCommand {
    pub fn new(record_id: impl Into<String>, change: StatusChange) -> Self {
        Self {
            record_id: Some(record_id.into()),
            change,
        }
    }

    /// Checks the command without touching the network.
    pub fn validate(&self) -> Result<ValidatedCommand, MutationError> {
        let record_id = self
            .record_id
            .as_deref()
            .ok_or_else(|| MutationError::Validation("Record id is required.".to_string()))
            .and_then(|raw| {
                RecordId::parse(raw).map_err(|_| {
                    MutationError::Validation("Record id is required.".to_string())
                })
            })?;

        let change = match &self.change {
            StatusChange::Account(status) => ValidChange::Account(status.clone()),
            StatusChange::Ticket(status) => ValidChange::Ticket(status.clone()),
            StatusChange::Approval { status, reason } => {
                let reason = reason.as_deref().and_then(|r| RejectionReason::new(r).ok());
                match status {
                    ApprovalStatus::Rejected if reason.is_none() => {
                        return Err(MutationError::Validation(
                            "A reason is required to reject.".to_string(),
                        ));
                    }
                    ApprovalStatus::Approved => ValidChange::Approval(status.clone(), None),
                    _ => ValidChange::Approval(status.clone(), reason),
                }
            }
        };

        Ok(ValidatedCommand { record_id, change })
    }
}

/// Tracks which records have a command in flight.
#[derive(Debug, Default)]
pub struct MutationDispatcher {
    in_flight: Mutex<HashSet<(RecordKind, RecordId)>>,
}

/// Clears the busy flag of one record when dropped, on every exit path.
#[derive(Debug)]
pub struct BusyGuard<'a> {
    dispatcher: &'a MutationDispatcher,
    key: (RecordKind, RecordId),
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.dispatcher.lock().remove(&self.key);
    }
}

impl MutationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<(RecordKind, RecordId)>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_busy(&self, kind: RecordKind, record_id: &RecordId) -> bool {
        self.lock().contains(&(kind, record_id.clone()))
    }

    /// Ids of `kind` records with a pending command, for disabling controls.
    pub fn busy_ids(&self, kind: RecordKind) -> Vec<String> {
        let mut ids: Vec<String> = self
            .lock()
            .iter()
            .filter(|(busy_kind, _)| *busy_kind == kind)
            .map(|(_, id)| id.to_string())
            .collect();
        ids.sort();
        ids
    }

    fn acquire(
        &self,
        kind: RecordKind,
        record_id: &RecordId,
    ) -> Result<BusyGuard<'_>, MutationError> {
        let key = (kind, record_id.clone());
        if !self.lock().insert(key.clone()) {
            return Err(MutationError::Busy(record_id.clone()));
        }
        Ok(BusyGuard {
            dispatcher: self,
            key,
        })
    }

    /// Validates `command`, then sends it once through `send`.
    ///
    /// Validation failures never reach `send`. The command is not retried.
    pub async fn dispatch<T, S, Fut>(
        &self,
        command: &MutationCommand,
        send: S,
    ) -> Result<T, MutationError>
    where
        S: FnOnce(ValidatedCommand) -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let validated = command.validate().inspect_err(|err| {
            log::warn!("Refusing invalid command: {err}");
        })?;
        let record_id = validated.record_id.clone();
        let _busy = self.acquire(validated.change.record_kind(), &record_id)?;

        send(validated).await.map_err(|err| {
            log::error!("Failed to update record {record_id}: {err}");
            MutationError::from(err)
        })
    }
}
