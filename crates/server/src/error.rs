use sea_orm::DbErr;
use thiserror::Error;

use crate::entity::{ComplianceStatus, DocumentKind, NotificationStatus};

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Invalid email address {address:?}: {reason}")]
    Address { address: String, reason: String },
    #[error("Failed to render email: {0}")]
    Render(String),
    #[error("Failed to build email message: {0}")]
    Message(String),
    #[error("SMTP transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum ComplianceError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    #[error("{kind} {id} has no due date")]
    MissingDueDate { kind: DocumentKind, id: i32 },
    #[error("{kind} {id} not found")]
    DocumentNotFound { kind: DocumentKind, id: i32 },
    #[error("Notification {0} not found")]
    NotificationNotFound(i32),
    #[error("Status {0} is not a manual override")]
    NotAnOverride(ComplianceStatus),
    #[error("Notification {id} is {status:?} and cannot be {action}")]
    InvalidNotificationTransition {
        id: i32,
        status: NotificationStatus,
        action: &'static str,
    },
}

impl ComplianceError {
    /// Problems with the record itself rather than the infrastructure around it.
    /// The batch skips such records and moves on.
    pub fn is_data_error(&self) -> bool {
        matches!(self, ComplianceError::MissingDueDate { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ComplianceError::DocumentNotFound { .. } | ComplianceError::NotificationNotFound(_)
        )
    }
}
