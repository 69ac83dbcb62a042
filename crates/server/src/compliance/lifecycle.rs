//! Write paths triggered by people: renewals, status overrides and notification handling.

use time::{Date, OffsetDateTime};

use crate::compliance::classifier::{recompute_status, status_for_dates};
use crate::compliance::document::{Actor, TrackedDocument};
use crate::entity::{ComplianceStatus, DocumentKind, NotificationStatus, notification};
use crate::error::ComplianceError;
use crate::repository::ComplianceStore;

/// Record a new due date, reclassify, and close the reminders raised for the old date.
#[tracing::instrument(skip(store))]
pub async fn renew_document(
    store: &ComplianceStore,
    kind: DocumentKind,
    id: i32,
    due_date: Date,
    actor: &Actor,
    as_of: Date,
    expiring_soon_days: i64,
) -> Result<TrackedDocument, ComplianceError> {
    let document = store.find_document(kind, id).await?;
    let mut renewed = TrackedDocument {
        due_date: Some(due_date),
        ..document.clone()
    };
    let next_status = recompute_status(&renewed, as_of, expiring_soon_days)?;
    let outcome = store
        .apply_renewal(&document, due_date, next_status, actor)
        .await?;
    if let Some(next) = next_status {
        renewed.status = next;
    }

    tracing::info!(
        name = "compliance.renew.applied",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        kind = %kind,
        id = id,
        due_date = %due_date,
        status = %renewed.status,
        superseded = outcome.notifications_superseded,
        resolved = outcome.notifications_resolved,
        actor = %actor,
        message = "Document renewed"
    );
    Ok(renewed)
}

/// Set a manual override (`Some`) or lift it back to the date-derived status (`None`).
#[tracing::instrument(skip(store))]
pub async fn override_status(
    store: &ComplianceStore,
    kind: DocumentKind,
    id: i32,
    status: Option<ComplianceStatus>,
    actor: &Actor,
    as_of: Date,
    expiring_soon_days: i64,
) -> Result<TrackedDocument, ComplianceError> {
    let document = store.find_document(kind, id).await?;
    let target = match status {
        Some(s) if s.is_terminal() => s,
        Some(s) => return Err(ComplianceError::NotAnOverride(s)),
        None => {
            let due_date = document
                .due_date
                .ok_or(ComplianceError::MissingDueDate { kind, id })?;
            status_for_dates(kind, as_of, due_date, expiring_soon_days)
        }
    };

    if target != document.status {
        if target == ComplianceStatus::Completed && kind.is_recurring() {
            store.complete_cycle(&document, as_of, actor).await?;
        } else {
            store.set_status(&document, target, actor).await?;
        }
        tracing::info!(
            name = "compliance.status.overridden",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            kind = %kind,
            id = id,
            previous = %document.status,
            status = %target,
            actor = %actor,
            message = "Document status changed manually"
        );
    }
    Ok(TrackedDocument {
        status: target,
        ..document
    })
}

/// Pending or sent notifications become acknowledged. Acknowledging twice is a no-op.
#[tracing::instrument(skip(store))]
pub async fn acknowledge_notification(
    store: &ComplianceStore,
    id: i32,
    actor: &Actor,
) -> Result<notification::Model, ComplianceError> {
    let row = store.find_notification(id).await?;
    match row.status {
        NotificationStatus::Acknowledged => Ok(row),
        NotificationStatus::Pending | NotificationStatus::Sent => {
            store
                .mark_acknowledged(row, actor, OffsetDateTime::now_utc())
                .await
        }
        status => Err(ComplianceError::InvalidNotificationTransition {
            id,
            status,
            action: "acknowledged",
        }),
    }
}

/// Resolve a live notification, freeing its threshold slot.
#[tracing::instrument(skip(store))]
pub async fn resolve_notification(
    store: &ComplianceStore,
    id: i32,
    actor: &Actor,
) -> Result<notification::Model, ComplianceError> {
    let row = store.find_notification(id).await?;
    match row.status {
        NotificationStatus::Resolved => Ok(row),
        NotificationStatus::Superseded => Err(ComplianceError::InvalidNotificationTransition {
            id,
            status: row.status,
            action: "resolved",
        }),
        _ => {
            let resolved = store.mark_resolved(row).await?;
            tracing::info!(
                name = "compliance.notification.resolved",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                notification_id = id,
                actor = %actor,
                message = "Notification resolved"
            );
            Ok(resolved)
        }
    }
}
