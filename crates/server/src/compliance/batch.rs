//! The daily compliance pass.
//!
//! Order of work:
//! 1. reschedule completed recurring maintenance tasks and reviews
//! 2. reclassify every tracked document and record status changes
//! 3. reconcile each document's notifications with its threshold bucket
//! 4. email every pending notification that has a recipient
//!
//! A failure on one document is logged and counted; the pass continues with the next one.
//! Notifications whose email fails stay pending and are retried on the next pass.

use serde::Serialize;
use time::{Date, OffsetDateTime};
use utoipa::ToSchema;

use crate::compliance::classifier::recompute_status;
use crate::compliance::document::{Actor, TrackedDocument};
use crate::compliance::maintenance::rollover_date;
use crate::compliance::notifications::{Reconciliation, plan_notification, reconcile};
use crate::compliance::reviews::{ism_rollover_date, procedure_rollover_date};
use crate::config::AppConfig;
use crate::delivery::{Delivery, EmailBody};
use crate::entity::{ComplianceStatus, DocumentKind, notification};
use crate::error::{ComplianceError, DeliveryError};
use crate::repository::ComplianceStore;
use crate::templates::NotificationEmailTemplate;

/// Counters describing one batch pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BatchReport {
    pub as_of: Date,
    pub documents_scanned: usize,
    /// Documents with missing or inconsistent data.
    pub documents_skipped: usize,
    /// Documents whose processing failed on a database error.
    pub documents_failed: usize,
    /// Document kinds that could not be loaded at all.
    pub kinds_failed: usize,
    pub statuses_updated: usize,
    pub records_rescheduled: usize,
    pub notifications_created: usize,
    pub notifications_superseded: usize,
    /// Handled notifications closed because their document moved to a new cycle.
    pub notifications_resolved: usize,
    pub emails_sent: usize,
    pub emails_failed: usize,
}

impl BatchReport {
    pub fn new(as_of: Date) -> Self {
        Self {
            as_of,
            documents_scanned: 0,
            documents_skipped: 0,
            documents_failed: 0,
            kinds_failed: 0,
            statuses_updated: 0,
            records_rescheduled: 0,
            notifications_created: 0,
            notifications_superseded: 0,
            notifications_resolved: 0,
            emails_sent: 0,
            emails_failed: 0,
        }
    }
}

#[derive(Debug, Default)]
struct DocumentOutcome {
    status_updated: bool,
    created: bool,
    superseded: usize,
    resolved: usize,
}

/// A completed recurring record and the due date of its next cycle.
struct Rollover {
    kind: DocumentKind,
    id: i32,
    previous: ComplianceStatus,
    next_due_date: Date,
}

/// Run one full pass as of `as_of`.
#[tracing::instrument(skip_all, fields(as_of = %as_of, actor = %actor))]
pub async fn run_compliance_batch<D: Delivery>(
    store: &ComplianceStore,
    delivery: &D,
    config: &AppConfig,
    actor: &Actor,
    as_of: Date,
) -> BatchReport {
    let mut report = BatchReport::new(as_of);

    roll_over_recurring(store, actor, &mut report).await;
    for kind in DocumentKind::ALL {
        process_kind(store, config, actor, kind, as_of, &mut report).await;
    }
    deliver_pending(store, delivery, &config.frontend_url, &mut report).await;

    tracing::info!(
        name = "compliance.batch.completed",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        as_of = %as_of,
        scanned = report.documents_scanned,
        skipped = report.documents_skipped,
        failed = report.documents_failed,
        statuses_updated = report.statuses_updated,
        records_rescheduled = report.records_rescheduled,
        created = report.notifications_created,
        superseded = report.notifications_superseded,
        resolved = report.notifications_resolved,
        emails_sent = report.emails_sent,
        emails_failed = report.emails_failed,
        message = "Compliance batch finished"
    );
    report
}

async fn rollover_candidates(store: &ComplianceStore) -> Result<Vec<Rollover>, ComplianceError> {
    let mut due = Vec::new();
    for task in store.completed_recurring_tasks().await? {
        if let Some(next_due_date) = rollover_date(&task) {
            due.push(Rollover {
                kind: DocumentKind::MaintenanceTask,
                id: task.id,
                previous: task.status,
                next_due_date,
            });
        }
    }
    for item in store.completed_ism_reviews().await? {
        if let Some(next_due_date) = ism_rollover_date(&item) {
            due.push(Rollover {
                kind: DocumentKind::IsmComplianceItem,
                id: item.id,
                previous: item.status,
                next_due_date,
            });
        }
    }
    for procedure in store.completed_procedure_reviews().await? {
        if let Some(next_due_date) = procedure_rollover_date(&procedure) {
            due.push(Rollover {
                kind: DocumentKind::ProcedureReview,
                id: procedure.id,
                previous: procedure.status,
                next_due_date,
            });
        }
    }
    Ok(due)
}

async fn roll_over_recurring(store: &ComplianceStore, actor: &Actor, report: &mut BatchReport) {
    let due = match rollover_candidates(store).await {
        Ok(due) => due,
        Err(e) => {
            tracing::error!(
                name = "compliance.batch.rollover_load_failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                error = %e,
                message = "Failed to load completed recurring records"
            );
            return;
        }
    };

    for rollover in due {
        let result = store
            .reschedule(
                rollover.kind,
                rollover.id,
                rollover.previous,
                rollover.next_due_date,
                actor,
            )
            .await;
        match result {
            Ok(closed) => {
                report.records_rescheduled += 1;
                report.notifications_resolved += closed.notifications_resolved as usize;
                report.notifications_superseded += closed.notifications_superseded as usize;
                tracing::info!(
                    name = "compliance.batch.rescheduled",
                    target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                    kind = %rollover.kind,
                    id = rollover.id,
                    next_due_date = %rollover.next_due_date,
                    message = "Recurring record rescheduled"
                );
            }
            Err(e) => tracing::error!(
                name = "compliance.batch.reschedule_failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                kind = %rollover.kind,
                id = rollover.id,
                error = %e,
                message = "Failed to reschedule recurring record"
            ),
        }
    }
}

async fn process_kind(
    store: &ComplianceStore,
    config: &AppConfig,
    actor: &Actor,
    kind: DocumentKind,
    as_of: Date,
    report: &mut BatchReport,
) {
    let loaded = async {
        let documents = store.tracked_documents(kind).await?;
        let live = store.live_notifications(kind).await?;
        Ok::<_, ComplianceError>((documents, live))
    }
    .await;
    let (documents, mut live) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            report.kinds_failed += 1;
            tracing::error!(
                name = "compliance.batch.kind_load_failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                kind = %kind,
                error = %e,
                message = "Failed to load documents"
            );
            return;
        }
    };

    let thresholds = config.compliance.thresholds.for_kind(kind);
    for document in documents {
        report.documents_scanned += 1;
        let existing = live.remove(&document.id).unwrap_or_default();
        let result = process_document(
            store,
            &document,
            &existing,
            thresholds,
            actor,
            as_of,
            config.compliance.expiring_soon_days,
        )
        .await;
        match result {
            Ok(outcome) => {
                report.statuses_updated += usize::from(outcome.status_updated);
                report.notifications_created += usize::from(outcome.created);
                report.notifications_superseded += outcome.superseded;
                report.notifications_resolved += outcome.resolved;
            }
            Err(e) if e.is_data_error() => {
                report.documents_skipped += 1;
                tracing::warn!(
                    name = "compliance.batch.document_skipped",
                    target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                    kind = %kind,
                    id = document.id,
                    error = %e,
                    message = "Skipping document with incomplete data"
                );
            }
            Err(e) => {
                report.documents_failed += 1;
                tracing::error!(
                    name = "compliance.batch.document_failed",
                    target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                    kind = %kind,
                    id = document.id,
                    error = %e,
                    message = "Failed to process document"
                );
            }
        }
    }
}

async fn process_document(
    store: &ComplianceStore,
    document: &TrackedDocument,
    existing: &[notification::Model],
    thresholds: &[i32],
    actor: &Actor,
    as_of: Date,
    expiring_soon_days: i64,
) -> Result<DocumentOutcome, ComplianceError> {
    let mut outcome = DocumentOutcome::default();
    let mut current = document.clone();

    if let Some(next) = recompute_status(document, as_of, expiring_soon_days)? {
        store.set_status(document, next, actor).await?;
        tracing::debug!(
            name = "compliance.batch.status_changed",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            kind = %document.kind,
            id = document.id,
            previous = %document.status,
            status = %next,
            message = "Document status recomputed"
        );
        current.status = next;
        outcome.status_updated = true;
    }

    let plan = plan_notification(&current, thresholds, as_of)?;
    let Reconciliation {
        supersede,
        resolve,
        create,
    } = reconcile(existing, plan);
    for id in supersede {
        if store.supersede_notification(id).await? {
            outcome.superseded += 1;
        }
    }
    for id in resolve {
        if store.resolve_stale_notification(id).await? {
            outcome.resolved += 1;
        }
    }
    if let Some(planned) = create {
        outcome.created = store.insert_notification(&planned).await?.is_some();
    }
    Ok(outcome)
}

async fn deliver_pending<D: Delivery>(
    store: &ComplianceStore,
    delivery: &D,
    frontend_url: &str,
    report: &mut BatchReport,
) {
    let pending = match store.pending_deliveries().await {
        Ok(pending) => pending,
        Err(e) => {
            tracing::error!(
                name = "compliance.batch.pending_load_failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                error = %e,
                message = "Failed to load pending notifications"
            );
            return;
        }
    };

    for row in pending {
        let Some(recipient) = row.recipient.as_deref() else {
            continue;
        };
        let template = NotificationEmailTemplate {
            subject: &row.subject,
            message: &row.message,
            kind: row.document_kind,
            document_id: row.document_id,
            frontend_url,
        };
        let sent = match template.render_html() {
            Ok(html) => {
                let body = EmailBody {
                    text: template.render_text(),
                    html,
                };
                delivery.send(recipient, &row.subject, &body).await
            }
            Err(e) => Err(DeliveryError::Render(e.to_string())),
        };

        if let Err(e) = sent {
            report.emails_failed += 1;
            tracing::error!(
                name = "compliance.batch.email_send_failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                notification_id = row.id,
                error = %e,
                message = "Failed to send notification email"
            );
            continue;
        }

        match store
            .mark_sent(&row, recipient, OffsetDateTime::now_utc())
            .await
        {
            Ok(true) => {
                report.emails_sent += 1;
                tracing::info!(
                    name = "compliance.batch.email_sent",
                    target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                    notification_id = row.id,
                    kind = %row.document_kind,
                    document_id = row.document_id,
                    threshold_days = row.threshold_days,
                    message = "Sent notification email"
                );
            }
            Ok(false) => tracing::warn!(
                name = "compliance.batch.notification_changed_in_flight",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                notification_id = row.id,
                message = "Email sent but notification was no longer pending"
            ),
            Err(e) => tracing::error!(
                name = "compliance.batch.mark_sent_failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                notification_id = row.id,
                error = %e,
                message = "Email sent but notification could not be marked sent"
            ),
        }
    }
}
