//! Threshold bucketing and notification deduplication.
//!
//! Planning is pure: given a document and the notifications already stored for it, decide
//! which pending rows become stale and whether a new one is needed. The batch applies the
//! resulting [`Reconciliation`] through the repository.

use time::Date;

use crate::compliance::document::TrackedDocument;
use crate::entity::{DocumentKind, NotificationStatus, notification};
use crate::error::ComplianceError;
use crate::templates::NotificationTemplate;

/// Bucket used once the due date has been reached or passed.
pub const LAPSED_THRESHOLD: i32 = 0;

/// The threshold a document falls into, if any.
///
/// A lapsed document (`days_remaining <= 0`) is always in the lapsed bucket. Otherwise the
/// bucket is the smallest configured threshold that is not below `days_remaining`, so the
/// bucket only ever moves downward as the due date approaches.
pub fn notification_bucket(days_remaining: i64, thresholds: &[i32]) -> Option<i32> {
    if days_remaining <= 0 {
        return Some(LAPSED_THRESHOLD);
    }
    thresholds
        .iter()
        .copied()
        .filter(|t| i64::from(*t) >= days_remaining)
        .min()
}

/// A notification the generator wants to exist for a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedNotification {
    pub kind: DocumentKind,
    pub document_id: i32,
    pub threshold_days: i32,
    pub days_remaining: i64,
    pub due_date: Date,
    pub subject: String,
    pub message: String,
    pub recipient: Option<String>,
}

impl PlannedNotification {
    pub fn dedup_key(&self) -> String {
        notification::dedup_key(self.kind, self.document_id, self.threshold_days)
    }
}

/// Plan the notification for `document` as of `as_of`.
///
/// Terminal documents never get one. A document outside every threshold gets none either,
/// which makes any pending notification for it stale.
pub fn plan_notification(
    document: &TrackedDocument,
    thresholds: &[i32],
    as_of: Date,
) -> Result<Option<PlannedNotification>, ComplianceError> {
    if document.status.is_terminal() {
        return Ok(None);
    }
    let due_date = document
        .due_date
        .ok_or(ComplianceError::MissingDueDate {
            kind: document.kind,
            id: document.id,
        })?;
    let days_remaining = (due_date - as_of).whole_days();
    let Some(threshold_days) = notification_bucket(days_remaining, thresholds) else {
        return Ok(None);
    };

    let text = NotificationTemplate {
        kind: document.kind,
        title: &document.title,
        owner_name: &document.owner_name,
        due_date,
        days_remaining,
    }
    .render();

    Ok(Some(PlannedNotification {
        kind: document.kind,
        document_id: document.id,
        threshold_days,
        days_remaining,
        due_date,
        subject: text.subject,
        message: text.message,
        recipient: document.recipient.clone(),
    }))
}

/// What to change for one document so its notifications match the plan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reconciliation {
    /// Pending notifications whose threshold or due date no longer applies.
    pub supersede: Vec<i32>,
    /// Sent or acknowledged notifications raised for an earlier due date.
    pub resolve: Vec<i32>,
    pub create: Option<PlannedNotification>,
}

/// Reconcile the stored notifications of one document with the plan.
///
/// Pending rows that do not match the plan are superseded. Sent and acknowledged rows for
/// the current due date keep their threshold slot, so an already handled threshold is never
/// raised twice. Once the document has a new due date those rows belong to the previous
/// cycle and are resolved. Resolved and superseded rows are history and are ignored.
pub fn reconcile(
    existing: &[notification::Model],
    planned: Option<PlannedNotification>,
) -> Reconciliation {
    let matches_plan = |n: &notification::Model| {
        planned
            .as_ref()
            .is_some_and(|p| p.threshold_days == n.threshold_days && p.due_date == n.due_date)
    };
    let from_previous_cycle = |n: &notification::Model| {
        planned.as_ref().is_some_and(|p| p.due_date != n.due_date)
    };

    let supersede: Vec<i32> = existing
        .iter()
        .filter(|n| n.status == NotificationStatus::Pending && !matches_plan(n))
        .map(|n| n.id)
        .collect();

    let resolve: Vec<i32> = existing
        .iter()
        .filter(|n| {
            matches!(
                n.status,
                NotificationStatus::Sent | NotificationStatus::Acknowledged
            ) && from_previous_cycle(n)
        })
        .map(|n| n.id)
        .collect();

    let create = planned.filter(|p| {
        !existing.iter().any(|n| {
            n.status.is_live()
                && !supersede.contains(&n.id)
                && !resolve.contains(&n.id)
                && n.threshold_days == p.threshold_days
        })
    });

    Reconciliation {
        supersede,
        resolve,
        create,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ComplianceStatus;
    use time::macros::{date, datetime};
    use time::Duration;

    const TODAY: Date = date!(2026 - 10 - 17);
    const CERT_THRESHOLDS: [i32; 3] = [30, 60, 90];

    fn cert(due_in: i64, status: ComplianceStatus) -> TrackedDocument {
        TrackedDocument {
            kind: DocumentKind::CrewCertificate,
            id: 11,
            title: "GMDSS Operator".into(),
            owner_name: "Ana Costa".into(),
            recipient: Some("ana@example.com".into()),
            issued_on: None,
            due_date: Some(TODAY + Duration::days(due_in)),
            status,
        }
    }

    fn stored(id: i32, threshold_days: i32, status: NotificationStatus, due_date: Date) -> notification::Model {
        notification::Model {
            id,
            document_kind: DocumentKind::CrewCertificate,
            document_id: 11,
            threshold_days,
            subject: String::new(),
            message: String::new(),
            recipient: None,
            status,
            dedup_key: status
                .is_live()
                .then(|| notification::dedup_key(DocumentKind::CrewCertificate, 11, threshold_days)),
            due_date,
            created_at: datetime!(2026-10-01 00:00 UTC),
            sent_at: None,
            acknowledged_at: None,
            acknowledged_by: None,
        }
    }

    #[test]
    fn bucket_picks_smallest_threshold_covering_remaining_days() {
        assert_eq!(notification_bucket(95, &CERT_THRESHOLDS), None);
        assert_eq!(notification_bucket(90, &CERT_THRESHOLDS), Some(90));
        assert_eq!(notification_bucket(61, &CERT_THRESHOLDS), Some(90));
        assert_eq!(notification_bucket(45, &CERT_THRESHOLDS), Some(60));
        assert_eq!(notification_bucket(30, &CERT_THRESHOLDS), Some(30));
        assert_eq!(notification_bucket(1, &CERT_THRESHOLDS), Some(30));
        assert_eq!(notification_bucket(0, &CERT_THRESHOLDS), Some(0));
        assert_eq!(notification_bucket(-5, &CERT_THRESHOLDS), Some(0));
    }

    #[test]
    fn bucket_never_moves_up_as_due_date_approaches() {
        let unordered = [60, 7, 30, 90, 14];
        let mut previous: Option<i32> = None;
        for days_remaining in (-3..=120).rev() {
            let bucket = notification_bucket(days_remaining, &unordered);
            if let (Some(prev), Some(now)) = (previous, bucket) {
                assert!(now <= prev, "bucket rose from {prev} to {now} at {days_remaining}");
            }
            if bucket.is_some() {
                previous = bucket;
            }
        }
    }

    #[test]
    fn terminal_documents_get_no_plan() {
        for status in ComplianceStatus::TERMINAL {
            let plan = plan_notification(&cert(-10, status), &CERT_THRESHOLDS, TODAY).unwrap();
            assert!(plan.is_none());
        }
    }

    #[test]
    fn expired_certificate_is_planned_at_lapsed_threshold() {
        let plan = plan_notification(&cert(-5, ComplianceStatus::Expired), &CERT_THRESHOLDS, TODAY)
            .unwrap()
            .unwrap();
        assert_eq!(plan.threshold_days, 0);
        assert_eq!(plan.days_remaining, -5);
        assert!(plan.message.contains("expired 5 days ago"));
        assert_eq!(plan.dedup_key(), "crew_certificate:11:0");
    }

    #[test]
    fn missing_due_date_is_reported() {
        let mut doc = cert(10, ComplianceStatus::Active);
        doc.due_date = None;
        assert!(matches!(
            plan_notification(&doc, &CERT_THRESHOLDS, TODAY),
            Err(ComplianceError::MissingDueDate { id: 11, .. })
        ));
    }

    #[test]
    fn reconcile_creates_when_slot_is_free() {
        let plan = plan_notification(&cert(20, ComplianceStatus::ExpiringSoon), &CERT_THRESHOLDS, TODAY).unwrap();
        let result = reconcile(&[], plan);
        assert!(result.supersede.is_empty());
        assert_eq!(result.create.map(|p| p.threshold_days), Some(30));
    }

    #[test]
    fn reconcile_is_idempotent_for_matching_pending_row() {
        let doc = cert(20, ComplianceStatus::ExpiringSoon);
        let existing = [stored(1, 30, NotificationStatus::Pending, doc.due_date.unwrap())];
        let plan = plan_notification(&doc, &CERT_THRESHOLDS, TODAY).unwrap();
        assert_eq!(reconcile(&existing, plan), Reconciliation::default());
    }

    #[test]
    fn reconcile_supersedes_pending_from_older_threshold() {
        let doc = cert(20, ComplianceStatus::ExpiringSoon);
        let due = doc.due_date.unwrap();
        let existing = [stored(1, 60, NotificationStatus::Pending, due)];
        let plan = plan_notification(&doc, &CERT_THRESHOLDS, TODAY).unwrap();
        let result = reconcile(&existing, plan);
        assert_eq!(result.supersede, vec![1]);
        assert_eq!(result.create.map(|p| p.threshold_days), Some(30));
    }

    #[test]
    fn acknowledged_rows_are_kept_and_block_duplicates() {
        let doc = cert(20, ComplianceStatus::ExpiringSoon);
        let due = doc.due_date.unwrap();
        let existing = [
            stored(1, 30, NotificationStatus::Acknowledged, due),
            stored(2, 60, NotificationStatus::Sent, due),
        ];
        let plan = plan_notification(&doc, &CERT_THRESHOLDS, TODAY).unwrap();
        assert_eq!(reconcile(&existing, plan), Reconciliation::default());
    }

    #[test]
    fn renewal_makes_pending_rows_stale() {
        let renewed = cert(400, ComplianceStatus::Active);
        let existing = [stored(4, 30, NotificationStatus::Pending, TODAY + Duration::days(20))];
        let plan = plan_notification(&renewed, &CERT_THRESHOLDS, TODAY).unwrap();
        assert!(plan.is_none());
        let result = reconcile(&existing, plan);
        assert_eq!(result.supersede, vec![4]);
        assert!(result.create.is_none());
    }

    #[test]
    fn pending_row_for_previous_due_date_is_replaced() {
        let doc = cert(25, ComplianceStatus::ExpiringSoon);
        let existing = [stored(9, 30, NotificationStatus::Pending, TODAY - Duration::days(300))];
        let plan = plan_notification(&doc, &CERT_THRESHOLDS, TODAY).unwrap();
        let result = reconcile(&existing, plan);
        assert_eq!(result.supersede, vec![9]);
        assert_eq!(result.create.map(|p| p.due_date), doc.due_date);
    }

    #[test]
    fn handled_rows_from_previous_due_date_are_resolved() {
        let doc = cert(5, ComplianceStatus::ExpiringSoon);
        let previous_due = TODAY - Duration::days(26);
        let existing = [
            stored(1, 30, NotificationStatus::Sent, previous_due),
            stored(2, 0, NotificationStatus::Acknowledged, previous_due),
        ];
        let plan = plan_notification(&doc, &CERT_THRESHOLDS, TODAY).unwrap();
        let result = reconcile(&existing, plan);
        assert!(result.supersede.is_empty());
        assert_eq!(result.resolve, vec![1, 2]);
        assert_eq!(result.create.map(|p| p.due_date), doc.due_date);
    }

    #[test]
    fn handled_rows_stay_when_nothing_is_planned() {
        let revoked = cert(5, ComplianceStatus::Revoked);
        let existing = [stored(1, 30, NotificationStatus::Sent, TODAY - Duration::days(26))];
        let plan = plan_notification(&revoked, &CERT_THRESHOLDS, TODAY).unwrap();
        assert_eq!(reconcile(&existing, plan), Reconciliation::default());
    }

    #[test]
    fn resolved_history_does_not_block_new_notification() {
        let doc = cert(-1, ComplianceStatus::Expired);
        let due = doc.due_date.unwrap();
        let existing = [
            stored(1, 0, NotificationStatus::Resolved, due),
            stored(2, 30, NotificationStatus::Superseded, due),
        ];
        let plan = plan_notification(&doc, &CERT_THRESHOLDS, TODAY).unwrap();
        let result = reconcile(&existing, plan);
        assert!(result.supersede.is_empty());
        assert_eq!(result.create.map(|p| p.threshold_days), Some(0));
    }
}
