//! Date-driven status classification.

use time::Date;

use crate::compliance::document::Expirable;
use crate::entity::{ComplianceStatus, DocumentKind};
use crate::error::ComplianceError;

/// Default upper bound of the `expiring_soon` window, in days.
pub const EXPIRING_SOON_DAYS: i64 = 30;

/// Status implied purely by the dates, ignoring any override.
pub fn status_for_dates(
    kind: DocumentKind,
    as_of: Date,
    due_date: Date,
    expiring_soon_days: i64,
) -> ComplianceStatus {
    let days_remaining = (due_date - as_of).whole_days();
    if days_remaining <= 0 {
        kind.lapsed_status()
    } else if days_remaining <= expiring_soon_days {
        ComplianceStatus::ExpiringSoon
    } else {
        ComplianceStatus::Active
    }
}

/// Classify a document. Terminal overrides are returned unchanged.
pub fn classify(
    kind: DocumentKind,
    as_of: Date,
    due_date: Date,
    current: ComplianceStatus,
    expiring_soon_days: i64,
) -> ComplianceStatus {
    if current.is_terminal() {
        return current;
    }
    status_for_dates(kind, as_of, due_date, expiring_soon_days)
}

/// Recompute the status of `document` as of `as_of`.
///
/// Returns `Ok(Some(new))` only when the status must change, so callers write nothing
/// for documents that are already correct.
pub fn recompute_status<E: Expirable + ?Sized>(
    document: &E,
    as_of: Date,
    expiring_soon_days: i64,
) -> Result<Option<ComplianceStatus>, ComplianceError> {
    let current = document.status();
    if current.is_terminal() {
        return Ok(None);
    }
    let due_date = document
        .due_date()
        .ok_or_else(|| ComplianceError::MissingDueDate {
            kind: document.kind(),
            id: document.document_id(),
        })?;
    let next = classify(
        document.kind(),
        as_of,
        due_date,
        current,
        expiring_soon_days,
    );
    Ok((next != current).then_some(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::document::TrackedDocument;
    use time::Duration;
    use time::macros::date;

    const TODAY: Date = date!(2026 - 10 - 17);

    fn doc(kind: DocumentKind, due_in: Option<i64>, status: ComplianceStatus) -> TrackedDocument {
        TrackedDocument {
            kind,
            id: 1,
            title: "Safety Management Certificate".into(),
            owner_name: "MV Nordic Star".into(),
            recipient: None,
            issued_on: None,
            due_date: due_in.map(|d| TODAY + Duration::days(d)),
            status,
        }
    }

    #[test]
    fn buckets_follow_day_thresholds() {
        let kind = DocumentKind::VesselCertificate;
        for (delta, expected) in [
            (-100, ComplianceStatus::Expired),
            (-1, ComplianceStatus::Expired),
            (0, ComplianceStatus::Expired),
            (1, ComplianceStatus::ExpiringSoon),
            (30, ComplianceStatus::ExpiringSoon),
            (31, ComplianceStatus::Active),
            (400, ComplianceStatus::Active),
        ] {
            let due = TODAY + Duration::days(delta);
            assert_eq!(
                classify(kind, TODAY, due, ComplianceStatus::Active, EXPIRING_SOON_DAYS),
                expected,
                "delta {delta}"
            );
        }
    }

    #[test]
    fn task_like_kinds_become_overdue() {
        for kind in [
            DocumentKind::MaintenanceTask,
            DocumentKind::Audit,
            DocumentKind::AuditFinding,
            DocumentKind::CorrectiveAction,
        ] {
            let due = TODAY - Duration::days(3);
            assert_eq!(
                classify(kind, TODAY, due, ComplianceStatus::Active, EXPIRING_SOON_DAYS),
                ComplianceStatus::Overdue
            );
        }
    }

    #[test]
    fn terminal_overrides_are_never_recomputed() {
        for status in ComplianceStatus::TERMINAL {
            for delta in [-100, 0, 10, 100] {
                let due = TODAY + Duration::days(delta);
                assert_eq!(
                    classify(
                        DocumentKind::CrewCertificate,
                        TODAY,
                        due,
                        status,
                        EXPIRING_SOON_DAYS
                    ),
                    status
                );
            }
        }
    }

    #[test]
    fn recompute_reports_only_changes() {
        let unchanged = doc(
            DocumentKind::CrewCertificate,
            Some(90),
            ComplianceStatus::Active,
        );
        assert_eq!(
            recompute_status(&unchanged, TODAY, EXPIRING_SOON_DAYS).unwrap(),
            None
        );

        let lapsed = doc(
            DocumentKind::CrewCertificate,
            Some(-5),
            ComplianceStatus::Active,
        );
        assert_eq!(
            recompute_status(&lapsed, TODAY, EXPIRING_SOON_DAYS).unwrap(),
            Some(ComplianceStatus::Expired)
        );
    }

    #[test]
    fn revoked_certificate_stays_revoked() {
        let revoked = doc(
            DocumentKind::VesselCertificate,
            Some(-100),
            ComplianceStatus::Revoked,
        );
        assert_eq!(
            recompute_status(&revoked, TODAY, EXPIRING_SOON_DAYS).unwrap(),
            None
        );
    }

    #[test]
    fn missing_due_date_is_a_data_error() {
        let open_finding = doc(DocumentKind::AuditFinding, None, ComplianceStatus::Active);
        let err = recompute_status(&open_finding, TODAY, EXPIRING_SOON_DAYS).unwrap_err();
        assert!(err.is_data_error());

        let closed_finding = doc(DocumentKind::AuditFinding, None, ComplianceStatus::Completed);
        assert_eq!(
            recompute_status(&closed_finding, TODAY, EXPIRING_SOON_DAYS).unwrap(),
            None
        );
    }

    #[test]
    fn custom_window_is_respected() {
        let due = TODAY + Duration::days(45);
        assert_eq!(
            classify(
                DocumentKind::CrewCertificate,
                TODAY,
                due,
                ComplianceStatus::Active,
                60
            ),
            ComplianceStatus::ExpiringSoon
        );
    }
}
