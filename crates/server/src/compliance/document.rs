//! The shared view over every record type that carries a due or expiry date.

use serde::Serialize;
use std::fmt;
use time::Date;
use utoipa::ToSchema;

use crate::entity::{
    ComplianceStatus, DocumentKind, audit, audit_finding, corrective_action, crew_certificate,
    ism_compliance_item, maintenance_task, safety_procedure, vessel_certificate,
};

/// Capability shared by all tracked record types.
///
/// Implemented by each entity model so that classification and notification planning
/// operate on one abstraction instead of per-module copies.
pub trait Expirable {
    fn kind(&self) -> DocumentKind;
    fn document_id(&self) -> i32;
    fn title(&self) -> String;
    fn issued_on(&self) -> Option<Date>;
    fn due_date(&self) -> Option<Date>;
    fn status(&self) -> ComplianceStatus;
}

impl Expirable for crew_certificate::Model {
    fn kind(&self) -> DocumentKind {
        DocumentKind::CrewCertificate
    }
    fn document_id(&self) -> i32 {
        self.id
    }
    fn title(&self) -> String {
        self.certificate_name.clone()
    }
    fn issued_on(&self) -> Option<Date> {
        Some(self.issue_date)
    }
    fn due_date(&self) -> Option<Date> {
        Some(self.expiry_date)
    }
    fn status(&self) -> ComplianceStatus {
        self.status
    }
}

impl Expirable for vessel_certificate::Model {
    fn kind(&self) -> DocumentKind {
        DocumentKind::VesselCertificate
    }
    fn document_id(&self) -> i32 {
        self.id
    }
    fn title(&self) -> String {
        self.certificate_name.clone()
    }
    fn issued_on(&self) -> Option<Date> {
        Some(self.issue_date)
    }
    fn due_date(&self) -> Option<Date> {
        Some(self.expiry_date)
    }
    fn status(&self) -> ComplianceStatus {
        self.status
    }
}

impl Expirable for maintenance_task::Model {
    fn kind(&self) -> DocumentKind {
        DocumentKind::MaintenanceTask
    }
    fn document_id(&self) -> i32 {
        self.id
    }
    fn title(&self) -> String {
        self.task_name.clone()
    }
    fn issued_on(&self) -> Option<Date> {
        self.last_completed_date
            .or_else(|| Some(self.created_at.date()))
    }
    fn due_date(&self) -> Option<Date> {
        Some(self.next_due_date)
    }
    fn status(&self) -> ComplianceStatus {
        self.status
    }
}

impl Expirable for audit::Model {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Audit
    }
    fn document_id(&self) -> i32 {
        self.id
    }
    fn title(&self) -> String {
        self.audit_type.clone()
    }
    fn issued_on(&self) -> Option<Date> {
        Some(self.created_at.date())
    }
    fn due_date(&self) -> Option<Date> {
        Some(self.planned_date)
    }
    fn status(&self) -> ComplianceStatus {
        self.status
    }
}

impl Expirable for audit_finding::Model {
    fn kind(&self) -> DocumentKind {
        DocumentKind::AuditFinding
    }
    fn document_id(&self) -> i32 {
        self.id
    }
    fn title(&self) -> String {
        short_title(&self.description)
    }
    fn issued_on(&self) -> Option<Date> {
        Some(self.created_at.date())
    }
    fn due_date(&self) -> Option<Date> {
        self.due_date
    }
    fn status(&self) -> ComplianceStatus {
        self.status
    }
}

impl Expirable for corrective_action::Model {
    fn kind(&self) -> DocumentKind {
        DocumentKind::CorrectiveAction
    }
    fn document_id(&self) -> i32 {
        self.id
    }
    fn title(&self) -> String {
        short_title(&self.description)
    }
    fn issued_on(&self) -> Option<Date> {
        Some(self.created_at.date())
    }
    fn due_date(&self) -> Option<Date> {
        Some(self.due_date)
    }
    fn status(&self) -> ComplianceStatus {
        self.status
    }
}

impl Expirable for ism_compliance_item::Model {
    fn kind(&self) -> DocumentKind {
        DocumentKind::IsmComplianceItem
    }
    fn document_id(&self) -> i32 {
        self.id
    }
    fn title(&self) -> String {
        format!("ISM {} {}", self.requirement_code, self.requirement_title)
    }
    fn issued_on(&self) -> Option<Date> {
        self.last_reviewed_date
    }
    fn due_date(&self) -> Option<Date> {
        self.next_review_date
    }
    fn status(&self) -> ComplianceStatus {
        self.status
    }
}

impl Expirable for safety_procedure::Model {
    fn kind(&self) -> DocumentKind {
        DocumentKind::ProcedureReview
    }
    fn document_id(&self) -> i32 {
        self.id
    }
    fn title(&self) -> String {
        format!("{} v{}", self.title, self.version)
    }
    fn issued_on(&self) -> Option<Date> {
        self.last_reviewed_date
    }
    fn due_date(&self) -> Option<Date> {
        self.next_review_date
    }
    fn status(&self) -> ComplianceStatus {
        self.status
    }
}

const TITLE_MAX_CHARS: usize = 60;

/// Free-text descriptions are cut to a readable length for subjects and messages.
fn short_title(description: &str) -> String {
    let trimmed = description.trim();
    if trimmed.chars().count() <= TITLE_MAX_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(TITLE_MAX_CHARS - 3).collect();
    format!("{}...", cut.trim_end())
}

/// A tracked record flattened together with its owner's display name and contact.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct TrackedDocument {
    pub kind: DocumentKind,
    pub id: i32,
    pub title: String,
    pub owner_name: String,
    pub recipient: Option<String>,
    pub issued_on: Option<Date>,
    pub due_date: Option<Date>,
    pub status: ComplianceStatus,
}

impl TrackedDocument {
    pub fn new<E: Expirable>(
        record: &E,
        owner_name: impl Into<String>,
        recipient: Option<String>,
    ) -> Self {
        Self {
            kind: record.kind(),
            id: record.document_id(),
            title: record.title(),
            owner_name: owner_name.into(),
            recipient: recipient.filter(|r| !r.trim().is_empty()),
            issued_on: record.issued_on(),
            due_date: record.due_date(),
            status: record.status(),
        }
    }

    /// Calendar days from `as_of` until the due date; negative once lapsed.
    pub fn days_remaining(&self, as_of: Date) -> Option<i64> {
        self.due_date.map(|due| (due - as_of).whole_days())
    }
}

impl Expirable for TrackedDocument {
    fn kind(&self) -> DocumentKind {
        self.kind
    }
    fn document_id(&self) -> i32 {
        self.id
    }
    fn title(&self) -> String {
        self.title.clone()
    }
    fn issued_on(&self) -> Option<Date> {
        self.issued_on
    }
    fn due_date(&self) -> Option<Date> {
        self.due_date
    }
    fn status(&self) -> ComplianceStatus {
        self.status
    }
}

/// Who is responsible for a change: the batch service account or a named user.
///
/// Passed explicitly into every write so no code path has to look up a default user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor(String);

impl Actor {
    pub const ANONYMOUS: &'static str = "anonymous";

    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.trim().is_empty() {
            Self(Self::ANONYMOUS.to_string())
        } else {
            Self(name.trim().to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn finding(description: &str, due_date: Option<Date>) -> audit_finding::Model {
        audit_finding::Model {
            id: 7,
            audit_id: 3,
            description: description.to_string(),
            severity: "major".to_string(),
            due_date,
            assigned_to_email: Some("bosun@example.com".to_string()),
            status: ComplianceStatus::Active,
            created_at: datetime!(2026-01-05 10:00 UTC),
        }
    }

    #[test]
    fn long_descriptions_are_shortened() {
        let record = finding(&"Fire damper in engine room ".repeat(5), None);
        let title = record.title();
        assert!(title.chars().count() <= TITLE_MAX_CHARS);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn tracked_document_copies_dates_and_status() {
        let record = finding("Liferaft lashing worn", Some(date!(2026 - 02 - 01)));
        let doc = TrackedDocument::new(&record, "Audit #3 (ISM internal)", Some("  ".into()));
        assert_eq!(doc.kind, DocumentKind::AuditFinding);
        assert_eq!(doc.issued_on, Some(date!(2026 - 01 - 05)));
        assert_eq!(doc.days_remaining(date!(2026 - 01 - 22)), Some(10));
        assert_eq!(doc.recipient, None);
    }

    #[test]
    fn blank_actor_falls_back_to_anonymous() {
        assert_eq!(Actor::new("   ").as_str(), Actor::ANONYMOUS);
        assert_eq!(Actor::new(" chief.officer ").as_str(), "chief.officer");
    }
}
