//! String-backed enums shared by the tracked-document and notification tables.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Lifecycle status of a tracked document.
///
/// The first four variants are derived from dates by the classifier. The rest are
/// overrides set by a person and freeze automatic recomputation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "expiring_soon")]
    ExpiringSoon,
    #[sea_orm(string_value = "expired")]
    Expired,
    #[sea_orm(string_value = "overdue")]
    Overdue,
    #[sea_orm(string_value = "revoked")]
    Revoked,
    #[sea_orm(string_value = "suspended")]
    Suspended,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl ComplianceStatus {
    /// Overrides that the classifier must leave untouched.
    pub const TERMINAL: [ComplianceStatus; 5] = [
        ComplianceStatus::Revoked,
        ComplianceStatus::Suspended,
        ComplianceStatus::Pending,
        ComplianceStatus::Cancelled,
        ComplianceStatus::Completed,
    ];

    pub fn is_terminal(self) -> bool {
        Self::TERMINAL.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComplianceStatus::Active => "active",
            ComplianceStatus::ExpiringSoon => "expiring_soon",
            ComplianceStatus::Expired => "expired",
            ComplianceStatus::Overdue => "overdue",
            ComplianceStatus::Revoked => "revoked",
            ComplianceStatus::Suspended => "suspended",
            ComplianceStatus::Pending => "pending",
            ComplianceStatus::Cancelled => "cancelled",
            ComplianceStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kinds of record that carry a due or expiry date.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    #[sea_orm(string_value = "crew_certificate")]
    CrewCertificate,
    #[sea_orm(string_value = "vessel_certificate")]
    VesselCertificate,
    #[sea_orm(string_value = "maintenance_task")]
    MaintenanceTask,
    #[sea_orm(string_value = "audit")]
    Audit,
    #[sea_orm(string_value = "audit_finding")]
    AuditFinding,
    #[sea_orm(string_value = "corrective_action")]
    CorrectiveAction,
    #[sea_orm(string_value = "ism_compliance_item")]
    IsmComplianceItem,
    #[sea_orm(string_value = "procedure_review")]
    ProcedureReview,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 8] = [
        DocumentKind::CrewCertificate,
        DocumentKind::VesselCertificate,
        DocumentKind::MaintenanceTask,
        DocumentKind::Audit,
        DocumentKind::AuditFinding,
        DocumentKind::CorrectiveAction,
        DocumentKind::IsmComplianceItem,
        DocumentKind::ProcedureReview,
    ];

    /// Status a document of this kind takes once its date has passed.
    pub fn lapsed_status(self) -> ComplianceStatus {
        match self {
            DocumentKind::CrewCertificate | DocumentKind::VesselCertificate => {
                ComplianceStatus::Expired
            }
            _ => ComplianceStatus::Overdue,
        }
    }

    /// Kinds that start a new cycle once completed.
    pub fn is_recurring(self) -> bool {
        matches!(
            self,
            DocumentKind::MaintenanceTask
                | DocumentKind::IsmComplianceItem
                | DocumentKind::ProcedureReview
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::CrewCertificate => "crew_certificate",
            DocumentKind::VesselCertificate => "vessel_certificate",
            DocumentKind::MaintenanceTask => "maintenance_task",
            DocumentKind::Audit => "audit",
            DocumentKind::AuditFinding => "audit_finding",
            DocumentKind::CorrectiveAction => "corrective_action",
            DocumentKind::IsmComplianceItem => "ism_compliance_item",
            DocumentKind::ProcedureReview => "procedure_review",
        }
    }

    /// Human label used in rendered messages.
    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::CrewCertificate | DocumentKind::VesselCertificate => "Certificate",
            DocumentKind::MaintenanceTask => "Maintenance task",
            DocumentKind::Audit => "Audit",
            DocumentKind::AuditFinding => "Finding",
            DocumentKind::CorrectiveAction => "Corrective action",
            DocumentKind::IsmComplianceItem => "ISM compliance review",
            DocumentKind::ProcedureReview => "Procedure review",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery state of a notification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(15))")]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "acknowledged")]
    Acknowledged,
    #[sea_orm(string_value = "resolved")]
    Resolved,
    #[sea_orm(string_value = "superseded")]
    Superseded,
}

impl NotificationStatus {
    /// Live notifications occupy the (document, threshold) slot.
    pub fn is_live(self) -> bool {
        !matches!(
            self,
            NotificationStatus::Resolved | NotificationStatus::Superseded
        )
    }
}

/// Recurrence of a maintenance task.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum IntervalType {
    #[sea_orm(string_value = "daily")]
    Daily,
    #[sea_orm(string_value = "weekly")]
    Weekly,
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
    #[sea_orm(string_value = "semi_annual")]
    SemiAnnual,
    #[sea_orm(string_value = "annual")]
    Annual,
    #[sea_orm(string_value = "running_hours")]
    RunningHours,
    #[sea_orm(string_value = "custom_days")]
    CustomDays,
}

/// Risk rating of an ISM compliance item; drives how often it is reviewed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
}
