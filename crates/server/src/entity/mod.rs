//! SeaORM entities for the fleet compliance schema.

pub mod audit;
pub mod audit_finding;
pub mod corrective_action;
pub mod crew_certificate;
pub mod crew_member;
pub mod email_log;
pub mod ism_compliance_item;
pub mod maintenance_task;
pub mod non_conformity;
pub mod notification;
pub mod safety_procedure;
pub mod status;
pub mod status_change;
pub mod vessel;
pub mod vessel_certificate;

pub use status::{ComplianceStatus, DocumentKind, IntervalType, NotificationStatus, RiskLevel};
