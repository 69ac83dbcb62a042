//! Shared fixtures for the integration tests: an in-memory database with the real schema,
//! a recording mail delivery and helpers to seed records.

#![allow(dead_code)]

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use fleet_compliance::config::{AppConfig, ComplianceConfig, SmtpConfig};
use fleet_compliance::delivery::{Delivery, EmailBody};
use fleet_compliance::entity::{
    ComplianceStatus, IntervalType, RiskLevel, audit, audit_finding, corrective_action,
    crew_certificate, crew_member, ism_compliance_item, maintenance_task, non_conformity,
    safety_procedure, vessel, vessel_certificate,
};
use fleet_compliance::error::DeliveryError;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    ConnectOptions, Database, DatabaseConnection,
};
use time::{Date, OffsetDateTime};

/// Create an in-memory SQLite database with all migrations applied.
///
/// The pool is pinned to a single connection so every query sees the same database.
pub async fn setup_test_db() -> Arc<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to connect to in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    Arc::new(db)
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        listen_addr: "127.0.0.1:0".to_string(),
        frontend_url: "https://fleet.example.com".to_string(),
        smtp: SmtpConfig {
            server: "localhost".to_string(),
            port: 2525,
            username: "compliance".to_string(),
            password: "secret".to_string(),
            from: "Fleet Compliance <compliance@fleet.example.com>".to_string(),
        },
        compliance: ComplianceConfig::default(),
    }
}

// =============================================================================
// Recording delivery
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub html: String,
}

/// Keeps every email in memory. Can be switched to fail like an unreachable SMTP relay.
#[derive(Debug, Default)]
pub struct RecordingDelivery {
    sent: Mutex<Vec<SentEmail>>,
    failing: AtomicBool,
}

impl RecordingDelivery {
    pub fn failing() -> Self {
        let delivery = Self::default();
        delivery.set_failing(true);
        delivery
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

impl Delivery for RecordingDelivery {
    fn send(
        &self,
        recipient: &str,
        subject: &str,
        body: &EmailBody,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send {
        let result = if self.failing.load(Ordering::SeqCst) {
            Err(DeliveryError::Transport("connection refused".to_string()))
        } else {
            self.sent.lock().unwrap().push(SentEmail {
                recipient: recipient.to_string(),
                subject: subject.to_string(),
                body: body.text.clone(),
                html: body.html.clone(),
            });
            Ok(())
        };
        std::future::ready(result)
    }
}

// =============================================================================
// Seed data
// =============================================================================

pub async fn insert_vessel(
    db: &DatabaseConnection,
    name: &str,
    imo_number: &str,
    contact_email: Option<&str>,
) -> vessel::Model {
    vessel::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        imo_number: Set(imo_number.to_string()),
        flag: Set("Malta".to_string()),
        vessel_type: Set("Bulk Carrier".to_string()),
        contact_email: Set(contact_email.map(str::to_string)),
        is_active: Set(true),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(db)
    .await
    .expect("insert vessel")
}

pub async fn insert_crew_member(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
) -> crew_member::Model {
    crew_member::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        rank: Set("Second Officer".to_string()),
        nationality: Set("Portuguese".to_string()),
        email: Set(email.to_string()),
        is_active: Set(true),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(db)
    .await
    .expect("insert crew member")
}

pub async fn insert_crew_certificate(
    db: &DatabaseConnection,
    crew_member_id: i32,
    name: &str,
    expiry_date: Date,
    status: ComplianceStatus,
) -> crew_certificate::Model {
    crew_certificate::ActiveModel {
        id: NotSet,
        crew_member_id: Set(crew_member_id),
        certificate_type: Set("STCW".to_string()),
        certificate_name: Set(name.to_string()),
        certificate_number: Set(format!("CC-{name}")),
        issue_date: Set(expiry_date - time::Duration::days(5 * 365)),
        expiry_date: Set(expiry_date),
        issuing_authority: Set("Maritime Authority".to_string()),
        status: Set(status),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(db)
    .await
    .expect("insert crew certificate")
}

pub async fn insert_vessel_certificate(
    db: &DatabaseConnection,
    vessel_id: i32,
    number: &str,
    expiry_date: Date,
    status: ComplianceStatus,
) -> vessel_certificate::Model {
    vessel_certificate::ActiveModel {
        id: NotSet,
        vessel_id: Set(vessel_id),
        certificate_type: Set("Statutory".to_string()),
        certificate_name: Set("Safety Management Certificate".to_string()),
        certificate_number: Set(number.to_string()),
        issue_date: Set(expiry_date - time::Duration::days(5 * 365)),
        expiry_date: Set(expiry_date),
        issuing_authority: Set("Flag State".to_string()),
        status: Set(status),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(db)
    .await
    .expect("insert vessel certificate")
}

pub async fn insert_maintenance_task(
    db: &DatabaseConnection,
    vessel_id: i32,
    interval_type: IntervalType,
    interval_value: i32,
    last_completed_date: Option<Date>,
    next_due_date: Date,
    status: ComplianceStatus,
) -> maintenance_task::Model {
    maintenance_task::ActiveModel {
        id: NotSet,
        vessel_id: Set(vessel_id),
        task_name: Set("Lube oil analysis".to_string()),
        equipment_name: Set("Main engine".to_string()),
        interval_type: Set(interval_type),
        interval_value: Set(interval_value),
        last_completed_date: Set(last_completed_date),
        next_due_date: Set(next_due_date),
        status: Set(status),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(db)
    .await
    .expect("insert maintenance task")
}

pub async fn insert_audit(
    db: &DatabaseConnection,
    vessel_id: i32,
    planned_date: Date,
    auditor_email: &str,
) -> audit::Model {
    audit::ActiveModel {
        id: NotSet,
        vessel_id: Set(vessel_id),
        audit_type: Set("ISM Internal".to_string()),
        planned_date: Set(planned_date),
        auditor_email: Set(auditor_email.to_string()),
        status: Set(ComplianceStatus::Active),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(db)
    .await
    .expect("insert audit")
}

pub async fn insert_finding(
    db: &DatabaseConnection,
    audit_id: i32,
    due_date: Option<Date>,
    assigned_to_email: Option<&str>,
) -> audit_finding::Model {
    audit_finding::ActiveModel {
        id: NotSet,
        audit_id: Set(audit_id),
        description: Set("Fire damper in engine room does not close fully".to_string()),
        severity: Set("major".to_string()),
        due_date: Set(due_date),
        assigned_to_email: Set(assigned_to_email.map(str::to_string)),
        status: Set(ComplianceStatus::Active),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(db)
    .await
    .expect("insert audit finding")
}

pub async fn insert_corrective_action(
    db: &DatabaseConnection,
    vessel_id: i32,
    due_date: Date,
    assigned_to_email: Option<&str>,
) -> corrective_action::Model {
    let nc = non_conformity::ActiveModel {
        id: NotSet,
        vessel_id: Set(vessel_id),
        description: Set("Oily water separator alarm bypassed".to_string()),
        severity: Set("high".to_string()),
        detection_date: Set(due_date - time::Duration::days(30)),
        status: Set("open".to_string()),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(db)
    .await
    .expect("insert non-conformity");

    corrective_action::ActiveModel {
        id: NotSet,
        non_conformity_id: Set(nc.id),
        description: Set("Restore alarm circuit and retrain engine crew".to_string()),
        assigned_to_email: Set(assigned_to_email.map(str::to_string)),
        due_date: Set(due_date),
        completed_date: Set(None),
        status: Set(ComplianceStatus::Active),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(db)
    .await
    .expect("insert corrective action")
}

pub async fn insert_ism_item(
    db: &DatabaseConnection,
    vessel_id: i32,
    risk_level: RiskLevel,
    next_review_date: Option<Date>,
    assessor_email: Option<&str>,
) -> ism_compliance_item::Model {
    ism_compliance_item::ActiveModel {
        id: NotSet,
        vessel_id: Set(vessel_id),
        requirement_code: Set("10.2".to_string()),
        requirement_title: Set("Maintenance of the ship and equipment".to_string()),
        risk_level: Set(risk_level),
        last_reviewed_date: Set(None),
        next_review_date: Set(next_review_date),
        assessor_email: Set(assessor_email.map(str::to_string)),
        status: Set(ComplianceStatus::Active),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(db)
    .await
    .expect("insert ism compliance item")
}

pub async fn insert_procedure(
    db: &DatabaseConnection,
    review_interval_months: i32,
    next_review_date: Date,
    owner_email: Option<&str>,
) -> safety_procedure::Model {
    safety_procedure::ActiveModel {
        id: NotSet,
        title: Set("Enclosed Space Entry".to_string()),
        document_type: Set("procedure".to_string()),
        category: Set("Deck Operations".to_string()),
        version: Set("3.1".to_string()),
        review_interval_months: Set(review_interval_months),
        last_reviewed_date: Set(None),
        next_review_date: Set(Some(next_review_date)),
        owner_email: Set(owner_email.map(str::to_string)),
        status: Set(ComplianceStatus::Active),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(db)
    .await
    .expect("insert safety procedure")
}
