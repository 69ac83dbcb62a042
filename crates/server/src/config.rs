use serde::Deserialize;
use std::fmt;
use thiserror::Error;

use crate::entity::DocumentKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

#[derive(Clone, Deserialize)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from", &self.from)
            .finish()
    }
}

/// Notification thresholds in days before the due date, per document kind.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub crew_certificate: Vec<i32>,
    pub vessel_certificate: Vec<i32>,
    pub maintenance_task: Vec<i32>,
    pub audit: Vec<i32>,
    pub audit_finding: Vec<i32>,
    pub corrective_action: Vec<i32>,
    pub ism_compliance_item: Vec<i32>,
    pub procedure_review: Vec<i32>,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            crew_certificate: vec![30, 60, 90],
            vessel_certificate: vec![30, 60, 90],
            maintenance_task: vec![7],
            audit: vec![30],
            audit_finding: vec![14],
            corrective_action: vec![7],
            ism_compliance_item: vec![14],
            procedure_review: vec![30],
        }
    }
}

impl ThresholdConfig {
    pub fn for_kind(&self, kind: DocumentKind) -> &[i32] {
        match kind {
            DocumentKind::CrewCertificate => &self.crew_certificate,
            DocumentKind::VesselCertificate => &self.vessel_certificate,
            DocumentKind::MaintenanceTask => &self.maintenance_task,
            DocumentKind::Audit => &self.audit,
            DocumentKind::AuditFinding => &self.audit_finding,
            DocumentKind::CorrectiveAction => &self.corrective_action,
            DocumentKind::IsmComplianceItem => &self.ism_compliance_item,
            DocumentKind::ProcedureReview => &self.procedure_review,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ComplianceConfig {
    /// Upper bound (inclusive) of the `expiring_soon` window.
    #[serde(default = "default_expiring_soon_days")]
    pub expiring_soon_days: i64,
    /// UTC hour at which the daily batch runs.
    #[serde(default)]
    pub run_at_hour: u8,
    #[serde(default = "default_scheduler_enabled")]
    pub scheduler_enabled: bool,
    /// Name recorded as the actor for changes made by the daily batch.
    #[serde(default = "default_service_account")]
    pub service_account: String,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            expiring_soon_days: default_expiring_soon_days(),
            run_at_hour: 0,
            scheduler_enabled: default_scheduler_enabled(),
            service_account: default_service_account(),
            thresholds: ThresholdConfig::default(),
        }
    }
}

fn default_expiring_soon_days() -> i64 {
    30
}

fn default_scheduler_enabled() -> bool {
    true
}

fn default_service_account() -> String {
    "compliance-batch".to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Base URL of the web frontend, linked from notification emails.
    pub frontend_url: String,
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub compliance: ComplianceConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smtp.port == 0 {
            return Err(ConfigError::Validation("smtp.port must be > 0".into()));
        }
        let compliance = &self.compliance;
        if compliance.run_at_hour > 23 {
            return Err(ConfigError::Validation(
                "compliance.run_at_hour must be between 0 and 23".into(),
            ));
        }
        if compliance.expiring_soon_days < 1 {
            return Err(ConfigError::Validation(
                "compliance.expiring_soon_days must be at least 1".into(),
            ));
        }
        if compliance.service_account.trim().is_empty() {
            return Err(ConfigError::Validation(
                "compliance.service_account must not be empty".into(),
            ));
        }
        for kind in DocumentKind::ALL {
            let thresholds = compliance.thresholds.for_kind(kind);
            if thresholds.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "compliance.thresholds.{kind} must list at least one threshold"
                )));
            }
            if thresholds.iter().any(|days| *days < 0) {
                return Err(ConfigError::Validation(format!(
                    "compliance.thresholds.{kind} must not contain negative values"
                )));
            }
        }
        Ok(())
    }
}

/// Load application configuration from `config.yaml` + environment overrides.
///
/// Any environment variable matching the key path separated by double underscores
/// (e.g. `SMTP__PORT`, `COMPLIANCE__RUN_AT_HOUR`) overrides the file value.
///
/// Returns a `ConfigError` instead of panicking so the caller can decide how to fail.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    use config::{Config, Environment, File};
    let cfg = Config::builder()
        .add_source(File::with_name("config.yaml"))
        .add_source(Environment::default().separator("__"))
        .build()?;

    let app: AppConfig = cfg.try_deserialize()?;
    app.validate()?;
    Ok(app)
}
