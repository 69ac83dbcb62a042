//! Tests for configuration loading.

use config::Config;
use fleet_compliance::config::{AppConfig, ConfigError, SmtpConfig};
use fleet_compliance::entity::DocumentKind;
use std::env;
use std::fs;

fn from_yaml(yaml_content: &str) -> Config {
    Config::builder()
        .add_source(config::File::from_str(
            yaml_content,
            config::FileFormat::Yaml,
        ))
        .build()
        .expect("Failed to build config")
}

const MINIMAL: &str = r#"
database_url: "postgres://localhost/fleet"
frontend_url: "https://fleet.example.com"
smtp:
  server: "smtp.example.com"
  port: 587
  username: "compliance@example.com"
  password: "secret123"
  from: "Fleet Compliance <compliance@example.com>"
"#;

// =============================================================================
// Deserialization
// =============================================================================

#[test]
fn test_smtp_config_deserialization() {
    let yaml_content = r#"
server: "smtp.example.com"
port: 465
username: "user@example.com"
password: "secret123"
from: "noreply@example.com"
"#;

    let smtp_config: SmtpConfig = from_yaml(yaml_content)
        .try_deserialize()
        .expect("Failed to deserialize SMTP config");
    assert_eq!(smtp_config.server, "smtp.example.com");
    assert_eq!(smtp_config.port, 465);
    assert_eq!(smtp_config.username, "user@example.com");
    assert_eq!(smtp_config.from, "noreply@example.com");
}

#[test]
fn test_minimal_config_uses_compliance_defaults() {
    let app_config: AppConfig = from_yaml(MINIMAL)
        .try_deserialize()
        .expect("Failed to deserialize app config");

    assert_eq!(app_config.database_url, "postgres://localhost/fleet");
    assert_eq!(app_config.listen_addr, "0.0.0.0:8080");
    assert_eq!(app_config.compliance.expiring_soon_days, 30);
    assert_eq!(app_config.compliance.run_at_hour, 0);
    assert!(app_config.compliance.scheduler_enabled);
    assert_eq!(app_config.compliance.service_account, "compliance-batch");
    assert_eq!(
        app_config
            .compliance
            .thresholds
            .for_kind(DocumentKind::CrewCertificate),
        &[30, 60, 90]
    );
    assert_eq!(
        app_config
            .compliance
            .thresholds
            .for_kind(DocumentKind::MaintenanceTask),
        &[7]
    );
    assert!(app_config.validate().is_ok());
}

#[test]
fn test_threshold_overrides_keep_other_defaults() {
    let yaml_content = format!(
        "{MINIMAL}
compliance:
  run_at_hour: 6
  scheduler_enabled: false
  thresholds:
    vessel_certificate: [14, 45, 120]
"
    );

    let app_config: AppConfig = from_yaml(&yaml_content)
        .try_deserialize()
        .expect("Failed to deserialize app config");

    let compliance = &app_config.compliance;
    assert_eq!(compliance.run_at_hour, 6);
    assert!(!compliance.scheduler_enabled);
    assert_eq!(
        compliance
            .thresholds
            .for_kind(DocumentKind::VesselCertificate),
        &[14, 45, 120]
    );
    assert_eq!(
        compliance.thresholds.for_kind(DocumentKind::AuditFinding),
        &[14]
    );
}

#[test]
fn test_config_partial_structure() {
    let invalid_yaml = r#"
database_url: "postgres://localhost/fleet"
# Missing smtp section and frontend_url
"#;

    let result: Result<AppConfig, _> = from_yaml(invalid_yaml).try_deserialize();
    assert!(
        result.is_err(),
        "Should fail when required fields are missing"
    );
}

#[test]
fn test_config_with_environment_variables() {
    let config_path = env::temp_dir().join("fleet_compliance_test_config.yaml");
    fs::write(&config_path, MINIMAL).expect("Failed to write temp config");

    unsafe {
        env::set_var("FLEETTEST__DATABASE_URL", "postgres://env/fleet");
        env::set_var("FLEETTEST__COMPLIANCE__RUN_AT_HOUR", "5");
    }

    let config = Config::builder()
        .add_source(config::File::from(config_path.clone()))
        .add_source(
            config::Environment::default()
                .prefix("FLEETTEST")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .expect("Failed to build config");
    let app_config: AppConfig = config.try_deserialize().expect("Failed to deserialize");

    assert_eq!(app_config.database_url, "postgres://env/fleet");
    assert_eq!(app_config.compliance.run_at_hour, 5);
    assert_eq!(app_config.frontend_url, "https://fleet.example.com");

    unsafe {
        env::remove_var("FLEETTEST__DATABASE_URL");
        env::remove_var("FLEETTEST__COMPLIANCE__RUN_AT_HOUR");
    }
    let _ = fs::remove_file(config_path);
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_validation_rejects_bad_schedule_hour() {
    let yaml_content = format!(
        "{MINIMAL}
compliance:
  run_at_hour: 25
"
    );
    let app_config: AppConfig = from_yaml(&yaml_content).try_deserialize().unwrap();

    let err = app_config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
    assert!(err.to_string().contains("run_at_hour"));
}

#[test]
fn test_validation_rejects_blank_service_account() {
    let yaml_content = format!(
        "{MINIMAL}
compliance:
  service_account: \"  \"
"
    );
    let app_config: AppConfig = from_yaml(&yaml_content).try_deserialize().unwrap();

    assert!(app_config.validate().is_err());
}

#[test]
fn test_smtp_debug_output_hides_password() {
    let app_config: AppConfig = from_yaml(MINIMAL).try_deserialize().unwrap();

    let rendered = format!("{app_config:?}");
    assert!(rendered.contains("smtp.example.com"));
    assert!(!rendered.contains("secret123"));
}
