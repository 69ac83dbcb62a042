//! Tests for renewals, status overrides and notification handling.

mod common;

use common::{
    RecordingDelivery, insert_crew_certificate, insert_crew_member, setup_test_db, test_config,
};
use fleet_compliance::compliance::lifecycle::{
    acknowledge_notification, override_status, renew_document, resolve_notification,
};
use fleet_compliance::compliance::{Actor, run_compliance_batch};
use fleet_compliance::entity::{ComplianceStatus, DocumentKind, NotificationStatus};
use fleet_compliance::error::ComplianceError;
use fleet_compliance::repository::ComplianceStore;
use time::Duration;
use time::macros::date;

const TODAY: time::Date = date!(2026 - 10 - 17);

async fn setup_expiring_certificate() -> (ComplianceStore, i32) {
    let db = setup_test_db().await;
    let crew = insert_crew_member(&db, "Ana Costa", "ana.costa@fleet.example.com").await;
    let cert = insert_crew_certificate(
        &db,
        crew.id,
        "STCW Basic Safety",
        TODAY + Duration::days(20),
        ComplianceStatus::Active,
    )
    .await;
    (ComplianceStore::new(db), cert.id)
}

/// Run one batch and return the single notification it raised.
async fn raise_notification(store: &ComplianceStore, id: i32) -> i32 {
    run_compliance_batch(
        store,
        &RecordingDelivery::default(),
        &test_config(),
        &Actor::new("compliance-batch"),
        TODAY,
    )
    .await;
    store
        .notifications_for_document(DocumentKind::CrewCertificate, id)
        .await
        .unwrap()[0]
        .id
}

// =============================================================================
// Renewals
// =============================================================================

#[tokio::test]
async fn test_renew_unknown_document_is_not_found() {
    let (store, _) = setup_expiring_certificate().await;

    let err = renew_document(
        &store,
        DocumentKind::CrewCertificate,
        999,
        TODAY + Duration::days(365),
        &Actor::new("superintendent"),
        TODAY,
        30,
    )
    .await
    .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "crew_certificate 999 not found");
}

#[tokio::test]
async fn test_renewal_without_status_change_writes_no_history() {
    let (store, id) = setup_expiring_certificate().await;

    // Stored status is still active; 60 days out remains active.
    let renewed = renew_document(
        &store,
        DocumentKind::CrewCertificate,
        id,
        TODAY + Duration::days(60),
        &Actor::new("superintendent"),
        TODAY,
        30,
    )
    .await
    .unwrap();

    assert_eq!(renewed.status, ComplianceStatus::Active);
    let stored = store
        .find_document(DocumentKind::CrewCertificate, id)
        .await
        .unwrap();
    assert_eq!(stored.due_date, Some(TODAY + Duration::days(60)));
    assert!(
        store
            .status_history(DocumentKind::CrewCertificate, id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_renewal_keeps_manual_override() {
    let (store, id) = setup_expiring_certificate().await;
    let actor = Actor::new("superintendent");

    override_status(
        &store,
        DocumentKind::CrewCertificate,
        id,
        Some(ComplianceStatus::Suspended),
        &actor,
        TODAY,
        30,
    )
    .await
    .unwrap();
    let renewed = renew_document(
        &store,
        DocumentKind::CrewCertificate,
        id,
        TODAY + Duration::days(365),
        &actor,
        TODAY,
        30,
    )
    .await
    .unwrap();

    assert_eq!(renewed.status, ComplianceStatus::Suspended);
    assert_eq!(renewed.due_date, Some(TODAY + Duration::days(365)));
}

// =============================================================================
// Status overrides
// =============================================================================

#[tokio::test]
async fn test_date_derived_status_cannot_be_set_by_hand() {
    let (store, id) = setup_expiring_certificate().await;

    let err = override_status(
        &store,
        DocumentKind::CrewCertificate,
        id,
        Some(ComplianceStatus::Expired),
        &Actor::new("superintendent"),
        TODAY,
        30,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        ComplianceError::NotAnOverride(ComplianceStatus::Expired)
    ));
}

#[tokio::test]
async fn test_override_records_actor_and_is_not_repeated() {
    let (store, id) = setup_expiring_certificate().await;
    let actor = Actor::new("dpa");

    for _ in 0..2 {
        override_status(
            &store,
            DocumentKind::CrewCertificate,
            id,
            Some(ComplianceStatus::Revoked),
            &actor,
            TODAY,
            30,
        )
        .await
        .unwrap();
    }

    let history = store
        .status_history(DocumentKind::CrewCertificate, id)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].new_status, ComplianceStatus::Revoked);
    assert_eq!(history[0].changed_by, "dpa");
}

#[tokio::test]
async fn test_blank_actor_is_recorded_as_anonymous() {
    let (store, id) = setup_expiring_certificate().await;

    override_status(
        &store,
        DocumentKind::CrewCertificate,
        id,
        Some(ComplianceStatus::Cancelled),
        &Actor::new("   "),
        TODAY,
        30,
    )
    .await
    .unwrap();

    let history = store
        .status_history(DocumentKind::CrewCertificate, id)
        .await
        .unwrap();
    assert_eq!(history[0].changed_by, "anonymous");
}

// =============================================================================
// Notification handling
// =============================================================================

#[tokio::test]
async fn test_acknowledge_is_idempotent() {
    let (store, id) = setup_expiring_certificate().await;
    let notification_id = raise_notification(&store, id).await;

    let first = acknowledge_notification(&store, notification_id, &Actor::new("master"))
        .await
        .unwrap();
    let second = acknowledge_notification(&store, notification_id, &Actor::new("someone.else"))
        .await
        .unwrap();

    assert_eq!(first.status, NotificationStatus::Acknowledged);
    assert_eq!(second.status, NotificationStatus::Acknowledged);
    assert_eq!(second.acknowledged_by.as_deref(), Some("master"));
}

#[tokio::test]
async fn test_resolved_notification_cannot_be_acknowledged() {
    let (store, id) = setup_expiring_certificate().await;
    let notification_id = raise_notification(&store, id).await;
    let actor = Actor::new("master");

    let resolved = resolve_notification(&store, notification_id, &actor)
        .await
        .unwrap();
    assert_eq!(resolved.status, NotificationStatus::Resolved);
    assert_eq!(resolved.dedup_key, None);

    let err = acknowledge_notification(&store, notification_id, &actor)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ComplianceError::InvalidNotificationTransition {
            status: NotificationStatus::Resolved,
            ..
        }
    ));
}

#[tokio::test]
async fn test_superseded_notification_cannot_be_resolved() {
    let (store, id) = setup_expiring_certificate().await;
    let actor = Actor::new("superintendent");
    run_compliance_batch(
        &store,
        &RecordingDelivery::failing(),
        &test_config(),
        &actor,
        TODAY,
    )
    .await;
    let notification_id = store
        .notifications_for_document(DocumentKind::CrewCertificate, id)
        .await
        .unwrap()[0]
        .id;
    renew_document(
        &store,
        DocumentKind::CrewCertificate,
        id,
        TODAY + Duration::days(365),
        &actor,
        TODAY,
        30,
    )
    .await
    .unwrap();

    let err = resolve_notification(&store, notification_id, &actor)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ComplianceError::InvalidNotificationTransition {
            status: NotificationStatus::Superseded,
            action: "resolved",
            ..
        }
    ));
}

#[tokio::test]
async fn test_resolving_frees_the_threshold_slot() {
    let (store, id) = setup_expiring_certificate().await;
    let notification_id = raise_notification(&store, id).await;

    resolve_notification(&store, notification_id, &Actor::new("master"))
        .await
        .unwrap();
    let report = run_compliance_batch(
        &store,
        &RecordingDelivery::default(),
        &test_config(),
        &Actor::new("compliance-batch"),
        TODAY,
    )
    .await;

    assert_eq!(report.notifications_created, 1);
    let rows = store
        .notifications_for_document(DocumentKind::CrewCertificate, id)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].threshold_days, 30);
    let expected_key = format!("crew_certificate:{id}:30");
    assert_eq!(rows[1].dedup_key.as_deref(), Some(expected_key.as_str()));
}

#[tokio::test]
async fn test_unknown_notification_is_not_found() {
    let (store, _) = setup_expiring_certificate().await;

    let err = acknowledge_notification(&store, 42, &Actor::new("master"))
        .await
        .unwrap_err();

    assert!(matches!(err, ComplianceError::NotificationNotFound(42)));
    assert!(err.is_not_found());
}
