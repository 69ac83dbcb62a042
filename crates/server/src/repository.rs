//! Database access for tracked documents, notifications and their audit trails.

use std::collections::HashMap;
use std::sync::Arc;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};
use time::{Date, OffsetDateTime};

use crate::compliance::document::{Actor, TrackedDocument};
use crate::compliance::notifications::PlannedNotification;
use crate::entity::{
    ComplianceStatus, DocumentKind, IntervalType, NotificationStatus, audit, audit_finding,
    corrective_action, crew_certificate, crew_member, email_log, ism_compliance_item,
    maintenance_task, non_conformity, notification, safety_procedure, status_change, vessel,
    vessel_certificate,
};
use crate::error::ComplianceError;

const UNKNOWN_OWNER: &str = "unknown owner";

const LIVE_STATUSES: [NotificationStatus; 3] = [
    NotificationStatus::Pending,
    NotificationStatus::Sent,
    NotificationStatus::Acknowledged,
];

macro_rules! update_column {
    ($db:expr, $entity:ident, $column:ident, $value:expr, $id:expr) => {
        $entity::Entity::update_many()
            .col_expr($entity::Column::$column, Expr::value($value))
            .filter($entity::Column::Id.eq($id))
            .exec($db)
            .await?
            .rows_affected
    };
}

fn vessel_owner(vessel: Option<vessel::Model>) -> (String, Option<String>) {
    match vessel {
        Some(v) => (v.name, v.contact_email),
        None => (UNKNOWN_OWNER.to_string(), None),
    }
}

async fn load_documents<C: ConnectionTrait>(
    db: &C,
    kind: DocumentKind,
    id: Option<i32>,
) -> Result<Vec<TrackedDocument>, DbErr> {
    let documents = match kind {
        DocumentKind::CrewCertificate => crew_certificate::Entity::find()
            .filter(Condition::all().add_option(id.map(|id| crew_certificate::Column::Id.eq(id))))
            .find_also_related(crew_member::Entity)
            .order_by_asc(crew_certificate::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(|(cert, crew)| match crew {
                Some(crew) => TrackedDocument::new(&cert, crew.name, Some(crew.email)),
                None => TrackedDocument::new(&cert, UNKNOWN_OWNER, None),
            })
            .collect(),
        DocumentKind::VesselCertificate => vessel_certificate::Entity::find()
            .filter(
                Condition::all().add_option(id.map(|id| vessel_certificate::Column::Id.eq(id))),
            )
            .find_also_related(vessel::Entity)
            .order_by_asc(vessel_certificate::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(|(cert, vessel)| {
                let (owner, email) = vessel_owner(vessel);
                TrackedDocument::new(&cert, owner, email)
            })
            .collect(),
        DocumentKind::MaintenanceTask => maintenance_task::Entity::find()
            .filter(Condition::all().add_option(id.map(|id| maintenance_task::Column::Id.eq(id))))
            .find_also_related(vessel::Entity)
            .order_by_asc(maintenance_task::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(|(task, vessel)| {
                let (vessel_name, email) = vessel_owner(vessel);
                let owner = format!("{} on {vessel_name}", task.equipment_name);
                TrackedDocument::new(&task, owner, email)
            })
            .collect(),
        DocumentKind::Audit => audit::Entity::find()
            .filter(Condition::all().add_option(id.map(|id| audit::Column::Id.eq(id))))
            .find_also_related(vessel::Entity)
            .order_by_asc(audit::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(|(audit, vessel)| {
                let (owner, _) = vessel_owner(vessel);
                let auditor = audit.auditor_email.clone();
                TrackedDocument::new(&audit, owner, Some(auditor))
            })
            .collect(),
        DocumentKind::AuditFinding => audit_finding::Entity::find()
            .filter(Condition::all().add_option(id.map(|id| audit_finding::Column::Id.eq(id))))
            .find_also_related(audit::Entity)
            .order_by_asc(audit_finding::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(|(finding, audit)| {
                let assignee = finding.assigned_to_email.clone();
                match audit {
                    Some(a) => TrackedDocument::new(
                        &finding,
                        format!("Audit #{} ({})", a.id, a.audit_type),
                        assignee.or(Some(a.auditor_email)),
                    ),
                    None => TrackedDocument::new(&finding, UNKNOWN_OWNER, assignee),
                }
            })
            .collect(),
        DocumentKind::CorrectiveAction => corrective_action::Entity::find()
            .filter(
                Condition::all().add_option(id.map(|id| corrective_action::Column::Id.eq(id))),
            )
            .find_also_related(non_conformity::Entity)
            .order_by_asc(corrective_action::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(|(action, nc)| {
                let owner = nc
                    .map(|nc| format!("non-conformity #{}", nc.id))
                    .unwrap_or_else(|| UNKNOWN_OWNER.to_string());
                let assignee = action.assigned_to_email.clone();
                TrackedDocument::new(&action, owner, assignee)
            })
            .collect(),
        DocumentKind::IsmComplianceItem => ism_compliance_item::Entity::find()
            .filter(
                Condition::all().add_option(id.map(|id| ism_compliance_item::Column::Id.eq(id))),
            )
            .find_also_related(vessel::Entity)
            .order_by_asc(ism_compliance_item::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(|(item, vessel)| {
                let (owner, contact) = vessel_owner(vessel);
                let assessor = item.assessor_email.clone();
                TrackedDocument::new(&item, owner, assessor.or(contact))
            })
            .collect(),
        DocumentKind::ProcedureReview => safety_procedure::Entity::find()
            .filter(
                Condition::all().add_option(id.map(|id| safety_procedure::Column::Id.eq(id))),
            )
            .order_by_asc(safety_procedure::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(|procedure| {
                let owner = format!("{} procedures", procedure.category);
                let email = procedure.owner_email.clone();
                TrackedDocument::new(&procedure, owner, email)
            })
            .collect(),
    };
    Ok(documents)
}

async fn write_status<C: ConnectionTrait>(
    db: &C,
    kind: DocumentKind,
    id: i32,
    status: ComplianceStatus,
) -> Result<u64, DbErr> {
    Ok(match kind {
        DocumentKind::CrewCertificate => update_column!(db, crew_certificate, Status, status, id),
        DocumentKind::VesselCertificate => {
            update_column!(db, vessel_certificate, Status, status, id)
        }
        DocumentKind::MaintenanceTask => update_column!(db, maintenance_task, Status, status, id),
        DocumentKind::Audit => update_column!(db, audit, Status, status, id),
        DocumentKind::AuditFinding => update_column!(db, audit_finding, Status, status, id),
        DocumentKind::CorrectiveAction => {
            update_column!(db, corrective_action, Status, status, id)
        }
        DocumentKind::IsmComplianceItem => {
            update_column!(db, ism_compliance_item, Status, status, id)
        }
        DocumentKind::ProcedureReview => {
            update_column!(db, safety_procedure, Status, status, id)
        }
    })
}

async fn write_due_date<C: ConnectionTrait>(
    db: &C,
    kind: DocumentKind,
    id: i32,
    due_date: Date,
) -> Result<u64, DbErr> {
    Ok(match kind {
        DocumentKind::CrewCertificate => {
            update_column!(db, crew_certificate, ExpiryDate, due_date, id)
        }
        DocumentKind::VesselCertificate => {
            update_column!(db, vessel_certificate, ExpiryDate, due_date, id)
        }
        DocumentKind::MaintenanceTask => {
            update_column!(db, maintenance_task, NextDueDate, due_date, id)
        }
        DocumentKind::Audit => update_column!(db, audit, PlannedDate, due_date, id),
        DocumentKind::AuditFinding => update_column!(db, audit_finding, DueDate, due_date, id),
        DocumentKind::CorrectiveAction => {
            update_column!(db, corrective_action, DueDate, due_date, id)
        }
        DocumentKind::IsmComplianceItem => {
            update_column!(db, ism_compliance_item, NextReviewDate, Some(due_date), id)
        }
        DocumentKind::ProcedureReview => {
            update_column!(db, safety_procedure, NextReviewDate, Some(due_date), id)
        }
    })
}

/// Stamp the completion or review date of a recurring record.
async fn write_completed_on<C: ConnectionTrait>(
    db: &C,
    kind: DocumentKind,
    id: i32,
    completed_on: Date,
) -> Result<u64, DbErr> {
    Ok(match kind {
        DocumentKind::MaintenanceTask => {
            update_column!(db, maintenance_task, LastCompletedDate, Some(completed_on), id)
        }
        DocumentKind::IsmComplianceItem => {
            update_column!(db, ism_compliance_item, LastReviewedDate, Some(completed_on), id)
        }
        DocumentKind::ProcedureReview => {
            update_column!(db, safety_procedure, LastReviewedDate, Some(completed_on), id)
        }
        _ => 0,
    })
}

async fn record_status_change<C: ConnectionTrait>(
    db: &C,
    kind: DocumentKind,
    id: i32,
    previous: ComplianceStatus,
    next: ComplianceStatus,
    actor: &Actor,
) -> Result<(), DbErr> {
    status_change::ActiveModel {
        id: ActiveValue::NotSet,
        document_kind: ActiveValue::Set(kind),
        document_id: ActiveValue::Set(id),
        previous_status: ActiveValue::Set(previous),
        new_status: ActiveValue::Set(next),
        changed_by: ActiveValue::Set(actor.as_str().to_string()),
        changed_at: ActiveValue::Set(OffsetDateTime::now_utc()),
    }
    .insert(db)
    .await?;
    Ok(())
}

/// Supersede pending and resolve sent or acknowledged notifications of one document.
async fn close_notifications<C: ConnectionTrait>(
    db: &C,
    kind: DocumentKind,
    id: i32,
) -> Result<(u64, u64), DbErr> {
    let of_document = Condition::all()
        .add(notification::Column::DocumentKind.eq(kind))
        .add(notification::Column::DocumentId.eq(id));
    let superseded = notification::Entity::update_many()
        .col_expr(
            notification::Column::Status,
            Expr::value(NotificationStatus::Superseded),
        )
        .col_expr(notification::Column::DedupKey, Expr::value(Option::<String>::None))
        .filter(of_document.clone())
        .filter(notification::Column::Status.eq(NotificationStatus::Pending))
        .exec(db)
        .await?
        .rows_affected;
    let resolved = notification::Entity::update_many()
        .col_expr(
            notification::Column::Status,
            Expr::value(NotificationStatus::Resolved),
        )
        .col_expr(notification::Column::DedupKey, Expr::value(Option::<String>::None))
        .filter(of_document)
        .filter(notification::Column::Status.is_in([
            NotificationStatus::Sent,
            NotificationStatus::Acknowledged,
        ]))
        .exec(db)
        .await?
        .rows_affected;
    Ok((superseded, resolved))
}

/// Result of writing a renewal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenewalOutcome {
    pub notifications_superseded: u64,
    pub notifications_resolved: u64,
}

/// Repository over the shared database connection.
#[derive(Clone, Debug)]
pub struct ComplianceStore {
    db: Arc<DatabaseConnection>,
}

impl ComplianceStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    // ---- Documents ----

    #[tracing::instrument(skip(self))]
    pub async fn tracked_documents(
        &self,
        kind: DocumentKind,
    ) -> Result<Vec<TrackedDocument>, ComplianceError> {
        Ok(load_documents(self.db(), kind, None).await?)
    }

    pub async fn find_document(
        &self,
        kind: DocumentKind,
        id: i32,
    ) -> Result<TrackedDocument, ComplianceError> {
        load_documents(self.db(), kind, Some(id))
            .await?
            .into_iter()
            .next()
            .ok_or(ComplianceError::DocumentNotFound { kind, id })
    }

    /// Documents across kinds, optionally narrowed by kind and status.
    pub async fn list_documents(
        &self,
        kind: Option<DocumentKind>,
        status: Option<ComplianceStatus>,
    ) -> Result<Vec<TrackedDocument>, ComplianceError> {
        let kinds: Vec<DocumentKind> = match kind {
            Some(kind) => vec![kind],
            None => DocumentKind::ALL.to_vec(),
        };
        let mut documents = Vec::new();
        for kind in kinds {
            documents.extend(
                self.tracked_documents(kind)
                    .await?
                    .into_iter()
                    .filter(|d| status.is_none_or(|s| d.status == s)),
            );
        }
        Ok(documents)
    }

    /// Write a new status and its audit row atomically.
    #[tracing::instrument(skip(self, document), fields(kind = %document.kind, id = document.id))]
    pub async fn set_status(
        &self,
        document: &TrackedDocument,
        next: ComplianceStatus,
        actor: &Actor,
    ) -> Result<(), ComplianceError> {
        let txn = self.db.begin().await?;
        if write_status(&txn, document.kind, document.id, next).await? == 0 {
            return Err(ComplianceError::DocumentNotFound {
                kind: document.kind,
                id: document.id,
            });
        }
        record_status_change(&txn, document.kind, document.id, document.status, next, actor)
            .await?;
        txn.commit().await?;
        Ok(())
    }

    /// Mark a recurring record completed on `completed_on` with its audit row, atomically.
    #[tracing::instrument(skip(self, document), fields(kind = %document.kind, id = document.id))]
    pub async fn complete_cycle(
        &self,
        document: &TrackedDocument,
        completed_on: Date,
        actor: &Actor,
    ) -> Result<(), ComplianceError> {
        let txn = self.db.begin().await?;
        if write_status(&txn, document.kind, document.id, ComplianceStatus::Completed).await? == 0 {
            return Err(ComplianceError::DocumentNotFound {
                kind: document.kind,
                id: document.id,
            });
        }
        write_completed_on(&txn, document.kind, document.id, completed_on).await?;
        record_status_change(
            &txn,
            document.kind,
            document.id,
            document.status,
            ComplianceStatus::Completed,
            actor,
        )
        .await?;
        txn.commit().await?;
        Ok(())
    }

    /// Store a renewed due date, the resulting status and close the reminders of the
    /// previous cycle in one transaction.
    #[tracing::instrument(skip(self, document), fields(kind = %document.kind, id = document.id))]
    pub async fn apply_renewal(
        &self,
        document: &TrackedDocument,
        due_date: Date,
        next_status: Option<ComplianceStatus>,
        actor: &Actor,
    ) -> Result<RenewalOutcome, ComplianceError> {
        let txn = self.db.begin().await?;
        if write_due_date(&txn, document.kind, document.id, due_date).await? == 0 {
            return Err(ComplianceError::DocumentNotFound {
                kind: document.kind,
                id: document.id,
            });
        }
        if let Some(next) = next_status {
            write_status(&txn, document.kind, document.id, next).await?;
            record_status_change(&txn, document.kind, document.id, document.status, next, actor)
                .await?;
        }
        let (superseded, resolved) = close_notifications(&txn, document.kind, document.id).await?;
        txn.commit().await?;
        Ok(RenewalOutcome {
            notifications_superseded: superseded,
            notifications_resolved: resolved,
        })
    }

    // ---- Recurring records ----

    /// Completed calendar-interval tasks waiting to be rescheduled.
    pub async fn completed_recurring_tasks(
        &self,
    ) -> Result<Vec<maintenance_task::Model>, ComplianceError> {
        Ok(maintenance_task::Entity::find()
            .filter(maintenance_task::Column::Status.eq(ComplianceStatus::Completed))
            .filter(maintenance_task::Column::LastCompletedDate.is_not_null())
            .filter(maintenance_task::Column::IntervalType.ne(IntervalType::RunningHours))
            .order_by_asc(maintenance_task::Column::Id)
            .all(self.db())
            .await?)
    }

    /// ISM compliance items whose review has been completed.
    pub async fn completed_ism_reviews(
        &self,
    ) -> Result<Vec<ism_compliance_item::Model>, ComplianceError> {
        Ok(ism_compliance_item::Entity::find()
            .filter(ism_compliance_item::Column::Status.eq(ComplianceStatus::Completed))
            .filter(ism_compliance_item::Column::LastReviewedDate.is_not_null())
            .order_by_asc(ism_compliance_item::Column::Id)
            .all(self.db())
            .await?)
    }

    pub async fn completed_procedure_reviews(
        &self,
    ) -> Result<Vec<safety_procedure::Model>, ComplianceError> {
        Ok(safety_procedure::Entity::find()
            .filter(safety_procedure::Column::Status.eq(ComplianceStatus::Completed))
            .filter(safety_procedure::Column::LastReviewedDate.is_not_null())
            .order_by_asc(safety_procedure::Column::Id)
            .all(self.db())
            .await?)
    }

    /// Start the next cycle of a completed recurring record: store the new due date, make
    /// it active and close the reminders of the finished cycle, in one transaction.
    #[tracing::instrument(skip(self, actor))]
    pub async fn reschedule(
        &self,
        kind: DocumentKind,
        id: i32,
        previous: ComplianceStatus,
        next_due_date: Date,
        actor: &Actor,
    ) -> Result<RenewalOutcome, ComplianceError> {
        let txn = self.db.begin().await?;
        if write_due_date(&txn, kind, id, next_due_date).await? == 0 {
            return Err(ComplianceError::DocumentNotFound { kind, id });
        }
        write_status(&txn, kind, id, ComplianceStatus::Active).await?;
        record_status_change(&txn, kind, id, previous, ComplianceStatus::Active, actor).await?;
        let (superseded, resolved) = close_notifications(&txn, kind, id).await?;
        txn.commit().await?;
        Ok(RenewalOutcome {
            notifications_superseded: superseded,
            notifications_resolved: resolved,
        })
    }

    // ---- Notifications ----

    /// Live notifications of one kind grouped by document id.
    pub async fn live_notifications(
        &self,
        kind: DocumentKind,
    ) -> Result<HashMap<i32, Vec<notification::Model>>, ComplianceError> {
        let rows = notification::Entity::find()
            .filter(notification::Column::DocumentKind.eq(kind))
            .filter(notification::Column::Status.is_in(LIVE_STATUSES))
            .order_by_asc(notification::Column::Id)
            .all(self.db())
            .await?;
        let mut grouped: HashMap<i32, Vec<notification::Model>> = HashMap::new();
        for row in rows {
            grouped.entry(row.document_id).or_default().push(row);
        }
        Ok(grouped)
    }

    pub async fn notifications_for_document(
        &self,
        kind: DocumentKind,
        id: i32,
    ) -> Result<Vec<notification::Model>, ComplianceError> {
        Ok(notification::Entity::find()
            .filter(notification::Column::DocumentKind.eq(kind))
            .filter(notification::Column::DocumentId.eq(id))
            .order_by_asc(notification::Column::Id)
            .all(self.db())
            .await?)
    }

    pub async fn list_notifications(
        &self,
        status: Option<NotificationStatus>,
        kind: Option<DocumentKind>,
    ) -> Result<Vec<notification::Model>, ComplianceError> {
        let filter = Condition::all()
            .add_option(status.map(|s| notification::Column::Status.eq(s)))
            .add_option(kind.map(|k| notification::Column::DocumentKind.eq(k)));
        Ok(notification::Entity::find()
            .filter(filter)
            .order_by_desc(notification::Column::CreatedAt)
            .order_by_desc(notification::Column::Id)
            .all(self.db())
            .await?)
    }

    pub async fn find_notification(
        &self,
        id: i32,
    ) -> Result<notification::Model, ComplianceError> {
        notification::Entity::find_by_id(id)
            .one(self.db())
            .await?
            .ok_or(ComplianceError::NotificationNotFound(id))
    }

    /// Insert a pending notification. Returns `None` when the live slot is already taken.
    #[tracing::instrument(skip(self, planned), fields(key = %planned.dedup_key()))]
    pub async fn insert_notification(
        &self,
        planned: &PlannedNotification,
    ) -> Result<Option<notification::Model>, ComplianceError> {
        let row = notification::ActiveModel {
            id: ActiveValue::NotSet,
            document_kind: ActiveValue::Set(planned.kind),
            document_id: ActiveValue::Set(planned.document_id),
            threshold_days: ActiveValue::Set(planned.threshold_days),
            subject: ActiveValue::Set(planned.subject.clone()),
            message: ActiveValue::Set(planned.message.clone()),
            recipient: ActiveValue::Set(planned.recipient.clone()),
            status: ActiveValue::Set(NotificationStatus::Pending),
            dedup_key: ActiveValue::Set(Some(planned.dedup_key())),
            due_date: ActiveValue::Set(planned.due_date),
            created_at: ActiveValue::Set(OffsetDateTime::now_utc()),
            sent_at: ActiveValue::Set(None),
            acknowledged_at: ActiveValue::Set(None),
            acknowledged_by: ActiveValue::Set(None),
        };
        match row.insert(self.db()).await {
            Ok(model) => Ok(Some(model)),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Supersede a notification if it is still pending.
    pub async fn supersede_notification(&self, id: i32) -> Result<bool, ComplianceError> {
        let result = notification::Entity::update_many()
            .col_expr(
                notification::Column::Status,
                Expr::value(NotificationStatus::Superseded),
            )
            .col_expr(notification::Column::DedupKey, Expr::value(Option::<String>::None))
            .filter(notification::Column::Id.eq(id))
            .filter(notification::Column::Status.eq(NotificationStatus::Pending))
            .exec(self.db())
            .await?;
        Ok(result.rows_affected == 1)
    }

    /// Resolve a sent or acknowledged notification left over from an earlier due date.
    pub async fn resolve_stale_notification(&self, id: i32) -> Result<bool, ComplianceError> {
        let result = notification::Entity::update_many()
            .col_expr(
                notification::Column::Status,
                Expr::value(NotificationStatus::Resolved),
            )
            .col_expr(notification::Column::DedupKey, Expr::value(Option::<String>::None))
            .filter(notification::Column::Id.eq(id))
            .filter(notification::Column::Status.is_in([
                NotificationStatus::Sent,
                NotificationStatus::Acknowledged,
            ]))
            .exec(self.db())
            .await?;
        Ok(result.rows_affected == 1)
    }

    /// Pending notifications that have somewhere to go.
    pub async fn pending_deliveries(&self) -> Result<Vec<notification::Model>, ComplianceError> {
        Ok(notification::Entity::find()
            .filter(notification::Column::Status.eq(NotificationStatus::Pending))
            .filter(notification::Column::Recipient.is_not_null())
            .order_by_asc(notification::Column::Id)
            .all(self.db())
            .await?)
    }

    /// Mark a notification sent and log the email in one transaction.
    ///
    /// Returns `false` and logs nothing when the row stopped being pending while the email
    /// was in flight, e.g. because it was acknowledged or the document was renewed.
    #[tracing::instrument(skip(self, sent), fields(notification_id = sent.id))]
    pub async fn mark_sent(
        &self,
        sent: &notification::Model,
        recipient: &str,
        at: OffsetDateTime,
    ) -> Result<bool, ComplianceError> {
        let txn = self.db.begin().await?;
        let updated = notification::Entity::update_many()
            .col_expr(
                notification::Column::Status,
                Expr::value(NotificationStatus::Sent),
            )
            .col_expr(notification::Column::SentAt, Expr::value(at))
            .filter(notification::Column::Id.eq(sent.id))
            .filter(notification::Column::Status.eq(NotificationStatus::Pending))
            .exec(&txn)
            .await?
            .rows_affected;
        if updated == 0 {
            txn.rollback().await?;
            return Ok(false);
        }
        email_log::ActiveModel {
            id: ActiveValue::NotSet,
            notification_id: ActiveValue::Set(sent.id),
            recipient: ActiveValue::Set(recipient.to_string()),
            subject: ActiveValue::Set(sent.subject.clone()),
            sent_at: ActiveValue::Set(at),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;
        Ok(true)
    }

    pub async fn mark_acknowledged(
        &self,
        row: notification::Model,
        actor: &Actor,
        at: OffsetDateTime,
    ) -> Result<notification::Model, ComplianceError> {
        let mut active: notification::ActiveModel = row.into();
        active.status = ActiveValue::Set(NotificationStatus::Acknowledged);
        active.acknowledged_at = ActiveValue::Set(Some(at));
        active.acknowledged_by = ActiveValue::Set(Some(actor.as_str().to_string()));
        Ok(active.update(self.db()).await?)
    }

    pub async fn mark_resolved(
        &self,
        row: notification::Model,
    ) -> Result<notification::Model, ComplianceError> {
        let mut active: notification::ActiveModel = row.into();
        active.status = ActiveValue::Set(NotificationStatus::Resolved);
        active.dedup_key = ActiveValue::Set(None);
        Ok(active.update(self.db()).await?)
    }

    pub async fn email_log_for(
        &self,
        notification_id: i32,
    ) -> Result<Vec<email_log::Model>, ComplianceError> {
        Ok(email_log::Entity::find()
            .filter(email_log::Column::NotificationId.eq(notification_id))
            .order_by_asc(email_log::Column::Id)
            .all(self.db())
            .await?)
    }

    pub async fn status_history(
        &self,
        kind: DocumentKind,
        id: i32,
    ) -> Result<Vec<status_change::Model>, ComplianceError> {
        Ok(status_change::Entity::find()
            .filter(status_change::Column::DocumentKind.eq(kind))
            .filter(status_change::Column::DocumentId.eq(id))
            .order_by_asc(status_change::Column::Id)
            .all(self.db())
            .await?)
    }
}
