use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Notifications, the email log and the status change audit trail.
///
/// `notification.dedup_key` is unique: at most one live notification per document and
/// threshold. Resolved and superseded rows set it to NULL, which the index ignores.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notification::Table)
                    .if_not_exists()
                    .col(pk_auto(Notification::Id))
                    .col(string_len(Notification::DocumentKind, 32))
                    .col(integer(Notification::DocumentId))
                    .col(integer(Notification::ThresholdDays))
                    .col(string(Notification::Subject))
                    .col(text(Notification::Message))
                    .col(string_null(Notification::Recipient))
                    .col(string_len(Notification::Status, 15).default("pending"))
                    .col(string_null(Notification::DedupKey))
                    .col(date(Notification::DueDate))
                    .col(
                        timestamp_with_time_zone(Notification::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(Notification::SentAt))
                    .col(timestamp_with_time_zone_null(Notification::AcknowledgedAt))
                    .col(string_null(Notification::AcknowledgedBy))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notification_dedup_key")
                    .table(Notification::Table)
                    .col(Notification::DedupKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notification_document")
                    .table(Notification::Table)
                    .col(Notification::DocumentKind)
                    .col(Notification::DocumentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notification_status")
                    .table(Notification::Table)
                    .col(Notification::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmailLog::Table)
                    .if_not_exists()
                    .col(pk_auto(EmailLog::Id))
                    .col(integer(EmailLog::NotificationId))
                    .col(string(EmailLog::Recipient))
                    .col(string(EmailLog::Subject))
                    .col(
                        timestamp_with_time_zone(EmailLog::SentAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_email_log_notification")
                            .from(EmailLog::Table, EmailLog::NotificationId)
                            .to(Notification::Table, Notification::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_email_log_notification_id")
                    .table(EmailLog::Table)
                    .col(EmailLog::NotificationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StatusChange::Table)
                    .if_not_exists()
                    .col(pk_auto(StatusChange::Id))
                    .col(string_len(StatusChange::DocumentKind, 32))
                    .col(integer(StatusChange::DocumentId))
                    .col(string_len(StatusChange::PreviousStatus, 20))
                    .col(string_len(StatusChange::NewStatus, 20))
                    .col(string(StatusChange::ChangedBy))
                    .col(
                        timestamp_with_time_zone(StatusChange::ChangedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_status_change_document")
                    .table(StatusChange::Table)
                    .col(StatusChange::DocumentKind)
                    .col(StatusChange::DocumentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StatusChange::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EmailLog::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notification::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Notification {
    Table,
    Id,
    DocumentKind,
    DocumentId,
    ThresholdDays,
    Subject,
    Message,
    Recipient,
    Status,
    DedupKey,
    DueDate,
    CreatedAt,
    SentAt,
    AcknowledgedAt,
    AcknowledgedBy,
}

#[derive(Iden)]
pub enum EmailLog {
    Table,
    Id,
    NotificationId,
    Recipient,
    Subject,
    SentAt,
}

#[derive(Iden)]
pub enum StatusChange {
    Table,
    Id,
    DocumentKind,
    DocumentId,
    PreviousStatus,
    NewStatus,
    ChangedBy,
    ChangedAt,
}
