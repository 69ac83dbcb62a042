//! Expiry and due-date notifications raised for tracked documents.
//!
//! A notification is *live* while it is pending, sent or acknowledged. Live rows carry a
//! `dedup_key` of the form `"{kind}:{document_id}:{threshold_days}"`, which is unique in the
//! schema; resolving or superseding a notification clears it so the slot can be reused.

use sea_orm::entity::prelude::*;
use serde::Serialize;
use time::{Date, OffsetDateTime};
use utoipa::ToSchema;

use super::status::{DocumentKind, NotificationStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "notification")]
#[schema(as = Notification)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub document_kind: DocumentKind,
    pub document_id: i32,
    /// Days-before-due bucket; 0 means the document has lapsed.
    pub threshold_days: i32,
    pub subject: String,
    pub message: String,
    pub recipient: Option<String>,
    pub status: NotificationStatus,
    #[serde(skip_serializing)]
    #[sea_orm(unique)]
    pub dedup_key: Option<String>,
    pub due_date: Date,
    pub created_at: OffsetDateTime,
    pub sent_at: Option<OffsetDateTime>,
    pub acknowledged_at: Option<OffsetDateTime>,
    pub acknowledged_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Key occupying the unique live slot for a document and threshold.
pub fn dedup_key(kind: DocumentKind, document_id: i32, threshold_days: i32) -> String {
    format!("{kind}:{document_id}:{threshold_days}")
}
