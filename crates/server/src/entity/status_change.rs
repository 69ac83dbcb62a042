use sea_orm::entity::prelude::*;
use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

use super::status::{ComplianceStatus, DocumentKind};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "status_change")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub document_kind: DocumentKind,
    pub document_id: i32,
    pub previous_status: ComplianceStatus,
    pub new_status: ComplianceStatus,
    /// Service account or user that caused the change.
    pub changed_by: String,
    pub changed_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
