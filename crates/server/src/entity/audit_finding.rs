use sea_orm::entity::prelude::*;
use serde::Serialize;
use time::{Date, OffsetDateTime};
use utoipa::ToSchema;

use super::status::ComplianceStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "audit_finding")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub audit_id: i32,
    pub description: String,
    pub severity: String, // "critical", "major", "minor", "observation"
    /// Findings may be recorded before a due date is agreed.
    pub due_date: Option<Date>,
    pub assigned_to_email: Option<String>,
    pub status: ComplianceStatus,
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::audit::Entity",
        from = "Column::AuditId",
        to = "super::audit::Column::Id",
        on_delete = "Cascade"
    )]
    Audit,
}

impl Related<super::audit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Audit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
