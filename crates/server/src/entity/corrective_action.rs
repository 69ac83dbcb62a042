use sea_orm::entity::prelude::*;
use serde::Serialize;
use time::{Date, OffsetDateTime};
use utoipa::ToSchema;

use super::status::ComplianceStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "corrective_action")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub non_conformity_id: i32,
    pub description: String,
    pub assigned_to_email: Option<String>,
    pub due_date: Date,
    pub completed_date: Option<Date>,
    pub status: ComplianceStatus,
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::non_conformity::Entity",
        from = "Column::NonConformityId",
        to = "super::non_conformity::Column::Id",
        on_delete = "Cascade"
    )]
    NonConformity,
}

impl Related<super::non_conformity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NonConformity.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
