//! Certificates held by individual crew members (competency, STCW, medical, ...).

use sea_orm::entity::prelude::*;
use serde::Serialize;
use time::{Date, OffsetDateTime};
use utoipa::ToSchema;

use super::status::ComplianceStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "crew_certificate")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub crew_member_id: i32,
    pub certificate_type: String,
    pub certificate_name: String,
    pub certificate_number: String,
    pub issue_date: Date,
    pub expiry_date: Date,
    pub issuing_authority: String,
    pub status: ComplianceStatus,
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::crew_member::Entity",
        from = "Column::CrewMemberId",
        to = "super::crew_member::Column::Id",
        on_delete = "Cascade"
    )]
    CrewMember,
}

impl Related<super::crew_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CrewMember.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
