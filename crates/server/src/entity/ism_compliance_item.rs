//! A vessel's standing against one ISM Code requirement, reviewed on a risk-based cycle.

use sea_orm::entity::prelude::*;
use serde::Serialize;
use time::{Date, OffsetDateTime};
use utoipa::ToSchema;

use super::status::{ComplianceStatus, RiskLevel};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "ism_compliance_item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vessel_id: i32,
    /// ISM Code clause, e.g. `10.2`.
    pub requirement_code: String,
    pub requirement_title: String,
    pub risk_level: RiskLevel,
    pub last_reviewed_date: Option<Date>,
    pub next_review_date: Option<Date>,
    pub assessor_email: Option<String>,
    pub status: ComplianceStatus,
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vessel::Entity",
        from = "Column::VesselId",
        to = "super::vessel::Column::Id",
        on_delete = "Cascade"
    )]
    Vessel,
}

impl Related<super::vessel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vessel.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
