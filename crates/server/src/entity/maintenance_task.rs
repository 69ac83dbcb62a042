//! Planned maintenance tasks for vessel equipment.

use sea_orm::entity::prelude::*;
use serde::Serialize;
use time::{Date, OffsetDateTime};
use utoipa::ToSchema;

use super::status::{ComplianceStatus, IntervalType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "maintenance_task")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vessel_id: i32,
    pub task_name: String,
    pub equipment_name: String,
    pub interval_type: IntervalType,
    /// Multiplier for `interval_type` (days for `custom_days`, hours for `running_hours`).
    pub interval_value: i32,
    pub last_completed_date: Option<Date>,
    pub next_due_date: Date,
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
