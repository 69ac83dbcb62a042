//! Safety procedures and manuals from the safety management system, reviewed at a fixed
//! interval.

use sea_orm::entity::prelude::*;
use serde::Serialize;
use time::{Date, OffsetDateTime};
use utoipa::ToSchema;

use super::status::ComplianceStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "safety_procedure")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub document_type: String,
    pub category: String,
    pub version: String,
    pub review_interval_months: i32,
    pub last_reviewed_date: Option<Date>,
    pub next_review_date: Option<Date>,
    pub owner_email: Option<String>,
    pub status: ComplianceStatus,
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
