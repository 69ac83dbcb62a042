//! Per-recipient log of every notification email that left the system.
//!
//! Records the address, subject and time of each delivery. Failed sends are not logged
//! here; they leave the notification pending and show up in the service logs.
//! For status transitions of the documents themselves, see [`crate::entity::status_change`].

use sea_orm::entity::prelude::*;
use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "email_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub notification_id: i32,
    pub recipient: String,
    pub subject: String,
    pub sent_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
