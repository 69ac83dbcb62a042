use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261001_000000_create_fleet_tables::Vessel;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Review schedules from the safety management system: ISM compliance items per vessel
/// and fleet-wide safety procedures.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IsmComplianceItem::Table)
                    .if_not_exists()
                    .col(pk_auto(IsmComplianceItem::Id))
                    .col(integer(IsmComplianceItem::VesselId))
                    .col(string_len(IsmComplianceItem::RequirementCode, 20))
                    .col(string(IsmComplianceItem::RequirementTitle))
                    .col(string_len(IsmComplianceItem::RiskLevel, 10).default("medium"))
                    .col(date_null(IsmComplianceItem::LastReviewedDate))
                    .col(date_null(IsmComplianceItem::NextReviewDate))
                    .col(string_null(IsmComplianceItem::AssessorEmail))
                    .col(string_len(IsmComplianceItem::Status, 20).default("active"))
                    .col(
                        timestamp_with_time_zone(IsmComplianceItem::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ism_compliance_item_vessel")
                            .from(IsmComplianceItem::Table, IsmComplianceItem::VesselId)
                            .to(Vessel::Table, Vessel::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One assessment per requirement and vessel.
        manager
            .create_index(
                Index::create()
                    .name("idx_ism_compliance_item_vessel_requirement")
                    .table(IsmComplianceItem::Table)
                    .col(IsmComplianceItem::VesselId)
                    .col(IsmComplianceItem::RequirementCode)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_ism_compliance_item_status")
                    .table(IsmComplianceItem::Table)
                    .col(IsmComplianceItem::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SafetyProcedure::Table)
                    .if_not_exists()
                    .col(pk_auto(SafetyProcedure::Id))
                    .col(string(SafetyProcedure::Title))
                    .col(string_len(SafetyProcedure::DocumentType, 20))
                    .col(string(SafetyProcedure::Category))
                    .col(string_len(SafetyProcedure::Version, 20))
                    .col(integer(SafetyProcedure::ReviewIntervalMonths).default(12))
                    .col(date_null(SafetyProcedure::LastReviewedDate))
                    .col(date_null(SafetyProcedure::NextReviewDate))
                    .col(string_null(SafetyProcedure::OwnerEmail))
                    .col(string_len(SafetyProcedure::Status, 20).default("active"))
                    .col(
                        timestamp_with_time_zone(SafetyProcedure::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_safety_procedure_status")
                    .table(SafetyProcedure::Table)
                    .col(SafetyProcedure::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SafetyProcedure::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IsmComplianceItem::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum IsmComplianceItem {
    Table,
    Id,
    VesselId,
    RequirementCode,
    RequirementTitle,
    RiskLevel,
    LastReviewedDate,
    NextReviewDate,
    AssessorEmail,
    Status,
    CreatedAt,
}

#[derive(Iden)]
pub enum SafetyProcedure {
    Table,
    Id,
    Title,
    DocumentType,
    Category,
    Version,
    ReviewIntervalMonths,
    LastReviewedDate,
    NextReviewDate,
    OwnerEmail,
    Status,
    CreatedAt,
}
