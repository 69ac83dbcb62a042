use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn status_index<T, C>(name: &str, table: T, column: C) -> IndexCreateStatement
where
    T: Iden + 'static,
    C: Iden + 'static,
{
    Index::create().name(name).table(table).col(column).to_owned()
}

/// Owners and tracked documents: vessels, crew, certificates, maintenance, audits and
/// non-conformities with their corrective actions.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vessel::Table)
                    .if_not_exists()
                    .col(pk_auto(Vessel::Id))
                    .col(string(Vessel::Name))
                    .col(string_uniq(Vessel::ImoNumber))
                    .col(string(Vessel::Flag))
                    .col(string(Vessel::VesselType))
                    .col(string_null(Vessel::ContactEmail))
                    .col(boolean(Vessel::IsActive).default(true))
                    .col(
                        timestamp_with_time_zone(Vessel::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CrewMember::Table)
                    .if_not_exists()
                    .col(pk_auto(CrewMember::Id))
                    .col(string(CrewMember::Name))
                    .col(string(CrewMember::Rank))
                    .col(string(CrewMember::Nationality))
                    .col(string(CrewMember::Email))
                    .col(boolean(CrewMember::IsActive).default(true))
                    .col(
                        timestamp_with_time_zone(CrewMember::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CrewCertificate::Table)
                    .if_not_exists()
                    .col(pk_auto(CrewCertificate::Id))
                    .col(integer(CrewCertificate::CrewMemberId))
                    .col(string(CrewCertificate::CertificateType))
                    .col(string(CrewCertificate::CertificateName))
                    .col(string(CrewCertificate::CertificateNumber))
                    .col(date(CrewCertificate::IssueDate))
                    .col(date(CrewCertificate::ExpiryDate))
                    .col(string(CrewCertificate::IssuingAuthority))
                    .col(string_len(CrewCertificate::Status, 20).default("active"))
                    .col(
                        timestamp_with_time_zone(CrewCertificate::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_crew_certificate_crew_member")
                            .from(CrewCertificate::Table, CrewCertificate::CrewMemberId)
                            .to(CrewMember::Table, CrewMember::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VesselCertificate::Table)
                    .if_not_exists()
                    .col(pk_auto(VesselCertificate::Id))
                    .col(integer(VesselCertificate::VesselId))
                    .col(string(VesselCertificate::CertificateType))
                    .col(string(VesselCertificate::CertificateName))
                    .col(string_uniq(VesselCertificate::CertificateNumber))
                    .col(date(VesselCertificate::IssueDate))
                    .col(date(VesselCertificate::ExpiryDate))
                    .col(string(VesselCertificate::IssuingAuthority))
                    .col(string_len(VesselCertificate::Status, 20).default("active"))
                    .col(
                        timestamp_with_time_zone(VesselCertificate::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vessel_certificate_vessel")
                            .from(VesselCertificate::Table, VesselCertificate::VesselId)
                            .to(Vessel::Table, Vessel::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MaintenanceTask::Table)
                    .if_not_exists()
                    .col(pk_auto(MaintenanceTask::Id))
                    .col(integer(MaintenanceTask::VesselId))
                    .col(string(MaintenanceTask::TaskName))
                    .col(string(MaintenanceTask::EquipmentName))
                    .col(string_len(MaintenanceTask::IntervalType, 20))
                    .col(integer(MaintenanceTask::IntervalValue).default(1))
                    .col(date_null(MaintenanceTask::LastCompletedDate))
                    .col(date(MaintenanceTask::NextDueDate))
                    .col(string_len(MaintenanceTask::Status, 20).default("active"))
                    .col(
                        timestamp_with_time_zone(MaintenanceTask::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_maintenance_task_vessel")
                            .from(MaintenanceTask::Table, MaintenanceTask::VesselId)
                            .to(Vessel::Table, Vessel::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Audit::Table)
                    .if_not_exists()
                    .col(pk_auto(Audit::Id))
                    .col(integer(Audit::VesselId))
                    .col(string(Audit::AuditType))
                    .col(date(Audit::PlannedDate))
                    .col(string(Audit::AuditorEmail))
                    .col(string_len(Audit::Status, 20).default("active"))
                    .col(
                        timestamp_with_time_zone(Audit::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_audit_vessel")
                            .from(Audit::Table, Audit::VesselId)
                            .to(Vessel::Table, Vessel::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AuditFinding::Table)
                    .if_not_exists()
                    .col(pk_auto(AuditFinding::Id))
                    .col(integer(AuditFinding::AuditId))
                    .col(text(AuditFinding::Description))
                    .col(string(AuditFinding::Severity))
                    .col(date_null(AuditFinding::DueDate))
                    .col(string_null(AuditFinding::AssignedToEmail))
                    .col(string_len(AuditFinding::Status, 20).default("active"))
                    .col(
                        timestamp_with_time_zone(AuditFinding::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_audit_finding_audit")
                            .from(AuditFinding::Table, AuditFinding::AuditId)
                            .to(Audit::Table, Audit::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NonConformity::Table)
                    .if_not_exists()
                    .col(pk_auto(NonConformity::Id))
                    .col(integer(NonConformity::VesselId))
                    .col(text(NonConformity::Description))
                    .col(string(NonConformity::Severity))
                    .col(date(NonConformity::DetectionDate))
                    .col(string(NonConformity::Status).default("open"))
                    .col(
                        timestamp_with_time_zone(NonConformity::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_non_conformity_vessel")
                            .from(NonConformity::Table, NonConformity::VesselId)
                            .to(Vessel::Table, Vessel::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CorrectiveAction::Table)
                    .if_not_exists()
                    .col(pk_auto(CorrectiveAction::Id))
                    .col(integer(CorrectiveAction::NonConformityId))
                    .col(text(CorrectiveAction::Description))
                    .col(string_null(CorrectiveAction::AssignedToEmail))
                    .col(date(CorrectiveAction::DueDate))
                    .col(date_null(CorrectiveAction::CompletedDate))
                    .col(string_len(CorrectiveAction::Status, 20).default("active"))
                    .col(
                        timestamp_with_time_zone(CorrectiveAction::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_corrective_action_non_conformity")
                            .from(CorrectiveAction::Table, CorrectiveAction::NonConformityId)
                            .to(NonConformity::Table, NonConformity::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The daily batch filters each table by status.
        manager
            .create_index(status_index(
                "idx_crew_certificate_status",
                CrewCertificate::Table,
                CrewCertificate::Status,
            ))
            .await?;
        manager
            .create_index(status_index(
                "idx_vessel_certificate_status",
                VesselCertificate::Table,
                VesselCertificate::Status,
            ))
            .await?;
        manager
            .create_index(status_index(
                "idx_maintenance_task_status",
                MaintenanceTask::Table,
                MaintenanceTask::Status,
            ))
            .await?;
        manager
            .create_index(status_index("idx_audit_status", Audit::Table, Audit::Status))
            .await?;
        manager
            .create_index(status_index(
                "idx_audit_finding_status",
                AuditFinding::Table,
                AuditFinding::Status,
            ))
            .await?;
        manager
            .create_index(status_index(
                "idx_corrective_action_status",
                CorrectiveAction::Table,
                CorrectiveAction::Status,
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CorrectiveAction::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(NonConformity::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AuditFinding::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Audit::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MaintenanceTask::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VesselCertificate::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CrewCertificate::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CrewMember::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vessel::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Vessel {
    Table,
    Id,
    Name,
    ImoNumber,
    Flag,
    VesselType,
    ContactEmail,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
pub enum CrewMember {
    Table,
    Id,
    Name,
    Rank,
    Nationality,
    Email,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
pub enum CrewCertificate {
    Table,
    Id,
    CrewMemberId,
    CertificateType,
    CertificateName,
    CertificateNumber,
    IssueDate,
    ExpiryDate,
    IssuingAuthority,
    Status,
    CreatedAt,
}

#[derive(Iden)]
pub enum VesselCertificate {
    Table,
    Id,
    VesselId,
    CertificateType,
    CertificateName,
    CertificateNumber,
    IssueDate,
    ExpiryDate,
    IssuingAuthority,
    Status,
    CreatedAt,
}

#[derive(Iden)]
pub enum MaintenanceTask {
    Table,
    Id,
    VesselId,
    TaskName,
    EquipmentName,
    IntervalType,
    IntervalValue,
    LastCompletedDate,
    NextDueDate,
    Status,
    CreatedAt,
}

#[derive(Iden)]
pub enum Audit {
    Table,
    Id,
    VesselId,
    AuditType,
    PlannedDate,
    AuditorEmail,
    Status,
    CreatedAt,
}

#[derive(Iden)]
pub enum AuditFinding {
    Table,
    Id,
    AuditId,
    Description,
    Severity,
    DueDate,
    AssignedToEmail,
    Status,
    CreatedAt,
}

#[derive(Iden)]
pub enum NonConformity {
    Table,
    Id,
    VesselId,
    Description,
    Severity,
    DetectionDate,
    Status,
    CreatedAt,
}

#[derive(Iden)]
pub enum CorrectiveAction {
    Table,
    Id,
    NonConformityId,
    Description,
    AssignedToEmail,
    DueDate,
    CompletedDate,
    Status,
    CreatedAt,
}
