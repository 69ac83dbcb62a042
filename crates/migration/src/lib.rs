pub use sea_orm_migration::prelude::*;

mod m20261001_000000_create_fleet_tables;
mod m20261001_000001_create_notification_tables;
mod m20261015_000000_add_review_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000000_create_fleet_tables::Migration),
            Box::new(m20261001_000001_create_notification_tables::Migration),
            Box::new(m20261015_000000_add_review_tables::Migration),
        ]
    }
}
