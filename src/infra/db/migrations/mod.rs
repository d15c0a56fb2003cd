//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240301_000001_create_people_tables;
mod m20240301_000002_create_workshop_tables;
mod m20240301_000003_create_billing_tables;
mod m20240301_000004_create_audit_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_people_tables::Migration),
            Box::new(m20240301_000002_create_workshop_tables::Migration),
            Box::new(m20240301_000003_create_billing_tables::Migration),
            Box::new(m20240301_000004_create_audit_table::Migration),
        ]
    }
}
