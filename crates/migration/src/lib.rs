pub use sea_orm_migration::prelude::*;

mod m20260112_000001_ledger_entries;
mod m20260112_000002_invoices;
mod m20260215_000001_entry_kind_tags;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260112_000001_ledger_entries::Migration),
            Box::new(m20260112_000002_invoices::Migration),
            Box::new(m20260215_000001_entry_kind_tags::Migration),
        ]
    }
}
