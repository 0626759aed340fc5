//! Adds entry-kind tagging to the ledger store.
//!
//! Deployments that have not run this migration keep working: the engine
//! probes for the column at startup and falls back to reference-only
//! deduplication and untagged inserts.

use sea_orm_migration::prelude::*;

use crate::m20260112_000001_ledger_entries::LedgerEntries;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum NewColumns {
    EntryKind,
    PrincipalEntryId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One column per alter statement for sqlite compatibility.
        manager
            .alter_table(
                Table::alter()
                    .table(LedgerEntries::Table)
                    .add_column(ColumnDef::new(NewColumns::EntryKind).string())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(LedgerEntries::Table)
                    .add_column(ColumnDef::new(NewColumns::PrincipalEntryId).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_entries-principal_entry_id")
                    .table(LedgerEntries::Table)
                    .col(NewColumns::PrincipalEntryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx-ledger_entries-principal_entry_id")
                    .table(LedgerEntries::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(LedgerEntries::Table)
                    .drop_column(NewColumns::EntryKind)
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(LedgerEntries::Table)
                    .drop_column(NewColumns::PrincipalEntryId)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
