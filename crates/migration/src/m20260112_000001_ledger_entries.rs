use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum LedgerEntries {
    Table,
    Id,
    CustomerId,
    EntryDate,
    CreatedAt,
    EntryNo,
    Description,
    BillReference,
    DebitMinor,
    CreditMinor,
    BalanceMinor,
    DaySequence,
    Status,
    DueDate,
    PaymentMode,
    TaxRateBps,
    TaxMinor,
}

#[derive(Iden)]
enum EntryLineItems {
    Table,
    Id,
    EntryId,
    Position,
    Description,
    Quantity,
    RateMinor,
    TaxRateBps,
    AmountMinor,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LedgerEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LedgerEntries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::CustomerId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LedgerEntries::EntryDate).date().not_null())
                    .col(
                        ColumnDef::new(LedgerEntries::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::EntryNo)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::Description)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LedgerEntries::BillReference).string())
                    .col(
                        ColumnDef::new(LedgerEntries::DebitMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::CreditMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::BalanceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::DaySequence)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LedgerEntries::Status).string().not_null())
                    .col(ColumnDef::new(LedgerEntries::DueDate).date())
                    .col(ColumnDef::new(LedgerEntries::PaymentMode).string())
                    .col(
                        ColumnDef::new(LedgerEntries::TaxRateBps)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::TaxMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_entries-customer_id-entry_date")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::CustomerId)
                    .col(LedgerEntries::EntryDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_entries-customer_id-created_at")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::CustomerId)
                    .col(LedgerEntries::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EntryLineItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EntryLineItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EntryLineItems::EntryId).string().not_null())
                    .col(
                        ColumnDef::new(EntryLineItems::Position)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EntryLineItems::Description)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EntryLineItems::Quantity).double().not_null())
                    .col(
                        ColumnDef::new(EntryLineItems::RateMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EntryLineItems::TaxRateBps)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EntryLineItems::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-entry_line_items-entry_id")
                            .from(EntryLineItems::Table, EntryLineItems::EntryId)
                            .to(LedgerEntries::Table, LedgerEntries::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-entry_line_items-entry_id")
                    .table(EntryLineItems::Table)
                    .col(EntryLineItems::EntryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EntryLineItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LedgerEntries::Table).to_owned())
            .await?;
        Ok(())
    }
}
