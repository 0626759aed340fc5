use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Invoices {
    Table,
    Id,
    CustomerId,
    BillReference,
    Kind,
    PoReference,
    IssuedOn,
    CreatedAt,
    DueDate,
    SubtotalMinor,
    TaxRateBps,
    TaxMinor,
    TotalMinor,
    Status,
}

#[derive(Iden)]
enum InvoiceLineItems {
    Table,
    Id,
    InvoiceId,
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
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invoices::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Invoices::CustomerId).string().not_null())
                    .col(ColumnDef::new(Invoices::BillReference).string().not_null())
                    .col(ColumnDef::new(Invoices::Kind).string().not_null())
                    .col(ColumnDef::new(Invoices::PoReference).string())
                    .col(ColumnDef::new(Invoices::IssuedOn).date().not_null())
                    .col(ColumnDef::new(Invoices::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Invoices::DueDate).date())
                    .col(
                        ColumnDef::new(Invoices::SubtotalMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Invoices::TaxRateBps)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Invoices::TaxMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Invoices::TotalMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Invoices::Status).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-invoices-customer_id-issued_on")
                    .table(Invoices::Table)
                    .col(Invoices::CustomerId)
                    .col(Invoices::IssuedOn)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InvoiceLineItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvoiceLineItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InvoiceLineItems::InvoiceId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvoiceLineItems::Position)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvoiceLineItems::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvoiceLineItems::Quantity)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvoiceLineItems::RateMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvoiceLineItems::TaxRateBps)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(InvoiceLineItems::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-invoice_line_items-invoice_id")
                            .from(InvoiceLineItems::Table, InvoiceLineItems::InvoiceId)
                            .to(Invoices::Table, Invoices::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-invoice_line_items-invoice_id")
                    .table(InvoiceLineItems::Table)
                    .col(InvoiceLineItems::InvoiceId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InvoiceLineItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invoices::Table).to_owned())
            .await?;
        Ok(())
    }
}
