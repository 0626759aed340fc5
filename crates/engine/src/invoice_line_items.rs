//! Billed line items attached to a source document.

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::LineItem;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invoice_line_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub invoice_id: String,
    pub position: i32,
    pub description: String,
    #[sea_orm(column_type = "Double")]
    pub quantity: f64,
    pub rate_minor: i64,
    pub tax_rate_bps: i32,
    pub amount_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::invoices::Entity",
        from = "Column::InvoiceId",
        to = "super::invoices::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Invoices,
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LineItem {
    fn from(model: Model) -> Self {
        Self {
            description: model.description,
            quantity: model.quantity,
            rate_minor: model.rate_minor,
            tax_rate_bps: model.tax_rate_bps,
            amount_minor: model.amount_minor,
        }
    }
}

/// Builds the row to insert for one line item of an invoice document.
pub(crate) fn active_model(invoice_id: Uuid, position: i32, item: &LineItem) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4().to_string()),
        invoice_id: ActiveValue::Set(invoice_id.to_string()),
        position: ActiveValue::Set(position),
        description: ActiveValue::Set(item.description.clone()),
        quantity: ActiveValue::Set(item.quantity),
        rate_minor: ActiveValue::Set(item.rate_minor),
        tax_rate_bps: ActiveValue::Set(item.tax_rate_bps),
        amount_minor: ActiveValue::Set(item.amount_minor),
    }
}
