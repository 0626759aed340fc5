//! Billed line items attached to a ledger entry.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One billed item of a multi-item entry or invoice.
///
/// `rate_minor` is informational (display only); `amount_minor` is what the
/// balance math sees, via the owning record's totals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub rate_minor: i64,
    pub tax_rate_bps: i32,
    pub amount_minor: i64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "entry_line_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub entry_id: String,
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
        belongs_to = "super::entries::Entity",
        from = "Column::EntryId",
        to = "super::entries::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Entries,
}

impl Related<super::entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
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

/// Builds the row to insert for one line item of a persisted entry.
pub(crate) fn active_model(entry_id: Uuid, position: i32, item: &LineItem) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4().to_string()),
        entry_id: ActiveValue::Set(entry_id.to_string()),
        position: ActiveValue::Set(position),
        description: ActiveValue::Set(item.description.clone()),
        quantity: ActiveValue::Set(item.quantity),
        rate_minor: ActiveValue::Set(item.rate_minor),
        tax_rate_bps: ActiveValue::Set(item.tax_rate_bps),
        amount_minor: ActiveValue::Set(item.amount_minor),
    }
}
