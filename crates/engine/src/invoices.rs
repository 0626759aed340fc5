//! Source documents: sales invoices and purchase-order invoices.
//!
//! One table serves both streams; `kind` discriminates. The reconciliation
//! core consumes these rows as a read-only projection and derives ledger
//! entries from them on every read.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, EntryStatus, LineItem};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Sales,
    Purchase,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::Purchase => "purchase",
        }
    }
}

impl TryFrom<&str> for DocumentKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "sales" => Ok(Self::Sales),
            "purchase" => Ok(Self::Purchase),
            other => Err(EngineError::Validation(format!(
                "invalid document kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub id: Uuid,
    pub customer_id: String,
    pub bill_reference: String,
    pub kind: DocumentKind,
    /// Purchase-order reference, carried by PO-derived invoices only.
    pub po_reference: Option<String>,
    pub issued_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    pub subtotal_minor: i64,
    pub tax_rate_bps: i32,
    pub tax_minor: i64,
    pub total_minor: i64,
    pub status: EntryStatus,
    pub line_items: Vec<LineItem>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub customer_id: String,
    pub bill_reference: String,
    pub kind: String,
    pub po_reference: Option<String>,
    pub issued_on: Date,
    pub created_at: DateTimeUtc,
    pub due_date: Option<Date>,
    pub subtotal_minor: i64,
    pub tax_rate_bps: i32,
    pub tax_minor: i64,
    pub total_minor: i64,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::invoice_line_items::Entity")]
    LineItems,
}

impl Related<super::invoice_line_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LineItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&SourceDocument> for ActiveModel {
    fn from(doc: &SourceDocument) -> Self {
        Self {
            id: ActiveValue::Set(doc.id.to_string()),
            customer_id: ActiveValue::Set(doc.customer_id.clone()),
            bill_reference: ActiveValue::Set(doc.bill_reference.clone()),
            kind: ActiveValue::Set(doc.kind.as_str().to_string()),
            po_reference: ActiveValue::Set(doc.po_reference.clone()),
            issued_on: ActiveValue::Set(doc.issued_on),
            created_at: ActiveValue::Set(doc.created_at),
            due_date: ActiveValue::Set(doc.due_date),
            subtotal_minor: ActiveValue::Set(doc.subtotal_minor),
            tax_rate_bps: ActiveValue::Set(doc.tax_rate_bps),
            tax_minor: ActiveValue::Set(doc.tax_minor),
            total_minor: ActiveValue::Set(doc.total_minor),
            status: ActiveValue::Set(doc.status.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for SourceDocument {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: crate::util::parse_uuid(&model.id, "invoice")?,
            customer_id: model.customer_id,
            bill_reference: model.bill_reference,
            kind: DocumentKind::try_from(model.kind.as_str())?,
            po_reference: model.po_reference,
            issued_on: model.issued_on,
            created_at: model.created_at,
            due_date: model.due_date,
            subtotal_minor: model.subtotal_minor,
            tax_rate_bps: model.tax_rate_bps,
            tax_minor: model.tax_minor,
            total_minor: model.total_minor,
            status: EntryStatus::try_from(model.status.as_str())?,
            line_items: Vec::new(),
        })
    }
}
