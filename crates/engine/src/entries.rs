//! Ledger entry primitives.
//!
//! A `LedgerEntry` is one line of a customer's statement: a single debit or
//! credit amount plus the running balance after it. Entries are either
//! persisted rows of `ledger_entries` or derived on read from invoice
//! documents (never stored).

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, QueryResult, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DaySequence, EngineError, LineItem, ResultEngine};

/// Which side of the ledger an amount lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySide {
    Debit,
    Credit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Manual,
    Invoice,
    InvoiceTax,
    PoInvoice,
    PoInvoiceTax,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Invoice => "invoice",
            Self::InvoiceTax => "invoice_tax",
            Self::PoInvoice => "po_invoice",
            Self::PoInvoiceTax => "po_invoice_tax",
        }
    }

    /// Returns `true` for the kinds carrying the tax portion of a split.
    pub fn is_tax(self) -> bool {
        matches!(self, Self::InvoiceTax | Self::PoInvoiceTax)
    }

    /// Returns `true` for the kinds that materialize an invoice document.
    ///
    /// Rows with these kinds shadow the live-derived record carrying the
    /// same bill reference.
    pub fn is_document_backed(self) -> bool {
        matches!(
            self,
            Self::Invoice | Self::InvoiceTax | Self::PoInvoice | Self::PoInvoiceTax
        )
    }

    /// Kind of the tax entry paired with a principal of this kind.
    ///
    /// A manual principal keeps `Manual` for its sibling; the pair is bound
    /// by the principal link, not by kind.
    pub fn tax_kind(self) -> Self {
        match self {
            Self::Invoice => Self::InvoiceTax,
            Self::PoInvoice => Self::PoInvoiceTax,
            other => other,
        }
    }
}

impl TryFrom<&str> for EntryKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "manual" => Ok(Self::Manual),
            "invoice" => Ok(Self::Invoice),
            "invoice_tax" => Ok(Self::InvoiceTax),
            "po_invoice" => Ok(Self::PoInvoice),
            "po_invoice_tax" => Ok(Self::PoInvoiceTax),
            other => Err(EngineError::Validation(format!(
                "invalid entry kind: {other}"
            ))),
        }
    }
}

/// Lifecycle tag of an entry or source document.
///
/// Orthogonal to the balance sign; only `Paid` changes the side a derived
/// record lands on (settled amounts credit the customer).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Draft,
    #[default]
    Pending,
    Paid,
    Overdue,
}

impl EntryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
        }
    }
}

impl TryFrom<&str> for EntryStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "draft" => Ok(Self::Draft),
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            other => Err(EngineError::Validation(format!("invalid status: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub customer_id: String,
    pub entry_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    /// Monotonic per-customer counter assigned at persistence time; breaks
    /// exact `created_at` ties. Derived entries carry 0.
    pub entry_no: i64,
    pub description: String,
    pub bill_reference: Option<String>,
    pub debit_minor: i64,
    pub credit_minor: i64,
    /// Running balance after this entry; derived, recomputed on read.
    pub balance_minor: i64,
    pub sequence: DaySequence,
    pub kind: EntryKind,
    pub status: EntryStatus,
    pub due_date: Option<NaiveDate>,
    pub payment_mode: Option<String>,
    pub tax_rate_bps: i32,
    pub tax_minor: i64,
    /// Stable link from a tax entry to the principal it was split from.
    pub principal_entry_id: Option<Uuid>,
    pub line_items: Vec<LineItem>,
}

impl LedgerEntry {
    /// Signed amount this entry applies to the running balance.
    pub fn signed_delta(&self) -> i64 {
        self.debit_minor - self.credit_minor
    }

    pub fn side(&self) -> EntrySide {
        if self.debit_minor > 0 {
            EntrySide::Debit
        } else {
            EntrySide::Credit
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub customer_id: String,
    pub entry_date: Date,
    pub created_at: DateTimeUtc,
    pub entry_no: i64,
    pub description: String,
    pub bill_reference: Option<String>,
    pub debit_minor: i64,
    pub credit_minor: i64,
    pub balance_minor: i64,
    pub day_sequence: i64,
    pub status: String,
    pub due_date: Option<Date>,
    pub payment_mode: Option<String>,
    pub tax_rate_bps: i32,
    pub tax_minor: i64,
    pub entry_kind: Option<String>,
    pub principal_entry_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::line_items::Entity")]
    LineItems,
}

impl Related<super::line_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LineItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Builds the row to insert for a persisted entry.
///
/// When the store lacks entry-kind tagging the kind and principal-link
/// columns do not exist; leaving them `NotSet` keeps them out of the insert
/// statement entirely (reduced-capability path).
pub(crate) fn active_model(entry: &LedgerEntry, entry_kind_tagging: bool) -> ActiveModel {
    let (entry_kind, principal_entry_id) = if entry_kind_tagging {
        (
            ActiveValue::Set(Some(entry.kind.as_str().to_string())),
            ActiveValue::Set(entry.principal_entry_id.map(|id| id.to_string())),
        )
    } else {
        (ActiveValue::NotSet, ActiveValue::NotSet)
    };

    ActiveModel {
        id: ActiveValue::Set(entry.id.to_string()),
        customer_id: ActiveValue::Set(entry.customer_id.clone()),
        entry_date: ActiveValue::Set(entry.entry_date),
        created_at: ActiveValue::Set(entry.created_at),
        entry_no: ActiveValue::Set(entry.entry_no),
        description: ActiveValue::Set(entry.description.clone()),
        bill_reference: ActiveValue::Set(entry.bill_reference.clone()),
        debit_minor: ActiveValue::Set(entry.debit_minor),
        credit_minor: ActiveValue::Set(entry.credit_minor),
        balance_minor: ActiveValue::Set(entry.balance_minor),
        day_sequence: ActiveValue::Set(entry.sequence.raw()),
        status: ActiveValue::Set(entry.status.as_str().to_string()),
        due_date: ActiveValue::Set(entry.due_date),
        payment_mode: ActiveValue::Set(entry.payment_mode.clone()),
        tax_rate_bps: ActiveValue::Set(entry.tax_rate_bps),
        tax_minor: ActiveValue::Set(entry.tax_minor),
        entry_kind,
        principal_entry_id,
    }
}

impl TryFrom<Model> for LedgerEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let kind = match model.entry_kind.as_deref() {
            Some(kind) => EntryKind::try_from(kind)?,
            None => EntryKind::Manual,
        };
        Ok(Self {
            id: crate::util::parse_uuid(&model.id, "entry")?,
            customer_id: model.customer_id,
            entry_date: model.entry_date,
            created_at: model.created_at,
            entry_no: model.entry_no,
            description: model.description,
            bill_reference: model.bill_reference,
            debit_minor: model.debit_minor,
            credit_minor: model.credit_minor,
            balance_minor: model.balance_minor,
            sequence: DaySequence::from_raw(model.day_sequence),
            kind,
            status: EntryStatus::try_from(model.status.as_str())?,
            due_date: model.due_date,
            payment_mode: model.payment_mode,
            tax_rate_bps: model.tax_rate_bps,
            tax_minor: model.tax_minor,
            principal_entry_id: model
                .principal_entry_id
                .as_deref()
                .map(|id| crate::util::parse_uuid(id, "principal entry"))
                .transpose()?,
            line_items: Vec::new(),
        })
    }
}

/// Reads an entry from a raw row produced by the reduced-capability select.
///
/// The kind and principal-link columns are absent from legacy schemas, so
/// their reads tolerate a missing column and fall back to `Manual`/no link.
pub(crate) fn entry_from_row(row: &QueryResult) -> ResultEngine<LedgerEntry> {
    let entry_kind: Option<String> = row.try_get("", "entry_kind").unwrap_or(None);
    let principal_entry_id: Option<String> = row.try_get("", "principal_entry_id").unwrap_or(None);
    let id: String = row.try_get("", "id")?;
    let status: String = row.try_get("", "status")?;

    let kind = match entry_kind.as_deref() {
        Some(kind) => EntryKind::try_from(kind)?,
        None => EntryKind::Manual,
    };
    Ok(LedgerEntry {
        id: crate::util::parse_uuid(&id, "entry")?,
        customer_id: row.try_get("", "customer_id")?,
        entry_date: row.try_get("", "entry_date")?,
        created_at: row.try_get("", "created_at")?,
        entry_no: row.try_get("", "entry_no")?,
        description: row.try_get("", "description")?,
        bill_reference: row.try_get("", "bill_reference")?,
        debit_minor: row.try_get("", "debit_minor")?,
        credit_minor: row.try_get("", "credit_minor")?,
        balance_minor: row.try_get("", "balance_minor")?,
        sequence: DaySequence::from_raw(row.try_get("", "day_sequence")?),
        kind,
        status: EntryStatus::try_from(status.as_str())?,
        due_date: row.try_get("", "due_date")?,
        payment_mode: row.try_get("", "payment_mode")?,
        tax_rate_bps: row.try_get("", "tax_rate_bps")?,
        tax_minor: row.try_get("", "tax_minor")?,
        principal_entry_id: principal_entry_id
            .as_deref()
            .map(|id| crate::util::parse_uuid(id, "principal entry"))
            .transpose()?,
        line_items: Vec::new(),
    })
}
