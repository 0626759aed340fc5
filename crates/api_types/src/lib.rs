use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Manual,
    Invoice,
    InvoiceTax,
    PoInvoice,
    PoInvoiceTax,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Draft,
    #[default]
    Pending,
    Paid,
    Overdue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Sales,
    Purchase,
}

/// A billed item, shared by entry and invoice payloads.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    #[serde(alias = "rate")]
    pub rate_minor: i64,
    #[serde(default, alias = "taxRate")]
    pub tax_rate_bps: i32,
    #[serde(alias = "amount")]
    pub amount_minor: i64,
}

pub mod ledger {
    use super::*;

    /// Query window for a customer statement; both ends inclusive on the
    /// event date.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct LedgerQuery {
        #[serde(alias = "fromDate")]
        pub from: Option<NaiveDate>,
        #[serde(alias = "toDate")]
        pub to: Option<NaiveDate>,
    }

    /// One row of the assembled statement.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryView {
        pub id: Uuid,
        pub customer_id: String,
        pub entry_date: NaiveDate,
        pub created_at: DateTime<Utc>,
        pub description: String,
        pub bill_reference: Option<String>,
        pub debit_minor: i64,
        pub credit_minor: i64,
        /// Running balance after this entry is applied.
        pub balance_minor: i64,
        /// Same-day ordering key; a tax entry sits at `principal + 0.5`.
        pub sequence: f64,
        pub entry_kind: EntryKind,
        pub status: EntryStatus,
        pub due_date: Option<NaiveDate>,
        pub payment_mode: Option<String>,
        pub tax_rate_bps: i32,
        pub tax_minor: i64,
        pub principal_entry_id: Option<Uuid>,
        /// Whole days since the event date (aging display).
        pub days_outstanding: i64,
        /// Display aggregates over the line items; informational only.
        pub quantity: Option<f64>,
        pub rate_minor: Option<i64>,
        pub line_items: Vec<LineItem>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerResponse {
        pub entries: Vec<EntryView>,
    }
}

pub mod entry {
    use super::*;

    /// Create one ledger entry.
    ///
    /// The aliases absorb the field spellings of older clients; this is the
    /// only place alternate spellings are recognized.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryNew {
        #[serde(alias = "entryDate")]
        pub entry_date: NaiveDate,
        pub description: String,
        #[serde(default, alias = "billReference", alias = "bill_ref")]
        pub bill_reference: Option<String>,
        #[serde(default, alias = "debitAmount")]
        pub debit_minor: i64,
        #[serde(default, alias = "creditAmount")]
        pub credit_minor: i64,
        #[serde(default)]
        pub status: EntryStatus,
        #[serde(default, alias = "dueDate")]
        pub due_date: Option<NaiveDate>,
        #[serde(default, alias = "paymentMode")]
        pub payment_mode: Option<String>,
        #[serde(default, alias = "taxRate")]
        pub tax_rate_bps: i32,
        #[serde(default, alias = "taxAmount")]
        pub tax_minor: i64,
        #[serde(default = "default_kind", alias = "entryKind")]
        pub entry_kind: EntryKind,
        #[serde(default, alias = "lineItems")]
        pub line_items: Vec<LineItem>,
    }

    fn default_kind() -> EntryKind {
        EntryKind::Manual
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryCreated {
        pub entry: ledger::EntryView,
        pub tax_entry: Option<ledger::EntryView>,
    }

    /// Ordered batch for one customer, applied all-or-nothing.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryBulkNew {
        pub entries: Vec<EntryNew>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntriesCreated {
        pub entries: Vec<ledger::EntryView>,
    }

    /// Patch of the non-balance-affecting fields; amounts are deliberately
    /// not updatable (delete + recreate instead).
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct EntryUpdate {
        pub description: Option<String>,
        pub status: Option<EntryStatus>,
        #[serde(default, alias = "dueDate")]
        pub due_date: Option<NaiveDate>,
        #[serde(default, alias = "paymentMode")]
        pub payment_mode: Option<String>,
    }
}

pub mod invoice {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceNew {
        #[serde(alias = "billReference")]
        pub bill_reference: String,
        #[serde(default = "default_document_kind")]
        pub kind: DocumentKind,
        #[serde(default, alias = "poReference")]
        pub po_reference: Option<String>,
        #[serde(alias = "issuedOn", alias = "date")]
        pub issued_on: NaiveDate,
        #[serde(default, alias = "dueDate")]
        pub due_date: Option<NaiveDate>,
        #[serde(default, alias = "subtotal")]
        pub subtotal_minor: i64,
        #[serde(default, alias = "taxRate")]
        pub tax_rate_bps: i32,
        #[serde(default, alias = "taxAmount")]
        pub tax_minor: i64,
        #[serde(alias = "total")]
        pub total_minor: i64,
        #[serde(default)]
        pub status: EntryStatus,
        #[serde(default, alias = "lineItems")]
        pub line_items: Vec<LineItem>,
    }

    fn default_document_kind() -> DocumentKind {
        DocumentKind::Sales
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceView {
        pub id: Uuid,
        pub customer_id: String,
        pub bill_reference: String,
        pub kind: DocumentKind,
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

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoicesResponse {
        pub invoices: Vec<InvoiceView>,
    }
}
