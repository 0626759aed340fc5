//! Command structs for engine operations.
//!
//! These types group parameters for write operations (entry create, bulk
//! create, update, invoice intake), keeping call sites readable and avoiding
//! long argument lists.

use chrono::NaiveDate;

use crate::{DocumentKind, EntryKind, EntryStatus, LineItem};

/// Create one persisted ledger entry.
#[derive(Clone, Debug)]
pub struct NewEntry {
    pub customer_id: String,
    pub entry_date: NaiveDate,
    pub description: String,
    pub bill_reference: Option<String>,
    pub debit_minor: i64,
    pub credit_minor: i64,
    pub status: EntryStatus,
    pub due_date: Option<NaiveDate>,
    pub payment_mode: Option<String>,
    pub tax_rate_bps: i32,
    pub tax_minor: i64,
    pub kind: EntryKind,
    pub line_items: Vec<NewLineItem>,
}

impl NewEntry {
    #[must_use]
    pub fn new(
        customer_id: impl Into<String>,
        entry_date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            entry_date,
            description: description.into(),
            bill_reference: None,
            debit_minor: 0,
            credit_minor: 0,
            status: EntryStatus::default(),
            due_date: None,
            payment_mode: None,
            tax_rate_bps: 0,
            tax_minor: 0,
            kind: EntryKind::Manual,
            line_items: Vec::new(),
        }
    }

    #[must_use]
    pub fn debit(mut self, amount_minor: i64) -> Self {
        self.debit_minor = amount_minor;
        self
    }

    #[must_use]
    pub fn credit(mut self, amount_minor: i64) -> Self {
        self.credit_minor = amount_minor;
        self
    }

    #[must_use]
    pub fn bill_reference(mut self, reference: impl Into<String>) -> Self {
        self.bill_reference = Some(reference.into());
        self
    }

    #[must_use]
    pub fn tax(mut self, rate_bps: i32, amount_minor: i64) -> Self {
        self.tax_rate_bps = rate_bps;
        self.tax_minor = amount_minor;
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: EntryKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn status(mut self, status: EntryStatus) -> Self {
        self.status = status;
        self
    }
}

/// One billed item of a new entry or invoice.
#[derive(Clone, Debug)]
pub struct NewLineItem {
    pub description: String,
    pub quantity: f64,
    pub rate_minor: i64,
    pub tax_rate_bps: i32,
    pub amount_minor: i64,
}

impl From<&NewLineItem> for LineItem {
    fn from(item: &NewLineItem) -> Self {
        Self {
            description: item.description.clone(),
            quantity: item.quantity,
            rate_minor: item.rate_minor,
            tax_rate_bps: item.tax_rate_bps,
            amount_minor: item.amount_minor,
        }
    }
}

/// Patch the non-balance-affecting fields of a persisted entry.
///
/// Amount changes are deliberately absent: they are modeled as
/// delete + recreate so balance recomputation stays unambiguous.
#[derive(Clone, Debug, Default)]
pub struct EntryPatch {
    pub description: Option<String>,
    pub status: Option<EntryStatus>,
    pub due_date: Option<NaiveDate>,
    pub payment_mode: Option<String>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
            && self.payment_mode.is_none()
    }
}

/// Persist a source document with its line items.
#[derive(Clone, Debug)]
pub struct NewInvoice {
    pub customer_id: String,
    pub bill_reference: String,
    pub kind: DocumentKind,
    pub po_reference: Option<String>,
    pub issued_on: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub subtotal_minor: i64,
    pub tax_rate_bps: i32,
    pub tax_minor: i64,
    pub total_minor: i64,
    pub status: EntryStatus,
    pub line_items: Vec<NewLineItem>,
}

impl NewInvoice {
    #[must_use]
    pub fn new(
        customer_id: impl Into<String>,
        bill_reference: impl Into<String>,
        issued_on: NaiveDate,
        total_minor: i64,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            bill_reference: bill_reference.into(),
            kind: DocumentKind::Sales,
            po_reference: None,
            issued_on,
            due_date: None,
            subtotal_minor: 0,
            tax_rate_bps: 0,
            tax_minor: 0,
            total_minor,
            status: EntryStatus::default(),
            line_items: Vec::new(),
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: DocumentKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn po_reference(mut self, reference: impl Into<String>) -> Self {
        self.po_reference = Some(reference.into());
        self
    }

    #[must_use]
    pub fn tax(mut self, rate_bps: i32, amount_minor: i64) -> Self {
        self.tax_rate_bps = rate_bps;
        self.tax_minor = amount_minor;
        self
    }

    #[must_use]
    pub fn subtotal(mut self, amount_minor: i64) -> Self {
        self.subtotal_minor = amount_minor;
        self
    }

    #[must_use]
    pub fn status(mut self, status: EntryStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn line_item(mut self, item: NewLineItem) -> Self {
        self.line_items.push(item);
        self
    }
}
