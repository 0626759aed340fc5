//! Mappings between engine types and the wire contracts.

use chrono::Utc;

use api_types::{DocumentKind as ApiDocumentKind, EntryKind as ApiKind, EntryStatus as ApiStatus};
use api_types::{invoice::InvoiceView, ledger::EntryView};
use engine::{
    DocumentKind, EntryKind, EntryStatus, LedgerEntry, LineItem, NewLineItem, SourceDocument,
    StatementLine,
};

pub(crate) fn map_kind(kind: EntryKind) -> ApiKind {
    match kind {
        EntryKind::Manual => ApiKind::Manual,
        EntryKind::Invoice => ApiKind::Invoice,
        EntryKind::InvoiceTax => ApiKind::InvoiceTax,
        EntryKind::PoInvoice => ApiKind::PoInvoice,
        EntryKind::PoInvoiceTax => ApiKind::PoInvoiceTax,
    }
}

pub(crate) fn engine_kind(kind: ApiKind) -> EntryKind {
    match kind {
        ApiKind::Manual => EntryKind::Manual,
        ApiKind::Invoice => EntryKind::Invoice,
        ApiKind::InvoiceTax => EntryKind::InvoiceTax,
        ApiKind::PoInvoice => EntryKind::PoInvoice,
        ApiKind::PoInvoiceTax => EntryKind::PoInvoiceTax,
    }
}

pub(crate) fn map_status(status: EntryStatus) -> ApiStatus {
    match status {
        EntryStatus::Draft => ApiStatus::Draft,
        EntryStatus::Pending => ApiStatus::Pending,
        EntryStatus::Paid => ApiStatus::Paid,
        EntryStatus::Overdue => ApiStatus::Overdue,
    }
}

pub(crate) fn engine_status(status: ApiStatus) -> EntryStatus {
    match status {
        ApiStatus::Draft => EntryStatus::Draft,
        ApiStatus::Pending => EntryStatus::Pending,
        ApiStatus::Paid => EntryStatus::Paid,
        ApiStatus::Overdue => EntryStatus::Overdue,
    }
}

pub(crate) fn map_document_kind(kind: DocumentKind) -> ApiDocumentKind {
    match kind {
        DocumentKind::Sales => ApiDocumentKind::Sales,
        DocumentKind::Purchase => ApiDocumentKind::Purchase,
    }
}

pub(crate) fn engine_document_kind(kind: ApiDocumentKind) -> DocumentKind {
    match kind {
        ApiDocumentKind::Sales => DocumentKind::Sales,
        ApiDocumentKind::Purchase => DocumentKind::Purchase,
    }
}

fn map_line_item(item: LineItem) -> api_types::LineItem {
    api_types::LineItem {
        description: item.description,
        quantity: item.quantity,
        rate_minor: item.rate_minor,
        tax_rate_bps: item.tax_rate_bps,
        amount_minor: item.amount_minor,
    }
}

pub(crate) fn engine_line_item(item: &api_types::LineItem) -> NewLineItem {
    NewLineItem {
        description: item.description.clone(),
        quantity: item.quantity,
        rate_minor: item.rate_minor,
        tax_rate_bps: item.tax_rate_bps,
        amount_minor: item.amount_minor,
    }
}

fn entry_view(entry: LedgerEntry, days_outstanding: i64, quantity: Option<f64>, rate_minor: Option<i64>) -> EntryView {
    EntryView {
        id: entry.id,
        customer_id: entry.customer_id,
        entry_date: entry.entry_date,
        created_at: entry.created_at,
        description: entry.description,
        bill_reference: entry.bill_reference,
        debit_minor: entry.debit_minor,
        credit_minor: entry.credit_minor,
        balance_minor: entry.balance_minor,
        sequence: entry.sequence.as_f64(),
        entry_kind: map_kind(entry.kind),
        status: map_status(entry.status),
        due_date: entry.due_date,
        payment_mode: entry.payment_mode,
        tax_rate_bps: entry.tax_rate_bps,
        tax_minor: entry.tax_minor,
        principal_entry_id: entry.principal_entry_id,
        days_outstanding,
        quantity,
        rate_minor,
        line_items: entry.line_items.into_iter().map(map_line_item).collect(),
    }
}

/// View of one statement row, with its read-time derivations.
pub(crate) fn view_from_line(line: StatementLine) -> EntryView {
    entry_view(line.entry, line.days_outstanding, line.quantity, line.rate_minor)
}

/// View of a freshly mutated entry, outside a statement context.
pub(crate) fn view_from_entry(entry: LedgerEntry) -> EntryView {
    let days_outstanding = (Utc::now().date_naive() - entry.entry_date).num_days();
    entry_view(entry, days_outstanding, None, None)
}

pub(crate) fn invoice_view(doc: SourceDocument) -> InvoiceView {
    InvoiceView {
        id: doc.id,
        customer_id: doc.customer_id,
        bill_reference: doc.bill_reference,
        kind: map_document_kind(doc.kind),
        po_reference: doc.po_reference,
        issued_on: doc.issued_on,
        created_at: doc.created_at,
        due_date: doc.due_date,
        subtotal_minor: doc.subtotal_minor,
        tax_rate_bps: doc.tax_rate_bps,
        tax_minor: doc.tax_minor,
        total_minor: doc.total_minor,
        status: map_status(doc.status),
        line_items: doc.line_items.into_iter().map(map_line_item).collect(),
    }
}
