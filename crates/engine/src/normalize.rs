//! Record normalizer.
//!
//! Projects source documents (sales invoices, PO invoices) into canonical
//! entry candidates, still carrying the gross total and the originating tax
//! amount, not yet split. Pure; no side effects.
//!
//! Field-name tolerance for historical spellings lives at the API boundary
//! (serde aliases on the input types), so nothing downstream of this module
//! special-cases alternate spellings.

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    DocumentKind, EntryKind, EntrySide, EntryStatus, LineItem, SourceDocument,
};

/// A normalized, not-yet-split candidate for the merged view.
#[derive(Clone, Debug, PartialEq)]
pub struct EntryCandidate {
    pub source_id: uuid::Uuid,
    pub customer_id: String,
    pub bill_reference: String,
    pub kind: EntryKind,
    pub entry_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    pub status: EntryStatus,
    pub description: String,
    pub subtotal_minor: i64,
    pub tax_rate_bps: i32,
    pub tax_minor: i64,
    pub total_minor: i64,
    pub quantity: Option<f64>,
    pub rate_minor: Option<i64>,
    pub line_items: Vec<LineItem>,
}

/// Side a derived record lands on, determined by its payment status at the
/// source: settled amounts credit the customer, everything else is owed.
pub fn side_for_status(status: EntryStatus) -> EntrySide {
    match status {
        EntryStatus::Paid => EntrySide::Credit,
        _ => EntrySide::Debit,
    }
}

/// `true` if `date` falls inside the inclusive `[from, to]` window.
pub fn in_range(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    if let Some(from) = from
        && date < from
    {
        return false;
    }
    if let Some(to) = to
        && date > to
    {
        return false;
    }
    true
}

/// Display aggregates over a record's line items: quantity summed, one
/// representative rate retained. Informational only; never used in balance
/// math.
pub fn display_aggregates(items: &[LineItem]) -> (Option<f64>, Option<i64>) {
    if items.is_empty() {
        return (None, None);
    }
    let quantity = items.iter().map(|item| item.quantity).sum();
    let rate_minor = items.first().map(|item| item.rate_minor);
    (Some(quantity), rate_minor)
}

fn aggregate_description(doc: &SourceDocument) -> String {
    let joined = doc
        .line_items
        .iter()
        .map(|item| item.description.trim())
        .filter(|d| !d.is_empty())
        .collect::<Vec<_>>()
        .join("; ");
    if !joined.is_empty() {
        return joined;
    }
    match doc.kind {
        DocumentKind::Sales => format!("Invoice {}", doc.bill_reference),
        DocumentKind::Purchase => format!("Purchase invoice {}", doc.bill_reference),
    }
}

/// Normalizes one source document into a candidate.
pub fn candidate(doc: &SourceDocument) -> EntryCandidate {
    let (quantity, rate_minor) = display_aggregates(&doc.line_items);
    EntryCandidate {
        source_id: doc.id,
        customer_id: doc.customer_id.clone(),
        bill_reference: doc.bill_reference.clone(),
        kind: match doc.kind {
            DocumentKind::Sales => EntryKind::Invoice,
            DocumentKind::Purchase => EntryKind::PoInvoice,
        },
        entry_date: doc.issued_on,
        created_at: doc.created_at,
        due_date: doc.due_date,
        status: doc.status,
        description: aggregate_description(doc),
        subtotal_minor: doc.subtotal_minor,
        tax_rate_bps: doc.tax_rate_bps,
        tax_minor: doc.tax_minor,
        total_minor: doc.total_minor,
        quantity,
        rate_minor,
        line_items: doc.line_items.clone(),
    }
}

/// Normalizes a batch of documents, applying the inclusive date window on
/// the event date.
pub fn candidates(
    docs: &[SourceDocument],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<EntryCandidate> {
    docs.iter()
        .filter(|doc| in_range(doc.issued_on, from, to))
        .map(candidate)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn doc(items: Vec<LineItem>) -> SourceDocument {
        SourceDocument {
            id: Uuid::new_v4(),
            customer_id: "cust-1".to_string(),
            bill_reference: "INV-0001".to_string(),
            kind: DocumentKind::Sales,
            po_reference: None,
            issued_on: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            created_at: Utc::now(),
            due_date: None,
            subtotal_minor: 0,
            tax_rate_bps: 0,
            tax_minor: 0,
            total_minor: 50_00,
            status: EntryStatus::Pending,
            line_items: items,
        }
    }

    fn item(description: &str, quantity: f64, rate_minor: i64) -> LineItem {
        LineItem {
            description: description.to_string(),
            quantity,
            rate_minor,
            tax_rate_bps: 0,
            amount_minor: (quantity * rate_minor as f64) as i64,
        }
    }

    #[test]
    fn multi_item_documents_aggregate_for_display() {
        let cand = candidate(&doc(vec![
            item("Consulting", 2.0, 10_00),
            item("Hosting", 3.0, 5_00),
        ]));
        assert_eq!(cand.description, "Consulting; Hosting");
        assert_eq!(cand.quantity, Some(5.0));
        assert_eq!(cand.rate_minor, Some(10_00));
    }

    #[test]
    fn documents_without_items_describe_the_reference() {
        let cand = candidate(&doc(Vec::new()));
        assert_eq!(cand.description, "Invoice INV-0001");
        assert_eq!(cand.quantity, None);
    }

    #[test]
    fn paid_documents_land_on_the_credit_side() {
        assert_eq!(side_for_status(EntryStatus::Paid), EntrySide::Credit);
        assert_eq!(side_for_status(EntryStatus::Pending), EntrySide::Debit);
        assert_eq!(side_for_status(EntryStatus::Draft), EntrySide::Debit);
        assert_eq!(side_for_status(EntryStatus::Overdue), EntrySide::Debit);
    }

    #[test]
    fn date_window_is_inclusive_on_both_ends() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert!(in_range(date, Some(date), Some(date)));
        assert!(!in_range(date, Some(date.succ_opt().unwrap()), None));
        assert!(!in_range(date, None, Some(date.pred_opt().unwrap())));
    }
}
