//! Tax splitter.
//!
//! Decomposes a candidate carrying a non-zero tax amount into a principal
//! entry and a linked tax entry on the adjacent tax slot. Pure; the split
//! conserves the gross total exactly (integer arithmetic).

use uuid::Uuid;

use crate::{
    DaySequence, EntryCandidate, EntrySide, LedgerEntry,
    normalize::side_for_status,
};

/// Net amount of the principal entry.
///
/// When a tax amount is present, the subtotal wins if the source recorded
/// one; otherwise the tax is carved out of the gross total. Without tax the
/// gross total passes through untouched.
pub(crate) fn principal_minor(total_minor: i64, subtotal_minor: i64, tax_minor: i64) -> i64 {
    if tax_minor > 0 {
        if subtotal_minor > 0 {
            subtotal_minor
        } else {
            total_minor - tax_minor
        }
    } else {
        total_minor
    }
}

fn format_rate(tax_rate_bps: i32) -> String {
    format!("{}%", tax_rate_bps as f64 / 100.0)
}

/// Description of a tax entry, referencing the rate and its principal.
pub(crate) fn tax_description(tax_rate_bps: i32, principal_reference: &str) -> String {
    format!(
        "Tax {} on {principal_reference}",
        format_rate(tax_rate_bps)
    )
}

/// Stable id for the tax record derived from a source document.
///
/// Derived entries are recomputed on every read; a name-based UUID keeps the
/// pair's ids stable across reads.
pub(crate) fn derived_tax_id(source_id: Uuid) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("{source_id}:tax").as_bytes())
}

fn sided(side: EntrySide, amount_minor: i64) -> (i64, i64) {
    match side {
        EntrySide::Debit => (amount_minor, 0),
        EntrySide::Credit => (0, amount_minor),
    }
}

/// Splits a candidate into its derived principal entry and, when a tax
/// amount is present, the paired tax entry at `sequence + 0.5`.
///
/// Balances are left at zero; the running-balance fold assigns them after
/// the merged view is ordered.
pub fn split(cand: &EntryCandidate, sequence: DaySequence) -> (LedgerEntry, Option<LedgerEntry>) {
    let side = side_for_status(cand.status);
    let (debit_minor, credit_minor) = sided(
        side,
        principal_minor(cand.total_minor, cand.subtotal_minor, cand.tax_minor),
    );

    let principal = LedgerEntry {
        id: cand.source_id,
        customer_id: cand.customer_id.clone(),
        entry_date: cand.entry_date,
        created_at: cand.created_at,
        entry_no: 0,
        description: cand.description.clone(),
        bill_reference: Some(cand.bill_reference.clone()),
        debit_minor,
        credit_minor,
        balance_minor: 0,
        sequence,
        kind: cand.kind,
        status: cand.status,
        due_date: cand.due_date,
        payment_mode: None,
        tax_rate_bps: cand.tax_rate_bps,
        tax_minor: cand.tax_minor,
        principal_entry_id: None,
        line_items: cand.line_items.clone(),
    };

    if cand.tax_minor <= 0 {
        return (principal, None);
    }

    let (tax_debit, tax_credit) = sided(side, cand.tax_minor);
    let tax = LedgerEntry {
        id: derived_tax_id(cand.source_id),
        customer_id: cand.customer_id.clone(),
        entry_date: cand.entry_date,
        created_at: cand.created_at,
        entry_no: 0,
        description: tax_description(cand.tax_rate_bps, &cand.bill_reference),
        bill_reference: Some(cand.bill_reference.clone()),
        debit_minor: tax_debit,
        credit_minor: tax_credit,
        balance_minor: 0,
        sequence: sequence.tax_slot(),
        kind: cand.kind.tax_kind(),
        status: cand.status,
        due_date: cand.due_date,
        payment_mode: None,
        tax_rate_bps: cand.tax_rate_bps,
        tax_minor: cand.tax_minor,
        principal_entry_id: Some(cand.source_id),
        line_items: Vec::new(),
    };

    (principal, Some(tax))
}
