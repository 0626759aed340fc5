//! Deduplication filter.
//!
//! A source document must appear exactly once in the merged view: either as
//! its live-derived record or as the persisted rows that materialized it.
//! This filter drops any candidate whose bill reference already has a
//! matching persisted row for the same customer. Pure set difference;
//! neither input is mutated.

use std::collections::HashSet;

use crate::{EntryCandidate, LedgerEntry, SchemaCapabilities};

fn match_key(bill_reference: &str, customer_id: &str) -> (String, String) {
    (bill_reference.to_lowercase(), customer_id.to_string())
}

/// Drops candidates already materialized as persisted rows.
///
/// With entry-kind tagging, only rows tagged as document-backed
/// (`invoice`/`invoice_tax`/`po_invoice`/`po_invoice_tax`) shadow a
/// candidate. Without it, any persisted row carrying the bill reference
/// counts — a documented fallback accepting a higher false-positive
/// exclusion rate. Reference matching is case-insensitive.
pub fn filter_materialized(
    candidates: Vec<EntryCandidate>,
    persisted: &[LedgerEntry],
    capabilities: SchemaCapabilities,
) -> Vec<EntryCandidate> {
    let materialized: HashSet<(String, String)> = persisted
        .iter()
        .filter(|entry| !capabilities.entry_kind_tagging || entry.kind.is_document_backed())
        .filter_map(|entry| {
            entry
                .bill_reference
                .as_deref()
                .map(|reference| match_key(reference, &entry.customer_id))
        })
        .collect();

    candidates
        .into_iter()
        .filter(|cand| !materialized.contains(&match_key(&cand.bill_reference, &cand.customer_id)))
        .collect()
}
