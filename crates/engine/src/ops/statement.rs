use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    DaySequence, EngineError, ResultEngine, SourceDocument, StatementLine, dedup,
    invoice_line_items, invoices, ledger, normalize, tax,
};

use super::Engine;

impl Engine {
    /// Builds a customer's account statement: persisted rows merged with the
    /// live-derived invoice records, deduplicated, tax-split, ordered and
    /// folded into running balances.
    ///
    /// Derived records are recomputed on every call and never persisted.
    pub async fn customer_ledger(
        &self,
        customer_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> ResultEngine<Vec<StatementLine>> {
        if let (Some(from), Some(to)) = (from, to)
            && from > to
        {
            return Err(EngineError::Validation(
                "invalid range: from must be <= to".to_string(),
            ));
        }

        let db = &self.database;
        let mut persisted = self
            .load_customer_entries(db, customer_id, from, to)
            .await?;
        self.attach_line_items(db, &mut persisted).await?;

        let documents = self.load_documents(db, customer_id, from, to).await?;
        let candidates = normalize::candidates(&documents, from, to);
        let mut candidates = dedup::filter_materialized(candidates, &persisted, self.capabilities);

        // Derived records slot in after the persisted maxima of their day so
        // same-day sequences stay unique across the merged view.
        let mut max_by_date: HashMap<NaiveDate, DaySequence> = HashMap::new();
        for entry in &persisted {
            let slot = max_by_date.entry(entry.entry_date).or_default();
            if entry.sequence > *slot {
                *slot = entry.sequence;
            }
        }

        candidates.sort_by(|a, b| {
            (a.created_at, a.entry_date, a.source_id).cmp(&(b.created_at, b.entry_date, b.source_id))
        });

        let mut merged = persisted;
        for cand in candidates {
            let slot = max_by_date.entry(cand.entry_date).or_default();
            let sequence = slot.next_whole();
            *slot = sequence;

            let (principal, tax_entry) = tax::split(&cand, sequence);
            merged.push(principal);
            if let Some(tax_entry) = tax_entry {
                merged.push(tax_entry);
            }
        }

        ledger::build_statement(merged, Utc::now().date_naive())
    }

    /// Loads a customer's source documents (both streams), with line items.
    pub(crate) async fn load_documents<C: ConnectionTrait>(
        &self,
        conn: &C,
        customer_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> ResultEngine<Vec<SourceDocument>> {
        let mut query = invoices::Entity::find()
            .filter(invoices::Column::CustomerId.eq(customer_id))
            .order_by_asc(invoices::Column::CreatedAt);
        if let Some(from) = from {
            query = query.filter(invoices::Column::IssuedOn.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(invoices::Column::IssuedOn.lte(to));
        }

        let mut documents: Vec<SourceDocument> = query
            .all(conn)
            .await?
            .into_iter()
            .map(SourceDocument::try_from)
            .collect::<ResultEngine<_>>()?;

        if documents.is_empty() {
            return Ok(documents);
        }

        let ids: Vec<String> = documents.iter().map(|doc| doc.id.to_string()).collect();
        let items = invoice_line_items::Entity::find()
            .filter(invoice_line_items::Column::InvoiceId.is_in(ids))
            .order_by_asc(invoice_line_items::Column::Position)
            .all(conn)
            .await?;

        let mut by_invoice: HashMap<String, Vec<crate::LineItem>> = HashMap::new();
        for item in items {
            by_invoice
                .entry(item.invoice_id.clone())
                .or_default()
                .push(item.into());
        }
        for doc in documents.iter_mut() {
            if let Some(items) = by_invoice.remove(&doc.id.to_string()) {
                doc.line_items = items;
            }
        }
        Ok(documents)
    }
}
