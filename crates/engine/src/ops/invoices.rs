use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    EngineError, NewInvoice, ResultEngine, SourceDocument, invoice_line_items, invoices, util,
};

use super::{Engine, with_tx};

impl Engine {
    /// Persists a source document with its line items, transactionally.
    pub async fn create_invoice(&self, cmd: NewInvoice) -> ResultEngine<SourceDocument> {
        let bill_reference = util::normalize_required_text(&cmd.bill_reference, "bill reference")?;
        if cmd.total_minor <= 0 {
            return Err(EngineError::Validation(
                "invoice total must be positive".to_string(),
            ));
        }
        if cmd.subtotal_minor < 0 || cmd.tax_minor < 0 || cmd.tax_rate_bps < 0 {
            return Err(EngineError::Validation(
                "invoice amounts must be non-negative".to_string(),
            ));
        }
        if cmd.subtotal_minor > 0
            && cmd.tax_minor > 0
            && cmd.subtotal_minor + cmd.tax_minor != cmd.total_minor
        {
            return Err(EngineError::Validation(
                "subtotal and tax must add up to the total".to_string(),
            ));
        }

        let doc = SourceDocument {
            id: Uuid::new_v4(),
            customer_id: cmd.customer_id.clone(),
            bill_reference,
            kind: cmd.kind,
            po_reference: util::normalize_optional_text(cmd.po_reference.as_deref()),
            issued_on: cmd.issued_on,
            created_at: Utc::now(),
            due_date: cmd.due_date,
            subtotal_minor: cmd.subtotal_minor,
            tax_rate_bps: cmd.tax_rate_bps,
            tax_minor: cmd.tax_minor,
            total_minor: cmd.total_minor,
            status: cmd.status,
            line_items: cmd.line_items.iter().map(Into::into).collect(),
        };

        with_tx!(self, |db_tx| {
            invoices::ActiveModel::from(&doc).insert(&db_tx).await?;
            for (position, item) in doc.line_items.iter().enumerate() {
                invoice_line_items::active_model(doc.id, position as i32, item)
                    .insert(&db_tx)
                    .await?;
            }
            Ok(doc)
        })
    }

    /// Lists a customer's source documents, newest first.
    pub async fn list_invoices(&self, customer_id: &str) -> ResultEngine<Vec<SourceDocument>> {
        let mut documents: Vec<SourceDocument> = invoices::Entity::find()
            .filter(invoices::Column::CustomerId.eq(customer_id))
            .order_by_desc(invoices::Column::CreatedAt)
            .all(&self.database)
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
            .all(&self.database)
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
