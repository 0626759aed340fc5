//! Source document intake endpoints.

use api_types::invoice::{InvoiceNew, InvoiceView, InvoicesResponse};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState, views};
use engine::NewInvoice;

pub async fn create(
    State(state): State<ServerState>,
    Path(customer_id): Path<String>,
    Json(payload): Json<InvoiceNew>,
) -> Result<(StatusCode, Json<InvoiceView>), ServerError> {
    let doc = state
        .engine
        .create_invoice(NewInvoice {
            customer_id,
            bill_reference: payload.bill_reference,
            kind: views::engine_document_kind(payload.kind),
            po_reference: payload.po_reference,
            issued_on: payload.issued_on,
            due_date: payload.due_date,
            subtotal_minor: payload.subtotal_minor,
            tax_rate_bps: payload.tax_rate_bps,
            tax_minor: payload.tax_minor,
            total_minor: payload.total_minor,
            status: views::engine_status(payload.status),
            line_items: payload.line_items.iter().map(views::engine_line_item).collect(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(views::invoice_view(doc))))
}

pub async fn list(
    State(state): State<ServerState>,
    Path(customer_id): Path<String>,
) -> Result<Json<InvoicesResponse>, ServerError> {
    let documents = state.engine.list_invoices(&customer_id).await?;

    Ok(Json(InvoicesResponse {
        invoices: documents.into_iter().map(views::invoice_view).collect(),
    }))
}
