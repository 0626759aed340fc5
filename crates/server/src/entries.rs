//! Ledger entry mutation endpoints.

use api_types::entry::{EntriesCreated, EntryBulkNew, EntryCreated, EntryNew, EntryUpdate};
use api_types::ledger::EntryView;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};
use engine::{EntryPatch, NewEntry};

fn new_entry(customer_id: &str, payload: EntryNew) -> NewEntry {
    NewEntry {
        customer_id: customer_id.to_string(),
        entry_date: payload.entry_date,
        description: payload.description,
        bill_reference: payload.bill_reference,
        debit_minor: payload.debit_minor,
        credit_minor: payload.credit_minor,
        status: views::engine_status(payload.status),
        due_date: payload.due_date,
        payment_mode: payload.payment_mode,
        tax_rate_bps: payload.tax_rate_bps,
        tax_minor: payload.tax_minor,
        kind: views::engine_kind(payload.entry_kind),
        line_items: payload.line_items.iter().map(views::engine_line_item).collect(),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Path(customer_id): Path<String>,
    Json(payload): Json<EntryNew>,
) -> Result<(StatusCode, Json<EntryCreated>), ServerError> {
    let (entry, tax_entry) = state
        .engine
        .create_entry(new_entry(&customer_id, payload))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(EntryCreated {
            entry: views::view_from_entry(entry),
            tax_entry: tax_entry.map(views::view_from_entry),
        }),
    ))
}

pub async fn create_bulk(
    State(state): State<ServerState>,
    Path(customer_id): Path<String>,
    Json(payload): Json<EntryBulkNew>,
) -> Result<(StatusCode, Json<EntriesCreated>), ServerError> {
    let items = payload
        .entries
        .into_iter()
        .map(|entry| new_entry(&customer_id, entry))
        .collect();
    let created = state.engine.create_entries_bulk(&customer_id, items).await?;

    Ok((
        StatusCode::CREATED,
        Json(EntriesCreated {
            entries: created.into_iter().map(views::view_from_entry).collect(),
        }),
    ))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EntryUpdate>,
) -> Result<Json<EntryView>, ServerError> {
    let patch = EntryPatch {
        description: payload.description,
        status: payload.status.map(views::engine_status),
        due_date: payload.due_date,
        payment_mode: payload.payment_mode,
    };
    let updated = state.engine.update_entry(id, patch).await?;

    Ok(Json(views::view_from_entry(updated)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_entry(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
