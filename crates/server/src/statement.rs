//! Customer statement endpoint.

use api_types::ledger::{LedgerQuery, LedgerResponse};
use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{ServerError, server::ServerState, views};

pub async fn get_ledger(
    State(state): State<ServerState>,
    Path(customer_id): Path<String>,
    Query(query): Query<LedgerQuery>,
) -> Result<Json<LedgerResponse>, ServerError> {
    let lines = state
        .engine
        .customer_ledger(&customer_id, query.from, query.to)
        .await?;

    Ok(Json(LedgerResponse {
        entries: lines.into_iter().map(views::view_from_line).collect(),
    }))
}
