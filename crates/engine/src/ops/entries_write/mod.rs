//! Write operations on persisted ledger entries.
//!
//! Every operation runs inside one database transaction and takes the
//! per-customer lock, so balance-chaining reads are serialized against
//! concurrent writers for the same customer.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait};
use uuid::Uuid;

use crate::{
    DaySequence, EntrySide, LedgerEntry, NewEntry, NewLineItem, ResultEngine, entries, line_items,
    tax, util,
};

use super::Engine;

mod bulk;
mod create;
mod delete;
mod update;

/// Validates a command and shapes it into the entry to persist.
///
/// The balance is left at zero; the caller chains it from the strategy's
/// previous balance.
pub(super) fn build_entry(
    cmd: &NewEntry,
    created_at: DateTime<Utc>,
    entry_no: i64,
    sequence: DaySequence,
) -> ResultEngine<LedgerEntry> {
    util::validate_amounts(cmd.debit_minor, cmd.credit_minor)?;
    if cmd.tax_minor < 0 || cmd.tax_rate_bps < 0 {
        return Err(crate::EngineError::Validation(
            "tax amount and rate must be non-negative".to_string(),
        ));
    }
    let description = util::normalize_required_text(&cmd.description, "description")?;

    Ok(LedgerEntry {
        id: Uuid::new_v4(),
        customer_id: cmd.customer_id.clone(),
        entry_date: cmd.entry_date,
        created_at,
        entry_no,
        description,
        bill_reference: util::normalize_optional_text(cmd.bill_reference.as_deref()),
        debit_minor: cmd.debit_minor,
        credit_minor: cmd.credit_minor,
        balance_minor: 0,
        sequence,
        kind: cmd.kind,
        status: cmd.status,
        due_date: cmd.due_date,
        payment_mode: util::normalize_optional_text(cmd.payment_mode.as_deref()),
        tax_rate_bps: cmd.tax_rate_bps,
        tax_minor: cmd.tax_minor,
        principal_entry_id: None,
        line_items: cmd.line_items.iter().map(Into::into).collect(),
    })
}

/// Shapes the auto-generated tax sibling of a freshly persisted principal.
///
/// Same date and side, the adjacent tax slot, the next counter value, and a
/// balance chained directly off the principal's.
pub(super) fn make_tax_sibling(principal: &LedgerEntry) -> ResultEngine<LedgerEntry> {
    let (debit_minor, credit_minor) = match principal.side() {
        EntrySide::Debit => (principal.tax_minor, 0),
        EntrySide::Credit => (0, principal.tax_minor),
    };
    let reference = principal
        .bill_reference
        .as_deref()
        .unwrap_or(&principal.description);

    let mut sibling = LedgerEntry {
        id: Uuid::new_v4(),
        customer_id: principal.customer_id.clone(),
        entry_date: principal.entry_date,
        created_at: principal.created_at,
        entry_no: principal.entry_no + 1,
        description: tax::tax_description(principal.tax_rate_bps, reference),
        bill_reference: principal.bill_reference.clone(),
        debit_minor,
        credit_minor,
        balance_minor: 0,
        sequence: principal.sequence.tax_slot(),
        kind: principal.kind.tax_kind(),
        status: principal.status,
        due_date: principal.due_date,
        payment_mode: None,
        tax_rate_bps: principal.tax_rate_bps,
        tax_minor: principal.tax_minor,
        principal_entry_id: Some(principal.id),
        line_items: Vec::new(),
    };
    sibling.balance_minor = util::apply_delta(principal.balance_minor, sibling.signed_delta())?;
    Ok(sibling)
}

impl Engine {
    /// Persists an entry row and its line items.
    pub(super) async fn insert_entry<C: ConnectionTrait>(
        &self,
        conn: &C,
        entry: &LedgerEntry,
        items: &[NewLineItem],
    ) -> ResultEngine<()> {
        // Use `Entity::insert(..).exec()` rather than `ActiveModel::insert()`:
        // the latter re-selects every entity column to return the Model, which
        // references `entry_kind` and fails on stores that lack the tagging
        // columns (reduced-capability path). The returned row is discarded here.
        entries::Entity::insert(entries::active_model(
            entry,
            self.capabilities.entry_kind_tagging,
        ))
        .exec(conn)
        .await?;
        for (position, item) in items.iter().enumerate() {
            let item = crate::LineItem::from(item);
            line_items::active_model(entry.id, position as i32, &item)
                .insert(conn)
                .await?;
        }
        Ok(())
    }

    /// Removes an entry row and its line items.
    pub(super) async fn remove_entry<C: ConnectionTrait>(
        &self,
        conn: &C,
        entry_id: Uuid,
    ) -> ResultEngine<()> {
        use sea_orm::{ColumnTrait, QueryFilter};

        line_items::Entity::delete_many()
            .filter(line_items::Column::EntryId.eq(entry_id.to_string()))
            .exec(conn)
            .await?;
        entries::Entity::delete_by_id(entry_id.to_string())
            .exec(conn)
            .await?;
        Ok(())
    }
}
