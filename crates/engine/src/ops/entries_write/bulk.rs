use chrono::Utc;
use sea_orm::TransactionTrait;

use crate::{EngineError, LedgerEntry, NewEntry, ResultEngine, util};

use super::super::{ChainingRule, Engine, with_tx};
use super::build_entry;

impl Engine {
    /// Creates an ordered batch of entries for one customer, all-or-nothing.
    ///
    /// Each item chains from the **maximum balance persisted so far for the
    /// whole customer** — including earlier items of the same batch — not
    /// from the chronological tail. This reproduces the source system's
    /// batch-local chaining rule and must not be unified with the
    /// single-create path (see DESIGN.md).
    ///
    /// The batch is taken as given: no tax siblings are synthesized. An item
    /// with a tax kind immediately following a same-date non-tax item adopts
    /// that item's tax slot and principal link.
    pub async fn create_entries_bulk(
        &self,
        customer_id: &str,
        items: Vec<NewEntry>,
    ) -> ResultEngine<Vec<LedgerEntry>> {
        if items.is_empty() {
            return Err(EngineError::Validation(
                "bulk create requires at least one entry".to_string(),
            ));
        }
        if items.iter().any(|item| item.customer_id != customer_id) {
            return Err(EngineError::Validation(
                "bulk entries must all target the same customer".to_string(),
            ));
        }
        for item in &items {
            util::validate_amounts(item.debit_minor, item.credit_minor)?;
        }

        let lock = self.customer_lock(customer_id).await;
        let _guard = lock.lock().await;

        with_tx!(self, |db_tx| {
            let mut created: Vec<LedgerEntry> = Vec::with_capacity(items.len());
            for cmd in &items {
                let entry_no = self.next_entry_no(&db_tx, customer_id).await?;
                let previous = self
                    .previous_balance(&db_tx, customer_id, ChainingRule::MaxPersisted)
                    .await?;

                let adopted_slot = created
                    .last()
                    .filter(|prev| {
                        cmd.kind.is_tax()
                            && !prev.kind.is_tax()
                            && prev.entry_date == cmd.entry_date
                    })
                    .map(|prev| (prev.sequence.tax_slot(), prev.id));
                let (sequence, principal_link) = match adopted_slot {
                    Some((sequence, principal_id)) => (sequence, Some(principal_id)),
                    None => (
                        self.next_whole_sequence(&db_tx, customer_id, cmd.entry_date)
                            .await?,
                        None,
                    ),
                };

                let mut entry = build_entry(cmd, Utc::now(), entry_no, sequence)?;
                entry.principal_entry_id = principal_link;
                entry.balance_minor = util::apply_delta(previous, entry.signed_delta())?;
                self.insert_entry(&db_tx, &entry, &cmd.line_items).await?;
                created.push(entry);
            }
            Ok(created)
        })
    }
}
