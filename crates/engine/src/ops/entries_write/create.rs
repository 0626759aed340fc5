use chrono::Utc;
use sea_orm::TransactionTrait;

use crate::{LedgerEntry, NewEntry, ResultEngine, util};

use super::super::{ChainingRule, Engine, with_tx};
use super::{build_entry, make_tax_sibling};

impl Engine {
    /// Creates one persisted entry, plus its tax sibling when a tax amount
    /// accompanies a non-tax principal.
    ///
    /// The new balance chains from the chronologically last entry of the
    /// customer (statement order); bulk create deliberately chains
    /// differently, see [`Engine::create_entries_bulk`].
    pub async fn create_entry(
        &self,
        cmd: NewEntry,
    ) -> ResultEngine<(LedgerEntry, Option<LedgerEntry>)> {
        let lock = self.customer_lock(&cmd.customer_id).await;
        let _guard = lock.lock().await;

        with_tx!(self, |db_tx| {
            let entry_no = self.next_entry_no(&db_tx, &cmd.customer_id).await?;
            let sequence = self
                .next_whole_sequence(&db_tx, &cmd.customer_id, cmd.entry_date)
                .await?;
            let previous = self
                .previous_balance(&db_tx, &cmd.customer_id, ChainingRule::ChronologicalTail)
                .await?;

            let mut entry = build_entry(&cmd, Utc::now(), entry_no, sequence)?;
            entry.balance_minor = util::apply_delta(previous, entry.signed_delta())?;
            self.insert_entry(&db_tx, &entry, &cmd.line_items).await?;

            let tax_entry = if cmd.tax_minor > 0 && !entry.kind.is_tax() {
                let sibling = make_tax_sibling(&entry)?;
                self.insert_entry(&db_tx, &sibling, &[]).await?;
                Some(sibling)
            } else {
                None
            };

            Ok((entry, tax_entry))
        })
    }
}
