use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

use crate::{EngineError, LedgerEntry, ResultEngine, entries, util};

use super::super::{Engine, with_tx};

fn position_key(entry: &LedgerEntry) -> (NaiveDate, String) {
    (entry.entry_date, entry.id.to_string())
}

impl Engine {
    /// Deletes an entry and recomputes the balances of everything ordered at
    /// or after it, in the same transaction.
    ///
    /// A principal's linked tax sibling is cascade-deleted with it. Without
    /// entry-kind tagging the link column does not exist, so the cascade
    /// silently degrades to principal-only deletion.
    ///
    /// Recomputation replays the remaining entries in `(entry_date, id)`
    /// order and overwrites the stored balance of every entry at or after
    /// the earliest deleted position; entries before it are untouched.
    pub async fn delete_entry(&self, entry_id: Uuid) -> ResultEngine<()> {
        // Resolve the owner first so the per-customer lock wraps the
        // transaction.
        let customer_id = self
            .load_entry(&self.database, entry_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("entry {entry_id}")))?
            .customer_id;

        let lock = self.customer_lock(&customer_id).await;
        let _guard = lock.lock().await;

        with_tx!(self, |db_tx| {
            let entry = self
                .load_entry(&db_tx, entry_id)
                .await?
                .ok_or_else(|| EngineError::NotFound(format!("entry {entry_id}")))?;

            let mut removed = vec![entry];
            if self.capabilities.entry_kind_tagging {
                let siblings = entries::Entity::find()
                    .filter(entries::Column::PrincipalEntryId.eq(entry_id.to_string()))
                    .all(&db_tx)
                    .await?;
                for sibling in siblings {
                    removed.push(LedgerEntry::try_from(sibling)?);
                }
            }

            let mut cutoff = position_key(&removed[0]);
            for entry in &removed[1..] {
                let key = position_key(entry);
                if key < cutoff {
                    cutoff = key;
                }
            }

            for entry in &removed {
                self.remove_entry(&db_tx, entry.id).await?;
            }

            let mut remaining = self
                .load_customer_entries(&db_tx, &customer_id, None, None)
                .await?;
            remaining.sort_by(|a, b| position_key(a).cmp(&position_key(b)));

            let mut running: i64 = 0;
            for entry in &remaining {
                running = util::apply_delta(running, entry.signed_delta())?;
                if position_key(entry) >= cutoff && entry.balance_minor != running {
                    entries::ActiveModel {
                        id: ActiveValue::Set(entry.id.to_string()),
                        balance_minor: ActiveValue::Set(running),
                        ..Default::default()
                    }
                    .update(&db_tx)
                    .await?;
                }
            }

            Ok(())
        })
    }
}
