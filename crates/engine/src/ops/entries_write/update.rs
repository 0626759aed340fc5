use sea_orm::{ActiveModelTrait, ActiveValue, TransactionTrait};
use uuid::Uuid;

use crate::{EngineError, EntryPatch, LedgerEntry, ResultEngine, entries, util};

use super::super::{Engine, with_tx};

impl Engine {
    /// Updates the non-balance-affecting fields of a persisted entry.
    ///
    /// Amount changes are out of scope here: they are modeled as
    /// delete + recreate so balance recomputation stays unambiguous. The
    /// patch type has no amount fields.
    pub async fn update_entry(
        &self,
        entry_id: Uuid,
        patch: EntryPatch,
    ) -> ResultEngine<LedgerEntry> {
        if patch.is_empty() {
            return Err(EngineError::Validation(
                "update requires at least one field".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            if self.load_entry(&db_tx, entry_id).await?.is_none() {
                return Err(EngineError::NotFound(format!("entry {entry_id}")));
            }

            let mut model = entries::ActiveModel {
                id: ActiveValue::Set(entry_id.to_string()),
                ..Default::default()
            };
            if let Some(description) = patch.description.as_deref() {
                model.description =
                    ActiveValue::Set(util::normalize_required_text(description, "description")?);
            }
            if let Some(status) = patch.status {
                model.status = ActiveValue::Set(status.as_str().to_string());
            }
            if let Some(due_date) = patch.due_date {
                model.due_date = ActiveValue::Set(Some(due_date));
            }
            if let Some(payment_mode) = patch.payment_mode.as_deref() {
                model.payment_mode =
                    ActiveValue::Set(util::normalize_optional_text(Some(payment_mode)));
            }
            model.update(&db_tx).await?;

            let mut updated = self
                .load_entry(&db_tx, entry_id)
                .await?
                .ok_or_else(|| EngineError::NotFound(format!("entry {entry_id}")))?;
            self.attach_line_items(&db_tx, std::slice::from_mut(&mut updated))
                .await?;
            Ok(updated)
        })
    }
}
