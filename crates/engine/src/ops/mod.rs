use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Statement, Value,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    DaySequence, LedgerEntry, ResultEngine, SchemaCapabilities, capabilities, entries, line_items,
};

mod entries_write;
mod invoices;
mod statement;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Which persisted balance a new entry chains from.
///
/// The two variants reproduce a genuine inconsistency inherited from the
/// source system; they must stay separate until the product owner decides
/// otherwise (see DESIGN.md).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ChainingRule {
    /// Balance of the chronologically last entry (statement order).
    /// Used by single create.
    ChronologicalTail,
    /// Maximum balance value persisted so far for the customer, regardless
    /// of date. Used by bulk create.
    MaxPersisted,
}

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    capabilities: SchemaCapabilities,
    customer_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn capabilities(&self) -> SchemaCapabilities {
        self.capabilities
    }

    /// Per-customer write lock serializing balance-chaining reads against
    /// concurrent writers. No cross-customer locking.
    pub(crate) async fn customer_lock(&self, customer_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.customer_locks.lock().await;
        locks
            .entry(customer_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Loads a customer's persisted entries, optionally windowed on the
    /// event date (inclusive).
    ///
    /// Without entry-kind tagging the entity's full column set does not
    /// exist, so the reduced path selects the legacy columns explicitly.
    pub(crate) async fn load_customer_entries<C: ConnectionTrait>(
        &self,
        conn: &C,
        customer_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> ResultEngine<Vec<LedgerEntry>> {
        if self.capabilities.entry_kind_tagging {
            let mut query = entries::Entity::find()
                .filter(entries::Column::CustomerId.eq(customer_id))
                .order_by_asc(entries::Column::CreatedAt)
                .order_by_asc(entries::Column::EntryNo);
            if let Some(from) = from {
                query = query.filter(entries::Column::EntryDate.gte(from));
            }
            if let Some(to) = to {
                query = query.filter(entries::Column::EntryDate.lte(to));
            }
            return query
                .all(conn)
                .await?
                .into_iter()
                .map(LedgerEntry::try_from)
                .collect();
        }

        let mut sql = String::from(
            "SELECT id, customer_id, entry_date, created_at, entry_no, description, \
             bill_reference, debit_minor, credit_minor, balance_minor, day_sequence, \
             status, due_date, payment_mode, tax_rate_bps, tax_minor \
             FROM ledger_entries WHERE customer_id = ?",
        );
        let mut values: Vec<Value> = vec![customer_id.into()];
        if let Some(from) = from {
            sql.push_str(" AND entry_date >= ?");
            values.push(from.into());
        }
        if let Some(to) = to {
            sql.push_str(" AND entry_date <= ?");
            values.push(to.into());
        }
        sql.push_str(" ORDER BY created_at, entry_no");

        let rows = conn
            .query_all(Statement::from_sql_and_values(
                conn.get_database_backend(),
                sql,
                values,
            ))
            .await?;
        rows.iter().map(entries::entry_from_row).collect()
    }

    /// Loads one persisted entry by id, or `None`.
    pub(crate) async fn load_entry<C: ConnectionTrait>(
        &self,
        conn: &C,
        entry_id: Uuid,
    ) -> ResultEngine<Option<LedgerEntry>> {
        if self.capabilities.entry_kind_tagging {
            return entries::Entity::find_by_id(entry_id.to_string())
                .one(conn)
                .await?
                .map(LedgerEntry::try_from)
                .transpose();
        }

        let row = conn
            .query_one(Statement::from_sql_and_values(
                conn.get_database_backend(),
                "SELECT id, customer_id, entry_date, created_at, entry_no, description, \
                 bill_reference, debit_minor, credit_minor, balance_minor, day_sequence, \
                 status, due_date, payment_mode, tax_rate_bps, tax_minor \
                 FROM ledger_entries WHERE id = ?",
                [entry_id.to_string().into()],
            ))
            .await?;
        row.as_ref().map(entries::entry_from_row).transpose()
    }

    /// Attaches line items to the given entries, in stored position order.
    pub(crate) async fn attach_line_items<C: ConnectionTrait>(
        &self,
        conn: &C,
        entries_out: &mut [LedgerEntry],
    ) -> ResultEngine<()> {
        if entries_out.is_empty() {
            return Ok(());
        }
        let ids: Vec<String> = entries_out.iter().map(|e| e.id.to_string()).collect();
        let models = line_items::Entity::find()
            .filter(line_items::Column::EntryId.is_in(ids))
            .order_by_asc(line_items::Column::Position)
            .all(conn)
            .await?;

        let mut by_entry: HashMap<String, Vec<crate::LineItem>> = HashMap::new();
        for model in models {
            by_entry
                .entry(model.entry_id.clone())
                .or_default()
                .push(model.into());
        }
        for entry in entries_out.iter_mut() {
            if let Some(items) = by_entry.remove(&entry.id.to_string()) {
                entry.line_items = items;
            }
        }
        Ok(())
    }

    async fn scalar_i64<C: ConnectionTrait>(
        &self,
        conn: &C,
        sql: &str,
        values: Vec<Value>,
    ) -> ResultEngine<i64> {
        let row = conn
            .query_one(Statement::from_sql_and_values(
                conn.get_database_backend(),
                sql,
                values,
            ))
            .await?;
        Ok(row.and_then(|r| r.try_get("", "value").ok()).unwrap_or(0))
    }

    /// Next value of the per-customer monotonic entry counter.
    pub(crate) async fn next_entry_no<C: ConnectionTrait>(
        &self,
        conn: &C,
        customer_id: &str,
    ) -> ResultEngine<i64> {
        let max = self
            .scalar_i64(
                conn,
                "SELECT COALESCE(MAX(entry_no), 0) AS value FROM ledger_entries \
                 WHERE customer_id = ?",
                vec![customer_id.into()],
            )
            .await?;
        Ok(max + 1)
    }

    /// Next whole same-day slot for `(customer_id, entry_date)`.
    pub(crate) async fn next_whole_sequence<C: ConnectionTrait>(
        &self,
        conn: &C,
        customer_id: &str,
        entry_date: NaiveDate,
    ) -> ResultEngine<DaySequence> {
        let max = self
            .scalar_i64(
                conn,
                "SELECT COALESCE(MAX(day_sequence), 0) AS value FROM ledger_entries \
                 WHERE customer_id = ? AND entry_date = ?",
                vec![customer_id.into(), entry_date.into()],
            )
            .await?;
        Ok(DaySequence::from_raw(max).next_whole())
    }

    /// Balance a new entry chains from, per the given strategy.
    pub(crate) async fn previous_balance<C: ConnectionTrait>(
        &self,
        conn: &C,
        customer_id: &str,
        rule: ChainingRule,
    ) -> ResultEngine<i64> {
        match rule {
            ChainingRule::ChronologicalTail => {
                self.scalar_i64(
                    conn,
                    "SELECT balance_minor AS value FROM ledger_entries \
                     WHERE customer_id = ? \
                     ORDER BY created_at DESC, entry_date DESC, day_sequence DESC, entry_no DESC \
                     LIMIT 1",
                    vec![customer_id.into()],
                )
                .await
            }
            ChainingRule::MaxPersisted => {
                self.scalar_i64(
                    conn,
                    "SELECT COALESCE(MAX(balance_minor), 0) AS value FROM ledger_entries \
                     WHERE customer_id = ?",
                    vec![customer_id.into()],
                )
                .await
            }
        }
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`, resolving the store's schema capabilities once.
    pub async fn build(self) -> ResultEngine<Engine> {
        let capabilities = capabilities::probe(&self.database).await?;
        Ok(Engine {
            database: self.database,
            capabilities,
            customer_locks: Mutex::new(HashMap::new()),
        })
    }
}
