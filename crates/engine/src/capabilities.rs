//! Schema capabilities of the ledger store.
//!
//! Older deployments predate the entry-kind tagging columns. Instead of a
//! hidden mutable flag, the capabilities are resolved once when the engine is
//! built and threaded through the components that care (deduplication and
//! the mutation paths).

use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};

use crate::ResultEngine;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchemaCapabilities {
    /// Whether `ledger_entries` carries `entry_kind`/`principal_entry_id`.
    ///
    /// Without it, deduplication matches on `(bill_reference, customer_id)`
    /// alone and inserts omit the tagging columns.
    pub entry_kind_tagging: bool,
}

impl SchemaCapabilities {
    pub const FULL: SchemaCapabilities = SchemaCapabilities {
        entry_kind_tagging: true,
    };

    pub const REDUCED: SchemaCapabilities = SchemaCapabilities {
        entry_kind_tagging: false,
    };
}

/// Probes the store schema once, at engine build time.
///
/// A missing `ledger_entries` table is a real error; a missing `entry_kind`
/// column is the documented capability fallback and only logs a warning.
pub(crate) async fn probe(database: &DatabaseConnection) -> ResultEngine<SchemaCapabilities> {
    let backend = database.get_database_backend();

    database
        .query_one(Statement::from_string(
            backend,
            "SELECT id FROM ledger_entries LIMIT 1",
        ))
        .await?;

    let tagged = database
        .query_one(Statement::from_string(
            backend,
            "SELECT entry_kind FROM ledger_entries LIMIT 1",
        ))
        .await;

    match tagged {
        Ok(_) => Ok(SchemaCapabilities::FULL),
        Err(err) => {
            tracing::warn!(
                "ledger store lacks entry-kind tagging, using reduced matching/insert paths: {err}"
            );
            Ok(SchemaCapabilities::REDUCED)
        }
    }
}
