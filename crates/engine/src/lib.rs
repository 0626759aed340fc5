//! Customer-ledger reconciliation engine.
//!
//! Merges three record sources — sales invoices, purchase-order invoices and
//! manually entered ledger rows — into one deduplicated, chronologically
//! ordered running-balance statement per customer, and applies mutations
//! (create, bulk create, delete, update) with balance recomputation.

pub use capabilities::SchemaCapabilities;
pub use commands::{EntryPatch, NewEntry, NewInvoice, NewLineItem};
pub use dedup::filter_materialized;
pub use entries::{EntryKind, EntrySide, EntryStatus, LedgerEntry};
pub use error::EngineError;
pub use invoices::{DocumentKind, SourceDocument};
pub use ledger::StatementLine;
pub use line_items::LineItem;
pub use normalize::EntryCandidate;
pub use ops::{Engine, EngineBuilder};
pub use sequence::DaySequence;

mod capabilities;
mod commands;
mod dedup;
mod entries;
mod error;
mod invoice_line_items;
mod invoices;
mod ledger;
mod line_items;
mod normalize;
mod ops;
mod sequence;
mod tax;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
