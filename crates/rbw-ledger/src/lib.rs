//! Article ledger for the RFID batch writer (RBW).
//!
//! The ledger is the single source of truth for a scanning session: the
//! table shown to the operator is rendered from it, and the card writer
//! serializes a [`LedgerSnapshot`] of it.
//!
//! - Scanning an article adds one to its quantity, or appends it with 1.
//! - Rows keep the order in which their article was first scanned; the
//!   first article scanned is written to the first block.
//! - Quantities never drop to zero in place. Removing an article deletes
//!   its row.

pub mod ledger;
pub mod snapshot;

pub use ledger::ArticleLedger;
pub use snapshot::LedgerSnapshot;
