//! Scanning station for the RFID batch writer.
//!
//! [`Station`] owns one scanning session: the tag catalog, the article
//! ledger, and the card reader. Front ends (the `rbw` CLI, tests) call it
//! synchronously in response to user actions.

pub mod config;
pub mod error;
pub mod station;

pub use config::StationConfig;
pub use error::{StationError, StationResult};
pub use station::{ScanReceipt, Station};

pub use rbw_block::BlockText;
pub use rbw_card::{BatchReport, BlockOutcome, BlockStatus, CardDriver, CardReader, MemoryCard};
pub use rbw_ledger::LedgerSnapshot;
pub use rbw_types::{ArticleName, BlockRecord, LedgerEntry, SectorKey};
