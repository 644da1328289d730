//! Card transport for the RFID batch writer (RBW).
//!
//! The physical reader is reached through a [`CardDriver`]: four native
//! entry points (connect, write one block, read one block, cleanup) plus
//! reader enumeration. [`CardReader`] wraps a driver and owns the session
//! state machine:
//!
//! ```text
//! Disconnected --connect ok--> Connected --disconnect--> Disconnected
//! ```
//!
//! Block access while `Disconnected` fails with [`CardError::NotConnected`]
//! and never reaches the driver. Driver failures are passed up unchanged,
//! tagged with the operation that failed. Nothing is retried.
//!
//! # Drivers
//!
//! - [`MemoryCard`] — simulated MIFARE Classic 1K card, with fault injection
//! - `PcscDriver` — PC/SC readers (feature `pcsc`)

pub mod apdu;
pub mod batch;
pub mod driver;
pub mod error;
pub mod memory;
pub mod reader;
#[cfg(feature = "pcsc")]
pub mod smartcard;

pub use batch::{BatchReport, BlockOutcome, BlockStatus};
pub use driver::{pad_block, CardDriver};
pub use error::{CardError, CardResult, DriverError};
pub use memory::{DriverCall, MemoryCard, SIMULATED_READER};
#[cfg(feature = "pcsc")]
pub use smartcard::PcscDriver;
pub use reader::{CardReader, SessionState};
