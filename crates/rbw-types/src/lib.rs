//! Foundation types for the RFID batch writer (RBW).
//!
//! Every other RBW crate depends on `rbw-types`.
//!
//! # Key Types
//!
//! - [`TagId`] — A scanned tag identifier, trimmed and non-empty
//! - [`ArticleName`] — The article a tag resolves to
//! - [`LedgerEntry`] — One article with its accumulated quantity
//! - [`SectorKey`] — 6-byte MIFARE authentication key
//! - [`BlockRecord`] — A payload addressed to one card block

pub mod article;
pub mod block;
pub mod error;
pub mod key;
pub mod tag;

pub use article::{ArticleName, LedgerEntry};
pub use block::{BlockRecord, BLOCK_WIDTH};
pub use error::TypeError;
pub use key::{SectorKey, KEY_LEN};
pub use tag::TagId;
