//! Block codec for the RFID batch writer.
//!
//! - [`BlockSerializer`] turns ledger rows into one [`BlockRecord`] per row,
//!   at consecutive block indices, each cut to the block width.
//! - [`BlockText`] renders a raw block read back from a card.
//!
//! [`BlockRecord`]: rbw_types::BlockRecord

pub mod error;
pub mod serializer;
pub mod text;

pub use error::{BlockError, BlockResult};
pub use serializer::BlockSerializer;
pub use text::BlockText;
