use serde::{Deserialize, Serialize};

/// Size of one MIFARE Classic data block in bytes.
pub const BLOCK_WIDTH: usize = 16;

/// A payload addressed to one card block.
///
/// The payload is at most one block wide. It is not padded: filling the rest
/// of the physical block with zeros is the card driver's job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub index: u32,
    pub payload: Vec<u8>,
}

impl BlockRecord {
    pub fn new(index: u32, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            index,
            payload: payload.into(),
        }
    }

    /// The payload as text, with any bytes cut mid-character replaced.
    pub fn payload_lossy(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}
