use rbw_types::{SectorKey, BLOCK_WIDTH};

use crate::error::DriverError;

/// The native card driver boundary.
///
/// Implementations talk to one physical (or simulated) reader. Block writes
/// and reads authenticate the target block with `key` as key A before
/// touching it. A driver never retries; every failure is returned as a
/// [`DriverError`].
pub trait CardDriver: Send {
    /// Open a session with the named reader.
    fn connect(&mut self, reader: &str) -> Result<(), DriverError>;

    /// Authenticate `block` and write `payload` to it. Payloads shorter than
    /// a block are zero-padded (see [`pad_block`]).
    fn write_block(
        &mut self,
        key: &SectorKey,
        block: u32,
        payload: &[u8],
    ) -> Result<(), DriverError>;

    /// Authenticate `block` and return its raw contents.
    fn read_block(&mut self, key: &SectorKey, block: u32) -> Result<Vec<u8>, DriverError>;

    /// Release the session and any driver resources. Best-effort.
    fn cleanup(&mut self);

    /// Names of the readers the driver can see.
    fn list_readers(&mut self) -> Result<Vec<String>, DriverError>;
}

/// Zero-pad (or cut) a payload to exactly one block.
pub fn pad_block(payload: &[u8]) -> [u8; BLOCK_WIDTH] {
    let mut block = [0u8; BLOCK_WIDTH];
    let len = payload.len().min(BLOCK_WIDTH);
    block[..len].copy_from_slice(&payload[..len]);
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_payload_is_zero_padded() {
        let block = pad_block(b"Tea:3");
        assert_eq!(&block[..5], b"Tea:3");
        assert!(block[5..].iter().all(|&b| b == 0));
    }

    #[test]
    fn full_payload_unchanged() {
        let block = pad_block(b"0123456789ABCDEF");
        assert_eq!(&block, b"0123456789ABCDEF");
    }
}
