//! Simulated MIFARE Classic 1K card behind a simulated reader.
//!
//! [`MemoryCard`] implements [`CardDriver`] entirely in memory. It is used by
//! tests and by the CLI's `--simulate` mode, and can be scripted to fail a
//! chosen write so batch behaviour can be observed without hardware.

use rbw_types::{SectorKey, BLOCK_WIDTH, KEY_LEN};
use tracing::debug;

use crate::driver::{pad_block, CardDriver};
use crate::error::DriverError;

/// Name of the one reader a [`MemoryCard`] exposes.
pub const SIMULATED_READER: &str = "RBW Simulated Reader 00";

const BLOCK_COUNT: u32 = 64;
const BLOCKS_PER_SECTOR: u32 = 4;
const SECTOR_COUNT: u32 = BLOCK_COUNT / BLOCKS_PER_SECTOR;

/// A call that reached the driver, recorded in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DriverCall {
    Connect(String),
    Write { block: u32, payload: Vec<u8> },
    Read { block: u32 },
    Cleanup,
    ListReaders,
}

/// An in-memory card driver.
///
/// Layout follows a MIFARE Classic 1K card: 64 blocks in 16 sectors of 4,
/// the last block of each sector being its trailer (key A, access bits,
/// key B). Block 0 holds manufacturer data and is read-only. Every sector
/// starts with the factory key `FFFFFFFFFFFF`.
#[derive(Debug)]
pub struct MemoryCard {
    blocks: Vec<[u8; BLOCK_WIDTH]>,
    reader_present: bool,
    connected: bool,
    writes: usize,
    fail_write_at: Option<usize>,
    calls: Vec<DriverCall>,
}

impl MemoryCard {
    /// A blank card on a present reader.
    pub fn new() -> Self {
        let mut blocks = vec![[0u8; BLOCK_WIDTH]; BLOCK_COUNT as usize];
        blocks[0] = [
            0xDE, 0xAD, 0xBE, 0xEF, 0x22, 0x08, 0x04, 0x00, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67,
            0x68, 0x69,
        ];
        for sector in 0..SECTOR_COUNT {
            blocks[trailer_block(sector) as usize] = default_trailer();
        }
        Self {
            blocks,
            reader_present: true,
            connected: false,
            writes: 0,
            fail_write_at: None,
            calls: Vec::new(),
        }
    }

    /// A card whose reader is unplugged: every connect fails.
    pub fn without_reader() -> Self {
        Self {
            reader_present: false,
            ..Self::new()
        }
    }

    /// Make the `n`-th `write_block` call (1-based) fail.
    pub fn fail_write_at(mut self, n: usize) -> Self {
        self.fail_write_at = Some(n);
        self
    }

    /// Replace key A of `sector` (0..16).
    pub fn with_sector_key(mut self, sector: u32, key: SectorKey) -> Result<Self, DriverError> {
        if sector >= SECTOR_COUNT {
            return Err(DriverError::new(format!("sector {sector} out of range")));
        }
        let trailer = trailer_block(sector) as usize;
        self.blocks[trailer][..KEY_LEN].copy_from_slice(key.as_bytes());
        Ok(self)
    }

    /// Every call that reached this driver, in order.
    pub fn calls(&self) -> &[DriverCall] {
        &self.calls
    }

    /// Blocks passed to `write_block`, in call order.
    pub fn write_calls(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DriverCall::Write { block, .. } => Some(*block),
                _ => None,
            })
            .collect()
    }

    /// Raw contents of a block, bypassing authentication.
    pub fn block(&self, block: u32) -> Option<&[u8; BLOCK_WIDTH]> {
        self.blocks.get(block as usize)
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    fn authenticate(&self, key: &SectorKey, block: u32) -> Result<(), DriverError> {
        if !self.connected {
            return Err(DriverError::new("Not connected to card"));
        }
        if block >= BLOCK_COUNT {
            return Err(DriverError::new(format!("block {block} out of range")));
        }
        let sector = block / BLOCKS_PER_SECTOR;
        let trailer = &self.blocks[trailer_block(sector) as usize];
        if &trailer[..KEY_LEN] != key.as_bytes() {
            return Err(DriverError::new("Authentication failed: SW=6300"));
        }
        Ok(())
    }
}

impl Default for MemoryCard {
    fn default() -> Self {
        Self::new()
    }
}

fn default_trailer() -> [u8; BLOCK_WIDTH] {
    let mut trailer = [0xFF; BLOCK_WIDTH];
    trailer[6..10].copy_from_slice(&[0xFF, 0x07, 0x80, 0x69]);
    trailer
}

fn trailer_block(sector: u32) -> u32 {
    sector * BLOCKS_PER_SECTOR + BLOCKS_PER_SECTOR - 1
}

fn is_trailer(block: u32) -> bool {
    block % BLOCKS_PER_SECTOR == BLOCKS_PER_SECTOR - 1
}

impl CardDriver for MemoryCard {
    fn connect(&mut self, reader: &str) -> Result<(), DriverError> {
        self.calls.push(DriverCall::Connect(reader.to_string()));
        if !self.reader_present || reader != SIMULATED_READER {
            return Err(DriverError::new("SCardConnect failed (0x8010000C)"));
        }
        self.connected = true;
        debug!(reader, "simulated card connected");
        Ok(())
    }

    fn write_block(
        &mut self,
        key: &SectorKey,
        block: u32,
        payload: &[u8],
    ) -> Result<(), DriverError> {
        self.calls.push(DriverCall::Write {
            block,
            payload: payload.to_vec(),
        });
        self.writes += 1;
        self.authenticate(key, block)?;
        if self.fail_write_at == Some(self.writes) {
            return Err(DriverError::new("Write failed: SW=6581"));
        }
        if block == 0 {
            return Err(DriverError::new("Write failed: SW=6982"));
        }
        self.blocks[block as usize] = pad_block(payload);
        Ok(())
    }

    fn read_block(&mut self, key: &SectorKey, block: u32) -> Result<Vec<u8>, DriverError> {
        self.calls.push(DriverCall::Read { block });
        self.authenticate(key, block)?;
        let mut data = self.blocks[block as usize].to_vec();
        if is_trailer(block) {
            // Key A never reads back.
            data[..KEY_LEN].fill(0);
        }
        Ok(data)
    }

    fn cleanup(&mut self) {
        self.calls.push(DriverCall::Cleanup);
        self.connected = false;
    }

    fn list_readers(&mut self) -> Result<Vec<String>, DriverError> {
        self.calls.push(DriverCall::ListReaders);
        if self.reader_present {
            Ok(vec![SIMULATED_READER.to_string()])
        } else {
            Err(DriverError::new("ERROR: No readers found (0x8010002E)"))
        }
    }
}
