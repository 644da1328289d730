//! Reader APDUs for MIFARE Classic access through a PC/SC contactless reader.
//!
//! These are the pseudo-APDUs (class `FF`) that PC/SC part 3 readers accept:
//! load a key into a volatile key slot, authenticate a block with it, then
//! read or update the block. Every response ends in a two-byte status word;
//! `90 00` is success.

use rbw_types::{SectorKey, BLOCK_WIDTH};

use crate::error::DriverError;

/// Volatile key slot used for every operation.
pub const KEY_SLOT: u8 = 0x00;
/// Authenticate as key A.
pub const KEY_TYPE_A: u8 = 0x60;

const CLA: u8 = 0xFF;
const INS_LOAD_KEY: u8 = 0x82;
const INS_AUTHENTICATE: u8 = 0x86;
const INS_READ_BINARY: u8 = 0xB0;
const INS_UPDATE_BINARY: u8 = 0xD6;
const KEY_STRUCTURE_VOLATILE: u8 = 0x20;

/// `FF 82 20 <slot> 06 <key>`
pub fn load_key(key: &SectorKey) -> Vec<u8> {
    let mut apdu = vec![CLA, INS_LOAD_KEY, KEY_STRUCTURE_VOLATILE, KEY_SLOT, 0x06];
    apdu.extend_from_slice(key.as_bytes());
    apdu
}

/// `FF 86 00 00 05 01 00 <block> 60 <slot>`
pub fn authenticate(block: u8) -> Vec<u8> {
    vec![
        CLA,
        INS_AUTHENTICATE,
        0x00,
        0x00,
        0x05,
        0x01,
        0x00,
        block,
        KEY_TYPE_A,
        KEY_SLOT,
    ]
}

/// `FF B0 00 <block> 10`
pub fn read_binary(block: u8) -> Vec<u8> {
    vec![CLA, INS_READ_BINARY, 0x00, block, BLOCK_WIDTH as u8]
}

/// `FF D6 00 <block> 10 <16 bytes>`
pub fn update_binary(block: u8, data: &[u8; BLOCK_WIDTH]) -> Vec<u8> {
    let mut apdu = vec![CLA, INS_UPDATE_BINARY, 0x00, block, BLOCK_WIDTH as u8];
    apdu.extend_from_slice(data);
    apdu
}

/// Split a response into its data and check the trailing status word.
///
/// `step` names the operation for the error message.
pub fn check_response<'a>(step: &str, response: &'a [u8]) -> Result<&'a [u8], DriverError> {
    if response.len() < 2 {
        return Err(DriverError::new(format!(
            "{step}: invalid response length {}",
            response.len()
        )));
    }
    let (data, sw) = response.split_at(response.len() - 2);
    if sw == [0x90, 0x00] {
        Ok(data)
    } else {
        Err(DriverError::new(format!(
            "{step} failed: SW={:02X}{:02X}",
            sw[0], sw[1]
        )))
    }
}

/// MIFARE block addresses fit in one APDU byte.
pub fn block_address(block: u32) -> Result<u8, DriverError> {
    u8::try_from(block).map_err(|_| DriverError::new(format!("block {block} out of range")))
}
