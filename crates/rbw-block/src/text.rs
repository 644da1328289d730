use std::fmt;

use serde::Serialize;

/// Human-readable rendering of a raw block.
///
/// `text` keeps printable ASCII (space through `~`), stops at the first NUL
/// byte (the zero padding written after short records), and shows every
/// other byte as `.`. `hex` is an upper-case dump of all bytes, NULs
/// included.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BlockText {
    pub text: String,
    pub hex: String,
}

impl BlockText {
    pub fn decode(bytes: &[u8]) -> Self {
        let text = bytes
            .iter()
            .take_while(|&&b| b != 0x00)
            .map(|&b| if (0x20..=0x7E).contains(&b) { b as char } else { '.' })
            .collect();
        let hex = bytes
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ");
        Self { text, hex }
    }
}

impl fmt::Display for BlockText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n[Hex: {}]", self.text, self.hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_record_stops_at_nul() {
        let mut block = [0u8; 16];
        block[..5].copy_from_slice(b"Tea:3");
        let decoded = BlockText::decode(&block);
        assert_eq!(decoded.text, "Tea:3");
        assert!(decoded.hex.starts_with("54 65 61 3A 33 00"));
        assert_eq!(decoded.hex.split(' ').count(), 16);
    }

    #[test]
    fn non_printable_becomes_dot() {
        let decoded = BlockText::decode(&[b'A', 0x07, 0xC3, b'B']);
        assert_eq!(decoded.text, "A..B");
        assert_eq!(decoded.hex, "41 07 C3 42");
    }

    #[test]
    fn empty_block() {
        let decoded = BlockText::decode(&[]);
        assert_eq!(decoded.text, "");
        assert_eq!(decoded.hex, "");
    }

    #[test]
    fn display_shows_both_forms() {
        let decoded = BlockText::decode(b"Hi");
        assert_eq!(decoded.to_string(), "Hi\n[Hex: 48 69]");
    }
}
