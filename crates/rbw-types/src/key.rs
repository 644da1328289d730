use std::fmt;

use crate::error::TypeError;

/// Length of a MIFARE Classic sector key in bytes.
pub const KEY_LEN: usize = 6;

/// A MIFARE Classic sector key (key A or key B).
///
/// Keys are entered as 12 hex digits, optionally grouped with spaces:
/// `"FFFFFFFFFFFF"` and `"FF FF FF FF FF FF"` are the same key. The `Debug`
/// form hides the key material.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectorKey([u8; KEY_LEN]);

impl SectorKey {
    /// Factory transport key shipped on blank cards.
    pub const DEFAULT: Self = Self([0xFF; KEY_LEN]);

    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse from a hex string. Spaces between digit pairs are ignored.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = hex::decode(&compact).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != KEY_LEN {
            return Err(TypeError::InvalidKeyLength {
                expected: KEY_LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; KEY_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Upper-case hex, no separators.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl Default for SectorKey {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Debug for SectorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SectorKey(******)")
    }
}

impl std::str::FromStr for SectorKey {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_compact_and_spaced() {
        let a = SectorKey::from_hex("FFFFFFFFFFFF").unwrap();
        let b = SectorKey::from_hex("FF FF FF FF FF FF").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, SectorKey::DEFAULT);
    }

    #[test]
    fn parse_lowercase() {
        let key = SectorKey::from_hex("a0a1a2a3a4a5").unwrap();
        assert_eq!(key.as_bytes(), &[0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5]);
        assert_eq!(key.to_hex(), "A0A1A2A3A4A5");
    }

    #[test]
    fn wrong_length_rejected() {
        let err = SectorKey::from_hex("FFFF").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidKeyLength {
                expected: 6,
                actual: 2
            }
        );
    }

    #[test]
    fn non_hex_rejected() {
        assert!(matches!(
            SectorKey::from_hex("GGGGGGGGGGGG"),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn debug_hides_material() {
        let key = SectorKey::from_hex("A0A1A2A3A4A5").unwrap();
        assert!(!format!("{key:?}").contains("A0"));
    }
}
