use std::path::Path;

use rbw_types::{SectorKey, BLOCK_WIDTH};
use serde::{Deserialize, Serialize};

use crate::error::{StationError, StationResult};

/// Station settings, usually read from a TOML file.
///
/// Every field is optional in the file; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// Reader to connect to. `None` picks the first reader listed.
    pub reader_name: Option<String>,
    /// Key A for the blocks written, as hex.
    pub sector_key: String,
    /// First block of a write batch.
    pub start_block: u32,
    /// Bytes per record; at most one card block.
    pub block_width: usize,
    /// Use the in-memory card instead of a real reader.
    pub simulate: bool,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            reader_name: None,
            sector_key: "FFFFFFFFFFFF".into(),
            start_block: 4,
            block_width: BLOCK_WIDTH,
            simulate: false,
        }
    }
}

impl StationConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> StationResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> StationResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| StationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> StationResult<String> {
        toml::to_string_pretty(self).map_err(|e| StationError::Config(e.to_string()))
    }

    pub fn validate(&self) -> StationResult<()> {
        self.key()?;
        if self.block_width == 0 || self.block_width > BLOCK_WIDTH {
            return Err(StationError::Config(format!(
                "block_width must be between 1 and {BLOCK_WIDTH}, got {}",
                self.block_width
            )));
        }
        Ok(())
    }

    /// The parsed sector key.
    pub fn key(&self) -> StationResult<SectorKey> {
        Ok(SectorKey::from_hex(&self.sector_key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = StationConfig::default();
        assert_eq!(c.start_block, 4);
        assert_eq!(c.block_width, 16);
        assert_eq!(c.key().unwrap(), SectorKey::DEFAULT);
        assert!(c.reader_name.is_none());
        assert!(!c.simulate);
        c.validate().unwrap();
    }

    #[test]
    fn partial_file_uses_defaults() {
        let c = StationConfig::from_toml_str(
            r#"
            reader_name = "ACS ACR122U PICC Interface 00 00"
            start_block = 8
            "#,
        )
        .unwrap();
        assert_eq!(c.reader_name.as_deref(), Some("ACS ACR122U PICC Interface 00 00"));
        assert_eq!(c.start_block, 8);
        assert_eq!(c.sector_key, "FFFFFFFFFFFF");
    }

    #[test]
    fn spaced_key_accepted() {
        let c = StationConfig::from_toml_str(r#"sector_key = "A0 A1 A2 A3 A4 A5""#).unwrap();
        assert_eq!(c.key().unwrap().to_hex(), "A0A1A2A3A4A5");
    }

    #[test]
    fn bad_key_rejected() {
        let err = StationConfig::from_toml_str(r#"sector_key = "FFFF""#).unwrap_err();
        assert!(matches!(err, StationError::Type(_)));
    }

    #[test]
    fn bad_width_rejected() {
        for width in [0, 17] {
            let err = StationConfig::from_toml_str(&format!("block_width = {width}")).unwrap_err();
            assert!(matches!(err, StationError::Config(_)));
        }
    }

    #[test]
    fn malformed_toml_rejected() {
        let err = StationConfig::from_toml_str("start_block = \"four\"").unwrap_err();
        assert!(matches!(err, StationError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "simulate = true").unwrap();
        writeln!(file, "start_block = 12").unwrap();

        let c = StationConfig::load(file.path()).unwrap();
        assert!(c.simulate);
        assert_eq!(c.start_block, 12);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = StationConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, StationError::Io(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let c = StationConfig {
            reader_name: Some("Reader 0".into()),
            simulate: true,
            ..StationConfig::default()
        };
        let text = c.to_toml_string().unwrap();
        assert_eq!(StationConfig::from_toml_str(&text).unwrap(), c);
    }
}
