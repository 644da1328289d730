use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// An identifier read from an RFID tag.
///
/// Readers that emulate a keyboard deliver identifiers with stray whitespace
/// (typically a trailing newline), so parsing strips leading and trailing
/// whitespace. The identifier is otherwise opaque.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(String);

impl TagId {
    /// Parse a raw scanned string, trimming surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TypeError::EmptyTag);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TagId({})", self.0)
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl std::str::FromStr for TagId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        let tag = TagId::parse("  RFID_1234\n").unwrap();
        assert_eq!(tag.as_str(), "RFID_1234");
    }

    #[test]
    fn parse_rejects_blank() {
        assert_eq!(TagId::parse("   \t\n"), Err(TypeError::EmptyTag));
        assert_eq!(TagId::parse(""), Err(TypeError::EmptyTag));
    }

    #[test]
    fn inner_whitespace_is_kept() {
        let tag: TagId = "RFID 12".parse().unwrap();
        assert_eq!(tag.to_string(), "RFID 12");
    }
}
