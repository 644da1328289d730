use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The name of an article, as printed in the batch table and written to the card.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleName(String);

impl ArticleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ArticleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArticleName({:?})", self.0)
    }
}

impl fmt::Display for ArticleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl Borrow<str> for ArticleName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArticleName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ArticleName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One row of the article ledger.
///
/// `quantity` is always at least 1: an article with nothing scanned is simply
/// not in the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub article: ArticleName,
    pub quantity: u32,
}

impl LedgerEntry {
    pub fn new(article: impl Into<ArticleName>, quantity: u32) -> Self {
        Self {
            article: article.into(),
            quantity,
        }
    }

    /// The text stored on the card for this entry: `"{article}:{quantity}"`.
    pub fn record_text(&self) -> String {
        format!("{}:{}", self.article, self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_text_format() {
        let entry = LedgerEntry::new("Tea", 3);
        assert_eq!(entry.record_text(), "Tea:3");
    }

    #[test]
    fn article_borrows_as_str() {
        use std::collections::HashMap;
        let mut m: HashMap<ArticleName, u32> = HashMap::new();
        m.insert("Organic Green Tea".into(), 1);
        assert_eq!(m.get("Organic Green Tea"), Some(&1));
    }

    #[test]
    fn entry_serde_shape() {
        let entry = LedgerEntry::new("Pure Maple Syrup", 2);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"article":"Pure Maple Syrup","quantity":2}"#);
    }
}
