use std::collections::{BTreeSet, HashMap};

use rbw_types::ArticleName;
use tracing::debug;

use crate::error::{CatalogError, CatalogResult};

/// Tag table compiled into the binary.
pub const BUILTIN_TAGS: &[(&str, &str)] = &[
    ("RFID_1234", "Premium Coffee Beans"),
    ("RFID_5678", "Organic Green Tea"),
    ("RFID_9012", "Pure Maple Syrup"),
    ("RFID_1111", "Premium Coffee Beans"),
    ("RFID_2222", "Organic Green Tea"),
];

/// Immutable lookup from tag identifier to article name.
#[derive(Debug, Clone)]
pub struct TagCatalog {
    tags: HashMap<String, ArticleName>,
}

impl TagCatalog {
    /// The catalog built from [`BUILTIN_TAGS`].
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_TAGS.iter().copied())
    }

    /// Build a catalog from `(identifier, article)` pairs. A later pair for
    /// the same identifier replaces an earlier one.
    pub fn from_pairs<I, T, A>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, A)>,
        T: Into<String>,
        A: Into<ArticleName>,
    {
        let tags = pairs
            .into_iter()
            .map(|(tag, article)| (tag.into(), article.into()))
            .collect();
        Self { tags }
    }

    /// Resolve a scanned identifier. Surrounding whitespace is ignored.
    pub fn resolve(&self, identifier: &str) -> CatalogResult<&ArticleName> {
        let tag = identifier.trim();
        match self.tags.get(tag) {
            Some(article) => {
                debug!(tag, article = %article, "tag resolved");
                Ok(article)
            }
            None => {
                debug!(tag, "tag not in catalog");
                Err(CatalogError::TagNotFound {
                    tag: tag.to_string(),
                })
            }
        }
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.tags.contains_key(identifier.trim())
    }

    /// Distinct article names, sorted.
    pub fn articles(&self) -> Vec<&ArticleName> {
        let set: BTreeSet<&ArticleName> = self.tags.values().collect();
        set.into_iter().collect()
    }

    /// Number of registered identifiers.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Default for TagCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_resolves_known_tags() {
        let catalog = TagCatalog::builtin();
        assert_eq!(catalog.len(), 5);
        assert_eq!(
            catalog.resolve("RFID_1234").unwrap().as_str(),
            "Premium Coffee Beans"
        );
        assert_eq!(
            catalog.resolve("RFID_9012").unwrap().as_str(),
            "Pure Maple Syrup"
        );
    }

    #[test]
    fn many_tags_share_one_article() {
        let catalog = TagCatalog::builtin();
        assert_eq!(
            catalog.resolve("RFID_1234").unwrap(),
            catalog.resolve("RFID_1111").unwrap()
        );
        assert_eq!(
            catalog.resolve("RFID_5678").unwrap(),
            catalog.resolve("RFID_2222").unwrap()
        );
    }

    #[test]
    fn unknown_tag_is_distinct_error() {
        let catalog = TagCatalog::builtin();
        let err = catalog.resolve("RFID_0000").unwrap_err();
        assert_eq!(
            err,
            CatalogError::TagNotFound {
                tag: "RFID_0000".into()
            }
        );
    }

    #[test]
    fn whitespace_is_stripped_before_lookup() {
        let catalog = TagCatalog::builtin();
        assert!(catalog.resolve("  RFID_5678\r\n").is_ok());
        assert!(catalog.contains("\tRFID_5678 "));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let catalog = TagCatalog::builtin();
        assert!(catalog.resolve("rfid_1234").is_err());
    }

    #[test]
    fn articles_are_distinct_and_sorted() {
        let catalog = TagCatalog::builtin();
        let names: Vec<&str> = catalog.articles().into_iter().map(|a| a.as_str()).collect();
        assert_eq!(
            names,
            vec!["Organic Green Tea", "Premium Coffee Beans", "Pure Maple Syrup"]
        );
    }

    #[test]
    fn custom_pairs() {
        let catalog = TagCatalog::from_pairs([("A1", "Tea"), ("A2", "Tea")]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.articles().len(), 1);
        assert!(!catalog.is_empty());
    }
}
