use std::collections::HashMap;

use rbw_types::{ArticleName, LedgerEntry};
use tracing::debug;

use crate::snapshot::LedgerSnapshot;

/// Ordered mapping from article name to accumulated quantity.
///
/// Entries live in a `Vec` in first-scan order; `index` maps each article to
/// its position so a repeated scan is a constant-time bump. Every mutation
/// takes `&mut self`, so a read-then-write in [`record_scan`] cannot
/// interleave with another caller.
///
/// [`record_scan`]: ArticleLedger::record_scan
#[derive(Debug, Default, Clone)]
pub struct ArticleLedger {
    entries: Vec<LedgerEntry>,
    index: HashMap<ArticleName, usize>,
}

impl ArticleLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one scan of `article` and return its new quantity.
    ///
    /// Quantities saturate at `u32::MAX` instead of wrapping.
    pub fn record_scan(&mut self, article: &ArticleName) -> u32 {
        if let Some(&pos) = self.index.get(article) {
            let entry = &mut self.entries[pos];
            entry.quantity = entry.quantity.saturating_add(1);
            debug!(article = %article, quantity = entry.quantity, "article incremented");
            return entry.quantity;
        }

        self.index.insert(article.clone(), self.entries.len());
        self.entries.push(LedgerEntry::new(article.clone(), 1));
        debug!(article = %article, rows = self.entries.len(), "article added");
        1
    }

    /// Delete the row for `article`. Returns whether it existed.
    pub fn remove(&mut self, article: &str) -> bool {
        let Some(pos) = self.index.remove(article) else {
            return false;
        };
        self.entries.remove(pos);
        for entry in &self.entries[pos..] {
            if let Some(slot) = self.index.get_mut(entry.article.as_str()) {
                *slot -= 1;
            }
        }
        debug!(article, rows = self.entries.len(), "article removed");
        true
    }

    /// Remove every row.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        debug!("ledger cleared");
    }

    /// An owned copy of the current rows, in first-scan order.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::new(self.entries.clone())
    }

    /// Number of distinct articles.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current quantity of `article`; 0 if it has not been scanned.
    pub fn quantity_of(&self, article: &str) -> u32 {
        self.index
            .get(article)
            .map(|&pos| self.entries[pos].quantity)
            .unwrap_or(0)
    }

    /// Sum of all quantities.
    pub fn total_items(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// Borrowing view of the rows, in first-scan order.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }
}
