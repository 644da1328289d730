use rbw_types::LedgerEntry;
use serde::{Deserialize, Serialize};

/// A frozen copy of the ledger rows, in first-scan order.
///
/// Owning its rows, a snapshot is unaffected by anything done to the ledger
/// after it was taken. A write batch is always built from one snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerSnapshot {
    entries: Vec<LedgerEntry>,
}

impl LedgerSnapshot {
    pub fn new(entries: Vec<LedgerEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LedgerEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<LedgerEntry> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a LedgerSnapshot {
    type Item = &'a LedgerEntry;
    type IntoIter = std::slice::Iter<'a, LedgerEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
