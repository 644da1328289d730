use rbw_types::{BlockRecord, LedgerEntry, BLOCK_WIDTH};
use tracing::warn;

use crate::error::{BlockError, BlockResult};

/// Converts ledger rows into card block records.
///
/// Row `i` becomes the text `"{article}:{quantity}"` at block
/// `start_block + i`. Text longer than the block width is cut to its first
/// `width` bytes, which may split a multi-byte character or drop quantity
/// digits. Cutting is never an error; it is logged at WARN.
pub struct BlockSerializer;

impl BlockSerializer {
    /// Serialize at the standard 16-byte block width.
    pub fn serialize(entries: &[LedgerEntry], start_block: i64) -> BlockResult<Vec<BlockRecord>> {
        Self::serialize_with_width(entries, start_block, BLOCK_WIDTH)
    }

    /// Serialize with an explicit block width.
    pub fn serialize_with_width(
        entries: &[LedgerEntry],
        start_block: i64,
        width: usize,
    ) -> BlockResult<Vec<BlockRecord>> {
        if width == 0 {
            return Err(BlockError::InvalidWidth);
        }
        let start = u32::try_from(start_block)
            .map_err(|_| BlockError::InvalidStartBlock(start_block))?;
        if !entries.is_empty() {
            let last = u64::from(start) + entries.len() as u64 - 1;
            if last > u64::from(u32::MAX) {
                return Err(BlockError::InvalidStartBlock(start_block));
            }
        }

        let records = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let index = start + i as u32;
                let text = entry.record_text();
                let mut payload = text.into_bytes();
                if payload.len() > width {
                    warn!(
                        block = index,
                        article = %entry.article,
                        len = payload.len(),
                        width,
                        "record truncated to block width"
                    );
                    payload.truncate(width);
                }
                BlockRecord::new(index, payload)
            })
            .collect();
        Ok(records)
    }

    /// Whether `entry` would lose bytes at `width`.
    pub fn would_truncate(entry: &LedgerEntry, width: usize) -> bool {
        entry.record_text().len() > width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_short_entry_is_not_padded() {
        let entries = vec![LedgerEntry::new("Tea", 3)];
        let records = BlockSerializer::serialize(&entries, 4).unwrap();
        assert_eq!(records, vec![BlockRecord::new(4, b"Tea:3".to_vec())]);
        assert_eq!(records[0].payload.len(), 5);
    }

    #[test]
    fn long_record_is_cut_to_width() {
        // "Chamomile Blend:" is 16 bytes, "...:1234" makes 20.
        let entry = LedgerEntry::new("Chamomile Blend", 1234);
        let text = entry.record_text();
        assert_eq!(text.len(), 20);

        let records = BlockSerializer::serialize_with_width(&[entry], 0, 16).unwrap();
        assert_eq!(records[0].payload, text.as_bytes()[..16].to_vec());
    }

    #[test]
    fn exact_width_is_kept_whole() {
        let entry = LedgerEntry::new("Fourteen chars", 9);
        assert_eq!(entry.record_text().len(), 16);
        assert!(!BlockSerializer::would_truncate(&entry, 16));
        let records = BlockSerializer::serialize(&[entry], 1).unwrap();
        assert_eq!(records[0].payload, b"Fourteen chars:9".to_vec());
    }

    #[test]
    fn multibyte_character_may_be_split() {
        // 15 ASCII bytes then "é" (2 bytes): the cut lands inside it.
        let entry = LedgerEntry::new("AAAAAAAAAAAAAAAé", 1);
        let records = BlockSerializer::serialize(&[entry], 0).unwrap();
        assert_eq!(records[0].payload.len(), 16);
        assert_eq!(records[0].payload[15], 0xC3);
    }

    #[test]
    fn indices_are_consecutive_from_start() {
        let entries = vec![
            LedgerEntry::new("A", 1),
            LedgerEntry::new("B", 2),
            LedgerEntry::new("C", 3),
        ];
        let records = BlockSerializer::serialize(&entries, 8).unwrap();
        let indices: Vec<u32> = records.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![8, 9, 10]);
        assert_eq!(records[1].payload, b"B:2".to_vec());
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let records = BlockSerializer::serialize(&[], 4).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn negative_start_block_rejected() {
        let entries = vec![LedgerEntry::new("Tea", 1)];
        assert_eq!(
            BlockSerializer::serialize(&entries, -1),
            Err(BlockError::InvalidStartBlock(-1))
        );
        // Even with nothing to write.
        assert_eq!(
            BlockSerializer::serialize(&[], -3),
            Err(BlockError::InvalidStartBlock(-3))
        );
    }

    #[test]
    fn index_overflow_rejected() {
        let entries = vec![LedgerEntry::new("A", 1), LedgerEntry::new("B", 1)];
        let start = i64::from(u32::MAX);
        assert_eq!(
            BlockSerializer::serialize(&entries, start),
            Err(BlockError::InvalidStartBlock(start))
        );
    }

    #[test]
    fn zero_width_rejected() {
        assert_eq!(
            BlockSerializer::serialize_with_width(&[], 0, 0),
            Err(BlockError::InvalidWidth)
        );
    }

    #[test]
    fn coffee_and_tea_scenario() {
        let entries = vec![
            LedgerEntry::new("Premium Coffee Beans", 2),
            LedgerEntry::new("Organic Green Tea", 1),
        ];
        let records = BlockSerializer::serialize(&entries, 4).unwrap();
        assert_eq!(
            records,
            vec![
                BlockRecord::new(4, b"Premium Coffee B".to_vec()),
                BlockRecord::new(5, b"Organic Green Te".to_vec()),
            ]
        );
    }
}
