use serde::Serialize;

use crate::error::CardError;

/// What happened to one record of a write batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockStatus {
    Written,
    Failed,
    /// Not attempted because an earlier block failed.
    Skipped,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BlockOutcome {
    pub block: u32,
    pub status: BlockStatus,
    /// Driver message for a failed block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BlockOutcome {
    pub fn written(block: u32) -> Self {
        Self {
            block,
            status: BlockStatus::Written,
            error: None,
        }
    }

    pub fn failed(block: u32, error: &CardError) -> Self {
        Self {
            block,
            status: BlockStatus::Failed,
            error: Some(error.to_string()),
        }
    }

    pub fn skipped(block: u32) -> Self {
        Self {
            block,
            status: BlockStatus::Skipped,
            error: None,
        }
    }
}

/// Result of writing one batch of block records.
///
/// Blocks are written in order and the batch stops at the first failure.
/// Blocks written before the failure stay written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchReport {
    /// One outcome per record, in write order.
    pub outcomes: Vec<BlockOutcome>,
    /// The first failure, if any.
    pub failure: Option<CardError>,
}

impl BatchReport {
    pub(crate) fn new() -> Self {
        Self {
            outcomes: Vec::new(),
            failure: None,
        }
    }

    /// Number of records in the batch.
    pub fn planned(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of blocks a write was attempted on.
    pub fn attempted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status != BlockStatus::Skipped)
            .count()
    }

    /// Blocks written successfully, in order.
    pub fn written(&self) -> Vec<u32> {
        self.outcomes
            .iter()
            .filter(|o| o.status == BlockStatus::Written)
            .map(|o| o.block)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DriverError;

    #[test]
    fn counts_reflect_outcomes() {
        let err = CardError::Write {
            block: 5,
            source: DriverError::new("boom"),
        };
        let report = BatchReport {
            outcomes: vec![
                BlockOutcome::written(4),
                BlockOutcome::failed(5, &err),
                BlockOutcome::skipped(6),
            ],
            failure: Some(err),
        };
        assert_eq!(report.planned(), 3);
        assert_eq!(report.attempted(), 2);
        assert_eq!(report.written(), vec![4]);
        assert!(!report.is_complete());
    }

    #[test]
    fn outcome_json_shape() {
        let ok = serde_json::to_string(&BlockOutcome::written(4)).unwrap();
        assert_eq!(ok, r#"{"block":4,"status":"written"}"#);

        let err = CardError::NotConnected;
        let bad = serde_json::to_string(&BlockOutcome::failed(5, &err)).unwrap();
        assert_eq!(bad, r#"{"block":5,"status":"failed","error":"reader is not connected"}"#);
    }

    #[test]
    fn empty_report_is_complete() {
        let report = BatchReport::new();
        assert_eq!(report.planned(), 0);
        assert!(report.is_complete());
    }
}
