use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("invalid start block: {0}")]
    InvalidStartBlock(i64),

    #[error("block width must be positive")]
    InvalidWidth,
}

pub type BlockResult<T> = Result<T, BlockError>;
