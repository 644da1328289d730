use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationError {
    #[error(transparent)]
    Catalog(#[from] rbw_catalog::CatalogError),

    #[error(transparent)]
    Block(#[from] rbw_block::BlockError),

    #[error(transparent)]
    Card(#[from] rbw_card::CardError),

    #[error("invalid value: {0}")]
    Type(#[from] rbw_types::TypeError),

    #[error("no card reader found")]
    NoReader,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StationResult<T> = Result<T, StationError>;
