use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Divisions must be greater than zero")]
    ZeroDivisions,

    #[error("Value {0} does not fit in a variable-length quantity")]
    VlqOverflow(u32),

    #[error("Value {value} does not fit in {width} byte(s)")]
    FixedWidthOverflow { value: u64, width: usize },

    #[error("Loop expansion exceeds {limit} bytes")]
    LoopTooLong { limit: usize },

    #[error("SMF parse error: {0}")]
    SmfParse(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
