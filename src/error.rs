use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Format error: {0}")]
    Format(String),

    #[error("Index out of range: channel {channel}, row {row}, col {col}")]
    Index { channel: usize, row: usize, col: usize },

    #[error("Cannot allocate {width}x{height} image with {channels} channel(s) and depth {depth}")]
    Allocation {
        width: usize,
        height: usize,
        channels: usize,
        depth: u32,
    },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Improper value of {name}: {value}")]
    ParameterRange { name: &'static str, value: String },

    #[error("Improper input: {0:?}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImageError {
    pub fn parameter(name: &'static str, value: impl ToString) -> Self {
        ImageError::ParameterRange {
            name,
            value: value.to_string(),
        }
    }
}
