use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no video stream found in {0}")]
    InvalidSource(String),
    #[error("message incomplete: {filled} of {total} watermark slots recovered")]
    Incomplete { filled: usize, total: usize },
    #[error("watermark does not decode to a valid message: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("message needs {symbols} base64 symbols but the watermark holds {capacity}")]
    MessageTooLong { symbols: usize, capacity: usize },
    #[error("video probe failed: {0}")]
    Probe(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
