use thiserror::Error;

use crate::codec::CodecError;
use crate::registry::ListError;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record: {0}")]
    Codec(#[from] CodecError),

    #[error(transparent)]
    List(#[from] ListError),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Bad {field}: expected {expected:#010x}, found {found:#010x}")]
    Format { field: &'static str, expected: u32, found: u32 },

    #[error("Save data truncated: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("Corruption detected: {0}")]
    Corruption(String),

    #[error("File not found: {path}")]
    FileNotFound { path: String },
}

impl SaveError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            SaveError::Io(_) => true,
            SaveError::FileNotFound { .. } => true,
            SaveError::Config(_) => true,
            SaveError::List(err) => err.is_recoverable(),
            SaveError::Format { .. } => false,
            SaveError::Truncated { .. } => false,
            SaveError::Codec(_) => false,
            SaveError::Corruption(_) => false,
        }
    }
}
