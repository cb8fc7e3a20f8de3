//! Error types raised by the save/load path.

use thiserror::Error;

/// Errors surfaced while encoding, decoding or storing save data.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save data is not valid hex text: {0}")]
    Encoding(#[from] hex::FromHexError),

    #[error("save data is not a valid save document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("save data has no usable currency field")]
    MissingCurrency,

    #[error("save field `{field}` is {value}, above the limit of {max}")]
    OutOfRange { field: String, value: u64, max: u64 },

    #[error("`{field}` is not a finite number and cannot be saved")]
    NonFinite { field: &'static str },

    #[error("save version {saved} is older than the minimum supported version {min_compatible}")]
    IncompatibleVersion { saved: u32, min_compatible: u32 },

    #[error("save slot I/O error: {0}")]
    Storage(#[from] std::io::Error),
}

impl SaveError {
    /// True when the blob itself was unusable, as opposed to the slot failing.
    pub fn is_invalid_data(&self) -> bool {
        !matches!(self, SaveError::Storage(_))
    }
}

pub type Result<T> = std::result::Result<T, SaveError>;
