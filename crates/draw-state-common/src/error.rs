use thiserror::Error;

use crate::DrawKey;

pub type DrawStateResult<T> = Result<T, DrawStateError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawStateError {
    #[error("Decode error ({0})")]
    DecodeError(Box<str>),
    #[error("Cached buffer for key '{key}' is corrupt or does not match the slot list: slot {slot} needs {needed} bytes at offset {offset}, but only {remaining} remain")]
    BufferUnderrun {
        key: DrawKey,
        slot: usize,
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    #[error("Schema drift for key '{key}': decoded {consumed} bytes but the cached buffer holds {stored}. The slot lists used to save and restore differ.")]
    LengthMismatch {
        key: DrawKey,
        consumed: usize,
        stored: usize,
    },
    #[error("Schema drift for key '{key}': the slot kinds used to restore differ from the ones used to save")]
    LayoutMismatch { key: DrawKey },
    #[error("Invalid key ({0})")]
    InvalidKey(Box<str>),
}

impl DrawStateError {
    /// Whether the error means the save and restore slot lists drifted apart
    /// after every field decoded.
    pub fn is_schema_drift(&self) -> bool {
        matches!(
            self,
            DrawStateError::LengthMismatch { .. } | DrawStateError::LayoutMismatch { .. }
        )
    }
}
