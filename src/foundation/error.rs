/// Convenience result type used across stax.
pub type StaxResult<T> = Result<T, StaxError>;

/// Failures while parsing a staxie container.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A read ran past the end of the buffer.
    #[error("truncated buffer: need {needed} bytes at offset {offset}, {available} available")]
    TruncatedBuffer {
        /// Offset of the failed read.
        offset: usize,
        /// Bytes the read required.
        needed: usize,
        /// Bytes left in the buffer at `offset`.
        available: usize,
    },

    /// The metadata section carries a version this decoder does not understand.
    #[error("unsupported staxie version {0}")]
    UnsupportedVersion(u8),

    /// A required section never appeared before the end of the container.
    #[error("section '{0}' not found in container")]
    UnknownSection(String),

    /// The buffer does not start with a PNG signature.
    #[error("invalid container signature")]
    InvalidSignature,

    /// A stack or animation name is not valid UTF-8.
    #[error("invalid utf-8 name at offset {offset}")]
    InvalidName {
        /// Offset of the name bytes.
        offset: usize,
    },
}

/// Top-level error taxonomy used by stax APIs.
#[derive(thiserror::Error, Debug)]
pub enum StaxError {
    /// Binary asset decoding failed.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A named or indexed entity does not exist.
    #[error("{kind} '{name}' not found")]
    NotFound {
        /// Entity kind (`stack`, `animation`, `frame`, `asset`, ...).
        kind: &'static str,
        /// Requested name or index.
        name: String,
    },

    /// Invalid user-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while drawing.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StaxError {
    /// Build a [`StaxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StaxError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`StaxError::NotFound`] value.
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Return `true` for [`StaxError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
