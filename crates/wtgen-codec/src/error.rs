//! Error types for the codec pipeline.

use thiserror::Error;
use wtgen_doc::DocumentError;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Stable error kinds for the host-facing surface.
///
/// Every [`CodecError`] maps onto exactly one kind via [`CodecError::kind`],
/// so hosts can react programmatically while the error message carries the
/// stage-specific detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Document could not be fetched or was empty.
    Io,
    /// Document is not a wtgen-1 spectralData framepack.
    Schema,
    /// Invalid base64 payload.
    Encoding,
    /// Framepack header does not start with `HNFPv1\0`.
    Magic,
    /// Framepack header carries invalid dimensions.
    Header,
    /// Framepack header contradicts document hints.
    Mismatch,
    /// Framepack ended before all frames were read.
    Truncated,
    /// Payload exceeds the configured size limit.
    TooLarge,
    /// Minimum-phase reconstruction produced unusable samples.
    Numerical,
    /// Slot index outside `0..4`.
    Slot,
}

impl ErrorKind {
    /// Returns the kind as a stable string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Io => "io",
            ErrorKind::Schema => "schema",
            ErrorKind::Encoding => "encoding",
            ErrorKind::Magic => "magic",
            ErrorKind::Header => "header",
            ErrorKind::Mismatch => "mismatch",
            ErrorKind::Truncated => "truncated",
            ErrorKind::TooLarge => "too-large",
            ErrorKind::Numerical => "numerical",
            ErrorKind::Slot => "slot",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur while decoding a wavetable document.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Document could not be read.
    #[error("document could not be read: {0}")]
    Io(#[from] std::io::Error),

    /// Document text was empty.
    #[error("document is empty")]
    EmptyDocument,

    /// Container-level failure (schema, base64, payload limit).
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Framepack magic is not `HNFPv1\0`.
    #[error("framepack: bad magic (expected \"HNFPv1\")")]
    BadMagic,

    /// Framepack header dimensions are invalid.
    #[error("framepack: {reason}")]
    BadHeader {
        /// What is wrong with the header.
        reason: String,
    },

    /// Framepack header contradicts a value the document declared.
    #[error("framepack: {field} is {actual} but the document declares {declared}")]
    SchemaMismatch {
        /// The contested field.
        field: &'static str,
        /// Value declared in the document.
        declared: usize,
        /// Value found in the binary header.
        actual: usize,
    },

    /// The binary stream ended inside the named decoder stage.
    #[error("framepack: truncated reading {stage}")]
    Truncated {
        /// Decoder stage that hit the end of the payload.
        stage: &'static str,
    },

    /// Reconstruction produced non-finite samples or a non-negligible
    /// imaginary residual.
    #[error("minimum-phase reconstruction: {reason}")]
    Numerical {
        /// What the numerical contract check observed.
        reason: String,
    },

    /// Slot index outside the registry's four slots.
    #[error("slot {slot} is out of range (0..4)")]
    SlotOutOfRange {
        /// The offending index.
        slot: usize,
    },
}

impl CodecError {
    /// Creates a bad-header error.
    pub(crate) fn bad_header(reason: impl Into<String>) -> Self {
        Self::BadHeader {
            reason: reason.into(),
        }
    }

    /// Creates a numerical-contract error.
    pub(crate) fn numerical(reason: impl Into<String>) -> Self {
        Self::Numerical {
            reason: reason.into(),
        }
    }

    /// Returns the stable kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::Io(_) | CodecError::EmptyDocument => ErrorKind::Io,
            CodecError::Document(doc) => match doc {
                DocumentError::Parse(_) | DocumentError::Schema { .. } => ErrorKind::Schema,
                DocumentError::Encoding(_) => ErrorKind::Encoding,
                DocumentError::PayloadTooLarge { .. } => ErrorKind::TooLarge,
            },
            CodecError::BadMagic => ErrorKind::Magic,
            CodecError::BadHeader { .. } => ErrorKind::Header,
            CodecError::SchemaMismatch { .. } => ErrorKind::Mismatch,
            CodecError::Truncated { .. } => ErrorKind::Truncated,
            CodecError::Numerical { .. } => ErrorKind::Numerical,
            CodecError::SlotOutOfRange { .. } => ErrorKind::Slot,
        }
    }
}
