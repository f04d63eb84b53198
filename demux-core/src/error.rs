//! Error types shared by the demuxers.
//!
//! This module provides the error taxonomy every container demuxer in the
//! workspace reports through. Format-specific crates keep their own richer
//! error enums and convert into [`DemuxError`] at the trait boundary.

use thiserror::Error;

/// Errors reported by container demuxing.
#[derive(Error, Debug)]
pub enum DemuxError {
    /// Malformed data: bad variable-length integer, illegal field width,
    /// out-of-range flags, corrupt size tables.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The stream ended in the middle of an element or payload.
    #[error("Truncated stream")]
    Truncated,

    /// Structural violation: a child escaping its parent's bounds, an
    /// unknown-length element where one is not allowed, nesting too deep.
    #[error("Structural violation: {0}")]
    Structural(String),

    /// A feature the demuxer recognizes but does not support
    /// (unknown codec, content encryption, exotic compression).
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// A lookup failed: no seek index present, a packet referencing an
    /// undeclared track.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The genuine end of the stream. Not a failure; callers stop reading.
    #[error("End of stream")]
    EndOfStream,

    /// I/O error from the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DemuxError {
    /// Check if this is the end-of-stream marker.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self, DemuxError::EndOfStream)
    }

    /// Check if the session can continue after this error.
    ///
    /// Recoverable errors are handed to the format's resync path; the
    /// others terminate the session.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DemuxError::InvalidData(_) | DemuxError::Structural(_) | DemuxError::NotFound(_)
        )
    }
}

/// Result type alias using [`DemuxError`].
pub type Result<T> = std::result::Result<T, DemuxError>;
