//! Matroska/WebM-specific error types.

use demux_core::DemuxError;
use thiserror::Error;

/// MKV/WebM demuxing errors.
#[derive(Error, Debug)]
pub enum MkvError {
    /// Invalid EBML header.
    #[error("Invalid EBML header: {0}")]
    InvalidHeader(String),

    /// Invalid variable-length integer.
    #[error("Invalid VINT encoding at offset {offset}")]
    InvalidVint {
        /// Byte offset of the first VINT octet.
        offset: u64,
    },

    /// Invalid element ID.
    #[error("Invalid element ID at offset {offset}")]
    InvalidElementId {
        /// Byte offset of the ID's first octet.
        offset: u64,
    },

    /// Element length exceeds the maximum for its kind.
    #[error("Element 0x{id:X} length {length} exceeds maximum {max}")]
    OversizeElement {
        /// The element ID.
        id: u32,
        /// Declared length in bytes.
        length: u64,
        /// Maximum legal length for the element's kind.
        max: u64,
    },

    /// A child element escapes its parent's declared end.
    #[error("Element 0x{id:X} at offset {offset} overruns its parent")]
    BoundOverrun {
        /// The child element ID.
        id: u32,
        /// Offset of the child element.
        offset: u64,
    },

    /// Unknown length used where only a known length is legal.
    #[error("Unknown length not allowed for element 0x{id:X}")]
    UnknownLengthNotAllowed {
        /// The element ID.
        id: u32,
    },

    /// Nesting exceeds the supported depth.
    #[error("Nesting depth limit exceeded at depth {depth}")]
    DepthExceeded {
        /// The depth at which the limit was hit.
        depth: usize,
    },

    /// Invalid scalar field width (e.g. a 3-byte float).
    #[error("Invalid {kind} width {length} at offset {offset}")]
    InvalidFieldWidth {
        /// The scalar kind name.
        kind: &'static str,
        /// Declared length in bytes.
        length: u64,
        /// Byte offset of the element payload.
        offset: u64,
    },

    /// Invalid block structure.
    #[error("Invalid block: {0}")]
    InvalidBlock(String),

    /// Invalid lacing structure.
    #[error("Invalid lacing: {0}")]
    InvalidLacing(String),

    /// A block references a track number no TrackEntry declared.
    #[error("Track {track_number} not found")]
    TrackNotFound {
        /// The referenced wire track number.
        track_number: u64,
    },

    /// No usable seek index.
    #[error("No seek index available")]
    NoIndex,

    /// Seek repositioning failed.
    #[error("Seek failed: {0}")]
    SeekFailed(String),

    /// The caller's buffer cannot hold the peeked packet.
    #[error("Buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Bytes the peeked packet requires.
        needed: usize,
        /// Bytes the caller provided.
        available: usize,
    },

    /// The stream ended inside an element or payload.
    #[error("Truncated stream")]
    Truncated,

    /// The genuine end of the segment.
    #[error("End of stream")]
    EndOfStream,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for MKV operations.
pub type Result<T> = std::result::Result<T, MkvError>;

impl MkvError {
    /// Check if parsing can continue via resync after this error.
    ///
    /// Everything structural is recoverable; I/O failures, truncation and
    /// end-of-stream are not.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            MkvError::Io(_) | MkvError::Truncated | MkvError::EndOfStream
        )
    }
}

impl From<MkvError> for DemuxError {
    fn from(err: MkvError) -> Self {
        match err {
            MkvError::Io(e) => DemuxError::Io(e),
            MkvError::Truncated => DemuxError::Truncated,
            MkvError::EndOfStream => DemuxError::EndOfStream,
            MkvError::TrackNotFound { track_number } => {
                DemuxError::NotFound(format!("track {track_number}"))
            }
            MkvError::NoIndex => DemuxError::NotFound("seek index".to_string()),
            MkvError::SeekFailed(msg) => DemuxError::NotFound(msg),
            MkvError::BoundOverrun { .. }
            | MkvError::UnknownLengthNotAllowed { .. }
            | MkvError::DepthExceeded { .. } => DemuxError::Structural(err.to_string()),
            other => DemuxError::InvalidData(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MkvError::InvalidElementId { offset: 100 };
        assert_eq!(err.to_string(), "Invalid element ID at offset 100");
    }

    #[test]
    fn test_recoverable() {
        assert!(MkvError::InvalidVint { offset: 0 }.is_recoverable());
        assert!(MkvError::TrackNotFound { track_number: 3 }.is_recoverable());
        assert!(!MkvError::Truncated.is_recoverable());
        assert!(!MkvError::EndOfStream.is_recoverable());
    }

    #[test]
    fn test_conversion_to_core_error() {
        let err: DemuxError = MkvError::TrackNotFound { track_number: 5 }.into();
        assert!(matches!(err, DemuxError::NotFound(_)));

        let err: DemuxError = MkvError::DepthExceeded { depth: 17 }.into();
        assert!(matches!(err, DemuxError::Structural(_)));

        let err: DemuxError = MkvError::EndOfStream.into();
        assert!(err.is_eof());
    }
}
