//! # demux-mkv
//!
//! EBML-driven Matroska/WebM demuxer.
//!
//! This crate turns nested EBML containers into timestamped elementary
//! audio/video packets for playback:
//!
//! - **EBML primitives** - variable-length integer/ID/length/float/string
//!   readers
//! - **Schema-driven parsing** - one generic recursive-descent engine walks
//!   static per-parent descriptor tables; there is no per-element code
//! - **Track model** - CodecID mapping, AAC config synthesis, PCM
//!   refinement, content-encoding checks
//! - **Block reassembly** - Xiph/fixed/EBML lacing decoded into individual
//!   packets with correct timestamps
//! - **Seeking** - a lazily built time→offset index from the Cues
//! - **Resync** - recovery of a parse position after structural corruption
//!
//! ## Example
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufReader;
//! use demux_mkv::MkvDemuxer;
//!
//! let file = File::open("video.mkv").unwrap();
//! let mut demuxer = MkvDemuxer::new(BufReader::new(file));
//! demuxer.init().unwrap();
//!
//! let info = demuxer.media_info();
//! println!("video: {} audio: {} duration: {}us",
//!          info.has_video, info.has_audio, info.duration_us);
//!
//! // Two-phase packet delivery: peek the metadata, then read the payload.
//! loop {
//!     let meta = match demuxer.peek() {
//!         Ok(meta) => meta,
//!         Err(demux_mkv::MkvError::EndOfStream) => break,
//!         Err(e) => panic!("demux error: {e}"),
//!     };
//!     let mut payload = vec![0u8; meta.size];
//!     demuxer.read(&mut payload).unwrap();
//!     println!("stream {} pts {}us {} bytes", meta.stream_index, meta.pts_us, meta.size);
//!     if meta.is_eos() {
//!         break;
//!     }
//! }
//! ```
//!
//! ## Element structure
//!
//! ```text
//! EBML Header
//! Segment
//! ├── SeekHead (index to other level-1 elements)
//! ├── Info (timecode scale, duration, title)
//! ├── Tracks
//! │   └── TrackEntry
//! │       ├── Video
//! │       ├── Audio
//! │       └── ContentEncodings
//! ├── Chapters
//! ├── Cues (seeking index)
//! ├── Tags
//! └── Cluster (media data)
//!     ├── Timecode
//!     └── SimpleBlock / BlockGroup
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod demuxer;
pub mod ebml;
pub mod elements;
pub mod error;
pub mod model;
pub mod parser;
pub mod records;

pub use demuxer::MkvDemuxer;
pub use error::{MkvError, Result};
pub use model::Track;
pub use records::{EbmlHead, SegmentDoc};

/// Check if a buffer starts with the EBML header signature.
pub fn is_mkv_signature(data: &[u8]) -> bool {
    data.len() >= 4 && data[0..4] == [0x1A, 0x45, 0xDF, 0xA3]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_mkv_signature() {
        assert!(is_mkv_signature(&[0x1A, 0x45, 0xDF, 0xA3]));
        assert!(is_mkv_signature(&[0x1A, 0x45, 0xDF, 0xA3, 0x00]));
        assert!(!is_mkv_signature(&[0x00, 0x00, 0x00, 0x00]));
        assert!(!is_mkv_signature(&[0x1A, 0x45, 0xDF]));
        assert!(!is_mkv_signature(&[]));
    }
}
