//! Decoder-facing stream descriptions.
//!
//! A demuxer reduces whatever its container declares to one
//! [`CodecParameters`] record per elementary stream; downstream decoders are
//! configured from that record alone.

use std::fmt;

/// Kind of elementary stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum MediaKind {
    /// Video stream.
    Video,
    /// Audio stream.
    Audio,
    /// Subtitle stream.
    Subtitle,
    /// Unknown stream kind.
    Unknown,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "Video"),
            Self::Audio => write!(f, "Audio"),
            Self::Subtitle => write!(f, "Subtitle"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Codec family understood by the decoder layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CodecId {
    /// H.264 / AVC.
    H264,
    /// H.265 / HEVC.
    H265,
    /// MPEG-4 part 2 (SP/ASP).
    Mpeg4,
    /// VP8.
    Vp8,
    /// VP9.
    Vp9,
    /// AV1.
    Av1,
    /// Motion JPEG.
    Mjpeg,
    /// AAC (Advanced Audio Coding).
    Aac,
    /// MP3 (MPEG Layer 3).
    Mp3,
    /// MP2 (MPEG Layer 2).
    Mp2,
    /// AC-3 (Dolby Digital).
    Ac3,
    /// E-AC-3 (Enhanced AC-3).
    Eac3,
    /// DTS.
    Dts,
    /// Dolby TrueHD.
    TrueHd,
    /// Vorbis.
    Vorbis,
    /// Opus.
    Opus,
    /// FLAC.
    Flac,
    /// Unsigned 8-bit PCM.
    PcmU8,
    /// Signed 16-bit little-endian PCM.
    PcmS16,
    /// Signed 24-bit little-endian PCM.
    PcmS24,
    /// Signed 32-bit little-endian PCM.
    PcmS32,
    /// 32-bit IEEE float PCM.
    PcmF32,
    /// 64-bit IEEE float PCM.
    PcmF64,
    /// SubRip text subtitles.
    SubRip,
    /// Codec the demuxer could not map.
    Unknown,
}

impl CodecId {
    /// Check whether this codec family is audio.
    pub fn is_audio(&self) -> bool {
        matches!(
            self,
            Self::Aac
                | Self::Mp3
                | Self::Mp2
                | Self::Ac3
                | Self::Eac3
                | Self::Dts
                | Self::TrueHd
                | Self::Vorbis
                | Self::Opus
                | Self::Flac
                | Self::PcmU8
                | Self::PcmS16
                | Self::PcmS24
                | Self::PcmS32
                | Self::PcmF32
                | Self::PcmF64
        )
    }

    /// Check whether this codec family is video.
    pub fn is_video(&self) -> bool {
        matches!(
            self,
            Self::H264 | Self::H265 | Self::Mpeg4 | Self::Vp8 | Self::Vp9 | Self::Av1 | Self::Mjpeg
        )
    }
}

/// Decoder configuration for one elementary stream.
#[derive(Debug, Clone, PartialEq)]
pub struct CodecParameters {
    /// Stream kind.
    pub kind: MediaKind,
    /// Codec family.
    pub codec: CodecId,
    /// Frame width in pixels (video).
    pub width: u32,
    /// Frame height in pixels (video).
    pub height: u32,
    /// Nominal frame duration in microseconds, 0 if unknown (video).
    pub frame_duration_us: i64,
    /// Sample rate in Hz (audio).
    pub sample_rate: u32,
    /// Channel count (audio).
    pub channels: u32,
    /// Bits per sample, 0 if unknown (audio).
    pub bits_per_sample: u32,
    /// Codec-specific configuration blob.
    pub extradata: Option<Vec<u8>>,
}

impl Default for CodecParameters {
    fn default() -> Self {
        Self {
            kind: MediaKind::Unknown,
            codec: CodecId::Unknown,
            width: 0,
            height: 0,
            frame_duration_us: 0,
            sample_rate: 0,
            channels: 0,
            bits_per_sample: 0,
            extradata: None,
        }
    }
}

/// Top-level description of an opened container.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaInfo {
    /// At least one decodable video stream is present.
    pub has_video: bool,
    /// At least one decodable audio stream is present.
    pub has_audio: bool,
    /// Total duration in microseconds, 0 if unknown.
    pub duration_us: i64,
    /// Whether time-based seeking is available.
    pub seekable: bool,
    /// Size of the underlying stream in bytes.
    pub file_size: u64,
    /// Per-stream decoder configuration, indexed by packet stream_index.
    pub streams: Vec<CodecParameters>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_kind_predicates() {
        assert!(CodecId::H264.is_video());
        assert!(!CodecId::H264.is_audio());
        assert!(CodecId::Aac.is_audio());
        assert!(CodecId::PcmS24.is_audio());
        assert!(!CodecId::Unknown.is_audio());
        assert!(!CodecId::Unknown.is_video());
    }

    #[test]
    fn test_default_params() {
        let params = CodecParameters::default();
        assert_eq!(params.kind, MediaKind::Unknown);
        assert_eq!(params.codec, CodecId::Unknown);
        assert!(params.extradata.is_none());
    }
}
