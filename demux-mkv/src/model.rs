//! Track model builder.
//!
//! Runs once after the Segment metadata has parsed: reduces each TrackEntry
//! to the decoder-facing [`CodecParameters`] record and the per-track state
//! the cluster reassembler needs (wire number, lacing default duration,
//! header-strip bytes, skip flag).

use crate::elements::{TRACK_TYPE_AUDIO, TRACK_TYPE_SUBTITLE, TRACK_TYPE_VIDEO};
use crate::records::{SegmentDoc, TrackEntry};
use demux_core::{CodecId, CodecParameters, MediaInfo, MediaKind};
use tracing::{debug, warn};

/// Zero bytes appended to every CodecPrivate copy for decoder read-ahead
/// safety.
pub const EXTRADATA_PADDING: usize = 8;

/// ContentCompAlgo value for header stripping, the only compression scheme
/// supported.
const COMP_ALGO_HEADER_STRIP: u64 = 3;

/// MPEG-4 audio sample-rate table indexed by the AudioSpecificConfig
/// sample-rate index.
const AAC_SAMPLE_RATES: [u32; 13] = [
    96000, 88200, 64000, 48000, 44100, 32000, 24000, 22050, 16000, 12000, 11025, 8000, 7350,
];

/// CodecID prefix → codec family, resolved by longest matching prefix.
const CODEC_MAP: &[(&str, CodecId)] = &[
    ("V_MPEG4/ISO/AVC", CodecId::H264),
    ("V_MPEGH/ISO/HEVC", CodecId::H265),
    ("V_MPEG4/ISO", CodecId::Mpeg4),
    ("V_VP8", CodecId::Vp8),
    ("V_VP9", CodecId::Vp9),
    ("V_AV1", CodecId::Av1),
    ("V_MJPEG", CodecId::Mjpeg),
    ("A_AAC", CodecId::Aac),
    ("A_MPEG/L3", CodecId::Mp3),
    ("A_MPEG/L2", CodecId::Mp2),
    ("A_AC3", CodecId::Ac3),
    ("A_EAC3", CodecId::Eac3),
    ("A_DTS", CodecId::Dts),
    ("A_TRUEHD", CodecId::TrueHd),
    ("A_VORBIS", CodecId::Vorbis),
    ("A_OPUS", CodecId::Opus),
    ("A_FLAC", CodecId::Flac),
    ("A_PCM/INT/LIT", CodecId::PcmS16),
    ("A_PCM/FLOAT/IEEE", CodecId::PcmF32),
    ("S_TEXT/UTF8", CodecId::SubRip),
];

/// Per-track demux state derived from a TrackEntry.
#[derive(Debug, Clone)]
pub struct Track {
    /// Wire track number, the key Blocks reference.
    pub number: u64,
    /// Index into the media-info stream list.
    pub stream_index: u32,
    /// Stream kind.
    pub kind: MediaKind,
    /// Default frame duration in nanoseconds, used for lace timestamps.
    pub default_duration_ns: Option<u64>,
    /// Skip mask: disabled tracks are parsed but their frames are dropped.
    pub enabled: bool,
    /// Header bytes to prepend to every frame (header-strip compression).
    pub strip: Vec<u8>,
    /// Decoder configuration.
    pub params: CodecParameters,
}

/// Map a CodecID string to a codec family by longest-prefix match.
pub fn map_codec_id(codec_id: &str) -> Option<CodecId> {
    let mut best: Option<(usize, CodecId)> = None;
    for &(prefix, codec) in CODEC_MAP {
        if codec_id.starts_with(prefix) && best.is_none_or(|(len, _)| prefix.len() > len) {
            best = Some((prefix.len(), codec));
        }
    }
    best.map(|(_, codec)| codec)
}

fn media_kind(track_type: u64) -> MediaKind {
    match track_type {
        TRACK_TYPE_VIDEO => MediaKind::Video,
        TRACK_TYPE_AUDIO => MediaKind::Audio,
        TRACK_TYPE_SUBTITLE => MediaKind::Subtitle,
        _ => MediaKind::Unknown,
    }
}

fn kind_letter(kind: MediaKind) -> Option<char> {
    match kind {
        MediaKind::Video => Some('V'),
        MediaKind::Audio => Some('A'),
        MediaKind::Subtitle => Some('S'),
        MediaKind::Unknown => None,
        _ => None,
    }
}

/// AudioSpecificConfig object type from the profile substring of the
/// CodecID; codecs naming none of the known profiles fall through to LTP.
fn aac_profile(codec_id: &str) -> u8 {
    for (i, profile) in ["MAIN", "LC", "SSR"].iter().enumerate() {
        if codec_id.contains(profile) {
            return i as u8 + 1;
        }
    }
    4
}

/// Index of `rate` in the MPEG-4 sample-rate table; out-of-table rates
/// yield the table length, matching the original behavior.
fn aac_sample_rate_index(rate: u32) -> u8 {
    AAC_SAMPLE_RATES
        .iter()
        .position(|&r| r == rate)
        .unwrap_or(AAC_SAMPLE_RATES.len()) as u8
}

/// Synthesize a minimal AudioSpecificConfig for AAC tracks that carry no
/// CodecPrivate: 2 bytes of profile/rate-index/channels, plus the 3-byte
/// SBR sync extension when the CodecID asks for it.
fn synthesize_aac_config(codec_id: &str, sample_rate: u32, out_sample_rate: u32, channels: u8) -> Vec<u8> {
    let profile = aac_profile(codec_id);
    let sri = aac_sample_rate_index(sample_rate);
    let mut config = vec![
        (profile << 3) | ((sri & 0x0E) >> 1),
        ((sri & 0x01) << 7) | (channels << 3),
    ];
    if codec_id.contains("SBR") {
        let out_sri = aac_sample_rate_index(out_sample_rate);
        config.extend_from_slice(&[0x56, 0xE5, 0x80 | (out_sri << 3)]);
    }
    config
}

/// Refine the generic PCM families using the declared bit depth.
fn refine_pcm(codec: CodecId, bit_depth: Option<u64>) -> CodecId {
    match codec {
        CodecId::PcmS16 => match bit_depth {
            Some(8) => CodecId::PcmU8,
            Some(24) => CodecId::PcmS24,
            Some(32) => CodecId::PcmS32,
            _ => CodecId::PcmS16,
        },
        CodecId::PcmF32 => match bit_depth {
            Some(64) => CodecId::PcmF64,
            _ => CodecId::PcmF32,
        },
        other => other,
    }
}

/// Check a track's content encodings. Returns the header-strip prefix
/// bytes, or `None` when the encodings make the track undecodable.
fn check_encodings(entry: &TrackEntry) -> Option<Vec<u8>> {
    if entry.encodings.is_empty() {
        return Some(Vec::new());
    }
    if entry.encodings.len() > 1 {
        warn!(
            track = entry.number,
            "multiple content encodings are not supported"
        );
        return None;
    }

    let enc = &entry.encodings[0];
    if enc.encoding_type != 0 || enc.has_encryption {
        warn!(track = entry.number, "content encryption is not supported");
        return None;
    }
    if enc.has_compression && enc.comp_algo != COMP_ALGO_HEADER_STRIP {
        warn!(
            track = entry.number,
            algo = enc.comp_algo,
            "unsupported content compression algorithm"
        );
        return None;
    }
    Some(enc.comp_settings.clone())
}

fn build_track(entry: &TrackEntry, stream_index: u32) -> Track {
    let kind = media_kind(entry.track_type);
    let mut enabled = entry.flag_enabled;

    // Track type must agree with the CodecID family letter.
    match kind_letter(kind) {
        Some(letter) if entry.codec_id.starts_with(letter) => {}
        _ => {
            warn!(
                track = entry.number,
                codec_id = %entry.codec_id,
                track_type = entry.track_type,
                "track type does not match CodecID"
            );
            enabled = false;
        }
    }

    let codec = match map_codec_id(&entry.codec_id) {
        Some(codec) => refine_pcm(codec, entry.audio.bit_depth),
        None => {
            warn!(
                track = entry.number,
                codec_id = %entry.codec_id,
                "unsupported codec"
            );
            enabled = false;
            CodecId::Unknown
        }
    };

    let strip = match check_encodings(entry) {
        Some(strip) => strip,
        None => {
            enabled = false;
            Vec::new()
        }
    };

    let sample_rate = entry.audio.sample_rate.max(0.0) as u32;
    let out_sample_rate = entry
        .audio
        .out_sample_rate
        .map(|r| r.max(0.0) as u32)
        .filter(|&r| r > 0)
        .unwrap_or(sample_rate);
    let channels = entry.audio.channels as u32;

    let extradata = match &entry.codec_private {
        Some(private) => {
            let mut data = private.clone();
            data.extend(std::iter::repeat_n(0u8, EXTRADATA_PADDING));
            Some(data)
        }
        None if codec == CodecId::Aac => Some(synthesize_aac_config(
            &entry.codec_id,
            sample_rate,
            out_sample_rate,
            channels.min(u8::MAX as u32) as u8,
        )),
        None => None,
    };

    let params = CodecParameters {
        kind,
        codec,
        width: entry.video.pixel_width as u32,
        height: entry.video.pixel_height as u32,
        frame_duration_us: entry.default_duration.map(|d| d as i64 / 1000).unwrap_or(0),
        sample_rate: out_sample_rate,
        channels,
        bits_per_sample: entry.audio.bit_depth.unwrap_or(0) as u32,
        extradata,
    };

    Track {
        number: entry.number,
        stream_index,
        kind,
        default_duration_ns: entry.default_duration,
        enabled,
        strip,
        params,
    }
}

/// Build the track table from the parsed document.
pub fn build_tracks(doc: &SegmentDoc) -> Vec<Track> {
    let tracks: Vec<Track> = doc
        .tracks
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| build_track(entry, i as u32))
        .collect();
    debug!(
        count = tracks.len(),
        enabled = tracks.iter().filter(|t| t.enabled).count(),
        "track model built"
    );
    tracks
}

/// Build the media-info snapshot from the parsed document and track table.
pub fn build_media_info(doc: &SegmentDoc, tracks: &[Track], file_size: u64) -> MediaInfo {
    let duration_us =
        (doc.info.duration * doc.info.timecode_scale as f64 / 1000.0) as i64;
    MediaInfo {
        has_video: tracks
            .iter()
            .any(|t| t.enabled && t.kind == MediaKind::Video),
        has_audio: tracks
            .iter()
            .any(|t| t.enabled && t.kind == MediaKind::Audio),
        duration_us,
        seekable: true,
        file_size,
        streams: tracks.iter().map(|t| t.params.clone()).collect(),
    }
}
