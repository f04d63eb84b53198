//! Matroska element registry and the schema tables driving the parser.
//!
//! Each master element has a static table of [`EbmlDescriptor`]s describing
//! the children it accepts: their wire ID, payload kind, destination slot,
//! and (for masters) the child table to recurse into. One generic engine in
//! [`crate::parser`] walks these tables; there is no per-element parsing
//! code.
//!
//! The Segment appears twice: [`SEGMENT_HEADER_SCHEMA`] is used for the
//! initial metadata scan and stops at the first Cluster, while
//! [`SEGMENT_BODY_SCHEMA`] is used while streaming and enters Clusters.
//! Modeling the Segment→Cluster cycle as two tables keeps the tables
//! acyclic.

// =============================================================================
// EBML header elements
// =============================================================================

/// EBML header element.
pub const EBML: u32 = 0x1A45DFA3;
/// EBML version.
pub const EBML_VERSION: u32 = 0x4286;
/// EBML read version.
pub const EBML_READ_VERSION: u32 = 0x42F7;
/// EBML maximum ID length.
pub const EBML_MAX_ID_LENGTH: u32 = 0x42F2;
/// EBML maximum size length.
pub const EBML_MAX_SIZE_LENGTH: u32 = 0x42F3;
/// Document type ("matroska" or "webm").
pub const DOC_TYPE: u32 = 0x4282;
/// Document type version.
pub const DOC_TYPE_VERSION: u32 = 0x4287;
/// Document type read version.
pub const DOC_TYPE_READ_VERSION: u32 = 0x4285;

// =============================================================================
// Segment and its level-1 children
// =============================================================================

/// Segment (the root container of all Matroska data).
pub const SEGMENT: u32 = 0x18538067;
/// SeekHead (index of other level-1 elements).
pub const SEEK_HEAD: u32 = 0x114D9B74;
/// Segment Info.
pub const INFO: u32 = 0x1549A966;
/// Tracks.
pub const TRACKS: u32 = 0x1654AE6B;
/// Cues (seeking index).
pub const CUES: u32 = 0x1C53BB6B;
/// Tags (metadata).
pub const TAGS: u32 = 0x1254C367;
/// Chapters.
pub const CHAPTERS: u32 = 0x1043A770;
/// Attachments.
pub const ATTACHMENTS: u32 = 0x1941A469;
/// Cluster (media data).
pub const CLUSTER: u32 = 0x1F43B675;

// =============================================================================
// SeekHead
// =============================================================================

/// Seek entry.
pub const SEEK: u32 = 0x4DBB;
/// Seek ID (the referenced element's ID bytes).
pub const SEEK_ID: u32 = 0x53AB;
/// Seek position (relative to segment start).
pub const SEEK_POSITION: u32 = 0x53AC;

// =============================================================================
// Info
// =============================================================================

/// Segment UID.
pub const SEGMENT_UID: u32 = 0x73A4;
/// Timecode scale (nanoseconds per timecode unit, default 1000000).
pub const TIMECODE_SCALE: u32 = 0x2AD7B1;
/// Duration (in timecode units).
pub const DURATION: u32 = 0x4489;
/// Date UTC (nanoseconds since 2001-01-01).
pub const DATE_UTC: u32 = 0x4461;
/// Title.
pub const TITLE: u32 = 0x7BA9;
/// Muxing application.
pub const MUXING_APP: u32 = 0x4D80;
/// Writing application.
pub const WRITING_APP: u32 = 0x5741;

// =============================================================================
// Tracks
// =============================================================================

/// Track entry.
pub const TRACK_ENTRY: u32 = 0xAE;
/// Track number (the key Blocks reference).
pub const TRACK_NUMBER: u32 = 0xD7;
/// Track UID.
pub const TRACK_UID: u32 = 0x73C5;
/// Track type.
pub const TRACK_TYPE: u32 = 0x83;
/// Flag enabled.
pub const FLAG_ENABLED: u32 = 0xB9;
/// Flag default.
pub const FLAG_DEFAULT: u32 = 0x88;
/// Flag forced.
pub const FLAG_FORCED: u32 = 0x55AA;
/// Flag lacing.
pub const FLAG_LACING: u32 = 0x9C;
/// Default frame duration in nanoseconds.
pub const DEFAULT_DURATION: u32 = 0x23E383;
/// Track name.
pub const NAME: u32 = 0x536E;
/// Language (ISO 639-2).
pub const LANGUAGE: u32 = 0x22B59C;
/// Codec ID string.
pub const CODEC_ID: u32 = 0x86;
/// Codec private data.
pub const CODEC_PRIVATE: u32 = 0x63A2;
/// Codec delay in nanoseconds.
pub const CODEC_DELAY: u32 = 0x56AA;
/// Seek pre-roll in nanoseconds.
pub const SEEK_PRE_ROLL: u32 = 0x56BB;
/// Video settings.
pub const VIDEO: u32 = 0xE0;
/// Audio settings.
pub const AUDIO: u32 = 0xE1;

// Video settings children

/// Flag interlaced.
pub const FLAG_INTERLACED: u32 = 0x9A;
/// Pixel width.
pub const PIXEL_WIDTH: u32 = 0xB0;
/// Pixel height.
pub const PIXEL_HEIGHT: u32 = 0xBA;
/// Display width.
pub const DISPLAY_WIDTH: u32 = 0x54B0;
/// Display height.
pub const DISPLAY_HEIGHT: u32 = 0x54BA;

// Audio settings children

/// Sampling frequency in Hz.
pub const SAMPLING_FREQUENCY: u32 = 0xB5;
/// Output sampling frequency (SBR).
pub const OUTPUT_SAMPLING_FREQUENCY: u32 = 0x78B5;
/// Channel count.
pub const CHANNELS: u32 = 0x9F;
/// Bits per sample.
pub const BIT_DEPTH: u32 = 0x6264;

// Content encoding (compression/encryption)

/// Content encodings.
pub const CONTENT_ENCODINGS: u32 = 0x6D80;
/// Content encoding.
pub const CONTENT_ENCODING: u32 = 0x6240;
/// Content encoding order.
pub const CONTENT_ENCODING_ORDER: u32 = 0x5031;
/// Content encoding scope.
pub const CONTENT_ENCODING_SCOPE: u32 = 0x5032;
/// Content encoding type (0 = compression, 1 = encryption).
pub const CONTENT_ENCODING_TYPE: u32 = 0x5033;
/// Content compression.
pub const CONTENT_COMPRESSION: u32 = 0x5034;
/// Compression algorithm (3 = header stripping).
pub const CONTENT_COMP_ALGO: u32 = 0x4254;
/// Compression settings (the stripped header bytes).
pub const CONTENT_COMP_SETTINGS: u32 = 0x4255;
/// Content encryption.
pub const CONTENT_ENCRYPTION: u32 = 0x5035;
/// Encryption algorithm.
pub const CONTENT_ENC_ALGO: u32 = 0x47E1;

// =============================================================================
// Cluster
// =============================================================================

/// Cluster timecode.
pub const TIMECODE: u32 = 0xE7;
/// Cluster position in segment.
pub const POSITION: u32 = 0xA7;
/// Size of the previous cluster.
pub const PREV_SIZE: u32 = 0xAB;
/// SimpleBlock.
pub const SIMPLE_BLOCK: u32 = 0xA3;
/// BlockGroup.
pub const BLOCK_GROUP: u32 = 0xA0;
/// Block.
pub const BLOCK: u32 = 0xA1;
/// Block duration in timecode units.
pub const BLOCK_DURATION: u32 = 0x9B;
/// Reference block (offset to a reference frame).
pub const REFERENCE_BLOCK: u32 = 0xFB;
/// Discard padding in nanoseconds.
pub const DISCARD_PADDING: u32 = 0x75A2;

// =============================================================================
// Cues
// =============================================================================

/// Cue point.
pub const CUE_POINT: u32 = 0xBB;
/// Cue time in timecode units.
pub const CUE_TIME: u32 = 0xB3;
/// Cue track positions.
pub const CUE_TRACK_POSITIONS: u32 = 0xB7;
/// Cue track number.
pub const CUE_TRACK: u32 = 0xF7;
/// Cue cluster position (relative to segment start).
pub const CUE_CLUSTER_POSITION: u32 = 0xF1;
/// Cue relative position within the cluster.
pub const CUE_RELATIVE_POSITION: u32 = 0xF0;
/// Cue block number.
pub const CUE_BLOCK_NUMBER: u32 = 0x5378;

// =============================================================================
// Tags
// =============================================================================

/// Tag.
pub const TAG: u32 = 0x7373;
/// Tag targets.
pub const TARGETS: u32 = 0x63C0;
/// Target track UID.
pub const TAG_TRACK_UID: u32 = 0x63C5;
/// Target chapter UID.
pub const TAG_CHAPTER_UID: u32 = 0x63C4;
/// Simple tag.
pub const SIMPLE_TAG: u32 = 0x67C8;
/// Tag name.
pub const TAG_NAME: u32 = 0x45A3;
/// Tag language.
pub const TAG_LANGUAGE: u32 = 0x447A;
/// Tag string value.
pub const TAG_STRING: u32 = 0x4487;

// =============================================================================
// Chapters
// =============================================================================

/// Edition entry.
pub const EDITION_ENTRY: u32 = 0x45B9;
/// Chapter atom.
pub const CHAPTER_ATOM: u32 = 0xB6;
/// Chapter UID.
pub const CHAPTER_UID: u32 = 0x73C4;
/// Chapter start time in nanoseconds.
pub const CHAPTER_TIME_START: u32 = 0x91;
/// Chapter end time in nanoseconds.
pub const CHAPTER_TIME_END: u32 = 0x92;
/// Chapter hidden flag.
pub const CHAPTER_FLAG_HIDDEN: u32 = 0x98;
/// Chapter enabled flag.
pub const CHAPTER_FLAG_ENABLED: u32 = 0x4598;
/// Chapter display.
pub const CHAPTER_DISPLAY: u32 = 0x80;
/// Chapter title string.
pub const CHAP_STRING: u32 = 0x85;
/// Chapter title language.
pub const CHAP_LANGUAGE: u32 = 0x437C;

// =============================================================================
// Attachments
// =============================================================================

/// Attached file.
pub const ATTACHED_FILE: u32 = 0x61A7;
/// File description.
pub const FILE_DESCRIPTION: u32 = 0x467E;
/// File name.
pub const FILE_NAME: u32 = 0x466E;
/// File media type.
pub const FILE_MEDIA_TYPE: u32 = 0x4660;
/// File data.
pub const FILE_DATA: u32 = 0x465C;
/// File UID.
pub const FILE_UID: u32 = 0x46AE;

// =============================================================================
// Reserved
// =============================================================================

/// Void (padding) - skippable in any context.
pub const VOID: u32 = 0xEC;
/// CRC-32 - skippable in any context.
pub const CRC32: u32 = 0xBF;

// =============================================================================
// Track types
// =============================================================================

/// Track type: video.
pub const TRACK_TYPE_VIDEO: u64 = 1;
/// Track type: audio.
pub const TRACK_TYPE_AUDIO: u64 = 2;
/// Track type: subtitle.
pub const TRACK_TYPE_SUBTITLE: u64 = 17;

/// The eight level-1 IDs the resync scan recognizes.
pub const TOP_LEVEL_IDS: [u32; 8] = [
    INFO, TRACKS, CUES, TAGS, SEEK_HEAD, ATTACHMENTS, CHAPTERS, CLUSTER,
];

// =============================================================================
// Schema model
// =============================================================================

use crate::ebml::{MAX_BINARY_LENGTH, MAX_SCALAR_LENGTH, MAX_STRING_LENGTH};

/// Payload kind of a schema entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EbmlKind {
    /// Recognized but ignored; payload skipped.
    None,
    /// Big-endian unsigned integer, 0-8 bytes.
    UInt,
    /// Big-endian signed integer, 0-8 bytes.
    SInt,
    /// IEEE-754 big-endian float, 0/4/8 bytes.
    Float,
    /// ASCII string.
    Str,
    /// UTF-8 string.
    Utf8,
    /// Raw binary payload.
    Binary,
    /// Master element: recurse into the child table.
    Nest,
    /// Direct child of Segment: like Nest, deduplicated by (id, position).
    Level1,
    /// Ends the current parse level without consuming the element.
    Stop,
    /// Master element entered without recursing; the caller drives its
    /// children (Segment, Cluster).
    Stream,
}

impl EbmlKind {
    /// Maximum legal payload length for this kind, if bounded.
    pub fn max_length(self) -> Option<u64> {
        match self {
            EbmlKind::UInt | EbmlKind::SInt | EbmlKind::Float => Some(MAX_SCALAR_LENGTH),
            EbmlKind::Str | EbmlKind::Utf8 => Some(MAX_STRING_LENGTH),
            EbmlKind::Binary => Some(MAX_BINARY_LENGTH),
            _ => None,
        }
    }
}

/// Destination slot a parsed value is assigned to.
///
/// Slots replace the original offset-into-struct writes: every record type
/// resolves the slots it owns with a `match` in its
/// [`crate::records::EbmlTarget`] impl and ignores the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Slot {
    None,
    // EBML head
    EbmlVersion,
    EbmlReadVersion,
    EbmlMaxIdLength,
    EbmlMaxSizeLength,
    DocType,
    DocTypeVersion,
    DocTypeReadVersion,
    // Segment level-1
    SegmentInfo,
    SegmentTracks,
    SegmentCues,
    SegmentTags,
    SegmentSeekHead,
    SegmentChapters,
    SegmentAttachments,
    // Info
    TimecodeScale,
    Duration,
    Title,
    MuxingApp,
    WritingApp,
    DateUtc,
    SegmentUid,
    // SeekHead
    SeekEntry,
    SeekId,
    SeekPosition,
    // Tracks
    TrackEntry,
    TrackNumber,
    TrackUid,
    TrackType,
    TrackCodecId,
    TrackCodecPrivate,
    TrackCodecDelay,
    TrackSeekPreRoll,
    TrackDefaultDuration,
    TrackName,
    TrackLanguage,
    TrackFlagDefault,
    TrackFlagForced,
    TrackFlagEnabled,
    TrackFlagLacing,
    TrackVideo,
    TrackAudio,
    TrackContentEncodings,
    // Video
    PixelWidth,
    PixelHeight,
    DisplayWidth,
    DisplayHeight,
    FlagInterlaced,
    // Audio
    SamplingFrequency,
    OutputSamplingFrequency,
    Channels,
    BitDepth,
    // Content encoding
    ContentEncoding,
    ContentEncodingOrder,
    ContentEncodingScope,
    ContentEncodingType,
    ContentCompression,
    ContentCompAlgo,
    ContentCompSettings,
    ContentEncryption,
    ContentEncAlgo,
    // Cues
    CuePoint,
    CueTime,
    CuePositions,
    CueTrack,
    CueClusterPosition,
    CueRelativePosition,
    CueBlockNumber,
    // Tags
    Tag,
    TagTargets,
    TagTrackUid,
    TagChapterUid,
    SimpleTag,
    TagName,
    TagLanguage,
    TagString,
    // Chapters
    EditionEntry,
    ChapterAtom,
    ChapterUid,
    ChapterTimeStart,
    ChapterTimeEnd,
    ChapterFlagHidden,
    ChapterFlagEnabled,
    ChapterDisplay,
    ChapString,
    ChapLanguage,
    // Attachments
    AttachedFile,
    FileDescription,
    FileName,
    FileMediaType,
    FileData,
    FileUid,
    // Cluster
    ClusterTimecode,
    SimpleBlockPayload,
    BlockGroup,
    BlockPayload,
    BlockDuration,
    ReferenceBlock,
    DiscardPadding,
}

/// One entry of a master element's child table.
#[derive(Debug, Clone, Copy)]
pub struct EbmlDescriptor {
    /// Wire element ID.
    pub id: u32,
    /// Payload kind.
    pub kind: EbmlKind,
    /// Destination slot for the parsed value, or the child record for
    /// masters.
    pub slot: Slot,
    /// Child table for Nest/Level1/Stream entries.
    pub children: Option<&'static [EbmlDescriptor]>,
    /// Whether the destination is a list that grows by one element per
    /// structural entry.
    pub is_list: bool,
}

impl EbmlDescriptor {
    /// Whether this element may legally use the unknown-length sentinel.
    ///
    /// Only the streaming masters (Segment, Cluster) and the masters inside
    /// a cluster may; everything else must declare its length.
    pub fn allows_unknown_length(&self) -> bool {
        matches!(self.kind, EbmlKind::Stream) || self.id == BLOCK_GROUP
    }
}

const fn uint(id: u32, slot: Slot) -> EbmlDescriptor {
    EbmlDescriptor { id, kind: EbmlKind::UInt, slot, children: None, is_list: false }
}

const fn uint_list(id: u32, slot: Slot) -> EbmlDescriptor {
    EbmlDescriptor { id, kind: EbmlKind::UInt, slot, children: None, is_list: true }
}

const fn sint(id: u32, slot: Slot) -> EbmlDescriptor {
    EbmlDescriptor { id, kind: EbmlKind::SInt, slot, children: None, is_list: false }
}

const fn float(id: u32, slot: Slot) -> EbmlDescriptor {
    EbmlDescriptor { id, kind: EbmlKind::Float, slot, children: None, is_list: false }
}

const fn string(id: u32, slot: Slot) -> EbmlDescriptor {
    EbmlDescriptor { id, kind: EbmlKind::Str, slot, children: None, is_list: false }
}

const fn utf8(id: u32, slot: Slot) -> EbmlDescriptor {
    EbmlDescriptor { id, kind: EbmlKind::Utf8, slot, children: None, is_list: false }
}

const fn binary(id: u32, slot: Slot) -> EbmlDescriptor {
    EbmlDescriptor { id, kind: EbmlKind::Binary, slot, children: None, is_list: false }
}

const fn nest(id: u32, slot: Slot, children: &'static [EbmlDescriptor]) -> EbmlDescriptor {
    EbmlDescriptor { id, kind: EbmlKind::Nest, slot, children: Some(children), is_list: false }
}

const fn list(id: u32, slot: Slot, children: &'static [EbmlDescriptor]) -> EbmlDescriptor {
    EbmlDescriptor { id, kind: EbmlKind::Nest, slot, children: Some(children), is_list: true }
}

const fn level1(id: u32, slot: Slot, children: &'static [EbmlDescriptor]) -> EbmlDescriptor {
    EbmlDescriptor { id, kind: EbmlKind::Level1, slot, children: Some(children), is_list: false }
}

const fn skip(id: u32) -> EbmlDescriptor {
    EbmlDescriptor { id, kind: EbmlKind::None, slot: Slot::None, children: None, is_list: false }
}

/// Look up an element ID in a child table.
pub fn find(schema: &'static [EbmlDescriptor], id: u32) -> Option<&'static EbmlDescriptor> {
    schema.iter().find(|d| d.id == id)
}

// =============================================================================
// Schema tables
// =============================================================================

/// Children of the EBML header.
pub const EBML_HEAD_SCHEMA: &[EbmlDescriptor] = &[
    uint(EBML_VERSION, Slot::EbmlVersion),
    uint(EBML_READ_VERSION, Slot::EbmlReadVersion),
    uint(EBML_MAX_ID_LENGTH, Slot::EbmlMaxIdLength),
    uint(EBML_MAX_SIZE_LENGTH, Slot::EbmlMaxSizeLength),
    string(DOC_TYPE, Slot::DocType),
    uint(DOC_TYPE_VERSION, Slot::DocTypeVersion),
    uint(DOC_TYPE_READ_VERSION, Slot::DocTypeReadVersion),
];

/// Segment children for the initial metadata scan: the first Cluster stops
/// the scan without being consumed.
pub const SEGMENT_HEADER_SCHEMA: &[EbmlDescriptor] = &[
    level1(INFO, Slot::SegmentInfo, INFO_SCHEMA),
    level1(TRACKS, Slot::SegmentTracks, TRACKS_SCHEMA),
    level1(CUES, Slot::SegmentCues, CUES_SCHEMA),
    level1(TAGS, Slot::SegmentTags, TAGS_SCHEMA),
    level1(SEEK_HEAD, Slot::SegmentSeekHead, SEEKHEAD_SCHEMA),
    level1(CHAPTERS, Slot::SegmentChapters, CHAPTERS_SCHEMA),
    level1(ATTACHMENTS, Slot::SegmentAttachments, ATTACHMENTS_SCHEMA),
    EbmlDescriptor { id: CLUSTER, kind: EbmlKind::Stop, slot: Slot::None, children: None, is_list: false },
];

/// Segment children while streaming: Clusters are entered, metadata
/// encountered mid-stream (e.g. trailing Cues) is still parsed.
pub const SEGMENT_BODY_SCHEMA: &[EbmlDescriptor] = &[
    level1(INFO, Slot::SegmentInfo, INFO_SCHEMA),
    level1(TRACKS, Slot::SegmentTracks, TRACKS_SCHEMA),
    level1(CUES, Slot::SegmentCues, CUES_SCHEMA),
    level1(TAGS, Slot::SegmentTags, TAGS_SCHEMA),
    level1(SEEK_HEAD, Slot::SegmentSeekHead, SEEKHEAD_SCHEMA),
    level1(CHAPTERS, Slot::SegmentChapters, CHAPTERS_SCHEMA),
    level1(ATTACHMENTS, Slot::SegmentAttachments, ATTACHMENTS_SCHEMA),
    EbmlDescriptor { id: CLUSTER, kind: EbmlKind::Stream, slot: Slot::None, children: Some(CLUSTER_SCHEMA), is_list: false },
];

/// Children of Info.
pub const INFO_SCHEMA: &[EbmlDescriptor] = &[
    uint(TIMECODE_SCALE, Slot::TimecodeScale),
    float(DURATION, Slot::Duration),
    utf8(TITLE, Slot::Title),
    utf8(MUXING_APP, Slot::MuxingApp),
    utf8(WRITING_APP, Slot::WritingApp),
    sint(DATE_UTC, Slot::DateUtc),
    binary(SEGMENT_UID, Slot::SegmentUid),
];

/// Children of SeekHead.
pub const SEEKHEAD_SCHEMA: &[EbmlDescriptor] = &[list(SEEK, Slot::SeekEntry, SEEK_SCHEMA)];

/// Children of a Seek entry. SeekID holds raw element-ID bytes; reading
/// them big-endian as an unsigned integer yields the ID value.
pub const SEEK_SCHEMA: &[EbmlDescriptor] = &[
    uint(SEEK_ID, Slot::SeekId),
    uint(SEEK_POSITION, Slot::SeekPosition),
];

/// Children of Tracks.
pub const TRACKS_SCHEMA: &[EbmlDescriptor] =
    &[list(TRACK_ENTRY, Slot::TrackEntry, TRACK_ENTRY_SCHEMA)];

/// Children of a TrackEntry.
pub const TRACK_ENTRY_SCHEMA: &[EbmlDescriptor] = &[
    uint(TRACK_NUMBER, Slot::TrackNumber),
    uint(TRACK_UID, Slot::TrackUid),
    uint(TRACK_TYPE, Slot::TrackType),
    string(CODEC_ID, Slot::TrackCodecId),
    binary(CODEC_PRIVATE, Slot::TrackCodecPrivate),
    uint(CODEC_DELAY, Slot::TrackCodecDelay),
    uint(SEEK_PRE_ROLL, Slot::TrackSeekPreRoll),
    uint(DEFAULT_DURATION, Slot::TrackDefaultDuration),
    utf8(NAME, Slot::TrackName),
    string(LANGUAGE, Slot::TrackLanguage),
    uint(FLAG_DEFAULT, Slot::TrackFlagDefault),
    uint(FLAG_FORCED, Slot::TrackFlagForced),
    uint(FLAG_ENABLED, Slot::TrackFlagEnabled),
    uint(FLAG_LACING, Slot::TrackFlagLacing),
    nest(VIDEO, Slot::TrackVideo, VIDEO_SCHEMA),
    nest(AUDIO, Slot::TrackAudio, AUDIO_SCHEMA),
    nest(CONTENT_ENCODINGS, Slot::TrackContentEncodings, CONTENT_ENCODINGS_SCHEMA),
];

/// Children of Video settings.
pub const VIDEO_SCHEMA: &[EbmlDescriptor] = &[
    uint(PIXEL_WIDTH, Slot::PixelWidth),
    uint(PIXEL_HEIGHT, Slot::PixelHeight),
    uint(DISPLAY_WIDTH, Slot::DisplayWidth),
    uint(DISPLAY_HEIGHT, Slot::DisplayHeight),
    uint(FLAG_INTERLACED, Slot::FlagInterlaced),
];

/// Children of Audio settings.
pub const AUDIO_SCHEMA: &[EbmlDescriptor] = &[
    float(SAMPLING_FREQUENCY, Slot::SamplingFrequency),
    float(OUTPUT_SAMPLING_FREQUENCY, Slot::OutputSamplingFrequency),
    uint(CHANNELS, Slot::Channels),
    uint(BIT_DEPTH, Slot::BitDepth),
];

/// Children of ContentEncodings.
pub const CONTENT_ENCODINGS_SCHEMA: &[EbmlDescriptor] =
    &[list(CONTENT_ENCODING, Slot::ContentEncoding, CONTENT_ENCODING_SCHEMA)];

/// Children of a ContentEncoding.
pub const CONTENT_ENCODING_SCHEMA: &[EbmlDescriptor] = &[
    uint(CONTENT_ENCODING_ORDER, Slot::ContentEncodingOrder),
    uint(CONTENT_ENCODING_SCOPE, Slot::ContentEncodingScope),
    uint(CONTENT_ENCODING_TYPE, Slot::ContentEncodingType),
    nest(CONTENT_COMPRESSION, Slot::ContentCompression, COMPRESSION_SCHEMA),
    nest(CONTENT_ENCRYPTION, Slot::ContentEncryption, ENCRYPTION_SCHEMA),
];

/// Children of ContentCompression.
pub const COMPRESSION_SCHEMA: &[EbmlDescriptor] = &[
    uint(CONTENT_COMP_ALGO, Slot::ContentCompAlgo),
    binary(CONTENT_COMP_SETTINGS, Slot::ContentCompSettings),
];

/// Children of ContentEncryption. Parsing the algorithm is enough to know
/// the track cannot be decoded.
pub const ENCRYPTION_SCHEMA: &[EbmlDescriptor] = &[uint(CONTENT_ENC_ALGO, Slot::ContentEncAlgo)];

/// Children of Cues.
pub const CUES_SCHEMA: &[EbmlDescriptor] = &[list(CUE_POINT, Slot::CuePoint, CUE_POINT_SCHEMA)];

/// Children of a CuePoint.
pub const CUE_POINT_SCHEMA: &[EbmlDescriptor] = &[
    uint(CUE_TIME, Slot::CueTime),
    list(CUE_TRACK_POSITIONS, Slot::CuePositions, CUE_POSITIONS_SCHEMA),
];

/// Children of CueTrackPositions.
pub const CUE_POSITIONS_SCHEMA: &[EbmlDescriptor] = &[
    uint(CUE_TRACK, Slot::CueTrack),
    uint(CUE_CLUSTER_POSITION, Slot::CueClusterPosition),
    uint(CUE_RELATIVE_POSITION, Slot::CueRelativePosition),
    uint(CUE_BLOCK_NUMBER, Slot::CueBlockNumber),
];

/// Children of Tags.
pub const TAGS_SCHEMA: &[EbmlDescriptor] = &[list(TAG, Slot::Tag, TAG_SCHEMA)];

/// Children of a Tag.
pub const TAG_SCHEMA: &[EbmlDescriptor] = &[
    nest(TARGETS, Slot::TagTargets, TARGETS_SCHEMA),
    list(SIMPLE_TAG, Slot::SimpleTag, SIMPLE_TAG_SCHEMA),
];

/// Children of Targets.
pub const TARGETS_SCHEMA: &[EbmlDescriptor] = &[
    uint_list(TAG_TRACK_UID, Slot::TagTrackUid),
    uint_list(TAG_CHAPTER_UID, Slot::TagChapterUid),
];

/// Children of a SimpleTag.
pub const SIMPLE_TAG_SCHEMA: &[EbmlDescriptor] = &[
    utf8(TAG_NAME, Slot::TagName),
    string(TAG_LANGUAGE, Slot::TagLanguage),
    utf8(TAG_STRING, Slot::TagString),
];

/// Children of Chapters.
pub const CHAPTERS_SCHEMA: &[EbmlDescriptor] =
    &[list(EDITION_ENTRY, Slot::EditionEntry, EDITION_SCHEMA)];

/// Children of an EditionEntry.
pub const EDITION_SCHEMA: &[EbmlDescriptor] =
    &[list(CHAPTER_ATOM, Slot::ChapterAtom, CHAPTER_ATOM_SCHEMA)];

/// Children of a ChapterAtom. Nested atoms are left to the
/// unknown-but-valid skip path.
pub const CHAPTER_ATOM_SCHEMA: &[EbmlDescriptor] = &[
    uint(CHAPTER_UID, Slot::ChapterUid),
    uint(CHAPTER_TIME_START, Slot::ChapterTimeStart),
    uint(CHAPTER_TIME_END, Slot::ChapterTimeEnd),
    uint(CHAPTER_FLAG_HIDDEN, Slot::ChapterFlagHidden),
    uint(CHAPTER_FLAG_ENABLED, Slot::ChapterFlagEnabled),
    list(CHAPTER_DISPLAY, Slot::ChapterDisplay, CHAPTER_DISPLAY_SCHEMA),
];

/// Children of a ChapterDisplay.
pub const CHAPTER_DISPLAY_SCHEMA: &[EbmlDescriptor] = &[
    utf8(CHAP_STRING, Slot::ChapString),
    string(CHAP_LANGUAGE, Slot::ChapLanguage),
];

/// Children of Attachments.
pub const ATTACHMENTS_SCHEMA: &[EbmlDescriptor] =
    &[list(ATTACHED_FILE, Slot::AttachedFile, ATTACHED_FILE_SCHEMA)];

/// Children of an AttachedFile.
pub const ATTACHED_FILE_SCHEMA: &[EbmlDescriptor] = &[
    utf8(FILE_DESCRIPTION, Slot::FileDescription),
    utf8(FILE_NAME, Slot::FileName),
    string(FILE_MEDIA_TYPE, Slot::FileMediaType),
    binary(FILE_DATA, Slot::FileData),
    uint(FILE_UID, Slot::FileUid),
];

/// Children of a Cluster.
pub const CLUSTER_SCHEMA: &[EbmlDescriptor] = &[
    uint(TIMECODE, Slot::ClusterTimecode),
    binary(SIMPLE_BLOCK, Slot::SimpleBlockPayload),
    nest(BLOCK_GROUP, Slot::BlockGroup, BLOCK_GROUP_SCHEMA),
    skip(POSITION),
    skip(PREV_SIZE),
];

/// Children of a BlockGroup.
pub const BLOCK_GROUP_SCHEMA: &[EbmlDescriptor] = &[
    binary(BLOCK, Slot::BlockPayload),
    uint(BLOCK_DURATION, Slot::BlockDuration),
    sint(REFERENCE_BLOCK, Slot::ReferenceBlock),
    sint(DISCARD_PADDING, Slot::DiscardPadding),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_ids() {
        assert_eq!(EBML, 0x1A45DFA3);
        assert_eq!(SEGMENT, 0x18538067);
        assert_eq!(CLUSTER, 0x1F43B675);
        assert_eq!(TRACKS, 0x1654AE6B);
        assert_eq!(CUES, 0x1C53BB6B);
    }

    #[test]
    fn test_schema_lookup() {
        let desc = find(INFO_SCHEMA, TIMECODE_SCALE).unwrap();
        assert_eq!(desc.kind, EbmlKind::UInt);
        assert_eq!(desc.slot, Slot::TimecodeScale);

        assert!(find(INFO_SCHEMA, PIXEL_WIDTH).is_none());
    }

    #[test]
    fn test_segment_tables_differ_at_cluster() {
        let header = find(SEGMENT_HEADER_SCHEMA, CLUSTER).unwrap();
        assert_eq!(header.kind, EbmlKind::Stop);

        let body = find(SEGMENT_BODY_SCHEMA, CLUSTER).unwrap();
        assert_eq!(body.kind, EbmlKind::Stream);
        assert!(body.children.is_some());
    }

    #[test]
    fn test_kind_max_lengths() {
        assert_eq!(EbmlKind::UInt.max_length(), Some(8));
        assert_eq!(EbmlKind::Str.max_length(), Some(16 * 1024 * 1024));
        assert_eq!(EbmlKind::Binary.max_length(), Some(256 * 1024 * 1024));
        assert_eq!(EbmlKind::Nest.max_length(), None);
    }

    #[test]
    fn test_unknown_length_legality() {
        assert!(find(SEGMENT_BODY_SCHEMA, CLUSTER).unwrap().allows_unknown_length());
        assert!(find(CLUSTER_SCHEMA, BLOCK_GROUP).unwrap().allows_unknown_length());
        assert!(!find(SEGMENT_BODY_SCHEMA, INFO).unwrap().allows_unknown_length());
        assert!(!find(INFO_SCHEMA, TIMECODE_SCALE).unwrap().allows_unknown_length());
    }

    #[test]
    fn test_list_descriptors() {
        assert!(find(TRACKS_SCHEMA, TRACK_ENTRY).unwrap().is_list);
        assert!(find(CUES_SCHEMA, CUE_POINT).unwrap().is_list);
        assert!(!find(TRACK_ENTRY_SCHEMA, VIDEO).unwrap().is_list);
    }

    #[test]
    fn test_top_level_ids_are_four_octets() {
        for id in TOP_LEVEL_IDS {
            assert!(id >= 0x1000_0000, "resync scans 4-octet windows: 0x{id:X}");
        }
    }
}
