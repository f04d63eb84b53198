//! The generically-parsed document tree.
//!
//! Records are the destinations the schema engine fills. Each implements
//! [`EbmlTarget`], resolving the slots it owns with a `match` and ignoring
//! the rest; master slots hand out the child record to recurse into, and
//! list slots grow their vector by one default element per structural entry.
//!
//! Defaults live in the records' `Default` impls and are therefore applied
//! exactly once, when a record is first materialized. Re-entering an
//! already-parsed level reuses the existing record and never re-defaults.

use crate::elements::Slot;

/// Destination of generically-parsed values.
#[allow(unused_variables)]
pub trait EbmlTarget {
    /// Assign an unsigned integer value.
    fn set_uint(&mut self, slot: Slot, value: u64) {}
    /// Assign a signed integer value.
    fn set_sint(&mut self, slot: Slot, value: i64) {}
    /// Assign a float value.
    fn set_float(&mut self, slot: Slot, value: f64) {}
    /// Assign a string value.
    fn set_string(&mut self, slot: Slot, value: String) {}
    /// Assign a binary value.
    fn set_binary(&mut self, slot: Slot, value: Vec<u8>) {}
    /// Hand out the record a master slot recurses into. `None` skips the
    /// master's payload.
    fn child(&mut self, slot: Slot) -> Option<&mut dyn EbmlTarget> {
        None
    }
}

/// Parsed EBML header.
#[derive(Debug, Clone, PartialEq)]
pub struct EbmlHead {
    /// EBML version.
    pub version: u64,
    /// EBML read version.
    pub read_version: u64,
    /// Maximum element ID length in octets.
    pub max_id_length: u64,
    /// Maximum element size length in octets.
    pub max_size_length: u64,
    /// Document type.
    pub doc_type: String,
    /// Document type version.
    pub doc_type_version: u64,
    /// Document type read version.
    pub doc_type_read_version: u64,
}

impl Default for EbmlHead {
    fn default() -> Self {
        Self {
            version: 1,
            read_version: 1,
            max_id_length: 4,
            max_size_length: 8,
            doc_type: String::new(),
            doc_type_version: 1,
            doc_type_read_version: 1,
        }
    }
}

impl EbmlTarget for EbmlHead {
    fn set_uint(&mut self, slot: Slot, value: u64) {
        match slot {
            Slot::EbmlVersion => self.version = value,
            Slot::EbmlReadVersion => self.read_version = value,
            Slot::EbmlMaxIdLength => self.max_id_length = value,
            Slot::EbmlMaxSizeLength => self.max_size_length = value,
            Slot::DocTypeVersion => self.doc_type_version = value,
            Slot::DocTypeReadVersion => self.doc_type_read_version = value,
            _ => {}
        }
    }

    fn set_string(&mut self, slot: Slot, value: String) {
        if slot == Slot::DocType {
            self.doc_type = value;
        }
    }
}

/// Segment Info.
#[derive(Debug, Clone, PartialEq)]
pub struct Info {
    /// Nanoseconds per timecode unit.
    pub timecode_scale: u64,
    /// Duration in timecode units, 0.0 if absent.
    pub duration: f64,
    /// Title.
    pub title: Option<String>,
    /// Muxing application.
    pub muxing_app: Option<String>,
    /// Writing application.
    pub writing_app: Option<String>,
    /// Date in nanoseconds since 2001-01-01.
    pub date_utc: Option<i64>,
    /// Segment UID.
    pub uid: Option<Vec<u8>>,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            timecode_scale: 1_000_000,
            duration: 0.0,
            title: None,
            muxing_app: None,
            writing_app: None,
            date_utc: None,
            uid: None,
        }
    }
}

impl EbmlTarget for Info {
    fn set_uint(&mut self, slot: Slot, value: u64) {
        if slot == Slot::TimecodeScale && value != 0 {
            self.timecode_scale = value;
        }
    }

    fn set_sint(&mut self, slot: Slot, value: i64) {
        if slot == Slot::DateUtc {
            self.date_utc = Some(value);
        }
    }

    fn set_float(&mut self, slot: Slot, value: f64) {
        if slot == Slot::Duration {
            self.duration = value;
        }
    }

    fn set_string(&mut self, slot: Slot, value: String) {
        match slot {
            Slot::Title => self.title = Some(value),
            Slot::MuxingApp => self.muxing_app = Some(value),
            Slot::WritingApp => self.writing_app = Some(value),
            _ => {}
        }
    }

    fn set_binary(&mut self, slot: Slot, value: Vec<u8>) {
        if slot == Slot::SegmentUid {
            self.uid = Some(value);
        }
    }
}

/// Video settings of a track.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VideoSettings {
    /// Pixel width.
    pub pixel_width: u64,
    /// Pixel height.
    pub pixel_height: u64,
    /// Display width.
    pub display_width: Option<u64>,
    /// Display height.
    pub display_height: Option<u64>,
    /// Interlaced flag.
    pub interlaced: bool,
}

impl EbmlTarget for VideoSettings {
    fn set_uint(&mut self, slot: Slot, value: u64) {
        match slot {
            Slot::PixelWidth => self.pixel_width = value,
            Slot::PixelHeight => self.pixel_height = value,
            Slot::DisplayWidth => self.display_width = Some(value),
            Slot::DisplayHeight => self.display_height = Some(value),
            Slot::FlagInterlaced => self.interlaced = value != 0,
            _ => {}
        }
    }
}

/// Audio settings of a track.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSettings {
    /// Sampling frequency in Hz.
    pub sample_rate: f64,
    /// Output sampling frequency (SBR), if declared.
    pub out_sample_rate: Option<f64>,
    /// Channel count.
    pub channels: u64,
    /// Bits per sample.
    pub bit_depth: Option<u64>,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: 8000.0,
            out_sample_rate: None,
            channels: 1,
            bit_depth: None,
        }
    }
}

impl EbmlTarget for AudioSettings {
    fn set_uint(&mut self, slot: Slot, value: u64) {
        match slot {
            Slot::Channels => self.channels = value,
            Slot::BitDepth => self.bit_depth = Some(value),
            _ => {}
        }
    }

    fn set_float(&mut self, slot: Slot, value: f64) {
        match slot {
            Slot::SamplingFrequency => self.sample_rate = value,
            Slot::OutputSamplingFrequency => self.out_sample_rate = Some(value),
            _ => {}
        }
    }
}

/// One ContentEncoding of a track.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentEncoding {
    /// Encoding order.
    pub order: u64,
    /// Encoding scope bitmask.
    pub scope: u64,
    /// Encoding type: 0 compression, 1 encryption.
    pub encoding_type: u64,
    /// A ContentCompression element was present.
    pub has_compression: bool,
    /// Compression algorithm (3 = header stripping).
    pub comp_algo: u64,
    /// Compression settings (stripped header bytes for algo 3).
    pub comp_settings: Vec<u8>,
    /// A ContentEncryption element was present.
    pub has_encryption: bool,
    /// Encryption algorithm.
    pub enc_algo: u64,
}

impl EbmlTarget for ContentEncoding {
    fn set_uint(&mut self, slot: Slot, value: u64) {
        match slot {
            Slot::ContentEncodingOrder => self.order = value,
            Slot::ContentEncodingScope => self.scope = value,
            Slot::ContentEncodingType => self.encoding_type = value,
            Slot::ContentCompAlgo => self.comp_algo = value,
            Slot::ContentEncAlgo => self.enc_algo = value,
            _ => {}
        }
    }

    fn set_binary(&mut self, slot: Slot, value: Vec<u8>) {
        if slot == Slot::ContentCompSettings {
            self.comp_settings = value;
        }
    }

    fn child(&mut self, slot: Slot) -> Option<&mut dyn EbmlTarget> {
        match slot {
            Slot::ContentCompression => {
                self.has_compression = true;
                Some(self)
            }
            Slot::ContentEncryption => {
                self.has_encryption = true;
                Some(self)
            }
            _ => None,
        }
    }
}

/// One TrackEntry.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackEntry {
    /// Track number, the wire key Blocks reference.
    pub number: u64,
    /// Track UID.
    pub uid: u64,
    /// Track type.
    pub track_type: u64,
    /// Codec ID string.
    pub codec_id: String,
    /// Codec private blob.
    pub codec_private: Option<Vec<u8>>,
    /// Codec delay in nanoseconds.
    pub codec_delay: u64,
    /// Seek pre-roll in nanoseconds.
    pub seek_pre_roll: u64,
    /// Default frame duration in nanoseconds.
    pub default_duration: Option<u64>,
    /// Track name.
    pub name: Option<String>,
    /// Language (ISO 639-2).
    pub language: String,
    /// Default-track flag.
    pub flag_default: bool,
    /// Forced-track flag.
    pub flag_forced: bool,
    /// Enabled flag.
    pub flag_enabled: bool,
    /// Lacing-allowed flag.
    pub flag_lacing: bool,
    /// Video settings.
    pub video: VideoSettings,
    /// Audio settings.
    pub audio: AudioSettings,
    /// Content encodings.
    pub encodings: Vec<ContentEncoding>,
}

impl Default for TrackEntry {
    fn default() -> Self {
        Self {
            number: 0,
            uid: 0,
            track_type: 0,
            codec_id: String::new(),
            codec_private: None,
            codec_delay: 0,
            seek_pre_roll: 0,
            default_duration: None,
            name: None,
            language: "eng".to_string(),
            flag_default: true,
            flag_forced: false,
            flag_enabled: true,
            flag_lacing: true,
            video: VideoSettings::default(),
            audio: AudioSettings::default(),
            encodings: Vec::new(),
        }
    }
}

impl EbmlTarget for TrackEntry {
    fn set_uint(&mut self, slot: Slot, value: u64) {
        match slot {
            Slot::TrackNumber => self.number = value,
            Slot::TrackUid => self.uid = value,
            Slot::TrackType => self.track_type = value,
            Slot::TrackCodecDelay => self.codec_delay = value,
            Slot::TrackSeekPreRoll => self.seek_pre_roll = value,
            Slot::TrackDefaultDuration => self.default_duration = Some(value),
            Slot::TrackFlagDefault => self.flag_default = value != 0,
            Slot::TrackFlagForced => self.flag_forced = value != 0,
            Slot::TrackFlagEnabled => self.flag_enabled = value != 0,
            Slot::TrackFlagLacing => self.flag_lacing = value != 0,
            _ => {}
        }
    }

    fn set_string(&mut self, slot: Slot, value: String) {
        match slot {
            Slot::TrackCodecId => self.codec_id = value,
            Slot::TrackName => self.name = Some(value),
            Slot::TrackLanguage => self.language = value,
            _ => {}
        }
    }

    fn set_binary(&mut self, slot: Slot, value: Vec<u8>) {
        if slot == Slot::TrackCodecPrivate {
            self.codec_private = Some(value);
        }
    }

    fn child(&mut self, slot: Slot) -> Option<&mut dyn EbmlTarget> {
        match slot {
            Slot::TrackVideo => Some(&mut self.video),
            Slot::TrackAudio => Some(&mut self.audio),
            // ContentEncodings is an intermediate master; the entries land
            // on this record's list.
            Slot::TrackContentEncodings => Some(self),
            Slot::ContentEncoding => {
                self.encodings.push(ContentEncoding::default());
                self.encodings.last_mut().map(|e| e as &mut dyn EbmlTarget)
            }
            _ => None,
        }
    }
}

/// The Tracks list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tracks {
    /// Track entries in declaration order.
    pub entries: Vec<TrackEntry>,
}

impl EbmlTarget for Tracks {
    fn child(&mut self, slot: Slot) -> Option<&mut dyn EbmlTarget> {
        if slot == Slot::TrackEntry {
            self.entries.push(TrackEntry::default());
            self.entries.last_mut().map(|t| t as &mut dyn EbmlTarget)
        } else {
            None
        }
    }
}

/// One SeekHead entry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SeekEntry {
    /// Referenced element ID.
    pub id: u64,
    /// Byte position relative to segment start.
    pub position: u64,
}

impl EbmlTarget for SeekEntry {
    fn set_uint(&mut self, slot: Slot, value: u64) {
        match slot {
            Slot::SeekId => self.id = value,
            Slot::SeekPosition => self.position = value,
            _ => {}
        }
    }
}

/// The SeekHead list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeekHead {
    /// Seek entries.
    pub entries: Vec<SeekEntry>,
}

impl SeekHead {
    /// Position of the first entry referencing `id`, relative to segment
    /// start.
    pub fn position_of(&self, id: u32) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.id == id as u64)
            .map(|e| e.position)
    }
}

impl EbmlTarget for SeekHead {
    fn child(&mut self, slot: Slot) -> Option<&mut dyn EbmlTarget> {
        if slot == Slot::SeekEntry {
            self.entries.push(SeekEntry::default());
            self.entries.last_mut().map(|e| e as &mut dyn EbmlTarget)
        } else {
            None
        }
    }
}

/// One CueTrackPositions record.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CuePosition {
    /// Track number.
    pub track: u64,
    /// Cluster byte position relative to segment start.
    pub cluster_position: u64,
    /// Relative position within the cluster.
    pub relative_position: Option<u64>,
    /// Block number within the cluster.
    pub block_number: Option<u64>,
}

impl EbmlTarget for CuePosition {
    fn set_uint(&mut self, slot: Slot, value: u64) {
        match slot {
            Slot::CueTrack => self.track = value,
            Slot::CueClusterPosition => self.cluster_position = value,
            Slot::CueRelativePosition => self.relative_position = Some(value),
            Slot::CueBlockNumber => self.block_number = Some(value),
            _ => {}
        }
    }
}

/// One CuePoint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CuePoint {
    /// Time in timecode units.
    pub time: u64,
    /// Per-track positions.
    pub positions: Vec<CuePosition>,
}

impl EbmlTarget for CuePoint {
    fn set_uint(&mut self, slot: Slot, value: u64) {
        if slot == Slot::CueTime {
            self.time = value;
        }
    }

    fn child(&mut self, slot: Slot) -> Option<&mut dyn EbmlTarget> {
        if slot == Slot::CuePositions {
            self.positions.push(CuePosition::default());
            self.positions.last_mut().map(|p| p as &mut dyn EbmlTarget)
        } else {
            None
        }
    }
}

/// The Cues list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cues {
    /// Cue points in file order.
    pub points: Vec<CuePoint>,
}

impl EbmlTarget for Cues {
    fn child(&mut self, slot: Slot) -> Option<&mut dyn EbmlTarget> {
        if slot == Slot::CuePoint {
            self.points.push(CuePoint::default());
            self.points.last_mut().map(|p| p as &mut dyn EbmlTarget)
        } else {
            None
        }
    }
}

/// One SimpleTag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimpleTag {
    /// Tag name.
    pub name: String,
    /// Tag language.
    pub language: Option<String>,
    /// String value.
    pub value: Option<String>,
}

impl EbmlTarget for SimpleTag {
    fn set_string(&mut self, slot: Slot, value: String) {
        match slot {
            Slot::TagName => self.name = value,
            Slot::TagLanguage => self.language = Some(value),
            Slot::TagString => self.value = Some(value),
            _ => {}
        }
    }
}

/// One Tag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tag {
    /// Target track UIDs.
    pub track_uids: Vec<u64>,
    /// Target chapter UIDs.
    pub chapter_uids: Vec<u64>,
    /// Simple tags.
    pub simple: Vec<SimpleTag>,
}

impl EbmlTarget for Tag {
    fn set_uint(&mut self, slot: Slot, value: u64) {
        match slot {
            Slot::TagTrackUid => self.track_uids.push(value),
            Slot::TagChapterUid => self.chapter_uids.push(value),
            _ => {}
        }
    }

    fn child(&mut self, slot: Slot) -> Option<&mut dyn EbmlTarget> {
        match slot {
            Slot::TagTargets => Some(self),
            Slot::SimpleTag => {
                self.simple.push(SimpleTag::default());
                self.simple.last_mut().map(|t| t as &mut dyn EbmlTarget)
            }
            _ => None,
        }
    }
}

/// The Tags list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tags {
    /// Tags in file order.
    pub tags: Vec<Tag>,
}

impl EbmlTarget for Tags {
    fn child(&mut self, slot: Slot) -> Option<&mut dyn EbmlTarget> {
        if slot == Slot::Tag {
            self.tags.push(Tag::default());
            self.tags.last_mut().map(|t| t as &mut dyn EbmlTarget)
        } else {
            None
        }
    }
}

/// One ChapterDisplay.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChapterDisplay {
    /// Chapter title.
    pub title: String,
    /// Title language.
    pub language: Option<String>,
}

impl EbmlTarget for ChapterDisplay {
    fn set_string(&mut self, slot: Slot, value: String) {
        match slot {
            Slot::ChapString => self.title = value,
            Slot::ChapLanguage => self.language = Some(value),
            _ => {}
        }
    }
}

/// One ChapterAtom.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterAtom {
    /// Chapter UID.
    pub uid: u64,
    /// Start time in nanoseconds.
    pub time_start: u64,
    /// End time in nanoseconds.
    pub time_end: Option<u64>,
    /// Hidden flag.
    pub hidden: bool,
    /// Enabled flag.
    pub enabled: bool,
    /// Localized titles.
    pub displays: Vec<ChapterDisplay>,
}

impl Default for ChapterAtom {
    fn default() -> Self {
        Self {
            uid: 0,
            time_start: 0,
            time_end: None,
            hidden: false,
            enabled: true,
            displays: Vec::new(),
        }
    }
}

impl EbmlTarget for ChapterAtom {
    fn set_uint(&mut self, slot: Slot, value: u64) {
        match slot {
            Slot::ChapterUid => self.uid = value,
            Slot::ChapterTimeStart => self.time_start = value,
            Slot::ChapterTimeEnd => self.time_end = Some(value),
            Slot::ChapterFlagHidden => self.hidden = value != 0,
            Slot::ChapterFlagEnabled => self.enabled = value != 0,
            _ => {}
        }
    }

    fn child(&mut self, slot: Slot) -> Option<&mut dyn EbmlTarget> {
        if slot == Slot::ChapterDisplay {
            self.displays.push(ChapterDisplay::default());
            self.displays.last_mut().map(|d| d as &mut dyn EbmlTarget)
        } else {
            None
        }
    }
}

/// One EditionEntry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Edition {
    /// Chapter atoms.
    pub atoms: Vec<ChapterAtom>,
}

impl EbmlTarget for Edition {
    fn child(&mut self, slot: Slot) -> Option<&mut dyn EbmlTarget> {
        if slot == Slot::ChapterAtom {
            self.atoms.push(ChapterAtom::default());
            self.atoms.last_mut().map(|a| a as &mut dyn EbmlTarget)
        } else {
            None
        }
    }
}

/// The Chapters list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Chapters {
    /// Edition entries.
    pub editions: Vec<Edition>,
}

impl EbmlTarget for Chapters {
    fn child(&mut self, slot: Slot) -> Option<&mut dyn EbmlTarget> {
        if slot == Slot::EditionEntry {
            self.editions.push(Edition::default());
            self.editions.last_mut().map(|e| e as &mut dyn EbmlTarget)
        } else {
            None
        }
    }
}

/// One AttachedFile.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttachedFile {
    /// File name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Media type.
    pub media_type: String,
    /// File payload.
    pub data: Vec<u8>,
    /// File UID.
    pub uid: u64,
}

impl EbmlTarget for AttachedFile {
    fn set_uint(&mut self, slot: Slot, value: u64) {
        if slot == Slot::FileUid {
            self.uid = value;
        }
    }

    fn set_string(&mut self, slot: Slot, value: String) {
        match slot {
            Slot::FileName => self.name = value,
            Slot::FileDescription => self.description = Some(value),
            Slot::FileMediaType => self.media_type = value,
            _ => {}
        }
    }

    fn set_binary(&mut self, slot: Slot, value: Vec<u8>) {
        if slot == Slot::FileData {
            self.data = value;
        }
    }
}

/// The Attachments list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attachments {
    /// Attached files.
    pub files: Vec<AttachedFile>,
}

impl EbmlTarget for Attachments {
    fn child(&mut self, slot: Slot) -> Option<&mut dyn EbmlTarget> {
        if slot == Slot::AttachedFile {
            self.files.push(AttachedFile::default());
            self.files.last_mut().map(|f| f as &mut dyn EbmlTarget)
        } else {
            None
        }
    }
}

/// Everything parsed from the Segment's metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SegmentDoc {
    /// Segment Info.
    pub info: Info,
    /// Tracks.
    pub tracks: Tracks,
    /// Cues.
    pub cues: Cues,
    /// Tags.
    pub tags: Tags,
    /// SeekHead.
    pub seek_head: SeekHead,
    /// Chapters.
    pub chapters: Chapters,
    /// Attachments.
    pub attachments: Attachments,
}

impl EbmlTarget for SegmentDoc {
    fn child(&mut self, slot: Slot) -> Option<&mut dyn EbmlTarget> {
        match slot {
            Slot::SegmentInfo => Some(&mut self.info),
            Slot::SegmentTracks => Some(&mut self.tracks),
            Slot::SegmentCues => Some(&mut self.cues),
            Slot::SegmentTags => Some(&mut self.tags),
            Slot::SegmentSeekHead => Some(&mut self.seek_head),
            Slot::SegmentChapters => Some(&mut self.chapters),
            Slot::SegmentAttachments => Some(&mut self.attachments),
            _ => None,
        }
    }
}

/// A Block collected from the current cluster, awaiting decode.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PendingBlock {
    /// Raw block payload (track vint + timecode + flags + frames).
    pub payload: Vec<u8>,
    /// True for SimpleBlock (keyframe bit lives in the flags byte).
    pub simple: bool,
    /// BlockDuration in timecode units.
    pub duration: Option<u64>,
    /// A ReferenceBlock was present (the block is not a keyframe).
    pub has_reference: bool,
    /// Discard padding in nanoseconds.
    pub discard_padding: i64,
}

impl EbmlTarget for PendingBlock {
    fn set_uint(&mut self, slot: Slot, value: u64) {
        if slot == Slot::BlockDuration {
            self.duration = Some(value);
        }
    }

    fn set_sint(&mut self, slot: Slot, value: i64) {
        match slot {
            Slot::ReferenceBlock => self.has_reference = true,
            Slot::DiscardPadding => self.discard_padding = value,
            _ => {}
        }
    }

    fn set_binary(&mut self, slot: Slot, value: Vec<u8>) {
        if slot == Slot::BlockPayload {
            self.payload = value;
        }
    }
}

/// The transient per-cluster state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClusterRecord {
    /// Cluster timecode in timecode units.
    pub timecode: u64,
    /// The most recently completed block, if any.
    pub block: Option<PendingBlock>,
}

impl EbmlTarget for ClusterRecord {
    fn set_uint(&mut self, slot: Slot, value: u64) {
        if slot == Slot::ClusterTimecode {
            self.timecode = value;
        }
    }

    fn set_binary(&mut self, slot: Slot, value: Vec<u8>) {
        if slot == Slot::SimpleBlockPayload {
            self.block = Some(PendingBlock {
                payload: value,
                simple: true,
                ..PendingBlock::default()
            });
        }
    }

    fn child(&mut self, slot: Slot) -> Option<&mut dyn EbmlTarget> {
        if slot == Slot::BlockGroup {
            self.block = Some(PendingBlock::default());
            self.block.as_mut().map(|b| b as &mut dyn EbmlTarget)
        } else {
            None
        }
    }
}
