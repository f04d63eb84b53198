//! MKV/Matroska demuxer.
//!
//! Ties the generic schema engine to the playback API: EBML header
//! validation, the segment metadata scan, the cluster/block state machine,
//! lacing reassembly, lazy cue-index seeking, and resync-based corruption
//! recovery.

use crate::ebml;
use crate::elements::{
    self, EbmlDescriptor, CLUSTER_SCHEMA, EBML_HEAD_SCHEMA, SEGMENT_BODY_SCHEMA,
    SEGMENT_HEADER_SCHEMA,
};
use crate::error::{MkvError, Result};
use crate::model::{self, Track};
use crate::parser::{ParseLevel, ParserCtx, Step};
use crate::records::{ClusterRecord, EbmlHead, PendingBlock, SegmentDoc};
use byteorder::{BigEndian, ReadBytesExt};
use demux_core::{
    ContainerDemuxer, MediaInfo, MediaStream, Packet, PacketFlags, PacketInfo,
};
use std::collections::VecDeque;
use std::io::{Cursor, SeekFrom};
use tracing::{debug, trace, warn};

/// Lacing types encoded in a Block's flags byte (bits 1-2).
mod lacing {
    /// Single frame per block.
    pub const NONE: u8 = 0;
    /// Xiph-style: chained 255-delta size bytes, remainder last.
    pub const XIPH: u8 = 1;
    /// Fixed-size: total divided evenly by the frame count.
    pub const FIXED: u8 = 2;
    /// EBML-style: first size a vint, then signed-vint deltas.
    pub const EBML: u8 = 3;
}

/// Gross-corruption guard for the cue index: a second entry beyond this
/// many nanoseconds means the index is garbage.
const CUE_TIME_SANITY_NS: f64 = 1e14;

/// Cluster walk states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClusterState {
    /// Between clusters, parsing against the segment table.
    AwaitCluster,
    /// Inside a cluster, parsing timecode and blocks.
    InCluster,
}

/// One lazy-built seek index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IndexEntry {
    /// Cue time in timecode units.
    time: u64,
    /// Track the cue refers to.
    #[allow(dead_code)]
    track: u64,
    /// Cluster byte position relative to segment start.
    position: u64,
}

/// Matroska/WebM demuxer.
///
/// Lifecycle: [`MkvDemuxer::new`] → [`MkvDemuxer::init`] →
/// {[`MkvDemuxer::peek`] → [`MkvDemuxer::read`]}* → [`MkvDemuxer::seek`] →
/// ... → drop. All calls block on the underlying stream; one instance must
/// be driven from one thread.
pub struct MkvDemuxer<S: MediaStream> {
    ctx: ParserCtx<S>,
    head: EbmlHead,
    doc: SegmentDoc,
    tracks: Vec<Track>,
    media_info: MediaInfo,
    state: ClusterState,
    cluster: ClusterRecord,
    queue: VecDeque<Packet>,
    pending_packet: Option<Packet>,
    index: Option<Vec<IndexEntry>>,
    segment_start: u64,
    segment_len: Option<u64>,
    file_size: u64,
    time_scale: u64,
    reached_end: bool,
    initialized: bool,
}

impl<S: MediaStream> MkvDemuxer<S> {
    /// Create a demuxer over `stream`. Nothing is read until
    /// [`MkvDemuxer::init`].
    pub fn new(stream: S) -> Self {
        Self {
            ctx: ParserCtx::new(stream),
            head: EbmlHead::default(),
            doc: SegmentDoc::default(),
            tracks: Vec::new(),
            media_info: MediaInfo::default(),
            state: ClusterState::AwaitCluster,
            cluster: ClusterRecord::default(),
            queue: VecDeque::new(),
            pending_packet: None,
            index: None,
            segment_start: 0,
            segment_len: None,
            file_size: 0,
            time_scale: 1_000_000,
            reached_end: false,
            initialized: false,
        }
    }

    /// Recover the underlying stream.
    pub fn into_inner(self) -> S {
        self.ctx.into_inner()
    }

    /// Whether the document declared the WebM doctype.
    pub fn is_webm(&self) -> bool {
        self.head.doc_type == "webm"
    }

    /// The parsed document tree (post-init).
    pub fn document(&self) -> &SegmentDoc {
        &self.doc
    }

    /// Parse the EBML header and the Segment metadata, then build the
    /// track model. Any failure here means the input is not a playable
    /// container.
    pub fn init(&mut self) -> Result<()> {
        self.file_size = self.ctx.stream_mut().len()?;
        self.parse_ebml_head()?;
        self.locate_segment()?;
        self.scan_metadata()?;

        self.time_scale = self.doc.info.timecode_scale;
        self.tracks = model::build_tracks(&self.doc);
        self.media_info = model::build_media_info(&self.doc, &self.tracks, self.file_size);

        self.ctx.set_top_schema(SEGMENT_BODY_SCHEMA);
        self.state = ClusterState::AwaitCluster;
        self.initialized = true;
        debug!(
            doc_type = %self.head.doc_type,
            tracks = self.tracks.len(),
            duration_us = self.media_info.duration_us,
            "container opened"
        );
        Ok(())
    }

    /// Description of the opened container. Idempotent between seeks and
    /// reads.
    pub fn media_info(&self) -> &MediaInfo {
        &self.media_info
    }

    /// Enable or disable delivery of one stream's packets. Disabled
    /// tracks are still parsed; their frames are dropped.
    pub fn set_track_enabled(&mut self, stream_index: u32, enabled: bool) {
        if let Some(track) = self
            .tracks
            .iter_mut()
            .find(|t| t.stream_index == stream_index)
        {
            track.enabled = enabled;
        }
    }

    fn ensure_init(&mut self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            self.init()
        }
    }

    // ------------------------------------------------------------------
    // Header and metadata
    // ------------------------------------------------------------------

    fn parse_ebml_head(&mut self) -> Result<()> {
        let (id, _) = self.ctx.read_id()?.ok_or(MkvError::Truncated)?;
        if id != elements::EBML {
            return Err(MkvError::InvalidHeader(
                "missing EBML header element".to_string(),
            ));
        }
        let length = self
            .ctx
            .read_element_length()?
            .ok_or(MkvError::UnknownLengthNotAllowed { id })?;
        let start = self.ctx.pos()?;
        self.ctx.push_level(
            ParseLevel {
                start,
                length: Some(length),
            },
            EBML_HEAD_SCHEMA,
        )?;

        let mut head = EbmlHead::default();
        self.ctx.parse_nest(EBML_HEAD_SCHEMA, &mut head)?;

        if head.doc_type != "matroska" && head.doc_type != "webm" {
            return Err(MkvError::InvalidHeader(format!(
                "unrecognized doctype: {}",
                head.doc_type
            )));
        }
        if head.read_version > 1 || head.doc_type_read_version > 4 {
            return Err(MkvError::InvalidHeader(format!(
                "unsupported version: EBML {} doctype {}",
                head.read_version, head.doc_type_read_version
            )));
        }
        if head.max_id_length > ebml::MAX_ID_LENGTH as u64
            || head.max_size_length > ebml::MAX_VINT_LENGTH as u64
        {
            return Err(MkvError::InvalidHeader(format!(
                "unsupported limits: max id {} max size {}",
                head.max_id_length, head.max_size_length
            )));
        }
        self.ctx.set_max_size_octets(head.max_size_length as usize);
        trace!(doc_type = %head.doc_type, "EBML header accepted");
        self.head = head;
        Ok(())
    }

    fn locate_segment(&mut self) -> Result<()> {
        loop {
            let (id, _) = self
                .ctx
                .read_id()?
                .ok_or_else(|| MkvError::InvalidHeader("no Segment element".to_string()))?;
            let length = self.ctx.read_element_length()?;
            match id {
                elements::SEGMENT => {
                    let start = self.ctx.pos()?;
                    self.segment_start = start;
                    self.segment_len = length;
                    self.ctx.push_level(ParseLevel { start, length }, SEGMENT_HEADER_SCHEMA)?;
                    self.ctx.resync_pos = start;
                    return Ok(());
                }
                _ => {
                    let len = length.ok_or(MkvError::UnknownLengthNotAllowed { id })?;
                    self.ctx.stream_mut().seek(SeekFrom::Current(len as i64))?;
                }
            }
        }
    }

    /// Parse level-1 metadata until the first Cluster. Damage in optional
    /// sections is resynced over; only header/Segment failures were fatal.
    fn scan_metadata(&mut self) -> Result<()> {
        loop {
            match self.ctx.parse_next(SEGMENT_HEADER_SCHEMA, &mut self.doc) {
                Ok(Step::Element(_)) => {}
                Ok(Step::Stopped(_)) => {
                    trace!("metadata scan reached first cluster");
                    return Ok(());
                }
                Ok(Step::LevelEnd) | Ok(Step::Eof) => return Ok(()),
                Err(e) if e.is_recoverable() => {
                    warn!(error = %e, "metadata parse error, resyncing");
                    match self.resync_with_schema(SEGMENT_HEADER_SCHEMA) {
                        Ok(_) => {}
                        Err(MkvError::EndOfStream) => return Ok(()),
                        Err(e) => return Err(e),
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    // ------------------------------------------------------------------
    // Streaming
    // ------------------------------------------------------------------

    /// Re-enter parsing after structural damage: scan for the next
    /// top-level ID and force the Segment's remaining length to unknown.
    fn resync_with_schema(&mut self, schema: &'static [EbmlDescriptor]) -> Result<u32> {
        let (id, id_start) = self.ctx.resync(self.ctx.resync_pos)?;
        self.ctx.clear_levels();
        self.ctx.push_level(
            ParseLevel {
                start: self.segment_start,
                length: None,
            },
            schema,
        )?;
        self.segment_len = None;
        // Scan past this match if it fails too, so resync always advances.
        self.ctx.resync_pos = id_start + 4;
        self.state = ClusterState::AwaitCluster;
        self.cluster = ClusterRecord::default();
        Ok(id)
    }

    /// Walk the stream until at least one packet is queued.
    fn pump(&mut self) -> Result<()> {
        loop {
            let step = match self.state {
                ClusterState::AwaitCluster => {
                    self.ctx.parse_next(SEGMENT_BODY_SCHEMA, &mut self.doc)
                }
                ClusterState::InCluster => self.ctx.parse_next(CLUSTER_SCHEMA, &mut self.cluster),
            };

            match step {
                Ok(Step::Element(elements::CLUSTER)) => {
                    self.cluster = ClusterRecord::default();
                    self.state = ClusterState::InCluster;
                }
                Ok(Step::Element(elements::SIMPLE_BLOCK))
                | Ok(Step::Element(elements::BLOCK_GROUP)) => {
                    if let Some(block) = self.cluster.block.take() {
                        match self.decode_block(&block) {
                            Ok(0) => {}
                            Ok(_) => return Ok(()),
                            Err(e) if e.is_recoverable() => {
                                warn!(error = %e, "block decode error, resyncing");
                                self.resync_with_schema(SEGMENT_BODY_SCHEMA)?;
                            }
                            Err(e) => return Err(e),
                        }
                    }
                }
                Ok(Step::Element(_)) => {}
                Ok(Step::LevelEnd) => {
                    if self.ctx.depth() == 0 {
                        return Err(MkvError::EndOfStream);
                    }
                    self.state = ClusterState::AwaitCluster;
                }
                Ok(Step::Eof) | Ok(Step::Stopped(_)) => return Err(MkvError::EndOfStream),
                Err(e) if e.is_recoverable() => {
                    warn!(error = %e, "cluster parse error, resyncing");
                    self.resync_with_schema(SEGMENT_BODY_SCHEMA)?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Pop the next packet, pumping the stream as needed.
    fn next_packet(&mut self) -> Result<Packet> {
        loop {
            if let Some(packet) = self.queue.pop_front() {
                return Ok(packet);
            }
            if self.reached_end {
                return Err(MkvError::EndOfStream);
            }
            match self.pump() {
                Ok(()) => {}
                Err(MkvError::EndOfStream) | Err(MkvError::Truncated) => {
                    self.reached_end = true;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Determine the next packet's metadata without consuming its payload.
    ///
    /// The final packet of the stream carries the EOS flag. At the genuine
    /// end, `EndOfStream` is reported.
    pub fn peek(&mut self) -> Result<PacketInfo> {
        self.ensure_init()?;
        if self.pending_packet.is_none() {
            let packet = self.next_packet()?;
            self.pending_packet = Some(packet);
        }

        // Look one packet ahead so the last one can be flagged.
        if self.queue.is_empty() && !self.reached_end {
            match self.pump() {
                Ok(()) => {}
                Err(MkvError::EndOfStream) | Err(MkvError::Truncated) => {
                    self.reached_end = true;
                }
                Err(e) => return Err(e),
            }
        }

        let eos = self.queue.is_empty() && self.reached_end;
        match self.pending_packet.as_mut() {
            Some(packet) => {
                if eos {
                    packet.info.flags.insert(PacketFlags::EOS);
                }
                Ok(packet.info)
            }
            None => Err(MkvError::EndOfStream),
        }
    }

    /// Copy the peeked packet's payload into `buf` and consume it.
    ///
    /// Calls [`MkvDemuxer::peek`] itself if none is pending. `buf` must
    /// hold the size the peek reported.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<PacketInfo> {
        if self.pending_packet.is_none() {
            self.peek()?;
        }
        let packet = self.pending_packet.take().ok_or(MkvError::EndOfStream)?;
        if buf.len() < packet.data.len() {
            let needed = packet.data.len();
            self.pending_packet = Some(packet);
            return Err(MkvError::BufferTooSmall {
                needed,
                available: buf.len(),
            });
        }
        buf[..packet.data.len()].copy_from_slice(&packet.data);
        Ok(packet.info)
    }

    /// Read the next packet as an owned value; `None` at end of stream.
    pub fn read_packet(&mut self) -> Result<Option<Packet>> {
        match self.peek() {
            Ok(info) => {
                let mut buf = vec![0u8; info.size];
                let info = self.read(&mut buf)?;
                Ok(Some(Packet::new(info, buf)))
            }
            Err(MkvError::EndOfStream) => Ok(None),
            Err(e) => Err(e),
        }
    }

    // ------------------------------------------------------------------
    // Seeking
    // ------------------------------------------------------------------

    /// Reposition to the indexed point nearest `time_us`.
    ///
    /// The index is built lazily from the Cues on first use. With no
    /// usable index this reports `NoIndex` and leaves the stream where it
    /// was; the caller may fall back to a sequential scan. Any in-flight
    /// packet and lace state is discarded on success.
    pub fn seek(&mut self, time_us: i64) -> Result<()> {
        self.ensure_init()?;
        if self.index.is_none() {
            let entries = self.build_index()?;
            self.index = Some(entries);
        }

        let entries = match self.index.as_deref() {
            Some(entries) if !entries.is_empty() => entries,
            _ => {
                // Discard so a later seek can rebuild after more of the
                // file was read.
                self.index = None;
                return Err(MkvError::NoIndex);
            }
        };

        let target_tc = (time_us.max(0) as u64).saturating_mul(1000) / self.time_scale;
        let mut best: Option<IndexEntry> = None;
        let mut best_diff = u64::MAX;
        for entry in entries {
            let diff = entry.time.abs_diff(target_tc);
            // Strictly smaller only: the first entry wins ties.
            if diff < best_diff {
                best_diff = diff;
                best = Some(*entry);
            }
        }
        let entry = best.ok_or(MkvError::NoIndex)?;

        let target_pos = self.segment_start + entry.position;
        debug!(time_us, cue_time = entry.time, pos = target_pos, "seeking");
        if let Err(e) = self.ctx.stream_mut().seek(SeekFrom::Start(target_pos)) {
            self.index = None;
            return Err(MkvError::Io(e));
        }

        self.ctx.clear_levels();
        self.ctx.clear_pending();
        self.ctx.push_level(
            ParseLevel {
                start: self.segment_start,
                length: self.segment_len,
            },
            SEGMENT_BODY_SCHEMA,
        )?;
        self.ctx.resync_pos = target_pos;
        self.state = ClusterState::AwaitCluster;
        self.cluster = ClusterRecord::default();
        self.queue.clear();
        self.pending_packet = None;
        self.reached_end = false;
        Ok(())
    }

    /// Populate the time→offset index from the Cues, jumping through the
    /// SeekHead when the metadata scan never reached them.
    fn build_index(&mut self) -> Result<Vec<IndexEntry>> {
        if self.doc.cues.points.is_empty() {
            if let Some(rel_pos) = self.doc.seek_head.position_of(elements::CUES) {
                let saved = self.ctx.save()?;
                let outcome = self.parse_cues_at(self.segment_start + rel_pos);
                self.ctx.restore(saved)?;
                if let Err(e) = outcome {
                    warn!(error = %e, "failed to parse cues via seekhead");
                }
            }
        }

        let points = &self.doc.cues.points;
        if points.is_empty() {
            return Ok(Vec::new());
        }
        // Only the second entry is checked; a time beyond the sanity bound
        // means the whole index is garbage.
        if points.len() > 1
            && points[1].time as f64 > CUE_TIME_SANITY_NS / self.time_scale as f64
        {
            warn!(time = points[1].time, "dropping apparently broken cue index");
            return Ok(Vec::new());
        }

        let mut entries = Vec::with_capacity(points.len());
        for point in points {
            if let Some(pos) = point.positions.first() {
                entries.push(IndexEntry {
                    time: point.time,
                    track: pos.track,
                    position: pos.cluster_position,
                });
            }
        }
        debug!(entries = entries.len(), "cue index built");
        Ok(entries)
    }

    fn parse_cues_at(&mut self, abs_pos: u64) -> Result<()> {
        self.ctx.clear_levels();
        self.ctx.clear_pending();
        self.ctx.stream_mut().seek(SeekFrom::Start(abs_pos))?;
        self.ctx.push_level(
            ParseLevel {
                start: self.segment_start,
                length: None,
            },
            SEGMENT_BODY_SCHEMA,
        )?;
        match self.ctx.parse_next(SEGMENT_BODY_SCHEMA, &mut self.doc)? {
            Step::Element(elements::CUES) => Ok(()),
            _ => Err(MkvError::NoIndex),
        }
    }

    // ------------------------------------------------------------------
    // Block decoding
    // ------------------------------------------------------------------

    /// Decode one Block into per-frame packets on the queue. Returns the
    /// number of packets queued (zero for a masked track).
    fn decode_block(&mut self, block: &PendingBlock) -> Result<usize> {
        let data = block.payload.as_slice();
        if data.len() < 3 {
            return Err(MkvError::InvalidBlock("undersized block".to_string()));
        }

        let mut cursor = Cursor::new(data);
        let (track_number, vint_len) = ebml::read_vint(&mut cursor, ebml::MAX_VINT_LENGTH, 0)?;
        if data.len() < vint_len + 3 {
            return Err(MkvError::InvalidBlock("block header too small".to_string()));
        }
        let relative_tc = cursor.read_i16::<BigEndian>().map_err(MkvError::Io)?;
        let flags = cursor.read_u8().map_err(MkvError::Io)?;

        let track_idx = self
            .tracks
            .iter()
            .position(|t| t.number == track_number)
            .ok_or(MkvError::TrackNotFound { track_number })?;

        let keyframe = if block.simple {
            flags & 0x80 != 0
        } else {
            !block.has_reference
        };
        let discardable = block.simple && flags & 0x01 != 0;
        let lacing_type = (flags >> 1) & 0x03;

        let payload = &data[vint_len + 3..];
        let frames: Vec<&[u8]> = if lacing_type == lacing::NONE {
            vec![payload]
        } else {
            Self::split_laced_frames(payload, lacing_type)?
        };

        let track = &self.tracks[track_idx];
        if !track.enabled {
            trace!(track = track_number, "dropping frames of masked track");
            return Ok(0);
        }
        let (kind, stream_index, strip, default_duration_ns) = (
            track.kind,
            track.stream_index,
            track.strip.clone(),
            track.default_duration_ns,
        );

        // Negative sums are clamped, as the reference demuxer does.
        let block_tc = (self.cluster.timecode as i64 + relative_tc as i64).max(0) as u64;
        let base_ns = block_tc.saturating_mul(self.time_scale);

        // A BlockGroup duration covers the whole lace; otherwise frames
        // advance by the track's default duration.
        let frame_count = frames.len() as u64;
        let per_frame_ns = block
            .duration
            .map(|d| d.saturating_mul(self.time_scale) / frame_count)
            .or(default_duration_ns);

        let mut queued = 0usize;
        for (i, frame) in frames.iter().enumerate() {
            let pts_ns = base_ns + per_frame_ns.unwrap_or(0) * i as u64;
            let mut payload = Vec::with_capacity(strip.len() + frame.len());
            payload.extend_from_slice(&strip);
            payload.extend_from_slice(frame);

            let mut packet_flags = PacketFlags::empty();
            if keyframe && i == 0 {
                packet_flags.insert(PacketFlags::KEYFRAME);
            }
            if discardable {
                packet_flags.insert(PacketFlags::DISCARDABLE);
            }

            let info = PacketInfo {
                kind,
                stream_index,
                size: payload.len(),
                pts_us: (pts_ns / 1000) as i64,
                duration_us: per_frame_ns.map(|d| (d / 1000) as i64).unwrap_or(0),
                flags: packet_flags,
            };
            self.queue.push_back(Packet::new(info, payload));
            queued += 1;
        }

        trace!(
            track = track_number,
            frames = queued,
            pts_tc = block_tc,
            "block decoded"
        );
        Ok(queued)
    }

    /// Split a laced payload into frames. The first byte is the frame
    /// count minus one; the size table encoding depends on the lacing
    /// type; for Xiph and EBML lacing the last frame takes the remainder.
    fn split_laced_frames(data: &[u8], lacing_type: u8) -> Result<Vec<&[u8]>> {
        if data.is_empty() {
            return Err(MkvError::InvalidLacing("missing lace header".to_string()));
        }
        let count = data[0] as usize + 1;
        let rest = &data[1..];

        let (mut sizes, table_len) = match lacing_type {
            lacing::XIPH => Self::xiph_sizes(rest, count)?,
            lacing::EBML => Self::ebml_sizes(rest, count)?,
            lacing::FIXED => {
                if !rest.len().is_multiple_of(count) {
                    return Err(MkvError::InvalidLacing(format!(
                        "fixed lacing: {} bytes not divisible by {} frames",
                        rest.len(),
                        count
                    )));
                }
                (vec![rest.len() / count; count], 0)
            }
            other => {
                return Err(MkvError::InvalidLacing(format!(
                    "unknown lacing type {other}"
                )))
            }
        };

        let frames_data = &rest[table_len..];
        if lacing_type != lacing::FIXED {
            let used: usize = sizes.iter().sum();
            if used > frames_data.len() {
                return Err(MkvError::InvalidLacing(
                    "lace sizes exceed block payload".to_string(),
                ));
            }
            sizes.push(frames_data.len() - used);
        }

        let mut frames = Vec::with_capacity(sizes.len());
        let mut offset = 0usize;
        for &size in &sizes {
            if offset + size > frames_data.len() {
                return Err(MkvError::InvalidLacing(format!(
                    "frame of {} bytes exceeds {} remaining",
                    size,
                    frames_data.len() - offset
                )));
            }
            frames.push(&frames_data[offset..offset + size]);
            offset += size;
        }
        Ok(frames)
    }

    /// Xiph lace sizes: each of the first count-1 sizes is a chain of
    /// 255-valued bytes ended by a smaller one.
    fn xiph_sizes(data: &[u8], count: usize) -> Result<(Vec<usize>, usize)> {
        let mut sizes = Vec::with_capacity(count);
        let mut offset = 0usize;
        for _ in 0..count.saturating_sub(1) {
            let mut size = 0usize;
            loop {
                let byte = *data.get(offset).ok_or_else(|| {
                    MkvError::InvalidLacing("xiph size table truncated".to_string())
                })?;
                offset += 1;
                size += byte as usize;
                if byte < 255 {
                    break;
                }
            }
            sizes.push(size);
        }
        Ok((sizes, offset))
    }

    /// EBML lace sizes: the first is a plain vint, each further size is a
    /// signed-vint delta from the previous one.
    fn ebml_sizes(data: &[u8], count: usize) -> Result<(Vec<usize>, usize)> {
        if count < 2 {
            return Ok((Vec::new(), 0));
        }
        let mut cursor = Cursor::new(data);
        let (first, _) = ebml::read_vint(&mut cursor, ebml::MAX_VINT_LENGTH, 0)?;
        let mut sizes = Vec::with_capacity(count);
        sizes.push(first as usize);

        let mut prev = first as i64;
        for _ in 1..count - 1 {
            let (delta, _) = ebml::read_signed_vint(&mut cursor, 0)?;
            prev += delta;
            if prev < 0 {
                return Err(MkvError::InvalidLacing(
                    "negative EBML lace size".to_string(),
                ));
            }
            sizes.push(prev as usize);
        }
        Ok((sizes, cursor.position() as usize))
    }
}

impl<S: MediaStream> ContainerDemuxer for MkvDemuxer<S> {
    fn format_name(&self) -> &str {
        if self.is_webm() {
            "webm"
        } else {
            "matroska"
        }
    }

    fn media_info(&mut self) -> demux_core::Result<MediaInfo> {
        self.ensure_init()?;
        Ok(self.media_info.clone())
    }

    fn peek(&mut self) -> demux_core::Result<PacketInfo> {
        Ok(MkvDemuxer::peek(self)?)
    }

    fn read(&mut self, buf: &mut [u8]) -> demux_core::Result<PacketInfo> {
        Ok(MkvDemuxer::read(self, buf)?)
    }

    fn seek(&mut self, time_us: i64) -> demux_core::Result<()> {
        Ok(MkvDemuxer::seek(self, time_us)?)
    }
}
