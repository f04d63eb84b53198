//! The generic schema-driven EBML parser.
//!
//! One engine walks every master element: it reads an ID, looks it up in
//! the current level's descriptor table, validates the length for the
//! entry's kind, and either assigns the value to the target's slot or
//! recurses into the child table. Master elements of unknown length are
//! closed when an ID belonging to an ancestor's table appears.
//!
//! The engine never aborts the session on structural damage; errors
//! propagate to the demuxer, which re-enters via [`ParserCtx::resync`].

use crate::ebml::{self, MAX_BINARY_LENGTH, MAX_DEPTH};
use crate::elements::{self, find, EbmlDescriptor, EbmlKind};
use crate::error::{MkvError, Result};
use crate::records::EbmlTarget;
use demux_core::MediaStream;
use std::collections::HashSet;
use std::io::{Read, SeekFrom};
use tracing::{debug, trace};

/// Byte range of an open master element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLevel {
    /// Payload start offset.
    pub start: u64,
    /// Payload length; `None` for unknown-length masters.
    pub length: Option<u64>,
}

impl ParseLevel {
    /// Exclusive payload end, if the length is known.
    pub fn end(&self) -> Option<u64> {
        self.length.map(|l| self.start + l)
    }
}

/// An element ID that was read but not yet dispatched.
#[derive(Debug, Clone, Copy)]
struct PendingId {
    id: u32,
    start: u64,
}

/// Outcome of [`ParserCtx::parse_next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// One child element was consumed.
    Element(u32),
    /// The current level ended and was popped.
    LevelEnd,
    /// A Stop entry was hit; the ID is left pending for the next phase.
    Stopped(u32),
    /// Clean end of the stream at an element boundary.
    Eof,
}

/// Saved parser position, used to restore after an out-of-line parse
/// (e.g. jumping to the Cues during a seek).
pub struct SavedParse {
    levels: Vec<ParseLevel>,
    schemas: Vec<&'static [EbmlDescriptor]>,
    pending: Option<PendingId>,
    position: u64,
}

/// Parser state: the stream, the level stack, and the resync bookkeeping.
pub struct ParserCtx<S> {
    stream: S,
    levels: Vec<ParseLevel>,
    schemas: Vec<&'static [EbmlDescriptor]>,
    pending: Option<PendingId>,
    /// Last known-good element boundary, where resync starts scanning.
    pub resync_pos: u64,
    seen_level1: HashSet<(u32, u64)>,
    max_size_octets: usize,
}

impl<S: MediaStream> ParserCtx<S> {
    /// Create a parser over `stream`.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            levels: Vec::new(),
            schemas: Vec::new(),
            pending: None,
            resync_pos: 0,
            seen_level1: HashSet::new(),
            max_size_octets: ebml::MAX_VINT_LENGTH,
        }
    }

    /// Direct access to the underlying stream.
    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Recover the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Current stream position.
    pub fn pos(&mut self) -> Result<u64> {
        Ok(self.stream.tell()?)
    }

    /// Apply the size-length limit declared by the EBML header.
    pub fn set_max_size_octets(&mut self, octets: usize) {
        self.max_size_octets = octets.min(ebml::MAX_VINT_LENGTH);
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// The innermost open level.
    pub fn current_level(&self) -> Option<ParseLevel> {
        self.levels.last().copied()
    }

    /// Open a master level with the table its children are parsed against.
    pub fn push_level(&mut self, level: ParseLevel, schema: &'static [EbmlDescriptor]) -> Result<()> {
        if self.levels.len() >= MAX_DEPTH {
            return Err(MkvError::DepthExceeded { depth: self.levels.len() });
        }
        self.levels.push(level);
        self.schemas.push(schema);
        Ok(())
    }

    fn pop_level(&mut self) {
        self.levels.pop();
        self.schemas.pop();
    }

    /// Drop every open level. The pending ID, if any, is kept.
    pub fn clear_levels(&mut self) {
        self.levels.clear();
        self.schemas.clear();
    }

    /// Drop the pending ID.
    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    /// Replace the innermost level's table (the Segment switches from the
    /// header-scan table to the streaming table).
    pub fn set_top_schema(&mut self, schema: &'static [EbmlDescriptor]) {
        if let Some(top) = self.schemas.last_mut() {
            *top = schema;
        }
    }

    /// The ID waiting to be dispatched, if any.
    pub fn pending_id(&self) -> Option<u32> {
        self.pending.map(|p| p.id)
    }

    /// Plant an ID as if it had just been read at `start`.
    pub fn set_pending(&mut self, id: u32, start: u64) {
        self.pending = Some(PendingId { id, start });
    }

    /// Snapshot the parse position for an out-of-line parse.
    pub fn save(&mut self) -> Result<SavedParse> {
        Ok(SavedParse {
            levels: self.levels.clone(),
            schemas: self.schemas.clone(),
            pending: self.pending,
            position: self.pos()?,
        })
    }

    /// Restore a snapshot taken with [`ParserCtx::save`].
    pub fn restore(&mut self, saved: SavedParse) -> Result<()> {
        self.stream.seek(SeekFrom::Start(saved.position))?;
        self.levels = saved.levels;
        self.schemas = saved.schemas;
        self.pending = saved.pending;
        Ok(())
    }

    /// Read the next element ID, or take the pending one.
    ///
    /// Returns the ID and the offset of its first octet; `None` on a clean
    /// end of stream at an element boundary.
    pub fn read_id(&mut self) -> Result<Option<(u32, u64)>> {
        if let Some(p) = self.pending.take() {
            return Ok(Some((p.id, p.start)));
        }
        let start = self.pos()?;
        let mut first = [0u8; 1];
        loop {
            match self.stream.read(&mut first) {
                Ok(0) => return Ok(None),
                Ok(_) => break,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(MkvError::Io(e)),
            }
        }
        let (id, _) = ebml::element_id_tail(first[0], &mut self.stream, start)?;
        Ok(Some((id, start)))
    }

    /// Read an element length after its ID.
    pub fn read_element_length(&mut self) -> Result<Option<u64>> {
        let pos = self.pos()?;
        let (length, _) = ebml::read_length(&mut self.stream, self.max_size_octets, pos)?;
        Ok(length)
    }

    fn skip_payload(&mut self, length: u64) -> Result<()> {
        self.stream.seek(SeekFrom::Current(length as i64))?;
        Ok(())
    }

    /// Parse one child of the innermost level against `schema`.
    ///
    /// `schema` must be the table of the innermost open level (or the
    /// top-level table when no level is open).
    pub fn parse_next(
        &mut self,
        schema: &'static [EbmlDescriptor],
        target: &mut dyn EbmlTarget,
    ) -> Result<Step> {
        // A finite level ends exactly where its declared length says.
        let boundary = match self.pending {
            Some(p) => Some(p.start),
            None => None,
        };
        if let Some(level) = self.levels.last().copied() {
            if let Some(end) = level.end() {
                let at = match boundary {
                    Some(b) => b,
                    None => self.pos()?,
                };
                if at >= end {
                    if at > end {
                        return Err(MkvError::BoundOverrun { id: 0, offset: at });
                    }
                    self.pop_level();
                    return Ok(Step::LevelEnd);
                }
            }
        }

        let (id, id_start) = match self.read_id()? {
            Some(v) => v,
            None => {
                if self.levels.last().is_some_and(|l| l.length.is_some()) {
                    return Err(MkvError::Truncated);
                }
                return Ok(Step::Eof);
            }
        };

        if let Some(desc) = find(schema, id) {
            if desc.kind == EbmlKind::Stop {
                self.pending = Some(PendingId { id, start: id_start });
                return Ok(Step::Stopped(id));
            }
            self.dispatch(desc, id_start, target)?;
            return Ok(Step::Element(id));
        }

        // Void and CRC-32 are skippable in any context.
        if id == elements::VOID || id == elements::CRC32 {
            match self.read_element_length()? {
                Some(len) => self.skip_payload(len)?,
                None => return Err(MkvError::UnknownLengthNotAllowed { id }),
            }
            self.resync_pos = self.pos()?;
            return Ok(Step::Element(id));
        }

        // A foreign ID belonging to an ancestor closes the current level.
        if self.ancestor_accepts(id) {
            self.pending = Some(PendingId { id, start: id_start });
            self.pop_level();
            return Ok(Step::LevelEnd);
        }

        // Unrecognized but well-formed elements are skipped.
        match self.read_element_length()? {
            Some(len) => {
                if let Some(end) = self.levels.last().and_then(|l| l.end()) {
                    let payload_start = self.pos()?;
                    if payload_start + len > end {
                        return Err(MkvError::BoundOverrun { id, offset: id_start });
                    }
                } else if len > MAX_BINARY_LENGTH {
                    return Err(MkvError::OversizeElement {
                        id,
                        length: len,
                        max: MAX_BINARY_LENGTH,
                    });
                }
                trace!(id = format_args!("0x{id:X}"), length = len, "skipping unknown element");
                self.skip_payload(len)?;
                self.resync_pos = self.pos()?;
                Ok(Step::Element(id))
            }
            None => Err(MkvError::UnknownLengthNotAllowed { id }),
        }
    }

    /// Parse children of the innermost level until it ends.
    pub fn parse_nest(
        &mut self,
        schema: &'static [EbmlDescriptor],
        target: &mut dyn EbmlTarget,
    ) -> Result<()> {
        loop {
            match self.parse_next(schema, target)? {
                Step::Element(_) => {}
                Step::LevelEnd | Step::Eof | Step::Stopped(_) => return Ok(()),
            }
        }
    }

    fn dispatch(
        &mut self,
        desc: &'static EbmlDescriptor,
        id_start: u64,
        target: &mut dyn EbmlTarget,
    ) -> Result<()> {
        let id = desc.id;
        let length = self.read_element_length()?;
        let payload_start = self.pos()?;

        if let Some(len) = length {
            if let Some(max) = desc.kind.max_length() {
                if len > max {
                    return Err(MkvError::OversizeElement { id, length: len, max });
                }
            }
            if let Some(end) = self.levels.last().and_then(|l| l.end()) {
                if payload_start + len > end {
                    return Err(MkvError::BoundOverrun { id, offset: id_start });
                }
            }
        } else if !desc.allows_unknown_length() {
            return Err(MkvError::UnknownLengthNotAllowed { id });
        }

        match desc.kind {
            EbmlKind::None => self.skip_payload(length.unwrap_or(0))?,
            EbmlKind::UInt => {
                let value = ebml::read_uint(&mut self.stream, length.unwrap_or(0))?;
                target.set_uint(desc.slot, value);
            }
            EbmlKind::SInt => {
                let value = ebml::read_sint(&mut self.stream, length.unwrap_or(0))?;
                target.set_sint(desc.slot, value);
            }
            EbmlKind::Float => {
                let value = ebml::read_float(&mut self.stream, length.unwrap_or(0), payload_start)?;
                target.set_float(desc.slot, value);
            }
            EbmlKind::Str | EbmlKind::Utf8 => {
                let value = ebml::read_string(&mut self.stream, length.unwrap_or(0))?;
                target.set_string(desc.slot, value);
            }
            EbmlKind::Binary => {
                let value = ebml::read_binary(&mut self.stream, length.unwrap_or(0))?;
                target.set_binary(desc.slot, value);
            }
            EbmlKind::Nest | EbmlKind::Level1 => {
                self.enter_master(desc, id_start, payload_start, length, target)?;
            }
            EbmlKind::Stream => {
                let schema = desc.children.unwrap_or(&[]);
                self.push_level(
                    ParseLevel {
                        start: payload_start,
                        length,
                    },
                    schema,
                )?;
            }
            EbmlKind::Stop => unreachable!("Stop is handled before dispatch"),
        }

        self.resync_pos = self.pos()?;
        Ok(())
    }

    fn enter_master(
        &mut self,
        desc: &'static EbmlDescriptor,
        id_start: u64,
        payload_start: u64,
        length: Option<u64>,
        target: &mut dyn EbmlTarget,
    ) -> Result<()> {
        if desc.kind == EbmlKind::Level1 && !self.seen_level1.insert((desc.id, id_start)) {
            debug!(
                id = format_args!("0x{:X}", desc.id),
                pos = id_start,
                "level-1 element already parsed"
            );
            // Level1 entries always declare their length; unknown was
            // rejected in dispatch.
            return self.skip_payload(length.unwrap_or(0));
        }

        let schema = desc.children.unwrap_or(&[]);
        let child = match target.child(desc.slot) {
            Some(child) => child,
            None => {
                // No destination: consume the subtree without assigning.
                return self.skip_payload(length.unwrap_or(0));
            }
        };

        let depth_before = self.levels.len();
        self.push_level(
            ParseLevel {
                start: payload_start,
                length,
            },
            schema,
        )?;
        self.parse_nest(schema, child)?;
        // On a clean EOF inside an unknown-length master the level is
        // still open.
        if self.levels.len() > depth_before {
            self.pop_level();
        }
        Ok(())
    }

    fn ancestor_accepts(&self, id: u32) -> bool {
        let n = self.schemas.len();
        if n < 2 {
            return false;
        }
        self.schemas[..n - 1].iter().any(|s| find(s, id).is_some())
    }

    /// Recover a parse position after structural corruption.
    ///
    /// Repositions to `last_good`, then slides a 4-byte big-endian window
    /// one byte at a time until it matches a top-level Segment-child ID.
    /// On a match the ID is planted as pending; the caller resets its level
    /// stack and forces the Segment's length to unknown. Reaching the end
    /// of the stream reports `EndOfStream`.
    pub fn resync(&mut self, last_good: u64) -> Result<(u32, u64)> {
        self.pending = None;
        self.stream.seek(SeekFrom::Start(last_good))?;
        debug!(from = last_good, "resyncing");

        let mut window: u32 = 0;
        let mut have = 0usize;
        let mut byte = [0u8; 1];
        loop {
            match self.stream.read(&mut byte) {
                Ok(0) => return Err(MkvError::EndOfStream),
                Ok(_) => {}
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(MkvError::Io(e)),
            }
            window = (window << 8) | byte[0] as u32;
            have += 1;
            if have >= 4 && elements::TOP_LEVEL_IDS.contains(&window) {
                let id_start = self.pos()? - 4;
                self.set_pending(window, id_start);
                debug!(
                    id = format_args!("0x{window:X}"),
                    pos = id_start,
                    "resync found top-level element"
                );
                return Ok((window, id_start));
            }
        }
    }
}
