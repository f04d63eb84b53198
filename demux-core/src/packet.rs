//! Packet types for demuxed elementary-stream data.
//!
//! Demuxing is two-phase: `peek` fills a [`PacketInfo`] describing the next
//! packet without touching its payload, then `read` copies exactly that many
//! bytes into the caller's buffer. [`Packet`] bundles the two for callers
//! that want owned data.

use crate::params::MediaKind;
use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Flags for packet properties.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PacketFlags: u32 {
        /// This packet contains a keyframe.
        const KEYFRAME = 0x0001;
        /// Packet data is corrupted.
        const CORRUPT = 0x0002;
        /// Packet contains a disposable frame (can be dropped).
        const DISCARDABLE = 0x0004;
        /// This is the final packet of the stream.
        const EOS = 0x0008;
    }
}

/// Metadata of a demuxed packet, established by `peek`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacketInfo {
    /// Kind of elementary stream this packet belongs to.
    pub kind: MediaKind,
    /// Stream index into [`crate::params::MediaInfo::streams`].
    pub stream_index: u32,
    /// Payload size in bytes.
    pub size: usize,
    /// Presentation timestamp in microseconds.
    pub pts_us: i64,
    /// Duration in microseconds, 0 if unknown.
    pub duration_us: i64,
    /// Packet flags.
    pub flags: PacketFlags,
}

impl PacketInfo {
    /// Check if this is a keyframe packet.
    pub fn is_keyframe(&self) -> bool {
        self.flags.contains(PacketFlags::KEYFRAME)
    }

    /// Check if this is the final packet of the stream.
    pub fn is_eos(&self) -> bool {
        self.flags.contains(PacketFlags::EOS)
    }
}

impl Default for PacketInfo {
    fn default() -> Self {
        Self {
            kind: MediaKind::Unknown,
            stream_index: 0,
            size: 0,
            pts_us: 0,
            duration_us: 0,
            flags: PacketFlags::empty(),
        }
    }
}

/// An owned demuxed packet: metadata plus payload.
#[derive(Clone, Default)]
pub struct Packet {
    /// Packet metadata.
    pub info: PacketInfo,
    /// Payload bytes.
    pub data: Vec<u8>,
}

impl Packet {
    /// Create a packet from metadata and payload.
    pub fn new(info: PacketInfo, data: Vec<u8>) -> Self {
        Self { info, data }
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Check if this packet has no payload.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("kind", &self.info.kind)
            .field("stream_index", &self.info.stream_index)
            .field("size", &self.size())
            .field("pts_us", &self.info.pts_us)
            .field("flags", &self.info.flags)
            .finish()
    }
}
