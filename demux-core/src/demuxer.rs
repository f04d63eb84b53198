//! The container-demuxer capability trait.

use crate::error::Result;
use crate::packet::PacketInfo;
use crate::params::MediaInfo;

/// Capability set every container demuxer exposes to the playback pipeline.
///
/// The lifecycle is strictly serialized on one instance:
/// open → `media_info` → {`peek` → `read`}* → `seek` → {`peek` → `read`}* →
/// drop. `read` consumes the packet whose size and metadata the immediately
/// preceding `peek` established; `seek` discards any packet state in flight.
pub trait ContainerDemuxer {
    /// Short format name ("matroska", "webm", ...).
    fn format_name(&self) -> &str;

    /// Description of the opened container and its streams.
    ///
    /// Idempotent: repeated calls without an intervening seek or read
    /// return identical results.
    fn media_info(&mut self) -> Result<MediaInfo>;

    /// Determine the next packet's metadata without consuming its payload.
    fn peek(&mut self) -> Result<PacketInfo>;

    /// Copy the peeked packet's payload into `buf` and consume it.
    ///
    /// `buf` must hold at least the size the preceding `peek` reported.
    fn read(&mut self, buf: &mut [u8]) -> Result<PacketInfo>;

    /// Reposition to the nearest indexed point to `time_us`.
    fn seek(&mut self, time_us: i64) -> Result<()>;
}
