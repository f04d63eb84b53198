//! # demux-core
//!
//! Core types for the demux container library.
//!
//! This crate holds everything the per-format demuxers share:
//!
//! - **Errors** - the [`DemuxError`] taxonomy formats convert into at the
//!   trait boundary
//! - **Streams** - the [`MediaStream`] byte-source abstraction
//! - **Packets** - [`PacketInfo`]/[`Packet`] and the two-phase peek/read
//!   protocol
//! - **Parameters** - [`CodecParameters`]/[`MediaInfo`], the decoder-facing
//!   description of each elementary stream
//! - **The demuxer trait** - [`ContainerDemuxer`], the capability set a
//!   playback pipeline consumes
//!
//! Format crates (e.g. `demux-mkv`) implement [`ContainerDemuxer`] on top
//! of these types.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod demuxer;
pub mod error;
pub mod io;
pub mod packet;
pub mod params;

pub use demuxer::ContainerDemuxer;
pub use error::{DemuxError, Result};
pub use io::MediaStream;
pub use packet::{Packet, PacketFlags, PacketInfo};
pub use params::{CodecId, CodecParameters, MediaInfo, MediaKind};
