//! End-to-end demuxing scenarios over handcrafted Matroska files.

mod common;

use common::*;
use demux_core::{CodecId, ContainerDemuxer, MediaKind, Packet, PacketFlags};
use demux_mkv::{MkvDemuxer, MkvError};
use std::io::Cursor;

fn open(data: Vec<u8>) -> MkvDemuxer<Cursor<Vec<u8>>> {
    let mut demuxer = MkvDemuxer::new(Cursor::new(data));
    demuxer.init().expect("init");
    demuxer
}

fn drain(demuxer: &mut MkvDemuxer<Cursor<Vec<u8>>>) -> Vec<Packet> {
    let mut packets = Vec::new();
    while let Some(packet) = demuxer.read_packet().expect("read_packet") {
        let eos = packet.info.is_eos();
        packets.push(packet);
        if eos {
            break;
        }
    }
    packets
}

#[test]
fn two_track_media_info() {
    let demuxer = open(two_track_file(true, 0));
    let info = demuxer.media_info();

    assert!(info.has_video);
    assert!(info.has_audio);
    assert_eq!(info.duration_us, 10_000_000);
    assert!(info.seekable);
    assert_eq!(info.streams.len(), 2);

    let video = &info.streams[0];
    assert_eq!(video.kind, MediaKind::Video);
    assert_eq!(video.codec, CodecId::H264);
    assert_eq!(video.width, 1920);
    assert_eq!(video.height, 1080);

    let audio = &info.streams[1];
    assert_eq!(audio.kind, MediaKind::Audio);
    assert_eq!(audio.codec, CodecId::Aac);
    assert_eq!(audio.sample_rate, 44100);
    assert_eq!(audio.channels, 2);

    assert_eq!(demuxer.format_name(), "matroska");
}

#[test]
fn media_info_is_idempotent() {
    let demuxer = open(two_track_file(true, 0));
    let first = demuxer.media_info().clone();
    let second = demuxer.media_info().clone();
    assert_eq!(first, second);

    // Still identical after packets start flowing from a fresh instance's
    // point of view: the snapshot never changes between calls.
    let third = demuxer.media_info().clone();
    assert_eq!(first, third);
}

#[test]
fn sequential_playback_pts_and_eos() {
    let mut demuxer = open(two_track_file(true, 0));
    let packets = drain(&mut demuxer);
    assert_eq!(packets.len(), 6);

    // Per-track pts never decreases.
    for stream in 0..2u32 {
        let mut last = i64::MIN;
        for packet in packets.iter().filter(|p| p.info.stream_index == stream) {
            assert!(packet.info.pts_us >= last);
            last = packet.info.pts_us;
        }
    }

    // The expected timeline: 1 ms timecode units.
    let video_pts: Vec<i64> = packets
        .iter()
        .filter(|p| p.info.stream_index == 0)
        .map(|p| p.info.pts_us)
        .collect();
    assert_eq!(video_pts, vec![0, 40_000, 5_000_000]);

    let audio_pts: Vec<i64> = packets
        .iter()
        .filter(|p| p.info.stream_index == 1)
        .map(|p| p.info.pts_us)
        .collect();
    assert_eq!(audio_pts, vec![0, 21_000, 5_000_000]);

    // Only the final packet carries EOS.
    assert!(packets.last().unwrap().info.is_eos());
    assert!(packets[..packets.len() - 1]
        .iter()
        .all(|p| !p.info.is_eos()));

    // After EOS the demuxer reports end of stream.
    assert!(demuxer.read_packet().unwrap().is_none());
}

#[test]
fn keyframe_flags_from_simple_blocks() {
    let mut demuxer = open(two_track_file(true, 0));
    let packets = drain(&mut demuxer);

    let video: Vec<&Packet> = packets.iter().filter(|p| p.info.stream_index == 0).collect();
    assert!(video[0].info.is_keyframe());
    assert!(!video[1].info.is_keyframe());
    assert!(video[2].info.is_keyframe());
}

#[test]
fn aac_extradata_synthesized_without_codec_private() {
    // CodecID "A_AAC/MPEG4/LC", 44100 Hz, 2 channels, no CodecPrivate:
    // profile LC (2), sample-rate index 4.
    let demuxer = open(two_track_file(false, 0));
    let info = demuxer.media_info();
    let extradata = info.streams[1].extradata.as_ref().expect("synthesized");
    assert_eq!(extradata.len(), 2);
    assert_eq!(extradata[0], 0x12);
    assert_eq!(extradata[1], 0x10);
}

#[test]
fn video_extradata_copied_from_codec_private() {
    let demuxer = open(two_track_file(false, 0));
    let info = demuxer.media_info();
    let extradata = info.streams[0].extradata.as_ref().expect("copied");
    assert_eq!(&extradata[..4], &[0x01, 0x64, 0x00, 0x28]);
    assert!(extradata[4..].iter().all(|&b| b == 0));
}

#[test]
fn seek_without_cues_reports_not_found_and_streaming_continues() {
    let mut demuxer = open(two_track_file(false, 0));

    // Consume one packet so the stream is mid-flight.
    let first = demuxer.read_packet().unwrap().expect("first packet");
    assert_eq!(first.info.pts_us, 0);

    match demuxer.seek(3_000_000) {
        Err(MkvError::NoIndex) => {}
        other => panic!("expected NoIndex, got {other:?}"),
    }

    // The failed seek must not have moved the stream.
    let rest = drain(&mut demuxer);
    assert_eq!(rest.len(), 5);
    assert_eq!(rest[0].info.pts_us, 0); // the second block of cluster 0
}

#[test]
fn seek_selects_nearest_cue() {
    let mut demuxer = open(two_track_file(true, 0));

    // 5.0 s is exactly the second cue.
    demuxer.seek(5_000_000).expect("seek");
    let packet = demuxer.read_packet().unwrap().expect("packet after seek");
    assert_eq!(packet.info.pts_us, 5_000_000);
    assert!(packet.info.is_keyframe());

    // 2.4 s is closer to cue 0 than to cue 5000.
    demuxer.seek(2_400_000).expect("seek");
    let packet = demuxer.read_packet().unwrap().expect("packet after seek");
    assert_eq!(packet.info.pts_us, 0);
}

#[test]
fn seek_tie_resolves_to_first_entry() {
    let mut demuxer = open(two_track_file(true, 0));

    // 2.5 s is equidistant from cues at 0 and 5000 ms; selection only
    // updates on a strictly smaller difference, so the first entry wins.
    demuxer.seek(2_500_000).expect("seek");
    let packet = demuxer.read_packet().unwrap().expect("packet after seek");
    assert_eq!(packet.info.pts_us, 0);
}

#[test]
fn seek_discards_packets_in_flight() {
    let mut demuxer = open(two_track_file(true, 0));

    // Peek establishes a pending packet; the seek must discard it.
    let peeked = demuxer.peek().expect("peek");
    assert_eq!(peeked.pts_us, 0);
    demuxer.seek(5_000_000).expect("seek");
    let packet = demuxer.read_packet().unwrap().expect("packet");
    assert_eq!(packet.info.pts_us, 5_000_000);
}

#[test]
fn resync_recovers_packets_after_garbage() {
    let clean: Vec<Packet> = {
        let mut demuxer = open(two_track_file(false, 0));
        drain(&mut demuxer)
    };
    let dirty: Vec<Packet> = {
        let mut demuxer = open(two_track_file(false, 16));
        drain(&mut demuxer)
    };

    assert_eq!(clean.len(), dirty.len());
    for (a, b) in clean.iter().zip(dirty.iter()) {
        assert_eq!(a.info.pts_us, b.info.pts_us);
        assert_eq!(a.info.stream_index, b.info.stream_index);
        assert_eq!(a.data, b.data);
    }
}

#[test]
fn block_group_reference_marks_non_keyframe() {
    let tracks = element(
        demux_mkv::elements::TRACKS,
        &video_track(1, "V_MPEG4/ISO/AVC", 640, 480, None),
    );
    let cluster = element(
        demux_mkv::elements::CLUSTER,
        &[
            uint_element(demux_mkv::elements::TIMECODE, 0),
            block_group(1, 0, None, &[1, 2, 3]),
            block_group(1, 40, Some(-40), &[4, 5, 6]),
        ]
        .concat(),
    );
    let mut children = tracks;
    children.extend(cluster);
    let mut file = ebml_header("matroska");
    file.extend(segment_unknown(&children));

    let mut demuxer = open(file);
    let packets = drain(&mut demuxer);
    assert_eq!(packets.len(), 2);
    assert!(packets[0].info.is_keyframe());
    assert!(!packets[1].info.is_keyframe());
}

#[test]
fn peek_read_two_phase_sizes_match() {
    let mut demuxer = open(two_track_file(true, 0));

    let meta = demuxer.peek().expect("peek");
    assert_eq!(meta.size, 64);

    // Undersized buffer is rejected and the packet stays pending.
    let mut small = vec![0u8; 8];
    match demuxer.read(&mut small) {
        Err(MkvError::BufferTooSmall { needed: 64, available: 8 }) => {}
        other => panic!("expected BufferTooSmall, got {other:?}"),
    }

    let mut buf = vec![0u8; meta.size];
    let info = demuxer.read(&mut buf).expect("read");
    assert_eq!(info.size, 64);
    assert_eq!(buf, vec![0xAA; 64]);
}

#[test]
fn init_rejects_non_mkv_input() {
    let mut demuxer = MkvDemuxer::new(Cursor::new(b"RIFF\x00\x00\x00\x00AVI LIST".to_vec()));
    assert!(demuxer.init().is_err());
}

#[test]
fn init_rejects_unknown_doctype() {
    let mut file = ebml_header("quicktime");
    file.extend(segment_unknown(&[]));
    let mut demuxer = MkvDemuxer::new(Cursor::new(file));
    match demuxer.init() {
        Err(MkvError::InvalidHeader(msg)) => assert!(msg.contains("doctype")),
        other => panic!("expected InvalidHeader, got {other:?}"),
    }
}

#[test]
fn webm_doctype_reported() {
    let tracks = element(
        demux_mkv::elements::TRACKS,
        &video_track(1, "V_VP9", 640, 480, None),
    );
    let mut file = ebml_header("webm");
    file.extend(segment_unknown(&tracks));

    let mut demuxer = open(file);
    assert!(demuxer.is_webm());
    assert_eq!(demuxer.format_name(), "webm");
    assert!(demuxer.media_info().has_video);
}

#[test]
fn disabled_track_packets_are_skipped() {
    let mut demuxer = open(two_track_file(true, 0));
    demuxer.set_track_enabled(1, false); // drop audio

    let packets = drain(&mut demuxer);
    assert_eq!(packets.len(), 3);
    assert!(packets.iter().all(|p| p.info.stream_index == 0));
}

#[test]
fn eos_flag_set_on_peek_of_final_packet() {
    let mut demuxer = open(two_track_file(true, 0));
    let mut seen_eos = false;
    let mut count = 0usize;
    loop {
        let meta = match demuxer.peek() {
            Ok(meta) => meta,
            Err(MkvError::EndOfStream) => break,
            Err(e) => panic!("peek: {e}"),
        };
        let mut buf = vec![0u8; meta.size];
        demuxer.read(&mut buf).expect("read");
        count += 1;
        if meta.flags.contains(PacketFlags::EOS) {
            seen_eos = true;
            break;
        }
    }
    assert!(seen_eos);
    assert_eq!(count, 6);
}
