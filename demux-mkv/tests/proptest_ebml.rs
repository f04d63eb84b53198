//! Property-based tests for EBML primitives and lacing reassembly.
//!
//! Uses proptest to verify round-trip correctness of the variable-length
//! integer decoders and the exact-sum property of the three lacing modes,
//! driving the laced cases through the whole demuxer.

mod common;

use common::*;
use demux_mkv::ebml;
use demux_mkv::elements::{CLUSTER, TIMECODE, TRACKS};
use demux_mkv::MkvDemuxer;
use proptest::prelude::*;
use std::io::Cursor;

/// Encode a VINT at an explicit width (marker bit included).
fn encode_vint_fixed(value: u64, width: usize) -> Vec<u8> {
    let mut out = vec![0u8; width];
    let mut v = value;
    for slot in out.iter_mut().rev() {
        *slot = (v & 0xFF) as u8;
        v >>= 8;
    }
    out[0] |= 0x80 >> (width - 1);
    out
}

/// A 2-byte VINT (14 data bits).
fn vint14(value: u64) -> [u8; 2] {
    [0x40 | (value >> 8) as u8, (value & 0xFF) as u8]
}

/// Xiph size table: 255-chains for each size.
fn xiph_table(sizes: &[usize]) -> Vec<u8> {
    let mut out = Vec::new();
    for &size in sizes {
        let mut rem = size;
        while rem >= 255 {
            out.push(255);
            rem -= 255;
        }
        out.push(rem as u8);
    }
    out
}

/// EBML size table: first size as a vint, then signed deltas.
fn ebml_table(sizes: &[usize]) -> Vec<u8> {
    let Some((&first, rest)) = sizes.split_first() else {
        return Vec::new();
    };
    let mut out = vint14(first as u64).to_vec();
    let mut prev = first as i64;
    for &size in rest {
        let delta = size as i64 - prev;
        out.extend(vint14((delta + 8191) as u64));
        prev = size as i64;
    }
    out
}

/// A one-track Opus file whose single cluster holds one laced SimpleBlock.
fn lace_file(lacing_type: u8, body: &[u8]) -> Vec<u8> {
    let tracks = element(TRACKS, &audio_track(1, "A_OPUS", 48000.0, 2, None));
    let cluster = element(
        CLUSTER,
        &[
            uint_element(TIMECODE, 0),
            laced_simple_block(1, 0, true, lacing_type, body),
        ]
        .concat(),
    );
    let mut children = tracks;
    children.extend(cluster);
    let mut file = ebml_header("matroska");
    file.extend(segment_unknown(&children));
    file
}

fn demux_frames(file: Vec<u8>) -> Vec<Vec<u8>> {
    let mut demuxer = MkvDemuxer::new(Cursor::new(file));
    demuxer.init().expect("init");
    let mut frames = Vec::new();
    while let Some(packet) = demuxer.read_packet().expect("read_packet") {
        let eos = packet.info.is_eos();
        frames.push(packet.data);
        if eos {
            break;
        }
    }
    frames
}

proptest! {
    /// decode(encode(v)) == v for every legal width, and the returned
    /// octet count matches the width derived from the leading bits.
    #[test]
    fn roundtrip_vint_all_widths(width in 1usize..=8, seed in any::<u64>()) {
        let value = seed & ((1u64 << (7 * width)) - 1);
        let encoded = encode_vint_fixed(value, width);

        let mut cursor = Cursor::new(encoded);
        let (decoded, octets) = ebml::read_vint(&mut cursor, 8, 0).unwrap();
        prop_assert_eq!(decoded, value);
        prop_assert_eq!(octets, width);
    }

    /// The all-ones pattern at every width is the unknown-length sentinel.
    #[test]
    fn unknown_length_sentinel_all_widths(width in 1usize..=8) {
        let all_ones = (1u64 << (7 * width)) - 1;
        let encoded = encode_vint_fixed(all_ones, width);

        let mut cursor = Cursor::new(encoded);
        let (length, octets) = ebml::read_length(&mut cursor, 8, 0).unwrap();
        prop_assert_eq!(length, None);
        prop_assert_eq!(octets, width);
    }

    /// Signed VINTs round-trip through the bias for widths 1-4.
    #[test]
    fn roundtrip_signed_vint(width in 1usize..=4, seed in any::<i64>()) {
        let bias = (1i64 << (7 * width - 1)) - 1;
        let value = seed.rem_euclid(2 * bias + 1) - bias;
        let encoded = encode_vint_fixed((value + bias) as u64, width);

        let mut cursor = Cursor::new(encoded);
        let (decoded, octets) = ebml::read_signed_vint(&mut cursor, 0).unwrap();
        prop_assert_eq!(decoded, value);
        prop_assert_eq!(octets, width);
    }

    /// Xiph lacing: the emitted frame sizes sum exactly to the payload.
    #[test]
    fn xiph_lacing_exact_sum(sizes in prop::collection::vec(0usize..600, 1..8)) {
        let frames: Vec<Vec<u8>> = sizes
            .iter()
            .enumerate()
            .map(|(i, &s)| vec![i as u8 + 1; s])
            .collect();

        let mut body = vec![(sizes.len() - 1) as u8];
        body.extend(xiph_table(&sizes[..sizes.len() - 1]));
        for frame in &frames {
            body.extend_from_slice(frame);
        }

        let out = demux_frames(lace_file(1, &body));
        prop_assert_eq!(&out, &frames);
        let total: usize = out.iter().map(|f| f.len()).sum();
        prop_assert_eq!(total, sizes.iter().sum::<usize>());
    }

    /// Fixed lacing: every frame gets total/count bytes.
    #[test]
    fn fixed_lacing_exact_sum(count in 1usize..16, size in 0usize..200) {
        let frames: Vec<Vec<u8>> = (0..count).map(|i| vec![i as u8; size]).collect();

        let mut body = vec![(count - 1) as u8];
        for frame in &frames {
            body.extend_from_slice(frame);
        }

        let out = demux_frames(lace_file(2, &body));
        prop_assert_eq!(&out, &frames);
    }

    /// EBML lacing: delta-coded sizes reassemble exactly.
    #[test]
    fn ebml_lacing_exact_sum(sizes in prop::collection::vec(0usize..3000, 1..8)) {
        let frames: Vec<Vec<u8>> = sizes
            .iter()
            .enumerate()
            .map(|(i, &s)| vec![0xF0 | i as u8; s])
            .collect();

        let mut body = vec![(sizes.len() - 1) as u8];
        body.extend(ebml_table(&sizes[..sizes.len() - 1]));
        for frame in &frames {
            body.extend_from_slice(frame);
        }

        let out = demux_frames(lace_file(3, &body));
        prop_assert_eq!(&out, &frames);
        let total: usize = out.iter().map(|f| f.len()).sum();
        prop_assert_eq!(total, sizes.iter().sum::<usize>());
    }
}
