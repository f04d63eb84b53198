//! Byte-level Matroska fixture builders shared by the integration tests.
//!
//! Files are assembled by hand so every test controls its wire layout
//! exactly; no external media samples are involved.

#![allow(dead_code)]

use demux_mkv::elements::*;

/// Encode an element length at minimal width (the all-ones pattern is
/// avoided, it would mean "unknown").
pub fn encode_length(value: u64) -> Vec<u8> {
    let mut width = 1usize;
    while width < 8 {
        let all_ones = (1u64 << (7 * width)) - 1;
        if value < all_ones {
            break;
        }
        width += 1;
    }
    let mut out = vec![0u8; width];
    let mut v = value;
    for slot in out.iter_mut().rev() {
        *slot = (v & 0xFF) as u8;
        v >>= 8;
    }
    out[0] |= 0x80 >> (width - 1);
    out
}

/// Raw element ID bytes.
pub fn id_bytes(id: u32) -> Vec<u8> {
    let bytes = id.to_be_bytes();
    let skip = bytes.iter().position(|&b| b != 0).unwrap_or(3);
    bytes[skip..].to_vec()
}

/// A complete element: ID, length, payload.
pub fn element(id: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = id_bytes(id);
    out.extend(encode_length(payload.len() as u64));
    out.extend_from_slice(payload);
    out
}

/// Unsigned integer element at minimal payload width.
pub fn uint_element(id: u32, value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let skip = bytes.iter().position(|&b| b != 0).unwrap_or(7);
    element(id, &bytes[skip..])
}

/// Unsigned integer element at a fixed 8-byte payload width, so fixture
/// sizes stay stable while offsets are being computed.
pub fn uint8_element(id: u32, value: u64) -> Vec<u8> {
    element(id, &value.to_be_bytes())
}

/// 8-byte float element.
pub fn float_element(id: u32, value: f64) -> Vec<u8> {
    element(id, &value.to_bits().to_be_bytes())
}

/// String element.
pub fn string_element(id: u32, value: &str) -> Vec<u8> {
    element(id, value.as_bytes())
}

/// A well-formed EBML header for the given doctype.
pub fn ebml_header(doc_type: &str) -> Vec<u8> {
    let payload = [
        uint_element(EBML_VERSION, 1),
        uint_element(EBML_READ_VERSION, 1),
        uint_element(EBML_MAX_ID_LENGTH, 4),
        uint_element(EBML_MAX_SIZE_LENGTH, 8),
        string_element(DOC_TYPE, doc_type),
        uint_element(DOC_TYPE_VERSION, 4),
        uint_element(DOC_TYPE_READ_VERSION, 2),
    ]
    .concat();
    element(EBML, &payload)
}

/// A Segment with the unknown-length sentinel.
pub fn segment_unknown(children: &[u8]) -> Vec<u8> {
    let mut out = id_bytes(SEGMENT);
    out.push(0xFF);
    out.extend_from_slice(children);
    out
}

/// A SimpleBlock without lacing.
pub fn simple_block(track: u8, relative_tc: i16, keyframe: bool, payload: &[u8]) -> Vec<u8> {
    laced_simple_block(track, relative_tc, keyframe, 0, payload)
}

/// A SimpleBlock with an explicit lacing type; `body` must already contain
/// the lace count/size table for laced types.
pub fn laced_simple_block(
    track: u8,
    relative_tc: i16,
    keyframe: bool,
    lacing_type: u8,
    body: &[u8],
) -> Vec<u8> {
    let mut payload = vec![0x80 | track];
    payload.extend_from_slice(&relative_tc.to_be_bytes());
    let mut flags = lacing_type << 1;
    if keyframe {
        flags |= 0x80;
    }
    payload.push(flags);
    payload.extend_from_slice(body);
    element(SIMPLE_BLOCK, &payload)
}

/// A Block inside a BlockGroup; keyframes are blocks without a
/// ReferenceBlock.
pub fn block_group(track: u8, relative_tc: i16, reference: Option<i64>, payload: &[u8]) -> Vec<u8> {
    let mut block_payload = vec![0x80 | track];
    block_payload.extend_from_slice(&relative_tc.to_be_bytes());
    block_payload.push(0);
    block_payload.extend_from_slice(payload);

    let mut group = element(BLOCK, &block_payload);
    if let Some(r) = reference {
        group.extend(element(REFERENCE_BLOCK, &(r as i8).to_be_bytes()));
    }
    element(BLOCK_GROUP, &group)
}

/// A video TrackEntry.
pub fn video_track(
    number: u64,
    codec_id: &str,
    width: u64,
    height: u64,
    codec_private: Option<&[u8]>,
) -> Vec<u8> {
    let video = [
        uint_element(PIXEL_WIDTH, width),
        uint_element(PIXEL_HEIGHT, height),
    ]
    .concat();
    let mut payload = [
        uint_element(TRACK_NUMBER, number),
        uint_element(TRACK_UID, number),
        uint_element(TRACK_TYPE, 1),
        string_element(CODEC_ID, codec_id),
        element(VIDEO, &video),
    ]
    .concat();
    if let Some(private) = codec_private {
        payload.extend(element(CODEC_PRIVATE, private));
    }
    element(TRACK_ENTRY, &payload)
}

/// An audio TrackEntry.
pub fn audio_track(
    number: u64,
    codec_id: &str,
    sample_rate: f64,
    channels: u64,
    codec_private: Option<&[u8]>,
) -> Vec<u8> {
    let audio = [
        float_element(SAMPLING_FREQUENCY, sample_rate),
        uint_element(CHANNELS, channels),
    ]
    .concat();
    let mut payload = [
        uint_element(TRACK_NUMBER, number),
        uint_element(TRACK_UID, number),
        uint_element(TRACK_TYPE, 2),
        string_element(CODEC_ID, codec_id),
        element(AUDIO, &audio),
    ]
    .concat();
    if let Some(private) = codec_private {
        payload.extend(element(CODEC_PRIVATE, private));
    }
    element(TRACK_ENTRY, &payload)
}

/// A Cues element from (time, segment-relative cluster position) pairs.
/// Times and positions use fixed 8-byte payloads so the element's size
/// does not depend on the values, letting callers compute offsets in two
/// passes.
pub fn cues(entries: &[(u64, u64)]) -> Vec<u8> {
    let mut payload = Vec::new();
    for &(time, position) in entries {
        let positions = [
            uint8_element(CUE_TRACK, 1),
            uint8_element(CUE_CLUSTER_POSITION, position),
        ]
        .concat();
        let point = [
            uint8_element(CUE_TIME, time),
            element(CUE_TRACK_POSITIONS, &positions),
        ]
        .concat();
        payload.extend(element(CUE_POINT, &point));
    }
    element(CUES, &payload)
}

/// Standard two-track (H.264 + AAC) 10-second fixture.
///
/// Two clusters at timecodes 0 and 5000 (1 ms units). `with_cues` adds a
/// correct Cues element before the clusters; `garbage` bytes of zeros are
/// injected between the two clusters.
pub fn two_track_file(with_cues: bool, garbage: usize) -> Vec<u8> {
    let info = element(
        INFO,
        &[
            uint_element(TIMECODE_SCALE, 1_000_000),
            float_element(DURATION, 10_000.0),
        ]
        .concat(),
    );
    let tracks_payload = [
        video_track(1, "V_MPEG4/ISO/AVC", 1920, 1080, Some(&[0x01, 0x64, 0x00, 0x28])),
        audio_track(2, "A_AAC/MPEG4/LC", 44100.0, 2, None),
    ]
    .concat();
    let tracks = element(TRACKS, &tracks_payload);

    let cluster0 = element(
        CLUSTER,
        &[
            uint_element(TIMECODE, 0),
            simple_block(1, 0, true, &[0xAA; 64]),
            simple_block(2, 0, true, &[0xB0; 32]),
            simple_block(1, 40, false, &[0xAC; 48]),
            simple_block(2, 21, true, &[0xB1; 32]),
        ]
        .concat(),
    );
    let cluster1 = element(
        CLUSTER,
        &[
            uint_element(TIMECODE, 5000),
            simple_block(1, 0, true, &[0xAD; 64]),
            simple_block(2, 0, true, &[0xB2; 32]),
        ]
        .concat(),
    );

    let mut children = Vec::new();
    children.extend_from_slice(&info);
    children.extend_from_slice(&tracks);
    if with_cues {
        let cues_len = cues(&[(0, 0), (0, 0)]).len();
        let cluster0_off = (info.len() + tracks.len() + cues_len) as u64;
        let cluster1_off = cluster0_off + (cluster0.len() + garbage) as u64;
        children.extend(cues(&[(0, cluster0_off), (5000, cluster1_off)]));
    }
    children.extend_from_slice(&cluster0);
    children.extend(std::iter::repeat_n(0u8, garbage));
    children.extend_from_slice(&cluster1);

    let mut file = ebml_header("matroska");
    file.extend(segment_unknown(&children));
    file
}
