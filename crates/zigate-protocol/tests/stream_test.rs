//! Integration tests for framing a byte stream into decoded messages.
//!
//! These tests play the dongle side of the link: they build frames the way
//! the firmware sends them and feed them through the assembler in chunks of
//! every size.

use zigate_protocol::{
    codec, Frame, FrameAssembler, Message, ProtocolError, MSG_ATTRIBUTE_REPORT, MSG_STATUS,
    MSG_VERSION,
};

/// Helper to install a subscriber so assembler warnings show up in test output.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// Helper to build a frame as the dongle sends it, with a trailing RSSI byte.
fn device_frame(msg_type: u16, body: &[u8], rssi: u8) -> Vec<u8> {
    let mut full = body.to_vec();
    full.push(rssi);
    Frame::new(msg_type, full).expect("body fits").encode()
}

fn sample_stream() -> Vec<u8> {
    let mut stream = Vec::new();
    stream.extend(device_frame(MSG_VERSION, &[0x00, 0x03, 0x03, 0x1D], 0xB4));
    stream.extend(device_frame(MSG_STATUS, &[0x00, 0x01, 0x00, 0x10], 0x00));
    stream.extend(device_frame(
        MSG_ATTRIBUTE_REPORT,
        &[
            0x01, 0x12, 0x34, 0x01, 0x04, 0x02, 0x00, 0x00, 0x00, 0x29, 0x00, 0x02, 0x09, 0x29,
        ],
        0x7F,
    ));
    stream
}

fn collect(
    assembler: &mut FrameAssembler,
    chunks: &[&[u8]],
) -> Vec<Result<Frame, ProtocolError>> {
    chunks
        .iter()
        .flat_map(|chunk| assembler.feed(chunk))
        .collect()
}

// ============================================================================
// Chunking
// ============================================================================

#[test]
fn test_chunking_does_not_change_frames() {
    init_tracing();
    let stream = sample_stream();

    let mut whole = FrameAssembler::new();
    let expected = collect(&mut whole, &[&stream]);
    assert_eq!(expected.len(), 3);
    assert!(expected.iter().all(|f| f.is_ok()));

    for chunk_size in 1..=stream.len() {
        let mut assembler = FrameAssembler::new();
        let chunks: Vec<&[u8]> = stream.chunks(chunk_size).collect();
        let frames = collect(&mut assembler, &chunks);
        assert_eq!(frames, expected, "chunk size {}", chunk_size);
        assert_eq!(assembler.buffered_len(), 0);
    }
}

#[test]
fn test_frames_decode_to_messages() {
    let mut assembler = FrameAssembler::new();
    let frames = assembler.feed(&sample_stream());

    let messages: Vec<Message> = frames
        .into_iter()
        .map(|frame| {
            let frame = frame.expect("valid frame");
            Message::decode(frame.msg_type, &frame.body)
                .expect("known type")
                .expect("valid body")
        })
        .collect();

    assert_eq!(
        messages[0],
        Message::Version {
            major: 3,
            installer: 0x031D,
        }
    );
    assert!(matches!(
        messages[1],
        Message::Status {
            sequence: 1,
            packet_type: 0x0010,
            ..
        }
    ));
    match &messages[2] {
        Message::Attribute(report) => assert_eq!(report.data, vec![0x09, 0x29]),
        other => panic!("expected attribute report, got {:?}", other),
    }
}

// ============================================================================
// Corruption
// ============================================================================

#[test]
fn test_corrupt_frame_does_not_poison_stream() {
    init_tracing();
    let mut stream = vec![0x42, 0x42];
    // Length field says 9 but only 2 body bytes follow.
    stream.push(0x01);
    codec::encode_into(&[0x80, 0x10, 0x00, 0x09, 0x00, 0xAA, 0xBB], &mut stream);
    stream.push(0x03);
    stream.extend(sample_stream());

    let mut assembler = FrameAssembler::new();
    let frames = assembler.feed(&stream);
    assert_eq!(frames.len(), 4);
    assert!(matches!(
        frames[0],
        Err(ProtocolError::LengthMismatch {
            declared: 9,
            actual: 2,
        })
    ));
    assert!(frames[1..].iter().all(|f| f.is_ok()));
    assert_eq!(assembler.discarded_bytes(), 2);
}

#[test]
fn test_outbound_frame_has_no_stray_delimiters() {
    let encoded =
        zigate_protocol::build_command(0x0100, &[0x02, 0x00, 0x03, 0x01, 0x01, 0x00]).unwrap();
    let inner = &encoded[1..encoded.len() - 1];
    assert!(!inner.contains(&0x01));
    assert!(!inner.contains(&0x03));

    let frame = Frame::parse(&codec::decode(inner)).unwrap();
    assert_eq!(frame.body, vec![0x02, 0x00, 0x03, 0x01, 0x01, 0x00]);
}
