use ntex_bytes::{Bytes, BytesMut};
use ntex_codec::{Decoder, Encoder};
use spdy_codec::{frame, Codec, EncoderError, FrameError, HeaderMap, StreamId, Version};

// ===== helper macros to decode frames through a fresh codec =====

#[macro_export]
macro_rules! decode_frame {
    ($version: expr, $type: ident, $bytes: ident) => {{
        use spdy_codec::Frame;

        match Codec::new($version).decode(&mut $bytes) {
            Ok(Some(Frame::$type(frame))) => frame,
            frame => panic!("unexpected frame; actual={:?}", frame),
        }
    }};
}

#[macro_export]
macro_rules! decode_err {
    ($version: expr, $bytes: ident, $type: expr) => {{
        match Codec::new($version).decode(&mut $bytes) {
            Err(e) => assert_eq!(e, $type),
            frame => panic!("expected error; actual={:?}", frame),
        }
    }};
}

// ===== NOOP =====

#[test]
fn read_noop_v2() {
    let raw = [0x80, 0x02, 0x00, 0x05, 0x00, 0x00, 0x00, 0x00];
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&raw);

    let _noop = decode_frame!(Version::V2, Noop, buf);
    assert!(buf.is_empty());

    // Re-serializes byte-identical
    let mut out = BytesMut::new();
    Codec::new(Version::V2)
        .encode(frame::Noop::new().into(), &mut out)
        .unwrap();
    assert_eq!(&out[..], raw);
}

#[test]
fn read_noop_not_in_v3() {
    // NOOP was removed in SPDY/3
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[0x80, 0x03, 0x00, 0x05, 0x00, 0x00, 0x00, 0x00]);

    decode_err!(Version::V3, buf, FrameError::InvalidKind(5));
}

#[test]
fn read_noop_nonzero_length() {
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[0x80, 0x02, 0x00, 0x05, 0x00, 0x00, 0x00, 0x02, 0, 0]);

    decode_err!(
        Version::V2,
        buf,
        FrameError::IncorrectDataLength {
            read: 2,
            expected: 0
        }
    );
}

// ===== PING =====

#[test]
fn read_ping_v3() {
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[
        0x80, 0x03, 0x00, 0x06, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x2A,
    ]);

    let ping = decode_frame!(Version::V3, Ping, buf);
    assert_eq!(ping.id(), 42);
    assert!(!ping.is_client_initiated());
}

#[test]
fn read_ping_bad_length() {
    // Declared length 8 on a 4-byte frame type
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[
        0x80, 0x03, 0x00, 0x06, 0x00, 0x00, 0x00, 0x08, 0, 0, 0, 1, 0, 0, 0, 2,
    ]);

    decode_err!(
        Version::V3,
        buf,
        FrameError::IncorrectDataLength {
            read: 8,
            expected: 4
        }
    );
}

#[test]
fn read_ping_invalid_flags() {
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[0x80, 0x03, 0x00, 0x06, 0x01, 0x00, 0x00, 0x04, 0, 0, 0, 1]);

    decode_err!(Version::V3, buf, FrameError::InvalidFlags(1));
}

#[test]
fn ping_roundtrip() {
    for version in [Version::V2, Version::V3] {
        let mut buf = BytesMut::new();
        Codec::new(version)
            .encode(frame::Ping::new(7).into(), &mut buf)
            .unwrap();

        let ping = decode_frame!(version, Ping, buf);
        assert_eq!(ping.id(), 7);
        assert!(ping.is_client_initiated());
    }
}

// ===== Version handling =====

#[test]
fn read_version_mismatch() {
    // A v2 PING on a v3 connection
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[0x80, 0x02, 0x00, 0x06, 0x00, 0x00, 0x00, 0x04, 0, 0, 0, 1]);

    decode_err!(Version::V3, buf, FrameError::UnexpectedVersion(2));
}

#[test]
fn read_unsupported_version() {
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[0x80, 0x04, 0x00, 0x06, 0x00, 0x00, 0x00, 0x04, 0, 0, 0, 1]);

    decode_err!(Version::V3, buf, FrameError::UnsupportedVersion(4));
}

#[test]
fn read_unknown_kind() {
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[0x80, 0x03, 0x00, 0x0B, 0x00, 0x00, 0x00, 0x00]);

    decode_err!(Version::V3, buf, FrameError::InvalidKind(11));
}

// ===== RST_STREAM =====

#[test]
fn rst_stream_v3_wire_format() {
    let reset = frame::Reset::new(StreamId::new(5), frame::Reason::REFUSED_STREAM);

    let mut buf = BytesMut::new();
    Codec::new(Version::V3).encode(reset.into(), &mut buf).unwrap();
    assert_eq!(
        &buf[..],
        [0x80, 0x03, 0x00, 0x03, 0x00, 0x00, 0x00, 0x08, 0, 0, 0, 5, 0, 0, 0, 3]
    );

    let decoded = decode_frame!(Version::V3, Reset, buf);
    assert_eq!(decoded.stream_id(), 5);
    assert_eq!(decoded.status(), frame::Reason::REFUSED_STREAM);
}

#[test]
fn rst_stream_bad_length() {
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[0x80, 0x03, 0x00, 0x03, 0x00, 0x00, 0x00, 0x04, 0, 0, 0, 5]);

    decode_err!(
        Version::V3,
        buf,
        FrameError::IncorrectDataLength {
            read: 4,
            expected: 8
        }
    );
}

#[test]
fn rst_stream_reserved_bit_masked() {
    // Stream id 0x80000001 serializes with the reserved bit cleared and
    // decodes back as 1.
    let reset = frame::Reset::new(StreamId::new(0x8000_0001), frame::Reason::CANCEL);

    let mut buf = BytesMut::new();
    Codec::new(Version::V3).encode(reset.into(), &mut buf).unwrap();
    assert_eq!(&buf[8..12], [0, 0, 0, 1]);

    let mut buf2 = BytesMut::new();
    buf2.extend_from_slice(&[
        0x80, 0x03, 0x00, 0x03, 0x00, 0x00, 0x00, 0x08, 0x80, 0, 0, 1, 0, 0, 0, 5,
    ]);
    let decoded = decode_frame!(Version::V3, Reset, buf2);
    assert_eq!(decoded.stream_id(), 1);
}

// ===== DATA =====

#[test]
fn read_data_frame() {
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[0, 0, 0, 1, 0, 0, 0, 5]);
    buf.extend_from_slice(b"hello");

    let data = decode_frame!(Version::V3, Data, buf);
    assert_eq!(data.stream_id(), 1);
    assert_eq!(data.payload(), &b"hello"[..]);
    assert!(!data.is_fin());
}

#[test]
fn read_data_fin() {
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[0, 0, 0, 1, 1, 0, 0, 0]);

    let data = decode_frame!(Version::V2, Data, buf);
    assert!(data.is_fin());
    assert_eq!(data.payload(), &b""[..]);
}

#[test]
fn read_data_stream_id_zero() {
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 5]);
    buf.extend_from_slice(b"hello");

    decode_err!(Version::V3, buf, FrameError::InvalidStreamId);
}

#[test]
fn read_data_invalid_flags() {
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[0, 0, 0, 1, 0x02, 0, 0, 0]);

    decode_err!(Version::V3, buf, FrameError::InvalidFlags(2));
}

#[test]
fn data_roundtrip() {
    let mut data = frame::Data::new(StreamId::new(9), Bytes::from_static(b"payload"));
    data.set_fin();

    let mut buf = BytesMut::new();
    Codec::new(Version::V2).encode(data.into(), &mut buf).unwrap();
    assert_eq!(&buf[..8], [0, 0, 0, 9, 1, 0, 0, 7]);

    let decoded = decode_frame!(Version::V2, Data, buf);
    assert_eq!(decoded.stream_id(), 9);
    assert_eq!(decoded.payload(), &b"payload"[..]);
    assert!(decoded.is_fin());
}

// ===== SETTINGS =====

#[test]
fn settings_v2_entry_layout() {
    // v2 stores the 24-bit id little-endian, then the entry flags
    let mut settings = frame::Settings::new();
    settings.push(frame::Setting::new(
        frame::SettingId::MAX_CONCURRENT_STREAMS,
        100,
    ));

    let mut buf = BytesMut::new();
    Codec::new(Version::V2).encode(settings.into(), &mut buf).unwrap();
    assert_eq!(
        &buf[..],
        [
            0x80, 0x02, 0x00, 0x04, 0x00, 0x00, 0x00, 0x0C, // head, length 12
            0, 0, 0, 1, // count
            0x04, 0x00, 0x00, 0x00, // id 4 LE + flags
            0, 0, 0, 100, // value
        ]
    );

    let decoded = decode_frame!(Version::V2, Settings, buf);
    assert_eq!(decoded.entries().len(), 1);
    assert_eq!(
        decoded.entries()[0].id(),
        frame::SettingId::MAX_CONCURRENT_STREAMS
    );
    assert_eq!(decoded.entries()[0].value(), 100);
}

#[test]
fn settings_v3_entry_layout() {
    // v3 stores the entry flags, then the 24-bit id big-endian
    let mut settings = frame::Settings::new();
    settings.push(
        frame::Setting::new(frame::SettingId::INITIAL_WINDOW_SIZE, 65536).set_persist_value(),
    );

    let mut buf = BytesMut::new();
    Codec::new(Version::V3).encode(settings.into(), &mut buf).unwrap();
    assert_eq!(
        &buf[..],
        [
            0x80, 0x03, 0x00, 0x04, 0x00, 0x00, 0x00, 0x0C, // head, length 12
            0, 0, 0, 1, // count
            0x01, 0x00, 0x00, 0x07, // flags + id 7 BE
            0, 1, 0, 0, // value
        ]
    );

    let decoded = decode_frame!(Version::V3, Settings, buf);
    assert!(decoded.entries()[0].is_persist_value());
    assert_eq!(
        decoded.entries()[0].id(),
        frame::SettingId::INITIAL_WINDOW_SIZE
    );
}

#[test]
fn settings_count_length_mismatch() {
    // Declares two entries but carries one
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[
        0x80, 0x03, 0x00, 0x04, 0x00, 0x00, 0x00, 0x0C, // head, length 12
        0, 0, 0, 2, // count
        0x00, 0x00, 0x00, 0x04, 0, 0, 0, 100,
    ]);

    decode_err!(
        Version::V3,
        buf,
        FrameError::IncorrectDataLength {
            read: 12,
            expected: 20
        }
    );
}

#[test]
fn settings_invalid_entry_flags() {
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[
        0x80, 0x03, 0x00, 0x04, 0x00, 0x00, 0x00, 0x0C, // head
        0, 0, 0, 1, // count
        0x04, 0x00, 0x00, 0x04, 0, 0, 0, 100, // entry flag 0x4 is undefined
    ]);

    decode_err!(Version::V3, buf, FrameError::InvalidFlags(4));
}

#[test]
fn settings_clear_flag_roundtrip() {
    let settings = frame::Settings::new().set_clear_settings();

    let mut buf = BytesMut::new();
    Codec::new(Version::V2).encode(settings.into(), &mut buf).unwrap();
    assert_eq!(buf[4], 0x01);

    let decoded = decode_frame!(Version::V2, Settings, buf);
    assert!(decoded.is_clear_settings());
    assert!(decoded.entries().is_empty());
}

// ===== GOAWAY =====

#[test]
fn go_away_v2_roundtrip() {
    let go_away = frame::GoAway::new(StreamId::new(17));

    let mut buf = BytesMut::new();
    Codec::new(Version::V2).encode(go_away.into(), &mut buf).unwrap();
    assert_eq!(
        &buf[..],
        [0x80, 0x02, 0x00, 0x07, 0x00, 0x00, 0x00, 0x04, 0, 0, 0, 17]
    );

    let decoded = decode_frame!(Version::V2, GoAway, buf);
    assert_eq!(decoded.last_good_stream_id(), 17);
    assert_eq!(decoded.status(), frame::GoAwayStatus::OK);
}

#[test]
fn go_away_v3_roundtrip() {
    let go_away = frame::GoAway::new(StreamId::new(17)).set_status(frame::GoAwayStatus::PROTOCOL_ERROR);

    let mut buf = BytesMut::new();
    Codec::new(Version::V3).encode(go_away.into(), &mut buf).unwrap();
    assert_eq!(
        &buf[..],
        [0x80, 0x03, 0x00, 0x07, 0x00, 0x00, 0x00, 0x08, 0, 0, 0, 17, 0, 0, 0, 1]
    );

    let decoded = decode_frame!(Version::V3, GoAway, buf);
    assert_eq!(decoded.status(), frame::GoAwayStatus::PROTOCOL_ERROR);
}

#[test]
fn go_away_v3_bad_length() {
    // v2-sized GOAWAY on a v3 connection
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[0x80, 0x03, 0x00, 0x07, 0x00, 0x00, 0x00, 0x04, 0, 0, 0, 17]);

    decode_err!(
        Version::V3,
        buf,
        FrameError::IncorrectDataLength {
            read: 4,
            expected: 8
        }
    );
}

// ===== WINDOW_UPDATE =====

#[test]
fn window_update_roundtrip() {
    let update = frame::WindowUpdate::new(StreamId::new(3), 4096);

    let mut buf = BytesMut::new();
    Codec::new(Version::V3).encode(update.into(), &mut buf).unwrap();
    assert_eq!(
        &buf[..],
        [0x80, 0x03, 0x00, 0x09, 0x00, 0x00, 0x00, 0x08, 0, 0, 0, 3, 0, 0, 0x10, 0]
    );

    let decoded = decode_frame!(Version::V3, WindowUpdate, buf);
    assert_eq!(decoded.stream_id(), 3);
    assert_eq!(decoded.delta(), 4096);
}

#[test]
fn window_update_not_in_v2() {
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[
        0x80, 0x02, 0x00, 0x09, 0x00, 0x00, 0x00, 0x08, 0, 0, 0, 3, 0, 0, 0x10, 0,
    ]);

    decode_err!(Version::V2, buf, FrameError::InvalidKind(9));
}

#[test]
fn window_update_bad_length() {
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[0x80, 0x03, 0x00, 0x09, 0x00, 0x00, 0x00, 0x04, 0, 0, 0, 3]);

    decode_err!(
        Version::V3,
        buf,
        FrameError::IncorrectDataLength {
            read: 4,
            expected: 8
        }
    );
}

#[test]
fn window_update_zero_delta() {
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[
        0x80, 0x03, 0x00, 0x09, 0x00, 0x00, 0x00, 0x08, 0, 0, 0, 3, 0, 0, 0, 0,
    ]);

    decode_err!(Version::V3, buf, FrameError::InvalidWindowUpdateValue);
}

// ===== SYN_REPLY =====

#[test]
fn syn_reply_v3_roundtrip() {
    let _ = env_logger::try_init();

    let mut headers = HeaderMap::new();
    headers.append(":status", "200");
    headers.append(":version", "HTTP/1.1");

    let reply = frame::SynReply::new(StreamId::new(1), headers.clone()).set_fin();

    let mut buf = BytesMut::new();
    Codec::new(Version::V3).encode(reply.into(), &mut buf).unwrap();

    // Common header: control bit + version 3, type 2, FLAG_FIN
    assert_eq!(&buf[..5], [0x80, 0x03, 0x00, 0x02, 0x01]);
    // Stream id, then the compressed block
    assert_eq!(&buf[8..12], [0, 0, 0, 1]);

    let decoded = decode_frame!(Version::V3, SynReply, buf);
    assert_eq!(decoded.stream_id(), 1);
    assert!(decoded.is_fin());
    assert_eq!(*decoded.headers(), headers);
}

#[test]
fn syn_reply_v2_reserved_bytes() {
    let mut headers = HeaderMap::new();
    headers.append("status", "301");

    let reply = frame::SynReply::new(StreamId::new(2), headers.clone());

    let mut buf = BytesMut::new();
    Codec::new(Version::V2).encode(reply.into(), &mut buf).unwrap();

    // v2 inserts two reserved bytes between the stream id and the block
    assert_eq!(&buf[12..14], [0, 0]);

    let decoded = decode_frame!(Version::V2, SynReply, buf);
    assert_eq!(*decoded.headers(), headers);
}

#[test]
fn syn_reply_invalid_flags() {
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[0x80, 0x03, 0x00, 0x02, 0x04, 0x00, 0x00, 0x04, 0, 0, 0, 1]);

    decode_err!(Version::V3, buf, FrameError::InvalidFlags(4));
}

// ===== SYN_STREAM =====

#[test]
fn syn_stream_v3_roundtrip() {
    let mut headers = HeaderMap::new();
    headers.append(":method", "GET");
    headers.append(":path", "/");
    headers.append(":version", "HTTP/1.1");
    headers.append(":host", "example.com");
    headers.append(":scheme", "https");

    let syn = frame::SynStream::new(StreamId::new(1), headers.clone())
        .set_priority(5)
        .set_slot(2)
        .set_associated_stream_id(StreamId::new(4))
        .set_fin();

    let mut buf = BytesMut::new();
    Codec::new(Version::V3).encode(syn.into(), &mut buf).unwrap();

    assert_eq!(&buf[..5], [0x80, 0x03, 0x00, 0x01, 0x01]);
    assert_eq!(&buf[8..16], [0, 0, 0, 1, 0, 0, 0, 4]);
    // 3-bit priority in the top bits, then the credential slot
    assert_eq!(buf[16], 5 << 5);
    assert_eq!(buf[17], 2);

    let decoded = decode_frame!(Version::V3, SynStream, buf);
    assert_eq!(decoded.stream_id(), 1);
    assert_eq!(decoded.associated_stream_id(), 4);
    assert_eq!(decoded.priority(), 5);
    assert_eq!(decoded.slot(), 2);
    assert!(decoded.is_fin());
    assert!(!decoded.is_unidirectional());
    assert_eq!(*decoded.headers(), headers);
}

#[test]
fn syn_stream_v2_priority_width() {
    let mut headers = HeaderMap::new();
    headers.append("method", "GET");
    headers.append("url", "/");
    headers.append("version", "HTTP/1.1");

    // v2 priorities are 2 bits wide; 7 clamps to 3
    let syn = frame::SynStream::new(StreamId::new(3), headers.clone())
        .set_priority(7)
        .set_unidirectional();

    let mut buf = BytesMut::new();
    Codec::new(Version::V2).encode(syn.into(), &mut buf).unwrap();

    assert_eq!(buf[4], 0x02);
    assert_eq!(buf[16], 3 << 6);
    assert_eq!(buf[17], 0);

    let decoded = decode_frame!(Version::V2, SynStream, buf);
    assert_eq!(decoded.priority(), 3);
    assert!(decoded.is_unidirectional());
    assert_eq!(*decoded.headers(), headers);
}

#[test]
fn syn_stream_stream_id_zero() {
    // Zero stream id in a SYN_STREAM is rejected before the block is
    // touched.
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[
        0x80, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00, 0x0A, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ]);

    decode_err!(Version::V3, buf, FrameError::InvalidStreamId);
}

// ===== HEADERS =====

#[test]
fn headers_frame_roundtrip() {
    for version in [Version::V2, Version::V3] {
        let mut headers = HeaderMap::new();
        headers.append("content-type", "text/html");
        headers.append("set-cookie", "a=1");
        headers.append("set-cookie", "b=2");

        let frame = frame::Headers::new(StreamId::new(5), headers.clone()).set_fin();

        let mut buf = BytesMut::new();
        Codec::new(version).encode(frame.into(), &mut buf).unwrap();

        let decoded = decode_frame!(version, Headers, buf);
        assert_eq!(decoded.stream_id(), 5);
        assert!(decoded.is_fin());
        assert_eq!(*decoded.headers(), headers);
    }
}

// ===== CREDENTIAL =====

#[test]
fn credential_roundtrip() {
    let mut credential = frame::Credential::new(3, Bytes::from_static(b"proof bytes"));
    credential.push_certificate(Bytes::from_static(b"certificate one"));
    credential.push_certificate(Bytes::from_static(b"certificate two"));

    let mut buf = BytesMut::new();
    Codec::new(Version::V3)
        .encode(credential.clone().into(), &mut buf)
        .unwrap();

    let decoded = decode_frame!(Version::V3, Credential, buf);
    assert_eq!(decoded, credential);
}

#[test]
fn credential_truncated() {
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[
        0x80, 0x03, 0x00, 0x0A, 0x00, 0x00, 0x00, 0x08, // head
        0, 3, // slot
        0, 0, 0, 0x20, // proof length runs past the payload
        1, 2,
    ]);

    decode_err!(Version::V3, buf, FrameError::Malformed);
}

// ===== Encoder version gating =====

#[test]
fn encode_noop_not_in_v3() {
    let mut buf = BytesMut::new();
    let err = Codec::new(Version::V3)
        .encode(frame::Noop::new().into(), &mut buf)
        .unwrap_err();
    assert_eq!(err, EncoderError::UnsupportedKind);
}

#[test]
fn encode_window_update_not_in_v2() {
    let mut buf = BytesMut::new();
    let err = Codec::new(Version::V2)
        .encode(frame::WindowUpdate::new(StreamId::new(1), 1).into(), &mut buf)
        .unwrap_err();
    assert_eq!(err, EncoderError::UnsupportedKind);
}

// ===== Incremental feeding =====

#[test]
fn decode_partial_frames() {
    let codec = Codec::new(Version::V3);
    let raw = [
        0x80, 0x03, 0x00, 0x06, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x2A,
    ];

    let mut buf = BytesMut::new();
    buf.extend_from_slice(&raw[..5]);
    assert!(codec.decode(&mut buf).unwrap().is_none());

    buf.extend_from_slice(&raw[5..10]);
    assert!(codec.decode(&mut buf).unwrap().is_none());

    buf.extend_from_slice(&raw[10..]);
    match codec.decode(&mut buf).unwrap() {
        Some(spdy_codec::Frame::Ping(ping)) => assert_eq!(ping.id(), 42),
        frame => panic!("unexpected frame; actual={:?}", frame),
    }
}

// ===== Shared compression state =====

#[test]
fn codec_shares_compression_state_across_frames() {
    let _ = env_logger::try_init();

    let encoder = Codec::new(Version::V3);
    let decoder = Codec::new(Version::V3);

    let mut buf = BytesMut::new();
    let mut sent = Vec::new();
    for i in 0..4u32 {
        let mut headers = HeaderMap::new();
        headers.append(":status", "200");
        headers.append(":version", "HTTP/1.1");
        headers.append("x-request", i.to_string());

        let id = StreamId::new(2 * i + 1);
        sent.push(headers.clone());
        encoder
            .encode(frame::Headers::new(id, headers).into(), &mut buf)
            .unwrap();
    }

    // The peer must decode the header-bearing frames in wire order;
    // each block depends on the zlib state left by the previous one.
    for (i, expected) in sent.iter().enumerate() {
        match decoder.decode(&mut buf).unwrap() {
            Some(spdy_codec::Frame::Headers(frame)) => {
                assert_eq!(frame.stream_id(), 2 * i as u32 + 1);
                assert_eq!(frame.headers(), expected);
            }
            frame => panic!("unexpected frame; actual={:?}", frame),
        }
    }
    assert!(buf.is_empty());
}
