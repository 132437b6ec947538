//! Writer and reader used together, the way the schema codecs use them.

use dataforge_stream::{PacketReader, PacketWriter, StreamError, StreamLimits};

#[test]
fn test_mixed_sequence_reads_back_in_order() {
    let mut w = PacketWriter::new();
    w.write_bool(true);
    w.write_i32(-42);
    w.write_string("origins:elytra").unwrap();
    w.write_f64(2.5);
    w.write_u8(2);
    w.write_i64(1 << 40);

    let bytes = w.into_bytes();
    let mut r = PacketReader::new(&bytes);
    assert!(r.read_bool().unwrap());
    assert_eq!(r.read_i32().unwrap(), -42);
    assert_eq!(r.read_string().unwrap(), "origins:elytra");
    assert_eq!(r.read_f64().unwrap(), 2.5);
    assert_eq!(r.read_u8().unwrap(), 2);
    assert_eq!(r.read_i64().unwrap(), 1 << 40);
    assert!(r.is_empty());
}

#[test]
fn test_var_int_300_matches_documented_bytes() {
    let mut w = PacketWriter::new();
    w.write_var_int(300);
    assert_eq!(w.as_bytes(), &[0xAC, 0x02]);
}

#[test]
fn test_reading_past_the_end_fails_at_the_boundary() {
    let mut w = PacketWriter::new();
    w.write_i32(7);
    let bytes = w.into_bytes();

    let mut r = PacketReader::new(&bytes);
    assert_eq!(r.read_i32().unwrap(), 7);
    assert_eq!(
        r.read_bool(),
        Err(StreamError::UnexpectedEof {
            needed: 1,
            available: 0
        })
    );
}

#[test]
fn test_reader_limits_are_independent_of_writer_limits() {
    // A generous writer can produce data a strict reader refuses.
    let mut w = PacketWriter::new();
    w.write_string("abcdef").unwrap();
    let bytes = w.into_bytes();

    let strict = StreamLimits {
        max_string_len: 4,
        ..StreamLimits::default()
    };
    let mut r = PacketReader::with_limits(&bytes, strict);
    assert!(matches!(
        r.read_string(),
        Err(StreamError::StringTooLong { max: 4, .. })
    ));
}

#[test]
fn test_stream_error_messages_are_readable() {
    let err = StreamError::UnexpectedEof {
        needed: 4,
        available: 1,
    };
    assert_eq!(
        err.to_string(),
        "unexpected end of stream: needed 4 bytes, 1 available"
    );
    assert_eq!(
        StreamError::InvalidBoolean(0x2a).to_string(),
        "invalid boolean byte 0x2a"
    );
}
