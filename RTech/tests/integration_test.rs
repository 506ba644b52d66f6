use pretty_assertions::assert_eq;
use rtech::prelude::*;

/// Eight literal bytes followed by a 4-byte match at distance 3.
const GOLDEN_STREAM: [u8; 16] = [
    0x0C, 0x00, 0x00, 0x00, 0x67, 0x90, 0xD0, 0x10, 0x51, 0x91, 0xD1, 0x11, 0x12, 0x04, 0x00, 0x00,
];

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

#[test]
fn test_golden_stream_end_to_end() {
    init_tracing();

    let mut decoder = PakDecompressor::init(&GOLDEN_STREAM, 0, 0).unwrap();
    assert_eq!(decoder.params().decompressed_len, 12);
    assert_eq!(decoder.params().source_len, 16);

    let mut out = WorkingBuffer::new();
    let written = decoder.decompress(GOLDEN_STREAM.len(), &mut out).unwrap();
    assert_eq!(written, 12);
    assert_eq!(out.as_slice(), b"ABCDEFGHFGHF");
}

#[test]
fn test_header_failures_leave_buffer_untouched() {
    let mut out = WorkingBuffer::new();
    for (data, payload_offset, header_len) in [
        (&[][..], 0, 0),
        (&[0u8, 0, 0, 0][..], 0, 0),
        (&GOLDEN_STREAM[..], 32, 0),
        (&GOLDEN_STREAM[..], 0, 4),
    ] {
        assert!(matches!(
            PakDecompressor::init(data, payload_offset, header_len),
            Err(Error::InvalidHeader { .. })
        ));
    }
    assert!(out.is_empty());

    // A failed decode clears what was produced before the failure.
    let mut decoder = PakDecompressor::init(&GOLDEN_STREAM, 0, 0).unwrap();
    assert!(decoder.decompress(10, &mut out).is_err());
    assert!(out.is_empty());
}

#[test]
fn test_overlapping_and_long_matches() {
    let overlap = [0x0C, 0x00, 0x00, 0x00, 0x11, 0x26, 0xF6, 0x2E, 0x00];
    assert_eq!(
        decompress_pakfile(&overlap, 0, 0).unwrap(),
        b"abababababab".to_vec()
    );

    let long = [0x65, 0x00, 0x00, 0x00, 0x8E, 0x67, 0x25, 0x00];
    assert_eq!(decompress_pakfile(&long, 0, 0).unwrap(), vec![b'x'; 101]);
}

#[test]
fn test_capacity_limits_output() {
    let mut decoder = PakDecompressor::init(&GOLDEN_STREAM, 0, 0).unwrap();
    let mut out = WorkingBuffer::with_capacity(10);
    assert!(matches!(
        decoder.decompress(GOLDEN_STREAM.len(), &mut out),
        Err(Error::BufferOverrun { capacity: 10, .. })
    ));
    assert!(out.is_empty());
    assert_eq!(WorkingBuffer::new().capacity(), DCMP_BUF_SIZE);
}

#[test]
fn test_batch_preserves_order() {
    let overlap = [0x0C, 0x00, 0x00, 0x00, 0x11, 0x26, 0xF6, 0x2E, 0x00];
    let spans = [
        CompressedSpan::new(&GOLDEN_STREAM),
        CompressedSpan::new(&[]),
        CompressedSpan::new(&overlap),
    ];
    let results = decompress_batch(&spans, &DecodeOptions::new());
    assert_eq!(results[0].as_deref(), Ok(&b"ABCDEFGHFGHF"[..]));
    assert!(results[1].is_err());
    assert_eq!(results[2].as_deref(), Ok(&b"abababababab"[..]));
}

#[test]
fn test_snowflake_stream() {
    let mut data = 10u32.to_le_bytes().to_vec();
    data.extend_from_slice(b"ETAOINSHRDLUCMFW");
    data.extend_from_slice(&[0x43, 0x10, 0x32, 0xC1, b'.', 0x41, 0x87]);
    assert_eq!(decompress_snowflake(&data).unwrap(), b"ETAO....HR".to_vec());
}

#[test]
fn test_animation_track() {
    // Fine track: base -4, range 15, four 4-bit codes.
    let packed = [0x02, 0xFC, 0xFF, 0x0F, 0x00, 0x0F, 0x87];
    let samples = decode_track(5, &packed, 1.0, &[]).unwrap();
    assert_eq!(samples.len(), 5);
    let expected = [-4.0, 11.0, -4.0, -5.0, -4.0];
    for (sample, expected) in samples.iter().zip(expected) {
        assert!((sample - expected).abs() < 1e-5);
    }

    assert!(decode_track(0, &packed, 1.0, &[]).unwrap().is_empty());
    assert!((peak_translation(&packed, 5, 2.0).unwrap() - 22.0).abs() < 1e-4);
    assert_eq!(AnimTrack::new(&packed, 1.0).kind().unwrap(), TrackKind::Fine);
}

#[test]
fn test_rotations_are_unit() {
    for lane in [[0u8; 16], [0xFF; 16], [0x80; 16], [0x5A; 16]] {
        let q = decode_rotation(&lane);
        assert!((q.length() - 1.0).abs() < 1e-4);
    }

    let mut lane = [0u8; 16];
    lane[..4].copy_from_slice(&0.5f32.to_le_bytes());
    let q = decode_euler_rotation(&lane);
    assert!(q.abs_diff_eq(Quat::from_rotation_x(0.5), 1e-5));
}

#[test]
fn test_asset_guid() {
    assert_eq!(asset_guid("material/models/test.rpak"), 0x63beedb854f35177);
    assert_eq!(asset_guid("material/models/test.rpak"), asset_guid("material/models/test.rpak"));
    assert_ne!(asset_guid("material/models/a.rpak"), asset_guid("material/models/b.rpak"));
    assert_eq!(AssetHash::of("").value(), 0);
}

#[test]
fn test_unswizzle_bijection() {
    let shape = BlockShape::new(16, 8, 4, 4).unwrap();
    let mut seen = vec![false; shape.element_count()];
    for y in 0..8 {
        for x in 0..16 {
            let offset = unswizzle(x, y, 16, 8, 4, 4).unwrap();
            assert_eq!(offset, shape.unswizzle(x, y).unwrap());
            assert!(!seen[offset], "offset {offset} produced twice");
            seen[offset] = true;
        }
    }
    assert!(seen.iter().all(|&s| s));

    assert!(matches!(
        unswizzle(0, 8, 16, 8, 4, 4),
        Err(Error::InvalidCoordinate { y: 8, .. })
    ));
}
