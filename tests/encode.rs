mod common;

use common::*;
use qrmatrix::codewords::encode_segments_to_codewords;
use qrmatrix::{
    DataTooLong, EncodeOptions, Mask, QrCode, QrCodeEcc, QrError, QrSegment, QrSegmentMode,
    Version,
};

const HELLO_LOW: [&str; 21] = [
    "#######...###.#######",
    "#.....#.###.#.#.....#",
    "#.###.#...###.#.###.#",
    "#.###.#.##..#.#.###.#",
    "#.###.#..#..#.#.###.#",
    "#.....#.#..#..#.....#",
    "#######.#.#.#.#######",
    ".........#...........",
    "#####.###..#.#.#.#.#.",
    "#...##..#.#.##..###.#",
    "##.##.#.#.#.###..###.",
    ".##..#.##..###.#.##..",
    "..#####.#...#.##....#",
    "........##...#####...",
    "#######.#...####..##.",
    "#.....#..#..##.#.###.",
    "#.###.#.#.#####.#..##",
    "#.###.#.###....###...",
    "#.###.#.#..##.##..#..",
    "#.....#.###.##..###..",
    "#######.##.#..#.#..#.",
];

const HELLO_MEDIUM: [&str; 21] = [
    "#######.....#.#######",
    "#.....#..#.#..#.....#",
    "#.###.#.#.###.#.###.#",
    "#.###.#.#.....#.###.#",
    "#.###.#.##..#.#.###.#",
    "#.....#.####..#.....#",
    "#######.#.#.#.#######",
    "........#.#..........",
    "#.#####..###..#####..",
    "...##..##...##..###.#",
    "...#..#.###.###..###.",
    ".##..#.#..####.#.##..",
    "##.####.#...#.##....#",
    "........#....#####...",
    "#######..##.####..##.",
    "#.....#.#.#.##.#.###.",
    "#.###.#.##.####.#..##",
    "#.###.#.#.#....###...",
    "#.###.#.#####.##..#..",
    "#.....#...#.##..###..",
    "#######.##.#..#.#..#.",
];

#[test]
fn hello_world_golden_symbol() {
    init_test_logging();
    let options = EncodeOptions::default().boost_ecl(false);
    let qr = QrCode::encode_text_with("Hello, world!", QrCodeEcc::Low, &options).unwrap();
    assert_eq!(qr.version(), Version::MIN);
    assert_eq!(qr.size(), 21);
    assert_eq!(qr.error_correction_level(), QrCodeEcc::Low);
    assert_eq!(qr.mask().value(), 2);
    assert_eq!(grid_rows(&qr), HELLO_LOW);
}

#[test]
fn hello_world_boosts_to_medium() {
    init_test_logging();
    let qr = QrCode::encode_text("Hello, world!", QrCodeEcc::Low).unwrap();
    assert_eq!(qr.version(), Version::MIN);
    assert_eq!(qr.error_correction_level(), QrCodeEcc::Medium);
    assert_eq!(qr.mask().value(), 2);
    assert_eq!(grid_rows(&qr), HELLO_MEDIUM);
}

#[test]
fn hello_world_data_codewords() {
    let segs = QrSegment::make_segments("Hello, world!");
    let (data, ecl, version) =
        encode_segments_to_codewords(&segs, QrCodeEcc::Low, Version::MIN, Version::MAX, false)
            .unwrap();
    assert_eq!(ecl, QrCodeEcc::Low);
    assert_eq!(version, Version::MIN);
    assert_eq!(
        data,
        vec![
            0x40, 0xd4, 0x86, 0x56, 0xc6, 0xc6, 0xf2, 0xc2, 0x07, 0x76, 0xf7, 0x26, 0xc6, 0x42,
            0x10, 0xec, 0x11, 0xec, 0x11
        ]
    );
}

#[test]
fn medium_sized_symbol_fingerprint() {
    init_test_logging();
    let text = "The quick brown fox jumps over the lazy dog. 0123456789 The quick brown fox jumps over the lazy dog!!";
    let options = EncodeOptions::default().boost_ecl(false);
    let qr = QrCode::encode_binary_with(text.as_bytes(), QrCodeEcc::Medium, &options).unwrap();
    assert_eq!(qr.version().value(), 6);
    assert_eq!(qr.mask().value(), 6);
    assert_eq!(dark_modules(&qr), 862);
}

#[test]
fn version_information_symbol_fingerprint() {
    init_test_logging();
    let text = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789".repeat(6);
    let options = EncodeOptions::default().boost_ecl(false);
    let qr = QrCode::encode_binary_with(text.as_bytes(), QrCodeEcc::Quartile, &options).unwrap();
    assert_eq!(qr.version().value(), 13);
    assert_eq!(qr.size(), 69);
    assert_eq!(qr.mask().value(), 4);
    assert_eq!(dark_modules(&qr), 2372);

    let forced = options.mask(Some(Mask::new(6).unwrap()));
    let qr = QrCode::encode_binary_with(text.as_bytes(), QrCodeEcc::Quartile, &forced).unwrap();
    assert_eq!(qr.mask().value(), 6);
    assert_eq!(dark_modules(&qr), 2486);
}

#[test]
fn automatic_mask_choices_at_version_1() {
    // Each of these is decided by how many finder-like patterns the N3 rule counts
    let cases = [
        ("ticket-2-74", 2),
        ("ticket-3-111", 0),
        ("ticket-9-333", 4),
        ("ticket-11-407", 7),
        ("ticket-44-1628", 3),
        ("ticket-47-1739", 5),
    ];
    let options = EncodeOptions::default().boost_ecl(false);
    for (text, mask) in cases {
        let qr = QrCode::encode_binary_with(text.as_bytes(), QrCodeEcc::Low, &options).unwrap();
        assert_eq!(qr.version(), Version::MIN, "{}", text);
        assert_eq!(qr.mask().value(), mask, "{}", text);
    }
}

#[test]
fn encoding_is_deterministic() {
    let a = QrCode::encode_text("https://www.example.org/path?q=1", QrCodeEcc::Quartile).unwrap();
    let b = QrCode::encode_text("https://www.example.org/path?q=1", QrCodeEcc::Quartile).unwrap();
    assert_eq!(a, b);
}

#[test]
fn empty_text_encodes_to_version_1() {
    let qr = QrCode::encode_text("", QrCodeEcc::Low).unwrap();
    assert_eq!(qr.version(), Version::MIN);
    // Nothing to protect, so boosting goes all the way up
    assert_eq!(qr.error_correction_level(), QrCodeEcc::High);
}

#[test]
fn byte_capacity_limit_at_version_40() {
    init_test_logging();
    let fits = vec![b'a'; 2953];
    let qr = QrCode::encode_binary(&fits, QrCodeEcc::Low).unwrap();
    assert_eq!(qr.version(), Version::MAX);
    assert_eq!(qr.size(), 177);

    let too_long = vec![b'a'; 2954];
    assert_eq!(
        QrCode::encode_binary(&too_long, QrCodeEcc::Low),
        Err(QrError::DataTooLong(DataTooLong::DataOverCapacity(23652, 23648)))
    );
}

#[test]
fn numeric_and_alphanumeric_capacity_limits() {
    let digits = "7".repeat(7089);
    assert_eq!(QrCode::encode_text(&digits, QrCodeEcc::Low).unwrap().version(), Version::MAX);
    let digits = "7".repeat(7090);
    assert!(matches!(
        QrCode::encode_text(&digits, QrCodeEcc::Low),
        Err(QrError::DataTooLong(DataTooLong::DataOverCapacity(23652, 23648)))
    ));

    let alnum = "Q".repeat(4296);
    assert_eq!(QrCode::encode_text(&alnum, QrCodeEcc::Low).unwrap().version(), Version::MAX);
    let alnum = "Q".repeat(4297);
    assert!(QrCode::encode_text(&alnum, QrCodeEcc::Low).is_err());
}

#[test]
fn version_range_is_respected() {
    let v5 = Version::new(5).unwrap();
    let options = EncodeOptions::default().min_version(v5);
    let qr = QrCode::encode_text_with("1", QrCodeEcc::High, &options).unwrap();
    assert_eq!(qr.version(), v5);

    let options = EncodeOptions::default().max_version(Version::new(2).unwrap());
    let err = QrCode::encode_binary_with(&[0u8; 100], QrCodeEcc::Low, &options).unwrap_err();
    assert!(matches!(err, QrError::DataTooLong(DataTooLong::DataOverCapacity(_, 272))));
    assert_eq!(err.to_string(), "Data length = 812 bits, Max capacity = 272 bits");
}

#[test]
fn inverted_version_range_is_rejected() {
    let options = EncodeOptions::default()
        .version_range(Version::new(9).unwrap(), Version::new(4).unwrap());
    assert_eq!(
        QrCode::encode_text_with("HELLO", QrCodeEcc::Low, &options),
        Err(QrError::InvalidVersionRange { min: 9, max: 4 })
    );
    assert_eq!(
        QrCode::encode_text_optimally("HELLO", QrCodeEcc::Low, &options),
        Err(QrError::InvalidVersionRange { min: 9, max: 4 })
    );
}

#[test]
fn invalid_segment_inputs() {
    assert_eq!(QrSegment::make_numeric("12a4"), Err(QrError::InvalidNumeric));
    assert_eq!(QrSegment::make_alphanumeric("hello"), Err(QrError::InvalidAlphanumeric));
    assert_eq!(QrSegment::make_kanji("点A"), Err(QrError::InvalidKanji));
    assert_eq!(QrSegment::make_eci(1_000_000), Err(QrError::InvalidEci(1_000_000)));
    assert_eq!(Version::new(41), Err(QrError::InvalidVersion(41)));
    assert_eq!(Mask::new(8), Err(QrError::InvalidMask(8)));
}

#[test]
fn eci_then_bytes() {
    let text = "héllo";
    let segs = vec![QrSegment::make_eci(26).unwrap(), QrSegment::make_bytes(text.as_bytes())];
    assert_eq!(segs[0].mode(), QrSegmentMode::Eci);
    assert_eq!(QrSegment::get_total_bits(&segs, Version::MIN), Some(12 + 60));

    let (data, _, version) =
        encode_segments_to_codewords(&segs, QrCodeEcc::Low, Version::MIN, Version::MAX, true)
            .unwrap();
    assert_eq!(version, Version::MIN);
    // 0111 00011010 | 0100 00000110 | 01101000 ...
    assert_eq!(&data[..3], &[0x71, 0xA4, 0x06]);

    let qr = QrCode::encode_segments(&segs, QrCodeEcc::Low).unwrap();
    assert_eq!(qr.version(), Version::MIN);
}

#[test]
fn kanji_segment_symbol() {
    let seg = QrSegment::make_kanji("点茗").unwrap();
    assert_eq!(seg.num_chars(), 2);
    assert_eq!(seg.data().len(), 26);
    let qr = QrCode::encode_segments(&[seg], QrCodeEcc::Medium).unwrap();
    assert_eq!(qr.version(), Version::MIN);
}

#[test]
fn low_level_codewords_round_through_the_matrix() {
    let v2 = Version::new(2).unwrap();
    let data = vec![0xEC; 34];
    let mask = Mask::new(1).unwrap();
    let qr = QrCode::encode_codewords(v2, QrCodeEcc::Low, &data, Some(mask)).unwrap();
    assert_eq!(qr.version(), v2);
    assert_eq!(qr.mask(), mask);
    assert_eq!(qr.error_correction_level(), QrCodeEcc::Low);
    // Always-dark module next to the lower left format bits
    assert!(qr.get_module(8, qr.size() - 8));
}
