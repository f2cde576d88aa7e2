mod common;

use common::*;
use proptest::prelude::*;
use qrmatrix::optimal::make_segments_optimally;
use qrmatrix::{EncodeOptions, QrCode, QrCodeEcc, QrSegment, Version};

fn ecl_strategy() -> impl Strategy<Value = QrCodeEcc> {
    prop_oneof![
        Just(QrCodeEcc::Low),
        Just(QrCodeEcc::Medium),
        Just(QrCodeEcc::Quartile),
        Just(QrCodeEcc::High),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn symbol_size_follows_version(text in "\\PC{0,80}", ecl in ecl_strategy()) {
        init_test_logging();
        let qr = QrCode::encode_text(&text, ecl).unwrap();
        prop_assert_eq!(qr.size(), i32::from(qr.version().value()) * 4 + 17);
        prop_assert!(qr.error_correction_level() >= ecl);
    }

    #[test]
    fn modules_outside_the_grid_are_light(data in prop::collection::vec(any::<u8>(), 0..200), x in -50i32..250, y in -50i32..250) {
        let qr = QrCode::encode_binary(&data, QrCodeEcc::Medium).unwrap();
        let inside = (0..qr.size()).contains(&x) && (0..qr.size()).contains(&y);
        if !inside {
            prop_assert!(!qr.get_module(x, y));
        }
    }

    #[test]
    fn optimal_never_exceeds_single_mode(text in "[0-9A-Z $%*+./:a-zé点茗、]{0,60}", ver in 1u8..=40) {
        let version = Version::new(ver).unwrap();
        let optimal = make_segments_optimally(&text, version).unwrap();
        let optimal_bits = QrSegment::get_total_bits(&optimal, version).unwrap();

        let simple = QrSegment::make_segments(&text);
        prop_assert!(optimal_bits <= QrSegment::get_total_bits(&simple, version).unwrap());
        let bytes = [QrSegment::make_bytes(text.as_bytes())];
        prop_assert!(optimal_bits <= QrSegment::get_total_bits(&bytes, version).unwrap());
        if QrSegment::is_kanji(&text) {
            let kanji = [QrSegment::make_kanji(&text).unwrap()];
            prop_assert!(optimal_bits <= QrSegment::get_total_bits(&kanji, version).unwrap());
        }
    }

    #[test]
    fn optimal_segments_alternate_modes(text in "\\PC{1,40}") {
        let segs = make_segments_optimally(&text, Version::MIN).unwrap();
        prop_assert!(!segs.is_empty());
        prop_assert!(segs.iter().all(|seg| seg.num_chars() > 0));
        // Runs of one mode are merged, so neighbours always differ
        for pair in segs.windows(2) {
            prop_assert_ne!(pair[0].mode(), pair[1].mode());
        }
    }

    #[test]
    fn forced_mask_is_reported(text in "[A-Z0-9]{1,40}", m in 0u8..8) {
        let mask = qrmatrix::Mask::new(m).unwrap();
        let options = EncodeOptions::default().mask(Some(mask));
        let qr = QrCode::encode_text_with(&text, QrCodeEcc::Low, &options).unwrap();
        prop_assert_eq!(qr.mask(), mask);
    }
}
