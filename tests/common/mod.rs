#![allow(dead_code)]
//! Shared integration test utilities.
//!
//! Import with:
//! ```
//! mod common;
//! use common::*;
//! ```

use std::sync::Once;

use qrmatrix::QrCode;

static INIT_LOGGING: Once = Once::new();

/// Initialize test logging once per test binary. Output goes through the test writer,
/// so it only shows for failing tests or with `--nocapture`.
pub fn init_test_logging() {
    init_test_logging_with_level(tracing::Level::TRACE);
}

/// Initialize test logging with a custom level.
pub fn init_test_logging_with_level(level: tracing::Level) {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_test_writer()
            .with_target(true)
            .with_ansi(false)
            .try_init();
    });
}

/// Renders the grid as one string per row, `#` for dark and `.` for light.
pub fn grid_rows(qr: &QrCode) -> Vec<String> {
    (0..qr.size())
        .map(|y| {
            (0..qr.size())
                .map(|x| if qr.get_module(x, y) { '#' } else { '.' })
                .collect()
        })
        .collect()
}

pub fn dark_modules(qr: &QrCode) -> usize {
    grid_rows(qr)
        .iter()
        .map(|row| row.chars().filter(|&c| c == '#').count())
        .sum()
}
