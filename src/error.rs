//! Error types returned by every encoding entry point.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, QrError>;

/// Error type for when data exceeds QR code capacity.
///
/// Ways to handle this error include:
///
/// - Decrease the error correction level if it was greater than `QrCodeEcc::Low`.
/// - Increase the maxversion argument if it was less than `Version::MAX`.
/// - Split the text data into better or optimal segments to reduce the number of bits required.
/// - Change the text or binary data to be shorter.
/// - Change the text to fit the character set of a particular segment mode (e.g. alphanumeric).
/// - Propagate the error upward to the caller/user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataTooLong {
    /// The bit length could not be represented: a segment holds more
    /// characters than its count field allows, or the total overflowed.
    #[error("Segment too long")]
    SegmentTooLong,
    /// Data length in bits, and the capacity in bits at the largest permitted version.
    #[error("Data length = {0} bits, Max capacity = {1} bits")]
    DataOverCapacity(usize, usize),
}

/// Everything that can go wrong while building segments or a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrError {
    #[error("version number {0} out of range [1, 40]")]
    InvalidVersion(u8),

    #[error("mask value {0} out of range [0, 7]")]
    InvalidMask(u8),

    #[error("invalid version range: min {min} > max {max}")]
    InvalidVersionRange { min: u8, max: u8 },

    #[error("string contains non-numeric characters")]
    InvalidNumeric,

    #[error("string contains unencodable characters in alphanumeric mode")]
    InvalidAlphanumeric,

    #[error("string contains characters not encodable in kanji mode")]
    InvalidKanji,

    #[error("ECI assignment value {0} out of range")]
    InvalidEci(u32),

    #[error("Reed-Solomon degree {0} out of range [1, 255]")]
    InvalidEccDegree(usize),

    #[error("expected {expected} data codewords, got {actual}")]
    InvalidCodewordCount { expected: usize, actual: usize },

    #[error(transparent)]
    DataTooLong(#[from] DataTooLong),
}
