//! QR code symbol and encoding entry points.
//!
//! This module provides the public face of the encoder: the immutable [`QrCode`] symbol,
//! the error correction level, version and mask value types, and the three levels of
//! encoding functions (text/binary, segments, raw data codewords).

use crate::codewords;
use crate::error::{QrError, Result};
use crate::matrix::MatrixBuilder;
use crate::optimal;
use crate::options::EncodeOptions;
use crate::segment::QrSegment;

/// A QR Code symbol, which is a type of two-dimension barcode.
///
/// Invented by Denso Wave and described in the ISO/IEC 18004 standard.
/// Instances of this struct represent an immutable square grid of dark and light cells.
/// The struct provides static factory functions to create a QR Code from text or binary data.
/// The struct covers the QR Code Model 2 specification, supporting all versions
/// (sizes) from 1 to 40, all 4 error correction levels, and 4 character encoding modes.
///
/// # Creation
///
/// - High-level: Use [`QrCode::encode_text`], [`QrCode::encode_text_optimally`] or
///   [`QrCode::encode_binary`].
/// - Mid-level: Build a list of [`QrSegment`] values and call [`QrCode::encode_segments_with`].
/// - Low-level: Supply padded data codewords to [`QrCode::encode_codewords`].
///
/// # Example
///
/// ```rust
/// use qrmatrix::{QrCode, QrCodeEcc};
///
/// let qr = QrCode::encode_text("Hello, World!", QrCodeEcc::Low).unwrap();
/// println!("Version: {}", qr.version().value());
/// assert!(qr.get_module(0, 0));
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrCode {
    // The version number of this QR Code, which is between 1 and 40 (inclusive).
    // This determines the size of this barcode.
    version: Version,

    // The width and height of this QR Code, measured in modules, between
    // 21 and 177 (inclusive). This is equal to version * 4 + 17.
    size: i32,

    // The error correction level used in this QR Code.
    errorcorrectionlevel: QrCodeEcc,

    // The index of the mask pattern used in this QR Code, which is between 0 and 7 (inclusive).
    // Even if a QR Code is created with automatic masking requested (mask = None),
    // the resulting object still has a mask value between 0 and 7.
    mask: Mask,

    // The modules of this QR Code (false = light, true = dark), row major.
    // Immutable after constructor finishes. Accessed through get_module().
    modules: Vec<bool>,
}

impl QrCode {
    /// Returns a QR Code representing the given Unicode text string at the given error correction level.
    ///
    /// The smallest possible QR Code version is automatically chosen for the output. The ECC level
    /// of the result may be higher than the `ecl` argument if it can be done without increasing
    /// the version. The whole string becomes a single numeric, alphanumeric or byte segment.
    pub fn encode_text(text: &str, ecl: QrCodeEcc) -> Result<Self> {
        QrCode::encode_text_with(text, ecl, &EncodeOptions::default())
    }

    /// Like [`QrCode::encode_text`], with an explicit version range, mask and boost setting.
    pub fn encode_text_with(text: &str, ecl: QrCodeEcc, options: &EncodeOptions) -> Result<Self> {
        let segs: Vec<QrSegment> = QrSegment::make_segments(text);
        QrCode::encode_segments_with(&segs, ecl, options)
    }

    /// Returns a QR Code for the given text, switching between numeric, alphanumeric,
    /// byte and kanji modes wherever that shortens the bit stream.
    ///
    /// ```rust
    /// use qrmatrix::{EncodeOptions, QrCode, QrCodeEcc};
    ///
    /// let qr = QrCode::encode_text_optimally(
    ///     "Order 20240117: 3 items",
    ///     QrCodeEcc::Medium,
    ///     &EncodeOptions::default(),
    /// ).unwrap();
    /// assert_eq!(qr.size(), qr.version().value() as i32 * 4 + 17);
    /// ```
    pub fn encode_text_optimally(
        text: &str,
        ecl: QrCodeEcc,
        options: &EncodeOptions,
    ) -> Result<Self> {
        options.validate()?;
        let segs: Vec<QrSegment> =
            optimal::make_segments_for_range(text, ecl, options.min_version, options.max_version)?;
        QrCode::encode_segments_with(&segs, ecl, options)
    }

    /// Returns a QR Code representing the given binary data at the given error correction level.
    ///
    /// The data is always encoded as a single byte mode segment.
    pub fn encode_binary(data: &[u8], ecl: QrCodeEcc) -> Result<Self> {
        QrCode::encode_binary_with(data, ecl, &EncodeOptions::default())
    }

    pub fn encode_binary_with(data: &[u8], ecl: QrCodeEcc, options: &EncodeOptions) -> Result<Self> {
        let segs: [QrSegment; 1] = [QrSegment::make_bytes(data)];
        QrCode::encode_segments_with(&segs, ecl, options)
    }

    /// Returns a QR Code representing the given segments at the given error correction level.
    ///
    /// This function allows the user to create a custom sequence of segments that switches
    /// between modes (such as alphanumeric and byte) to encode text in less space.
    pub fn encode_segments(segs: &[QrSegment], ecl: QrCodeEcc) -> Result<Self> {
        QrCode::encode_segments_with(segs, ecl, &EncodeOptions::default())
    }

    /// Returns a QR Code representing the given segments with the given encoding parameters.
    ///
    /// The smallest possible QR Code version within the given range is automatically
    /// chosen for the output. Iff `boost_ecl` is `true`, then the ECC level of the
    /// result may be higher than the `ecl` argument if it can be done without increasing
    /// the version. The mask is either between 0 to 7 to force that mask, or `None`
    /// to automatically choose an appropriate mask (which may be slow).
    ///
    /// Returns a wrapped `QrCode` if successful, or `Err` if the data is too
    /// long to fit in any version in the given range at the given ECC level.
    pub fn encode_segments_with(
        segs: &[QrSegment],
        ecl: QrCodeEcc,
        options: &EncodeOptions,
    ) -> Result<Self> {
        options.validate()?;
        let (datacodewords, ecl, version) = codewords::encode_segments_to_codewords(
            segs,
            ecl,
            options.min_version,
            options.max_version,
            options.boost_ecl,
        )?;
        QrCode::encode_codewords(version, ecl, &datacodewords, options.mask)
    }

    /// Creates a new QR Code with the given version number,
    /// error correction level, data codeword bytes, and mask number.
    ///
    /// This is a low-level API that most users should not use directly.
    /// A mid-level API is the `encode_segments_with()` function.
    ///
    /// The data codewords must already be terminated and padded to exactly
    /// the data capacity of `version` at `ecl`.
    pub fn encode_codewords(
        version: Version,
        ecl: QrCodeEcc,
        datacodewords: &[u8],
        mask: Option<Mask>,
    ) -> Result<Self> {
        // Compute ECC, draw modules, do masking
        let allcodewords: Vec<u8> = codewords::add_ecc_and_interleave(datacodewords, version, ecl)?;
        let mut builder = MatrixBuilder::new(version, ecl);
        builder.draw_function_patterns();
        builder.draw_codewords(&allcodewords);
        Ok(builder.finish(mask))
    }

    pub(crate) fn from_parts(
        version: Version,
        errorcorrectionlevel: QrCodeEcc,
        mask: Mask,
        modules: Vec<bool>,
    ) -> Self {
        let size = i32::from(version.value()) * 4 + 17;
        debug_assert_eq!(modules.len(), (size * size) as usize);
        Self {
            version,
            size,
            errorcorrectionlevel,
            mask,
            modules,
        }
    }

    /// Returns this QR Code's version, in the range [1, 40].
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns this QR Code's size, in the range [21, 177].
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Returns this QR Code's error correction level.
    pub fn error_correction_level(&self) -> QrCodeEcc {
        self.errorcorrectionlevel
    }

    /// Returns this QR Code's mask, in the range [0, 7].
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Returns the color of the module (pixel) at the given coordinates,
    /// which is `false` for light or `true` for dark.
    ///
    /// The top left corner has the coordinates (x=0, y=0). If the given
    /// coordinates are out of bounds, then `false` (light) is returned.
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        let range = 0..self.size;
        range.contains(&x) && range.contains(&y) && self.modules[(y * self.size + x) as usize]
    }
}

/// The error correction level in a QR Code symbol.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum QrCodeEcc {
    /// The QR Code can tolerate about  7% erroneous codewords.
    Low,
    /// The QR Code can tolerate about 15% erroneous codewords.
    Medium,
    /// The QR Code can tolerate about 25% erroneous codewords.
    Quartile,
    /// The QR Code can tolerate about 30% erroneous codewords.
    High,
}

impl QrCodeEcc {
    /// Returns an unsigned 2-bit integer (in the range 0 to 3).
    pub(crate) fn ordinal(self) -> usize {
        use QrCodeEcc::*;
        match self {
            Low => 0,
            Medium => 1,
            Quartile => 2,
            High => 3,
        }
    }

    /// Returns an unsigned 2-bit integer (in the range 0 to 3).
    pub(crate) fn format_bits(self) -> u8 {
        use QrCodeEcc::*;
        match self {
            Low => 1,
            Medium => 0,
            Quartile => 3,
            High => 2,
        }
    }
}

/// A number between 1 and 40 (inclusive).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// Fails with `InvalidVersion` if the number is outside the range [1, 40].
    pub fn new(ver: u8) -> Result<Self> {
        if (Version::MIN.value()..=Version::MAX.value()).contains(&ver) {
            Ok(Self(ver))
        } else {
            Err(QrError::InvalidVersion(ver))
        }
    }

    /// Returns the value, which is in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the width and height of a symbol of this version, in modules.
    pub const fn size(self) -> i32 {
        self.0 as i32 * 4 + 17
    }

    // Callers stop at Version::MAX.
    pub(crate) fn successor(self) -> Self {
        debug_assert!(self < Version::MAX);
        Self(self.0 + 1)
    }
}

impl TryFrom<u8> for Version {
    type Error = QrError;

    fn try_from(ver: u8) -> Result<Self> {
        Version::new(ver)
    }
}

/// A number between 0 and 7 (inclusive).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Mask(u8);

impl Mask {
    pub(crate) const ZERO: Mask = Mask(0);

    /// Creates a mask object from the given number.
    ///
    /// Fails with `InvalidMask` if the number is outside the range [0, 7].
    pub fn new(mask: u8) -> Result<Self> {
        if mask <= 7 {
            Ok(Self(mask))
        } else {
            Err(QrError::InvalidMask(mask))
        }
    }

    /// All eight masks in index order.
    pub fn all() -> impl Iterator<Item = Mask> {
        (0u8..8).map(Mask)
    }

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Whether this mask pattern flips the module at (x, y).
    pub fn inverts(self, x: i32, y: i32) -> bool {
        match self.0 {
            0 => (x + y) % 2 == 0,
            1 => y % 2 == 0,
            2 => x % 3 == 0,
            3 => (x + y) % 3 == 0,
            4 => (x / 3 + y / 2) % 2 == 0,
            5 => x * y % 2 + x * y % 3 == 0,
            6 => (x * y % 2 + x * y % 3) % 2 == 0,
            7 => ((x + y) % 2 + x * y % 3) % 2 == 0,
            _ => unreachable!(),
        }
    }
}

impl TryFrom<u8> for Mask {
    type Error = QrError;

    fn try_from(mask: u8) -> Result<Self> {
        Mask::new(mask)
    }
}
