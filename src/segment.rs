use crate::bits::BitBuffer;
use crate::error::{QrError, Result};
use crate::kanji;
use crate::mode::QrSegmentMode;
use crate::qrcode::Version;

/// A segment of character/binary/control data in a QR Code symbol.
///
/// Instances of this struct are immutable.
///
/// The mid-level way to create a segment is to take the payload data
/// and call a static factory function such as `QrSegment::make_numeric()`.
/// The low-level way to create a segment is to custom-make the bit buffer
/// and call the `QrSegment::new()` constructor with appropriate values.
///
/// This segment struct imposes no length restrictions, but QR Codes have restrictions.
/// Even in the most favorable conditions, a QR Code can only hold 7089 characters of data.
/// Any segment longer than this is meaningless for the purpose of generating QR Codes.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrSegment {
    mode: QrSegmentMode,

    // The length of this segment's unencoded data. Measured in characters for
    // numeric/alphanumeric/kanji mode, bytes for byte mode, and 0 for ECI mode.
    numchars: usize,

    data: Vec<bool>,
}

impl QrSegment {
    /// Returns a segment representing the given binary data encoded in byte mode.
    ///
    /// All input byte slices are acceptable.
    pub fn make_bytes(data: &[u8]) -> Self {
        let mut bb = BitBuffer::with_capacity(data.len() * 8);
        for &b in data {
            bb.append_bits(u32::from(b), 8);
        }
        QrSegment::new(QrSegmentMode::Byte, data.len(), bb.into_bits())
    }

    /// Returns a segment representing the given string of decimal digits encoded in numeric mode.
    ///
    /// Fails with `InvalidNumeric` if the string contains non-digit characters.
    pub fn make_numeric(text: &str) -> Result<Self> {
        let mut bb = BitBuffer::with_capacity(text.len() * 3 + (text.len() + 2) / 3);
        let mut accumdata: u32 = 0;
        let mut accumcount: u8 = 0;
        for b in text.bytes() {
            if !b.is_ascii_digit() {
                return Err(QrError::InvalidNumeric);
            }
            accumdata = accumdata * 10 + u32::from(b - b'0');
            accumcount += 1;
            if accumcount == 3 {
                bb.append_bits(accumdata, 10);
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            // 1 or 2 digits remaining
            bb.append_bits(accumdata, accumcount * 3 + 1);
        }
        Ok(QrSegment::new(QrSegmentMode::Numeric, text.len(), bb.into_bits()))
    }

    /// Returns a segment representing the given text string encoded in alphanumeric mode.
    ///
    /// The characters allowed are: 0 to 9, A to Z (uppercase only), space,
    /// dollar, percent, asterisk, plus, hyphen, period, slash, colon.
    ///
    /// Fails with `InvalidAlphanumeric` if the string contains any other character.
    pub fn make_alphanumeric(text: &str) -> Result<Self> {
        let mut bb = BitBuffer::with_capacity(text.len() * 6);
        let mut accumdata: u32 = 0;
        let mut accumcount: u8 = 0;
        let mut numchars: usize = 0;
        for c in text.chars() {
            let i = alphanumeric_index(c).ok_or(QrError::InvalidAlphanumeric)?;
            accumdata = accumdata * 45 + i;
            accumcount += 1;
            numchars += 1;
            if accumcount == 2 {
                bb.append_bits(accumdata, 11);
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            // 1 character remaining
            bb.append_bits(accumdata, 6);
        }
        Ok(QrSegment::new(QrSegmentMode::Alphanumeric, numchars, bb.into_bits()))
    }

    /// Returns a segment representing the given text encoded in kanji mode.
    ///
    /// Every character must be one of the double-byte Shift JIS characters
    /// that QR kanji mode covers; otherwise fails with `InvalidKanji`.
    pub fn make_kanji(text: &str) -> Result<Self> {
        let mut bb = BitBuffer::new();
        let mut numchars: usize = 0;
        for c in text.chars() {
            let val = kanji::to_qr_kanji(c).ok_or(QrError::InvalidKanji)?;
            bb.append_bits(u32::from(val), 13);
            numchars += 1;
        }
        Ok(QrSegment::new(QrSegmentMode::Kanji, numchars, bb.into_bits()))
    }

    /// Returns a list of zero or more segments to represent the given Unicode text string.
    ///
    /// The whole string goes into one segment: numeric if it is all digits,
    /// else alphanumeric if every character allows it, else byte mode over
    /// its UTF-8 encoding. See [`crate::optimal`] for mixed-mode output.
    pub fn make_segments(text: &str) -> Vec<Self> {
        if text.is_empty() {
            return vec![];
        }
        let seg: Option<Self> = if QrSegment::is_numeric(text) {
            QrSegment::make_numeric(text).ok()
        } else if QrSegment::is_alphanumeric(text) {
            QrSegment::make_alphanumeric(text).ok()
        } else {
            None
        };
        vec![seg.unwrap_or_else(|| QrSegment::make_bytes(text.as_bytes()))]
    }

    /// Returns a segment representing an Extended Channel Interpretation
    /// (ECI) designator with the given assignment value.
    ///
    /// Fails with `InvalidEci` if the value is 1 000 000 or more.
    pub fn make_eci(assignval: u32) -> Result<Self> {
        let mut bb = BitBuffer::with_capacity(24);
        if assignval < (1 << 7) {
            bb.append_bits(assignval, 8);
        } else if assignval < (1 << 14) {
            bb.append_bits(0b10, 2);
            bb.append_bits(assignval, 14);
        } else if assignval < 1_000_000 {
            bb.append_bits(0b110, 3);
            bb.append_bits(assignval, 21);
        } else {
            return Err(QrError::InvalidEci(assignval));
        }
        Ok(QrSegment::new(QrSegmentMode::Eci, 0, bb.into_bits()))
    }

    /// Creates a new QR Code segment with the given attributes and data.
    ///
    /// The character count (numchars) must agree with the mode and
    /// the data length, but the constraint isn't checked.
    pub fn new(mode: QrSegmentMode, numchars: usize, data: Vec<bool>) -> Self {
        Self {
            mode,
            numchars,
            data,
        }
    }

    pub fn mode(&self) -> QrSegmentMode {
        self.mode
    }

    pub fn num_chars(&self) -> usize {
        self.numchars
    }

    pub fn data(&self) -> &[bool] {
        &self.data
    }

    /// Calculates the number of bits needed to encode the given segments at the given version.
    ///
    /// Returns `None` if a segment has too many characters to fit its length
    /// field, or the total bits exceeds `usize::MAX`.
    pub fn get_total_bits(segs: &[Self], version: Version) -> Option<usize> {
        let mut result: usize = 0;
        for seg in segs {
            let ccbits: u8 = seg.mode.num_char_count_bits(version);
            // ccbits can be as large as 16, but usize can be as small as 16
            if let Some(limit) = 1usize.checked_shl(ccbits.into()) {
                if seg.numchars >= limit {
                    return None; // The segment's length doesn't fit the field's bit width
                }
            }
            result = result.checked_add(4 + usize::from(ccbits))?;
            result = result.checked_add(seg.data.len())?;
        }
        Some(result)
    }

    /// Tests whether the given string can be encoded as a segment in numeric mode.
    pub fn is_numeric(text: &str) -> bool {
        text.chars().all(|c| c.is_ascii_digit())
    }

    /// Tests whether the given string can be encoded as a segment in alphanumeric mode.
    pub fn is_alphanumeric(text: &str) -> bool {
        text.chars().all(|c| alphanumeric_index(c).is_some())
    }

    /// Tests whether the given string can be encoded as a segment in kanji mode.
    pub fn is_kanji(text: &str) -> bool {
        text.chars().all(kanji::is_kanji)
    }
}

/// The set of all legal characters in alphanumeric mode,
/// where each character value maps to the index in the string.
pub(crate) static ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

pub(crate) fn alphanumeric_index(c: char) -> Option<u32> {
    ALPHANUMERIC_CHARSET
        .find(c)
        .and_then(|i| u32::try_from(i).ok())
}
