use crate::qrcode::Version;

/// Describes how a segment's data bits are interpreted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum QrSegmentMode {
    Numeric,
    Alphanumeric,
    Byte,
    Kanji,
    Eci,
}

impl QrSegmentMode {
    /// Returns the 4-bit mode indicator.
    pub fn mode_bits(self) -> u32 {
        use QrSegmentMode::*;
        match self {
            Numeric => 0x1,
            Alphanumeric => 0x2,
            Byte => 0x4,
            Kanji => 0x8,
            Eci => 0x7,
        }
    }

    /// Returns the bit width of the character count field for a segment in
    /// this mode in a QR Code at the given version number.
    pub fn num_char_count_bits(self, ver: Version) -> u8 {
        use QrSegmentMode::*;
        (match self {
            Numeric => [10, 12, 14],
            Alphanumeric => [9, 11, 13],
            Byte => [8, 16, 16],
            Kanji => [8, 10, 12],
            Eci => [0, 0, 0],
        })[version_tier(ver)]
    }
}

/// Versions 1-9, 10-26 and 27-40 map to tiers 0, 1 and 2.
pub(crate) fn version_tier(ver: Version) -> usize {
    usize::from((ver.value() + 7) / 17)
}
