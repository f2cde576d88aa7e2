/// An appendable sequence of bits (0s and 1s).
///
/// Bits are appended most significant first; segments and the codeword
/// assembler both build on this.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitBuffer(Vec<bool>);

impl BitBuffer {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self(Vec::with_capacity(bits))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    /// Appends the given number of low-order bits of the given value to this buffer.
    ///
    /// Requires `len <= 31` and `val < 2^len`.
    pub fn append_bits(&mut self, val: u32, len: u8) {
        debug_assert!(len <= 31 && (val >> len) == 0, "value does not fit in {} bits", len);
        self.0.extend((0..len).rev().map(|i| get_bit(val, i)));
    }

    pub fn extend_from_bits(&mut self, bits: &[bool]) {
        self.0.extend_from_slice(bits);
    }

    /// Packs the bits into bytes, big endian. A trailing partial byte is padded with zeros.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0
            .chunks(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0u8, |acc, (i, &bit)| acc | (u8::from(bit) << (7 - i)))
            })
            .collect()
    }

    pub fn into_bits(self) -> Vec<bool> {
        self.0
    }
}

/// Returns true iff the i'th bit of x is set to 1.
pub(crate) fn get_bit(x: u32, i: u8) -> bool {
    ((x >> i) & 1) != 0
}
