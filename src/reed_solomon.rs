//! Reed-Solomon error correction over GF(2^8/0x11D).

use crate::error::{QrError, Result};

/// Computes the Reed-Solomon error correction codewords for a sequence of data
/// codewords at a given degree.
///
/// Objects are immutable, and the state only depends on the degree. This
/// struct may be reused across data blocks with the same number of ECC codewords.
pub struct ReedSolomonGenerator {
    // Coefficients of the divisor polynomial, stored from highest to lowest power,
    // excluding the leading term which is always 1. For example the polynomial
    // x^3 + 255x^2 + 8x + 93 is stored as the array [255, 8, 93].
    divisor: Vec<u8>,
}

impl ReedSolomonGenerator {
    /// Creates a Reed-Solomon ECC generator polynomial for the given degree.
    ///
    /// QR Codes only use degrees 7..=30. Fails with `InvalidEccDegree` outside 1..=255.
    pub fn new(degree: usize) -> Result<Self> {
        if !(1..=255).contains(&degree) {
            return Err(QrError::InvalidEccDegree(degree));
        }
        // Start off with the monomial x^0
        let mut divisor = vec![0u8; degree];
        divisor[degree - 1] = 1;

        // Compute the product polynomial (x - r^0) * (x - r^1) * (x - r^2) * ... * (x - r^{degree-1}),
        // and drop the highest monomial term which is always 1x^degree.
        // Note that r = 0x02, which is a generator element of this field GF(2^8/0x11D).
        let mut root: u8 = 1;
        for _ in 0..degree {
            // Multiply the current product by (x - r^i)
            for j in 0..degree {
                divisor[j] = multiply(divisor[j], root);
                if j + 1 < degree {
                    divisor[j] ^= divisor[j + 1];
                }
            }
            root = multiply(root, 0x02);
        }
        Ok(Self { divisor })
    }

    pub fn degree(&self) -> usize {
        self.divisor.len()
    }

    pub fn divisor(&self) -> &[u8] {
        &self.divisor
    }

    /// Returns the Reed-Solomon error correction codeword for the given data.
    ///
    /// The result has `degree()` bytes: the remainder of the data polynomial
    /// (times x^degree) divided by the generator polynomial.
    pub fn compute_remainder(&self, data: &[u8]) -> Vec<u8> {
        let mut result = vec![0u8; self.divisor.len()];
        for &b in data {
            // Polynomial division
            let factor: u8 = b ^ result[0];
            result.remove(0);
            result.push(0);
            for (x, &y) in result.iter_mut().zip(self.divisor.iter()) {
                *x ^= multiply(y, factor);
            }
        }
        result
    }
}

/// Returns the product of the two given field elements modulo GF(2^8/0x11D).
///
/// All inputs are valid. This could be implemented as a 256*256 lookup table.
pub fn multiply(x: u8, y: u8) -> u8 {
    // Russian peasant multiplication
    let mut z: u8 = 0;
    for i in (0..8).rev() {
        z = (z << 1) ^ ((z >> 7) * 0x1D);
        z ^= ((y >> i) & 1) * x;
    }
    z
}
