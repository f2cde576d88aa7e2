//! Module grid construction: function patterns, codeword placement, masking.

use tracing::{debug, trace};

use crate::bits::get_bit;
use crate::codewords::get_num_raw_data_modules;
use crate::qrcode::{Mask, QrCode, QrCodeEcc, Version};

// For use in get_penalty_score(), when evaluating which mask is best.
const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;

/// Mutable grid used while a symbol is being drawn.
///
/// `isfunction` marks the modules that masking and codeword placement must skip.
/// It is dropped by [`MatrixBuilder::finish`], which hands the grid to an immutable [`QrCode`].
pub(crate) struct MatrixBuilder {
    version: Version,
    size: i32,
    errorcorrectionlevel: QrCodeEcc,
    modules: Vec<bool>,
    isfunction: Vec<bool>,
}

impl MatrixBuilder {
    /// Allocates an all-light grid for the given version.
    pub fn new(version: Version, ecl: QrCodeEcc) -> Self {
        let size = version.size();
        let area = (size * size) as usize;
        Self {
            version,
            size,
            errorcorrectionlevel: ecl,
            modules: vec![false; area],
            isfunction: vec![false; area],
        }
    }

    fn index(&self, x: i32, y: i32) -> usize {
        debug_assert!((0..self.size).contains(&x) && (0..self.size).contains(&y));
        (y * self.size + x) as usize
    }

    pub fn get_module(&self, x: i32, y: i32) -> bool {
        self.modules[self.index(x, y)]
    }

    // Sets the color of a module and marks it as a function module.
    fn set_function_module(&mut self, x: i32, y: i32, isdark: bool) {
        let i = self.index(x, y);
        self.modules[i] = isdark;
        self.isfunction[i] = true;
    }

    /*---- Function patterns ----*/

    /// Draws timing, finder, alignment, format and version modules, marking each as a function module.
    pub fn draw_function_patterns(&mut self) {
        // Draw horizontal and vertical timing patterns
        let size: i32 = self.size;
        for i in 0..size {
            self.set_function_module(6, i, i % 2 == 0);
            self.set_function_module(i, 6, i % 2 == 0);
        }

        // Draw 3 finder patterns (all corners except bottom right; overwrites some timing modules)
        self.draw_finder_pattern(3, 3);
        self.draw_finder_pattern(size - 4, 3);
        self.draw_finder_pattern(3, size - 4);

        // Draw numerous alignment patterns
        let alignpatpos: Vec<i32> = alignment_pattern_positions(self.version);
        let numalign: usize = alignpatpos.len();
        for i in 0..numalign {
            for j in 0..numalign {
                // Don't draw on the three finder corners
                if !((i == 0 && j == 0) || (i == 0 && j == numalign - 1) || (i == numalign - 1 && j == 0)) {
                    self.draw_alignment_pattern(alignpatpos[i], alignpatpos[j]);
                }
            }
        }

        // Draw configuration data. The dummy mask value is overwritten later in finish()
        self.draw_format_bits(Mask::ZERO);
        self.draw_version();
    }

    // Draws a 9*9 finder pattern including the border separator,
    // with the center module at (x, y). Modules can be out of bounds.
    fn draw_finder_pattern(&mut self, x: i32, y: i32) {
        for dy in -4..=4 {
            for dx in -4..=4 {
                let xx: i32 = x + dx;
                let yy: i32 = y + dy;
                if (0..self.size).contains(&xx) && (0..self.size).contains(&yy) {
                    let dist: i32 = std::cmp::max(dx.abs(), dy.abs()); // Chebyshev/infinity norm
                    self.set_function_module(xx, yy, dist != 2 && dist != 4);
                }
            }
        }
    }

    // Draws a 5*5 alignment pattern, with the center module
    // at (x, y). All modules must be in bounds.
    fn draw_alignment_pattern(&mut self, x: i32, y: i32) {
        for dy in -2..=2 {
            for dx in -2..=2 {
                self.set_function_module(x + dx, y + dy, std::cmp::max(dx.abs(), dy.abs()) != 1);
            }
        }
    }

    // Draws two copies of the format bits (with its own error correction code)
    // based on the given mask and this object's error correction level field.
    fn draw_format_bits(&mut self, mask: Mask) {
        let bits: u32 = format_bits(self.errorcorrectionlevel, mask);

        // Draw first copy
        for i in 0..6 {
            self.set_function_module(8, i, get_bit(bits, i as u8));
        }
        self.set_function_module(8, 7, get_bit(bits, 6));
        self.set_function_module(8, 8, get_bit(bits, 7));
        self.set_function_module(7, 8, get_bit(bits, 8));
        for i in 9..15 {
            self.set_function_module(14 - i, 8, get_bit(bits, i as u8));
        }

        // Draw second copy
        let size: i32 = self.size;
        for i in 0..8 {
            self.set_function_module(size - 1 - i, 8, get_bit(bits, i as u8));
        }
        for i in 8..15 {
            self.set_function_module(8, size - 15 + i, get_bit(bits, i as u8));
        }
        self.set_function_module(8, size - 8, true); // Always dark
    }

    // Draws two copies of the version bits (with its own error correction code),
    // based on this object's version field, iff 7 <= version <= 40.
    fn draw_version(&mut self) {
        if self.version.value() < 7 {
            return;
        }
        let bits: u32 = version_bits(self.version);

        // Draw two copies
        for i in 0..18 {
            let bit: bool = get_bit(bits, i as u8);
            let a: i32 = self.size - 11 + i % 3;
            let b: i32 = i / 3;
            self.set_function_module(a, b, bit);
            self.set_function_module(b, a, bit);
        }
    }

    /*---- Codewords and masking ----*/

    /// Draws the given sequence of 8-bit codewords (data and error correction) onto the entire
    /// data area of this QR Code. Function modules need to be marked off before this is called.
    pub fn draw_codewords(&mut self, data: &[u8]) {
        debug_assert_eq!(data.len(), get_num_raw_data_modules(self.version) / 8);

        let size: i32 = self.size;
        let mut i: usize = 0; // Bit index into the data
        // Do the funny zigzag scan
        let mut right: i32 = size - 1;
        while right >= 1 {
            // Index of right column in each column pair
            if right == 6 {
                right = 5;
            }
            for vert in 0..size {
                // Vertical counter
                for j in 0..2 {
                    let x: i32 = right - j; // Actual x coordinate
                    let upward: bool = (right + 1) & 2 == 0;
                    let y: i32 = if upward { size - 1 - vert } else { vert }; // Actual y coordinate
                    let idx = self.index(x, y);
                    if !self.isfunction[idx] && i < data.len() * 8 {
                        self.modules[idx] = get_bit(u32::from(data[i >> 3]), 7 - ((i & 7) as u8));
                        i += 1;
                    }
                    // If this QR Code has any remainder bits (0 to 7), they were assigned as
                    // 0/false/light by the constructor and are left unchanged by this method
                }
            }
            right -= 2;
        }
        debug_assert_eq!(i, data.len() * 8);
    }

    /// XORs the codeword modules in this QR Code with the given mask pattern.
    ///
    /// The function modules must be marked and the codeword bits must be drawn
    /// before masking. Due to the arithmetic of XOR, calling `apply_mask()` with
    /// the same mask value a second time will undo the mask.
    pub fn apply_mask(&mut self, mask: Mask) {
        for y in 0..self.size {
            for x in 0..self.size {
                let idx = self.index(x, y);
                if !self.isfunction[idx] {
                    self.modules[idx] ^= mask.inverts(x, y);
                }
            }
        }
    }

    /// Applies the given mask, or the lowest-penalty one when `None`, draws the
    /// matching format bits and freezes the grid.
    pub fn finish(mut self, mask: Option<Mask>) -> QrCode {
        let mask: Mask = match mask {
            Some(m) => m,
            None => self.choose_mask(),
        };
        self.apply_mask(mask); // Apply the final choice of mask
        self.draw_format_bits(mask); // Overwrite old format bits
        QrCode::from_parts(self.version, self.errorcorrectionlevel, mask, self.modules)
    }

    // Scores every mask and keeps the first one with the minimum penalty.
    // The grid is left unmasked on return.
    fn choose_mask(&mut self) -> Mask {
        let mut penalties = [0i32; 8];
        for (mask, penalty) in Mask::all().zip(penalties.iter_mut()) {
            self.apply_mask(mask);
            self.draw_format_bits(mask);
            *penalty = self.get_penalty_score();
            trace!(mask = mask.value(), penalty = *penalty, "mask trial");
            self.apply_mask(mask); // Undoes the mask due to XOR
        }
        let best: Mask = lowest_penalty_mask(&penalties);
        debug!(mask = best.value(), penalty = penalties[usize::from(best.value())], "mask selected");
        best
    }

    /// Calculates and returns the penalty score based on state of this QR Code's current modules.
    /// This is used by the automatic mask choice algorithm to find the mask pattern that yields the lowest score.
    pub fn get_penalty_score(&self) -> i32 {
        let mut result: i32 = 0;
        let size: i32 = self.size;

        // Adjacent modules in row having same color, and finder-like patterns
        for y in 0..size {
            result += self.line_penalty(|x| self.get_module(x, y));
        }
        // Adjacent modules in column having same color, and finder-like patterns
        for x in 0..size {
            result += self.line_penalty(|y| self.get_module(x, y));
        }

        // 2*2 blocks of modules having same color
        for y in 0..size - 1 {
            for x in 0..size - 1 {
                let color: bool = self.get_module(x, y);
                if color == self.get_module(x + 1, y)
                    && color == self.get_module(x, y + 1)
                    && color == self.get_module(x + 1, y + 1)
                {
                    result += PENALTY_N2;
                }
            }
        }

        // Balance of dark and light modules
        let dark: i32 = self.modules.iter().filter(|&&m| m).count() as i32;
        let total: i32 = size * size; // Note that size is odd, so dark/total != 1/2
        // Compute the smallest integer k >= 0 such that (45-5k)% <= dark/total <= (55+5k)%
        let k: i32 = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
        debug_assert!((0..=9).contains(&k));
        result += k * PENALTY_N4;
        result
    }

    // Scores one row or column for rule N1 (runs of five or more) and rule N3 (finder-like patterns).
    fn line_penalty(&self, module_at: impl Fn(i32) -> bool) -> i32 {
        let mut result: i32 = 0;
        let mut runcolor = false;
        let mut runlen: i32 = 0;
        let mut runhistory = FinderPenalty::new(self.size);
        for i in 0..self.size {
            if module_at(i) == runcolor {
                runlen += 1;
                if runlen == 5 {
                    result += PENALTY_N1;
                } else if runlen > 5 {
                    result += 1;
                }
            } else {
                runhistory.add_history(runlen);
                if !runcolor {
                    result += runhistory.count_patterns() * PENALTY_N3;
                }
                runcolor = module_at(i);
                runlen = 1;
            }
        }
        result + runhistory.terminate_and_count(runcolor, runlen) * PENALTY_N3
    }

    #[cfg(test)]
    fn is_function(&self, x: i32, y: i32) -> bool {
        self.isfunction[self.index(x, y)]
    }
}

// Index of the first minimum; a later equal score never replaces an earlier one.
fn lowest_penalty_mask(penalties: &[i32; 8]) -> Mask {
    let mut best: Mask = Mask::ZERO;
    let mut minpenalty = i32::MAX;
    for (mask, &penalty) in Mask::all().zip(penalties.iter()) {
        if penalty < minpenalty {
            best = mask;
            minpenalty = penalty;
        }
    }
    best
}

/// Returns an ascending list of positions of alignment patterns for this version number.
///
/// Each position is in the range [0,177), and are used on both the x and y axes.
/// This could be implemented as lookup table of 40 variable-length lists of integers.
pub(crate) fn alignment_pattern_positions(version: Version) -> Vec<i32> {
    let ver = i32::from(version.value());
    if ver == 1 {
        return vec![];
    }
    let numalign: i32 = ver / 7 + 2;
    let step: i32 = if ver == 32 {
        26
    } else {
        (ver * 4 + numalign * 2 + 1) / (numalign * 2 - 2) * 2
    };
    let size: i32 = version.size();
    let mut result: Vec<i32> = (0..numalign - 1).map(|i| size - 7 - i * step).collect();
    result.push(6);
    result.reverse();
    result
}

/// The 15 format bits for a level and mask: 5 data bits, a 10-bit BCH remainder, XOR 0x5412.
pub(crate) fn format_bits(ecl: QrCodeEcc, mask: Mask) -> u32 {
    // errcorrlvl is uint2, mask is uint3
    let data: u32 = u32::from(ecl.format_bits() << 3 | mask.value());
    let mut rem: u32 = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * 0x537);
    }
    (data << 10 | rem) ^ 0x5412 // uint15
}

/// The 18 version bits: 6 data bits followed by a 12-bit BCH remainder.
pub(crate) fn version_bits(version: Version) -> u32 {
    let data = u32::from(version.value()); // uint6, in the range [7, 40]
    let mut rem: u32 = data;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * 0x1F25);
    }
    data << 12 | rem // uint18
}

/*---- Finder pattern run history ----*/

struct FinderPenalty {
    qr_size: i32,
    run_history: [i32; 7],
}

impl FinderPenalty {
    pub fn new(size: i32) -> Self {
        Self {
            qr_size: size,
            run_history: [0; 7],
        }
    }

    // Pushes the given value to the front and drops the last value.
    pub fn add_history(&mut self, mut currentrunlength: i32) {
        if self.run_history[0] == 0 {
            currentrunlength += self.qr_size; // Add light border to initial run
        }
        let len: usize = self.run_history.len();
        self.run_history.copy_within(0..len - 1, 1);
        self.run_history[0] = currentrunlength;
    }

    // Can only be called immediately after a light run is added, and returns either 0, 1, or 2.
    // A 1:1:3:1:1 core needs a 4-module light border on one side and at least 1 on the other;
    // each side that qualifies counts as its own match.
    pub fn count_patterns(&self) -> i32 {
        let rh = &self.run_history;
        let n = rh[1];
        debug_assert!(n <= self.qr_size * 3);
        let core: bool = n > 0 && rh[2] == n && rh[3] == n * 3 && rh[4] == n && rh[5] == n;
        i32::from(core && rh[0] >= n * 4 && rh[6] >= n)
            + i32::from(core && rh[6] >= n * 4 && rh[0] >= n)
    }

    // Must be called at the end of a line (row or column) of modules.
    pub fn terminate_and_count(mut self, currentruncolor: bool, mut currentrunlength: i32) -> i32 {
        if currentruncolor {
            // Terminate dark run
            self.add_history(currentrunlength);
            currentrunlength = 0;
        }
        currentrunlength += self.qr_size; // Add light border to final run
        self.add_history(currentrunlength);
        self.count_patterns()
    }
}
