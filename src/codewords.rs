//! Codeword assembly: version selection, padding, block splitting and interleaving.

use tracing::debug;

use crate::bits::BitBuffer;
use crate::error::{DataTooLong, QrError, Result};
use crate::qrcode::{QrCodeEcc, Version};
use crate::reed_solomon::ReedSolomonGenerator;
use crate::segment::QrSegment;

/// Encodes the given segments into padded data codewords.
///
/// The smallest possible QR Code version within the given range is automatically
/// chosen for the output. If `boostecl` is `true`, the ECC level may be higher than the
/// `ecl` argument if it can be done without increasing the version.
///
/// Returns the data codewords (exactly the data capacity of the chosen version and
/// level), the final error correction level and the chosen version.
pub fn encode_segments_to_codewords(
    segs: &[QrSegment],
    mut ecl: QrCodeEcc,
    minversion: Version,
    maxversion: Version,
    boostecl: bool,
) -> Result<(Vec<u8>, QrCodeEcc, Version)> {
    if minversion > maxversion {
        return Err(QrError::InvalidVersionRange {
            min: minversion.value(),
            max: maxversion.value(),
        });
    }

    // Find the minimal version number to use
    let mut version: Version = minversion;
    let datausedbits: usize = loop {
        let datacapacitybits: usize = get_num_data_codewords(version, ecl) * 8;
        let dataused: Option<usize> = QrSegment::get_total_bits(segs, version);
        if let Some(n) = dataused.filter(|&n| n <= datacapacitybits) {
            break n; // This version number is found to be suitable
        } else if version >= maxversion {
            // All versions in the range could not fit the given data
            debug!(
                required = ?dataused,
                capacity = datacapacitybits,
                max_version = maxversion.value(),
                "data does not fit"
            );
            return Err(match dataused {
                None => DataTooLong::SegmentTooLong,
                Some(n) => DataTooLong::DataOverCapacity(n, datacapacitybits),
            }
            .into());
        } else {
            version = version.successor();
        }
    };

    // Increase the error correction level while the data still fits in the current version number
    for &newecl in &[QrCodeEcc::Medium, QrCodeEcc::Quartile, QrCodeEcc::High] {
        if boostecl && newecl > ecl && datausedbits <= get_num_data_codewords(version, newecl) * 8 {
            debug!(from = ?ecl, to = ?newecl, "boosting error correction level");
            ecl = newecl;
        }
    }

    // Concatenate all segments to create the data bit string
    let datacapacitybits: usize = get_num_data_codewords(version, ecl) * 8;
    let mut bb = BitBuffer::with_capacity(datacapacitybits);
    for seg in segs {
        bb.append_bits(seg.mode().mode_bits(), 4);
        let numchars = u32::try_from(seg.num_chars()).map_err(|_| DataTooLong::SegmentTooLong)?;
        bb.append_bits(numchars, seg.mode().num_char_count_bits(version));
        bb.extend_from_bits(seg.data());
    }
    debug_assert_eq!(bb.len(), datausedbits);

    // Add terminator and pad up to a byte if applicable
    let numzerobits: usize = std::cmp::min(4, datacapacitybits - bb.len());
    bb.append_bits(0, numzerobits as u8);
    let numzerobits: usize = bb.len().wrapping_neg() & 7;
    bb.append_bits(0, numzerobits as u8);
    debug_assert_eq!(bb.len() % 8, 0);

    // Pad with alternating bytes until data capacity is reached
    for &padbyte in [0xEC, 0x11].iter().cycle() {
        if bb.len() >= datacapacitybits {
            break;
        }
        bb.append_bits(padbyte, 8);
    }

    debug!(
        version = version.value(),
        ecl = ?ecl,
        data_bits = datausedbits,
        capacity_bits = datacapacitybits,
        "segments encoded"
    );
    Ok((bb.to_bytes(), ecl, version))
}

/// Appends error correction bytes to each block of the given data array, then interleaves
/// bytes from the blocks and returns the raw codewords to be placed in the symbol.
///
/// Fails with `InvalidCodewordCount` unless the data is exactly the data capacity of `ver` at `ecl`.
pub fn add_ecc_and_interleave(data: &[u8], ver: Version, ecl: QrCodeEcc) -> Result<Vec<u8>> {
    let expected: usize = get_num_data_codewords(ver, ecl);
    if data.len() != expected {
        return Err(QrError::InvalidCodewordCount {
            expected,
            actual: data.len(),
        });
    }

    // Calculate parameter numbers
    let numblocks: usize = table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl);
    let blockecclen: usize = table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl);
    let rawcodewords: usize = get_num_raw_data_modules(ver) / 8;
    let numshortblocks: usize = numblocks - rawcodewords % numblocks;
    let shortblockdatalen: usize = rawcodewords / numblocks - blockecclen;

    // Split data into blocks, calculate ECC, and interleave
    // (not concatenate) the bytes into a single sequence
    let mut result = vec![0u8; rawcodewords];
    let rs = ReedSolomonGenerator::new(blockecclen)?;
    let mut dat: &[u8] = data;
    for i in 0..numblocks {
        let datlen: usize = shortblockdatalen + usize::from(i >= numshortblocks);
        let ecc: Vec<u8> = rs.compute_remainder(&dat[..datlen]);
        let mut k: usize = i;
        for (j, &b) in dat[..datlen].iter().enumerate() {
            // Short blocks have no codeword at the last data column
            if j == shortblockdatalen {
                k -= numshortblocks;
            }
            result[k] = b;
            k += numblocks;
        }
        let mut k: usize = data.len() + i;
        for &e in &ecc {
            result[k] = e;
            k += numblocks;
        }
        dat = &dat[datlen..];
    }
    debug_assert!(dat.is_empty());
    Ok(result)
}

/// Returns the number of data bits that can be stored in a QR Code of the given version number, after
/// all function modules are excluded. This includes remainder bits, so it might not be a multiple of 8.
/// The result is in the range [208, 29648].
pub fn get_num_raw_data_modules(ver: Version) -> usize {
    let ver = usize::from(ver.value());
    let mut result: usize = (16 * ver + 128) * ver + 64;
    if ver >= 2 {
        let numalign: usize = ver / 7 + 2;
        result -= (25 * numalign - 10) * numalign - 55;
        if ver >= 7 {
            result -= 36;
        }
    }
    result
}

/// Returns the number of 8-bit data (i.e. not error correction) codewords contained in any
/// QR Code of the given version number and error correction level, with remainder bits discarded.
pub fn get_num_data_codewords(ver: Version, ecl: QrCodeEcc) -> usize {
    get_num_raw_data_modules(ver) / 8
        - table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl)
            * table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl)
}

// Returns an entry from the given table based on the given values.
fn table_get(table: &'static [[i8; 41]; 4], ver: Version, ecl: QrCodeEcc) -> usize {
    table[ecl.ordinal()][usize::from(ver.value())] as usize
}

static ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    // Version: (note that index 0 is for padding, and is set to an illegal value)
    //0,  1,  2,  3,  4,  5,  6,  7,  8,  9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40    Error correction level
    [-1,  7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30],  // Low
    [-1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28],  // Medium
    [-1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30],  // Quartile
    [-1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30],  // High
];

static NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    // Version: (note that index 0 is for padding, and is set to an illegal value)
    //0, 1, 2, 3, 4, 5, 6, 7, 8, 9,10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40    Error correction level
    [-1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4,  4,  4,  4,  4,  6,  6,  6,  6,  7,  8,  8,  9,  9, 10, 12, 12, 12, 13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25],  // Low
    [-1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5,  5,  8,  9,  9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21, 23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49],  // Medium
    [-1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8,  8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68],  // Quartile
    [-1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81],  // High
];
