//! Minimum-length segmentation of text across numeric, alphanumeric, byte and kanji modes.
//!
//! Costs are tracked in sixths of a bit so that the fractional per-character sizes of
//! numeric (10 bits per 3 digits) and alphanumeric (11 bits per 2 characters) stay exact.

use tracing::trace;

use crate::codewords::get_num_data_codewords;
use crate::error::{DataTooLong, QrError, Result};
use crate::kanji;
use crate::mode::QrSegmentMode;
use crate::qrcode::{QrCodeEcc, Version};
use crate::segment::{alphanumeric_index, QrSegment};

// Candidate modes, in tie-break order.
const MODE_TYPES: [QrSegmentMode; 4] = [
    QrSegmentMode::Byte,
    QrSegmentMode::Alphanumeric,
    QrSegmentMode::Numeric,
    QrSegmentMode::Kanji,
];

/// Returns a list of segments that encodes `text` in the fewest bits at the given version.
///
/// The version matters because the width of each segment's character count
/// field changes at versions 10 and 27. Empty text gives an empty list.
///
/// ```rust
/// use qrmatrix::{optimal, QrSegmentMode, Version};
///
/// let segs = optimal::make_segments_optimally("HELLO123456789012", Version::new(1)?)?;
/// assert_eq!(segs.len(), 2);
/// assert_eq!(segs[0].mode(), QrSegmentMode::Alphanumeric);
/// assert_eq!(segs[1].mode(), QrSegmentMode::Numeric);
/// # Ok::<(), qrmatrix::QrError>(())
/// ```
pub fn make_segments_optimally(text: &str, version: Version) -> Result<Vec<QrSegment>> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let charmodes: Vec<QrSegmentMode> = compute_character_modes(&chars, version);
    let segs = split_into_segments(text, &chars, &charmodes)?;
    trace!(version = version.value(), segments = segs.len(), "optimal segmentation");
    Ok(segs)
}

/// Walks versions from `minversion` to `maxversion` and returns the optimal segmentation
/// for the first version whose data capacity at `ecl` holds it.
///
/// The segmentation is only recomputed at `minversion` and where the character count
/// widths change, since it cannot differ between versions of the same width tier.
pub fn make_segments_for_range(
    text: &str,
    ecl: QrCodeEcc,
    minversion: Version,
    maxversion: Version,
) -> Result<Vec<QrSegment>> {
    if minversion > maxversion {
        return Err(QrError::InvalidVersionRange {
            min: minversion.value(),
            max: maxversion.value(),
        });
    }

    let mut segs: Vec<QrSegment> = Vec::new();
    let mut version: Version = minversion;
    loop {
        if version == minversion || version.value() == 10 || version.value() == 27 {
            segs = make_segments_optimally(text, version)?;
        }
        let datacapacitybits: usize = get_num_data_codewords(version, ecl) * 8;
        let dataused: Option<usize> = QrSegment::get_total_bits(&segs, version);
        if dataused.is_some_and(|n| n <= datacapacitybits) {
            return Ok(segs);
        }
        if version >= maxversion {
            return Err(match dataused {
                None => DataTooLong::SegmentTooLong,
                Some(n) => DataTooLong::DataOverCapacity(n, datacapacitybits),
            }
            .into());
        }
        version = version.successor();
    }
}

// Returns the cheapest mode for every character, found by dynamic programming
// over the prefix cost of ending in each mode.
fn compute_character_modes(chars: &[(usize, char)], version: Version) -> Vec<QrSegmentMode> {
    // Segment header size, measured in 1/6 bits
    let headcosts: [usize; 4] =
        MODE_TYPES.map(|mode| (4 + usize::from(mode.num_char_count_bits(version))) * 6);

    // charmodes[i][j] is the mode index that character i is encoded in when the
    // prefix ending at i ends in mode j
    let mut charmodes: Vec<[usize; 4]> = Vec::with_capacity(chars.len());

    // Cost of encoding the prefix so far, ending in each mode
    let mut prevcosts: [usize; 4] = headcosts;

    for &(_, c) in chars {
        let mut curcosts: [Option<usize>; 4] = [None; 4];
        let mut curmodes: [Option<usize>; 4] = [None; 4];

        // Extend a segment if possible
        curcosts[0] = Some(prevcosts[0] + c.len_utf8() * 8 * 6);
        curmodes[0] = Some(0);
        if alphanumeric_index(c).is_some() {
            curcosts[1] = Some(prevcosts[1] + 33); // 5.5 bits per alphanumeric char
            curmodes[1] = Some(1);
        }
        if c.is_ascii_digit() {
            curcosts[2] = Some(prevcosts[2] + 20); // 3.33 bits per digit
            curmodes[2] = Some(2);
        }
        if kanji::is_kanji(c) {
            curcosts[3] = Some(prevcosts[3] + 78); // 13 bits per Shift JIS char
            curmodes[3] = Some(3);
        }

        // Start new segment at the end to switch modes
        let mut costs = [usize::MAX; 4];
        let mut modes = [0usize; 4];
        for j in 0..MODE_TYPES.len() {
            let mut best: Option<(usize, usize)> = curcosts[j].zip(curmodes[j]);
            for (k, cost) in curcosts.iter().enumerate() {
                let Some(cost) = cost else { continue };
                let newcost: usize = (cost + 5) / 6 * 6 + headcosts[j];
                if best.map_or(true, |(bestcost, _)| newcost < bestcost) {
                    best = Some((newcost, k));
                }
            }
            // Byte mode always extends, so every mode is reachable
            debug_assert!(best.is_some(), "no path ends in mode {}", j);
            if let Some((cost, mode)) = best {
                costs[j] = cost;
                modes[j] = mode;
            }
        }
        charmodes.push(modes);
        prevcosts = costs;
    }

    // Find optimal ending mode; the first minimum wins
    let mut curmode: usize = 0;
    for (i, &cost) in prevcosts.iter().enumerate() {
        if cost < prevcosts[curmode] {
            curmode = i;
        }
    }

    // Get optimal mode for each code point by tracing backwards
    let mut result: Vec<QrSegmentMode> = vec![QrSegmentMode::Byte; chars.len()];
    for i in (0..chars.len()).rev() {
        curmode = charmodes[i][curmode];
        result[i] = MODE_TYPES[curmode];
    }
    result
}

// Merges runs of characters sharing a mode into segments.
fn split_into_segments(
    text: &str,
    chars: &[(usize, char)],
    charmodes: &[QrSegmentMode],
) -> Result<Vec<QrSegment>> {
    debug_assert_eq!(chars.len(), charmodes.len());
    let mut result: Vec<QrSegment> = Vec::new();
    let mut start: usize = 0;
    for i in 1..=chars.len() {
        if i < chars.len() && charmodes[i] == charmodes[start] {
            continue;
        }
        let begin: usize = chars[start].0;
        let end: usize = chars.get(i).map_or(text.len(), |&(offset, _)| offset);
        let part: &str = &text[begin..end];
        let seg = match charmodes[start] {
            QrSegmentMode::Byte => QrSegment::make_bytes(part.as_bytes()),
            QrSegmentMode::Numeric => QrSegment::make_numeric(part)?,
            QrSegmentMode::Alphanumeric => QrSegment::make_alphanumeric(part)?,
            QrSegmentMode::Kanji => QrSegment::make_kanji(part)?,
            QrSegmentMode::Eci => unreachable!("ECI is never chosen per character"),
        };
        result.push(seg);
        start = i;
    }
    Ok(result)
}
