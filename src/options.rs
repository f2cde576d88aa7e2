use crate::error::{QrError, Result};
use crate::qrcode::{Mask, Version};

/// Optional encoding parameters shared by the text, binary and segment entry points.
///
/// The defaults search every version, pick the mask automatically and
/// boost the error correction level when it costs no extra size.
///
/// ```rust
/// use qrmatrix::{EncodeOptions, Mask, Version};
///
/// let options = EncodeOptions::default()
///     .version_range(Version::new(5)?, Version::new(10)?)
///     .mask(Some(Mask::new(3)?))
///     .boost_ecl(false);
/// assert!(options.validate().is_ok());
/// # Ok::<(), qrmatrix::QrError>(())
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EncodeOptions {
    /// Smallest version the encoder may choose.
    pub min_version: Version,
    /// Largest version the encoder may choose.
    pub max_version: Version,
    /// Forced mask, or `None` to pick the lowest-penalty mask.
    pub mask: Option<Mask>,
    /// Raise the error correction level while the data still fits the chosen version.
    pub boost_ecl: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            min_version: Version::MIN,
            max_version: Version::MAX,
            mask: None,
            boost_ecl: true,
        }
    }
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_version(mut self, version: Version) -> Self {
        self.min_version = version;
        self
    }

    pub fn max_version(mut self, version: Version) -> Self {
        self.max_version = version;
        self
    }

    pub fn version_range(self, min: Version, max: Version) -> Self {
        self.min_version(min).max_version(max)
    }

    pub fn mask(mut self, mask: Option<Mask>) -> Self {
        self.mask = mask;
        self
    }

    pub fn boost_ecl(mut self, boost: bool) -> Self {
        self.boost_ecl = boost;
        self
    }

    /// Fails with `InvalidVersionRange` when the minimum version exceeds the maximum.
    pub fn validate(&self) -> Result<()> {
        if self.min_version > self.max_version {
            return Err(QrError::InvalidVersionRange {
                min: self.min_version.value(),
                max: self.max_version.value(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = EncodeOptions::new();
        assert_eq!(options.min_version, Version::MIN);
        assert_eq!(options.max_version, Version::MAX);
        assert_eq!(options.mask, None);
        assert!(options.boost_ecl);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let options = EncodeOptions::default()
            .version_range(Version::new(12).unwrap(), Version::new(3).unwrap());
        assert_eq!(options.validate(), Err(QrError::InvalidVersionRange { min: 12, max: 3 }));
    }

    #[test]
    fn test_single_version_range_is_valid() {
        let v = Version::new(7).unwrap();
        assert!(EncodeOptions::default().version_range(v, v).validate().is_ok());
    }
}
