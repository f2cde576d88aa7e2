//! # qrmatrix
//!
//! A Rust library for encoding text and binary data into QR Code symbols.
//!
//! `qrmatrix` follows the QR Code Model 2 specification. It supports versions 1 to 40, all four
//! error correction levels and the numeric, alphanumeric, byte, kanji and ECI segment modes.
//! Text can be split into mixed-mode segments automatically so that it takes the fewest bits.
//! Finished symbols can be rendered as console text, SVG or raster images.
//!
//! ## Features
//!
//! - Encode data in numeric, alphanumeric, byte, kanji or ECI modes.
//! - Support four error correction levels: Low, Medium, Quartile, High.
//! - Optimal mixed-mode segmentation of arbitrary Unicode text.
//! - Constrain the version range, force a mask pattern, or let the encoder pick both.
//! - Render QR codes as text, SVGs, or `image` buffers saved to any supported format.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qrmatrix = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! ```rust
//! use qrmatrix::{helper, QrCode, QrCodeEcc};
//!
//! let qr = QrCode::encode_text("https://example.com", QrCodeEcc::Medium)?;
//! let svg = helper::to_svg_string(&qr, 4);
//! assert!(svg.contains("<path"));
//! # Ok::<(), qrmatrix::QrError>(())
//! ```
//!
//! Mixed content with a fixed version range and mask:
//!
//! ```rust
//! use qrmatrix::{EncodeOptions, Mask, QrCode, QrCodeEcc, Version};
//!
//! let options = EncodeOptions::default()
//!     .version_range(Version::new(2)?, Version::new(10)?)
//!     .mask(Some(Mask::new(5)?));
//! let qr = QrCode::encode_text_optimally("Invoice 0000123456789, total 42.00 EUR", QrCodeEcc::Quartile, &options)?;
//! assert_eq!(qr.mask().value(), 5);
//! assert!(qr.version() >= Version::new(2)?);
//! # Ok::<(), qrmatrix::QrError>(())
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: The symbol type and the encoding entry points.
//! - [`segment`]: Segment construction for each mode.
//! - [`optimal`]: Minimum-length mixed-mode segmentation.
//! - [`codewords`]: Version selection, padding and block interleaving.
//! - [`reed_solomon`]: Error correction codewords.
//! - [`helper`]: Utilities for rendering QR codes in various formats.

#![forbid(unsafe_code)]

pub mod bits;
pub mod codewords;
pub mod error;
pub mod helper;
pub mod kanji;
mod matrix;
pub mod mode;
pub mod optimal;
pub mod options;
pub mod qrcode;
pub mod reed_solomon;
pub mod segment;

pub use bits::BitBuffer;
pub use error::{DataTooLong, QrError, Result};
pub use mode::QrSegmentMode;
pub use options::EncodeOptions;
pub use qrcode::{Mask, QrCode, QrCodeEcc, Version};
pub use segment::QrSegment;
