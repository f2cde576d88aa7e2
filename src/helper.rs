//! Rendering of finished symbols as SVG, console text and raster images.
//!
//! Everything here reads the symbol through [`QrCode::get_module`], which returns
//! light for coordinates outside the grid, so quiet zones need no special casing.

use std::fs;
use std::path::Path;

use image::error::{LimitError, LimitErrorKind};
use image::{GrayImage, ImageBuffer, ImageError, ImageResult, Luma, Pixel, Rgb, RgbImage};

use crate::qrcode::QrCode;

/// Layout and colors for raster output.
///
/// ```rust
/// use qrmatrix::helper::RenderOptions;
///
/// let options = RenderOptions { scale: 4, dark: [0, 0, 128], ..RenderOptions::default() };
/// assert_eq!(options.border, 4);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RenderOptions {
    /// Width of the light quiet zone, in modules.
    pub border: u8,
    /// Pixels per module. Zero is treated as one.
    pub scale: u32,
    pub dark: [u8; 3],
    pub light: [u8; 3],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            border: 4,
            scale: 8,
            dark: [0, 0, 0],
            light: [255, 255, 255],
        }
    }
}

// Largest pixel buffer a render may allocate, matching the default `image::Limits::max_alloc`.
const MAX_IMAGE_BYTES: u128 = 512 * 1024 * 1024;

/*---- Utilities ----*/

// Returns a string of SVG code for an image depicting
// the given QR Code, with the given number of border modules.
// The string always uses Unix newlines (\n), regardless of the platform.
pub fn to_svg_string(qr: &QrCode, border: u8) -> String {
    let border = i32::from(border);
    let dimension = qr.size() + border * 2;
    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"0 0 {0} {0}\" stroke=\"none\">\n",
        dimension
    );
    result += "\t<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n";

    let mut path: Vec<String> = Vec::new();
    for y in 0..qr.size() {
        for x in 0..qr.size() {
            if qr.get_module(x, y) {
                path.push(format!("M{},{}h1v1h-1z", x + border, y + border));
            }
        }
    }
    result += &format!("\t<path d=\"{}\" fill=\"#000000\"/>\n", path.join(" "));
    result += "</svg>\n";
    result
}

/// Renders the symbol as lines of text, two characters per module so the
/// output is roughly square in a terminal.
pub fn to_text(qr: &QrCode, border: u8) -> String {
    let border = i32::from(border);
    let mut result = String::new();
    for y in -border..qr.size() + border {
        for x in -border..qr.size() + border {
            let c: char = if qr.get_module(x, y) { '█' } else { ' ' };
            result.push(c);
            result.push(c);
        }
        result.push('\n');
    }
    result
}

/// Prints the given QrCode object to the console.
pub fn print_qr(qr: &QrCode) {
    println!("{}", to_text(qr, 4));
}

/// Renders the symbol into an RGB image using the given border, scale and colors.
///
/// Fails with `ImageError::Limits` when the scaled image would need more than 512 MiB.
///
/// # Example
///
/// ```rust
/// use qrmatrix::{helper, QrCode, QrCodeEcc};
///
/// let qr = QrCode::encode_text("Hello, World!", QrCodeEcc::Low).unwrap();
/// let img = helper::to_image(&qr, &helper::RenderOptions::default()).unwrap();
/// assert_eq!(img.width(), (qr.size() as u32 + 8) * 8);
/// ```
pub fn to_image(qr: &QrCode, options: &RenderOptions) -> ImageResult<RgbImage> {
    let (dark, light) = (Rgb(options.dark), Rgb(options.light));
    render(qr, options.border, options.scale, |isdark| if isdark { dark } else { light })
}

/// Renders the symbol as a black on white grayscale image, with the same size limit as [`to_image`].
pub fn to_luma_image(qr: &QrCode, border: u8, scale: u32) -> ImageResult<GrayImage> {
    render(qr, border, scale, |isdark| {
        if isdark {
            Luma([0u8]) // Black
        } else {
            Luma([255u8]) // White
        }
    })
}

fn render<P, F>(
    qr: &QrCode,
    border: u8,
    scale: u32,
    color: F,
) -> ImageResult<ImageBuffer<P, Vec<P::Subpixel>>>
where
    P: Pixel,
    F: Fn(bool) -> P,
{
    let scale: u32 = scale.max(1);
    let border = i32::from(border);
    let modules = (qr.size() + border * 2) as u32;
    let dimension: u32 = modules
        .checked_mul(scale)
        .ok_or_else(|| limit_error(LimitErrorKind::DimensionError))?;
    let bytes: u128 = u128::from(dimension)
        * u128::from(dimension)
        * u128::from(P::CHANNEL_COUNT)
        * std::mem::size_of::<P::Subpixel>() as u128;
    if bytes > MAX_IMAGE_BYTES {
        return Err(limit_error(LimitErrorKind::InsufficientMemory));
    }
    Ok(ImageBuffer::from_fn(dimension, dimension, |x, y| {
        let qr_x = (x / scale) as i32 - border;
        let qr_y = (y / scale) as i32 - border;
        color(qr.get_module(qr_x, qr_y))
    }))
}

fn limit_error(kind: LimitErrorKind) -> ImageError {
    ImageError::Limits(LimitError::from_kind(kind))
}

/// Renders the symbol with [`to_image`] and saves it, creating missing parent directories.
///
/// The image format is chosen from the file extension.
///
/// # Errors
///
/// Returns an `image::ImageError` if the image is too large, the directory cannot be created,
/// or the image cannot be written.
pub fn save_image<P: AsRef<Path>>(
    qr: &QrCode,
    path: P,
    options: &RenderOptions,
) -> Result<(), image::ImageError> {
    let path = path.as_ref();
    let img = to_image(qr, options)?;
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        // Check if the directory exists, create it if it doesn't
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }
    img.save(path)
}
