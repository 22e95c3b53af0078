use std::path::Path;

use image::{ColorType, DynamicImage, ExtendedColorType};
use log::debug;

use crate::error::ClusterError;

/// A decoded image as a flat, channel-interleaved 8-bit buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub pixels: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub channels: usize,
}

/// Decode the image at `path`, keeping its channel count.
///
/// 8-bit gray, gray+alpha, RGB and RGBA images are passed through unchanged.
/// Deeper or floating point images are reduced to 8-bit RGB, or RGBA when
/// they carry alpha.
pub fn load_image(path: impl AsRef<Path>) -> Result<LoadedImage, ClusterError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| ClusterError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let (width, height) = (img.width() as usize, img.height() as usize);
    let (pixels, channels) = match img {
        DynamicImage::ImageLuma8(buf) => (buf.into_raw(), 1),
        DynamicImage::ImageLumaA8(buf) => (buf.into_raw(), 2),
        DynamicImage::ImageRgb8(buf) => (buf.into_raw(), 3),
        DynamicImage::ImageRgba8(buf) => (buf.into_raw(), 4),
        other if other.color().has_alpha() => (other.to_rgba8().into_raw(), 4),
        other => (other.to_rgb8().into_raw(), 3),
    };

    debug!(
        "loaded {} ({width}x{height}, {channels} channels)",
        path.display()
    );

    Ok(LoadedImage {
        pixels,
        width,
        height,
        channels,
    })
}

/// Encode `pixels` to `path`. The format follows the file extension.
pub fn save_image(
    path: impl AsRef<Path>,
    pixels: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<(), ClusterError> {
    let path = path.as_ref();
    let color = match channels {
        1 => ColorType::L8,
        2 => ColorType::La8,
        3 => ColorType::Rgb8,
        4 => ColorType::Rgba8,
        n => {
            return Err(ClusterError::InvalidConfiguration(format!(
                "cannot encode an image with {n} channels"
            )))
        }
    };
    let (w, h) = match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(ClusterError::InvalidConfiguration(format!(
                "image dimensions {width}x{height} too large to encode"
            )))
        }
    };

    image::save_buffer(path, pixels, w, h, ExtendedColorType::from(color)).map_err(|source| {
        ClusterError::ImageWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;

    debug!("wrote {} ({width}x{height})", path.display());
    Ok(())
}
