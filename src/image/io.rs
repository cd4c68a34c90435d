//! Loading and saving images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::Raster;
use crate::util::{IdiffError, IdiffResult};
use std::path::Path;

/// Converts a decoded image into a raster, keeping gray, RGB or RGBA layout.
///
/// Other layouts (16-bit, float, luma-alpha) are converted to 8-bit RGB(A).
pub fn raster_from_dynamic_image(img: &image::DynamicImage) -> IdiffResult<Raster> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    match img {
        image::DynamicImage::ImageLuma8(gray) => Raster::gray(gray.as_raw().clone(), width, height),
        image::DynamicImage::ImageRgb8(rgb) => Raster::rgb(rgb.as_raw().clone(), width, height),
        other if other.color().has_alpha() => {
            Raster::new(other.to_rgba8().into_raw(), width, height, 4)
        }
        other => Raster::rgb(other.to_rgb8().into_raw(), width, height),
    }
}

/// Loads an image from disk without changing its channel layout.
pub fn load_raster<P: AsRef<Path>>(path: P) -> IdiffResult<Raster> {
    let img = image::open(path).map_err(|err| IdiffError::ImageIo {
        reason: err.to_string(),
    })?;
    raster_from_dynamic_image(&img)
}

/// Expands a raster into an 8-bit RGB image for drawing.
pub fn rgb_from_raster(raster: &Raster) -> IdiffResult<image::RgbImage> {
    let data = raster.data();
    let pixels = raster.width() * raster.height();
    let mut out = Vec::with_capacity(pixels * 3);
    match raster.channels() {
        1 => {
            for &v in data {
                out.extend_from_slice(&[v, v, v]);
            }
        }
        3 => out.extend_from_slice(data),
        4 => {
            for px in data.chunks_exact(4) {
                out.extend_from_slice(&px[..3]);
            }
        }
        channels => return Err(IdiffError::InvalidChannels { channels }),
    }
    image::RgbImage::from_raw(raster.width() as u32, raster.height() as u32, out).ok_or(
        IdiffError::BufferTooSmall {
            needed: pixels * 3,
            got: data.len(),
        },
    )
}

/// Writes an RGB image to disk, creating parent directories as needed.
pub fn save_rgb<P: AsRef<Path>>(img: &image::RgbImage, path: P) -> IdiffResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|err| IdiffError::ImageIo {
            reason: err.to_string(),
        })?;
    }
    img.save(path).map_err(|err| IdiffError::ImageIo {
        reason: err.to_string(),
    })
}
