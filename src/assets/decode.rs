use std::path::Path;

use image::DynamicImage;

use crate::foundation::{
    core::{Image, PixelFormat},
    error::{DispError, DispResult},
};

/// Decode encoded image bytes into the requested BGR(A) layout.
pub fn decode_image(bytes: &[u8], format: PixelFormat) -> DispResult<Image> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| DispError::load(format!("decode image from memory: {e}")))?;
    into_bgr_layout(dyn_img, format)
}

/// Read an image file and convert it to the requested BGR(A) layout.
///
/// Missing or undecodable files are reported as [`DispError::Load`].
pub fn load_image(path: &Path, format: PixelFormat) -> DispResult<Image> {
    into_bgr_layout(open(path)?, format)
}

/// Read an image file keeping its transparency: files with an alpha channel
/// come back as BGRA, everything else as BGR.
pub fn load_image_unchanged(path: &Path) -> DispResult<Image> {
    let dyn_img = open(path)?;
    let format = if dyn_img.color().has_alpha() {
        PixelFormat::Bgra8
    } else {
        PixelFormat::Bgr8
    };
    into_bgr_layout(dyn_img, format)
}

fn open(path: &Path) -> DispResult<DynamicImage> {
    image::open(path)
        .map_err(|e| DispError::load(format!("failed to open {}: {e}", path.display())))
}

fn into_bgr_layout(dyn_img: DynamicImage, format: PixelFormat) -> DispResult<Image> {
    let (width, height) = (dyn_img.width(), dyn_img.height());
    let mut data = match format {
        PixelFormat::Bgr8 => dyn_img.into_rgb8().into_raw(),
        PixelFormat::Bgra8 => dyn_img.into_rgba8().into_raw(),
    };
    swap_red_blue_in_place(&mut data, format.channels());
    Image::from_raw(width, height, format, data)
}

fn swap_red_blue_in_place(data: &mut [u8], channels: usize) {
    for px in data.chunks_exact_mut(channels) {
        px.swap(0, 2);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
