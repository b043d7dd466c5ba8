use crate::foundation::error::{DispError, DispResult};

/// Byte layout of an 8-bit image.
///
/// Channel order follows the classic BGR convention: blue first, red last,
/// with the alpha byte (when present) trailing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// Opaque format: blue, green, red.
    Bgr8,
    /// Transparent format: blue, green, red, alpha.
    Bgra8,
}

impl PixelFormat {
    /// Number of bytes per pixel.
    pub fn channels(self) -> usize {
        match self {
            Self::Bgr8 => 3,
            Self::Bgra8 => 4,
        }
    }

    /// True for the transparent format.
    pub fn has_alpha(self) -> bool {
        matches!(self, Self::Bgra8)
    }
}

/// Signed integer offset of one image's origin relative to another.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned crop rectangle in pixel units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

fn buffer_len(width: u32, height: u32, format: PixelFormat) -> DispResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(format.channels()))
        .ok_or_else(|| DispError::format("image buffer size overflow"))
}

/// Owned, tightly packed 8-bit image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Image {
    /// Allocate a zeroed image.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> DispResult<Self> {
        let len = buffer_len(width, height, format)?;
        Ok(Self {
            width,
            height,
            format,
            data: vec![0u8; len],
        })
    }

    /// Wrap raw row-major bytes. The length must be `width * height * channels`.
    pub fn from_raw(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> DispResult<Self> {
        let expected = buffer_len(width, height, format)?;
        if data.len() != expected {
            return Err(DispError::format(format!(
                "raw buffer has {} bytes, expected {expected} for {width}x{height} {format:?}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Image where every pixel equals `px`.
    pub fn filled(width: u32, height: u32, format: PixelFormat, px: &[u8]) -> DispResult<Self> {
        if px.len() != format.channels() {
            return Err(DispError::format(format!(
                "fill pixel has {} channels, {format:?} needs {}",
                px.len(),
                format.channels()
            )));
        }
        let count = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| DispError::format("image buffer size overflow"))?;
        Self::from_raw(width, height, format, px.repeat(count))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        let ch = self.channels();
        (y as usize * self.width as usize + x as usize) * ch
    }

    /// Channel bytes of the pixel at (x, y). Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let i = self.offset(x, y);
        &self.data[i..i + self.channels()]
    }

    /// Mutable channel bytes of the pixel at (x, y). Panics when out of bounds.
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let i = self.offset(x, y);
        let ch = self.channels();
        &mut self.data[i..i + ch]
    }

    /// Borrow the whole image as a read-only view.
    pub fn view(&self) -> ImageView<'_> {
        ImageView {
            width: self.width,
            height: self.height,
            format: self.format,
            stride: self.width as usize * self.channels(),
            data: &self.data,
        }
    }
}

/// Read-only rectangular window into an image's storage.
///
/// Cropping a view never copies pixels; `stride` keeps the parent's row pitch.
#[derive(Clone, Copy, Debug)]
pub struct ImageView<'a> {
    width: u32,
    height: u32,
    format: PixelFormat,
    stride: usize, // bytes between rows
    data: &'a [u8],
}

impl<'a> ImageView<'a> {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    /// Channel bytes of the pixel at (x, y). Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &'a [u8] {
        let ch = self.channels();
        let i = y as usize * self.stride + x as usize * ch;
        &self.data[i..i + ch]
    }

    /// Bytes of row `y`, excluding any padding up to the stride.
    #[inline]
    pub fn row(&self, y: u32) -> &'a [u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize * self.channels()]
    }

    /// Sub-view sharing this view's storage. The rectangle must lie inside the view.
    pub fn crop(&self, rect: Rect) -> DispResult<ImageView<'a>> {
        let fits_x = rect.x.checked_add(rect.width).is_some_and(|r| r <= self.width);
        let fits_y = rect
            .y
            .checked_add(rect.height)
            .is_some_and(|b| b <= self.height);
        if !fits_x || !fits_y {
            return Err(DispError::format(format!(
                "crop {}x{}+{}+{} exceeds {}x{} image",
                rect.width, rect.height, rect.x, rect.y, self.width, self.height
            )));
        }

        // Empty windows own no bytes, so they also get a zero stride.
        let (data, stride) = if rect.width == 0 || rect.height == 0 {
            (&self.data[..0], 0)
        } else {
            let start = rect.y as usize * self.stride + rect.x as usize * self.channels();
            (&self.data[start..], self.stride)
        };

        Ok(ImageView {
            width: rect.width,
            height: rect.height,
            format: self.format,
            stride,
            data,
        })
    }

    /// Deep copy into a tightly packed image.
    pub fn to_image(&self) -> Image {
        let row_len = self.width as usize * self.channels();
        let mut data = Vec::with_capacity(row_len * self.height as usize);
        if row_len > 0 {
            for y in 0..self.height {
                data.extend_from_slice(self.row(y));
            }
        }
        Image {
            width: self.width,
            height: self.height,
            format: self.format,
            data,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
