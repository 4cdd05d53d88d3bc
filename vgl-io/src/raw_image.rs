//! Raster image loading into tightly packed 8-bit pixel buffers

use crate::error::ImageError;
use image::{DynamicImage, ImageFormat};
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Channel layout of a [`RawImage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Luminance,
    LuminanceAlpha,
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Luminance => 1,
            PixelFormat::LuminanceAlpha => 2,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

/// Map a file extension onto a supported decoder.
fn format_for_extension(ext: &str) -> Option<ImageFormat> {
    match ext.to_ascii_lowercase().as_str() {
        "bmp" => Some(ImageFormat::Bmp),
        "tga" => Some(ImageFormat::Tga),
        "ppm" => Some(ImageFormat::Pnm),
        "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
        "png" => Some(ImageFormat::Png),
        "tif" | "tiff" => Some(ImageFormat::Tiff),
        _ => None,
    }
}

/// A decoded image with rows stored top to bottom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    format: PixelFormat,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RawImage {
    /// Allocate a zero-filled image.
    pub fn new(format: PixelFormat, width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * format.bytes_per_pixel();
        Self {
            format,
            width,
            height,
            pixels: vec![0; len],
        }
    }

    /// Wrap an existing pixel buffer, checking its length.
    pub fn from_pixels(
        format: PixelFormat,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<Self, ImageError> {
        if pixels.len() != width as usize * height as usize * format.bytes_per_pixel() {
            return Err(ImageError::InvalidDimensions { width, height });
        }
        Ok(Self {
            format,
            width,
            height,
            pixels,
        })
    }

    /// Decode an image file, picking the decoder from its extension.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let format = format_for_extension(ext).ok_or_else(|| ImageError::UnsupportedFormat {
            extension: ext.to_string(),
        })?;

        let file = File::open(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => ImageError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ImageError::Io(err),
        })?;

        debug!("Loading image {}", path.display());
        let decoded = image::io::Reader::with_format(BufReader::new(file), format).decode()?;
        let image = Self::from_dynamic(decoded)?;
        debug!(
            "Loaded image {}: {}x{} {:?}",
            path.display(),
            image.width,
            image.height,
            image.format
        );
        Ok(image)
    }

    /// Convert a decoded image to the nearest 8-bit layout.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self, ImageError> {
        let (width, height) = (image.width(), image.height());
        let (format, pixels) = match image {
            DynamicImage::ImageLuma8(buf) => (PixelFormat::Luminance, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => (PixelFormat::LuminanceAlpha, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (PixelFormat::Rgb, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (PixelFormat::Rgba, buf.into_raw()),
            other => {
                let color = other.color();
                match (color.has_color(), color.has_alpha()) {
                    (false, false) => (PixelFormat::Luminance, other.into_luma8().into_raw()),
                    (false, true) => (PixelFormat::LuminanceAlpha, other.into_luma_alpha8().into_raw()),
                    (true, false) => (PixelFormat::Rgb, other.into_rgb8().into_raw()),
                    (true, true) => (PixelFormat::Rgba, other.into_rgba8().into_raw()),
                }
            }
        };
        Self::from_pixels(format, width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    fn row_len(&self) -> usize {
        self.width as usize * self.bytes_per_pixel()
    }

    /// Bytes of the pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.bytes_per_pixel();
        let start = y as usize * self.row_len() + x as usize * bpp;
        self.pixels.get(start..start + bpp)
    }

    /// Keep every `step_x`-th column and `step_y`-th row.
    ///
    /// Steps of zero are treated as one.
    pub fn downsample(&self, step_x: u32, step_y: u32) -> Self {
        let step_x = step_x.max(1);
        let step_y = step_y.max(1);
        let width = self.width.div_ceil(step_x);
        let height = self.height.div_ceil(step_y);
        let bpp = self.bytes_per_pixel();

        let mut pixels = Vec::with_capacity(width as usize * height as usize * bpp);
        for y in (0..self.height).step_by(step_y as usize) {
            let row = y as usize * self.row_len();
            for x in (0..self.width).step_by(step_x as usize) {
                let start = row + x as usize * bpp;
                pixels.extend_from_slice(&self.pixels[start..start + bpp]);
            }
        }

        Self {
            format: self.format,
            width,
            height,
            pixels,
        }
    }

    /// Reverse the row order in place, e.g. to get the bottom-up layout GL expects.
    pub fn flip_vertical(&mut self) {
        let row_len = self.row_len();
        let height = self.height as usize;
        for y in 0..height / 2 {
            let (top, bottom) = self.pixels.split_at_mut((height - 1 - y) * row_len);
            top[y * row_len..(y + 1) * row_len].swap_with_slice(&mut bottom[..row_len]);
        }
    }
}
