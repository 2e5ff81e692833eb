//! Opaque 2-D pixel buffer used for tile composition
//!
//! Wraps an RGBA image with the handful of operations composition needs:
//! region copy ("blit"), rectangle fill, crop, and the 90° rotation
//! correction. Buffers move into the compositor and are dropped right after
//! blitting so peak memory stays bounded by one section's tile set.

use base64::Engine as _;
use image::{imageops, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::Result;

fn default_alpha() -> u8 {
    255
}

/// RGBA fill color for block-outs. Alpha defaults to opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    #[serde(default = "default_alpha")]
    pub alpha: u8,
}

impl Color {
    pub const BLACK: Color = Color { red: 0, green: 0, blue: 0, alpha: 255 };

    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue, alpha: 255 }
    }
}

/// A 2-D pixel buffer with value semantics.
#[derive(Debug, Clone)]
pub struct RasterBuffer {
    img: RgbaImage,
}

impl RasterBuffer {
    /// Allocates a zeroed buffer of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { img: RgbaImage::new(width, height) }
    }

    /// Decodes a PNG byte stream.
    pub fn decode_png(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)?;
        Ok(Self { img: img.to_rgba8() })
    }

    /// Decodes a base64-encoded PNG, the wire format of raw captures.
    pub fn decode_base64_png(data: &str) -> Result<Self> {
        let bytes = base64::engine::general_purpose::STANDARD.decode(data.trim())?;
        Self::decode_png(&bytes)
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    /// Raw RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.img.as_raw()
    }

    /// Reads one pixel; panics outside the buffer bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.img.get_pixel(x, y).0
    }

    /// Copies a region of `src` into this buffer. The copy size is clamped to
    /// both buffers, so out-of-range coordinates copy less rather than panic.
    pub fn blit_from(
        &mut self,
        src: &RasterBuffer,
        src_x: u32,
        src_y: u32,
        width: u32,
        height: u32,
        dst_x: u32,
        dst_y: u32,
    ) {
        let w = width
            .min(src.width().saturating_sub(src_x))
            .min(self.width().saturating_sub(dst_x));
        let h = height
            .min(src.height().saturating_sub(src_y))
            .min(self.height().saturating_sub(dst_y));

        for row in 0..h {
            for col in 0..w {
                let px = *src.img.get_pixel(src_x + col, src_y + row);
                self.img.put_pixel(dst_x + col, dst_y + row, px);
            }
        }
    }

    /// Fills a rectangle with an opaque color, clamped to the buffer bounds.
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Color) {
        let px = Rgba([color.red, color.green, color.blue, color.alpha]);
        let x_end = x.saturating_add(width).min(self.width());
        let y_end = y.saturating_add(height).min(self.height());

        for row in y.min(self.height())..y_end {
            for col in x.min(self.width())..x_end {
                self.img.put_pixel(col, row, px);
            }
        }
    }

    /// Crops the buffer to the given region, clamped to the buffer bounds.
    pub fn crop(&mut self, x: u32, y: u32, width: u32, height: u32) {
        let x = x.min(self.width());
        let y = y.min(self.height());
        let w = width.min(self.width() - x);
        let h = height.min(self.height() - y);
        self.img = imageops::crop_imm(&self.img, x, y, w, h).to_image();
    }

    /// Rotates the buffer 90° counter-clockwise (orientation correction for
    /// targets that mis-report landscape captures).
    pub fn rotate_ccw(self) -> Self {
        Self { img: imageops::rotate270(&self.img) }
    }

    /// Encodes the buffer as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.img
            .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)?;
        Ok(out)
    }
}
