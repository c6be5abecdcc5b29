// filepath: src/bitmap.rs
//! In-memory pixel bitmap displayed by the overlay

use crate::error::{OverlayError, Result};

/// Immutable grid of pixels, stored premultiplied in the canvas byte order
/// (B, G, R, A) so painting is a straight copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Bitmap {
    /// Build a bitmap from straight (non-premultiplied) RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(OverlayError::InvalidBitmap {
                width,
                height,
                len: data.len(),
            });
        }

        let pixels = data
            .chunks_exact(4)
            .map(|px| premultiply_to_bgra([px[0], px[1], px[2], px[3]]))
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A bitmap filled with a single straight RGBA colour.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            width,
            height,
            pixels: vec![premultiply_to_bgra(rgba); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Premultiplied BGRA pixel at (x, y), or None outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

impl From<image::RgbaImage> for Bitmap {
    fn from(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.pixels().map(|p| premultiply_to_bgra(p.0)).collect();
        Self {
            width,
            height,
            pixels,
        }
    }
}

fn premultiply_to_bgra([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    let mul = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
    [mul(b), mul(g), mul(r), a]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        let err = Bitmap::from_rgba8(2, 2, &[0; 12]).unwrap_err();
        assert!(matches!(err, OverlayError::InvalidBitmap { len: 12, .. }));
    }

    #[test]
    fn stores_premultiplied_bgra() {
        let bmp = Bitmap::from_rgba8(1, 1, &[255, 0, 100, 128]).unwrap();
        assert_eq!(bmp.pixel(0, 0), Some([50, 0, 128, 128]));
        assert_eq!(bmp.pixel(1, 0), None);
    }
}
