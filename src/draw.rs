// filepath: src/draw.rs
//! Software canvas for pix-overlay
//!
//! Wraps a raw ARGB8888 buffer as handed out by the Wayland shm pool.
//! On little-endian hosts that is B, G, R, A byte order, premultiplied.
//! Every colour passed to the canvas uses the same layout.

/// Fully transparent pixel
pub const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// How a source colour is combined with what is already on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositionMode {
    /// Ordinary alpha blending
    #[default]
    SourceOver,
    /// Replace the destination with full transparency
    Clear,
}

/// Canvas abstraction over a borrowed pixel buffer
pub struct Canvas<'a> {
    buffer: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    /// Create a new canvas from a raw buffer of `width * height * 4` bytes
    pub fn new(buffer: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            buffer,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reset every pixel to transparent
    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    /// Pixel at (x, y), None outside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let idx = self.index(x, y)?;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.buffer[idx..idx + 4]);
        Some(px)
    }

    /// Combine `color` into one pixel; out-of-bounds writes are dropped
    pub fn put_pixel(&mut self, x: u32, y: u32, color: [u8; 4], mode: CompositionMode) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        let dst = &mut self.buffer[idx..idx + 4];
        match mode {
            CompositionMode::Clear => dst.copy_from_slice(&TRANSPARENT),
            CompositionMode::SourceOver => {
                let src_a = color[3] as u16;
                if src_a == 255 {
                    dst.copy_from_slice(&color);
                    return;
                }
                let inv = 255 - src_a;
                for i in 0..4 {
                    let blended = color[i] as u16 + (dst[i] as u16 * inv + 127) / 255;
                    dst[i] = blended.min(255) as u8;
                }
            }
        }
    }

    /// Fill the half-open rectangle [x0, x1) x [y0, y1), clipped to the canvas
    pub fn fill_rect(
        &mut self,
        x0: i64,
        y0: i64,
        x1: i64,
        y1: i64,
        color: [u8; 4],
        mode: CompositionMode,
    ) {
        let x_start = x0.max(0);
        let y_start = y0.max(0);
        let x_end = x1.min(self.width as i64);
        let y_end = y1.min(self.height as i64);

        if x_end <= x_start || y_end <= y_start {
            return; // Nothing to draw
        }

        for y in y_start..y_end {
            for x in x_start..x_end {
                self.put_pixel(x as u32, y as u32, color, mode);
            }
        }
    }

    /// Scale every channel of the premultiplied frame by `opacity`
    pub fn apply_opacity(&mut self, opacity: f32) {
        if opacity >= 1.0 {
            return;
        }
        let factor = (opacity.max(0.0) * 256.0).round() as u16;
        for byte in self.buffer.iter_mut() {
            *byte = ((*byte as u16 * factor) >> 8) as u8;
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        (idx + 3 < self.buffer.len()).then_some(idx)
    }
}
