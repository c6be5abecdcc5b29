// filepath: src/transform.rs
//! Image-space to screen-space coordinate model
//!
//! A source pixel at integer coordinate (x, y) covers the image-space square
//! [x, x+1) x [y, y+1). Screen position is `offset + coordinate * scale`
//! on each axis independently.

/// Smallest scale factor accepted on either axis.
pub const MIN_SCALE: f64 = 0.01;

/// Largest scale reachable from the control panel and wheel zoom.
pub const MAX_SCALE: f64 = 200.0;

/// Minimum window edge in screen pixels, keeps tiny images grabbable.
pub const MIN_WINDOW_EDGE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformParams {
    scale_x: f64,
    scale_y: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl TransformParams {
    pub fn new(scale_x: f64, scale_y: f64) -> Self {
        let mut params = Self {
            scale_x: MIN_SCALE,
            scale_y: MIN_SCALE,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        params.set_scales(scale_x, scale_y);
        params
    }

    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    pub fn offset_y(&self) -> f64 {
        self.offset_y
    }

    /// Set both scales, flooring each at `MIN_SCALE`. Offsets are untouched.
    pub fn set_scales(&mut self, scale_x: f64, scale_y: f64) {
        self.scale_x = clamp_scale(scale_x);
        self.scale_y = clamp_scale(scale_y);
    }

    pub fn set_offsets(&mut self, offset_x: f64, offset_y: f64) {
        self.offset_x = finite_or_zero(offset_x);
        self.offset_y = finite_or_zero(offset_y);
    }

    pub fn reset_offsets(&mut self) {
        self.offset_x = 0.0;
        self.offset_y = 0.0;
    }

    pub fn map_image_to_screen(&self, px: f64, py: f64) -> (f64, f64) {
        (
            self.offset_x + px * self.scale_x,
            self.offset_y + py * self.scale_y,
        )
    }

    pub fn map_screen_to_image(&self, sx: f64, sy: f64) -> (f64, f64) {
        (
            (sx - self.offset_x) / self.scale_x,
            (sy - self.offset_y) / self.scale_y,
        )
    }

    /// Window size needed to show a `width` x `height` bitmap at the current scales.
    pub fn window_size(&self, width: u32, height: u32) -> (u32, u32) {
        compute_window_size(width, height, self.scale_x, self.scale_y)
    }
}

/// Window size for a bitmap at the given scales, never below `MIN_WINDOW_EDGE`.
pub fn compute_window_size(width: u32, height: u32, scale_x: f64, scale_y: f64) -> (u32, u32) {
    let edge = |len: u32, scale: f64| {
        let scaled = (len as f64 * clamp_scale(scale)).round();
        if scaled > MIN_WINDOW_EDGE as f64 {
            scaled.min(u32::MAX as f64) as u32
        } else {
            MIN_WINDOW_EDGE
        }
    };
    (edge(width, scale_x), edge(height, scale_y))
}

fn clamp_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        MIN_SCALE
    } else {
        scale.max(MIN_SCALE)
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
