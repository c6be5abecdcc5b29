// filepath: src/render.rs
//! Overlay render engine
//!
//! A frame is described as a list of [`DrawOp`]s in image space and then
//! executed by a [`Painter`] that applies the active [`TransformParams`].
//! The order is fixed: bitmap, holes, grid.

use crate::bitmap::Bitmap;
use crate::draw::{Canvas, CompositionMode, TRANSPARENT};
use crate::transform::TransformParams;

pub const MAX_GRID_WIDTH: u32 = 5;

/// Grid and hole decoration applied on top of the bitmap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecorationSettings {
    show_grid: bool,
    grid_alpha: u8,
    grid_line_width: u32,
    show_holes: bool,
    hole_percent: f64,
}

impl Default for DecorationSettings {
    fn default() -> Self {
        Self {
            show_grid: true,
            grid_alpha: 140,
            grid_line_width: 1,
            show_holes: true,
            hole_percent: 40.0,
        }
    }
}

impl DecorationSettings {
    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn grid_alpha(&self) -> u8 {
        self.grid_alpha
    }

    pub fn grid_line_width(&self) -> u32 {
        self.grid_line_width
    }

    pub fn show_holes(&self) -> bool {
        self.show_holes
    }

    pub fn hole_percent(&self) -> f64 {
        self.hole_percent
    }

    /// Hole radius in image-space units (fractions of one pixel edge)
    pub fn hole_radius(&self) -> f64 {
        self.hole_percent / 200.0
    }

    pub fn set_show_grid(&mut self, enabled: bool) {
        self.show_grid = enabled;
    }

    pub fn set_grid_alpha(&mut self, alpha: i32) {
        self.grid_alpha = alpha.clamp(0, 255) as u8;
    }

    pub fn set_grid_line_width(&mut self, width: i32) {
        self.grid_line_width = width.clamp(1, MAX_GRID_WIDTH as i32) as u32;
    }

    pub fn set_show_holes(&mut self, enabled: bool) {
        self.show_holes = enabled;
    }

    pub fn set_hole_percent(&mut self, percent: f64) {
        self.hole_percent = if percent.is_nan() {
            0.0
        } else {
            percent.clamp(0.0, 100.0)
        };
    }

    fn holes_active(&self) -> bool {
        self.show_holes && self.hole_percent > 0.0
    }
}

/// Line style. Width is cosmetic: constant in screen pixels at any scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pen {
    pub color: [u8; 4],
    pub width: u32,
}

/// One drawing step, coordinates in image space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawOp {
    /// The bitmap at the image-space origin, nearest-neighbour sampled
    Bitmap,
    SetComposition(CompositionMode),
    /// Filled ellipse, circular in image space
    Ellipse {
        center: (f64, f64),
        radius: f64,
        fill: [u8; 4],
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        pen: Pen,
    },
}

/// Build the draw sequence for one frame of `bitmap`
pub fn frame_ops(bitmap: &Bitmap, decorations: &DecorationSettings) -> Vec<DrawOp> {
    let w = bitmap.width();
    let h = bitmap.height();
    let mut ops = vec![DrawOp::Bitmap];

    if decorations.holes_active() {
        let radius = decorations.hole_radius();
        ops.reserve(w as usize * h as usize + 2);
        ops.push(DrawOp::SetComposition(CompositionMode::Clear));
        for y in 0..h {
            let cy = y as f64 + 0.5;
            for x in 0..w {
                ops.push(DrawOp::Ellipse {
                    center: (x as f64 + 0.5, cy),
                    radius,
                    fill: [0, 0, 0, 255],
                });
            }
        }
        ops.push(DrawOp::SetComposition(CompositionMode::SourceOver));
    }

    if decorations.show_grid() {
        let a = decorations.grid_alpha();
        let pen = Pen {
            color: [0, 0, 0, a],
            width: decorations.grid_line_width(),
        };
        let (wf, hf) = (w as f64, h as f64);
        for x in 0..=w {
            let xf = x as f64;
            ops.push(DrawOp::Line {
                from: (xf, 0.0),
                to: (xf, hf),
                pen,
            });
        }
        for y in 0..=h {
            let yf = y as f64;
            ops.push(DrawOp::Line {
                from: (0.0, yf),
                to: (wf, yf),
                pen,
            });
        }
    }

    ops
}

/// Paint one frame. With no bitmap nothing is drawn.
pub fn render(
    canvas: &mut Canvas,
    bitmap: Option<&Bitmap>,
    transform: &TransformParams,
    decorations: &DecorationSettings,
) {
    let Some(bitmap) = bitmap else {
        return;
    };
    let ops = frame_ops(bitmap, decorations);
    let mut painter = Painter::new(canvas, *transform);
    for op in &ops {
        painter.execute(op, bitmap);
    }
}

/// Executes draw ops against a canvas under a transform
pub struct Painter<'c, 'a> {
    canvas: &'c mut Canvas<'a>,
    transform: TransformParams,
    mode: CompositionMode,
}

impl<'c, 'a> Painter<'c, 'a> {
    pub fn new(canvas: &'c mut Canvas<'a>, transform: TransformParams) -> Self {
        Self {
            canvas,
            transform,
            mode: CompositionMode::SourceOver,
        }
    }

    pub fn mode(&self) -> CompositionMode {
        self.mode
    }

    pub fn execute(&mut self, op: &DrawOp, bitmap: &Bitmap) {
        match *op {
            DrawOp::Bitmap => self.draw_bitmap(bitmap),
            DrawOp::SetComposition(mode) => self.mode = mode,
            DrawOp::Ellipse {
                center,
                radius,
                fill,
            } => self.draw_ellipse(center, radius, fill),
            DrawOp::Line { from, to, pen } => self.draw_line(from, to, pen),
        }
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap) {
        if bitmap.is_empty() {
            return;
        }
        let t = &self.transform;
        let (left, top) = t.map_image_to_screen(0.0, 0.0);
        let (right, bottom) = t.map_image_to_screen(bitmap.width() as f64, bitmap.height() as f64);

        let x_start = left.floor().max(0.0) as u32;
        let y_start = top.floor().max(0.0) as u32;
        let x_end = (right.ceil().max(0.0) as u32).min(self.canvas.width());
        let y_end = (bottom.ceil().max(0.0) as u32).min(self.canvas.height());

        // Source column for each screen column, sampled at the pixel centre
        let columns: Vec<Option<u32>> = (x_start..x_end)
            .map(|sx| {
                let (ix, _) = t.map_screen_to_image(sx as f64 + 0.5, 0.0);
                source_index(ix, bitmap.width())
            })
            .collect();

        for sy in y_start..y_end {
            let (_, iy) = t.map_screen_to_image(0.0, sy as f64 + 0.5);
            let Some(row) = source_index(iy, bitmap.height()) else {
                continue;
            };
            for (sx, col) in (x_start..x_end).zip(&columns) {
                if let Some(px) = col.and_then(|col| bitmap.pixel(col, row)) {
                    self.canvas.put_pixel(sx, sy, px, self.mode);
                }
            }
        }
    }

    fn draw_ellipse(&mut self, center: (f64, f64), radius: f64, fill: [u8; 4]) {
        let (cx, cy) = self.transform.map_image_to_screen(center.0, center.1);
        let rx = radius * self.transform.scale_x();
        let ry = radius * self.transform.scale_y();
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }

        let x_start = (cx - rx).floor().max(0.0) as u32;
        let y_start = (cy - ry).floor().max(0.0) as u32;
        let x_end = ((cx + rx).ceil().max(0.0) as u32).min(self.canvas.width());
        let y_end = ((cy + ry).ceil().max(0.0) as u32).min(self.canvas.height());

        let color = match self.mode {
            CompositionMode::Clear => TRANSPARENT,
            CompositionMode::SourceOver => fill,
        };

        for sy in y_start..y_end {
            let dy = (sy as f64 + 0.5 - cy) / ry;
            for sx in x_start..x_end {
                let dx = (sx as f64 + 0.5 - cx) / rx;
                if dx * dx + dy * dy <= 1.0 {
                    self.canvas.put_pixel(sx, sy, color, self.mode);
                }
            }
        }
    }

    /// Lines step along their major axis; each step stamps `pen.width`
    /// pixels across it, so the stroke never scales with the transform.
    fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), pen: Pen) {
        let (ax, ay) = self.transform.map_image_to_screen(from.0, from.1);
        let (bx, by) = self.transform.map_image_to_screen(to.0, to.1);
        let (dx, dy) = (bx - ax, by - ay);
        let half = pen.width as f64 / 2.0;
        let width = pen.width as i64;
        let (canvas_w, canvas_h) = (self.canvas.width() as i64, self.canvas.height() as i64);

        if dy.abs() >= dx.abs() {
            let y0 = (round_half_up(ay.min(by)) as i64).max(0);
            let y1 = (round_half_up(ay.max(by)) as i64).min(canvas_h - 1);
            for y in y0..=y1 {
                let t = if dy == 0.0 {
                    0.0
                } else {
                    ((y as f64 - ay) / dy).clamp(0.0, 1.0)
                };
                let xs = round_half_up(ax + dx * t - half) as i64;
                self.canvas
                    .fill_rect(xs, y, xs + width, y + 1, pen.color, self.mode);
            }
        } else {
            let x0 = (round_half_up(ax.min(bx)) as i64).max(0);
            let x1 = (round_half_up(ax.max(bx)) as i64).min(canvas_w - 1);
            for x in x0..=x1 {
                let t = ((x as f64 - ax) / dx).clamp(0.0, 1.0);
                let ys = round_half_up(ay + dy * t - half) as i64;
                self.canvas
                    .fill_rect(x, ys, x + 1, ys + width, pen.color, self.mode);
            }
        }
    }
}

fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

fn source_index(coord: f64, len: u32) -> Option<u32> {
    let idx = coord.floor();
    (idx >= 0.0 && idx < len as f64).then_some(idx as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_decorations() -> DecorationSettings {
        let mut deco = DecorationSettings::default();
        deco.set_show_grid(false);
        deco.set_show_holes(false);
        deco
    }

    fn paint(
        bitmap: &Bitmap,
        transform: &TransformParams,
        deco: &DecorationSettings,
        size: (u32, u32),
    ) -> Vec<u8> {
        let mut buf = vec![0u8; (size.0 * size.1 * 4) as usize];
        let mut canvas = Canvas::new(&mut buf, size.0, size.1);
        render(&mut canvas, Some(bitmap), transform, deco);
        buf
    }

    fn px(buf: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * width + x) * 4) as usize;
        [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
    }

    #[test]
    fn settings_clamp() {
        let mut deco = DecorationSettings::default();
        deco.set_grid_alpha(300);
        deco.set_grid_line_width(0);
        deco.set_hole_percent(-4.0);
        assert_eq!(deco.grid_alpha(), 255);
        assert_eq!(deco.grid_line_width(), 1);
        assert_eq!(deco.hole_percent(), 0.0);
        deco.set_grid_alpha(-1);
        deco.set_grid_line_width(9);
        deco.set_hole_percent(100.0);
        assert_eq!(deco.grid_alpha(), 0);
        assert_eq!(deco.grid_line_width(), 5);
        assert_eq!(deco.hole_radius(), 0.5);
    }

    #[test]
    fn no_bitmap_draws_nothing() {
        let mut buf = vec![7u8; 16];
        let mut canvas = Canvas::new(&mut buf, 2, 2);
        render(
            &mut canvas,
            None,
            &TransformParams::default(),
            &DecorationSettings::default(),
        );
        assert!(buf.iter().all(|b| *b == 7));
    }

    #[test]
    fn bitmap_scales_with_crisp_edges() {
        let bmp = Bitmap::from_rgba8(2, 1, &[255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
        let t = TransformParams::new(3.0, 2.0);
        let buf = paint(&bmp, &t, &no_decorations(), (6, 2));
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(px(&buf, 6, x, y), [0, 0, 255, 255]);
            }
            for x in 3..6 {
                assert_eq!(px(&buf, 6, x, y), [255, 0, 0, 255]);
            }
        }
    }

    #[test]
    fn offset_shifts_sampling() {
        let bmp = Bitmap::from_rgba8(2, 1, &[255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
        let mut t = TransformParams::new(4.0, 4.0);
        t.set_offsets(1.0, 0.0);
        let buf = paint(&bmp, &t, &no_decorations(), (9, 4));
        assert_eq!(px(&buf, 9, 0, 0), [0, 0, 0, 0]);
        assert_eq!(px(&buf, 9, 4, 0), [0, 0, 255, 255]);
        assert_eq!(px(&buf, 9, 5, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn holes_clear_pixel_centres() {
        let bmp = Bitmap::filled(2, 2, [10, 20, 30, 255]);
        let mut deco = no_decorations();
        deco.set_show_holes(true);
        deco.set_hole_percent(100.0);
        let t = TransformParams::new(10.0, 10.0);
        let buf = paint(&bmp, &t, &deco, (20, 20));
        assert_eq!(px(&buf, 20, 5, 5), [0, 0, 0, 0]);
        assert_eq!(px(&buf, 20, 15, 14), [0, 0, 0, 0]);
        // Pixel corners lie outside the inscribed circle
        assert_eq!(px(&buf, 20, 0, 0), [30, 20, 10, 255]);
        assert_eq!(px(&buf, 20, 19, 10), [30, 20, 10, 255]);
    }

    #[test]
    fn hole_ops_are_bracketed_by_composition_changes() {
        let bmp = Bitmap::filled(3, 2, [0, 0, 0, 255]);
        let mut deco = no_decorations();
        deco.set_show_holes(true);
        let ops = frame_ops(&bmp, &deco);
        assert_eq!(ops.len(), 1 + 2 + 6);
        assert_eq!(ops[0], DrawOp::Bitmap);
        assert_eq!(ops[1], DrawOp::SetComposition(CompositionMode::Clear));
        assert_eq!(
            ops.last(),
            Some(&DrawOp::SetComposition(CompositionMode::SourceOver))
        );
        assert!(matches!(
            ops[2],
            DrawOp::Ellipse { center: (cx, cy), radius, .. }
                if cx == 0.5 && cy == 0.5 && radius == 0.2
        ));
    }

    #[test]
    fn zero_hole_percent_skips_holes() {
        let bmp = Bitmap::filled(4, 4, [0, 0, 0, 255]);
        let mut deco = no_decorations();
        deco.set_show_holes(true);
        deco.set_hole_percent(0.0);
        assert_eq!(frame_ops(&bmp, &deco), vec![DrawOp::Bitmap]);
    }

    #[test]
    fn grid_width_is_cosmetic() {
        let bmp = Bitmap::filled(2, 2, [255, 255, 255, 255]);
        let mut deco = no_decorations();
        deco.set_show_grid(true);
        deco.set_grid_alpha(255);
        deco.set_grid_line_width(1);
        let t = TransformParams::new(10.0, 10.0);
        let buf = paint(&bmp, &t, &deco, (20, 20));
        // Vertical line at image x = 1 lands on screen column 10 only
        assert_eq!(px(&buf, 20, 10, 3), [0, 0, 0, 255]);
        assert_eq!(px(&buf, 20, 9, 3), [255, 255, 255, 255]);
        assert_eq!(px(&buf, 20, 11, 3), [255, 255, 255, 255]);

        deco.set_grid_line_width(3);
        let buf = paint(&bmp, &t, &deco, (20, 20));
        assert_eq!(px(&buf, 20, 8, 3), [255, 255, 255, 255]);
        for x in 9..12 {
            assert_eq!(px(&buf, 20, x, 3), [0, 0, 0, 255]);
        }
        assert_eq!(px(&buf, 20, 12, 3), [255, 255, 255, 255]);
    }

    #[test]
    fn grid_blends_with_alpha_after_holes() {
        let bmp = Bitmap::filled(1, 1, [255, 255, 255, 255]);
        let mut deco = DecorationSettings::default();
        deco.set_grid_alpha(128);
        deco.set_hole_percent(100.0);
        let t = TransformParams::new(20.0, 20.0);
        let buf = paint(&bmp, &t, &deco, (20, 20));
        // Top edge line over opaque white
        assert_eq!(px(&buf, 20, 1, 0), [127, 127, 127, 255]);
        // Hole centre stays transparent
        assert_eq!(px(&buf, 20, 10, 10), [0, 0, 0, 0]);
    }
}
