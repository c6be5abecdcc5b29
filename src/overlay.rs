// filepath: src/overlay.rs
//! Overlay window state machine
//!
//! Owns the displayed bitmap, the transform and the decoration settings,
//! and turns setter calls and input events into window service calls.
//! Input is only acted on while the overlay is visible and interactive;
//! a click-through window never starts a drag.

use crate::bitmap::Bitmap;
use crate::config::OverlayConfig;
use crate::draw::Canvas;
use crate::error::Result;
use crate::image_source::ImageSource;
use crate::render::{self, DecorationSettings};
use crate::transform::{TransformParams, MAX_SCALE, MIN_SCALE, MIN_WINDOW_EDGE};
use crate::window::WindowService;
use log::{debug, info, warn};
use std::path::Path;

pub const MIN_OPACITY: f32 = 0.05;
pub const MAX_OPACITY: f32 = 1.0;

/// Scale change per wheel notch
pub const WHEEL_SCALE_STEP: f64 = 0.01;

/// Arrow-key move distance in screen pixels
pub const KEY_STEP: i32 = 1;
pub const KEY_STEP_FAST: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    VisibleClickThrough,
    VisibleInteractive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

/// Input delivered to the overlay. Pointer positions are global screen
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown {
        position: (f64, f64),
        button: PointerButton,
    },
    PointerMove {
        position: (f64, f64),
    },
    PointerUp {
        position: (f64, f64),
        button: PointerButton,
    },
    KeyDown {
        key: Key,
        modifiers: Modifiers,
    },
    /// `notches` is positive when scrolling away from the user
    Wheel {
        notches: i32,
        modifiers: Modifiers,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowState {
    pub visible: bool,
    pub click_through: bool,
    pub always_on_top: bool,
    pub dragging: bool,
    pub drag_anchor: (f64, f64),
    pub position: (i32, i32),
}

pub struct Overlay<W: WindowService> {
    window: W,
    bitmap: Option<Bitmap>,
    transform: TransformParams,
    decorations: DecorationSettings,
    state: WindowState,
    opacity: f32,
    size: (u32, u32),
}

impl<W: WindowService> Overlay<W> {
    /// Create a hidden overlay with no bitmap and push the initial window
    /// attributes to the service.
    pub fn new(window: W, config: &OverlayConfig) -> Self {
        let mut decorations = DecorationSettings::default();
        decorations.set_show_grid(config.show_grid);
        decorations.set_grid_alpha(config.grid_alpha);
        decorations.set_grid_line_width(config.grid_width);
        decorations.set_show_holes(config.show_holes);
        decorations.set_hole_percent(config.hole_percent);

        let mut overlay = Self {
            window,
            bitmap: None,
            transform: TransformParams::new(config.scale_x, config.scale_y),
            decorations,
            state: WindowState {
                visible: false,
                click_through: config.click_through,
                always_on_top: config.always_on_top,
                dragging: false,
                drag_anchor: (0.0, 0.0),
                position: (0, 0),
            },
            opacity: clamp_opacity(config.opacity),
            size: (MIN_WINDOW_EDGE, MIN_WINDOW_EDGE),
        };

        let (w, h) = overlay.size;
        overlay.window.resize(w, h);
        overlay
            .window
            .set_input_transparent(overlay.state.click_through);
        overlay.window.set_always_on_top(overlay.state.always_on_top);
        overlay.window.set_opacity(overlay.opacity);
        overlay
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut W {
        &mut self.window
    }

    pub fn bitmap(&self) -> Option<&Bitmap> {
        self.bitmap.as_ref()
    }

    pub fn transform(&self) -> &TransformParams {
        &self.transform
    }

    pub fn decorations(&self) -> &DecorationSettings {
        &self.decorations
    }

    pub fn state(&self) -> &WindowState {
        &self.state
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Current window size in screen pixels
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn position(&self) -> (i32, i32) {
        self.state.position
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    pub fn visibility(&self) -> Visibility {
        match (self.state.visible, self.state.click_through) {
            (false, _) => Visibility::Hidden,
            (true, true) => Visibility::VisibleClickThrough,
            (true, false) => Visibility::VisibleInteractive,
        }
    }

    /// Replace the bitmap. Offsets reset, visibility is unchanged.
    pub fn load_image(&mut self, bitmap: Bitmap, scale_x: f64, scale_y: f64) {
        info!(
            "Loading {}x{} image at scale {}x{}",
            bitmap.width(),
            bitmap.height(),
            scale_x,
            scale_y
        );
        self.bitmap = Some(bitmap);
        self.transform.set_scales(scale_x, scale_y);
        self.transform.reset_offsets();
        self.resize_to_image();
        self.window.request_repaint();
    }

    /// Decode `path` and display it. On failure nothing changes.
    pub fn load_from<S: ImageSource + ?Sized>(
        &mut self,
        source: &S,
        path: &Path,
        scale_x: f64,
        scale_y: f64,
    ) -> Result<()> {
        match source.decode_image(path) {
            Ok(bitmap) => {
                self.load_image(bitmap, scale_x, scale_y);
                Ok(())
            }
            Err(err) => {
                warn!("Keeping current image: {err}");
                Err(err)
            }
        }
    }

    pub fn show(&mut self) {
        if self.state.visible {
            return;
        }
        info!("Showing overlay");
        self.state.visible = true;
        self.window.set_visible(true);
        self.window.set_input_transparent(self.state.click_through);
        self.window.request_repaint();
    }

    pub fn hide(&mut self) {
        if !self.state.visible {
            return;
        }
        info!("Hiding overlay");
        self.state.visible = false;
        self.end_drag();
        self.window.set_visible(false);
    }

    pub fn set_click_through(&mut self, enabled: bool) {
        info!("Click-through {}", if enabled { "on" } else { "off" });
        self.state.click_through = enabled;
        self.end_drag();
        self.window.set_input_transparent(enabled);
    }

    pub fn set_always_on_top(&mut self, enabled: bool) {
        info!("Always on top {}", if enabled { "on" } else { "off" });
        self.state.always_on_top = enabled;
        self.window.set_always_on_top(enabled);
        if self.state.visible {
            self.window.set_input_transparent(self.state.click_through);
        }
    }

    pub fn set_scales(&mut self, scale_x: f64, scale_y: f64) {
        self.transform.set_scales(scale_x, scale_y);
        self.resize_to_image();
        self.window.request_repaint();
    }

    pub fn set_offsets(&mut self, offset_x: f64, offset_y: f64) {
        self.transform.set_offsets(offset_x, offset_y);
        self.window.request_repaint();
    }

    pub fn set_show_grid(&mut self, enabled: bool) {
        self.decorations.set_show_grid(enabled);
        self.window.request_repaint();
    }

    pub fn set_grid_alpha(&mut self, alpha: i32) {
        self.decorations.set_grid_alpha(alpha);
        self.window.request_repaint();
    }

    pub fn set_grid_width(&mut self, width: i32) {
        self.decorations.set_grid_line_width(width);
        self.window.request_repaint();
    }

    pub fn set_holes_enabled(&mut self, enabled: bool) {
        self.decorations.set_show_holes(enabled);
        self.window.request_repaint();
    }

    pub fn set_hole_percent(&mut self, percent: f64) {
        self.decorations.set_hole_percent(percent);
        self.window.request_repaint();
    }

    /// Whole-window translucency, clamped to [0.05, 1.0]
    pub fn set_overlay_opacity(&mut self, opacity: f32) {
        self.opacity = clamp_opacity(opacity);
        self.window.set_opacity(self.opacity);
    }

    pub fn move_to(&mut self, x: i32, y: i32) {
        self.state.position = (x, y);
        self.window.move_to(x, y);
    }

    /// Show the overlay if needed and centre it in an area of the given size
    pub fn center_in(&mut self, area_width: u32, area_height: u32) {
        if !self.state.visible {
            self.show();
        }
        let (w, h) = self.size;
        let x = area_width as i64 / 2 - w as i64 / 2;
        let y = area_height as i64 / 2 - h as i64 / 2;
        self.move_to(saturate(x), saturate(y));
    }

    /// Feed one input event. Returns whether the overlay consumed it.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        if !self.state.visible || self.state.click_through {
            return false;
        }

        match event {
            InputEvent::PointerDown {
                position,
                button: PointerButton::Primary,
            } => {
                let (x, y) = self.state.position;
                self.state.dragging = true;
                self.state.drag_anchor = (position.0 - x as f64, position.1 - y as f64);
                debug!("Drag started, anchor {:?}", self.state.drag_anchor);
                true
            }
            InputEvent::PointerMove { position } if self.state.dragging => {
                let (ax, ay) = self.state.drag_anchor;
                let x = saturate((position.0 - ax).round() as i64);
                let y = saturate((position.1 - ay).round() as i64);
                self.move_to(x, y);
                true
            }
            InputEvent::PointerUp {
                button: PointerButton::Primary,
                ..
            } if self.state.dragging => {
                debug!("Drag ended at {:?}", self.state.position);
                self.state.dragging = false;
                true
            }
            InputEvent::KeyDown { key, modifiers } => {
                let step = if modifiers.shift {
                    KEY_STEP_FAST
                } else {
                    KEY_STEP
                };
                let (dx, dy) = match key {
                    Key::Left => (-step, 0),
                    Key::Right => (step, 0),
                    Key::Up => (0, -step),
                    Key::Down => (0, step),
                    Key::Other => return false,
                };
                let (x, y) = self.state.position;
                self.move_to(x.saturating_add(dx), y.saturating_add(dy));
                true
            }
            InputEvent::Wheel { notches, modifiers } if modifiers.ctrl && notches != 0 => {
                let delta = WHEEL_SCALE_STEP * notches as f64;
                let sx = wheel_scale(self.transform.scale_x(), delta);
                let sy = wheel_scale(self.transform.scale_y(), delta);
                self.set_scales(sx, sy);
                true
            }
            _ => false,
        }
    }

    /// Paint the current frame into `canvas`
    pub fn paint(&self, canvas: &mut Canvas) {
        render::render(
            canvas,
            self.bitmap.as_ref(),
            &self.transform,
            &self.decorations,
        );
    }

    fn end_drag(&mut self) {
        if self.state.dragging {
            debug!("Drag cancelled");
        }
        self.state.dragging = false;
    }

    fn resize_to_image(&mut self) {
        let Some(bitmap) = &self.bitmap else {
            return;
        };
        self.size = self.transform.window_size(bitmap.width(), bitmap.height());
        let (w, h) = self.size;
        self.window.resize(w, h);
    }
}

fn clamp_opacity(opacity: f32) -> f32 {
    if opacity.is_nan() {
        MAX_OPACITY
    } else {
        opacity.clamp(MIN_OPACITY, MAX_OPACITY)
    }
}

/// Wheel zoom stops at `MAX_SCALE` but never pulls a larger scale down.
fn wheel_scale(current: f64, delta: f64) -> f64 {
    (current + delta).max(MIN_SCALE).min(MAX_SCALE.max(current))
}

fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
