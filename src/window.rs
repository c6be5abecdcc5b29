// filepath: src/window.rs
//! Platform window service
//!
//! The overlay state machine drives the real window only through this trait.

/// Operations the overlay needs from the windowing system
pub trait WindowService {
    /// Map or unmap the window
    fn set_visible(&mut self, visible: bool);

    /// Let pointer and keyboard input fall through to whatever is beneath
    fn set_input_transparent(&mut self, transparent: bool);

    /// Keep the window above normal application windows
    fn set_always_on_top(&mut self, on_top: bool);

    /// Place the window's top-left corner in screen coordinates
    fn move_to(&mut self, x: i32, y: i32);

    fn resize(&mut self, width: u32, height: u32);

    /// Whole-window translucency in [0.05, 1.0]
    fn set_opacity(&mut self, opacity: f32);

    /// Ask for a redraw; multiple requests before the next frame coalesce
    fn request_repaint(&mut self);
}

/// Service for platforms without a window backend; every call is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullWindowService;

impl WindowService for NullWindowService {
    fn set_visible(&mut self, _visible: bool) {}
    fn set_input_transparent(&mut self, _transparent: bool) {}
    fn set_always_on_top(&mut self, _on_top: bool) {}
    fn move_to(&mut self, _x: i32, _y: i32) {}
    fn resize(&mut self, _width: u32, _height: u32) {}
    fn set_opacity(&mut self, _opacity: f32) {}
    fn request_repaint(&mut self) {}
}
