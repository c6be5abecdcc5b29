//! Shared test helpers.

use pix_overlay::config::OverlayConfig;
use pix_overlay::image_source::ImageSource;
use pix_overlay::{Bitmap, Overlay, OverlayError, Result, WindowService};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Everything the overlay asked of the window, in order.
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum WindowCall {
    SetVisible(bool),
    SetInputTransparent(bool),
    SetAlwaysOnTop(bool),
    MoveTo(i32, i32),
    Resize(u32, u32),
    SetOpacity(f32),
    RequestRepaint,
}

#[derive(Debug, Default)]
pub struct RecordingWindow {
    pub calls: Vec<WindowCall>,
}

#[allow(dead_code)]
impl RecordingWindow {
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn count(&self, pred: impl Fn(&WindowCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn last_move(&self) -> Option<(i32, i32)> {
        self.calls.iter().rev().find_map(|c| match c {
            WindowCall::MoveTo(x, y) => Some((*x, *y)),
            _ => None,
        })
    }
}

impl WindowService for RecordingWindow {
    fn set_visible(&mut self, visible: bool) {
        self.calls.push(WindowCall::SetVisible(visible));
    }

    fn set_input_transparent(&mut self, transparent: bool) {
        self.calls.push(WindowCall::SetInputTransparent(transparent));
    }

    fn set_always_on_top(&mut self, on_top: bool) {
        self.calls.push(WindowCall::SetAlwaysOnTop(on_top));
    }

    fn move_to(&mut self, x: i32, y: i32) {
        self.calls.push(WindowCall::MoveTo(x, y));
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.calls.push(WindowCall::Resize(width, height));
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.calls.push(WindowCall::SetOpacity(opacity));
    }

    fn request_repaint(&mut self) {
        self.calls.push(WindowCall::RequestRepaint);
    }
}

/// In-memory image directory. Paths missing from `images` fail to decode.
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct FakeImages {
    pub listing: Vec<PathBuf>,
    pub images: HashMap<PathBuf, Bitmap>,
}

#[allow(dead_code)]
impl FakeImages {
    pub fn with(mut self, name: &str, bitmap: Option<Bitmap>) -> Self {
        let path = PathBuf::from(name);
        self.listing.push(path.clone());
        if let Some(bitmap) = bitmap {
            self.images.insert(path, bitmap);
        }
        self
    }
}

impl ImageSource for FakeImages {
    fn list_images(&self, _dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(self.listing.clone())
    }

    fn decode_image(&self, path: &Path) -> Result<Bitmap> {
        self.images.get(path).cloned().ok_or_else(|| {
            let err = std::io::Error::new(std::io::ErrorKind::InvalidData, "not a PNG");
            OverlayError::ImageDecode {
                path: path.to_path_buf(),
                source: image::ImageError::IoError(err),
            }
        })
    }
}

/// Visible, interactive 80x60 overlay showing an 8x6 bitmap at scale 10
#[allow(dead_code)]
pub fn interactive_overlay() -> Overlay<RecordingWindow> {
    let config = OverlayConfig {
        click_through: false,
        ..OverlayConfig::default()
    };
    let mut overlay = Overlay::new(RecordingWindow::default(), &config);
    overlay.load_image(Bitmap::filled(8, 6, [255, 0, 0, 255]), 10.0, 10.0);
    overlay.show();
    overlay.window_mut().clear();
    overlay
}
