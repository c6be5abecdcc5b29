// filepath: src/controller.rs
//! Control panel controller
//!
//! Holds the user-facing control values (image list, X/Y scale, offsets)
//! and forwards changes to the overlay. With the aspect lock on, every
//! scale change reaches the overlay as a single uniform `set_scales` call.

use crate::command::{Command, HELP};
use crate::config::OverlayConfig;
use crate::error::{OverlayError, Result};
use crate::image_source::ImageSource;
use crate::overlay::Overlay;
use crate::transform::{TransformParams, MAX_SCALE, MIN_SCALE};
use crate::window::WindowService;
use log::{info, warn};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub const SLIDER_MIN: i32 = 1;
pub const SLIDER_MAX: i32 = 20_000;
pub const OFFSET_LIMIT: f64 = 2.0;

/// What the front end should do after a command
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Done,
    Message(String),
    Quit,
}

#[derive(Debug, Clone)]
pub struct ControlPanel {
    image_dir: PathBuf,
    images: Vec<PathBuf>,
    selected: usize,
    lock_aspect: bool,
    scale_x: f64,
    scale_y: f64,
    offset_x: f64,
    offset_y: f64,
    screen_size: (u32, u32),
}

impl ControlPanel {
    pub fn new(config: &OverlayConfig) -> Self {
        let scale_x = clamp_scale(config.scale_x);
        let scale_y = if config.lock_aspect {
            scale_x
        } else {
            clamp_scale(config.scale_y)
        };
        Self {
            image_dir: config.image_dir.clone(),
            images: Vec::new(),
            selected: 0,
            lock_aspect: config.lock_aspect,
            scale_x,
            scale_y,
            offset_x: 0.0,
            offset_y: 0.0,
            screen_size: (1920, 1080),
        }
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn selected_path(&self) -> Option<&Path> {
        self.images.get(self.selected).map(PathBuf::as_path)
    }

    pub fn lock_aspect(&self) -> bool {
        self.lock_aspect
    }

    pub fn scales(&self) -> (f64, f64) {
        (self.scale_x, self.scale_y)
    }

    /// Slider positions matching the current scale values
    pub fn slider_positions(&self) -> (i32, i32) {
        (slider_position(self.scale_x), slider_position(self.scale_y))
    }

    pub fn offsets(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    pub fn set_screen_size(&mut self, width: u32, height: u32) {
        self.screen_size = (width, height);
    }

    /// List the image directory and load the first image. The overlay is
    /// shown afterwards when `show` is set and an image was found.
    pub fn startup<W: WindowService, S: ImageSource + ?Sized>(
        &mut self,
        overlay: &mut Overlay<W>,
        source: &S,
        show: bool,
    ) -> Result<()> {
        let listing = source.list_images(&self.image_dir)?;
        self.apply_listing(listing, overlay, source)?;
        if show {
            overlay.show();
        }
        Ok(())
    }

    /// Re-list the image directory, keeping the selected file when it
    /// still exists.
    pub fn rescan<W: WindowService, S: ImageSource + ?Sized>(
        &mut self,
        overlay: &mut Overlay<W>,
        source: &S,
    ) -> Result<()> {
        let listing = source.list_images(&self.image_dir)?;
        self.apply_listing(listing, overlay, source)
    }

    /// Rescan only if the directory listing changed. Returns whether it did.
    pub fn refresh<W: WindowService, S: ImageSource + ?Sized>(
        &mut self,
        overlay: &mut Overlay<W>,
        source: &S,
    ) -> Result<bool> {
        let listing = source.list_images(&self.image_dir)?;
        if listing == self.images {
            return Ok(false);
        }
        self.apply_listing(listing, overlay, source)?;
        Ok(true)
    }

    /// Select image `index` (0-based) and load it
    pub fn select<W: WindowService, S: ImageSource + ?Sized>(
        &mut self,
        index: usize,
        overlay: &mut Overlay<W>,
        source: &S,
    ) -> Result<()> {
        if index >= self.images.len() {
            return Ok(());
        }
        self.selected = index;
        self.load_selected(overlay, source)
    }

    pub fn load_selected<W: WindowService, S: ImageSource + ?Sized>(
        &mut self,
        overlay: &mut Overlay<W>,
        source: &S,
    ) -> Result<()> {
        let Some(path) = self.images.get(self.selected) else {
            return Ok(());
        };
        overlay.load_from(source, path, self.scale_x, self.scale_y)?;
        self.offset_x = 0.0;
        self.offset_y = 0.0;
        Ok(())
    }

    pub fn set_lock_aspect<W: WindowService>(&mut self, enabled: bool, overlay: &mut Overlay<W>) {
        self.lock_aspect = enabled;
        if enabled {
            self.scale_y = self.scale_x;
            overlay.set_scales(self.scale_x, self.scale_x);
        }
    }

    pub fn set_scale_x<W: WindowService>(&mut self, value: f64, overlay: &mut Overlay<W>) {
        let v = clamp_scale(value);
        self.scale_x = v;
        if self.lock_aspect {
            self.scale_y = v;
        }
        overlay.set_scales(self.scale_x, self.scale_y);
    }

    pub fn set_scale_y<W: WindowService>(&mut self, value: f64, overlay: &mut Overlay<W>) {
        let v = clamp_scale(value);
        self.scale_y = v;
        if self.lock_aspect {
            self.scale_x = v;
        }
        overlay.set_scales(self.scale_x, self.scale_y);
    }

    pub fn set_scale_x_slider<W: WindowService>(&mut self, position: i32, overlay: &mut Overlay<W>) {
        self.set_scale_x(slider_value(position), overlay);
    }

    pub fn set_scale_y_slider<W: WindowService>(&mut self, position: i32, overlay: &mut Overlay<W>) {
        self.set_scale_y(slider_value(position), overlay);
    }

    /// Set both axes at once regardless of the lock
    pub fn set_uniform_scale<W: WindowService>(&mut self, value: f64, overlay: &mut Overlay<W>) {
        let v = clamp_scale(value);
        self.scale_x = v;
        self.scale_y = v;
        overlay.set_scales(v, v);
    }

    pub fn set_offsets<W: WindowService>(&mut self, x: f64, y: f64, overlay: &mut Overlay<W>) {
        self.offset_x = clamp_offset(x);
        self.offset_y = clamp_offset(y);
        overlay.set_offsets(self.offset_x, self.offset_y);
    }

    /// Pick up scale changes made on the overlay itself (wheel zoom)
    pub fn sync_scales(&mut self, transform: &TransformParams) {
        self.scale_x = clamp_scale(transform.scale_x());
        self.scale_y = clamp_scale(transform.scale_y());
    }

    pub fn execute<W: WindowService, S: ImageSource + ?Sized>(
        &mut self,
        command: Command,
        overlay: &mut Overlay<W>,
        source: &S,
    ) -> Result<Outcome> {
        match command {
            Command::Show => overlay.show(),
            Command::Hide => overlay.hide(),
            Command::Center => {
                let (w, h) = self.screen_size;
                overlay.center_in(w, h);
            }
            Command::Quit => return Ok(Outcome::Quit),
            Command::Scale(v) => self.set_uniform_scale(v, overlay),
            Command::ScaleX(v) => self.set_scale_x(v, overlay),
            Command::ScaleY(v) => self.set_scale_y(v, overlay),
            Command::SliderX(pos) => self.set_scale_x_slider(pos, overlay),
            Command::SliderY(pos) => self.set_scale_y_slider(pos, overlay),
            Command::LockAspect(on) => self.set_lock_aspect(on, overlay),
            Command::ClickThrough(on) => overlay.set_click_through(on),
            Command::AlwaysOnTop(on) => overlay.set_always_on_top(on),
            Command::Opacity(percent) => {
                overlay.set_overlay_opacity(percent.clamp(5, 100) as f32 / 100.0)
            }
            Command::Grid(on) => overlay.set_show_grid(on),
            Command::GridAlpha(a) => overlay.set_grid_alpha(a),
            Command::GridWidth(w) => overlay.set_grid_width(w),
            Command::Holes(on) => overlay.set_holes_enabled(on),
            Command::HolePercent(p) => overlay.set_hole_percent(p),
            Command::Offset(x, y) => self.set_offsets(x, y, overlay),
            Command::List => return Ok(Outcome::Message(self.listing())),
            Command::Select(number) => {
                if number == 0 || number > self.images.len() {
                    return Ok(Outcome::Message(format!("no image #{number}")));
                }
                self.select(number - 1, overlay, source)?;
            }
            Command::Next | Command::Prev => {
                let len = self.images.len();
                if len == 0 {
                    return Ok(Outcome::Message("no images loaded".to_string()));
                }
                let index = if command == Command::Next {
                    (self.selected + 1) % len
                } else {
                    (self.selected + len - 1) % len
                };
                self.select(index, overlay, source)?;
            }
            Command::Rescan => self.rescan(overlay, source)?,
            Command::Status => return Ok(Outcome::Message(self.status(overlay))),
            Command::Help => return Ok(Outcome::Message(HELP.to_string())),
        }
        Ok(Outcome::Done)
    }

    pub fn listing(&self) -> String {
        if self.images.is_empty() {
            return format!("no images in {}", self.image_dir.display());
        }
        let mut out = String::new();
        for (i, path) in self.images.iter().enumerate() {
            let marker = if i == self.selected { '*' } else { ' ' };
            let _ = writeln!(out, "{marker}{:>3}: {}", i + 1, file_name(path));
        }
        out.trim_end().to_string()
    }

    pub fn status<W: WindowService>(&self, overlay: &Overlay<W>) -> String {
        let state = overlay.state();
        let deco = overlay.decorations();
        let t = overlay.transform();
        let image = overlay
            .bitmap()
            .map(|b| format!("{}x{}", b.width(), b.height()))
            .unwrap_or_else(|| "none".to_string());
        let name = self
            .selected_path()
            .map(file_name)
            .unwrap_or_else(|| "-".to_string());
        let on = |b: bool| if b { "on" } else { "off" };

        format!(
            "image {name} ({image})\n\
             {:?} at {:?}, size {:?}\n\
             scale {:.3} x {:.3} (lock {}), offset {:.3}, {:.3}\n\
             opacity {:.2}, top {}, click-through {}\n\
             grid {} alpha {} width {}, holes {} {:.1}%",
            overlay.visibility(),
            state.position,
            overlay.size(),
            t.scale_x(),
            t.scale_y(),
            on(self.lock_aspect),
            t.offset_x(),
            t.offset_y(),
            overlay.opacity(),
            on(state.always_on_top),
            on(state.click_through),
            on(deco.show_grid()),
            deco.grid_alpha(),
            deco.grid_line_width(),
            on(deco.show_holes()),
            deco.hole_percent(),
        )
    }

    fn apply_listing<W: WindowService, S: ImageSource + ?Sized>(
        &mut self,
        listing: Vec<PathBuf>,
        overlay: &mut Overlay<W>,
        source: &S,
    ) -> Result<()> {
        let previous = self.selected_path().map(Path::to_path_buf);
        self.images = listing;
        self.selected = previous
            .and_then(|prev| self.images.iter().position(|p| *p == prev))
            .unwrap_or(0);

        if self.images.is_empty() {
            warn!("No PNG images in {}", self.image_dir.display());
            return Err(OverlayError::EmptyImageSet {
                dir: self.image_dir.clone(),
            });
        }
        info!(
            "Found {} image(s) in {}",
            self.images.len(),
            self.image_dir.display()
        );
        self.load_selected(overlay, source)
    }
}

/// Scale value for a slider position
pub fn slider_value(position: i32) -> f64 {
    position.clamp(SLIDER_MIN, SLIDER_MAX) as f64 / 100.0
}

/// Slider position for a scale value
pub fn slider_position(value: f64) -> i32 {
    (value * 100.0)
        .round()
        .clamp(SLIDER_MIN as f64, SLIDER_MAX as f64) as i32
}

fn clamp_scale(value: f64) -> f64 {
    if value.is_nan() {
        MIN_SCALE
    } else {
        value.clamp(MIN_SCALE, MAX_SCALE)
    }
}

fn clamp_offset(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-OFFSET_LIMIT, OFFSET_LIMIT)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
