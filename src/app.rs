// filepath: src/app.rs
//! Main application logic for pix-overlay

use crate::layer_window::LayerWindow;
use log::{debug, info, warn};
use pix_overlay::command::Command;
use pix_overlay::controller::{ControlPanel, Outcome};
use pix_overlay::image_source::FsImageSource;
use pix_overlay::overlay::{InputEvent, Modifiers};
use pix_overlay::{Canvas, Overlay, OverlayError};
use smithay_client_toolkit::{
    output::OutputState,
    registry::RegistryState,
    seat::SeatState,
    shm::{slot::SlotPool, Shm},
};
use wayland_client::protocol::{wl_keyboard, wl_pointer, wl_shm};

pub struct AppData {
    registry_state: RegistryState,
    output_state: OutputState,
    seat_state: SeatState,
    shm_state: Shm,
    pool: SlotPool,
    pub(crate) overlay: Overlay<LayerWindow>,
    panel: ControlPanel,
    source: FsImageSource,
    pointer: Option<wl_pointer::WlPointer>,
    keyboard: Option<wl_keyboard::WlKeyboard>,
    pub(crate) modifiers: Modifiers,
    pub(crate) exit: bool,
}

impl AppData {
    pub fn new(
        registry_state: RegistryState,
        output_state: OutputState,
        seat_state: SeatState,
        shm_state: Shm,
        pool: SlotPool,
        overlay: Overlay<LayerWindow>,
        panel: ControlPanel,
    ) -> Self {
        Self {
            registry_state,
            output_state,
            seat_state,
            shm_state,
            pool,
            overlay,
            panel,
            source: FsImageSource,
            pointer: None,
            keyboard: None,
            modifiers: Modifiers::default(),
            exit: false,
        }
    }

    /// Scan the image directory and load the first image
    pub fn startup(&mut self, show: bool) {
        self.update_screen_size();
        match self.panel.startup(&mut self.overlay, &self.source, show) {
            Ok(()) => {
                if let Some(path) = self.panel.selected_path() {
                    println!("loaded {}", path.display());
                }
            }
            Err(OverlayError::EmptyImageSet { dir }) => {
                println!(
                    "No PNGs found. Put some PNG files in {} and run `rescan`.",
                    dir.display()
                );
            }
            Err(e) => println!("{e}"),
        }
        println!("Type `help` for commands.");
    }

    pub fn draw(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let window = self.overlay.window();
        if !window.is_ready() {
            debug!("draw() called before surface is configured, skipping");
            return Ok(());
        }
        let (width, height) = window.buffer_size();
        let opacity = window.opacity();
        let stride = width * 4;
        debug!("Drawing surface {}x{}", width, height);

        let (buffer, pixels) = self.pool.create_buffer(
            width as i32,
            height as i32,
            stride as i32,
            wl_shm::Format::Argb8888,
        )?;

        let mut canvas = Canvas::new(pixels, width, height);
        canvas.clear();
        self.overlay.paint(&mut canvas);
        canvas.apply_opacity(opacity);

        self.overlay.window().present(&buffer);
        Ok(())
    }

    /// Draw once if anything asked for a repaint since the last frame
    pub fn flush_redraw(&mut self) {
        if !self.overlay.window_mut().take_redraw() {
            return;
        }
        if let Err(e) = self.draw() {
            warn!("Failed to draw overlay: {e}");
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        let consumed = self.overlay.handle_event(event);
        if consumed && matches!(event, InputEvent::Wheel { .. }) {
            self.panel.sync_scales(self.overlay.transform());
        }
    }

    pub fn handle_command_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                return;
            }
        };
        debug!("Console command: {:?}", command);

        match self
            .panel
            .execute(command, &mut self.overlay, &self.source)
        {
            Ok(Outcome::Done) => {}
            Ok(Outcome::Message(message)) => println!("{message}"),
            Ok(Outcome::Quit) => {
                info!("Quit requested");
                self.exit = true;
            }
            Err(e) => println!("{e}"),
        }
    }

    /// The image directory changed on disk
    pub fn refresh_images(&mut self) {
        match self.panel.refresh(&mut self.overlay, &self.source) {
            Ok(true) => println!("{}", self.panel.listing()),
            Ok(false) => {}
            Err(e) => println!("{e}"),
        }
    }

    pub fn update_screen_size(&mut self) {
        let size = self
            .output_state
            .outputs()
            .find_map(|output| self.output_state.info(&output))
            .and_then(|info| info.logical_size);
        if let Some((w, h)) = size {
            if w > 0 && h > 0 {
                debug!("Screen size {}x{}", w, h);
                self.panel.set_screen_size(w as u32, h as u32);
            }
        }
    }

    pub fn registry_state(&mut self) -> &mut RegistryState {
        &mut self.registry_state
    }

    pub fn output_state(&mut self) -> &mut OutputState {
        &mut self.output_state
    }

    pub fn seat_state(&mut self) -> &mut SeatState {
        &mut self.seat_state
    }

    pub fn shm_state(&mut self) -> &mut Shm {
        &mut self.shm_state
    }

    pub fn set_pointer(&mut self, pointer: Option<wl_pointer::WlPointer>) {
        self.pointer = pointer;
        info!("Pointer set: {:?}", self.pointer.is_some());
    }

    pub fn set_keyboard(&mut self, keyboard: Option<wl_keyboard::WlKeyboard>) {
        self.keyboard = keyboard;
        info!("Keyboard set: {:?}", self.keyboard.is_some());
    }
}
