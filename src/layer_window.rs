// filepath: src/layer_window.rs
//! wlr-layer-shell backed window service

use crate::app::AppData;
use log::{debug, info, warn};
use pix_overlay::WindowService;
use smithay_client_toolkit::{
    compositor::{CompositorState, Region},
    shell::{
        wlr_layer::{Anchor, KeyboardInteractivity, Layer, LayerSurface},
        WaylandSurface,
    },
    shm::slot::Buffer,
};
use wayland_client::{Proxy, QueueHandle};

/// Position requested through the layer margins versus the one the
/// compositor has presented. Pointer coordinates are relative to the
/// presented one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarginTracker {
    requested: (i32, i32),
    presented: (i32, i32),
    pending: bool,
}

impl MarginTracker {
    /// Record a margin change. `live` means the compositor will apply it
    /// asynchronously; otherwise it takes effect when the surface maps.
    pub fn request(&mut self, x: i32, y: i32, live: bool) {
        self.requested = (x, y);
        if live {
            self.pending = self.requested != self.presented;
        } else {
            self.settle();
        }
    }

    /// The compositor presented a commit carrying the latest margins
    pub fn settle(&mut self) {
        self.presented = self.requested;
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Screen position that surface-local pointer coordinates are relative to
    pub fn origin(&self) -> (i32, i32) {
        self.presented
    }
}

pub struct LayerWindow {
    layer_surface: LayerSurface,
    compositor_state: CompositorState,
    qh: QueueHandle<AppData>,
    margins: MarginTracker,
    input_region: Option<Region>,
    visible: bool,
    configured: bool,
    closed: bool,
    width: u32,
    height: u32,
    opacity: f32,
    needs_redraw: bool,
}

impl LayerWindow {
    pub fn new(
        layer_surface: LayerSurface,
        compositor_state: CompositorState,
        qh: QueueHandle<AppData>,
    ) -> Self {
        info!("Configuring layer surface");
        layer_surface.set_anchor(Anchor::TOP | Anchor::LEFT);
        layer_surface.set_keyboard_interactivity(KeyboardInteractivity::None);
        layer_surface.set_exclusive_zone(-1);
        layer_surface.set_margin(0, 0, 0, 0);

        Self {
            layer_surface,
            compositor_state,
            qh,
            margins: MarginTracker::default(),
            input_region: None,
            visible: false,
            configured: false,
            closed: false,
            width: 0,
            height: 0,
            opacity: 1.0,
            needs_redraw: false,
        }
    }

    /// Compositor acknowledged our state; a zero dimension keeps the requested one
    pub fn configure(&mut self, new_size: (u32, u32)) {
        if new_size.0 != 0 {
            self.width = new_size.0;
        }
        if new_size.1 != 0 {
            self.height = new_size.1;
        }
        self.configured = true;
        self.needs_redraw = true;
        info!("Surface configured with size: {}x{}", self.width, self.height);
    }

    pub fn close(&mut self) {
        self.closed = true;
        self.configured = false;
        info!("Layer surface closed");
    }

    /// Mapped and configured, so a buffer may be attached
    pub fn is_ready(&self) -> bool {
        self.visible && self.configured && !self.closed && self.width > 0 && self.height > 0
    }

    pub fn buffer_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn margins(&self) -> &MarginTracker {
        &self.margins
    }

    /// Frame callback: everything committed so far is on screen
    pub fn frame_done(&mut self) {
        if self.margins.is_pending() {
            debug!("Margins settled at {:?}", self.margins.origin());
        }
        self.margins.settle();
    }

    /// Consume a pending redraw request
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    pub fn present(&self, buffer: &Buffer) {
        let surface = self.layer_surface.wl_surface();
        if let Err(e) = buffer.attach_to(surface) {
            warn!("Failed to attach buffer: {e:?}");
            return;
        }
        surface.damage_buffer(0, 0, self.width as i32, self.height as i32);
        surface.commit();
    }

    fn commit_if_visible(&self) {
        if self.visible && !self.closed {
            self.layer_surface.wl_surface().commit();
        }
    }
}

impl WindowService for LayerWindow {
    fn set_visible(&mut self, visible: bool) {
        if self.closed {
            return;
        }
        self.visible = visible;
        let surface = self.layer_surface.wl_surface();
        if visible {
            // An empty commit asks the compositor for a fresh configure
            surface.commit();
        } else {
            surface.attach(None, 0, 0);
            surface.commit();
            self.configured = false;
            self.margins.settle();
        }
    }

    fn set_input_transparent(&mut self, transparent: bool) {
        let surface = self.layer_surface.wl_surface();
        if transparent {
            match Region::new(&self.compositor_state) {
                Ok(region) => {
                    surface.set_input_region(Some(region.wl_region()));
                    self.input_region = Some(region);
                    debug!("Empty input region set for surface {:?}", surface.id());
                }
                Err(e) => {
                    warn!("Failed to create input region, overlay stays clickable: {e}");
                }
            }
            self.layer_surface
                .set_keyboard_interactivity(KeyboardInteractivity::None);
        } else {
            surface.set_input_region(None);
            self.input_region = None;
            self.layer_surface
                .set_keyboard_interactivity(KeyboardInteractivity::OnDemand);
        }
        self.commit_if_visible();
    }

    fn set_always_on_top(&mut self, on_top: bool) {
        let layer = if on_top { Layer::Overlay } else { Layer::Bottom };
        self.layer_surface.set_layer(layer);
        self.commit_if_visible();
    }

    fn move_to(&mut self, x: i32, y: i32) {
        self.layer_surface.set_margin(y, 0, 0, x);
        let live = self.visible && !self.closed;
        self.margins.request(x, y, live);
        if live {
            let surface = self.layer_surface.wl_surface();
            surface.frame(&self.qh, surface.clone());
            surface.commit();
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.layer_surface.set_size(width, height);
        if !self.configured {
            self.width = width;
            self.height = height;
        }
        self.commit_if_visible();
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
        self.needs_redraw = true;
    }

    fn request_repaint(&mut self) {
        self.needs_redraw = true;
    }
}
