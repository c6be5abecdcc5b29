// filepath: src/main.rs

mod app;
mod image_watch;
mod keyboard;
mod layer_window;
mod pointer;
mod wayland;

use app::AppData;
use calloop::{channel, EventLoop};
use calloop_wayland_source::WaylandSource;
use layer_window::LayerWindow;
use log::{info, warn};
use pix_overlay::config::OverlayConfig;
use pix_overlay::controller::ControlPanel;
use pix_overlay::Overlay;
use smithay_client_toolkit::{
    compositor::CompositorState,
    output::OutputState,
    registry::RegistryState,
    seat::SeatState,
    shell::wlr_layer::{Layer, LayerShell},
    shm::{slot::SlotPool, Shm},
};
use std::io::BufRead;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use wayland_client::{globals::registry_queue_init, Connection};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting pix-overlay");

    let mut config = OverlayConfig::load_from_file().unwrap_or_else(|e| {
        warn!("Could not load config, using defaults: {e}");
        OverlayConfig::default()
    });
    if let Some(dir) = std::env::args_os().nth(1) {
        config.image_dir = PathBuf::from(dir);
    }
    info!("Image directory: {}", config.image_dir.display());

    let conn = Connection::connect_to_env()?;
    let (globals, mut event_queue) = registry_queue_init(&conn)?;
    let qh = event_queue.handle();

    let compositor = CompositorState::bind(&globals, &qh)?;
    let layer_shell = LayerShell::bind(&globals, &qh)?;
    let shm = Shm::bind(&globals, &qh)?;
    let seat_state = SeatState::new(&globals, &qh);

    // Grows on demand when the overlay is resized
    let pool = SlotPool::new(256 * 256 * 4, &shm)?;

    let layer = if config.always_on_top {
        Layer::Overlay
    } else {
        Layer::Bottom
    };
    let surface = compositor.create_surface(&qh);
    let layer_surface =
        layer_shell.create_layer_surface(&qh, surface, layer, Some("pix-overlay"), None);

    let window = LayerWindow::new(layer_surface, compositor, qh.clone());
    let overlay = Overlay::new(window, &config);
    let panel = ControlPanel::new(&config);

    let mut app_data = AppData::new(
        RegistryState::new(&globals),
        OutputState::new(&globals, &qh),
        seat_state,
        shm,
        pool,
        overlay,
        panel,
    );

    info!("Performing initial round-trip");
    // The second round-trip collects output geometry for centering
    event_queue.roundtrip(&mut app_data)?;
    event_queue.roundtrip(&mut app_data)?;
    app_data.startup(config.show_on_start);

    let mut event_loop: EventLoop<AppData> = EventLoop::try_new()?;
    let handle = event_loop.handle();
    WaylandSource::new(conn.clone(), event_queue)
        .insert(handle.clone())
        .map_err(|e| e.error)?;

    let (console_tx, console_rx) = channel::channel::<String>();
    spawn_console(console_tx);
    handle
        .insert_source(console_rx, |event, _, app| {
            if let channel::Event::Msg(line) = event {
                app.handle_command_line(&line);
            }
        })
        .map_err(|e| e.error)?;

    let _watcher = if config.watch_image_dir {
        let (watch_tx, watch_rx) = channel::channel::<()>();
        handle
            .insert_source(watch_rx, |event, _, app| {
                if let channel::Event::Msg(()) = event {
                    app.refresh_images();
                }
            })
            .map_err(|e| e.error)?;
        match image_watch::setup_image_watcher(&config.image_dir, watch_tx) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                warn!(
                    "Not watching {} for changes: {e}",
                    config.image_dir.display()
                );
                None
            }
        }
    } else {
        None
    };

    info!("Entering event loop");
    while !app_data.exit {
        event_loop.dispatch(Duration::from_millis(16), &mut app_data)?;
        app_data.flush_redraw();
    }

    info!("Exiting");
    Ok(())
}

/// Read console commands from stdin on a helper thread
fn spawn_console(tx: channel::Sender<String>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
        info!("Console input closed");
    });
}
