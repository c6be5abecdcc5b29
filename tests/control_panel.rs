//! Tests for the control panel: aspect lock, image selection and console commands.

mod common;

use common::{FakeImages, RecordingWindow, WindowCall};
use pix_overlay::command::Command;
use pix_overlay::config::OverlayConfig;
use pix_overlay::controller::{ControlPanel, Outcome};
use pix_overlay::{Bitmap, Overlay, OverlayError, Visibility};
use std::path::Path;

fn setup(lock_aspect: bool) -> (ControlPanel, Overlay<RecordingWindow>) {
    let config = OverlayConfig {
        lock_aspect,
        scale_x: 4.0,
        scale_y: 6.0,
        ..OverlayConfig::default()
    };
    let panel = ControlPanel::new(&config);
    let overlay = Overlay::new(RecordingWindow::default(), &config);
    (panel, overlay)
}

fn three_images() -> FakeImages {
    FakeImages::default()
        .with("a.png", Some(Bitmap::filled(2, 2, [255, 0, 0, 255])))
        .with("b.png", Some(Bitmap::filled(3, 3, [0, 255, 0, 255])))
        .with("c.png", Some(Bitmap::filled(4, 4, [0, 0, 255, 255])))
}

fn resizes(window: &RecordingWindow) -> usize {
    window.count(|c| matches!(c, WindowCall::Resize(..)))
}

#[test]
fn test_locked_aspect_sets_both_scales_at_once() {
    let (mut panel, mut overlay) = setup(true);
    overlay.load_image(Bitmap::filled(10, 10, [0, 0, 0, 255]), 4.0, 4.0);
    overlay.window_mut().clear();

    panel.set_scale_y(7.5, &mut overlay);

    assert_eq!(panel.scales(), (7.5, 7.5));
    assert_eq!(overlay.transform().scale_x(), 7.5);
    assert_eq!(overlay.transform().scale_y(), 7.5);
    // One set_scales call means one resize, never an intermediate size
    assert_eq!(resizes(overlay.window()), 1);
    assert_eq!(overlay.window().calls[0], WindowCall::Resize(75, 75));
}

#[test]
fn test_unlocked_axes_move_independently() {
    let (mut panel, mut overlay) = setup(false);
    assert_eq!(panel.scales(), (4.0, 6.0));

    panel.set_scale_x_slider(250, &mut overlay);
    assert_eq!(panel.scales(), (2.5, 6.0));
    assert_eq!(overlay.transform().scale_x(), 2.5);
    assert_eq!(overlay.transform().scale_y(), 6.0);
}

#[test]
fn test_enabling_lock_copies_x_to_y() {
    let (mut panel, mut overlay) = setup(false);
    panel.set_lock_aspect(true, &mut overlay);
    assert_eq!(panel.scales(), (4.0, 4.0));
    assert_eq!(overlay.transform().scale_y(), 4.0);
}

#[test]
fn test_startup_loads_first_image_and_shows() {
    let (mut panel, mut overlay) = setup(true);
    let source = three_images();

    panel.startup(&mut overlay, &source, true).unwrap();

    assert_eq!(panel.selected_path(), Some(Path::new("a.png")));
    assert_eq!(overlay.bitmap().map(|b| b.width()), Some(2));
    assert_eq!(overlay.visibility(), Visibility::VisibleClickThrough);
}

#[test]
fn test_empty_directory_is_reported_and_leaves_overlay_alone() {
    let (mut panel, mut overlay) = setup(true);
    let source = FakeImages::default();

    let err = panel.startup(&mut overlay, &source, true).unwrap_err();

    assert!(matches!(err, OverlayError::EmptyImageSet { .. }));
    assert!(overlay.bitmap().is_none());
    assert_eq!(overlay.visibility(), Visibility::Hidden);
}

#[test]
fn test_selecting_broken_image_keeps_previous() {
    let (mut panel, mut overlay) = setup(true);
    let source = three_images().with("d.png", None);
    panel.startup(&mut overlay, &source, false).unwrap();

    let result = panel.execute(Command::Select(4), &mut overlay, &source);

    assert!(result.is_err());
    assert_eq!(overlay.bitmap().map(|b| b.width()), Some(2));
}

#[test]
fn test_next_and_prev_wrap() {
    let (mut panel, mut overlay) = setup(true);
    let source = three_images();
    panel.startup(&mut overlay, &source, false).unwrap();

    panel.execute(Command::Prev, &mut overlay, &source).unwrap();
    assert_eq!(panel.selected_path(), Some(Path::new("c.png")));

    panel.execute(Command::Next, &mut overlay, &source).unwrap();
    assert_eq!(panel.selected_path(), Some(Path::new("a.png")));
}

#[test]
fn test_rescan_keeps_selected_image() {
    let (mut panel, mut overlay) = setup(true);
    let source = three_images();
    panel.startup(&mut overlay, &source, false).unwrap();
    panel.execute(Command::Select(2), &mut overlay, &source).unwrap();

    let source = FakeImages::default()
        .with("0.png", Some(Bitmap::filled(1, 1, [0, 0, 0, 255])))
        .with("b.png", Some(Bitmap::filled(3, 3, [0, 255, 0, 255])));
    assert!(panel.refresh(&mut overlay, &source).unwrap());
    assert_eq!(panel.selected_path(), Some(Path::new("b.png")));

    // Same listing again is not a change
    assert!(!panel.refresh(&mut overlay, &source).unwrap());
}

#[test]
fn test_console_commands_reach_overlay() {
    let (mut panel, mut overlay) = setup(true);
    let source = three_images();
    panel.startup(&mut overlay, &source, true).unwrap();

    let run = |line: &str, panel: &mut ControlPanel, overlay: &mut Overlay<RecordingWindow>| {
        let command = line.parse::<Command>().unwrap();
        panel.execute(command, overlay, &source).unwrap()
    };

    run("click-through off", &mut panel, &mut overlay);
    assert_eq!(overlay.visibility(), Visibility::VisibleInteractive);

    run("opacity 1", &mut panel, &mut overlay);
    assert_eq!(overlay.opacity(), 0.05);

    run("offset 5 -0.5", &mut panel, &mut overlay);
    assert_eq!(panel.offsets(), (2.0, -0.5));
    assert_eq!(overlay.transform().offset_x(), 2.0);

    run("hole 150", &mut panel, &mut overlay);
    assert_eq!(overlay.decorations().hole_percent(), 100.0);

    assert!(matches!(
        run("select 9", &mut panel, &mut overlay),
        Outcome::Message(_)
    ));
    assert_eq!(run("quit", &mut panel, &mut overlay), Outcome::Quit);

    run("hide", &mut panel, &mut overlay);
    assert_eq!(overlay.visibility(), Visibility::Hidden);
}

#[test]
fn test_listing_marks_selection() {
    let (mut panel, mut overlay) = setup(true);
    let source = three_images();
    panel.startup(&mut overlay, &source, false).unwrap();

    let listing = panel.listing();
    assert!(listing.contains("*  1: a.png"));
    assert!(listing.contains("   2: b.png"));
}
