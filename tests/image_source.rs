//! Tests for listing and decoding PNGs from a real directory.

mod common;

use common::RecordingWindow;
use pix_overlay::config::OverlayConfig;
use pix_overlay::image_source::{FsImageSource, ImageSource};
use pix_overlay::{Bitmap, Overlay, OverlayError};
use std::fs;
use tempfile::tempdir;

fn write_png(path: &std::path::Path, width: u32, height: u32) {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    img.save(path).unwrap();
}

#[test]
fn test_lists_pngs_sorted_ignoring_case() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("b.PNG"), b"").unwrap();
    fs::write(dir.path().join("a.png"), b"").unwrap();
    fs::write(dir.path().join("notes.txt"), b"").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();

    let listing = FsImageSource.list_images(dir.path()).unwrap();
    let names: Vec<_> = listing
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.png", "b.PNG"]);
}

#[test]
fn test_missing_directory_lists_nothing() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(FsImageSource.list_images(&missing).unwrap().is_empty());
}

#[test]
fn test_decodes_real_png() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sprite.png");
    write_png(&path, 3, 2);

    let bitmap = FsImageSource.decode_image(&path).unwrap();
    assert_eq!((bitmap.width(), bitmap.height()), (3, 2));
    // Stored as BGRA
    assert_eq!(bitmap.pixel(0, 0), Some([30, 20, 10, 255]));
}

#[test]
fn test_garbage_png_fails_without_touching_overlay() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.png");
    fs::write(&path, b"definitely not a png").unwrap();

    let mut overlay = Overlay::new(RecordingWindow::default(), &OverlayConfig::default());
    overlay.load_image(Bitmap::filled(6, 6, [1, 2, 3, 255]), 10.0, 10.0);
    let size = overlay.size();

    let err = overlay
        .load_from(&FsImageSource, &path, 1.0, 1.0)
        .unwrap_err();

    assert!(matches!(err, OverlayError::ImageDecode { .. }));
    assert_eq!(overlay.bitmap().map(|b| b.width()), Some(6));
    assert_eq!(overlay.size(), size);
}
