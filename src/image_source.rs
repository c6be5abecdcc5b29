// filepath: src/image_source.rs
//! Listing and decoding of reference images

use crate::bitmap::Bitmap;
use crate::error::{OverlayError, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Where the overlay gets its images from
pub trait ImageSource {
    /// Ordered candidate image paths in `dir`
    fn list_images(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Decode the image at `path`
    fn decode_image(&self, path: &Path) -> Result<Bitmap>;
}

/// PNG files on the local filesystem, decoded with the `image` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct FsImageSource;

impl ImageSource for FsImageSource {
    fn list_images(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            debug!("Image directory {} does not exist", dir.display());
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(dir).map_err(|source| OverlayError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| is_png_name(name))
            .collect();
        names.sort();

        Ok(names.into_iter().map(|name| dir.join(name)).collect())
    }

    fn decode_image(&self, path: &Path) -> Result<Bitmap> {
        let img = image::open(path).map_err(|source| OverlayError::ImageDecode {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Bitmap::from(img.to_rgba8()))
    }
}

fn is_png_name(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_filter_ignores_case() {
        assert!(is_png_name("sprite.PNG"));
        assert!(is_png_name("a.b.png"));
        assert!(!is_png_name("sprite.png.bak"));
        assert!(!is_png_name("png"));
    }
}
