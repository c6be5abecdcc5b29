// filepath: src/error.rs
//! Error types for pix-overlay

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("could not load {}: {source}", path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("no PNG images found in {}", dir.display())]
    EmptyImageSet { dir: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("bitmap of {width}x{height} cannot hold {len} bytes")]
    InvalidBitmap { width: u32, height: u32, len: usize },
}

pub type Result<T> = std::result::Result<T, OverlayError>;
