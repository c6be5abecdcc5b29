// filepath: src/config.rs
//! Configuration handling for pix-overlay
//!
//! Startup defaults for the overlay and control panel, read from an
//! optional TOML file. The file is only ever read; runtime changes are
//! not written back.

use crate::error::{OverlayError, Result};
use serde::{Deserialize, Serialize};
use std::{fs, io::ErrorKind, path::PathBuf};

/// Configuration for the overlay appearance and behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub image_dir: PathBuf,
    pub scale_x: f64,
    pub scale_y: f64,
    pub lock_aspect: bool,
    pub opacity: f32,
    pub show_grid: bool,
    pub grid_alpha: i32,
    pub grid_width: i32,
    pub show_holes: bool,
    pub hole_percent: f64,
    pub click_through: bool,
    pub always_on_top: bool,
    pub show_on_start: bool,
    pub watch_image_dir: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("./pix"),
            scale_x: 10.0,
            scale_y: 10.0,
            lock_aspect: true,
            opacity: 0.8,
            show_grid: true,
            grid_alpha: 140,
            grid_width: 1,
            show_holes: true,
            hole_percent: 40.0,
            click_through: true,
            always_on_top: true,
            show_on_start: true,
            watch_image_dir: true,
        }
    }
}

impl OverlayConfig {
    /// Get the path to the configuration file
    pub fn get_config_path() -> PathBuf {
        let config_dir = if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("pix-overlay")
        } else {
            PathBuf::from(".config/pix-overlay")
        };

        config_dir.join("config.toml")
    }

    /// Load configuration from file, returning default if not found
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::get_config_path();

        match fs::read_to_string(&config_path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(OverlayError::Io {
                path: config_path,
                source,
            }),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
