pub mod bitmap;
pub mod command;
pub mod config;
pub mod controller;
pub mod draw;
pub mod error;
pub mod image_source;
pub mod overlay;
pub mod render;
pub mod transform;
pub mod window;

pub use crate::bitmap::Bitmap;
pub use crate::draw::Canvas;
pub use crate::error::{OverlayError, Result};
pub use crate::overlay::{InputEvent, Overlay, Visibility};
pub use crate::window::{NullWindowService, WindowService};
