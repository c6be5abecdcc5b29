// filepath: src/keyboard.rs
//! Keyboard event handling for pix-overlay

use pix_overlay::overlay::{Key, Modifiers};
use smithay_client_toolkit::seat::keyboard::{self, Keysym};

pub fn map_keysym(keysym: Keysym) -> Key {
    match keysym {
        Keysym::Left | Keysym::KP_Left => Key::Left,
        Keysym::Right | Keysym::KP_Right => Key::Right,
        Keysym::Up | Keysym::KP_Up => Key::Up,
        Keysym::Down | Keysym::KP_Down => Key::Down,
        _ => Key::Other,
    }
}

pub fn map_modifiers(modifiers: keyboard::Modifiers) -> Modifiers {
    Modifiers {
        shift: modifiers.shift,
        ctrl: modifiers.ctrl,
    }
}
