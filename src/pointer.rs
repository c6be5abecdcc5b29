// filepath: src/pointer.rs
//! Pointer (mouse) event handling for pix-overlay
//!
//! Wayland reports surface-local positions; the overlay works in screen
//! coordinates, so the window position is added back on. That position is
//! the one the compositor last presented, not the one last requested.
//! Motion arriving while a margin change is still in flight is dropped:
//! its coordinates are relative to a surface that is about to move, and
//! adding the requested position would overshoot by the pending delta.

use crate::app::AppData;
use log::{debug, trace};
use pix_overlay::overlay::{InputEvent, PointerButton};
use smithay_client_toolkit::seat::pointer::{AxisScroll, PointerEvent, PointerEventKind};

// Linux evdev button codes
const BTN_LEFT: u32 = 0x110;
const BTN_RIGHT: u32 = 0x111;
const BTN_MIDDLE: u32 = 0x112;

pub fn handle_pointer_events(events: &[PointerEvent], app: &mut AppData) {
    debug!("handle_pointer_events: {} events", events.len());
    for event in events {
        let margins = *app.overlay.window().margins();
        let (wx, wy) = margins.origin();
        let position = (wx as f64 + event.position.0, wy as f64 + event.position.1);

        let input = match event.kind {
            PointerEventKind::Enter { .. } => {
                debug!(
                    "Pointer entered overlay at ({:.2}, {:.2})",
                    event.position.0, event.position.1
                );
                continue;
            }
            PointerEventKind::Leave { .. } => {
                debug!("Pointer left overlay");
                continue;
            }
            PointerEventKind::Motion { .. } if margins.is_pending() => {
                trace!("Motion dropped, window move in flight");
                continue;
            }
            PointerEventKind::Motion { .. } => InputEvent::PointerMove { position },
            PointerEventKind::Press { button, .. } => InputEvent::PointerDown {
                position,
                button: map_button(button),
            },
            PointerEventKind::Release { button, .. } => InputEvent::PointerUp {
                position,
                button: map_button(button),
            },
            PointerEventKind::Axis { vertical, .. } => {
                let notches = wheel_notches(&vertical);
                if notches == 0 {
                    continue;
                }
                InputEvent::Wheel {
                    notches,
                    modifiers: app.modifiers,
                }
            }
        };

        app.handle_input(input);
    }
}

fn map_button(button: u32) -> PointerButton {
    match button {
        BTN_LEFT => PointerButton::Primary,
        BTN_RIGHT => PointerButton::Secondary,
        BTN_MIDDLE => PointerButton::Middle,
        other => PointerButton::Other(other),
    }
}

/// Signed notch count, positive when scrolling away from the user.
/// Wayland's vertical axis grows downwards.
fn wheel_notches(scroll: &AxisScroll) -> i32 {
    if scroll.discrete != 0 {
        -scroll.discrete
    } else if scroll.absolute > 0.0 {
        -1
    } else if scroll.absolute < 0.0 {
        1
    } else {
        0
    }
}
