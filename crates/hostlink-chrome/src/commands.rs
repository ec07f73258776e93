//! Command and event names used by the window chrome.

use serde::{Deserialize, Serialize};

/// Unconditional press notification.
pub const MOUSE_DOWN: &str = "mouse::down";
/// Unconditional release notification.
pub const MOUSE_UP: &str = "mouse::up";
/// Press inside the grip zone; carries a [`PointerPosition`].
pub const GRIP_GRAB: &str = "grip::grab";
/// Event sent after a primary release, whether or not a grab preceded it.
/// Payload is `null`.
pub const GRIP_RELEASE: &str = "grip::release";
/// Pointer movement while pressed; carries the delta as a [`PointerPosition`].
pub const GRIP_DRAG: &str = "grip::drag";
/// Press on the toolbar header; carries a [`PointerPosition`].
pub const WEBVIEW_MOVE_START: &str = "mouse::webview_move_start";
/// Inbound event updating the grip zone height. Payload is a bare number.
pub const GRIP_RESIZE: &str = "grip::resize";

/// The primary (usually left) pointer button.
pub const PRIMARY_BUTTON: i16 = 0;

/// Surface coordinates in CSS pixels, or a movement delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub(crate) fn to_value(self) -> serde_json::Value {
        serde_json::json!({ "x": self.x, "y": self.y })
    }
}
